//! Metadata browsing models and DTOs

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Fully-qualified pointer into warehouse data the app does not own
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Validate)]
pub struct DataReference {
    #[validate(length(min = 1, message = "Database is required"))]
    pub database: String,
    #[validate(length(min = 1, message = "Schema is required"))]
    pub schema: String,
    #[validate(length(min = 1, message = "Table is required"))]
    pub table: String,
    #[validate(length(min = 1, message = "Identifier column is required"))]
    pub column: String,
}

impl DataReference {
    /// `database.schema.table`, as passed to procedures
    pub fn table_ref(&self) -> String {
        format!("{}.{}.{}", self.database, self.schema, self.table)
    }
}

/// Identifier kinds the match-rate procedure understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub enum IdType {
    #[default]
    #[serde(rename = "email")]
    Email,
    #[serde(rename = "phone")]
    Phone,
    #[serde(rename = "ip address")]
    IpAddress,
    #[serde(rename = "RampID")]
    RampId,
}

impl IdType {
    pub const ALL: [IdType; 4] = [IdType::Email, IdType::Phone, IdType::IpAddress, IdType::RampId];

    pub fn as_str(&self) -> &'static str {
        match self {
            IdType::Email => "email",
            IdType::Phone => "phone",
            IdType::IpAddress => "ip address",
            IdType::RampId => "RampID",
        }
    }
}

/// Query for schemas of a database
#[derive(Debug, Deserialize)]
pub struct ListSchemasQuery {
    pub database: String,
}

/// Query for tables of a schema
#[derive(Debug, Deserialize)]
pub struct ListTablesQuery {
    pub database: String,
    pub schema: String,
}

/// Query for columns of a table
#[derive(Debug, Deserialize)]
pub struct ListColumnsQuery {
    pub database: String,
    pub schema: String,
    pub table: String,
}

/// Names offered by one selector
#[derive(Debug, Serialize)]
pub struct NameListResponse {
    pub names: Vec<String>,
}

/// Request to run a match overlap
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MatchRateRequest {
    #[validate(nested)]
    pub reference: DataReference,
    pub id_type: IdType,
}

/// Match rate as returned by the scoring procedure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRate {
    pub table_ref: String,
    pub percentage: String,
}

impl MatchRate {
    pub fn display(&self) -> String {
        format!("Match rate is {}%!", self.percentage)
    }
}
