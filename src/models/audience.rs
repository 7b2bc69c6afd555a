//! Audience definition models and DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::metadata::IdType;

/// Kind of custom audience
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
pub enum AudienceType {
    #[default]
    #[serde(rename = "audience")]
    Audience,
    #[serde(rename = "suppression list")]
    SuppressionList,
    #[serde(rename = "lookalike")]
    Lookalike,
}

impl AudienceType {
    pub const ALL: [AudienceType; 3] = [
        AudienceType::Audience,
        AudienceType::SuppressionList,
        AudienceType::Lookalike,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AudienceType::Audience => "audience",
            AudienceType::SuppressionList => "suppression list",
            AudienceType::Lookalike => "lookalike",
        }
    }

    /// Uppercased first letter of the type name
    pub fn prefix(&self) -> char {
        match self {
            AudienceType::Audience => 'A',
            AudienceType::SuppressionList => 'S',
            AudienceType::Lookalike => 'L',
        }
    }
}

/// Refresh cadence of a persisted audience
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateFrequency {
    #[default]
    Manual,
    Monthly,
    Hourly,
    Daily,
}

impl UpdateFrequency {
    pub const ALL: [UpdateFrequency; 4] = [
        UpdateFrequency::Manual,
        UpdateFrequency::Monthly,
        UpdateFrequency::Hourly,
        UpdateFrequency::Daily,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UpdateFrequency::Manual => "manual",
            UpdateFrequency::Monthly => "monthly",
            UpdateFrequency::Hourly => "hourly",
            UpdateFrequency::Daily => "daily",
        }
    }
}

pub const SIZE_MIN: u32 = 10_000;
pub const SIZE_MAX: u32 = 99_000;
pub const SIZE_DEFAULT: u32 = 60_000;

pub const CONFIDENCE_MIN: u32 = 0;
pub const CONFIDENCE_MAX: u32 = 99;
pub const CONFIDENCE_DEFAULT: u32 = 1;

/// How a lookalike audience is sized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub enum LookalikeMode {
    #[default]
    #[serde(rename = "size")]
    Size,
    #[serde(rename = "confidence level", alias = "confidence")]
    Confidence,
}

impl LookalikeMode {
    pub const ALL: [LookalikeMode; 2] = [LookalikeMode::Size, LookalikeMode::Confidence];

    /// Pull a slider value into this mode's range
    pub fn clamp(&self, value: u32) -> u32 {
        match self {
            LookalikeMode::Size => value.clamp(SIZE_MIN, SIZE_MAX),
            LookalikeMode::Confidence => value.clamp(CONFIDENCE_MIN, CONFIDENCE_MAX),
        }
    }
}

/// Lookalike mode with its slider value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct LookalikeSizing {
    pub mode: LookalikeMode,
    pub value: u32,
}

/// Request to create a custom audience
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAudienceRequest {
    #[serde(default)]
    pub audience_type: AudienceType,

    #[validate(length(min = 1, max = 255, message = "Audience name must be between 1 and 255 characters"))]
    #[validate(custom(function = "validate_not_blank"))]
    pub name: String,

    #[validate(length(min = 1, message = "SQL is required"))]
    pub sql: String,

    #[validate(length(min = 1, message = "Identifier column is required"))]
    pub id_column: String,

    #[serde(default)]
    pub id_type: IdType,

    #[serde(default)]
    pub frequency: UpdateFrequency,

    #[serde(default)]
    pub lookalike: Option<LookalikeSizing>,
}

impl CreateAudienceRequest {
    /// Apply the form's invariants: lookalikes are always refreshed manually
    /// and their sizing stays inside the slider range
    pub fn normalized(mut self) -> Self {
        if self.audience_type == AudienceType::Lookalike {
            self.frequency = UpdateFrequency::Manual;
            if let Some(sizing) = self.lookalike.as_mut() {
                sizing.value = sizing.mode.clamp(sizing.value);
            }
        } else {
            self.lookalike = None;
        }
        self
    }
}

/// Outcome of an audience submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAudienceResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audience_id: Option<String>,
    pub result: String,
}

/// Snapshot of the persisted audience metadata table
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AudienceTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
    pub fetched_at: DateTime<Utc>,
}

fn validate_not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        let mut err = validator::ValidationError::new("blank");
        err.message = Some("Audience name cannot be blank".into());
        return Err(err);
    }
    Ok(())
}
