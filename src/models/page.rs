//! Page state models
//!
//! The dashboard posts its current selections on every interaction and
//! gets back the complete recomputed page.

use serde::{Deserialize, Serialize};

use super::audience::{AudienceTable, AudienceType, LookalikeMode, UpdateFrequency};
use super::metadata::IdType;

/// Everything the operator currently has selected or typed
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Selections {
    pub database: Option<String>,
    pub schema: Option<String>,
    pub table: Option<String>,
    pub column: Option<String>,
    pub id_type: Option<IdType>,
    pub form: FormSelection,
}

/// Current values of the custom audience form
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormSelection {
    pub audience_type: Option<AudienceType>,
    pub lookalike_mode: Option<LookalikeMode>,
    pub lookalike_value: Option<u32>,
    pub name: String,
    pub sql: String,
    pub frequency: Option<UpdateFrequency>,
}

/// A dropdown with its options and effective selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selector<T> {
    pub label: String,
    pub options: Vec<T>,
    pub selected: Option<T>,
}

/// Numeric slider
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Slider {
    pub label: String,
    pub min: u32,
    pub max: u32,
    pub value: u32,
    pub help: String,
}

/// Lookalike-only controls
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LookalikeControls {
    pub mode: Selector<LookalikeMode>,
    pub slider: Slider,
}

/// Frequency selector, or the fixed value shown instead of it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FrequencyControl {
    Selectable { selector: Selector<UpdateFrequency> },
    Fixed { value: UpdateFrequency, note: String },
}

/// Rendered custom audience form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormState {
    pub audience_type: Selector<AudienceType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lookalike: Option<LookalikeControls>,
    pub name: String,
    pub sql: String,
    pub frequency: FrequencyControl,
}

impl FormState {
    /// Frequency a submission from this form would carry
    pub fn effective_frequency(&self) -> UpdateFrequency {
        match &self.frequency {
            FrequencyControl::Selectable { selector } => selector.selected.unwrap_or_default(),
            FrequencyControl::Fixed { value, .. } => *value,
        }
    }
}

/// Guidance shown when the app cannot see any database
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GrantInstructions {
    pub message: String,
    pub code: String,
}

/// The complete dashboard for one interaction
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageState {
    pub title: String,
    pub current_database: String,
    pub database: Selector<String>,
    pub schema: Selector<String>,
    pub table: Selector<String>,
    pub column: Selector<String>,
    pub id_type: Selector<IdType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grant_instructions: Option<GrantInstructions>,
    pub form: FormState,
    pub created_audiences: AudienceTable,
}
