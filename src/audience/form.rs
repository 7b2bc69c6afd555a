//! Custom audience form rules
//!
//! The form is recomputed from the current selection on every interaction.
//! Only the audience type drives visibility: lookalikes get the sizing
//! controls and a fixed manual frequency, every other type gets the
//! frequency selector.

use crate::models::{
    AudienceType, FormSelection, FormState, FrequencyControl, LookalikeControls, LookalikeMode,
    Selector, Slider, UpdateFrequency, CONFIDENCE_DEFAULT, CONFIDENCE_MAX, CONFIDENCE_MIN,
    SIZE_DEFAULT, SIZE_MAX, SIZE_MIN,
};

pub const MANUAL_FREQUENCY_NOTE: &str = "Manual frequency required for lookalike";

pub struct FormRenderer;

impl FormRenderer {
    pub fn render(selection: &FormSelection) -> FormState {
        let audience_type = selection.audience_type.unwrap_or_default();

        let (lookalike, frequency) = match audience_type {
            AudienceType::Lookalike => (
                Some(Self::lookalike_controls(selection)),
                FrequencyControl::Fixed {
                    value: UpdateFrequency::Manual,
                    note: MANUAL_FREQUENCY_NOTE.to_string(),
                },
            ),
            AudienceType::Audience | AudienceType::SuppressionList => (
                None,
                FrequencyControl::Selectable {
                    selector: Selector {
                        label: "Select Update Frequency".to_string(),
                        options: UpdateFrequency::ALL.to_vec(),
                        selected: Some(selection.frequency.unwrap_or_default()),
                    },
                },
            ),
        };

        FormState {
            audience_type: Selector {
                label: "Select Audience Type".to_string(),
                options: AudienceType::ALL.to_vec(),
                selected: Some(audience_type),
            },
            lookalike,
            name: selection.name.clone(),
            sql: selection.sql.clone(),
            frequency,
        }
    }

    fn lookalike_controls(selection: &FormSelection) -> LookalikeControls {
        let mode = selection.lookalike_mode.unwrap_or_default();
        let slider = match mode {
            LookalikeMode::Size => Slider {
                label: "Requested lookalike audience count".to_string(),
                min: SIZE_MIN,
                max: SIZE_MAX,
                value: mode.clamp(selection.lookalike_value.unwrap_or(SIZE_DEFAULT)),
                help: "Number of unknown prospects to target".to_string(),
            },
            LookalikeMode::Confidence => Slider {
                label: "Requested lookalike confidence interval".to_string(),
                min: CONFIDENCE_MIN,
                max: CONFIDENCE_MAX,
                value: mode.clamp(selection.lookalike_value.unwrap_or(CONFIDENCE_DEFAULT)),
                help: "Confidence level needed".to_string(),
            },
        };

        LookalikeControls {
            mode: Selector {
                label: "Confidence or audience size?".to_string(),
                options: LookalikeMode::ALL.to_vec(),
                selected: Some(mode),
            },
            slider,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn selection(audience_type: AudienceType) -> FormSelection {
        FormSelection {
            audience_type: Some(audience_type),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults_to_audience_with_manual_frequency() {
        let form = FormRenderer::render(&FormSelection::default());
        assert_eq!(form.audience_type.selected, Some(AudienceType::Audience));
        assert!(form.lookalike.is_none());
        assert_eq!(form.effective_frequency(), UpdateFrequency::Manual);
        assert!(matches!(form.frequency, FrequencyControl::Selectable { .. }));
    }

    #[test]
    fn test_lookalike_forces_manual_regardless_of_prior_selection() {
        for prior in UpdateFrequency::ALL {
            let mut sel = selection(AudienceType::Lookalike);
            sel.frequency = Some(prior);
            let form = FormRenderer::render(&sel);
            assert_eq!(
                form.frequency,
                FrequencyControl::Fixed {
                    value: UpdateFrequency::Manual,
                    note: MANUAL_FREQUENCY_NOTE.to_string(),
                }
            );
        }
    }

    #[test]
    fn test_suppression_list_keeps_frequency_selector() {
        let mut sel = selection(AudienceType::SuppressionList);
        sel.frequency = Some(UpdateFrequency::Hourly);
        let form = FormRenderer::render(&sel);
        assert!(form.lookalike.is_none());
        assert_eq!(form.effective_frequency(), UpdateFrequency::Hourly);
    }

    #[test]
    fn test_size_slider_defaults_inside_range() {
        let form = FormRenderer::render(&selection(AudienceType::Lookalike));
        let controls = form.lookalike.unwrap();
        assert_eq!(controls.mode.selected, Some(LookalikeMode::Size));
        assert_eq!(
            controls.slider,
            Slider {
                label: "Requested lookalike audience count".to_string(),
                min: SIZE_MIN,
                max: SIZE_MAX,
                value: SIZE_DEFAULT,
                help: "Number of unknown prospects to target".to_string(),
            }
        );
    }

    #[test]
    fn test_confidence_slider_clamps_value() {
        let mut sel = selection(AudienceType::Lookalike);
        sel.lookalike_mode = Some(LookalikeMode::Confidence);
        assert_eq!(
            FormRenderer::render(&sel).lookalike.unwrap().slider.value,
            CONFIDENCE_DEFAULT
        );

        sel.lookalike_value = Some(60_000);
        let slider = FormRenderer::render(&sel).lookalike.unwrap().slider;
        assert_eq!((slider.min, slider.max, slider.value), (0, 99, 99));
    }

    #[test]
    fn test_size_slider_clamps_low_value() {
        let mut sel = selection(AudienceType::Lookalike);
        sel.lookalike_value = Some(60);
        assert_eq!(FormRenderer::render(&sel).lookalike.unwrap().slider.value, SIZE_MIN);
    }

    #[test]
    fn test_text_fields_echo_selection() {
        let mut sel = selection(AudienceType::Audience);
        sel.name = "N1".into();
        sel.sql = "SELECT 1".into();
        let form = FormRenderer::render(&sel);
        assert_eq!((form.name.as_str(), form.sql.as_str()), ("N1", "SELECT 1"));
    }
}
