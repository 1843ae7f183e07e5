//! Field validation engine.
//!
//! Evaluates a single answer against a field's required/length/date
//! constraints and collects per-field messages for a whole submission.
//! Validation never raises; a failure is a user-facing message keyed by
//! field id, and hidden fields are never validated regardless of
//! `required`.

use std::collections::BTreeMap;

use crate::answer::{is_blank, AnswerMap, AnswerValue};
use crate::field::{Field, FieldType};
use crate::visibility::is_visible;

/// Message for a missing required answer.
pub const REQUIRED_MESSAGE: &str = "This field is required.";

/// Message for an unticked required checkbox.
pub const CONSENT_MESSAGE: &str = "Consent is required.";

/// Validate one answer against one field.
///
/// Returns `None` when the answer is acceptable, otherwise the message to
/// surface next to the field. Checks run in order: the optional-and-empty
/// short-circuit, the per-type required rules, then length and date-range
/// constraints for string answers.
pub fn validate_field(field: &Field, value: Option<&AnswerValue>) -> Option<String> {
    let blank = is_blank(value);
    if !field.required && blank {
        return None;
    }

    if field.required {
        match field.field_type {
            FieldType::MultiSelect => {
                let any_selected =
                    matches!(value, Some(AnswerValue::Multi(items)) if !items.is_empty());
                if !any_selected {
                    return Some(REQUIRED_MESSAGE.to_string());
                }
            }
            FieldType::Checkbox => {
                if !matches!(value, Some(AnswerValue::Checked(true))) {
                    return Some(CONSENT_MESSAGE.to_string());
                }
            }
            _ => {
                if blank {
                    return Some(REQUIRED_MESSAGE.to_string());
                }
            }
        }
    }

    let Some(rules) = &field.validation else {
        return None;
    };
    let Some(AnswerValue::Text(text)) = value else {
        return None;
    };

    let length = text.chars().count();
    if let Some(min) = rules.min_length.filter(|min| *min > 0) {
        if length < min as usize {
            return Some(format!("Enter at least {min} characters."));
        }
    }
    if let Some(max) = rules.max_length.filter(|max| *max > 0) {
        if length > max as usize {
            return Some(format!("Enter at most {max} characters."));
        }
    }

    if field.field_type == FieldType::Date {
        if let Some(min_date) = rules.min_date.as_deref().filter(|date| !date.is_empty()) {
            if text.as_str() < min_date {
                return Some(format!("Choose a date on or after {min_date}."));
            }
        }
        if let Some(max_date) = rules.max_date.as_deref().filter(|date| !date.is_empty()) {
            if text.as_str() > max_date {
                return Some(format!("Choose a date on or before {max_date}."));
            }
        }
    }

    None
}

/// Whether an answer satisfies the per-type required rules, independent of
/// visibility. Also used by completion-rate aggregation.
pub fn required_satisfied(field: &Field, value: Option<&AnswerValue>) -> bool {
    match field.field_type {
        FieldType::MultiSelect => {
            matches!(value, Some(AnswerValue::Multi(items)) if !items.is_empty())
        }
        FieldType::Checkbox => matches!(value, Some(AnswerValue::Checked(true))),
        _ => !is_blank(value),
    }
}

/// Validate every currently visible field of a submission.
///
/// Returns a field-id → message map; an empty map means the submission may
/// proceed. Hidden fields never contribute an entry.
pub fn validate_answers(fields: &[Field], answers: &AnswerMap) -> BTreeMap<String, String> {
    let mut errors = BTreeMap::new();
    for field in fields {
        if !is_visible(field, answers) {
            continue;
        }
        if let Some(message) = validate_field(field, answers.get(&field.id)) {
            errors.insert(field.id.clone(), message);
        }
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{ValidationRule, VisibilityOperator, VisibilityRule};

    fn field(field_type: FieldType, required: bool) -> Field {
        Field {
            id: "f1".to_string(),
            label: "Question".to_string(),
            field_type,
            required,
            options: None,
            ai_enabled: false,
            visibility: None,
            validation: None,
        }
    }

    #[test]
    fn optional_empty_answers_pass_for_every_type() {
        for field_type in [
            FieldType::ShortText,
            FieldType::LongText,
            FieldType::SingleSelect,
            FieldType::MultiSelect,
            FieldType::Date,
            FieldType::Checkbox,
        ] {
            let f = field(field_type, false);
            assert_eq!(validate_field(&f, None), None);
            assert_eq!(validate_field(&f, Some(&AnswerValue::Null)), None);
            assert_eq!(
                validate_field(&f, Some(&AnswerValue::Text(String::new()))),
                None
            );
        }
    }

    #[test]
    fn required_text_rejects_blank_answers() {
        let f = field(FieldType::ShortText, true);
        assert_eq!(validate_field(&f, None).as_deref(), Some(REQUIRED_MESSAGE));
        assert_eq!(
            validate_field(&f, Some(&AnswerValue::Text(String::new()))).as_deref(),
            Some(REQUIRED_MESSAGE)
        );
        assert_eq!(validate_field(&f, Some(&AnswerValue::Text("ok".into()))), None);
    }

    #[test]
    fn required_checkbox_needs_literal_true() {
        let f = field(FieldType::Checkbox, true);
        assert_eq!(
            validate_field(&f, Some(&AnswerValue::Checked(false))).as_deref(),
            Some(CONSENT_MESSAGE)
        );
        assert_eq!(
            validate_field(&f, Some(&AnswerValue::Null)).as_deref(),
            Some(CONSENT_MESSAGE)
        );
        assert_eq!(validate_field(&f, Some(&AnswerValue::Checked(true))), None);
    }

    #[test]
    fn required_multi_select_needs_a_non_empty_sequence() {
        let f = field(FieldType::MultiSelect, true);
        assert_eq!(
            validate_field(&f, Some(&AnswerValue::Multi(vec![]))).as_deref(),
            Some(REQUIRED_MESSAGE)
        );
        assert_eq!(
            validate_field(&f, Some(&AnswerValue::Text("x".into()))).as_deref(),
            Some(REQUIRED_MESSAGE)
        );
        assert_eq!(
            validate_field(&f, Some(&AnswerValue::Multi(vec!["x".into()]))),
            None
        );
    }

    #[test]
    fn length_bounds_apply_to_string_answers() {
        let mut f = field(FieldType::LongText, false);
        f.validation = Some(ValidationRule {
            min_length: Some(3),
            max_length: Some(5),
            ..ValidationRule::default()
        });
        assert_eq!(
            validate_field(&f, Some(&AnswerValue::Text("ab".into()))).as_deref(),
            Some("Enter at least 3 characters.")
        );
        assert_eq!(
            validate_field(&f, Some(&AnswerValue::Text("abcdef".into()))).as_deref(),
            Some("Enter at most 5 characters.")
        );
        assert_eq!(validate_field(&f, Some(&AnswerValue::Text("abcd".into()))), None);
    }

    #[test]
    fn zero_length_bounds_are_ignored() {
        let mut f = field(FieldType::ShortText, false);
        f.validation = Some(ValidationRule {
            min_length: Some(0),
            max_length: Some(0),
            ..ValidationRule::default()
        });
        assert_eq!(validate_field(&f, Some(&AnswerValue::Text("anything".into()))), None);
    }

    #[test]
    fn date_range_compares_lexicographically() {
        let mut f = field(FieldType::Date, false);
        f.validation = Some(ValidationRule {
            min_date: Some("2024-01-01".into()),
            max_date: Some("2024-12-31".into()),
            ..ValidationRule::default()
        });
        assert_eq!(
            validate_field(&f, Some(&AnswerValue::Text("2023-12-31".into()))).as_deref(),
            Some("Choose a date on or after 2024-01-01.")
        );
        assert_eq!(
            validate_field(&f, Some(&AnswerValue::Text("2025-01-01".into()))).as_deref(),
            Some("Choose a date on or before 2024-12-31.")
        );
        assert_eq!(
            validate_field(&f, Some(&AnswerValue::Text("2024-06-15".into()))),
            None
        );
    }

    #[test]
    fn hidden_required_fields_never_block_submission() {
        let gate = Field {
            id: "f1".to_string(),
            label: "Choice".to_string(),
            field_type: FieldType::SingleSelect,
            required: true,
            options: Some(vec!["Yes".into(), "No".into()]),
            ai_enabled: false,
            visibility: None,
            validation: None,
        };
        let mut detail = field(FieldType::LongText, true);
        detail.id = "f2".to_string();
        detail.visibility = Some(VisibilityRule {
            depends_on_id: "f1".to_string(),
            operator: VisibilityOperator::Equals,
            value: Some("Yes".to_string()),
        });
        let fields = vec![gate, detail];

        // "No" hides f2, so only f1 is validated and the submission passes.
        let answers = AnswerMap::from([("f1".to_string(), AnswerValue::Text("No".into()))]);
        assert!(validate_answers(&fields, &answers).is_empty());

        // An empty submission fails on f1 only; the hidden f2 stays silent.
        let errors = validate_answers(&fields, &AnswerMap::new());
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("f1").map(String::as_str), Some(REQUIRED_MESSAGE));

        // "Yes" reveals f2, which is now required.
        let answers = AnswerMap::from([("f1".to_string(), AnswerValue::Text("Yes".into()))]);
        let errors = validate_answers(&fields, &answers);
        assert_eq!(errors.keys().collect::<Vec<_>>(), ["f2"]);
    }
}
