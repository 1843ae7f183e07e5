//! Answer values and their presence/formatting rules.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One respondent's answer to a single field.
///
/// The wire shape is untagged: a bool (checkbox), a string (text, select,
/// date), a string array (multi-select), or null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Checked(bool),
    Text(String),
    Multi(Vec<String>),
    Null,
}

/// The full answer set of a response, keyed by field id.
pub type AnswerMap = HashMap<String, AnswerValue>;

/// Whether an answer slot is empty for the purposes of the optional-field
/// short-circuit: absent, null, or the empty string.
pub fn is_blank(value: Option<&AnswerValue>) -> bool {
    match value {
        None | Some(AnswerValue::Null) => true,
        Some(AnswerValue::Text(text)) => text.is_empty(),
        _ => false,
    }
}

/// Render an answer for display, CSV-style export, and AI prompt text.
///
/// Multi-select answers join with " / ", checkboxes become "yes"/"no",
/// everything empty renders as "".
pub fn format_answer(value: Option<&AnswerValue>) -> String {
    match value {
        Some(AnswerValue::Multi(items)) => items.join(" / "),
        Some(AnswerValue::Checked(true)) => "yes".to_string(),
        Some(AnswerValue::Checked(false)) => "no".to_string(),
        Some(AnswerValue::Text(text)) => text.clone(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_each_wire_shape() {
        let json = serde_json::json!({
            "f1": "hello",
            "f2": ["a", "b"],
            "f3": true,
            "f4": null
        });
        let answers: AnswerMap = serde_json::from_value(json).unwrap();
        assert_eq!(answers["f1"], AnswerValue::Text("hello".into()));
        assert_eq!(answers["f2"], AnswerValue::Multi(vec!["a".into(), "b".into()]));
        assert_eq!(answers["f3"], AnswerValue::Checked(true));
        assert_eq!(answers["f4"], AnswerValue::Null);
    }

    #[test]
    fn blank_covers_absent_null_and_empty_string() {
        assert!(is_blank(None));
        assert!(is_blank(Some(&AnswerValue::Null)));
        assert!(is_blank(Some(&AnswerValue::Text(String::new()))));
        assert!(!is_blank(Some(&AnswerValue::Text("x".into()))));
        assert!(!is_blank(Some(&AnswerValue::Checked(false))));
        assert!(!is_blank(Some(&AnswerValue::Multi(vec![]))));
    }

    #[test]
    fn formats_answers_for_display() {
        assert_eq!(
            format_answer(Some(&AnswerValue::Multi(vec!["a".into(), "b".into()]))),
            "a / b"
        );
        assert_eq!(format_answer(Some(&AnswerValue::Checked(true))), "yes");
        assert_eq!(format_answer(Some(&AnswerValue::Checked(false))), "no");
        assert_eq!(format_answer(Some(&AnswerValue::Null)), "");
        assert_eq!(format_answer(None), "");
    }
}
