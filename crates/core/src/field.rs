//! Survey field definitions.
//!
//! A form's `fields` document is an ordered array of [`Field`] objects. The
//! wire format uses camelCase keys so documents exported from other tooling
//! round-trip unchanged.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// The kind of question a field asks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    ShortText,
    LongText,
    SingleSelect,
    MultiSelect,
    Date,
    Checkbox,
}

impl FieldType {
    /// Whether this type carries an `options` list.
    pub fn is_select(self) -> bool {
        matches!(self, FieldType::SingleSelect | FieldType::MultiSelect)
    }

    /// Whether answers to this type are free text (eligible for AI analysis).
    pub fn is_free_text(self) -> bool {
        matches!(self, FieldType::ShortText | FieldType::LongText)
    }
}

/// Comparison operator for a [`VisibilityRule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisibilityOperator {
    Equals,
    NotEquals,
    Includes,
    Checked,
}

/// Makes a field's display depend on another field's answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibilityRule {
    /// Id of the field whose answer drives the condition.
    pub depends_on_id: String,
    pub operator: VisibilityOperator,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// Optional per-field constraints beyond `required`.
///
/// Length bounds apply to string answers of any type; date bounds apply to
/// `date` fields only and are ISO `YYYY-MM-DD` strings (lexicographic
/// comparison is correct for that format). A bound of zero or an empty date
/// string is treated as unset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_date: Option<String>,
}

/// One question definition within a form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    /// Present iff `field_type` is a select type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    /// Marks the field's answer as input for sentiment analysis.
    #[serde(default)]
    pub ai_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<VisibilityRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationRule>,
}

/// Normalize a field list before saving.
///
/// Select-type fields keep only non-blank options (always materialized as a
/// list, possibly empty); every other type has `options` removed.
pub fn sanitize_fields(fields: Vec<Field>) -> Vec<Field> {
    fields
        .into_iter()
        .map(|mut field| {
            if field.field_type.is_select() {
                let options = field
                    .options
                    .unwrap_or_default()
                    .into_iter()
                    .filter(|option| !option.trim().is_empty())
                    .collect();
                field.options = Some(options);
            } else {
                field.options = None;
            }
            field
        })
        .collect()
}

/// Structural check run at form save time.
///
/// Rejects duplicate field ids, visibility rules that reference the field
/// itself or a field not in the form, and dependency cycles. Submission-time
/// visibility evaluation assumes this has passed and never recurses.
pub fn check_field_graph(fields: &[Field]) -> Result<(), CoreError> {
    let mut ids: HashSet<&str> = HashSet::new();
    for field in fields {
        if !ids.insert(field.id.as_str()) {
            return Err(CoreError::Validation(format!(
                "Duplicate field id: {}",
                field.id
            )));
        }
    }

    let mut edges: HashMap<&str, &str> = HashMap::new();
    for field in fields {
        let Some(rule) = &field.visibility else {
            continue;
        };
        if rule.depends_on_id.is_empty() {
            continue;
        }
        if rule.depends_on_id == field.id {
            return Err(CoreError::Validation(format!(
                "Field '{}' cannot depend on itself",
                field.id
            )));
        }
        if !ids.contains(rule.depends_on_id.as_str()) {
            return Err(CoreError::Validation(format!(
                "Field '{}' depends on unknown field '{}'",
                field.id, rule.depends_on_id
            )));
        }
        edges.insert(field.id.as_str(), rule.depends_on_id.as_str());
    }

    // Each field has at most one outgoing dependency, so a cycle is found by
    // walking the chain from every field until it terminates or repeats.
    for field in fields {
        let mut seen: HashSet<&str> = HashSet::from([field.id.as_str()]);
        let mut current = field.id.as_str();
        while let Some(&next) = edges.get(current) {
            if !seen.insert(next) {
                return Err(CoreError::Validation(format!(
                    "Visibility rules form a cycle involving field '{next}'"
                )));
            }
            current = next;
        }
    }

    Ok(())
}
