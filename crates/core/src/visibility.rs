//! Conditional visibility resolver.
//!
//! Determines, per field, whether it should be shown (and therefore
//! validated) based on another field's current answer. Pure function of the
//! answer state; callers re-evaluate on every answer change. A field whose
//! dependency is itself hidden is still evaluated against whatever answer
//! value exists for that dependency.

use crate::answer::{AnswerMap, AnswerValue};
use crate::field::{Field, VisibilityOperator};

/// Stringify an answer the way equality operators compare it: absent and
/// null become "", booleans become "true"/"false", and multi-select answers
/// join their entries with commas.
fn stringify(value: Option<&AnswerValue>) -> String {
    match value {
        None | Some(AnswerValue::Null) => String::new(),
        Some(AnswerValue::Text(text)) => text.clone(),
        Some(AnswerValue::Checked(checked)) => checked.to_string(),
        Some(AnswerValue::Multi(items)) => items.join(","),
    }
}

/// Evaluate a field's visibility rule against the current answers.
///
/// Fields without a rule (or with an empty dependency id) are always
/// visible.
pub fn is_visible(field: &Field, answers: &AnswerMap) -> bool {
    let Some(rule) = &field.visibility else {
        return true;
    };
    if rule.depends_on_id.is_empty() {
        return true;
    }

    let target = answers.get(&rule.depends_on_id);
    let expected = rule.value.clone().unwrap_or_default();

    match rule.operator {
        VisibilityOperator::Checked => matches!(target, Some(AnswerValue::Checked(true))),
        VisibilityOperator::Includes => match target {
            Some(AnswerValue::Multi(items)) => items.iter().any(|item| *item == expected),
            Some(AnswerValue::Text(text)) => text.contains(&expected),
            _ => false,
        },
        VisibilityOperator::NotEquals => stringify(target) != expected,
        VisibilityOperator::Equals => stringify(target) == expected,
    }
}

/// The subset of `fields` currently visible, in form order.
pub fn visible_fields<'a>(fields: &'a [Field], answers: &AnswerMap) -> Vec<&'a Field> {
    fields
        .iter()
        .filter(|field| is_visible(field, answers))
        .collect()
}
