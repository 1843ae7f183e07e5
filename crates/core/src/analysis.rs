//! Analysis-result schema and best-effort normalization of model output.
//!
//! The external text-generation service is asked for a JSON object with the
//! keys `overallScore`, `sentimentLabel`, `confidence`, `keywords`. Model
//! output is messy: this module extracts the JSON (tolerating prose around
//! it), coerces each key into the fixed [`AnalysisResult`] schema, and
//! applies the low-confidence override. A parse failure is never an error;
//! it degrades to the same defaults an empty input produces.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::answer::{format_answer, AnswerMap};
use crate::field::Field;

/// Maximum number of keywords retained from the model output.
pub const KEYWORD_LIMIT: usize = 6;

/// Default minimum confidence when a form does not configure one.
pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.6;

/// Sentiment classification of a response's free text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
    NeedsReview,
}

impl SentimentLabel {
    /// Map a raw label string to the enum; anything unrecognized collapses
    /// to `NeedsReview`.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "positive" => SentimentLabel::Positive,
            "neutral" => SentimentLabel::Neutral,
            "negative" => SentimentLabel::Negative,
            _ => SentimentLabel::NeedsReview,
        }
    }
}

/// Normalized output of one analysis call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Overall score in 1..=10, present only when requested and parseable.
    pub overall_score: Option<i32>,
    pub sentiment_label: SentimentLabel,
    /// Model-reported confidence clamped to [0, 1]; 0 when unparseable.
    pub confidence: f64,
    /// At most [`KEYWORD_LIMIT`] short phrases.
    pub keywords: Vec<String>,
    pub model: String,
}

impl AnalysisResult {
    /// The degraded default attached when analysis is skipped or fails.
    pub fn degraded(model: impl Into<String>) -> Self {
        AnalysisResult {
            overall_score: None,
            sentiment_label: SentimentLabel::NeedsReview,
            confidence: 0.0,
            keywords: Vec::new(),
            model: model.into(),
        }
    }
}

/// Build the `Q:<label>\nA:<answer>` prompt block over the given fields.
///
/// Fields with an empty formatted answer are skipped; blocks join with a
/// blank line. An empty result means there is nothing to analyze.
pub fn build_ai_text<'a>(
    fields: impl IntoIterator<Item = &'a Field>,
    answers: &AnswerMap,
) -> String {
    fields
        .into_iter()
        .filter_map(|field| {
            let value = format_answer(answers.get(&field.id));
            if value.is_empty() {
                None
            } else {
                Some(format!("Q:{}\nA:{}", field.label, value))
            }
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Parse model output as JSON, falling back to the first `{...}` substring
/// (first opening brace to last closing brace) when the raw text has prose
/// around the object. Returns `None` when neither parses.
pub fn extract_json(raw: &str) -> Option<Value> {
    if let Ok(value) = serde_json::from_str(raw) {
        return Some(value);
    }
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end < start {
        return None;
    }
    serde_json::from_str(&raw[start..=end]).ok()
}

/// Coerce a parsed value into a finite float. Accepts numbers and numeric
/// strings, mirroring the loose typing of model output.
fn to_finite_f64(value: Option<&Value>) -> Option<f64> {
    let number = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    number.is_finite().then_some(number)
}

/// Normalize a parsed model object into the fixed result schema.
///
/// - `overall_score`: null unless `wants_overall` and the value (under
///   `overallScore` or `score`) is numeric; rounded and clamped to 1..=10.
/// - `sentiment_label`: one of the enum labels (under `sentimentLabel` or
///   `sentiment`); anything else, or `wants_sentiment = false`, collapses to
///   `needs_review`.
/// - `confidence`: clamped to [0, 1], 0 when non-numeric.
/// - `keywords`: first [`KEYWORD_LIMIT`] string entries.
/// - Low-confidence override: `confidence < min_confidence` forces
///   `needs_review` while leaving the score as computed.
pub fn normalize(
    parsed: &Value,
    wants_sentiment: bool,
    wants_overall: bool,
    min_confidence: f64,
    model: &str,
) -> AnalysisResult {
    let score_value = parsed
        .get("overallScore")
        .filter(|value| !value.is_null())
        .or_else(|| parsed.get("score"));
    let overall_score = match to_finite_f64(score_value) {
        Some(score) if wants_overall => Some(score.round().clamp(1.0, 10.0) as i32),
        _ => None,
    };

    let raw_label = parsed
        .get("sentimentLabel")
        .and_then(Value::as_str)
        .or_else(|| parsed.get("sentiment").and_then(Value::as_str))
        .unwrap_or("needs_review");
    let mut sentiment_label = if wants_sentiment {
        SentimentLabel::parse(raw_label)
    } else {
        SentimentLabel::NeedsReview
    };

    let confidence = to_finite_f64(parsed.get("confidence"))
        .map(|value| value.clamp(0.0, 1.0))
        .unwrap_or(0.0);

    if confidence < min_confidence {
        sentiment_label = SentimentLabel::NeedsReview;
    }

    let keywords = parsed
        .get("keywords")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .take(KEYWORD_LIMIT)
                .collect()
        })
        .unwrap_or_default();

    AnalysisResult {
        overall_score,
        sentiment_label,
        confidence,
        keywords,
        model: model.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answer::AnswerValue;
    use crate::field::FieldType;
    use serde_json::json;

    fn field(id: &str, label: &str) -> Field {
        Field {
            id: id.to_string(),
            label: label.to_string(),
            field_type: FieldType::LongText,
            required: false,
            options: None,
            ai_enabled: true,
            visibility: None,
            validation: None,
        }
    }

    #[test]
    fn builds_prompt_blocks_skipping_empty_answers() {
        let fields = vec![field("f1", "Feedback"), field("f2", "Ideas")];
        let answers = AnswerMap::from([
            ("f1".to_string(), AnswerValue::Text("Works well".into())),
            ("f2".to_string(), AnswerValue::Text(String::new())),
        ]);
        assert_eq!(build_ai_text(&fields, &answers), "Q:Feedback\nA:Works well");
    }

    #[test]
    fn extracts_direct_json() {
        let value = extract_json(r#"{"confidence": 0.8}"#).unwrap();
        assert_eq!(value["confidence"], 0.8);
    }

    #[test]
    fn extracts_embedded_json_from_prose() {
        let raw = "Here is the result:\n```json\n{\"sentimentLabel\": \"positive\"}\n```";
        let value = extract_json(raw).unwrap();
        assert_eq!(value["sentimentLabel"], "positive");
    }

    #[test]
    fn extraction_fails_without_an_object() {
        assert!(extract_json("no json here").is_none());
        assert!(extract_json("} backwards {").is_none());
    }

    #[test]
    fn normalizes_out_of_range_score_and_long_keyword_list() {
        let parsed = json!({
            "overallScore": 12.6,
            "sentimentLabel": "positive",
            "confidence": 0.9,
            "keywords": ["a", "b", "c", "d", "e", "f", "g"]
        });
        let result = normalize(&parsed, true, true, 0.6, "test-model");
        assert_eq!(result.overall_score, Some(10));
        assert_eq!(result.sentiment_label, SentimentLabel::Positive);
        assert_eq!(result.keywords.len(), KEYWORD_LIMIT);
        assert_eq!(result.model, "test-model");
    }

    #[test]
    fn score_is_null_when_overall_not_requested() {
        let parsed = json!({"overallScore": 7, "confidence": 0.9});
        let result = normalize(&parsed, true, false, 0.0, "m");
        assert_eq!(result.overall_score, None);
    }

    #[test]
    fn score_accepts_fallback_key_and_numeric_strings() {
        let parsed = json!({"score": "4", "confidence": 1});
        let result = normalize(&parsed, false, true, 0.0, "m");
        assert_eq!(result.overall_score, Some(4));
    }

    #[test]
    fn unknown_sentiment_collapses_to_needs_review() {
        let parsed = json!({"sentimentLabel": "ecstatic", "confidence": 0.9});
        let result = normalize(&parsed, true, false, 0.0, "m");
        assert_eq!(result.sentiment_label, SentimentLabel::NeedsReview);
    }

    #[test]
    fn sentiment_ignored_when_not_requested() {
        let parsed = json!({"sentimentLabel": "positive", "confidence": 0.9});
        let result = normalize(&parsed, false, false, 0.0, "m");
        assert_eq!(result.sentiment_label, SentimentLabel::NeedsReview);
    }

    #[test]
    fn confidence_clamps_and_defaults() {
        let parsed = json!({"confidence": 1.7});
        assert_eq!(normalize(&parsed, false, false, 0.0, "m").confidence, 1.0);

        let parsed = json!({"confidence": "not a number"});
        assert_eq!(normalize(&parsed, false, false, 0.0, "m").confidence, 0.0);
    }

    #[test]
    fn low_confidence_forces_needs_review_but_keeps_score() {
        let parsed = json!({
            "overallScore": 8,
            "sentimentLabel": "positive",
            "confidence": 0.3
        });
        let result = normalize(&parsed, true, true, 0.6, "m");
        assert_eq!(result.sentiment_label, SentimentLabel::NeedsReview);
        assert_eq!(result.overall_score, Some(8));
    }

    #[test]
    fn non_string_keywords_are_dropped() {
        let parsed = json!({"keywords": ["a", 1, null, "b"], "confidence": 1});
        let result = normalize(&parsed, false, false, 0.0, "m");
        assert_eq!(result.keywords, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn degraded_default_matches_empty_input_contract() {
        let result = AnalysisResult::degraded("m");
        assert_eq!(result.overall_score, None);
        assert_eq!(result.sentiment_label, SentimentLabel::NeedsReview);
        assert_eq!(result.confidence, 0.0);
        assert!(result.keywords.is_empty());
    }
}
