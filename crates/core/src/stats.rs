//! Response aggregation for the dashboard.
//!
//! Computed on demand over an in-memory response set; nothing here is
//! persisted. The lexicon sentiment tally is a second, independent signal
//! from the per-response LLM labels and is deliberately not reconciled with
//! them.

use indexmap::IndexMap;
use regex::Regex;
use serde::Serialize;

use crate::answer::{format_answer, AnswerMap, AnswerValue};
use crate::field::{Field, FieldType};
use crate::validation::required_satisfied;

/// Number of keywords reported by [`keyword_frequency`].
pub const TOP_KEYWORD_LIMIT: usize = 6;

/// Fixed opinion lexicon for the heuristic sentiment tally.
pub const POSITIVE_WORDS: [&str; 10] = [
    "good",
    "great",
    "excellent",
    "love",
    "helpful",
    "satisfied",
    "easy",
    "fast",
    "amazing",
    "useful",
];

pub const NEGATIVE_WORDS: [&str; 10] = [
    "bad",
    "poor",
    "slow",
    "difficult",
    "hate",
    "confusing",
    "expensive",
    "broken",
    "disappointed",
    "unreliable",
];

/// Selection counts for one select-type field, keyed by declared option in
/// declared order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionDistribution {
    pub field_id: String,
    pub label: String,
    pub counts: IndexMap<String, u64>,
}

/// One entry of the top-keywords list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordCount {
    pub keyword: String,
    pub count: u64,
}

/// Lexicon-based sentiment tally over the response set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SentimentTally {
    pub positive: u64,
    pub neutral: u64,
    pub negative: u64,
}

/// Summary statistics for one form's responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseStats {
    pub response_count: usize,
    /// Mean per-response required-field completion, as a rounded percentage.
    pub completion_rate_pct: u32,
    /// Mean count of fields with any non-empty answer, rounded.
    pub avg_answered_fields: u32,
    pub option_distribution: Vec<OptionDistribution>,
    pub top_keywords: Vec<KeywordCount>,
    pub sentiment: SentimentTally,
}

/// Compute all dashboard statistics for a form over its responses.
pub fn compute_stats(fields: &[Field], responses: &[AnswerMap]) -> ResponseStats {
    ResponseStats {
        response_count: responses.len(),
        completion_rate_pct: completion_rate_pct(fields, responses),
        avg_answered_fields: avg_answered_fields(fields, responses),
        option_distribution: option_distribution(fields, responses),
        top_keywords: keyword_frequency(fields, responses),
        sentiment: sentiment_tally(fields, responses),
    }
}

/// Per response: answered required fields over all required fields (the
/// §-required presence rules, without the visible-only gate), averaged and
/// expressed as a rounded percentage. Forms with zero required fields count
/// each response as fully complete. Zero responses yield 0.
pub fn completion_rate_pct(fields: &[Field], responses: &[AnswerMap]) -> u32 {
    if responses.is_empty() {
        return 0;
    }
    let required: Vec<&Field> = fields.iter().filter(|field| field.required).collect();
    let total: f64 = responses
        .iter()
        .map(|answers| {
            if required.is_empty() {
                return 1.0;
            }
            let answered = required
                .iter()
                .filter(|field| required_satisfied(field, answers.get(&field.id)))
                .count();
            answered as f64 / required.len() as f64
        })
        .sum();
    ((total / responses.len() as f64) * 100.0).round() as u32
}

/// Mean count of fields with any non-empty answer, rounded to the nearest
/// integer. An answer is non-empty when it renders to a non-empty string
/// (so an unticked checkbox still counts as answered).
pub fn avg_answered_fields(fields: &[Field], responses: &[AnswerMap]) -> u32 {
    if responses.is_empty() {
        return 0;
    }
    let total: usize = responses
        .iter()
        .map(|answers| {
            fields
                .iter()
                .filter(|field| !format_answer(answers.get(&field.id)).is_empty())
                .count()
        })
        .sum();
    (total as f64 / responses.len() as f64).round() as u32
}

/// Per select-type field, how many responses selected each declared option.
/// Multi-select counts every selected option once per response; values not
/// in the declared list are ignored.
pub fn option_distribution(fields: &[Field], responses: &[AnswerMap]) -> Vec<OptionDistribution> {
    fields
        .iter()
        .filter(|field| field.field_type.is_select())
        .map(|field| {
            let mut counts: IndexMap<String, u64> = field
                .options
                .iter()
                .flatten()
                .map(|option| (option.clone(), 0))
                .collect();
            for answers in responses {
                match answers.get(&field.id) {
                    Some(AnswerValue::Text(selected)) => {
                        if let Some(count) = counts.get_mut(selected) {
                            *count += 1;
                        }
                    }
                    Some(AnswerValue::Multi(items)) => {
                        let mut seen: Vec<&str> = Vec::new();
                        for item in items {
                            if seen.contains(&item.as_str()) {
                                continue;
                            }
                            seen.push(item.as_str());
                            if let Some(count) = counts.get_mut(item) {
                                *count += 1;
                            }
                        }
                    }
                    _ => {}
                }
            }
            OptionDistribution {
                field_id: field.id.clone(),
                label: field.label.clone(),
                counts,
            }
        })
        .collect()
}

/// Lowercase tokens split on whitespace/punctuation, dropping tokens shorter
/// than 2 characters or purely numeric.
fn tokenize(text: &str) -> Vec<String> {
    let separators = Regex::new(r"[\W_]+").expect("tokenizer pattern is valid");
    separators
        .split(&text.to_lowercase())
        .filter(|token| token.chars().count() >= 2)
        .filter(|token| !token.chars().all(char::is_numeric))
        .map(str::to_string)
        .collect()
}

/// Top keywords over the free-text answers, by frequency; ties keep
/// first-encountered order (responses in list order, fields in form order).
pub fn keyword_frequency(fields: &[Field], responses: &[AnswerMap]) -> Vec<KeywordCount> {
    let mut counts: IndexMap<String, u64> = IndexMap::new();
    for answers in responses {
        for field in fields.iter().filter(|f| f.field_type.is_free_text()) {
            if let Some(AnswerValue::Text(text)) = answers.get(&field.id) {
                for token in tokenize(text) {
                    *counts.entry(token).or_insert(0) += 1;
                }
            }
        }
    }
    let mut entries: Vec<(String, u64)> = counts.into_iter().collect();
    // Stable sort: equal counts keep insertion (first-encountered) order.
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    entries
        .into_iter()
        .take(TOP_KEYWORD_LIMIT)
        .map(|(keyword, count)| KeywordCount { keyword, count })
        .collect()
}

/// Classify each response by the sign of positive-word minus negative-word
/// occurrences across all its answer text, and tally the classes.
pub fn sentiment_tally(fields: &[Field], responses: &[AnswerMap]) -> SentimentTally {
    let mut tally = SentimentTally::default();
    for answers in responses {
        let text = fields
            .iter()
            .map(|field| format_answer(answers.get(&field.id)))
            .filter(|value| !value.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        let score: i64 = tokenize(&text)
            .iter()
            .map(|token| {
                if POSITIVE_WORDS.contains(&token.as_str()) {
                    1
                } else if NEGATIVE_WORDS.contains(&token.as_str()) {
                    -1
                } else {
                    0
                }
            })
            .sum();
        match score.cmp(&0) {
            std::cmp::Ordering::Greater => tally.positive += 1,
            std::cmp::Ordering::Equal => tally.neutral += 1,
            std::cmp::Ordering::Less => tally.negative += 1,
        }
    }
    tally
}
