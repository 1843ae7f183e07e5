//! REST client for the text-generation endpoint.
//!
//! Submits a fixed classification instruction block plus the survey text to
//! the `generateContent` endpoint using [`reqwest`], and returns the model's
//! raw text output.

use std::time::Duration;

use serde::Deserialize;

/// HTTP request timeout for one analysis call. The submission pipeline
/// treats a timeout like any other upstream failure and degrades.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Default base URL of the text-generation API.
pub const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com";

/// Sampling temperature for classification calls.
const TEMPERATURE: f64 = 0.1;

/// Output token cap; the requested JSON object is small.
const MAX_OUTPUT_TOKENS: u32 = 256;

/// Connection settings for the text-generation service.
#[derive(Debug, Clone)]
pub struct AnalysisSettings {
    /// API credential.
    pub api_key: String,
    /// Model name, e.g. `gemini-1.5-flash`.
    pub model: String,
    /// Base URL (override for tests and self-hosted gateways).
    pub api_url: String,
}

/// Errors from the text-generation API layer.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisApiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service returned a non-2xx status code.
    #[error("Text-generation API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}

/// HTTP client for the text-generation service.
pub struct AnalysisClient {
    client: reqwest::Client,
    settings: AnalysisSettings,
}

impl AnalysisClient {
    /// Create a new client with the given settings.
    pub fn new(settings: AnalysisSettings) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self { client, settings }
    }

    /// Model name used for calls (recorded on every analysis result).
    pub fn model(&self) -> &str {
        &self.settings.model
    }

    /// Submit the two text blocks for classification and return the model's
    /// raw text output. The caller extracts and normalizes the JSON.
    pub async fn generate(
        &self,
        free_text: &str,
        overall_text: &str,
        wants_sentiment: bool,
        wants_overall: bool,
    ) -> Result<String, AnalysisApiError> {
        let prompt = build_prompt(free_text, overall_text, wants_sentiment, wants_overall);
        let body = serde_json::json!({
            "contents": [
                {
                    "role": "user",
                    "parts": [{ "text": prompt }],
                }
            ],
            "generationConfig": {
                "temperature": TEMPERATURE,
                "maxOutputTokens": MAX_OUTPUT_TOKENS,
            },
        });

        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.settings.api_url, self.settings.model, self.settings.api_key
        );

        let response = self.client.post(url).json(&body).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AnalysisApiError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let data: GenerateContentResponse = response.json().await?;
        Ok(data.joined_text())
    }
}

/// Assemble the instruction block and input sections sent to the model.
fn build_prompt(
    free_text: &str,
    overall_text: &str,
    wants_sentiment: bool,
    wants_overall: bool,
) -> String {
    let instructions = [
        "You are an AI that classifies B2B survey responses.",
        "Return JSON only with keys: overallScore, sentimentLabel, confidence, keywords.",
        "overallScore: integer 1-10 or null if not requested.",
        "sentimentLabel: positive, neutral, negative, or needs_review.",
        "confidence: number 0-1.",
        "keywords: array of up to 6 short phrases.",
    ]
    .join("\n");

    let input_text = [
        "FREE_TEXT:",
        if free_text.is_empty() { "(none)" } else { free_text },
        "",
        "OVERALL_TEXT:",
        if overall_text.is_empty() { "(none)" } else { overall_text },
        "",
        &format!("REQUEST: sentiment={wants_sentiment}, overallScore={wants_overall}"),
    ]
    .join("\n");

    format!("{instructions}\n\n{input_text}")
}

// ---------------------------------------------------------------------------
// Response shape
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

#[derive(Debug, Default, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Default, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

impl GenerateContentResponse {
    /// Join the text of the first candidate's parts; empty when the model
    /// returned no candidates.
    fn joined_text(&self) -> String {
        self.candidates
            .first()
            .map(|candidate| {
                candidate
                    .content
                    .parts
                    .iter()
                    .map(|part| part.text.as_str())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}
