//! Generative-language-model API client.
//!
//! This module provides the interface for communicating with the Gemini
//! `generateContent` endpoint, used by both the relevance ranker and the
//! summarizer.
//!
//! # Architecture
//!
//! The module uses a trait-based design for flexibility:
//! - [`AskAsync`]: Core trait defining async model interaction
//! - [`GeminiClient`]: Implementation over `reqwest` and the v1beta REST API
//!
//! Prompt construction and response parsing live with their pipeline stages
//! (`ranker`, `summarizer`); this module only moves text to the model and
//! back, so the stages can be unit-tested against a mock implementation
//! without network access.
//!
//! # Failure Posture
//!
//! There is no retry here. Each stage issues one call and degrades to its
//! deterministic fallback on failure, which suits an unattended periodic
//! job better than stacking delays inside a single run.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::time::{Duration, Instant};
use tracing::{info, instrument, warn};

use crate::utils::truncate_for_log;

/// Fixed timeout for model calls, matching the page-fetch timeout.
const MODEL_TIMEOUT: Duration = Duration::from_secs(10);

/// Trait for async model interaction.
///
/// Implementors of this trait can send a prompt to a language model and
/// receive a response. This abstraction is the seam the ranker and
/// summarizer are generic over, so tests can substitute canned responses.
pub trait AskAsync {
    /// The type of response returned by the model.
    type Response;

    /// Send a prompt to the model and receive a response.
    ///
    /// # Arguments
    ///
    /// * `prompt` - The input text to send to the model
    ///
    /// # Returns
    ///
    /// The model's response, or an error if the request failed.
    async fn ask(&self, prompt: &str) -> Result<Self::Response, Box<dyn Error>>;
}

/// Client for the Gemini `generateContent` REST endpoint.
///
/// Holds its own `reqwest::Client` so the API credential travels in a
/// request header rather than through the shared page-fetching client.
#[derive(Debug)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    /// Create a client for the given credential and model name.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(api_key: &str, model: &str) -> Result<Self, Box<dyn Error>> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(4))
            .timeout(MODEL_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            api_key: api_key.to_string(),
            model: model.to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
        })
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

impl<'a> GenerateRequest<'a> {
    fn single_turn(prompt: &'a str) -> Self {
        Self {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<ResponseCandidate>,
}

#[derive(Debug, Deserialize)]
struct ResponseCandidate {
    content: ResponseContent,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

impl GenerateResponse {
    /// Concatenated text parts of the first candidate, if any.
    fn first_text(&self) -> Option<String> {
        let candidate = self.candidates.first()?;
        let text = candidate
            .content
            .parts
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("");
        if text.is_empty() { None } else { Some(text) }
    }
}

impl AskAsync for GeminiClient {
    type Response = String;

    #[instrument(level = "info", skip_all, fields(model = %self.model))]
    async fn ask(&self, prompt: &str) -> Result<String, Box<dyn Error>> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let request = GenerateRequest::single_turn(prompt);

        let t0 = Instant::now();
        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(
                %status,
                body_preview = %truncate_for_log(&body, 300),
                "Model endpoint returned error status"
            );
            return Err(format!("model endpoint returned {status}").into());
        }

        let body: GenerateResponse = response.json().await?;
        let text = body
            .first_text()
            .ok_or("model response contained no text")?;
        info!(
            elapsed_ms = t0.elapsed().as_millis() as u64,
            response_bytes = text.len(),
            "Model call succeeded"
        );
        Ok(text)
    }
}
