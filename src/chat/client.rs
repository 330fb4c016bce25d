use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};

#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Generates an answer to `prompt` under the `system` instruction.
    async fn generate(&self, system: &str, prompt: &str) -> anyhow::Result<String>;
}

/// Gemini `generateContent` client.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(url: &str, model: &str, api_key: &str, timeout_secs: u64) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("build chat http client")?;
        Ok(Self {
            client,
            endpoint: format!("{}/models/{}:generateContent", url.trim_end_matches('/'), model),
            api_key: api_key.to_string(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

pub(crate) fn request_body(system: &str, prompt: &str) -> Value {
    json!({
        "systemInstruction": { "parts": [{ "text": system }] },
        "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
        "generationConfig": { "maxOutputTokens": 400, "temperature": 0.7 }
    })
}

/// Text of the first candidate; an empty answer is an error.
pub(crate) fn parse_answer(raw: Value) -> anyhow::Result<String> {
    let parsed: GenerateResponse = serde_json::from_value(raw).context("decode chat response")?;
    let text = parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().map(|p| p.text).collect::<String>())
        .unwrap_or_default();
    let text = text.trim();
    anyhow::ensure!(!text.is_empty(), "empty chat answer");
    Ok(text.to_string())
}

#[async_trait]
impl ChatProvider for GeminiClient {
    async fn generate(&self, system: &str, prompt: &str) -> anyhow::Result<String> {
        let raw: Value = self
            .client
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&request_body(system, prompt))
            .send()
            .await
            .context("chat request")?
            .error_for_status()
            .context("chat status")?
            .json()
            .await
            .context("chat body")?;
        parse_answer(raw)
    }
}
