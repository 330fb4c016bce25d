use tracing::{debug, warn};

use crate::chat::client::ChatProvider;
use crate::chat::dto::{ChatResponse, ChatSource};
use crate::chat::faq;
use crate::error::ApiError;

pub const SYSTEM_PROMPT: &str = "You are NAVIGo's travel assistant, helping travellers plan \
trips within India. Be friendly and practical. Keep every answer under 200 words. \
If a question is not about travel, gently steer back to travel in India.";

pub const NOT_CONFIGURED: &str = "I'm sorry, the AI assistant is not configured right now. \
Try asking about bookings, payments, cancellations, weather or trip planning.";

pub const APOLOGY: &str = "I apologize, but I'm having trouble processing your request \
right now. Please try again later.";

/// Answers from the FAQ table first, then the generative provider.
/// Provider trouble becomes a canned answer, never an error.
pub async fn ask(provider: Option<&dyn ChatProvider>, message: &str) -> Result<ChatResponse, ApiError> {
    let message = message.trim();
    if message.is_empty() {
        return Err(ApiError::validation("Message is required"));
    }

    if let Some(entry) = faq::match_faq(message) {
        debug!(question = entry.question, "faq answer");
        return Ok(ChatResponse {
            response: entry.answer.to_string(),
            source: ChatSource::Faq,
        });
    }

    let Some(provider) = provider else {
        return Ok(ChatResponse {
            response: NOT_CONFIGURED.to_string(),
            source: ChatSource::Fallback,
        });
    };

    let prompt = format!(
        "Frequently asked questions:\n\n{}\n\nTraveller question: {}",
        faq::context(),
        message
    );
    match provider.generate(SYSTEM_PROMPT, &prompt).await {
        Ok(answer) => Ok(ChatResponse {
            response: answer,
            source: ChatSource::Gemini,
        }),
        Err(err) => {
            warn!(error = %err, "chat provider failed");
            Ok(ChatResponse {
                response: APOLOGY.to_string(),
                source: ChatSource::Error,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct Echo {
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ChatProvider for Echo {
        async fn generate(&self, system: &str, prompt: &str) -> anyhow::Result<String> {
            assert!(system.contains("200 words"));
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok("Try Hampi in winter.".into())
        }
    }

    struct Broken;

    #[async_trait]
    impl ChatProvider for Broken {
        async fn generate(&self, _system: &str, _prompt: &str) -> anyhow::Result<String> {
            anyhow::bail!("operation timed out")
        }
    }

    #[tokio::test]
    async fn empty_message_is_rejected() {
        let err = ask(None, "   ").await.unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn faq_is_tried_first() {
        let echo = Echo { prompts: Mutex::new(Vec::new()) };
        let r = ask(Some(&echo), "What payment options do you take?").await.unwrap();
        assert_eq!(r.source, ChatSource::Faq);
        assert!(echo.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unmatched_goes_to_provider_with_faq_context() {
        let echo = Echo { prompts: Mutex::new(Vec::new()) };
        let r = ask(Some(&echo), "Tell me about Hampi").await.unwrap();
        assert_eq!(r.source, ChatSource::Gemini);
        assert_eq!(r.response, "Try Hampi in winter.");
        let prompts = echo.prompts.lock().unwrap();
        assert!(prompts[0].contains("Tell me about Hampi"));
        assert!(prompts[0].contains("How do I book a trip?"));
    }

    #[tokio::test]
    async fn missing_provider_falls_back() {
        let r = ask(None, "Tell me about Hampi").await.unwrap();
        assert_eq!(r.source, ChatSource::Fallback);
        assert_eq!(r.response, NOT_CONFIGURED);
    }

    #[tokio::test]
    async fn provider_failure_apologizes() {
        let r = ask(Some(&Broken), "Tell me about Hampi").await.unwrap();
        assert_eq!(r.source, ChatSource::Error);
        assert_eq!(r.response, APOLOGY);
    }

    #[test]
    fn source_serializes_lowercase() {
        assert_eq!(serde_json::to_value(ChatSource::Gemini).unwrap(), "gemini");
    }
}
