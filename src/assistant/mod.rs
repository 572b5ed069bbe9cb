//! Health chat assistant.
//!
//! A single-turn prompt goes to a hosted model; failures are turned into
//! localized fallback text so the chat screen always has something to show.

pub mod gemini;

pub use gemini::GeminiClient;

use async_trait::async_trait;
use thiserror::Error;

use crate::i18n::Locale;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AssistantError {
    #[error("Assistant quota exceeded")]
    QuotaExceeded,

    #[error("Assistant API key rejected: {0}")]
    ApiKey(String),

    #[error("Cannot reach assistant service: {0}")]
    Network(String),

    #[error("Assistant service error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Malformed assistant response: {0}")]
    ResponseParsing(String),

    #[error("Assistant returned no text")]
    EmptyReply,

    #[error("HTTP client error: {0}")]
    HttpClient(String),
}

impl AssistantError {
    pub fn user_message(&self, locale: Locale) -> &'static str {
        let s = locale.strings();
        match self {
            Self::QuotaExceeded => s.assistant_quota,
            Self::ApiKey(_) => s.assistant_api_key,
            Self::Network(_) => s.assistant_network,
            Self::EmptyReply => s.assistant_no_reply,
            Self::Api { .. } | Self::ResponseParsing(_) | Self::HttpClient(_) => {
                s.assistant_generic
            }
        }
    }
}

/// Text generation backend.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, AssistantError>;
}

/// Send `prompt` and return the reply, or the localized fallback for
/// whatever went wrong.
pub async fn ask(model: &dyn ChatModel, prompt: &str, locale: Locale) -> String {
    match model.generate(prompt).await {
        Ok(reply) => reply,
        Err(e) => {
            tracing::warn!(error = %e, "Assistant request failed");
            e.user_message(locale).to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ScriptedModel(Result<String, AssistantError>);

    #[async_trait]
    impl ChatModel for ScriptedModel {
        async fn generate(&self, _prompt: &str) -> Result<String, AssistantError> {
            self.0.clone()
        }
    }

    #[tokio::test]
    async fn reply_passed_through() {
        let model = ScriptedModel(Ok("Drink water.".into()));
        assert_eq!(ask(&model, "hi", Locale::En).await, "Drink water.");
    }

    #[tokio::test]
    async fn quota_maps_to_fallback() {
        let model = ScriptedModel(Err(AssistantError::QuotaExceeded));
        assert_eq!(
            ask(&model, "hi", Locale::En).await,
            Locale::En.strings().assistant_quota
        );
    }

    #[tokio::test]
    async fn empty_reply_maps_to_no_reply_text() {
        let model = ScriptedModel(Err(AssistantError::EmptyReply));
        assert_eq!(
            ask(&model, "hi", Locale::Ar).await,
            Locale::Ar.strings().assistant_no_reply
        );
    }

    #[test]
    fn unexpected_errors_share_generic_text() {
        let api = AssistantError::Api { status: 500, body: "boom".into() };
        let parse = AssistantError::ResponseParsing("eof".into());
        assert_eq!(api.user_message(Locale::Tr), parse.user_message(Locale::Tr));
        assert_ne!(
            api.user_message(Locale::En),
            AssistantError::Network("down".into()).user_message(Locale::En)
        );
    }
}
