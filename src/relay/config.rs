//! Configuration for the remote AI endpoints.
//!
//! The only required setting is the API credential; model and voice
//! identifiers have fixed defaults overridable through the environment.

use crate::{AquadeskError, Result};
use std::env;

/// System instruction sent with every text and voice request.
pub const SYSTEM_INSTRUCTION: &str = "You are an expert AI assistant for an aquaculture \
management system. Provide helpful, professional advice regarding fish farming, water \
quality, and environmental conditions. Use markdown for rich text formatting. Keep \
responses professional yet accessible.";

const DEFAULT_TEXT_MODEL: &str = "gemini-3-flash-preview";
const DEFAULT_LIVE_MODEL: &str = "models/gemini-2.0-flash-live-001";
const DEFAULT_VOICE: &str = "Puck";

const TEXT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
const LIVE_ENDPOINT: &str = "wss://generativelanguage.googleapis.com/ws/google.ai.generativelanguage.v1beta.GenerativeService.BidiGenerateContent";

#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub api_key: String,
    pub text_model: String,
    pub live_model: String,
    /// Prebuilt voice identifier for spoken responses.
    pub voice: String,
    pub system_instruction: String,
    text_endpoint: String,
    live_endpoint: String,
}

impl RelayConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            live_model: DEFAULT_LIVE_MODEL.to_string(),
            voice: DEFAULT_VOICE.to_string(),
            system_instruction: SYSTEM_INSTRUCTION.to_string(),
            text_endpoint: TEXT_ENDPOINT.to_string(),
            live_endpoint: LIVE_ENDPOINT.to_string(),
        }
    }

    /// Build from the environment. `GEMINI_API_KEY` is required; model and
    /// voice identifiers may be overridden.
    pub fn from_env() -> Result<Self> {
        let api_key = env::var("GEMINI_API_KEY")
            .map_err(|_| AquadeskError::ConfigError("GEMINI_API_KEY is not set".into()))?;

        let mut config = Self::new(api_key);
        if let Ok(model) = env::var("AQUADESK_TEXT_MODEL") {
            config.text_model = model;
        }
        if let Ok(model) = env::var("AQUADESK_LIVE_MODEL") {
            config.live_model = model;
        }
        if let Ok(voice) = env::var("AQUADESK_VOICE") {
            config.voice = voice;
        }
        Ok(config)
    }

    pub fn with_text_model(mut self, model: impl Into<String>) -> Self {
        self.text_model = model.into();
        self
    }

    pub fn with_live_model(mut self, model: impl Into<String>) -> Self {
        self.live_model = model.into();
        self
    }

    pub fn with_voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = voice.into();
        self
    }

    /// Override the endpoint bases (used by tests against a local server).
    pub fn with_endpoints(
        mut self,
        text_endpoint: impl Into<String>,
        live_endpoint: impl Into<String>,
    ) -> Self {
        self.text_endpoint = text_endpoint.into();
        self.live_endpoint = live_endpoint.into();
        self
    }

    /// SSE streaming route for text generation.
    pub fn stream_url(&self) -> String {
        format!(
            "{}/models/{}:streamGenerateContent?alt=sse&key={}",
            self.text_endpoint, self.text_model, self.api_key
        )
    }

    /// WebSocket route for the bidirectional voice session.
    pub fn live_url(&self) -> String {
        format!("{}?key={}", self.live_endpoint, self.api_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RelayConfig::new("k");
        assert_eq!(config.text_model, DEFAULT_TEXT_MODEL);
        assert_eq!(config.voice, DEFAULT_VOICE);
        assert!(config.system_instruction.contains("aquaculture"));
    }

    #[test]
    fn test_urls_carry_key_and_model() {
        let config = RelayConfig::new("secret").with_text_model("test-model");
        let url = config.stream_url();
        assert!(url.contains("models/test-model:streamGenerateContent"));
        assert!(url.contains("alt=sse"));
        assert!(url.ends_with("key=secret"));
        assert!(config.live_url().ends_with("key=secret"));
    }

    #[test]
    fn test_endpoint_override() {
        let config = RelayConfig::new("k").with_endpoints("http://localhost:9000", "ws://localhost:9001");
        assert!(config.stream_url().starts_with("http://localhost:9000/models/"));
        assert!(config.live_url().starts_with("ws://localhost:9001?key="));
    }
}
