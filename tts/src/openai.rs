//! Client for the OpenAI speech endpoint.
//!
//! Each request returns a complete WAV container, so long texts are sent one
//! chunk at a time and joined with [`crate::ChunkAssembler`].

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::Serialize;

use crate::{OpenAiConfig, Result, Synthesizer};

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    input: &'a str,
    voice: &'a str,
    response_format: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    speed: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    instructions: Option<&'a str>,
}

/// [`Synthesizer`] backed by `POST /v1/audio/speech`.
#[derive(Clone, Debug)]
pub struct OpenAiTts {
    client: Client,
    config: OpenAiConfig,
}

impl OpenAiTts {
    /// Create a client with its own HTTP connection pool.
    pub fn new(config: OpenAiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Settings this client was built with.
    pub fn config(&self) -> &OpenAiConfig {
        &self.config
    }

    fn url(&self) -> String {
        format!(
            "{}/v1/audio/speech",
            self.config.base_url.trim_end_matches('/')
        )
    }

    fn request<'a>(&'a self, text: &'a str) -> SpeechRequest<'a> {
        let instructed = self.config.accepts_instructions();
        SpeechRequest {
            model: &self.config.model,
            input: text,
            voice: &self.config.voice,
            response_format: "wav",
            speed: (!instructed).then_some(self.config.speed),
            instructions: instructed.then_some(self.config.instructions.as_str()),
        }
    }
}

#[async_trait]
impl Synthesizer for OpenAiTts {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        debug!(
            "requesting speech for {} characters from {}",
            text.chars().count(),
            self.config.model
        );
        let res = self
            .client
            .post(self.url())
            .bearer_auth(&self.config.api_key)
            .json(&self.request(text))
            .send()
            .await?;
        let status = res.status();
        if !status.is_success() {
            return Err(crate::rejection(res).await);
        }
        let bytes = res.bytes().await?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(model: &str) -> OpenAiConfig {
        OpenAiConfig::from_lookup(|key| match key {
            "OPENAI_API_KEY" => Some("sk-test".into()),
            "OPENAI_TTS_MODEL" => Some(model.into()),
            "OPENAI_TTS_SPEED" => Some("1.5".into()),
            "OPENAI_BASE_URL" => Some("http://localhost:1234/".into()),
            _ => None,
        })
        .unwrap()
    }

    #[test]
    fn classic_models_send_speed() {
        let tts = OpenAiTts::new(config("tts-1"));
        let body = serde_json::to_value(tts.request("hi")).unwrap();
        assert_eq!(body["speed"], 1.5);
        assert_eq!(body["response_format"], "wav");
        assert!(body.get("instructions").is_none());
    }

    #[test]
    fn instruction_models_send_instructions() {
        let tts = OpenAiTts::new(config("gpt-4o-mini-tts"));
        let body = serde_json::to_value(tts.request("hi")).unwrap();
        assert!(body.get("speed").is_none());
        assert_eq!(body["instructions"], crate::config::OPENAI_DEFAULT_INSTRUCTIONS);
        assert_eq!(body["voice"], crate::config::OPENAI_DEFAULT_VOICE);
    }

    #[test]
    fn trailing_slash_in_base_url() {
        let tts = OpenAiTts::new(config("tts-1"));
        assert_eq!(tts.url(), "http://localhost:1234/v1/audio/speech");
    }
}
