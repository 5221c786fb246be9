//! Client for Gemini speech generation.
//!
//! The whole text goes out in a single `generateContent` call and the audio
//! comes back as base64 PCM inside the JSON reply.

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{GeminiConfig, Result, Synthesizer, TTSError, WavFormat};

/// Layout of the PCM returned by Gemini speech models.
pub const PCM_FORMAT: WavFormat = WavFormat::pcm(24_000, 1, 16);

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<TextPart>,
}

#[derive(Debug, Serialize)]
struct TextPart {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_modalities: [&'static str; 1],
    speech_config: SpeechConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SpeechConfig {
    voice_config: VoiceConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceConfig {
    prebuilt_voice_config: PrebuiltVoiceConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PrebuiltVoiceConfig {
    voice_name: String,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(default)]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    #[serde(default)]
    mime_type: Option<String>,
    #[serde(default)]
    data: String,
}

impl GenerateResponse {
    /// Base64 audio of the first candidate, if it carries any.
    fn audio(&self) -> Option<&InlineData> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .iter()
            .filter_map(|p| p.inline_data.as_ref())
            .find(|d| !d.data.is_empty())
    }
}

/// [`Synthesizer`] returning headerless PCM in [`PCM_FORMAT`].
#[derive(Clone, Debug)]
pub struct GeminiTts {
    client: Client,
    config: GeminiConfig,
}

impl GeminiTts {
    /// Create a client with its own HTTP connection pool.
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Settings this client was built with.
    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    fn request(&self, text: &str) -> GenerateRequest {
        GenerateRequest {
            contents: vec![Content {
                parts: vec![TextPart {
                    text: format!("{}\n\n{}", self.config.style, text),
                }],
            }],
            generation_config: GenerationConfig {
                response_modalities: ["AUDIO"],
                speech_config: SpeechConfig {
                    voice_config: VoiceConfig {
                        prebuilt_voice_config: PrebuiltVoiceConfig {
                            voice_name: self.config.voice.clone(),
                        },
                    },
                },
            },
        }
    }
}

#[async_trait]
impl Synthesizer for GeminiTts {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        debug!(
            "requesting speech for {} characters from {}",
            text.chars().count(),
            self.config.model
        );
        let res = self
            .client
            .post(self.url())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&self.request(text))
            .send()
            .await?;
        let status = res.status();
        if !status.is_success() {
            return Err(crate::rejection(res).await);
        }
        let reply: GenerateResponse = res.json().await?;
        let audio = reply.audio().ok_or(TTSError::NoAudioReturned)?;
        if let Some(mime) = &audio.mime_type {
            debug!("received {mime} audio");
        }
        let pcm = general_purpose::STANDARD.decode(&audio.data)?;
        if pcm.is_empty() {
            return Err(TTSError::NoAudioReturned);
        }
        Ok(pcm)
    }
}
