//! Provider settings resolved from the environment.

use std::{env, fmt};

use crate::{Result, TTSError};

pub const OPENAI_DEFAULT_MODEL: &str = "gpt-4o-mini-tts";
pub const OPENAI_DEFAULT_VOICE: &str = "coral";
pub const OPENAI_DEFAULT_SPEED: f32 = 1.0;
pub const OPENAI_DEFAULT_INSTRUCTIONS: &str = "Read the text in a calm, clear narration voice.";
pub const OPENAI_DEFAULT_BASE_URL: &str = "https://api.openai.com";

pub const GEMINI_DEFAULT_MODEL: &str = "gemini-2.5-flash-preview-tts";
pub const GEMINI_DEFAULT_VOICE: &str = "Kore";
pub const GEMINI_DEFAULT_STYLE: &str = "Read aloud in a warm and friendly tone:";
pub const GEMINI_DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

const SPEED_RANGE: std::ops::RangeInclusive<f32> = 0.5..=2.0;

/// Settings for [`crate::OpenAiTts`].
#[derive(Clone, PartialEq)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub model: String,
    pub voice: String,
    /// Playback rate, used by models that do not take instructions.
    pub speed: f32,
    /// Style prompt, used by instruction-driven models.
    pub instructions: String,
    pub base_url: String,
}

impl OpenAiConfig {
    pub const API_KEY_VAR: &'static str = "OPENAI_API_KEY";

    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read settings through `lookup`, falling back to the documented defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let api_key =
            get(Self::API_KEY_VAR).ok_or(TTSError::MissingCredential(Self::API_KEY_VAR))?;
        let speed = match get("OPENAI_TTS_SPEED") {
            Some(raw) => parse_speed(&raw)?,
            None => OPENAI_DEFAULT_SPEED,
        };
        Ok(Self {
            api_key,
            model: get("OPENAI_TTS_MODEL").unwrap_or_else(|| OPENAI_DEFAULT_MODEL.into()),
            voice: get("OPENAI_TTS_VOICE").unwrap_or_else(|| OPENAI_DEFAULT_VOICE.into()),
            speed,
            instructions: get("OPENAI_TTS_INSTRUCTIONS")
                .unwrap_or_else(|| OPENAI_DEFAULT_INSTRUCTIONS.into()),
            base_url: get("OPENAI_BASE_URL").unwrap_or_else(|| OPENAI_DEFAULT_BASE_URL.into()),
        })
    }

    /// Whether the configured model takes a free-text style prompt instead
    /// of a speed setting.
    pub fn accepts_instructions(&self) -> bool {
        self.model.starts_with("gpt-")
    }
}

fn parse_speed(raw: &str) -> Result<f32> {
    let invalid = |reason| TTSError::InvalidSetting {
        name: "OPENAI_TTS_SPEED",
        value: raw.to_string(),
        reason,
    };
    let speed: f32 = raw.trim().parse().map_err(|_| invalid("not a number"))?;
    if !SPEED_RANGE.contains(&speed) {
        return Err(invalid("must be between 0.5 and 2.0"));
    }
    Ok(speed)
}

impl fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("voice", &self.voice)
            .field("speed", &self.speed)
            .field("instructions", &self.instructions)
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Settings for [`crate::GeminiTts`].
#[derive(Clone, PartialEq, Eq)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub voice: String,
    /// Directive prepended to the text.
    pub style: String,
    pub base_url: String,
}

impl GeminiConfig {
    pub const API_KEY_VAR: &'static str = "GEMINI_API_KEY";

    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read settings through `lookup`, falling back to the documented defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let api_key =
            get(Self::API_KEY_VAR).ok_or(TTSError::MissingCredential(Self::API_KEY_VAR))?;
        Ok(Self {
            api_key,
            model: get("GEMINI_TTS_MODEL").unwrap_or_else(|| GEMINI_DEFAULT_MODEL.into()),
            voice: get("GEMINI_TTS_VOICE").unwrap_or_else(|| GEMINI_DEFAULT_VOICE.into()),
            style: get("GEMINI_TTS_STYLE").unwrap_or_else(|| GEMINI_DEFAULT_STYLE.into()),
            base_url: get("GEMINI_BASE_URL").unwrap_or_else(|| GEMINI_DEFAULT_BASE_URL.into()),
        })
    }
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("voice", &self.voice)
            .field("style", &self.style)
            .field("base_url", &self.base_url)
            .finish()
    }
}
