//! Turn a plain-text file into a narrated WAV file using a hosted
//! text-to-speech provider.
//!
//! Two providers are supported. [`openai::OpenAiTts`] returns a full WAV
//! container for every request, so long texts are split with
//! [`chunker::chunk_text`] and the responses are stitched together.
//! [`gemini::GeminiTts`] returns raw PCM for the whole text in one request and
//! the container header is built locally.

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

pub mod chunker;
pub mod config;
pub mod gemini;
pub mod input;
pub mod narrate;
pub mod openai;
pub mod output;
pub mod wav;

pub use chunker::{chunk_text, Chunks, MAX_CHUNK_CHARS};
pub use config::{GeminiConfig, OpenAiConfig};
pub use gemini::GeminiTts;
pub use input::read_input;
pub use narrate::{narrate_chunked, narrate_single};
pub use openai::OpenAiTts;
pub use output::OutputFile;
pub use wav::{ChunkAssembler, WavFormat, WavHeader, HEADER_LEN};

#[derive(Debug, Error)]
pub enum TTSError {
    #[error("missing credential: set {0}")]
    MissingCredential(&'static str),
    #[error("invalid value {value:?} for {name}: {reason}")]
    InvalidSetting {
        name: &'static str,
        value: String,
        reason: &'static str,
    },
    #[error("{0}")]
    MissingArguments(String),
    #[error("input file not found: {}", .0.display())]
    FileNotFound(PathBuf),
    #[error("input file is empty: {}", .0.display())]
    EmptyInput(PathBuf),
    #[error("failed to read {}: {source}", path.display())]
    ReadInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("synthesis request failed: {0}")]
    SynthesisRequestFailed(#[from] reqwest::Error),
    #[error("synthesis request rejected with status {status}: {body}")]
    ProviderRejected { status: u16, body: String },
    #[error("provider returned an undecodable audio payload: {0}")]
    InvalidAudioPayload(#[from] base64::DecodeError),
    #[error("provider returned no audio; check that the model supports the configured voice")]
    NoAudioReturned,
    #[error("invalid WAV header: {0}")]
    InvalidHeader(String),
    #[error("audio format of chunk {chunk} differs from the first chunk")]
    HeaderMismatch { chunk: usize },
    #[error("audio payload of {0} bytes does not fit in a WAV container")]
    AudioTooLarge(u64),
    #[error("failed to write {}: {source}", path.display())]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience result type used throughout this crate.
pub type Result<T> = std::result::Result<T, TTSError>;

/// A single request/response exchange with a speech provider.
///
/// What the returned bytes contain depends on the provider: a complete WAV
/// container for [`OpenAiTts`], headerless PCM for [`GeminiTts`].
#[async_trait]
pub trait Synthesizer: Send + Sync {
    /// Synthesize `text` and return the audio bytes.
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>>;
}

/// Turn a non-2xx provider response into [`TTSError::ProviderRejected`],
/// keeping whatever body could be read.
pub(crate) async fn rejection(res: reqwest::Response) -> TTSError {
    let status = res.status().as_u16();
    let body = match res.text().await {
        Ok(body) => body,
        Err(e) => {
            log::debug!("could not read body of rejected request ({status}): {e}");
            String::new()
        }
    };
    TTSError::ProviderRejected { status, body }
}
