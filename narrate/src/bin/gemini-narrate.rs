//! Narrate a text file with Gemini speech generation.
//!
//! The whole text is synthesized in one request; the returned PCM is wrapped
//! in a WAV header.
//!
//! ```bash
//! GEMINI_API_KEY=... cargo run -p narrate --bin gemini-narrate -- story.txt out/story.wav
//! ```

use std::process::ExitCode;

use narrate::Cli;
use tts::gemini::PCM_FORMAT;
use tts::{narrate_single, read_input, GeminiConfig, GeminiTts};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    narrate::init_logging();
    narrate::load_dotenv();
    let cli = match Cli::try_from_args(std::env::args_os()) {
        Ok(Some(cli)) => cli,
        Ok(None) => return ExitCode::SUCCESS,
        Err(e) => return narrate::exit_code(Err(e)),
    };
    narrate::exit_code(run(cli).await)
}

async fn run(cli: Cli) -> tts::Result<u64> {
    let config = GeminiConfig::from_env()?;
    let text = read_input(&cli.input).await?;
    let client = GeminiTts::new(config);
    narrate_single(&client, &text, PCM_FORMAT, &cli.output).await
}
