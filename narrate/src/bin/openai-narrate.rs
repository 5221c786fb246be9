//! Narrate a text file with the OpenAI speech API.
//!
//! Long inputs are sent in chunks of up to 8000 characters and joined into a
//! single WAV file.
//!
//! ```bash
//! OPENAI_API_KEY=sk-... cargo run -p narrate --bin openai-narrate -- story.txt out/story.wav
//! ```

use std::process::ExitCode;

use narrate::Cli;
use tts::{narrate_chunked, read_input, OpenAiConfig, OpenAiTts, MAX_CHUNK_CHARS};

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
    let config = OpenAiConfig::from_env()?;
    let text = read_input(&cli.input).await?;
    let client = OpenAiTts::new(config);
    narrate_chunked(&client, &text, MAX_CHUNK_CHARS, &cli.output).await
}
