//! Shared plumbing for the `openai-narrate` and `gemini-narrate` binaries.

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::Parser;
use log::debug;
use tts::TTSError;

/// Positional arguments accepted by both binaries.
#[derive(Parser, Debug)]
#[command(version, about = "Narrate a text file into a WAV file")]
pub struct Cli {
    /// Text file to narrate
    pub input: PathBuf,
    /// Destination WAV file
    pub output: PathBuf,
}

impl Cli {
    /// Parse `args`, turning usage errors into [`TTSError::MissingArguments`].
    ///
    /// `--help` and `--version` print their text and yield `Ok(None)`; the
    /// caller should stop there with a success code.
    pub fn try_from_args<I, T>(args: I) -> tts::Result<Option<Self>>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        match Self::try_parse_from(args) {
            Ok(cli) => Ok(Some(cli)),
            Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
                let _ = e.print();
                Ok(None)
            }
            Err(e) => Err(TTSError::MissingArguments(
                e.render().to_string().trim_end().to_string(),
            )),
        }
    }
}

/// Initialize logging to stderr. `RUST_LOG` overrides the default `warn` level.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .try_init();
}

/// Load a `.env` file from the working directory if one exists.
///
/// Variables already present in the environment are left untouched.
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => debug!("loaded {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => log::warn!("ignoring .env: {e}"),
    }
}

/// Map the outcome of a run to the process exit code, reporting errors on
/// stderr.
pub fn exit_code(result: tts::Result<u64>) -> ExitCode {
    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(TTSError::MissingArguments(usage)) => {
            eprintln!("{usage}");
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
