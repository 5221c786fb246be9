use std::path::{Path, PathBuf};

use log::debug;

use crate::{Result, TTSError};

/// Read the text to narrate from `path`.
///
/// The path is resolved against the working directory so errors name the
/// file that was actually looked up. Surrounding whitespace is trimmed and
/// an empty result is rejected before any provider is contacted.
pub async fn read_input(path: &Path) -> Result<String> {
    let resolved = resolve(path);
    if !resolved.exists() {
        return Err(TTSError::FileNotFound(resolved));
    }
    let raw = tokio::fs::read_to_string(&resolved)
        .await
        .map_err(|source| TTSError::ReadInput {
            path: resolved.clone(),
            source,
        })?;
    let text = raw.trim();
    if text.is_empty() {
        return Err(TTSError::EmptyInput(resolved));
    }
    debug!("read {} characters from {}", text.chars().count(), resolved.display());
    Ok(text.to_string())
}

fn resolve(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn trims_surrounding_whitespace() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.txt");
        std::fs::write(&path, "\n  Hello world.  \n\n").unwrap();
        assert_eq!(read_input(&path).await.unwrap(), "Hello world.");
    }

    #[tokio::test]
    async fn missing_file_names_resolved_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.txt");
        match read_input(&path).await {
            Err(TTSError::FileNotFound(p)) => {
                assert!(p.is_absolute());
                assert!(p.ends_with("nope.txt"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn relative_paths_are_resolved() {
        match read_input(Path::new("definitely/not/here.txt")).await {
            Err(TTSError::FileNotFound(p)) => assert!(p.is_absolute()),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn whitespace_only_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blank.txt");
        std::fs::write(&path, " \t\n ").unwrap();
        assert!(matches!(
            read_input(&path).await,
            Err(TTSError::EmptyInput(_))
        ));
    }

    #[tokio::test]
    async fn directory_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        match read_input(dir.path()).await {
            Err(TTSError::ReadInput { path, .. }) => assert_eq!(path, dir.path()),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn invalid_utf8_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bin.txt");
        std::fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();
        assert!(matches!(
            read_input(&path).await,
            Err(TTSError::ReadInput { .. })
        ));
    }
}
