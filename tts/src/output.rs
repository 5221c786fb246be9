//! Writing the assembled audio to disk.

use std::io::SeekFrom;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use tokio::fs::{self, File};
use tokio::io::{AsyncSeekExt, AsyncWriteExt};

use crate::{Result, TTSError};

/// The destination file of a run.
///
/// A file that is dropped without [`OutputFile::finish`] is left on disk;
/// call [`OutputFile::discard`] on failure so a truncated file never
/// remains.
#[derive(Debug)]
pub struct OutputFile {
    path: PathBuf,
    file: File,
    written: u64,
}

impl OutputFile {
    /// Create (or truncate) `path`, making missing parent directories.
    pub async fn create(path: &Path) -> Result<Self> {
        let fail = |source| TTSError::OutputWriteFailed {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(fail)?;
        }
        let file = File::create(path).await.map_err(fail)?;
        debug!("opened {}", path.display());
        Ok(Self {
            path: path.to_path_buf(),
            file,
            written: 0,
        })
    }

    /// Destination path as given to [`OutputFile::create`].
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Bytes appended with [`OutputFile::write`] so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Append `bytes` at the end of the file.
    pub async fn write(&mut self, bytes: &[u8]) -> Result<()> {
        self.file
            .write_all(bytes)
            .await
            .map_err(|source| self.fail(source))?;
        self.written += bytes.len() as u64;
        Ok(())
    }

    /// Overwrite `bytes` at `offset`, then return to the end of the file.
    pub async fn write_at(&mut self, offset: u64, bytes: &[u8]) -> Result<()> {
        let res = async {
            self.file.flush().await?;
            self.file.seek(SeekFrom::Start(offset)).await?;
            self.file.write_all(bytes).await?;
            self.file.seek(SeekFrom::End(0)).await?;
            Ok::<_, std::io::Error>(())
        }
        .await;
        res.map_err(|source| self.fail(source))
    }

    /// Flush and sync the file, then close it.
    pub async fn finish(mut self) -> Result<PathBuf> {
        let res = async {
            self.file.flush().await?;
            self.file.sync_all().await
        }
        .await;
        match res {
            Ok(()) => Ok(self.path),
            Err(source) => {
                let err = self.fail(source);
                self.discard().await;
                Err(err)
            }
        }
    }

    /// Close and delete the file. Failure to delete is only logged.
    pub async fn discard(self) {
        let Self { path, file, .. } = self;
        drop(file);
        if let Err(e) = fs::remove_file(&path).await {
            warn!("could not remove partial output {}: {e}", path.display());
        } else {
            debug!("removed partial output {}", path.display());
        }
    }

    fn fail(&self, source: std::io::Error) -> TTSError {
        TTSError::OutputWriteFailed {
            path: self.path.clone(),
            source,
        }
    }
}

/// Write `bytes` to `path` in one go, removing the file if writing fails.
pub async fn write_file(path: &Path, bytes: &[u8]) -> Result<PathBuf> {
    let mut out = OutputFile::create(path).await?;
    if let Err(e) = out.write(bytes).await {
        out.discard().await;
        return Err(e);
    }
    out.finish().await
}
