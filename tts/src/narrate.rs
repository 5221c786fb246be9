//! End-to-end narration runs for both provider shapes.

use std::path::Path;

use log::{debug, info};

use crate::output::OutputFile;
use crate::wav::{self, ChunkAssembler, WavFormat, DATA_SIZE_OFFSET, RIFF_SIZE_OFFSET};
use crate::{chunk_text, Result, Synthesizer, TTSError};

/// Narrate `text` with a provider that returns a WAV container per request.
///
/// The text is split into chunks of at most `max_chars` characters, sent one
/// at a time in order and each response is appended to `output` as soon as it
/// arrives. Only the first response keeps its header; the header's size
/// fields are rewritten once the last chunk is in. On any error the partial
/// file is removed. Returns the number of bytes written.
pub async fn narrate_chunked<S>(
    synth: &S,
    text: &str,
    max_chars: usize,
    output: &Path,
) -> Result<u64>
where
    S: Synthesizer + ?Sized,
{
    let chunks = chunk_text(text, max_chars);
    let total = chunks.clone().count();
    let mut out = OutputFile::create(output).await?;
    match write_chunks(synth, chunks, total, &mut out).await {
        Ok(()) => {
            let written = out.written();
            let path = out.finish().await?;
            info!("wrote {written} bytes to {}", path.display());
            Ok(written)
        }
        Err(e) => {
            out.discard().await;
            Err(e)
        }
    }
}

async fn write_chunks<'a, S>(
    synth: &S,
    chunks: impl Iterator<Item = &'a str>,
    total: usize,
    out: &mut OutputFile,
) -> Result<()>
where
    S: Synthesizer + ?Sized,
{
    let mut assembler = ChunkAssembler::new();
    for (i, chunk) in chunks.enumerate() {
        debug!("synthesizing chunk {} of {total}", i + 1);
        let response = synth.synthesize(chunk).await?;
        let bytes = assembler.push(&response)?;
        out.write(bytes).await?;
    }
    if assembler.chunks() == 0 {
        return Err(TTSError::NoAudioReturned);
    }
    let (riff_size, data_size) = assembler.size_fields()?;
    out.write_at(RIFF_SIZE_OFFSET, &riff_size.to_le_bytes()).await?;
    out.write_at(DATA_SIZE_OFFSET, &data_size.to_le_bytes()).await?;
    Ok(())
}

/// Narrate `text` with a provider that returns headerless PCM for the whole
/// text in one request.
///
/// The container is built in memory with a header describing `format` and
/// written only after synthesis succeeds, so a failed request never creates
/// `output`. Returns the number of bytes written.
pub async fn narrate_single<S>(
    synth: &S,
    text: &str,
    format: WavFormat,
    output: &Path,
) -> Result<u64>
where
    S: Synthesizer + ?Sized,
{
    debug!("synthesizing {} characters in one request", text.chars().count());
    let pcm = synth.synthesize(text).await?;
    let container = wav::create_wav(format, &pcm)?;
    let path = crate::output::write_file(output, &container).await?;
    info!("wrote {} bytes to {}", container.len(), path.display());
    Ok(container.len() as u64)
}
