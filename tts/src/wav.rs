//! Canonical 44-byte WAV headers and multi-response assembly.

use crate::{Result, TTSError};

/// Size of the canonical PCM WAV header.
pub const HEADER_LEN: usize = 44;

/// Byte offset of the RIFF chunk size field.
pub const RIFF_SIZE_OFFSET: u64 = 4;
/// Byte offset of the data chunk size field.
pub const DATA_SIZE_OFFSET: u64 = 40;

const PCM: u16 = 1;

/// Sample layout described by a WAV `fmt ` chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavFormat {
    pub audio_format: u16,
    pub channels: u16,
    pub sample_rate: u32,
    pub bits_per_sample: u16,
}

impl WavFormat {
    /// Linear PCM with the given layout.
    pub const fn pcm(sample_rate: u32, channels: u16, bits_per_sample: u16) -> Self {
        Self {
            audio_format: PCM,
            channels,
            sample_rate,
            bits_per_sample,
        }
    }

    /// Bytes per sample frame across all channels.
    pub fn block_align(&self) -> u16 {
        self.channels * self.bits_per_sample / 8
    }

    /// Bytes of audio per second.
    pub fn byte_rate(&self) -> u32 {
        self.sample_rate * u32::from(self.block_align())
    }
}

/// A parsed header: the format plus the declared payload size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavHeader {
    pub format: WavFormat,
    pub data_len: u32,
}

/// Build a 44-byte header describing `data_len` bytes of `format` samples.
pub fn create_header(format: WavFormat, data_len: u32) -> [u8; HEADER_LEN] {
    let mut header = [0u8; HEADER_LEN];

    header[0..4].copy_from_slice(b"RIFF");
    header[4..8].copy_from_slice(&riff_size(data_len).to_le_bytes());
    header[8..12].copy_from_slice(b"WAVE");

    header[12..16].copy_from_slice(b"fmt ");
    header[16..20].copy_from_slice(&16u32.to_le_bytes());
    header[20..22].copy_from_slice(&format.audio_format.to_le_bytes());
    header[22..24].copy_from_slice(&format.channels.to_le_bytes());
    header[24..28].copy_from_slice(&format.sample_rate.to_le_bytes());
    header[28..32].copy_from_slice(&format.byte_rate().to_le_bytes());
    header[32..34].copy_from_slice(&format.block_align().to_le_bytes());
    header[34..36].copy_from_slice(&format.bits_per_sample.to_le_bytes());

    header[36..40].copy_from_slice(b"data");
    header[40..44].copy_from_slice(&data_len.to_le_bytes());

    header
}

/// Wrap raw PCM in a single container.
pub fn create_wav(format: WavFormat, pcm: &[u8]) -> Result<Vec<u8>> {
    let data_len = data_len_field(pcm.len() as u64)?;
    let mut wav = Vec::with_capacity(HEADER_LEN + pcm.len());
    wav.extend_from_slice(&create_header(format, data_len));
    wav.extend_from_slice(pcm);
    Ok(wav)
}

/// Parse the leading 44 bytes of `bytes` as a canonical PCM header.
pub fn parse_header(bytes: &[u8]) -> Result<WavHeader> {
    if bytes.len() < HEADER_LEN {
        return Err(TTSError::InvalidHeader(format!(
            "expected at least {HEADER_LEN} bytes, got {}",
            bytes.len()
        )));
    }
    for (offset, tag) in [(0, b"RIFF"), (8, b"WAVE"), (12, b"fmt "), (36, b"data")] {
        if &bytes[offset..offset + 4] != tag {
            return Err(TTSError::InvalidHeader(format!(
                "missing {:?} tag at offset {offset}",
                String::from_utf8_lossy(tag)
            )));
        }
    }
    let fmt_len = u32_at(bytes, 16);
    if fmt_len != 16 {
        return Err(TTSError::InvalidHeader(format!(
            "unsupported fmt chunk size {fmt_len}"
        )));
    }
    Ok(WavHeader {
        format: WavFormat {
            audio_format: u16_at(bytes, 20),
            channels: u16_at(bytes, 22),
            sample_rate: u32_at(bytes, 24),
            bits_per_sample: u16_at(bytes, 34),
        },
        data_len: u32_at(bytes, 40),
    })
}

/// RIFF size field for a payload of `data_len` bytes.
pub fn riff_size(data_len: u32) -> u32 {
    data_len.saturating_add(HEADER_LEN as u32 - 8)
}

/// Convert a payload length into the 32-bit data size field.
pub fn data_len_field(len: u64) -> Result<u32> {
    u32::try_from(len)
        .ok()
        .filter(|n| n.checked_add(HEADER_LEN as u32 - 8).is_some())
        .ok_or(TTSError::AudioTooLarge(len))
}

fn u16_at(bytes: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}

fn u32_at(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

/// Joins WAV responses into one container.
///
/// The first response is kept whole. Every later response must carry the
/// same [`WavFormat`] and contributes only the bytes after its header. The
/// size fields of the first header are stale once more than one response is
/// pushed; [`ChunkAssembler::size_fields`] gives the values to write back.
#[derive(Debug, Default)]
pub struct ChunkAssembler {
    format: Option<WavFormat>,
    chunks: usize,
    data_len: u64,
}

impl ChunkAssembler {
    /// An assembler that has not seen any response yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate `response` and return the slice that belongs in the output.
    pub fn push<'a>(&mut self, response: &'a [u8]) -> Result<&'a [u8]> {
        let header = parse_header(response)?;
        self.chunks += 1;
        match self.format {
            None => self.format = Some(header.format),
            Some(format) if format != header.format => {
                return Err(TTSError::HeaderMismatch { chunk: self.chunks });
            }
            Some(_) => {}
        }
        let payload = &response[HEADER_LEN..];
        self.data_len += payload.len() as u64;
        if self.chunks == 1 {
            Ok(response)
        } else {
            Ok(payload)
        }
    }

    /// Format of the first response, if any was pushed.
    pub fn format(&self) -> Option<WavFormat> {
        self.format
    }

    /// Number of responses pushed so far.
    pub fn chunks(&self) -> usize {
        self.chunks
    }

    /// Total payload bytes across all responses.
    pub fn data_len(&self) -> u64 {
        self.data_len
    }

    /// `(riff_size, data_size)` matching the payload pushed so far.
    pub fn size_fields(&self) -> Result<(u32, u32)> {
        let data_len = data_len_field(self.data_len)?;
        Ok((riff_size(data_len), data_len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FORMAT: WavFormat = WavFormat::pcm(24_000, 1, 16);

    fn response(format: WavFormat, payload: &[u8]) -> Vec<u8> {
        create_wav(format, payload).unwrap()
    }

    #[test]
    fn header_layout() {
        let header = create_header(FORMAT, 1000);
        assert_eq!(&header[0..4], b"RIFF");
        assert_eq!(&header[8..12], b"WAVE");
        assert_eq!(&header[12..16], b"fmt ");
        assert_eq!(&header[36..40], b"data");
        assert_eq!(u32_at(&header, 4), 1036);
        assert_eq!(u32_at(&header, 24), 24_000);
        assert_eq!(u32_at(&header, 28), 48_000);
        assert_eq!(u16_at(&header, 32), 2);
        assert_eq!(u32_at(&header, 40), 1000);
    }

    #[test]
    fn parse_reads_back_created_header() {
        let header = parse_header(&create_header(FORMAT, 12)).unwrap();
        assert_eq!(header.format, FORMAT);
        assert_eq!(header.data_len, 12);
    }

    #[test]
    fn parse_rejects_short_input() {
        let err = parse_header(b"RIFF").unwrap_err();
        assert!(matches!(err, TTSError::InvalidHeader(_)));
    }

    #[test]
    fn parse_rejects_non_wav() {
        let mut bytes = create_header(FORMAT, 0);
        bytes[8..12].copy_from_slice(b"AVI ");
        assert!(matches!(
            parse_header(&bytes),
            Err(TTSError::InvalidHeader(_))
        ));
    }

    #[test]
    fn parse_rejects_extended_fmt_chunk() {
        let mut bytes = create_header(FORMAT, 0);
        bytes[16..20].copy_from_slice(&18u32.to_le_bytes());
        assert!(matches!(
            parse_header(&bytes),
            Err(TTSError::InvalidHeader(_))
        ));
    }

    #[test]
    fn assembler_strips_later_headers() {
        let first = response(FORMAT, &[1, 2, 3]);
        let second = response(FORMAT, &[4, 5]);
        let mut asm = ChunkAssembler::new();
        assert_eq!(asm.push(&first).unwrap(), &first[..]);
        assert_eq!(asm.push(&second).unwrap(), &[4, 5]);
        assert_eq!(asm.chunks(), 2);
        assert_eq!(asm.data_len(), 5);
        assert_eq!(asm.size_fields().unwrap(), (41, 5));
    }

    #[test]
    fn assembler_allows_differing_size_fields() {
        let first = response(FORMAT, &[0; 10]);
        let mut second = response(FORMAT, &[0; 4]);
        second[40..44].copy_from_slice(&u32::MAX.to_le_bytes());
        let mut asm = ChunkAssembler::new();
        asm.push(&first).unwrap();
        assert_eq!(asm.push(&second).unwrap().len(), 4);
    }

    #[test]
    fn assembler_rejects_format_change() {
        let first = response(FORMAT, &[0; 4]);
        let second = response(WavFormat::pcm(22_050, 1, 16), &[0; 4]);
        let mut asm = ChunkAssembler::new();
        asm.push(&first).unwrap();
        let err = asm.push(&second).unwrap_err();
        assert!(matches!(err, TTSError::HeaderMismatch { chunk: 2 }));
    }

    #[test]
    fn oversized_payload_is_rejected() {
        assert!(matches!(
            data_len_field(u64::from(u32::MAX)),
            Err(TTSError::AudioTooLarge(_))
        ));
        assert_eq!(data_len_field(100).unwrap(), 100);
    }
}
