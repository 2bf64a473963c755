//! Minimal RIFF/WAVE reading and writing for the command-line shifter.
//!
//! Reading keeps only the first channel of the file, since the effect runs
//! on a mono input line. Writing always produces a mono file.

use std::path::Path;

use crate::error::PshiftError;

const WAV_FORMAT_PCM: u16 = 1;
const WAV_FORMAT_IEEE_FLOAT: u16 = 3;
const WAV_FORMAT_EXTENSIBLE: u16 = 0xFFFE;

/// A mono clip decoded from, or about to be encoded to, a WAV file.
#[derive(Debug, Clone, PartialEq)]
pub struct MonoClip {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl MonoClip {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Length in seconds.
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / f64::from(self.sample_rate)
    }
}

/// Sample encoding used when writing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WavEncoding {
    #[default]
    Pcm16,
    Float32,
}

impl WavEncoding {
    fn format_code(self) -> u16 {
        match self {
            WavEncoding::Pcm16 => WAV_FORMAT_PCM,
            WavEncoding::Float32 => WAV_FORMAT_IEEE_FLOAT,
        }
    }

    fn bits_per_sample(self) -> u16 {
        match self {
            WavEncoding::Pcm16 => 16,
            WavEncoding::Float32 => 32,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct FmtChunk {
    format_code: u16,
    channels: u16,
    sample_rate: u32,
    bits_per_sample: u16,
}

/// Decodes the first channel of a WAV image.
///
/// Accepts 16/24/32-bit integer PCM and 32-bit float data, including the
/// extensible header variant.
pub fn read_wav(data: &[u8]) -> Result<MonoClip, PshiftError> {
    if data.len() < 12 {
        return Err(invalid("WAV file too short"));
    }
    if &data[0..4] != b"RIFF" {
        return Err(invalid("missing RIFF header"));
    }
    if &data[8..12] != b"WAVE" {
        return Err(invalid("missing WAVE identifier"));
    }

    let mut fmt = None;
    let mut audio_data: Option<&[u8]> = None;
    let mut cursor = 12;
    while cursor + 8 <= data.len() {
        let chunk_id = &data[cursor..cursor + 4];
        let chunk_size = read_u32_le(data, cursor + 4) as usize;
        let body_start = cursor + 8;
        let body_end = body_start.saturating_add(chunk_size).min(data.len());
        let body = &data[body_start..body_end];

        match chunk_id {
            b"fmt " => fmt = Some(parse_fmt(body)?),
            // A truncated data chunk keeps whatever is present.
            b"data" => audio_data = Some(body),
            _ => {}
        }

        // Chunks are word-aligned.
        cursor = body_start.saturating_add(chunk_size).saturating_add(chunk_size & 1);
    }

    let fmt = fmt.ok_or_else(|| invalid("no fmt chunk found"))?;
    let audio_data = audio_data.ok_or_else(|| invalid("no data chunk found"))?;
    if fmt.channels == 0 {
        return Err(invalid("zero channels"));
    }
    if fmt.sample_rate == 0 {
        return Err(invalid("zero sample rate"));
    }

    let bytes_per_sample = match (fmt.format_code, fmt.bits_per_sample) {
        (WAV_FORMAT_PCM, 16) => 2,
        (WAV_FORMAT_PCM, 24) => 3,
        (WAV_FORMAT_PCM, 32) | (WAV_FORMAT_IEEE_FLOAT, 32) => 4,
        (code, bits) => {
            return Err(invalid(format!(
                "unsupported WAV format: code={code}, bits={bits}"
            )))
        }
    };
    let frame_size = bytes_per_sample * usize::from(fmt.channels);

    let samples = audio_data
        .chunks_exact(frame_size)
        .map(|frame| decode_sample(fmt.format_code, &frame[..bytes_per_sample]))
        .collect();

    Ok(MonoClip::new(samples, fmt.sample_rate))
}

fn parse_fmt(body: &[u8]) -> Result<FmtChunk, PshiftError> {
    if body.len() < 16 {
        return Err(invalid("fmt chunk too short"));
    }
    let mut format_code = read_u16_le(body, 0);
    if format_code == WAV_FORMAT_EXTENSIBLE {
        // The real format code leads the sub-format GUID.
        if body.len() < 26 {
            return Err(invalid("extensible fmt chunk too short"));
        }
        format_code = read_u16_le(body, 24);
    }
    Ok(FmtChunk {
        format_code,
        channels: read_u16_le(body, 2),
        sample_rate: read_u32_le(body, 4),
        bits_per_sample: read_u16_le(body, 14),
    })
}

fn decode_sample(format_code: u16, bytes: &[u8]) -> f32 {
    match (format_code, bytes.len()) {
        (WAV_FORMAT_PCM, 2) => f32::from(i16::from_le_bytes([bytes[0], bytes[1]])) / 32768.0,
        (WAV_FORMAT_PCM, 3) => {
            // Sign-extend through the top byte of an i32.
            let raw = i32::from_le_bytes([0, bytes[0], bytes[1], bytes[2]]) >> 8;
            raw as f32 / 8_388_608.0
        }
        (WAV_FORMAT_PCM, 4) => {
            let raw = i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
            (f64::from(raw) / 2_147_483_648.0) as f32
        }
        _ => f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
    }
}

/// Encodes a mono clip as a WAV image.
pub fn write_wav(clip: &MonoClip, encoding: WavEncoding) -> Vec<u8> {
    let bits_per_sample = encoding.bits_per_sample();
    let block_align = bits_per_sample / 8;
    let byte_rate = clip.sample_rate * u32::from(block_align);
    let data_size = (clip.samples.len() * usize::from(block_align)) as u32;
    let file_size = 36 + data_size;

    let mut out = Vec::with_capacity(file_size as usize + 8);

    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&file_size.to_le_bytes());
    out.extend_from_slice(b"WAVE");

    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&encoding.format_code().to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&clip.sample_rate.to_le_bytes());
    out.extend_from_slice(&byte_rate.to_le_bytes());
    out.extend_from_slice(&block_align.to_le_bytes());
    out.extend_from_slice(&bits_per_sample.to_le_bytes());

    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_size.to_le_bytes());

    match encoding {
        WavEncoding::Pcm16 => {
            for &sample in &clip.samples {
                let raw = (sample.clamp(-1.0, 1.0) * 32767.0) as i16;
                out.extend_from_slice(&raw.to_le_bytes());
            }
        }
        WavEncoding::Float32 => {
            for &sample in &clip.samples {
                out.extend_from_slice(&sample.to_le_bytes());
            }
        }
    }

    out
}

/// Reads the first channel of a WAV file from disk.
pub fn read_wav_file(path: &Path) -> Result<MonoClip, PshiftError> {
    let data = std::fs::read(path)?;
    read_wav(&data)
}

/// Writes a mono WAV file to disk.
pub fn write_wav_file(path: &Path, clip: &MonoClip, encoding: WavEncoding) -> Result<(), PshiftError> {
    std::fs::write(path, write_wav(clip, encoding))?;
    Ok(())
}

fn invalid(msg: impl Into<String>) -> PshiftError {
    PshiftError::InvalidFormat(msg.into())
}

#[inline]
fn read_u16_le(data: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([data[offset], data[offset + 1]])
}

#[inline]
fn read_u32_le(data: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ])
}
