//! PCM loading (WAV and headerless 16-bit LE)

use std::path::Path;

use crate::asset::DecodedAudio;
use crate::error::{ExportError, Result};

/// Load a WAV file as interleaved 16-bit PCM
///
/// 8/24/32-bit integer and 32-bit float sources are converted; rate and
/// channel layout are kept as found.
pub fn read_wav(name: &str, path: &Path) -> Result<DecodedAudio> {
    let mut reader = hound::WavReader::open(path).map_err(ExportError::wav(path))?;
    let spec = reader.spec();

    let samples: Vec<i16> = match spec.sample_format {
        hound::SampleFormat::Int => match spec.bits_per_sample {
            16 => reader
                .samples::<i16>()
                .collect::<Result<_, _>>()
                .map_err(ExportError::wav(path))?,
            8 => reader
                .samples::<i8>()
                .map(|s| s.map(|s| i16::from(s) << 8))
                .collect::<Result<_, _>>()
                .map_err(ExportError::wav(path))?,
            24 | 32 => reader
                .samples::<i32>()
                .map(|s| s.map(|s| (s >> (spec.bits_per_sample - 16)) as i16))
                .collect::<Result<_, _>>()
                .map_err(ExportError::wav(path))?,
            bits => {
                return Err(ExportError::decode(
                    name,
                    format!("unsupported bit depth: {bits}"),
                ));
            }
        },
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .map(|s| s.map(|s| (s.clamp(-1.0, 1.0) * 32767.0) as i16))
            .collect::<Result<_, _>>()
            .map_err(ExportError::wav(path))?,
    };

    tracing::debug!(
        "Loaded WAV {:?}: {} Hz, {} ch, {}-bit, {} samples",
        path,
        spec.sample_rate,
        spec.channels,
        spec.bits_per_sample,
        samples.len()
    );

    Ok(DecodedAudio {
        name: name.to_string(),
        sample_rate: spec.sample_rate,
        channels: spec.channels,
        samples,
    })
}

/// Interpret headerless bytes as 16-bit little-endian interleaved PCM
pub fn read_raw_pcm(
    name: &str,
    bytes: &[u8],
    sample_rate: u32,
    channels: u16,
) -> Result<DecodedAudio> {
    if bytes.len() % 2 != 0 {
        return Err(ExportError::decode(
            name,
            format!("raw PCM has odd length {}", bytes.len()),
        ));
    }

    let samples = bytes
        .chunks_exact(2)
        .map(|b| i16::from_le_bytes([b[0], b[1]]))
        .collect();

    Ok(DecodedAudio {
        name: name.to_string(),
        sample_rate,
        channels,
        samples,
    })
}
