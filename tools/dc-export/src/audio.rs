//! Audio encoder (PCM -> ADPCM)
//!
//! PCM is written as a 16-bit WAV first, then handed to the codec chain in
//! priority order: adxtool, then sox (IMA ADPCM in a WAV header). If nothing
//! is installed, or every codec fails, the WAV stays behind as a degraded
//! result. Every path keeps the source sample rate and channel count.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use dc_common::DC_FORMAT;

use crate::asset::DecodedAudio;
use crate::config::{AudioConfig, AudioFormat};
use crate::error::{ExportError, Result};
use crate::naming::output_file;
use crate::tools::{ExternalTools, clear_target, run_tool};

/// One compression strategy
pub trait AudioCodec {
    /// Name used in logs and run summaries
    fn name(&self) -> &'static str;

    /// Extension of the file this codec produces
    fn extension(&self) -> &'static str;

    /// Compress `wav` into `output`
    fn encode(&self, wav: &Path, output: &Path) -> Result<()>;
}

/// `adxtool -e <wav> <out.adx>`
pub struct AdxToolCodec {
    program: PathBuf,
}

impl AdxToolCodec {
    pub fn new(program: PathBuf) -> Self {
        Self { program }
    }
}

impl AudioCodec for AdxToolCodec {
    fn name(&self) -> &'static str {
        "adxtool"
    }

    fn extension(&self) -> &'static str {
        DC_FORMAT.adx_ext
    }

    fn encode(&self, wav: &Path, output: &Path) -> Result<()> {
        run_tool(
            &self.program,
            [OsStr::new("-e"), wav.as_os_str(), output.as_os_str()],
        )
    }
}

/// `sox <wav> -t wav -e ima-adpcm <out.ima.wav>`
pub struct SoxImaCodec {
    program: PathBuf,
}

impl SoxImaCodec {
    pub fn new(program: PathBuf) -> Self {
        Self { program }
    }
}

impl AudioCodec for SoxImaCodec {
    fn name(&self) -> &'static str {
        "sox"
    }

    fn extension(&self) -> &'static str {
        DC_FORMAT.ima_wav_ext
    }

    fn encode(&self, wav: &Path, output: &Path) -> Result<()> {
        run_tool(
            &self.program,
            [
                wav.as_os_str(),
                OsStr::new("-t"),
                OsStr::new("wav"),
                OsStr::new("-e"),
                OsStr::new("ima-adpcm"),
                output.as_os_str(),
            ],
        )
    }
}

/// What an audio encode produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioOutput {
    pub path: PathBuf,
    /// Codec that produced `path`, `None` for plain PCM
    pub codec: Option<&'static str>,
    /// Set when compression was wanted but didn't happen
    pub degraded: Option<String>,
}

pub struct AudioEncoder {
    config: AudioConfig,
    codecs: Vec<Box<dyn AudioCodec>>,
}

impl AudioEncoder {
    /// Build the codec chain from whatever tools are installed
    pub fn new(config: AudioConfig, tools: &ExternalTools) -> Self {
        let mut codecs: Vec<Box<dyn AudioCodec>> = Vec::new();
        if let Some(adxtool) = &tools.adxtool {
            codecs.push(Box::new(AdxToolCodec::new(adxtool.clone())));
        }
        if let Some(sox) = &tools.sox {
            codecs.push(Box::new(SoxImaCodec::new(sox.clone())));
        }
        Self::with_codecs(config, codecs)
    }

    /// Use an explicit codec chain, highest priority first
    pub fn with_codecs(config: AudioConfig, codecs: Vec<Box<dyn AudioCodec>>) -> Self {
        Self { config, codecs }
    }

    /// Names of the codecs that will be tried, in order
    pub fn codec_names(&self) -> Vec<&'static str> {
        self.codecs.iter().map(|c| c.name()).collect()
    }

    pub fn validate(audio: &DecodedAudio) -> Result<()> {
        if audio.sample_rate == 0 {
            return Err(ExportError::FormatMismatch(
                "sample rate must be positive".to_string(),
            ));
        }
        if audio.channels == 0 {
            return Err(ExportError::FormatMismatch(
                "channel count must be positive".to_string(),
            ));
        }
        if audio.samples.is_empty() {
            return Err(ExportError::FormatMismatch(
                "sample buffer is empty".to_string(),
            ));
        }
        if audio.samples.len() % audio.channels as usize != 0 {
            return Err(ExportError::FormatMismatch(format!(
                "{} samples do not divide into {} channels",
                audio.samples.len(),
                audio.channels
            )));
        }
        Ok(())
    }

    pub fn encode(&self, audio: &DecodedAudio, dir: &Path, stem: &str) -> Result<AudioOutput> {
        Self::validate(audio)?;

        if audio.sample_rate != self.config.sample_rate || audio.channels != self.config.channels {
            tracing::debug!(
                "{}: source is {} Hz / {} ch, configured {} Hz / {} ch; keeping source layout",
                stem,
                audio.sample_rate,
                audio.channels,
                self.config.sample_rate,
                self.config.channels
            );
        }

        let wav_path = output_file(dir, stem, DC_FORMAT.pcm_wav_ext);
        write_pcm_wav(audio, &wav_path)?;

        if self.config.format == AudioFormat::Pcm {
            tracing::info!("Extracted audio {} as PCM", stem);
            return Ok(AudioOutput {
                path: wav_path,
                codec: None,
                degraded: None,
            });
        }

        for codec in &self.codecs {
            let output = output_file(dir, stem, codec.extension());
            if let Err(e) = clear_target(&output) {
                tracing::warn!("{}, trying next encoder", e);
                continue;
            }
            match codec.encode(&wav_path, &output) {
                Ok(()) if output.exists() => {
                    if let Err(e) = std::fs::remove_file(&wav_path) {
                        tracing::debug!("Could not remove {:?}: {}", wav_path, e);
                    }
                    tracing::info!("Extracted audio {} ({})", stem, codec.name());
                    return Ok(AudioOutput {
                        path: output,
                        codec: Some(codec.name()),
                        degraded: None,
                    });
                }
                Ok(()) => {
                    tracing::warn!("{} reported success but wrote no {:?}", codec.name(), output)
                }
                Err(e) => tracing::warn!("{}, trying next encoder", e),
            }
        }

        let reason = if self.codecs.is_empty() {
            "No ADPCM converter available, keeping WAV format".to_string()
        } else {
            "All ADPCM converters failed, keeping WAV format".to_string()
        };
        tracing::warn!("{}: {}", stem, reason);

        Ok(AudioOutput {
            path: wav_path,
            codec: None,
            degraded: Some(reason),
        })
    }
}

/// Write interleaved 16-bit PCM as a canonical WAV file
pub fn write_pcm_wav(audio: &DecodedAudio, path: &Path) -> Result<()> {
    let spec = hound::WavSpec {
        channels: audio.channels,
        sample_rate: audio.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).map_err(ExportError::wav(path))?;
    for &sample in &audio.samples {
        writer.write_sample(sample).map_err(ExportError::wav(path))?;
    }
    writer.finalize().map_err(ExportError::wav(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn clip(channels: u16, samples: Vec<i16>) -> DecodedAudio {
        DecodedAudio {
            name: "clip".into(),
            sample_rate: 11025,
            channels,
            samples,
        }
    }

    /// Codec that copies the WAV, or fails, and records that it ran
    struct FakeCodec {
        name: &'static str,
        fail: bool,
        calls: Rc<RefCell<Vec<&'static str>>>,
    }

    impl AudioCodec for FakeCodec {
        fn name(&self) -> &'static str {
            self.name
        }

        fn extension(&self) -> &'static str {
            "adx"
        }

        fn encode(&self, wav: &Path, output: &Path) -> Result<()> {
            self.calls.borrow_mut().push(self.name);
            if self.fail {
                return Err(ExportError::ExternalTool {
                    tool: self.name.to_string(),
                    reason: "boom".to_string(),
                });
            }
            std::fs::copy(wav, output).map_err(ExportError::io(output))?;
            Ok(())
        }
    }

    fn fake(
        name: &'static str,
        fail: bool,
        calls: &Rc<RefCell<Vec<&'static str>>>,
    ) -> Box<dyn AudioCodec> {
        Box::new(FakeCodec {
            name,
            fail,
            calls: Rc::clone(calls),
        })
    }

    #[test]
    fn test_validate_rejects_empty() {
        assert!(matches!(
            AudioEncoder::validate(&clip(1, vec![])),
            Err(ExportError::FormatMismatch(_))
        ));
    }

    #[test]
    fn test_validate_rejects_partial_frame() {
        assert!(matches!(
            AudioEncoder::validate(&clip(2, vec![1, 2, 3])),
            Err(ExportError::FormatMismatch(_))
        ));
    }

    #[test]
    fn test_no_codecs_degrades_to_playable_wav() {
        let dir = tempfile::tempdir().unwrap();
        let audio = clip(2, vec![0, 1, -1, 2, 100, -100]);
        let encoder = AudioEncoder::new(AudioConfig::default(), &ExternalTools::none());

        let out = encoder.encode(&audio, dir.path(), "clip").unwrap();
        assert!(out.degraded.is_some());
        assert_eq!(out.codec, None);
        assert_eq!(out.path, dir.path().join("clip.wav"));

        let mut reader = hound::WavReader::open(&out.path).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.sample_rate, 11025);
        assert_eq!(spec.channels, 2);
        assert_eq!(spec.bits_per_sample, 16);
        let samples: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(samples, audio.samples);
    }

    #[test]
    fn test_pcm_format_is_not_degraded() {
        let dir = tempfile::tempdir().unwrap();
        let calls = Rc::new(RefCell::new(Vec::new()));
        let config = AudioConfig {
            format: AudioFormat::Pcm,
            ..AudioConfig::default()
        };
        let encoder = AudioEncoder::with_codecs(config, vec![fake("adx", false, &calls)]);

        let out = encoder.encode(&clip(1, vec![5; 8]), dir.path(), "pcm").unwrap();
        assert_eq!(out.degraded, None);
        assert_eq!(out.codec, None);
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn test_primary_codec_wins() {
        let dir = tempfile::tempdir().unwrap();
        let calls = Rc::new(RefCell::new(Vec::new()));
        let encoder = AudioEncoder::with_codecs(
            AudioConfig::default(),
            vec![fake("primary", false, &calls), fake("fallback", false, &calls)],
        );

        let out = encoder.encode(&clip(1, vec![1; 16]), dir.path(), "hit").unwrap();
        assert_eq!(out.codec, Some("primary"));
        assert_eq!(out.path, dir.path().join("hit.adx"));
        assert_eq!(*calls.borrow(), vec!["primary"]);
        // Intermediate WAV is cleaned up once compressed output exists
        assert!(!dir.path().join("hit.wav").exists());
    }

    #[test]
    fn test_failed_primary_falls_through() {
        let dir = tempfile::tempdir().unwrap();
        let calls = Rc::new(RefCell::new(Vec::new()));
        let encoder = AudioEncoder::with_codecs(
            AudioConfig::default(),
            vec![fake("primary", true, &calls), fake("fallback", false, &calls)],
        );

        let out = encoder.encode(&clip(1, vec![1; 16]), dir.path(), "hit").unwrap();
        assert_eq!(out.codec, Some("fallback"));
        assert_eq!(*calls.borrow(), vec!["primary", "fallback"]);
    }

    #[test]
    fn test_all_codecs_failing_degrades() {
        let dir = tempfile::tempdir().unwrap();
        let calls = Rc::new(RefCell::new(Vec::new()));
        let encoder =
            AudioEncoder::with_codecs(AudioConfig::default(), vec![fake("primary", true, &calls)]);

        let out = encoder.encode(&clip(1, vec![1; 16]), dir.path(), "hit").unwrap();
        assert!(out.degraded.unwrap().contains("failed"));
        assert!(out.path.exists());
    }

    /// Codec that exits cleanly without producing anything
    struct SilentCodec;

    impl AudioCodec for SilentCodec {
        fn name(&self) -> &'static str {
            "silent"
        }

        fn extension(&self) -> &'static str {
            "adx"
        }

        fn encode(&self, _wav: &Path, _output: &Path) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_leftover_output_is_not_reused() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("hit.adx"), b"from an earlier run").unwrap();
        let encoder =
            AudioEncoder::with_codecs(AudioConfig::default(), vec![Box::new(SilentCodec)]);

        let out = encoder.encode(&clip(1, vec![1; 16]), dir.path(), "hit").unwrap();
        assert!(out.degraded.is_some());
        assert_eq!(out.codec, None);
        assert_eq!(out.path, dir.path().join("hit.wav"));
        assert!(!dir.path().join("hit.adx").exists());
    }

    #[test]
    fn test_chain_follows_installed_tools() {
        let tools = ExternalTools {
            adxtool: Some(PathBuf::from("/opt/bin/adxtool")),
            sox: Some(PathBuf::from("/usr/bin/sox")),
            pvr_converter: None,
        };
        let encoder = AudioEncoder::new(AudioConfig::default(), &tools);
        assert_eq!(encoder.codec_names(), vec!["adxtool", "sox"]);

        let only_sox = ExternalTools {
            sox: Some(PathBuf::from("/usr/bin/sox")),
            ..ExternalTools::none()
        };
        let encoder = AudioEncoder::new(AudioConfig::default(), &only_sox);
        assert_eq!(encoder.codec_names(), vec!["sox"]);
    }
}
