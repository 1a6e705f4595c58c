//! # qbank-tts
//!
//! A Rust library that turns an XML question bank into spoken narration
//! using voice-cloning text-to-speech.
//!
//! ## Features
//!
//! - **Speakable text**: converts LaTeX-like markup, Big-O notation,
//!   exponents and logic/set symbols into plain spoken English
//! - **Utterance assembly**: intro + question, labelled options, and
//!   optional answer/explanation segments per question
//! - **Voice cloning**: per-lecturer voice reference samples with a
//!   default-voice fallback
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! qbank-tts = { version = "0.3", features = ["chatterbox"] }
//! ```
//!
//! ```ignore
//! use std::path::{Path, PathBuf};
//! use qbank_tts::{bank, config::NarrationConfig, narrator::Narrator, voices::VoiceSource};
//! use qbank_tts::engines::chatterbox::ChatterboxEngine;
//! use qbank_tts::SynthesisEngine;
//!
//! let mut engine = ChatterboxEngine::new();
//! engine.load_model(&PathBuf::from("models/chatterbox"))?;
//!
//! let questions = bank::load_bank(Path::new("questions.xml"))?;
//! let config = NarrationConfig::default();
//! let voices = VoiceSource::Single(PathBuf::from("voices/narrator.wav"));
//!
//! let summary = Narrator::new(&mut engine, &config).narrate_bank(&questions, &voices)?;
//! println!("wrote {} file(s)", summary.files_written);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod bank;
pub mod config;
pub mod engines;
pub mod narrator;
pub mod speech;
pub mod voices;

use std::path::Path;

/// The result of a synthesis (text-to-speech) operation.
///
/// Contains raw f32 audio samples and the sample rate of the output audio.
#[derive(Debug, Clone)]
pub struct SynthesisResult {
    /// Raw mono audio samples as f32 values
    pub samples: Vec<f32>,
    /// Sample rate of the audio
    pub sample_rate: u32,
}

impl SynthesisResult {
    /// Write the audio to a 32-bit float WAV file.
    pub fn write_wav(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: self.sample_rate,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };
        let mut writer = hound::WavWriter::create(path, spec)?;
        for &sample in &self.samples {
            writer.write_sample(sample)?;
        }
        writer.finalize()?;
        Ok(())
    }

    /// Duration of the audio in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// Concatenate two waveforms with a silence gap of `pause_seconds` between them.
///
/// Both inputs must come from the same engine and share a sample rate; the
/// first input's rate is used for the gap length and the output.
pub fn concat_with_silence(
    first: &SynthesisResult,
    second: &SynthesisResult,
    pause_seconds: f32,
) -> SynthesisResult {
    let gap = (first.sample_rate as f32 * pause_seconds.max(0.0)).round() as usize;
    let mut samples = Vec::with_capacity(first.samples.len() + gap + second.samples.len());
    samples.extend_from_slice(&first.samples);
    samples.resize(samples.len() + gap, 0.0);
    samples.extend_from_slice(&second.samples);

    SynthesisResult {
        samples,
        sample_rate: first.sample_rate,
    }
}

/// Common interface for voice-cloning synthesis engines.
///
/// This trait is the narrow seam between the narration core and the external
/// TTS model: the core only ever asks an engine to speak a finished text in
/// the voice of a reference sample. Engines may have different parameter
/// types for model loading.
pub trait SynthesisEngine {
    /// Parameters for configuring model loading (threads, caching, etc.)
    type ModelParams: Default;

    /// Load a model from the specified path using default parameters.
    fn load_model(&mut self, model_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        self.load_model_with_params(model_path, Self::ModelParams::default())
    }

    /// Load a model from the specified path with custom parameters.
    fn load_model_with_params(
        &mut self,
        model_path: &Path,
        params: Self::ModelParams,
    ) -> Result<(), Box<dyn std::error::Error>>;

    /// Unload the currently loaded model and free associated resources.
    fn unload_model(&mut self);

    /// Synthesize speech from the given text, cloning the voice in the
    /// reference audio sample.
    fn synthesize(
        &mut self,
        text: &str,
        voice_reference: &Path,
    ) -> Result<SynthesisResult, Box<dyn std::error::Error>>;

    /// Synthesize speech from the given text and write to a WAV file.
    ///
    /// Default implementation calls `synthesize()` then `SynthesisResult::write_wav()`.
    fn synthesize_to_file(
        &mut self,
        text: &str,
        voice_reference: &Path,
        wav_path: &Path,
    ) -> Result<(), Box<dyn std::error::Error>> {
        self.synthesize(text, voice_reference)?.write_wav(wav_path)
    }
}

#[cfg(test)]
mod tests {
    use super::{concat_with_silence, SynthesisResult};

    fn result(samples: Vec<f32>) -> SynthesisResult {
        SynthesisResult {
            samples,
            sample_rate: 1000,
        }
    }

    #[test]
    fn silence_gap_has_rounded_sample_count() {
        let joined = concat_with_silence(&result(vec![0.5; 10]), &result(vec![0.25; 20]), 0.35);
        assert_eq!(joined.samples.len(), 10 + 350 + 20);
        assert_eq!(joined.sample_rate, 1000);
        assert!(joined.samples[10..360].iter().all(|&s| s == 0.0));
        assert_eq!(joined.samples[360], 0.25);
    }

    #[test]
    fn zero_pause_concatenates_directly() {
        let joined = concat_with_silence(&result(vec![1.0; 4]), &result(vec![-1.0; 4]), 0.0);
        assert_eq!(joined.samples.len(), 8);
        assert_eq!(joined.samples[4], -1.0);
    }

    #[test]
    fn negative_pause_is_clamped_to_zero() {
        let joined = concat_with_silence(&result(vec![1.0; 4]), &result(vec![-1.0; 4]), -1.0);
        assert_eq!(joined.samples.len(), 8);
    }

    #[test]
    fn duration_tracks_sample_rate() {
        assert_eq!(result(vec![0.0; 500]).duration_secs(), 0.5);
    }

    #[test]
    fn wav_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.wav");
        result(vec![0.0, 0.5, -0.5]).write_wav(&path).unwrap();

        let mut reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.spec().sample_rate, 1000);
        let samples: Vec<f32> = reader.samples::<f32>().map(|s| s.unwrap()).collect();
        assert_eq!(samples, vec![0.0, 0.5, -0.5]);
    }
}
