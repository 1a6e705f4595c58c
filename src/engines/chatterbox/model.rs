use std::collections::HashMap;
use std::path::{Path, PathBuf};

use ndarray::Array2;
use ort::execution_providers::CPUExecutionProvider;
use ort::inputs;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::TensorRef;
use serde::Deserialize;

/// Output sample rate assumed when config.json does not specify one.
pub const DEFAULT_SAMPLE_RATE: u32 = 24000;

#[derive(thiserror::Error, Debug)]
pub enum ChatterboxError {
    #[error("ONNX runtime error: {0}")]
    Ort(#[from] ort::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Array shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),
    #[error("Invalid config.json: {0}")]
    Config(String),
    #[error("Voice reference {path}: {message}")]
    VoiceReference { path: PathBuf, message: String },
    #[error("Model not loaded. Call load_model() first.")]
    ModelNotLoaded,
}

/// The subset of config.json the engine reads.
#[derive(Debug, Deserialize)]
struct ModelConfig {
    /// Single-character strings mapped to token IDs.
    vocab: HashMap<String, i64>,
    #[serde(default = "default_sample_rate")]
    sample_rate: u32,
}

fn default_sample_rate() -> u32 {
    DEFAULT_SAMPLE_RATE
}

/// Internal Chatterbox ONNX model state.
pub struct ChatterboxModel {
    session: Session,
    vocab: HashMap<char, i64>,
    pub(crate) sample_rate: u32,
    /// Detected text input name: "input_ids" or "tokens"
    tokens_input_name: String,
    /// Detected reference-audio input name: "reference", "prompt" or "speaker"
    reference_input_name: String,
}

impl ChatterboxModel {
    /// Load the Chatterbox model from a directory.
    ///
    /// The directory must contain an `.onnx` file (preferably
    /// `chatterbox-quant.onnx`) and may contain a `config.json` with the
    /// character vocabulary and output sample rate.
    pub fn load(
        model_dir: &Path,
        num_threads: Option<usize>,
        optimized_cache_path: Option<&Path>,
    ) -> Result<Self, ChatterboxError> {
        let onnx_path = find_onnx_file(model_dir)?;
        log::info!("Loading Chatterbox model from {}", onnx_path.display());

        let session = init_session(&onnx_path, num_threads, optimized_cache_path)?;

        let tokens_input_name = detect_input(&session, &["input_ids", "tokens"], "input_ids");
        let reference_input_name =
            detect_input(&session, &["reference", "prompt", "speaker"], "reference");
        log::info!(
            "Detected inputs: tokens='{tokens_input_name}', reference='{reference_input_name}'"
        );

        let config_path = model_dir.join("config.json");
        let (vocab, sample_rate) = if config_path.exists() {
            log::info!("Loading vocab from config.json");
            load_config(&config_path)?
        } else {
            log::warn!("config.json not found, using printable-ASCII vocab");
            (fallback_vocab(), DEFAULT_SAMPLE_RATE)
        };

        Ok(Self {
            session,
            vocab,
            sample_rate,
            tokens_input_name,
            reference_input_name,
        })
    }

    /// Synthesize audio from text, cloning the voice in the reference WAV.
    pub fn synthesize_text(
        &mut self,
        text: &str,
        voice_reference: &Path,
    ) -> Result<Vec<f32>, ChatterboxError> {
        let tokens = encode_text(text, &self.vocab);
        if tokens.is_empty() {
            log::warn!("No tokens produced for text: {text:?}");
            return Ok(vec![]);
        }

        let reference = load_reference_samples(voice_reference)?;
        if reference.is_empty() {
            return Err(ChatterboxError::VoiceReference {
                path: voice_reference.to_path_buf(),
                message: "reference sample contains no audio".to_string(),
            });
        }

        log::debug!(
            "Running inference: {} token(s), {} reference sample(s)",
            tokens.len(),
            reference.len()
        );

        let tokens_arr = Array2::from_shape_vec((1, tokens.len()), tokens)?;
        let reference_arr =
            ndarray::ArrayView2::from_shape((1, reference.len()), reference.as_slice())?;

        let outputs = self.session.run(inputs![
            self.tokens_input_name.as_str() => TensorRef::from_array_view(tokens_arr.view())?,
            self.reference_input_name.as_str() => TensorRef::from_array_view(reference_arr)?,
        ])?;

        let first_output = outputs
            .iter()
            .next()
            .ok_or_else(|| ChatterboxError::Ort(ort::Error::new("No output from model")))?;
        let waveform = first_output.1.try_extract_array::<f32>()?;

        Ok(waveform.as_slice().unwrap_or(&[]).to_vec())
    }
}

/// Find the ONNX model file in the given directory.
///
/// Prefers `chatterbox-quant.onnx`, then falls back to the first `.onnx`
/// file found.
fn find_onnx_file(model_dir: &Path) -> Result<PathBuf, ChatterboxError> {
    let preferred = model_dir.join("chatterbox-quant.onnx");
    if preferred.exists() {
        return Ok(preferred);
    }

    for entry in std::fs::read_dir(model_dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) == Some("onnx") {
            log::info!("Using ONNX file: {}", path.display());
            return Ok(path);
        }
    }

    Err(ChatterboxError::Io(std::io::Error::new(
        std::io::ErrorKind::NotFound,
        format!("No .onnx file found in {}", model_dir.display()),
    )))
}

/// Initialize an ONNX session with optional on-disk graph caching.
///
/// On first load with a cache path the Level3-optimized graph is
/// serialised to disk; later loads read it back at `Disable` level,
/// skipping the multi-second re-optimization. Without a cache path the
/// graph is optimized on every load.
fn init_session(
    onnx_path: &Path,
    num_threads: Option<usize>,
    optimized_cache_path: Option<&Path>,
) -> Result<Session, ChatterboxError> {
    let providers = vec![CPUExecutionProvider::default().build()];

    let (load_path, opt_level, cache_to_write) = match optimized_cache_path {
        Some(cache) if cache.exists() => {
            log::info!("Loading pre-optimized graph from {}", cache.display());
            (cache, GraphOptimizationLevel::Disable, None)
        }
        Some(cache) => {
            log::info!(
                "First load: optimizing graph, caching to {}",
                cache.display()
            );
            (onnx_path, GraphOptimizationLevel::Level3, Some(cache))
        }
        None => (onnx_path, GraphOptimizationLevel::Level3, None),
    };

    let mut builder = Session::builder()?
        .with_optimization_level(opt_level)?
        .with_execution_providers(providers)?
        .with_parallel_execution(true)?;

    if let Some(cache) = cache_to_write {
        builder = builder.with_optimized_model_path(cache)?;
    }

    if let Some(threads) = num_threads {
        builder = builder
            .with_intra_threads(threads)?
            .with_inter_threads(threads)?;
    }

    Ok(builder.commit_from_file(load_path)?)
}

/// Pick the first session input matching one of `candidates`, defaulting
/// when none is found.
fn detect_input(session: &Session, candidates: &[&str], default: &str) -> String {
    for input in session.inputs() {
        if candidates.contains(&input.name()) {
            return input.name().to_string();
        }
    }
    default.to_string()
}

/// Load the character vocabulary and sample rate from config.json.
fn load_config(config_path: &Path) -> Result<(HashMap<char, i64>, u32), ChatterboxError> {
    let content = std::fs::read_to_string(config_path)?;
    let config: ModelConfig = serde_json::from_str(&content)
        .map_err(|e| ChatterboxError::Config(format!("Failed to parse JSON: {e}")))?;

    let mut vocab = HashMap::new();
    for (key, id) in config.vocab {
        let ch = key
            .chars()
            .next()
            .ok_or_else(|| ChatterboxError::Config("Empty key in vocab".to_string()))?;
        vocab.insert(ch, id);
    }

    Ok((vocab, config.sample_rate))
}

/// Fallback character vocabulary: printable ASCII in code-point order,
/// IDs starting at 1 (0 is the pad token).
fn fallback_vocab() -> HashMap<char, i64> {
    (' '..='~')
        .enumerate()
        .map(|(index, ch)| (ch, index as i64 + 1))
        .collect()
}

/// Encode text to token IDs. Characters not in the vocab are silently
/// dropped, matching the tolerance of the reference implementation.
fn encode_text(text: &str, vocab: &HashMap<char, i64>) -> Vec<i64> {
    text.chars().filter_map(|ch| vocab.get(&ch).copied()).collect()
}

/// Read a voice reference WAV as mono f32 samples.
///
/// Integer formats are scaled to [-1, 1]; multi-channel audio is
/// downmixed by averaging each frame.
fn load_reference_samples(path: &Path) -> Result<Vec<f32>, ChatterboxError> {
    let mut reader = hound::WavReader::open(path).map_err(|e| voice_error(path, e))?;
    let spec = reader.spec();

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<_, _>>()
            .map_err(|e| voice_error(path, e))?,
        hound::SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<Result<_, _>>()
                .map_err(|e| voice_error(path, e))?
        }
    };

    Ok(downmix(samples, spec.channels as usize))
}

fn voice_error(path: &Path, e: impl std::fmt::Display) -> ChatterboxError {
    ChatterboxError::VoiceReference {
        path: path.to_path_buf(),
        message: e.to_string(),
    }
}

fn downmix(samples: Vec<f32>, channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return samples;
    }
    samples
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{downmix, encode_text, fallback_vocab, load_reference_samples};

    #[test]
    fn unknown_characters_are_dropped_from_encoding() {
        let vocab = fallback_vocab();
        let ids = encode_text("ab✗c", &vocab);
        assert_eq!(ids.len(), 3);
        assert!(ids.iter().all(|&id| id > 0));
    }

    #[test]
    fn fallback_vocab_reserves_zero_for_padding() {
        let vocab = fallback_vocab();
        assert!(vocab.values().all(|&id| id >= 1));
        assert_eq!(vocab[&' '], 1);
    }

    #[test]
    fn stereo_is_downmixed_by_frame_average() {
        let mono = downmix(vec![1.0, 0.0, 0.5, 0.5], 2);
        assert_eq!(mono, vec![0.5, 0.5]);
    }

    #[test]
    fn integer_wavs_are_scaled_to_unit_range() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ref.wav");
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 24000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        writer.write_sample(i16::MAX).unwrap();
        writer.write_sample(0i16).unwrap();
        writer.finalize().unwrap();

        let samples = load_reference_samples(&path).unwrap();
        assert_eq!(samples.len(), 2);
        assert!((samples[0] - 1.0).abs() < 1e-3);
        assert_eq!(samples[1], 0.0);
    }
}
