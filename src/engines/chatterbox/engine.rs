use std::path::{Path, PathBuf};

use crate::{SynthesisEngine, SynthesisResult};

use super::model::{ChatterboxError, ChatterboxModel};

/// Parameters for configuring Chatterbox model loading.
#[derive(Debug, Clone, Default)]
pub struct ChatterboxModelParams {
    /// Number of CPU threads to use for inference.
    /// `None` uses the ORT default (typically all available cores).
    pub num_threads: Option<usize>,
    /// Path for caching the Level3-optimized ONNX graph.
    ///
    /// Always point this at a writable location; bundled resource
    /// directories may be read-only.
    pub optimized_model_cache_path: Option<PathBuf>,
}

/// Chatterbox-style voice-cloning text-to-speech engine.
///
/// Every synthesis call takes the text to speak and a reference WAV whose
/// voice is cloned.
///
/// # Quick Start
///
/// ```rust,no_run
/// use qbank_tts::{SynthesisEngine, engines::chatterbox::ChatterboxEngine};
/// use std::path::PathBuf;
///
/// let mut engine = ChatterboxEngine::new();
/// engine.load_model(&PathBuf::from("models/chatterbox"))?;
/// let result = engine.synthesize("Hello, world!", &PathBuf::from("voices/narrator.wav"))?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct ChatterboxEngine {
    model: Option<ChatterboxModel>,
    model_path: Option<PathBuf>,
}

impl Default for ChatterboxEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatterboxEngine {
    pub fn new() -> Self {
        Self {
            model: None,
            model_path: None,
        }
    }
}

impl Drop for ChatterboxEngine {
    fn drop(&mut self) {
        self.unload_model();
    }
}

impl SynthesisEngine for ChatterboxEngine {
    type ModelParams = ChatterboxModelParams;

    fn load_model_with_params(
        &mut self,
        model_path: &Path,
        params: Self::ModelParams,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let model = ChatterboxModel::load(
            model_path,
            params.num_threads,
            params.optimized_model_cache_path.as_deref(),
        )?;
        self.model = Some(model);
        self.model_path = Some(model_path.to_path_buf());
        Ok(())
    }

    fn unload_model(&mut self) {
        self.model = None;
        self.model_path = None;
    }

    fn synthesize(
        &mut self,
        text: &str,
        voice_reference: &Path,
    ) -> Result<SynthesisResult, Box<dyn std::error::Error>> {
        let model = self.model.as_mut().ok_or(ChatterboxError::ModelNotLoaded)?;

        let samples = model.synthesize_text(text, voice_reference)?;
        let sample_rate = model.sample_rate;

        Ok(SynthesisResult {
            samples,
            sample_rate,
        })
    }
}
