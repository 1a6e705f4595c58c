//! Chatterbox-style voice-cloning engine implementation.
//!
//! This module provides a synthesis engine backed by an ONNX export of a
//! Chatterbox-style voice-cloning model: every request carries the text
//! to speak plus a short reference recording whose voice is cloned.
//!
//! # Model Directory Layout
//!
//! ```text
//! models/chatterbox/
//! ├── chatterbox-quant.onnx   # quantized model (preferred when present)
//! └── config.json             # character vocabulary and sample rate
//! ```
//!
//! `config.json` is optional; without it a printable-ASCII vocabulary and
//! a 24 kHz output rate are assumed.
//!
//! # Voice References
//!
//! Any mono or multi-channel WAV works as a reference; multi-channel
//! input is downmixed and integer formats are converted to f32 before
//! inference.
//!
//! # Example
//!
//! ```rust,no_run
//! use qbank_tts::{SynthesisEngine, engines::chatterbox::ChatterboxEngine};
//! use std::path::PathBuf;
//!
//! let mut engine = ChatterboxEngine::new();
//! engine.load_model(&PathBuf::from("models/chatterbox"))?;
//!
//! let result = engine.synthesize("Hello!", &PathBuf::from("voices/narrator.wav"))?;
//! println!("Generated {} samples at {}Hz", result.samples.len(), result.sample_rate);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod engine;
pub mod model;

pub use engine::{ChatterboxEngine, ChatterboxModelParams};
pub use model::ChatterboxError;
