//! Speech synthesis engines.
//!
//! This module contains implementations of voice-cloning synthesis engines.
//!
//! # Available Engines
//!
//! Enable engines via Cargo features:
//! - `chatterbox` - Chatterbox-style voice cloning (ONNX format)

#[cfg(feature = "chatterbox")]
pub mod chatterbox;
