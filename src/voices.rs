//! Voice reference resolution.
//!
//! Voice-cloning synthesis conditions on a short reference recording of
//! the target speaker. A run either uses one sample for every question or
//! a directory of `<lecturer_id>.wav` samples with a default-voice
//! fallback. A question whose voice cannot be resolved is skipped by the
//! narrator; a missing single-voice sample aborts the run before any
//! synthesis.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum VoiceError {
    #[error("voice sample not found: {0}")]
    SampleNotFound(PathBuf),
}

/// Where voice reference samples come from.
#[derive(Debug, Clone)]
pub enum VoiceSource {
    /// One sample used for every question.
    Single(PathBuf),
    /// Per-question lookup of `<dir>/<lecturer_id>.wav`, falling back to
    /// `<dir>/<default_lecturer>.wav`.
    PerLecturer {
        dir: PathBuf,
        default_lecturer: String,
    },
}

impl VoiceSource {
    /// Check the startup-time requirements of this source.
    ///
    /// Only `Single` has one: the sample must exist before the batch
    /// starts. Per-lecturer lookups are resolved per question.
    pub fn validate(&self) -> Result<(), VoiceError> {
        match self {
            VoiceSource::Single(path) if !path.exists() => {
                Err(VoiceError::SampleNotFound(path.clone()))
            }
            _ => Ok(()),
        }
    }

    /// Resolve the reference sample for one question.
    pub fn resolve(&self, lecturer_id: Option<&str>) -> Option<PathBuf> {
        match self {
            VoiceSource::Single(path) => Some(path.clone()),
            VoiceSource::PerLecturer {
                dir,
                default_lecturer,
            } => {
                if let Some(id) = lecturer_id {
                    let candidate = dir.join(format!("{id}.wav"));
                    if candidate.exists() {
                        return Some(candidate);
                    }
                    log::warn!(
                        "no voice sample for lecturer {id:?} at {}; trying default",
                        candidate.display()
                    );
                }

                let fallback = dir.join(format!("{default_lecturer}.wav"));
                if fallback.exists() {
                    Some(fallback)
                } else {
                    log::warn!("default voice sample not found at {}", fallback.display());
                    None
                }
            }
        }
    }
}
