//! Run configuration.
//!
//! One immutable [`NarrationConfig`] is built at startup and passed by
//! reference into the assembler and the narrator; nothing reads ambient
//! global state during processing.

use std::path::PathBuf;

use derive_builder::Builder;

use crate::speech::RenderingMode;

/// Phrase spoken before every question body unless overridden.
pub const DEFAULT_INTRO: &str = "Not so fast, I have a question for you.";

/// Default silence between the question audio and the options audio.
pub const DEFAULT_PAUSE_SECONDS: f32 = 0.35;

/// Process-wide narration settings, fixed for the duration of a run.
#[derive(Debug, Clone, Builder)]
#[builder(setter(into))]
pub struct NarrationConfig {
    /// Symbol/punctuation rendering policy.
    #[builder(default)]
    pub mode: RenderingMode,
    /// Phrase spoken before each question body.
    #[builder(default = "DEFAULT_INTRO.to_string()")]
    pub intro_phrase: String,
    /// Silence gap between question and options audio, in seconds.
    #[builder(default = "DEFAULT_PAUSE_SECONDS")]
    pub pause_seconds: f32,
    /// Synthesize the correct answer after the options.
    #[builder(default)]
    pub include_answer: bool,
    /// Synthesize the explanation.
    #[builder(default)]
    pub include_explanation: bool,
    /// `true`: answer/explanation become their own audio files.
    /// `false`: question, options, answer and explanation are folded into
    /// one combined file.
    #[builder(default = "true")]
    pub explanation_separate_file: bool,
    /// Directory the WAV files are written to; created if absent.
    #[builder(default = "PathBuf::from(\"tts_out\")")]
    pub output_dir: PathBuf,
}

impl Default for NarrationConfig {
    fn default() -> Self {
        Self {
            mode: RenderingMode::default(),
            intro_phrase: DEFAULT_INTRO.to_string(),
            pause_seconds: DEFAULT_PAUSE_SECONDS,
            include_answer: false,
            include_explanation: false,
            explanation_separate_file: true,
            output_dir: PathBuf::from("tts_out"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults_match_default() {
        let built = NarrationConfigBuilder::default().build().unwrap();
        let default = NarrationConfig::default();
        assert_eq!(built.mode, default.mode);
        assert_eq!(built.intro_phrase, default.intro_phrase);
        assert_eq!(built.pause_seconds, default.pause_seconds);
        assert_eq!(built.include_answer, default.include_answer);
        assert_eq!(built.explanation_separate_file, default.explanation_separate_file);
        assert_eq!(built.output_dir, default.output_dir);
    }

    #[test]
    fn builder_overrides_take_effect() {
        let config = NarrationConfigBuilder::default()
            .mode(RenderingMode::Literal)
            .intro_phrase("Listen up.")
            .include_answer(true)
            .explanation_separate_file(false)
            .output_dir("narration")
            .build()
            .unwrap();
        assert_eq!(config.mode, RenderingMode::Literal);
        assert_eq!(config.intro_phrase, "Listen up.");
        assert!(config.include_answer);
        assert!(!config.explanation_separate_file);
        assert_eq!(config.output_dir, PathBuf::from("narration"));
    }
}
