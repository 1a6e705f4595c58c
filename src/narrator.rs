//! Batch narration: the per-question pipeline.
//!
//! For each question the narrator resolves a voice, plans the speech
//! units, synthesizes every unit, joins question and options audio with a
//! short silence gap and writes the WAV files. Questions are processed
//! strictly sequentially, and a failure inside one question (no voice, a
//! synthesis error, an unwritable file) skips that question only — a
//! large batch keeps its partial progress. Only startup problems (bank,
//! output directory, single voice sample) abort the run.

use std::fs;
use std::path::{Path, PathBuf};

use crate::bank::{self, BankError};
use crate::config::NarrationConfig;
use crate::speech::{plan_units, QuestionRecord, SpeechKind};
use crate::voices::{VoiceError, VoiceSource};
use crate::{concat_with_silence, SynthesisEngine, SynthesisResult};

#[derive(Debug, thiserror::Error)]
pub enum NarrateError {
    #[error("failed to create output directory {dir}: {source}")]
    OutputDir {
        dir: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Bank(#[from] BankError),
    #[error(transparent)]
    Voice(#[from] VoiceError),
}

/// Why one question was skipped. Contained to that question.
#[derive(Debug, thiserror::Error)]
enum QuestionSkip {
    #[error("no voice sample resolved")]
    NoVoice,
    #[error("synthesis failed: {0}")]
    Synthesis(String),
    #[error("failed to write {path}: {message}")]
    Write { path: PathBuf, message: String },
}

/// Outcome of one batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Questions fully narrated.
    pub questions: usize,
    /// WAV files written.
    pub files_written: usize,
    /// Questions skipped after a recoverable failure.
    pub skipped: usize,
}

/// Drives a [`SynthesisEngine`] over a question bank.
pub struct Narrator<'a, E: SynthesisEngine> {
    engine: &'a mut E,
    config: &'a NarrationConfig,
}

impl<'a, E: SynthesisEngine> Narrator<'a, E> {
    pub fn new(engine: &'a mut E, config: &'a NarrationConfig) -> Self {
        Self { engine, config }
    }

    /// Load a bank file and narrate it. See [`Narrator::narrate_bank`].
    pub fn narrate_bank_file(
        &mut self,
        bank_path: &Path,
        voices: &VoiceSource,
    ) -> Result<BatchSummary, NarrateError> {
        let questions = bank::load_bank(bank_path)?;
        self.narrate_bank(&questions, voices)
    }

    /// Narrate every question into the configured output directory.
    ///
    /// Per-question failures are logged and skipped; the returned summary
    /// reports how many questions made it through.
    pub fn narrate_bank(
        &mut self,
        questions: &[QuestionRecord],
        voices: &VoiceSource,
    ) -> Result<BatchSummary, NarrateError> {
        voices.validate()?;
        fs::create_dir_all(&self.config.output_dir).map_err(|source| NarrateError::OutputDir {
            dir: self.config.output_dir.clone(),
            source,
        })?;

        let mut summary = BatchSummary::default();
        for (index, question) in questions.iter().enumerate() {
            let number = index + 1;
            match self.narrate_question(number, question, voices) {
                Ok(written) => {
                    summary.questions += 1;
                    summary.files_written += written;
                }
                Err(skip) => {
                    log::warn!("skipping question {number}: {skip}");
                    summary.skipped += 1;
                }
            }
        }

        log::info!(
            "narrated {} question(s), wrote {} file(s), skipped {} in {}",
            summary.questions,
            summary.files_written,
            summary.skipped,
            self.config.output_dir.display()
        );
        Ok(summary)
    }

    fn narrate_question(
        &mut self,
        number: usize,
        question: &QuestionRecord,
        voices: &VoiceSource,
    ) -> Result<usize, QuestionSkip> {
        let voice = voices
            .resolve(question.lecturer_id.as_deref())
            .ok_or(QuestionSkip::NoVoice)?;

        let units = plan_units(question, self.config);

        // Synthesize everything before writing anything, so a failure
        // mid-question leaves no partial artifacts behind.
        let mut rendered: Vec<(SpeechKind, SynthesisResult)> = Vec::with_capacity(units.len());
        for unit in &units {
            log::debug!("question {number}: synthesizing {:?} unit", unit.kind);
            let audio = self
                .engine
                .synthesize(&unit.text(), &voice)
                .map_err(|e| QuestionSkip::Synthesis(e.to_string()))?;
            rendered.push((unit.kind, audio));
        }

        let mut question_audio = None;
        let mut options_audio = None;
        let mut extras: Vec<(SpeechKind, SynthesisResult)> = Vec::new();
        for (kind, audio) in rendered {
            match kind {
                SpeechKind::Question => question_audio = Some(audio),
                SpeechKind::Options => options_audio = Some(audio),
                _ => extras.push((kind, audio)),
            }
        }

        let mut written = 0;
        if let (Some(question_audio), Some(options_audio)) = (question_audio, options_audio) {
            let joined = concat_with_silence(
                &question_audio,
                &options_audio,
                self.config.pause_seconds,
            );
            self.write_unit(&format!("q{number:02}.wav"), &joined)?;
            written += 1;
        }

        for (kind, audio) in extras {
            let filename = match kind {
                SpeechKind::Answer => format!("q{number:02}_answer.wav"),
                SpeechKind::Explanation => format!("q{number:02}_explanation.wav"),
                SpeechKind::Combined => format!("q{number:02}_combined.wav"),
                SpeechKind::Question | SpeechKind::Options => continue,
            };
            self.write_unit(&filename, &audio)?;
            written += 1;
        }

        Ok(written)
    }

    fn write_unit(&self, filename: &str, audio: &SynthesisResult) -> Result<(), QuestionSkip> {
        let path = self.config.output_dir.join(filename);
        audio.write_wav(&path).map_err(|e| QuestionSkip::Write {
            path: path.clone(),
            message: e.to_string(),
        })?;
        log::info!("saved {}", path.display());
        Ok(())
    }
}
