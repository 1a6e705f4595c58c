//! Utterance assembly: one question record to synthesis-ready text units.
//!
//! The assembler decides what is actually spoken: an intro phrase plus the
//! question body, a labelled options block, and (depending on
//! configuration) an answer and explanation. Neither the topic nor a
//! "question number" marker is ever spoken; narration should sound like a
//! person asking, not a form being read out.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::NarrationConfig;
use crate::speech::normalize::{normalize, RenderingMode};

/// Immutable view of one parsed question.
///
/// Constructed by the bank parser, consumed once by the assembler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionRecord {
    /// Question body text, possibly containing markup.
    pub text: String,
    /// Option bodies in authored order, each optionally prefixed with a
    /// single-letter label (`"A: ..."`).
    pub options: Vec<String>,
    /// Zero-based index of the correct option, when present and parseable.
    pub correct_option_index: Option<usize>,
    pub explanation: Option<String>,
    /// Identifier used to pick a voice reference sample.
    pub lecturer_id: Option<String>,
}

/// What a [`SpeechUnit`] represents, which also determines its output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeechKind {
    Question,
    Options,
    Answer,
    Explanation,
    Combined,
}

/// One complete text payload destined for a single synthesis call.
///
/// Every segment is speakable: free of raw LaTeX commands, backtick code
/// spans and, in literal mode, symbolic punctuation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechUnit {
    pub kind: SpeechKind,
    pub segments: Vec<String>,
}

impl SpeechUnit {
    fn single(kind: SpeechKind, segment: String) -> Self {
        Self {
            kind,
            segments: vec![segment],
        }
    }

    /// The full text handed to the synthesis engine.
    pub fn text(&self) -> String {
        self.segments.join(" ")
    }
}

const OPTION_LETTERS: [&str; 6] = ["A", "B", "C", "D", "E", "F"];

/// `"A: body"`-style prefix on an option.
static EXPLICIT_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^\s*([A-Za-z])\s*:\s*(.*)$").expect("valid regex"));

/// Label for an option that carries no explicit one. Past the letter
/// sequence, labels continue with 1-based numbers.
fn positional_label(position: usize) -> String {
    OPTION_LETTERS
        .get(position)
        .map(|letter| (*letter).to_string())
        .unwrap_or_else(|| (position + 1).to_string())
}

/// Split an option into its spoken label and body, reusing an explicit
/// `"<letter>: "` prefix (upper-cased) when the author wrote one.
fn option_label_and_body(position: usize, option: &str) -> (String, String) {
    match EXPLICIT_LABEL.captures(option) {
        Some(caps) => (caps[1].to_uppercase(), caps[2].to_string()),
        None => (positional_label(position), option.to_string()),
    }
}

/// Build the intro+question unit and the options unit for one question.
///
/// The options unit holds a single segment: every rendered option joined
/// with single spaces.
pub fn assemble_question(
    q: &QuestionRecord,
    intro_phrase: &str,
    mode: RenderingMode,
) -> (SpeechUnit, SpeechUnit) {
    let question = format!("{intro_phrase} {}.", normalize(&q.text, mode));

    let rendered: Vec<String> = q
        .options
        .iter()
        .enumerate()
        .map(|(position, option)| {
            let (label, body) = option_label_and_body(position, option);
            format!("Option {label}: {}.", normalize(&body, mode))
        })
        .collect();

    (
        SpeechUnit::single(SpeechKind::Question, question),
        SpeechUnit::single(SpeechKind::Options, rendered.join(" ")),
    )
}

/// Build the spoken answer sentence, or `None` when `correct_index` does
/// not name an option.
///
/// An out-of-range index is authored data corruption; it is surfaced to
/// the caller as an absent answer rather than silently re-labelled.
pub fn assemble_answer(
    correct_index: usize,
    options: &[String],
    mode: RenderingMode,
) -> Option<String> {
    let raw = options.get(correct_index)?;
    let body = match EXPLICIT_LABEL.captures(raw) {
        Some(caps) => caps[2].to_string(),
        None => raw.clone(),
    };
    Some(format!(
        "The correct answer is option {}: {}.",
        positional_label(correct_index),
        normalize(&body, mode)
    ))
}

pub fn assemble_explanation(text: &str, mode: RenderingMode) -> String {
    format!("Explanation: {}", normalize(text, mode))
}

/// Turn one question into its ordered synthesis units under the given
/// configuration.
///
/// The question and options units always come first; they become the main
/// per-question audio file. When an answer and/or explanation is requested:
/// with `explanation_separate_file` they follow as independent units, and
/// without it they are folded together with the question and options into
/// exactly one `Combined` unit holding all parts in order.
pub fn plan_units(q: &QuestionRecord, config: &NarrationConfig) -> Vec<SpeechUnit> {
    let (question, options) = assemble_question(q, &config.intro_phrase, config.mode);

    let answer = if config.include_answer {
        match q.correct_option_index {
            Some(index) => {
                let spoken = assemble_answer(index, &q.options, config.mode);
                if spoken.is_none() {
                    log::warn!(
                        "correct option index {index} is out of range for {} option(s); \
                         omitting answer",
                        q.options.len()
                    );
                }
                spoken
            }
            None => None,
        }
    } else {
        None
    };

    let explanation = if config.include_explanation {
        q.explanation
            .as_deref()
            .map(|text| assemble_explanation(text, config.mode))
    } else {
        None
    };

    let mut units = vec![question, options];
    if answer.is_none() && explanation.is_none() {
        return units;
    }

    if config.explanation_separate_file {
        if let Some(spoken) = answer {
            units.push(SpeechUnit::single(SpeechKind::Answer, spoken));
        }
        if let Some(spoken) = explanation {
            units.push(SpeechUnit::single(SpeechKind::Explanation, spoken));
        }
    } else {
        let mut segments: Vec<String> = units.iter().flat_map(|u| u.segments.clone()).collect();
        segments.extend(answer);
        segments.extend(explanation);
        units.push(SpeechUnit {
            kind: SpeechKind::Combined,
            segments,
        });
    }

    units
}
