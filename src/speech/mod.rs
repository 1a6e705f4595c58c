//! The narration core: text normalization and utterance assembly.
//!
//! Everything in this module is pure — no I/O, no state across calls.
//! [`normalize`] turns one authored string into speakable English and
//! [`plan_units`] turns one [`QuestionRecord`] into the ordered
//! [`SpeechUnit`]s a synthesis engine will speak.

pub mod assemble;
pub mod normalize;

pub use assemble::{
    assemble_answer, assemble_explanation, assemble_question, plan_units, QuestionRecord,
    SpeechKind, SpeechUnit,
};
pub use normalize::{normalize, RenderingMode};
