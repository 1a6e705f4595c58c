//! Question bank parsing.
//!
//! The bank is an XML document of repeated `<Question>` elements:
//!
//! ```text
//! <Questions>
//!   <Question Topic="Complexity">
//!     <Text>What is the running time of merge sort?</Text>
//!     <Options>
//!       <Option>A: O(n^2)</Option>
//!       <Option>O(n \log n)</Option>
//!     </Options>
//!     <CorrectOptionIndex>1</CorrectOptionIndex>
//!     <Explanation>Divide and conquer halves the input.</Explanation>
//!     <LecturerID>mueller</LecturerID>
//!   </Question>
//! </Questions>
//! ```
//!
//! Only document-level problems (missing file, malformed XML) are errors.
//! A question without a `<Text>` is skipped with a warning, an empty
//! `<Option>` is dropped, and a `<CorrectOptionIndex>` that does not parse
//! as an unsigned integer is treated as absent — bad authored data costs
//! one segment, never the batch.

use std::path::{Path, PathBuf};

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::speech::QuestionRecord;

#[derive(Debug, thiserror::Error)]
pub enum BankError {
    #[error("question bank not found: {0}")]
    NotFound(PathBuf),
    #[error("failed to read question bank: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed XML in question bank: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("malformed XML entity in question bank: {0}")]
    Entity(String),
}

/// Load and parse a question bank file.
pub fn load_bank(path: &Path) -> Result<Vec<QuestionRecord>, BankError> {
    if !path.exists() {
        return Err(BankError::NotFound(path.to_path_buf()));
    }
    let xml = std::fs::read_to_string(path)?;
    let questions = parse_bank(&xml)?;
    log::info!(
        "loaded {} question(s) from {}",
        questions.len(),
        path.display()
    );
    Ok(questions)
}

/// Which child element of `<Question>` the reader is currently inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Text,
    Option,
    CorrectIndex,
    Explanation,
    Lecturer,
}

#[derive(Debug, Default)]
struct PendingQuestion {
    text: Option<String>,
    options: Vec<String>,
    correct_raw: Option<String>,
    explanation: Option<String>,
    lecturer_id: Option<String>,
}

impl PendingQuestion {
    fn push(&mut self, field: Field, value: String) {
        match field {
            Field::Text => self.text = Some(value),
            Field::Option => self.options.push(value),
            Field::CorrectIndex => self.correct_raw = Some(value),
            Field::Explanation => self.explanation = Some(value),
            Field::Lecturer => self.lecturer_id = Some(value),
        }
    }

    /// Finish the record, or `None` when the question has no body text.
    fn finish(self, position: usize) -> Option<QuestionRecord> {
        let text = match self.text {
            Some(text) if !text.trim().is_empty() => text.trim().to_string(),
            _ => {
                log::warn!("skipping question {position}: no <Text>");
                return None;
            }
        };

        let correct_option_index = self.correct_raw.and_then(|raw| {
            let raw = raw.trim().to_string();
            match raw.parse::<usize>() {
                Ok(index) => Some(index),
                Err(_) => {
                    log::warn!(
                        "question {position}: unparseable <CorrectOptionIndex> {raw:?}; \
                         treating answer as absent"
                    );
                    None
                }
            }
        });

        Some(QuestionRecord {
            text,
            options: self
                .options
                .into_iter()
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect(),
            correct_option_index,
            explanation: self
                .explanation
                .map(|e| e.trim().to_string())
                .filter(|e| !e.is_empty()),
            lecturer_id: self
                .lecturer_id
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty()),
        })
    }
}

/// Parse an XML question bank document.
pub fn parse_bank(xml: &str) -> Result<Vec<QuestionRecord>, BankError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut questions = Vec::new();
    let mut current: Option<PendingQuestion> = None;
    let mut field: Option<Field> = None;
    let mut seen = 0usize;

    loop {
        match reader.read_event()? {
            Event::Start(start) => match start.name().as_ref() {
                b"Question" => {
                    seen += 1;
                    current = Some(PendingQuestion::default());
                }
                b"Text" => field = Some(Field::Text),
                b"Option" => field = Some(Field::Option),
                b"CorrectOptionIndex" => field = Some(Field::CorrectIndex),
                b"Explanation" => field = Some(Field::Explanation),
                b"LecturerID" => field = Some(Field::Lecturer),
                _ => {}
            },
            Event::Text(text) => {
                if let (Some(question), Some(field)) = (current.as_mut(), field) {
                    let value = text
                        .unescape()
                        .map_err(|e| BankError::Entity(e.to_string()))?
                        .into_owned();
                    question.push(field, value);
                }
            }
            Event::End(end) => {
                if end.name().as_ref() == b"Question" {
                    if let Some(record) = current.take().and_then(|q| q.finish(seen)) {
                        questions.push(record);
                    }
                }
                field = None;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(questions)
}
