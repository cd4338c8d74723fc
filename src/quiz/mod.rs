//! Quiz questions whose statements and options carry inline math.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::document::{Document, TokenizerOptions};
use crate::id::{EntropySource, IdGenerator};

/// Kind of question.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    /// Multiple choice with one or more correct options
    Multiple,
    /// True/false
    #[serde(rename = "tf")]
    #[value(name = "tf")]
    TrueFalse,
    /// Free text answer
    Short,
}

/// One selectable answer of a multiple choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub id: String,
    pub text: String,
    pub correct: bool,
}

impl AnswerOption {
    fn blank<E: EntropySource>(ids: &mut IdGenerator<E>) -> Self {
        Self {
            id: ids.generate(),
            text: String::new(),
            correct: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub kind: QuestionKind,
    pub text: String,
    pub points: u32,
    pub options: Vec<AnswerOption>,
    /// Expected answer for true/false (`"true"`/`"false"`) and short questions
    pub answer: String,
}

/// Reasons a question is not ready to publish.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizError {
    #[error("question has no statement")]
    EmptyStatement,
    #[error("multiple choice question has no options")]
    NoOptions,
    #[error("multiple choice question has no correct option")]
    NoCorrectOption,
    #[error("short answer question has no expected answer")]
    NoExpectedAnswer,
}

impl Question {
    /// A blank question of `kind`.
    pub fn new<E: EntropySource>(kind: QuestionKind, ids: &mut IdGenerator<E>) -> Self {
        let mut question = Self {
            id: ids.generate(),
            kind,
            text: String::new(),
            points: 1,
            options: Vec::new(),
            answer: String::new(),
        };
        question.reset_for_kind(ids);
        question
    }

    /// Switch kind, keeping existing options when switching to multiple choice.
    pub fn set_kind<E: EntropySource>(&mut self, kind: QuestionKind, ids: &mut IdGenerator<E>) {
        self.kind = kind;
        self.reset_for_kind(ids);
    }

    /// Append a blank option and return its index.
    pub fn add_option<E: EntropySource>(&mut self, ids: &mut IdGenerator<E>) -> usize {
        self.options.push(AnswerOption::blank(ids));
        self.options.len() - 1
    }

    /// Remove the option with `id`. Returns whether it existed.
    pub fn remove_option(&mut self, id: &str) -> bool {
        let before = self.options.len();
        self.options.retain(|o| o.id != id);
        self.options.len() != before
    }

    /// Check the question is complete enough to publish.
    pub fn validate(&self) -> Result<(), QuizError> {
        if self.text.trim().is_empty() {
            return Err(QuizError::EmptyStatement);
        }
        match self.kind {
            QuestionKind::Multiple => {
                if self.options.is_empty() {
                    return Err(QuizError::NoOptions);
                }
                if !self.options.iter().any(|o| o.correct) {
                    return Err(QuizError::NoCorrectOption);
                }
            }
            QuestionKind::Short if self.answer.trim().is_empty() => {
                return Err(QuizError::NoExpectedAnswer);
            }
            QuestionKind::Short | QuestionKind::TrueFalse => {}
        }
        Ok(())
    }

    /// The statement parsed for display and formula editing.
    pub fn statement(&self, options: &TokenizerOptions) -> Document {
        Document::parse_with_options(&self.text, options)
    }

    fn reset_for_kind<E: EntropySource>(&mut self, ids: &mut IdGenerator<E>) {
        match self.kind {
            QuestionKind::Multiple => {
                if self.options.is_empty() {
                    self.options.push(AnswerOption::blank(ids));
                }
                self.answer.clear();
            }
            QuestionKind::TrueFalse => {
                self.options.clear();
                self.answer = "true".to_string();
            }
            QuestionKind::Short => {
                self.options.clear();
                self.answer.clear();
            }
        }
    }
}

/// Sum of points over `questions`.
pub fn total_points(questions: &[Question]) -> u32 {
    questions.iter().map(|q| q.points).sum()
}

/// Letter label for the option at `index`: `a`…`z`, then `aa`, `ab`….
pub fn option_label(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        n -= 1;
        letters.push(b'a' + (n % 26) as u8);
        n /= 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}
