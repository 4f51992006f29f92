// src/assessment/mod.rs
//
// The assessment engine: turns a submitted answer set into a durable,
// scored attempt plus a leveling decision.

pub mod engine;
pub mod policy;
pub mod store;

pub use engine::{AssessmentEngine, FinalTestOutcome, PreTestOutcome, SlipTestOutcome, TestType};
pub use policy::{LevelingPolicy, Suggestion};
pub use store::{AssessmentStore, QuestionScope, SqlAssessmentStore};

use crate::error::AppError;
use std::fmt;

/// Domain errors surfaced by the engine.
#[derive(Debug)]
pub enum AssessmentError {
    /// The caller has no enrollment row for the referenced course.
    NotEnrolled,

    /// The resolved question scope is empty; nothing was persisted.
    NoQuestionsAvailable,

    /// The attempt could not be committed. The transaction has been rolled
    /// back; no partial attempt or answer rows survive.
    Persistence(String),
}

impl fmt::Display for AssessmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssessmentError::NotEnrolled => write!(f, "not enrolled in this course"),
            AssessmentError::NoQuestionsAvailable => write!(f, "no questions available"),
            AssessmentError::Persistence(msg) => write!(f, "persistence failure: {}", msg),
        }
    }
}

impl std::error::Error for AssessmentError {}

impl From<sqlx::Error> for AssessmentError {
    fn from(err: sqlx::Error) -> Self {
        AssessmentError::Persistence(err.to_string())
    }
}

impl From<AssessmentError> for AppError {
    fn from(err: AssessmentError) -> Self {
        match err {
            AssessmentError::NotEnrolled => {
                AppError::Forbidden("Not enrolled in this course".to_string())
            }
            AssessmentError::NoQuestionsAvailable => {
                AppError::NotFound("No questions found for this test".to_string())
            }
            AssessmentError::Persistence(msg) => AppError::InternalServerError(msg),
        }
    }
}
