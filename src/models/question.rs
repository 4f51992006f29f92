// src/models/question.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'questions' table in the database.
///
/// A question carries four labeled choices, the text of the correct choice,
/// and a point value. Immutable once authored.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,
    pub module_id: i64,
    pub question_text: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,

    /// The literal text of the correct choice. Submitted answers are compared
    /// against this by strict string equality.
    pub correct_answer: String,

    /// Points awarded when answered correctly.
    pub marks: i64,
}

/// DTO for creating a new question (admin only).
#[derive(Debug, Deserialize, Validate)]
pub struct CreateQuestionRequest {
    pub module_id: i64,
    #[validate(length(min = 1, max = 1000))]
    pub question_text: String,
    #[validate(length(min = 1, max = 500))]
    pub option_a: String,
    #[validate(length(min = 1, max = 500))]
    pub option_b: String,
    #[validate(length(min = 1, max = 500))]
    pub option_c: String,
    #[validate(length(min = 1, max = 500))]
    pub option_d: String,
    #[validate(length(min = 1, max = 500))]
    pub correct_answer: String,
    #[validate(range(min = 1, max = 100))]
    pub marks: i64,
}
