// src/models/attempt.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Represents the 'tests' table: one scored submission of answers.
/// Append-only; never mutated after creation.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct TestAttempt {
    pub id: i64,
    pub student_id: i64,
    /// Module of the first sampled question (representative, not exhaustive).
    pub module_id: i64,
    /// 'pre', 'slip' or 'final'.
    pub test_type: String,
    pub score: i64,
    pub taken_at: Option<chrono::NaiveDateTime>,
}

/// Represents the 'test_answers' table: one row per question per attempt.
/// Correctness is derived at scoring time and never recomputed.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub id: i64,
    pub test_id: i64,
    pub question_id: i64,
    pub selected_answer: String,
    pub is_correct: bool,
}

/// DTO for the pre-test and final-test endpoints.
///
/// `answers[i]` corresponds positionally to the i-th sampled question.
#[derive(Debug, Deserialize)]
pub struct SubmitCourseTestRequest {
    pub course_id: i64,
    pub answers: Vec<String>,
}

/// DTO for the slip-test endpoint.
#[derive(Debug, Deserialize)]
pub struct SubmitSlipTestRequest {
    pub module_id: i64,
    pub answers: Vec<String>,
}
