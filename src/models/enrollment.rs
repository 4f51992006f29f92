// src/models/enrollment.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Represents the 'student_courses' table: one row per (student, course).
///
/// `current_level` holds only the latest leveling decision; no history of
/// level transitions is kept.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: i64,
    pub student_id: i64,
    pub course_id: i64,
    pub current_level: i64,
    pub pre_test_score: Option<i64>,
}

/// DTO for enrolling in a course.
#[derive(Debug, Deserialize)]
pub struct EnrollRequest {
    pub course_id: i64,
}

/// Joined row for the student's course list.
#[derive(Debug, Serialize, FromRow)]
pub struct EnrolledCourse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub current_level: i64,
    pub pre_test_score: Option<i64>,
}

/// Aggregated progress report for one enrollment.
#[derive(Debug, Serialize, FromRow)]
pub struct CourseProgress {
    pub current_level: i64,
    pub pre_test_score: Option<i64>,
    pub slip_test_avg: Option<f64>,
    pub final_test_score: Option<i64>,
}
