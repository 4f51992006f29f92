// src/models/course.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'courses' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Course {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

/// Represents the 'modules' table: one unit of course content at a given
/// level. Content is only served to students whose enrollment has reached
/// that level.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Module {
    pub id: i64,
    pub course_id: i64,
    pub level: i64,
    pub module_number: i64,
    pub title: String,
    pub content: String,
}

/// DTO for creating a course (admin only).
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCourseRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub description: Option<String>,
}

/// DTO for creating a module (admin only).
#[derive(Debug, Deserialize, Validate)]
pub struct CreateModuleRequest {
    pub course_id: i64,
    #[validate(range(min = 1, max = 5))]
    pub level: i64,
    #[validate(range(min = 1))]
    pub module_number: i64,
    #[validate(length(min = 1, max = 300))]
    pub title: String,
    #[validate(length(min = 1))]
    pub content: String,
}
