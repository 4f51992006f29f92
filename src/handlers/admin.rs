// src/handlers/admin.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    error::AppError,
    models::{
        course::{CreateCourseRequest, CreateModuleRequest},
        question::CreateQuestionRequest,
    },
};

/// Creates a new course.
/// Admin only.
pub async fn create_course(
    State(pool): State<SqlitePool>,
    Json(payload): Json<CreateCourseRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let id = sqlx::query("INSERT INTO courses (name, description) VALUES (?1, ?2)")
        .bind(&payload.name)
        .bind(&payload.description)
        .execute(&pool)
        .await
        .map_err(|e| {
            if e.to_string().contains("UNIQUE constraint failed") {
                AppError::Conflict(format!("Course '{}' already exists", payload.name))
            } else {
                tracing::error!("Failed to create course: {:?}", e);
                AppError::InternalServerError(e.to_string())
            }
        })?
        .last_insert_rowid();

    Ok((
        StatusCode::CREATED,
        Json(json!({ "id": id, "message": "Course created successfully" })),
    ))
}

/// Creates a new module within a course level.
/// Admin only.
pub async fn create_module(
    State(pool): State<SqlitePool>,
    Json(payload): Json<CreateModuleRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let id = sqlx::query(
        r#"
        INSERT INTO modules (course_id, level, module_number, title, content)
        VALUES (?1, ?2, ?3, ?4, ?5)
        "#,
    )
    .bind(payload.course_id)
    .bind(payload.level)
    .bind(payload.module_number)
    .bind(&payload.title)
    .bind(&payload.content)
    .execute(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to create module: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?
    .last_insert_rowid();

    Ok((
        StatusCode::CREATED,
        Json(json!({ "id": id, "message": "Module created successfully" })),
    ))
}

/// Creates a new question under a module.
/// Admin only.
pub async fn create_question(
    State(pool): State<SqlitePool>,
    Json(payload): Json<CreateQuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let id = sqlx::query(
        r#"
        INSERT INTO questions
        (module_id, question_text, option_a, option_b, option_c, option_d, correct_answer, marks)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#,
    )
    .bind(payload.module_id)
    .bind(&payload.question_text)
    .bind(&payload.option_a)
    .bind(&payload.option_b)
    .bind(&payload.option_c)
    .bind(&payload.option_d)
    .bind(&payload.correct_answer)
    .bind(payload.marks)
    .execute(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to add question: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?
    .last_insert_rowid();

    Ok((
        StatusCode::CREATED,
        Json(json!({ "id": id, "message": "Question added successfully" })),
    ))
}
