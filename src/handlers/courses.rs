// src/handlers/courses.rs

use axum::{
    Json,
    extract::{Extension, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use sqlx::SqlitePool;

use crate::{
    error::AppError,
    models::{
        course::{Course, Module},
        enrollment::{CourseProgress, EnrollRequest, EnrolledCourse},
    },
    utils::jwt::Claims,
};

/// Lists all courses available for enrollment.
pub async fn list_courses(State(pool): State<SqlitePool>) -> Result<impl IntoResponse, AppError> {
    let courses = sqlx::query_as::<_, Course>("SELECT id, name, description FROM courses")
        .fetch_all(&pool)
        .await?;

    Ok(Json(courses))
}

/// Enrolls the caller in a course at level 1.
/// One enrollment per (student, course); a second attempt is rejected.
pub async fn enroll(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<EnrollRequest>,
) -> Result<impl IntoResponse, AppError> {
    let student_id = claims.user_id()?;

    let existing = sqlx::query_scalar::<_, i64>(
        "SELECT id FROM student_courses WHERE student_id = ?1 AND course_id = ?2",
    )
    .bind(student_id)
    .bind(payload.course_id)
    .fetch_optional(&pool)
    .await?;

    if existing.is_some() {
        return Err(AppError::BadRequest(
            "Already enrolled in this course".to_string(),
        ));
    }

    sqlx::query("INSERT INTO student_courses (student_id, course_id) VALUES (?1, ?2)")
        .bind(student_id)
        .bind(payload.course_id)
        .execute(&pool)
        .await
        .map_err(|e| {
            tracing::error!("Enrollment failed: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Enrolled successfully" })),
    ))
}

/// Lists the caller's enrolled courses with their current level and
/// pre-test score.
pub async fn my_courses(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let student_id = claims.user_id()?;

    let courses = sqlx::query_as::<_, EnrolledCourse>(
        r#"
        SELECT c.id, c.name, c.description, sc.current_level, sc.pre_test_score
        FROM student_courses sc
        JOIN courses c ON sc.course_id = c.id
        WHERE sc.student_id = ?1
        "#,
    )
    .bind(student_id)
    .fetch_all(&pool)
    .await?;

    Ok(Json(courses))
}

/// Fetches one module's content, gated by the caller's enrollment level.
///
/// Requesting a level above the enrollment's `current_level` is refused;
/// the student must pass through earlier levels first.
pub async fn get_module(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path((course_id, level, module_number)): Path<(i64, i64, i64)>,
) -> Result<impl IntoResponse, AppError> {
    let student_id = claims.user_id()?;

    let current_level = sqlx::query_scalar::<_, i64>(
        "SELECT current_level FROM student_courses WHERE student_id = ?1 AND course_id = ?2",
    )
    .bind(student_id)
    .bind(course_id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::Forbidden(
        "Not enrolled in this course".to_string(),
    ))?;

    if level > current_level {
        return Err(AppError::Forbidden(
            "Complete previous levels first".to_string(),
        ));
    }

    let module = sqlx::query_as::<_, Module>(
        r#"
        SELECT id, course_id, level, module_number, title, content
        FROM modules
        WHERE course_id = ?1 AND level = ?2 AND module_number = ?3
        "#,
    )
    .bind(course_id)
    .bind(level)
    .bind(module_number)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("Module not found".to_string()))?;

    Ok(Json(module))
}

/// Reports the caller's progress in one course: current level, pre-test
/// score, slip-test average and latest final-test score.
pub async fn get_progress(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(course_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let student_id = claims.user_id()?;

    let progress = sqlx::query_as::<_, CourseProgress>(
        r#"
        SELECT sc.current_level, sc.pre_test_score,
            (SELECT AVG(score) FROM tests
             WHERE student_id = ?1 AND test_type = 'slip' AND module_id IN (
                SELECT id FROM modules WHERE course_id = ?2
             )) AS slip_test_avg,
            (SELECT score FROM tests
             WHERE student_id = ?1 AND test_type = 'final' AND module_id IN (
                SELECT id FROM modules WHERE course_id = ?2
             ) ORDER BY taken_at DESC LIMIT 1) AS final_test_score
        FROM student_courses sc
        WHERE sc.student_id = ?1 AND sc.course_id = ?2
        "#,
    )
    .bind(student_id)
    .bind(course_id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound(
        "No progress found for this course".to_string(),
    ))?;

    Ok(Json(progress))
}
