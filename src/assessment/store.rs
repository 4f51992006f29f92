// src/assessment/store.rs

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::models::{enrollment::Enrollment, question::Question};

/// Identifies which question set applies to an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionScope {
    /// Questions from all modules of a course at one level
    /// (pre-test: level 1; final-test: the student's current level).
    CourseLevel { course_id: i64, level: i64 },
    /// Questions from a single module (slip-test).
    Module { module_id: i64 },
}

/// Attempt row to be inserted. `module_id` is the module of the first
/// sampled question.
#[derive(Debug, Clone)]
pub struct NewAttempt {
    pub student_id: i64,
    pub module_id: i64,
    pub test_type: &'static str,
    pub score: i64,
}

/// Answer row derived at scoring time, written with its parent attempt.
#[derive(Debug, Clone)]
pub struct NewAnswerRecord {
    pub question_id: i64,
    pub selected_answer: String,
    pub is_correct: bool,
}

/// Enrollment mutation applied inside the attempt's transaction
/// (pre-test only).
#[derive(Debug, Clone, Copy)]
pub struct LevelUpdate {
    pub student_id: i64,
    pub course_id: i64,
    pub level: i64,
    pub pre_test_score: i64,
}

/// Persistence seam for the assessment engine.
///
/// The engine receives a store handle at construction instead of reaching
/// for a process-wide connection, so tests can substitute a double.
#[async_trait]
pub trait AssessmentStore: Send + Sync {
    async fn enrollment(
        &self,
        student_id: i64,
        course_id: i64,
    ) -> Result<Option<Enrollment>, sqlx::Error>;

    /// Random, order-independent sample of at most `limit` questions in the
    /// given scope. Retakes are intentionally not guaranteed the same set.
    async fn sample_questions(
        &self,
        scope: QuestionScope,
        limit: i64,
    ) -> Result<Vec<Question>, sqlx::Error>;

    /// Writes one attempt, its answer records, and the optional enrollment
    /// update as a single all-or-nothing unit. Returns the attempt id.
    async fn persist_attempt(
        &self,
        attempt: &NewAttempt,
        records: &[NewAnswerRecord],
        level_update: Option<LevelUpdate>,
    ) -> Result<i64, sqlx::Error>;

    /// Scores of every prior slip attempt for modules under this course.
    async fn slip_scores(&self, student_id: i64, course_id: i64)
    -> Result<Vec<i64>, sqlx::Error>;
}

/// SQLite-backed store.
#[derive(Clone)]
pub struct SqlAssessmentStore {
    pool: SqlitePool,
}

impl SqlAssessmentStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AssessmentStore for SqlAssessmentStore {
    async fn enrollment(
        &self,
        student_id: i64,
        course_id: i64,
    ) -> Result<Option<Enrollment>, sqlx::Error> {
        sqlx::query_as::<_, Enrollment>(
            r#"
            SELECT id, student_id, course_id, current_level, pre_test_score
            FROM student_courses
            WHERE student_id = ?1 AND course_id = ?2
            "#,
        )
        .bind(student_id)
        .bind(course_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn sample_questions(
        &self,
        scope: QuestionScope,
        limit: i64,
    ) -> Result<Vec<Question>, sqlx::Error> {
        match scope {
            QuestionScope::CourseLevel { course_id, level } => {
                sqlx::query_as::<_, Question>(
                    r#"
                    SELECT q.id, q.module_id, q.question_text,
                           q.option_a, q.option_b, q.option_c, q.option_d,
                           q.correct_answer, q.marks
                    FROM questions q
                    JOIN modules m ON q.module_id = m.id
                    WHERE m.course_id = ?1 AND m.level = ?2
                    ORDER BY RANDOM()
                    LIMIT ?3
                    "#,
                )
                .bind(course_id)
                .bind(level)
                .bind(limit)
                .fetch_all(&self.pool)
                .await
            }
            QuestionScope::Module { module_id } => {
                sqlx::query_as::<_, Question>(
                    r#"
                    SELECT id, module_id, question_text,
                           option_a, option_b, option_c, option_d,
                           correct_answer, marks
                    FROM questions
                    WHERE module_id = ?1
                    ORDER BY RANDOM()
                    LIMIT ?2
                    "#,
                )
                .bind(module_id)
                .bind(limit)
                .fetch_all(&self.pool)
                .await
            }
        }
    }

    async fn persist_attempt(
        &self,
        attempt: &NewAttempt,
        records: &[NewAnswerRecord],
        level_update: Option<LevelUpdate>,
    ) -> Result<i64, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let test_id = sqlx::query(
            r#"
            INSERT INTO tests (student_id, module_id, test_type, score)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(attempt.student_id)
        .bind(attempt.module_id)
        .bind(attempt.test_type)
        .bind(attempt.score)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        for record in records {
            sqlx::query(
                r#"
                INSERT INTO test_answers (test_id, question_id, selected_answer, is_correct)
                VALUES (?1, ?2, ?3, ?4)
                "#,
            )
            .bind(test_id)
            .bind(record.question_id)
            .bind(&record.selected_answer)
            .bind(record.is_correct)
            .execute(&mut *tx)
            .await?;
        }

        if let Some(update) = level_update {
            sqlx::query(
                r#"
                UPDATE student_courses
                SET current_level = ?1, pre_test_score = ?2
                WHERE student_id = ?3 AND course_id = ?4
                "#,
            )
            .bind(update.level)
            .bind(update.pre_test_score)
            .bind(update.student_id)
            .bind(update.course_id)
            .execute(&mut *tx)
            .await?;
        }

        // Any error above drops the transaction and rolls everything back.
        tx.commit().await?;

        Ok(test_id)
    }

    async fn slip_scores(
        &self,
        student_id: i64,
        course_id: i64,
    ) -> Result<Vec<i64>, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT score FROM tests
            WHERE student_id = ?1 AND test_type = 'slip' AND module_id IN (
                SELECT id FROM modules WHERE course_id = ?2
            )
            "#,
        )
        .bind(student_id)
        .bind(course_id)
        .fetch_all(&self.pool)
        .await
    }
}
