// src/assessment/engine.rs

use serde::Serialize;

use crate::models::question::Question;

use super::{
    AssessmentError,
    policy::{LevelingPolicy, Suggestion},
    store::{AssessmentStore, LevelUpdate, NewAnswerRecord, NewAttempt, QuestionScope},
};

/// The three test kinds the engine scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestType {
    Pre,
    Slip,
    Final,
}

impl TestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TestType::Pre => "pre",
            TestType::Slip => "slip",
            TestType::Final => "final",
        }
    }

    /// How many questions are sampled for one attempt.
    pub fn sample_size(&self) -> i64 {
        match self {
            TestType::Pre | TestType::Final => 10,
            TestType::Slip => 5,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PreTestOutcome {
    pub score: i64,
    pub level: i64,
}

#[derive(Debug, Serialize)]
pub struct SlipTestOutcome {
    pub score: i64,
    pub suggestion: Suggestion,
}

#[derive(Debug, Serialize)]
pub struct FinalTestOutcome {
    pub final_score: f64,
    pub test_score: i64,
    pub slip_average: f64,
    pub suggestion: Suggestion,
}

/// Scores a submission positionally: `answers[i]` is compared by literal
/// text to the i-th question's correct choice. A missing trailing answer
/// scores as incorrect with an empty selection.
///
/// Returns the accumulated score and one answer record per question.
pub fn score_answers(questions: &[Question], answers: &[String]) -> (i64, Vec<NewAnswerRecord>) {
    let mut score = 0;
    let mut records = Vec::with_capacity(questions.len());

    for (i, question) in questions.iter().enumerate() {
        let selected = answers.get(i).cloned().unwrap_or_default();
        let is_correct = selected == question.correct_answer;
        if is_correct {
            score += question.marks;
        }
        records.push(NewAnswerRecord {
            question_id: question.id,
            selected_answer: selected,
            is_correct,
        });
    }

    (score, records)
}

/// Turns a submitted answer set into a durable, scored attempt and a
/// leveling decision. The store handle is injected at construction; there is
/// no global connection state.
pub struct AssessmentEngine<S> {
    store: S,
    policy: LevelingPolicy,
}

impl<S: AssessmentStore> AssessmentEngine<S> {
    pub fn new(store: S, policy: LevelingPolicy) -> Self {
        Self { store, policy }
    }

    /// Pre-test: samples level-1 questions of the course, persists the
    /// attempt, and assigns the enrollment level from the score bands.
    /// The level update commits in the same transaction as the attempt.
    pub async fn pre_test(
        &self,
        student_id: i64,
        course_id: i64,
        answers: &[String],
    ) -> Result<PreTestOutcome, AssessmentError> {
        self.require_enrollment(student_id, course_id).await?;

        let scope = QuestionScope::CourseLevel { course_id, level: 1 };
        let (questions, score, records) = self.sample_and_score(scope, TestType::Pre, answers).await?;

        let level = self.policy.level_for(score);
        let update = LevelUpdate {
            student_id,
            course_id,
            level,
            pre_test_score: score,
        };

        self.persist(student_id, TestType::Pre, &questions, score, records, Some(update))
            .await?;

        Ok(PreTestOutcome { score, level })
    }

    /// Slip-test: samples questions from one module and persists the
    /// attempt. Advisory only; the enrollment is never mutated.
    pub async fn slip_test(
        &self,
        student_id: i64,
        module_id: i64,
        answers: &[String],
    ) -> Result<SlipTestOutcome, AssessmentError> {
        let scope = QuestionScope::Module { module_id };
        let (questions, score, records) =
            self.sample_and_score(scope, TestType::Slip, answers).await?;

        self.persist(student_id, TestType::Slip, &questions, score, records, None)
            .await?;

        let suggestion = self.policy.suggestion_for(score as f64);
        Ok(SlipTestOutcome { score, suggestion })
    }

    /// Final-test: samples questions at the student's current level, persists
    /// the attempt, then folds the slip-test average into a weighted final
    /// score. An empty slip history averages to 0. Advisory only.
    pub async fn final_test(
        &self,
        student_id: i64,
        course_id: i64,
        answers: &[String],
    ) -> Result<FinalTestOutcome, AssessmentError> {
        let enrollment = self.require_enrollment(student_id, course_id).await?;

        let scope = QuestionScope::CourseLevel {
            course_id,
            level: enrollment.current_level,
        };
        let (questions, score, records) =
            self.sample_and_score(scope, TestType::Final, answers).await?;

        self.persist(student_id, TestType::Final, &questions, score, records, None)
            .await?;

        let slip_scores = self.store.slip_scores(student_id, course_id).await?;
        let slip_average = if slip_scores.is_empty() {
            0.0
        } else {
            slip_scores.iter().sum::<i64>() as f64 / slip_scores.len() as f64
        };

        let final_score = self.policy.final_score(score, slip_average);
        let suggestion = self.policy.suggestion_for(final_score);

        Ok(FinalTestOutcome {
            final_score,
            test_score: score,
            slip_average,
            suggestion,
        })
    }

    async fn require_enrollment(
        &self,
        student_id: i64,
        course_id: i64,
    ) -> Result<crate::models::enrollment::Enrollment, AssessmentError> {
        self.store
            .enrollment(student_id, course_id)
            .await?
            .ok_or(AssessmentError::NotEnrolled)
    }

    async fn sample_and_score(
        &self,
        scope: QuestionScope,
        test_type: TestType,
        answers: &[String],
    ) -> Result<(Vec<Question>, i64, Vec<NewAnswerRecord>), AssessmentError> {
        let questions = self
            .store
            .sample_questions(scope, test_type.sample_size())
            .await?;

        if questions.is_empty() {
            return Err(AssessmentError::NoQuestionsAvailable);
        }

        let (score, records) = score_answers(&questions, answers);
        Ok((questions, score, records))
    }

    async fn persist(
        &self,
        student_id: i64,
        test_type: TestType,
        questions: &[Question],
        score: i64,
        records: Vec<NewAnswerRecord>,
        level_update: Option<LevelUpdate>,
    ) -> Result<i64, AssessmentError> {
        let attempt = NewAttempt {
            student_id,
            // Representative module: the module of the first sampled question.
            module_id: questions[0].module_id,
            test_type: test_type.as_str(),
            score,
        };

        let test_id = self
            .store
            .persist_attempt(&attempt, &records, level_update)
            .await?;

        tracing::info!(
            test_id,
            student_id,
            test_type = test_type.as_str(),
            score,
            "recorded test attempt"
        );

        Ok(test_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enrollment::Enrollment;
    use async_trait::async_trait;
    use std::sync::Mutex;

    fn question(id: i64, module_id: i64, correct: &str, marks: i64) -> Question {
        Question {
            id,
            module_id,
            question_text: format!("Question {}", id),
            option_a: "A".to_string(),
            option_b: "B".to_string(),
            option_c: "C".to_string(),
            option_d: "D".to_string(),
            correct_answer: correct.to_string(),
            marks,
        }
    }

    fn answers(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    /// In-memory store double. Records every persisted attempt.
    #[derive(Default)]
    struct FakeStore {
        enrollment: Option<Enrollment>,
        questions: Vec<Question>,
        slip_scores: Vec<i64>,
        persisted: Mutex<Vec<(NewAttempt, Vec<NewAnswerRecord>, Option<LevelUpdate>)>>,
    }

    #[async_trait]
    impl AssessmentStore for FakeStore {
        async fn enrollment(
            &self,
            _student_id: i64,
            _course_id: i64,
        ) -> Result<Option<Enrollment>, sqlx::Error> {
            Ok(self.enrollment.clone())
        }

        async fn sample_questions(
            &self,
            _scope: QuestionScope,
            limit: i64,
        ) -> Result<Vec<Question>, sqlx::Error> {
            Ok(self.questions.iter().take(limit as usize).cloned().collect())
        }

        async fn persist_attempt(
            &self,
            attempt: &NewAttempt,
            records: &[NewAnswerRecord],
            level_update: Option<LevelUpdate>,
        ) -> Result<i64, sqlx::Error> {
            let mut persisted = self.persisted.lock().unwrap();
            persisted.push((attempt.clone(), records.to_vec(), level_update));
            Ok(persisted.len() as i64)
        }

        async fn slip_scores(
            &self,
            _student_id: i64,
            _course_id: i64,
        ) -> Result<Vec<i64>, sqlx::Error> {
            Ok(self.slip_scores.clone())
        }
    }

    fn enrolled(level: i64) -> Option<Enrollment> {
        Some(Enrollment {
            id: 1,
            student_id: 1,
            course_id: 1,
            current_level: level,
            pre_test_score: None,
        })
    }

    fn engine(store: FakeStore) -> AssessmentEngine<FakeStore> {
        AssessmentEngine::new(store, LevelingPolicy::default())
    }

    #[test]
    fn score_is_sum_of_marks_of_correct_answers() {
        let questions = vec![
            question(1, 1, "A", 10),
            question(2, 1, "B", 20),
            question(3, 1, "C", 30),
        ];
        let (score, records) = score_answers(&questions, &answers(&["A", "X", "C"]));

        assert_eq!(score, 40);
        assert_eq!(records.len(), 3);
        assert!(records[0].is_correct);
        assert!(!records[1].is_correct);
        assert!(records[2].is_correct);
    }

    #[test]
    fn missing_trailing_answers_score_incorrect() {
        let questions = vec![question(1, 1, "A", 10), question(2, 1, "B", 10)];
        let (score, records) = score_answers(&questions, &answers(&["A"]));

        assert_eq!(score, 10);
        assert_eq!(records[1].selected_answer, "");
        assert!(!records[1].is_correct);
    }

    #[tokio::test]
    async fn pre_test_assigns_level_and_updates_enrollment() {
        let store = FakeStore {
            enrollment: enrolled(1),
            questions: (1..=10).map(|i| question(i, 7, "A", 10)).collect(),
            ..Default::default()
        };
        let engine = engine(store);

        let outcome = engine
            .pre_test(1, 1, &answers(&["A"; 10]))
            .await
            .expect("pre-test should succeed");

        assert_eq!(outcome.score, 100);
        assert_eq!(outcome.level, 5);

        let persisted = engine.store.persisted.lock().unwrap();
        assert_eq!(persisted.len(), 1);
        let (attempt, records, update) = &persisted[0];
        assert_eq!(attempt.test_type, "pre");
        assert_eq!(attempt.module_id, 7);
        assert_eq!(records.len(), 10);
        let update = (*update).expect("pre-test must carry a level update");
        assert_eq!(update.level, 5);
        assert_eq!(update.pre_test_score, 100);
    }

    #[tokio::test]
    async fn pre_test_requires_enrollment() {
        let store = FakeStore {
            questions: vec![question(1, 1, "A", 10)],
            ..Default::default()
        };
        let engine = engine(store);

        let err = engine.pre_test(1, 1, &answers(&["A"])).await.unwrap_err();
        assert!(matches!(err, AssessmentError::NotEnrolled));
        assert!(engine.store.persisted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_scope_persists_nothing() {
        let engine = engine(FakeStore {
            enrollment: enrolled(1),
            ..Default::default()
        });

        let err = engine.pre_test(1, 1, &[]).await.unwrap_err();
        assert!(matches!(err, AssessmentError::NoQuestionsAvailable));
        assert!(engine.store.persisted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn slip_test_is_advisory_only() {
        let store = FakeStore {
            questions: (1..=5).map(|i| question(i, 3, "B", 20)).collect(),
            ..Default::default()
        };
        let engine = engine(store);

        let outcome = engine
            .slip_test(1, 3, &answers(&["B"; 5]))
            .await
            .expect("slip-test should succeed");

        assert_eq!(outcome.score, 100);
        assert_eq!(outcome.suggestion, Suggestion::AdvanceNext);

        let persisted = engine.store.persisted.lock().unwrap();
        assert_eq!(persisted.len(), 1);
        assert_eq!(persisted[0].0.test_type, "slip");
        assert!(persisted[0].2.is_none(), "slip-test must not touch enrollment");
    }

    #[tokio::test]
    async fn final_test_weights_in_slip_average() {
        let store = FakeStore {
            enrollment: enrolled(3),
            questions: (1..=10).map(|i| question(i, 9, "C", 10)).collect(),
            slip_scores: vec![40, 60],
            ..Default::default()
        };
        let engine = engine(store);

        // 9 of 10 correct: test score 90, slip average 50 -> 78.
        let mut submission = answers(&["C"; 9]);
        submission.push("D".to_string());

        let outcome = engine
            .final_test(1, 1, &submission)
            .await
            .expect("final-test should succeed");

        assert_eq!(outcome.test_score, 90);
        assert!((outcome.slip_average - 50.0).abs() < f64::EPSILON);
        assert!((outcome.final_score - 78.0).abs() < f64::EPSILON);
        assert_eq!(outcome.suggestion, Suggestion::Continue);
    }

    #[tokio::test]
    async fn final_test_with_no_slip_history_averages_zero() {
        let store = FakeStore {
            enrollment: enrolled(2),
            questions: (1..=10).map(|i| question(i, 4, "A", 10)).collect(),
            ..Default::default()
        };
        let engine = engine(store);

        let outcome = engine
            .final_test(1, 1, &answers(&["A"; 10]))
            .await
            .expect("final-test should succeed");

        assert_eq!(outcome.test_score, 100);
        assert_eq!(outcome.slip_average, 0.0);
        assert!((outcome.final_score - 70.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn resubmission_creates_second_attempt() {
        let store = FakeStore {
            questions: (1..=5).map(|i| question(i, 3, "A", 20)).collect(),
            ..Default::default()
        };
        let engine = engine(store);

        let submission = answers(&["A"; 5]);
        engine.slip_test(1, 3, &submission).await.unwrap();
        engine.slip_test(1, 3, &submission).await.unwrap();

        assert_eq!(engine.store.persisted.lock().unwrap().len(), 2);
    }
}
