// src/assessment/policy.rs

use serde::Serialize;
use std::fmt;

/// Advisory outcome of a slip or final test.
///
/// Serializes to the wire phrases the presentation layer already renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Suggestion {
    #[serde(rename = "consider moving to next level")]
    AdvanceNext,
    #[serde(rename = "continue with current level")]
    Continue,
    #[serde(rename = "consider reviewing previous level")]
    ReviewPrevious,
}

impl Suggestion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Suggestion::AdvanceNext => "consider moving to next level",
            Suggestion::Continue => "continue with current level",
            Suggestion::ReviewPrevious => "consider reviewing previous level",
        }
    }
}

impl fmt::Display for Suggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One score band: scores up to and including `max_score` map to `level`.
#[derive(Debug, Clone, Copy)]
pub struct LevelBand {
    pub max_score: i64,
    pub level: i64,
}

/// Score-threshold tables for level assignment and advance/review
/// suggestions. Thresholds are data, not control flow, so tests and future
/// courses can adjust them without touching the engine.
#[derive(Debug, Clone)]
pub struct LevelingPolicy {
    /// Checked in order; the first band whose `max_score` is >= the score
    /// wins. Scores above every band map to `top_level`.
    pub bands: Vec<LevelBand>,
    pub top_level: i64,

    /// Strictly above this score: suggest advancing.
    pub advance_above: f64,
    /// Strictly below this score: suggest reviewing. The boundary values
    /// themselves fall into `Continue`.
    pub review_below: f64,

    /// Final-score weighting: `test * test_weight + slip_avg * slip_weight`.
    pub test_weight: f64,
    pub slip_weight: f64,
}

impl Default for LevelingPolicy {
    fn default() -> Self {
        Self {
            bands: vec![
                LevelBand { max_score: 20, level: 1 },
                LevelBand { max_score: 40, level: 2 },
                LevelBand { max_score: 60, level: 3 },
                LevelBand { max_score: 80, level: 4 },
            ],
            top_level: 5,
            advance_above: 80.0,
            review_below: 20.0,
            test_weight: 0.7,
            slip_weight: 0.3,
        }
    }
}

impl LevelingPolicy {
    /// Maps a pre-test score to a level. Band upper bounds are inclusive.
    pub fn level_for(&self, score: i64) -> i64 {
        self.bands
            .iter()
            .find(|band| score <= band.max_score)
            .map(|band| band.level)
            .unwrap_or(self.top_level)
    }

    pub fn suggestion_for(&self, score: f64) -> Suggestion {
        if score > self.advance_above {
            Suggestion::AdvanceNext
        } else if score < self.review_below {
            Suggestion::ReviewPrevious
        } else {
            Suggestion::Continue
        }
    }

    pub fn final_score(&self, test_score: i64, slip_average: f64) -> f64 {
        test_score as f64 * self.test_weight + slip_average * self.slip_weight
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_band_boundaries_are_inclusive() {
        let policy = LevelingPolicy::default();
        assert_eq!(policy.level_for(0), 1);
        assert_eq!(policy.level_for(20), 1);
        assert_eq!(policy.level_for(21), 2);
        assert_eq!(policy.level_for(40), 2);
        assert_eq!(policy.level_for(60), 3);
        assert_eq!(policy.level_for(80), 4);
        assert_eq!(policy.level_for(81), 5);
        assert_eq!(policy.level_for(100), 5);
    }

    #[test]
    fn suggestion_thresholds_are_strict() {
        let policy = LevelingPolicy::default();
        assert_eq!(policy.suggestion_for(81.0), Suggestion::AdvanceNext);
        assert_eq!(policy.suggestion_for(19.0), Suggestion::ReviewPrevious);
        assert_eq!(policy.suggestion_for(50.0), Suggestion::Continue);
        // Boundary values are not strictly beyond either threshold.
        assert_eq!(policy.suggestion_for(20.0), Suggestion::Continue);
        assert_eq!(policy.suggestion_for(80.0), Suggestion::Continue);
    }

    #[test]
    fn final_score_weighting() {
        let policy = LevelingPolicy::default();
        let combined = policy.final_score(90, 50.0);
        assert!((combined - 78.0).abs() < f64::EPSILON);
        // 78 <= 80, so a strong test score can still land on Continue.
        assert_eq!(policy.suggestion_for(combined), Suggestion::Continue);
    }

    #[test]
    fn suggestion_serializes_to_wire_phrase() {
        let json = serde_json::to_string(&Suggestion::AdvanceNext).unwrap();
        assert_eq!(json, "\"consider moving to next level\"");
    }
}
