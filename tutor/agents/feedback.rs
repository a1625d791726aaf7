use serde::{Deserialize, Serialize};

use crate::similarity::similarity;

/// Score at or above which an answer counts as correct.
pub const DEFAULT_THRESHOLD: f64 = 0.6;
/// Feedback for a correct answer.
pub const CORRECT_FEEDBACK: &str = "Good! Your answer matches the expected solution closely.";
/// Feedback for an incorrect answer.
pub const INCORRECT_FEEDBACK: &str =
    "Not quite. Review the explanation and try the easier practice example.";

/// Grading outcome for one student answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    /// Similarity to the expected answer, in `[0, 1]`.
    pub score: f64,
    /// Whether the score reached the threshold.
    pub correct: bool,
    /// Fixed remark chosen by `correct`.
    pub feedback: String,
}

/// Grades free-text answers.
pub trait Grader: Send + Sync {
    /// Agent identifier used in logs.
    fn name(&self) -> &str;
    /// Grades `student_answer` against `expected_answer`.
    fn assess(&self, student_answer: &str, expected_answer: &str) -> Assessment;
}

/// Grader backed by [`similarity`].
#[derive(Debug, Clone, Copy)]
pub struct SimilarityGrader {
    threshold: f64,
}

impl SimilarityGrader {
    /// Creates a grader with the given pass threshold.
    #[must_use]
    pub const fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Pass threshold.
    #[must_use]
    pub const fn threshold(&self) -> f64 {
        self.threshold
    }
}

impl Default for SimilarityGrader {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

impl Grader for SimilarityGrader {
    fn name(&self) -> &str {
        "similarity_grader"
    }

    fn assess(&self, student_answer: &str, expected_answer: &str) -> Assessment {
        assess(student_answer, expected_answer, self.threshold)
    }
}

/// Grades `student_answer` against `expected_answer` with an explicit threshold.
#[must_use]
pub fn assess(student_answer: &str, expected_answer: &str, threshold: f64) -> Assessment {
    let score = similarity(student_answer, expected_answer).clamp(0.0, 1.0);
    let correct = score >= threshold;
    let feedback = if correct {
        CORRECT_FEEDBACK
    } else {
        INCORRECT_FEEDBACK
    };
    Assessment {
        score,
        correct,
        feedback: feedback.to_string(),
    }
}
