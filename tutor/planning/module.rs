use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Grades accepted for a student profile.
pub const GRADE_RANGE: std::ops::RangeInclusive<u8> = 1..=12;

/// Learner supplied by the enrolment layer. Read-only to the planner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentProfile {
    /// Student identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// School grade.
    pub grade: u8,
    /// Language code the student reads best, e.g. `kn`.
    pub preferred_language: String,
    /// Kilobytes the student can download per week.
    pub weekly_bandwidth_kb: u64,
    /// Study time available per day.
    #[serde(default = "default_hours_per_day")]
    pub available_hours_per_day: f32,
}

const fn default_hours_per_day() -> f32 {
    1.0
}

impl StudentProfile {
    /// Creates a profile with one study hour per day.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        grade: u8,
        preferred_language: impl Into<String>,
        weekly_bandwidth_kb: u64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            grade,
            preferred_language: preferred_language.into(),
            weekly_bandwidth_kb,
            available_hours_per_day: default_hours_per_day(),
        }
    }

    /// Overrides the daily study time.
    #[must_use]
    pub fn with_hours_per_day(mut self, hours: f32) -> Self {
        self.available_hours_per_day = hours;
        self
    }

    /// Rejects grades outside 1..=12 and negative or non-finite study time.
    pub fn validate(&self) -> Result<(), PlanningError> {
        if !GRADE_RANGE.contains(&self.grade) {
            return Err(PlanningError::InvalidInput(format!(
                "grade {} for student `{}` is outside 1..=12",
                self.grade, self.id
            )));
        }
        if !self.available_hours_per_day.is_finite() || self.available_hours_per_day < 0.0 {
            return Err(PlanningError::InvalidInput(format!(
                "available_hours_per_day {} for student `{}` must be a non-negative number",
                self.available_hours_per_day, self.id
            )));
        }
        Ok(())
    }
}

/// A resource scheduled for a given day of the week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    /// Resource scheduled.
    pub resource_id: String,
    /// Resource title, `Untitled` when the manifest had none.
    pub title: String,
    /// Resource language, `en` when the manifest had none.
    pub lang: String,
    /// Kilobytes charged against the weekly budget.
    pub estimated_kb: u64,
    /// Summary text, empty when none was supplied.
    pub summary: String,
    /// Day of week, 1 through 7.
    pub day: u8,
}

/// Total kilobytes consumed by a plan.
#[must_use]
pub fn planned_kb(lessons: &[Lesson]) -> u64 {
    lessons.iter().map(|lesson| lesson.estimated_kb).sum()
}

/// Errors raised before planning starts.
#[derive(Debug, Error)]
pub enum PlanningError {
    /// The profile violates a documented bound.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_grade_and_hours() {
        let ok = StudentProfile::new("s", "A", 5, "en", 100);
        assert!(ok.validate().is_ok());
        assert!(StudentProfile::new("s", "A", 0, "en", 100).validate().is_err());
        assert!(StudentProfile::new("s", "A", 13, "en", 100).validate().is_err());
        assert!(ok.clone().with_hours_per_day(-1.0).validate().is_err());
        assert!(ok.with_hours_per_day(f32::NAN).validate().is_err());
    }

    #[test]
    fn profile_rejects_negative_bandwidth_on_load() {
        let raw = r#"{"id": "s", "name": "A", "grade": 5, "preferred_language": "en",
                      "weekly_bandwidth_kb": -10}"#;
        assert!(serde_json::from_str::<StudentProfile>(raw).is_err());
        let raw = raw.replace("-10", "10");
        let profile: StudentProfile = serde_json::from_str(&raw).unwrap();
        assert!((profile.available_hours_per_day - 1.0).abs() < f32::EPSILON);
    }
}
