use indexmap::IndexMap;
use tutor_knowledge::Resource;

use crate::module::{Lesson, StudentProfile};

/// Greedy allocation engine.
pub mod engine;
/// Ordering and day-cycling helpers.
pub mod helper;

pub use engine::{AllocationEngine, DAYS_PER_WEEK};
pub use helper::{next_day, order_resources};

/// Weekly planner selecting resources under a student's bandwidth budget.
#[derive(Debug, Clone, Default)]
pub struct WeeklyPlanner {
    engine: AllocationEngine,
}

impl WeeklyPlanner {
    /// Creates a planner around a custom engine.
    #[must_use]
    pub const fn new(engine: AllocationEngine) -> Self {
        Self { engine }
    }

    /// Plans a week of lessons.
    ///
    /// Resources in the student's preferred language come first, smallest
    /// first within each language group; the allocation then greedily takes
    /// whatever still fits. The sum of `estimated_kb` never exceeds
    /// `weekly_bandwidth_kb`.
    #[must_use]
    pub fn plan(
        &self,
        student: &StudentProfile,
        resources: &[Resource],
        summaries: &IndexMap<String, String>,
    ) -> Vec<Lesson> {
        let ordered = order_resources(resources, &student.preferred_language);
        self.engine
            .allocate(&ordered, student.weekly_bandwidth_kb, summaries)
    }
}

/// Plans a week with the default seven-day planner.
#[must_use]
pub fn plan_weekly_lessons(
    student: &StudentProfile,
    resources: &[Resource],
    summaries: &IndexMap<String, String>,
) -> Vec<Lesson> {
    WeeklyPlanner::default().plan(student, resources, summaries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::planned_kb;

    fn student(budget: u64) -> StudentProfile {
        StudentProfile::new("s", "A", 5, "en", budget)
    }

    fn summaries() -> IndexMap<String, String> {
        [("r1", "s1"), ("r2", "s2")]
            .into_iter()
            .map(|(id, text)| (id.to_string(), text.to_string()))
            .collect()
    }

    #[test]
    fn small_budget_takes_preferred_language_only() {
        let resources = vec![
            Resource::new("r1").with_title("A").with_language("en").with_size_kb(60),
            Resource::new("r2").with_title("B").with_language("hi").with_size_kb(60),
        ];
        let plan = plan_weekly_lessons(&student(100), &resources, &summaries());
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].resource_id, "r1");
        assert_eq!(plan[0].summary, "s1");
        assert_eq!(plan[0].day, 1);
        assert!(planned_kb(&plan) <= 100);
    }

    #[test]
    fn matching_language_wins_even_when_listed_last() {
        let resources = vec![
            Resource::new("r2").with_language("hi").with_size_kb(40),
            Resource::new("r1").with_language("en").with_size_kb(40),
        ];
        let plan = plan_weekly_lessons(&student(50), &resources, &summaries());
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].resource_id, "r1");
    }

    #[test]
    fn budget_is_never_exceeded() {
        let sizes = [7, 13, 0, 42, 5, 99, 21, 8, 64, 3, 17];
        let languages = ["en", "kn", "hi"];
        let resources: Vec<Resource> = sizes
            .iter()
            .enumerate()
            .map(|(idx, &size)| {
                Resource::new(format!("r{idx}"))
                    .with_language(languages[idx % languages.len()])
                    .with_size_kb(size)
            })
            .collect();
        for budget in [0, 1, 10, 50, 100, 150, 400] {
            let plan = plan_weekly_lessons(&student(budget), &resources, &IndexMap::new());
            assert!(planned_kb(&plan) <= budget, "budget {budget} exceeded");
            assert!(plan.iter().all(|lesson| lesson.estimated_kb > 0));
            assert!(plan.iter().all(|lesson| (1..=7).contains(&lesson.day)));
        }
    }

    #[test]
    fn oversized_resources_are_skipped_not_deferred() {
        let resources = vec![
            Resource::new("a").with_language("en").with_size_kb(30),
            Resource::new("b").with_language("en").with_size_kb(50),
            Resource::new("c").with_language("hi").with_size_kb(20),
        ];
        let plan = plan_weekly_lessons(&student(60), &resources, &IndexMap::new());
        let ids: Vec<_> = plan.iter().map(|lesson| lesson.resource_id.as_str()).collect();
        assert_eq!(ids, ["a", "c"]);
    }
}
