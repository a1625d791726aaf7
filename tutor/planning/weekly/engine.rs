use indexmap::IndexMap;
use tutor_knowledge::Resource;

use crate::module::Lesson;

use super::helper::next_day;

/// Days in a planning cycle.
pub const DAYS_PER_WEEK: u8 = 7;

/// Greedy single-pass allocator.
///
/// Walks resources in the given order and takes every resource that still fits
/// the remaining budget. A resource that does not fit is skipped, not deferred,
/// so the result is not an optimal packing.
#[derive(Debug, Clone)]
pub struct AllocationEngine {
    days_per_week: u8,
}

impl AllocationEngine {
    /// Creates an engine cycling through `days_per_week` days (at least one).
    #[must_use]
    pub fn new(days_per_week: u8) -> Self {
        Self {
            days_per_week: days_per_week.max(1),
        }
    }

    /// Allocates lessons from already-ordered resources within `budget_kb`.
    ///
    /// Zero-sized resources have unknown cost and are never scheduled.
    #[must_use]
    pub fn allocate(
        &self,
        ordered: &[&Resource],
        budget_kb: u64,
        summaries: &IndexMap<String, String>,
    ) -> Vec<Lesson> {
        let mut budget = budget_kb;
        let mut day = 1;
        let mut lessons = Vec::new();
        for resource in ordered {
            if budget == 0 {
                break;
            }
            let size = resource.size_or_zero();
            if size == 0 || size > budget {
                continue;
            }
            lessons.push(Lesson {
                resource_id: resource.id.clone(),
                title: resource
                    .title
                    .clone()
                    .unwrap_or_else(|| "Untitled".to_string()),
                lang: resource.language.clone().unwrap_or_else(|| "en".to_string()),
                estimated_kb: size,
                summary: summaries.get(&resource.id).cloned().unwrap_or_default(),
                day,
            });
            budget -= size;
            day = next_day(day, self.days_per_week);
        }
        lessons
    }
}

impl Default for AllocationEngine {
    fn default() -> Self {
        Self::new(DAYS_PER_WEEK)
    }
}
