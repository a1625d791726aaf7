#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

//! Weekly lesson planning under a per-student bandwidth budget.

/// Student profiles, lessons, and planning errors.
#[path = "../module.rs"]
pub mod module;
/// Planning runtime entry point.
#[path = "../main.rs"]
pub mod orchestration_entry;
/// Telemetry helpers for planning.
#[path = "../telemetry.rs"]
pub mod telemetry;
/// Greedy weekly planner.
#[path = "../weekly/main.rs"]
pub mod weekly;

pub use module::{planned_kb, Lesson, PlanningError, StudentProfile, GRADE_RANGE};
pub use orchestration_entry::PlanningRuntime;
pub use telemetry::{PlanningTelemetry, PlanningTelemetryBuilder};
pub use weekly::{plan_weekly_lessons, AllocationEngine, WeeklyPlanner, DAYS_PER_WEEK};
