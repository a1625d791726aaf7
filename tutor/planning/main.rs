use indexmap::IndexMap;
use serde_json::json;
use shared_logging::LogLevel;
use tutor_knowledge::Resource;

use crate::{
    module::{planned_kb, Lesson, PlanningError, StudentProfile},
    telemetry::PlanningTelemetry,
    weekly::WeeklyPlanner,
};

/// Weekly planning runtime: validates the profile, plans, and reports.
#[derive(Debug, Default)]
pub struct PlanningRuntime {
    planner: WeeklyPlanner,
    telemetry: Option<PlanningTelemetry>,
}

impl PlanningRuntime {
    /// Creates a runtime around a custom planner.
    #[must_use]
    pub const fn new(planner: WeeklyPlanner) -> Self {
        Self {
            planner,
            telemetry: None,
        }
    }

    /// Injects telemetry.
    #[must_use]
    pub fn with_telemetry(mut self, telemetry: PlanningTelemetry) -> Self {
        self.telemetry = Some(telemetry);
        self
    }

    /// Plans a week for `student`, rejecting profiles with out-of-range fields.
    pub fn plan_week(
        &self,
        student: &StudentProfile,
        resources: &[Resource],
        summaries: &IndexMap<String, String>,
    ) -> Result<Vec<Lesson>, PlanningError> {
        student.validate()?;
        self.log(
            LogLevel::Debug,
            "planning.weekly.begin",
            json!({
                "student": student.id,
                "resources": resources.len(),
                "bandwidth_kb": student.weekly_bandwidth_kb
            }),
        );
        let lessons = self.planner.plan(student, resources, summaries);
        let used = planned_kb(&lessons);
        self.log(
            LogLevel::Info,
            "planning.weekly.planned",
            json!({
                "student": student.id,
                "bandwidth_kb": student.weekly_bandwidth_kb,
                "lessons": lessons.len(),
                "planned_kb": used
            }),
        );
        self.event(
            "planning.weekly.planned",
            json!({
                "student": student.id,
                "lessons": lessons.iter().map(|lesson| &lesson.resource_id).collect::<Vec<_>>(),
                "planned_kb": used
            }),
        );
        Ok(lessons)
    }

    fn log(&self, level: LogLevel, message: &str, metadata: serde_json::Value) {
        if let Some(tel) = &self.telemetry {
            let _ = tel.log(level, message, metadata);
        }
    }

    fn event(&self, event_type: &str, payload: serde_json::Value) {
        if let Some(tel) = &self.telemetry {
            let _ = tel.event(event_type, payload);
        }
    }
}
