use std::{fmt, path::PathBuf, sync::Arc};

use anyhow::Result;
use serde_json::Value;
use shared_event_bus::{EventPublisher, EventRecord};
use shared_logging::{JsonLogger, LogLevel, LogRecord};
use tokio::runtime::{Handle, Runtime};

/// Builder configuring telemetry for weekly planning.
pub struct PlanningTelemetryBuilder {
    module: String,
    log_path: Option<PathBuf>,
    min_level: LogLevel,
    event_publisher: Option<Arc<dyn EventPublisher>>,
}

impl PlanningTelemetryBuilder {
    /// Creates a builder that logs nothing and publishes nothing.
    #[must_use]
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            log_path: None,
            min_level: LogLevel::Debug,
            event_publisher: None,
        }
    }

    /// Writes JSON lines to `path`.
    #[must_use]
    pub fn log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_path = Some(path.into());
        self
    }

    /// Drops records below `level`.
    #[must_use]
    pub fn min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    /// Publishes plan events on `publisher`.
    #[must_use]
    pub fn event_publisher(mut self, publisher: Arc<dyn EventPublisher>) -> Self {
        self.event_publisher = Some(publisher);
        self
    }

    /// Opens the log file and starts the publishing runtime.
    pub fn build(self) -> Result<PlanningTelemetry> {
        let logger = match self.log_path {
            Some(path) => Some(JsonLogger::new(path)?.with_min_level(self.min_level)),
            None => None,
        };
        let events = match self.event_publisher {
            Some(publisher) => Some(EventHandle::new(publisher)?),
            None => None,
        };
        Ok(PlanningTelemetry {
            inner: Arc::new(TelemetryInner {
                module: self.module,
                logger,
                events,
            }),
        })
    }
}

/// Shared telemetry handle for the planning runtime.
#[derive(Clone)]
pub struct PlanningTelemetry {
    inner: Arc<TelemetryInner>,
}

impl fmt::Debug for PlanningTelemetry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlanningTelemetry")
            .field("module", &self.inner.module)
            .field("logs", &self.inner.logger.is_some())
            .field("events", &self.inner.events.is_some())
            .finish()
    }
}

struct TelemetryInner {
    module: String,
    logger: Option<JsonLogger>,
    events: Option<EventHandle>,
}

struct EventHandle {
    runtime: Runtime,
    publisher: Arc<dyn EventPublisher>,
}

impl EventHandle {
    fn new(publisher: Arc<dyn EventPublisher>) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread().build()?;
        Ok(Self { runtime, publisher })
    }

    fn publish(&self, record: EventRecord) -> Result<()> {
        if let Ok(handle) = Handle::try_current() {
            let publisher = Arc::clone(&self.publisher);
            handle.spawn(async move {
                if let Err(err) = publisher.publish(record).await {
                    eprintln!("planning event publish failed: {err:?}");
                }
            });
            return Ok(());
        }
        self.runtime.block_on(self.publisher.publish(record))
    }
}

impl PlanningTelemetry {
    /// Returns a builder.
    #[must_use]
    pub fn builder(module: impl Into<String>) -> PlanningTelemetryBuilder {
        PlanningTelemetryBuilder::new(module)
    }

    /// Appends a structured record when a log path was configured.
    pub fn log(&self, level: LogLevel, message: &str, metadata: Value) -> Result<()> {
        if let Some(logger) = &self.inner.logger {
            let record = LogRecord::new(&self.inner.module, level, message).with_fields(&metadata);
            logger.log(&record)?;
        }
        Ok(())
    }

    /// Publishes an event when a publisher was configured.
    pub fn event(&self, event_type: &str, payload: Value) -> Result<()> {
        if let Some(events) = &self.inner.events {
            events.publish(EventRecord::new(&self.inner.module, event_type, payload))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shared_event_bus::MemoryEventBus;
    use shared_logging::read_records;
    use tempfile::tempdir;

    #[test]
    fn logs_above_min_level_and_publishes() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("planning.log");
        let bus = Arc::new(MemoryEventBus::new(8));
        let telemetry = PlanningTelemetry::builder("planning")
            .log_path(&log_path)
            .min_level(LogLevel::Info)
            .event_publisher(bus.clone())
            .build()
            .unwrap();
        telemetry
            .log(LogLevel::Debug, "planning.noise", json!({}))
            .unwrap();
        telemetry
            .log(LogLevel::Info, "planning.weekly.planned", json!({ "lessons": 2 }))
            .unwrap();
        telemetry
            .event("planning.weekly.planned", json!({ "lessons": 2 }))
            .unwrap();
        let records = read_records(&log_path).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].message, "planning.weekly.planned");
        assert_eq!(records[0].metadata["lessons"], 2);
        assert_eq!(bus.snapshot_by_type("planning.").len(), 1);
    }

    #[test]
    fn unconfigured_telemetry_is_silent() {
        let telemetry = PlanningTelemetry::builder("planning").build().unwrap();
        assert!(telemetry.log(LogLevel::Error, "x", json!({})).is_ok());
        assert!(telemetry.event("x", json!({})).is_ok());
    }
}
