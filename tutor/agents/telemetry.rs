use std::{fmt, path::PathBuf, sync::Arc, time::Instant};

use anyhow::Result;
use serde_json::{json, Value};
use shared_event_bus::{EventPublisher, EventRecord};
use shared_logging::{JsonLogger, LogLevel, LogRecord};
use tokio::runtime::{Handle, Runtime};

/// Builder configuring telemetry for the tutoring agents.
pub struct AgentTelemetryBuilder {
    module: String,
    log_path: Option<PathBuf>,
    min_level: LogLevel,
    event_publisher: Option<Arc<dyn EventPublisher>>,
}

impl AgentTelemetryBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            log_path: None,
            min_level: LogLevel::Debug,
            event_publisher: None,
        }
    }

    /// Sets the JSON log path.
    #[must_use]
    pub fn log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_path = Some(path.into());
        self
    }

    /// Sets the minimum level written to the log.
    #[must_use]
    pub fn min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    /// Assigns the event publisher.
    #[must_use]
    pub fn event_publisher(mut self, publisher: Arc<dyn EventPublisher>) -> Self {
        self.event_publisher = Some(publisher);
        self
    }

    /// Finalizes the builder.
    pub fn build(self) -> Result<AgentTelemetry> {
        let logger = self
            .log_path
            .map(|path| JsonLogger::new(path).map(|logger| logger.with_min_level(self.min_level)))
            .transpose()?;
        let event = self.event_publisher.map(EventHandle::new).transpose()?;
        Ok(AgentTelemetry {
            inner: Arc::new(TelemetryInner {
                module: self.module,
                logger,
                event,
            }),
        })
    }
}

/// Telemetry handle shared by the orchestrator and its agents.
#[derive(Clone)]
pub struct AgentTelemetry {
    inner: Arc<TelemetryInner>,
}

impl fmt::Debug for AgentTelemetry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentTelemetry")
            .field("module", &self.inner.module)
            .finish_non_exhaustive()
    }
}

struct TelemetryInner {
    module: String,
    logger: Option<JsonLogger>,
    event: Option<EventHandle>,
}

struct EventHandle {
    runtime: Runtime,
    publisher: Arc<dyn EventPublisher>,
}

impl EventHandle {
    fn new(publisher: Arc<dyn EventPublisher>) -> Result<Self> {
        Ok(Self {
            runtime: tokio::runtime::Builder::new_current_thread().build()?,
            publisher,
        })
    }

    fn publish(&self, record: EventRecord) -> Result<()> {
        if let Ok(handle) = Handle::try_current() {
            let publisher = Arc::clone(&self.publisher);
            handle.spawn(async move {
                if let Err(err) = publisher.publish(record).await {
                    eprintln!("agent event publish failed: {err:?}");
                }
            });
            Ok(())
        } else {
            self.runtime.block_on(self.publisher.publish(record))
        }
    }
}

impl AgentTelemetry {
    /// Returns a builder for this telemetry helper.
    #[must_use]
    pub fn builder(module: impl Into<String>) -> AgentTelemetryBuilder {
        AgentTelemetryBuilder::new(module)
    }

    /// Logs a structured record.
    pub fn log(&self, level: LogLevel, message: &str, metadata: Value) -> Result<()> {
        if let Some(logger) = &self.inner.logger {
            logger.log(&LogRecord::new(&self.inner.module, level, message).with_fields(&metadata))?;
        }
        Ok(())
    }

    /// Emits an event entry via the configured bus.
    pub fn event(&self, event_type: &str, payload: Value) -> Result<()> {
        if let Some(handle) = &self.inner.event {
            handle.publish(EventRecord::new(&self.inner.module, event_type, payload))?;
        }
        Ok(())
    }

    /// Runs `f` and logs its wall-clock duration at debug level under `agents.timing`.
    pub fn timed<T>(&self, operation: &str, f: impl FnOnce() -> T) -> T {
        let started = Instant::now();
        let output = f();
        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
        let _ = self.log(
            LogLevel::Debug,
            "agents.timing",
            json!({ "operation": operation, "elapsed_ms": elapsed_ms }),
        );
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_event_bus::MemoryEventBus;
    use shared_logging::read_records;
    use tempfile::tempdir;

    #[test]
    fn telemetry_logs_and_emits() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("agents.log");
        let bus = Arc::new(MemoryEventBus::new(8));
        let telemetry = AgentTelemetry::builder("tutor-agents")
            .log_path(&log_path)
            .event_publisher(bus.clone())
            .build()
            .unwrap();
        telemetry
            .log(LogLevel::Info, "agents.test", json!({ "retrieved": 3 }))
            .unwrap();
        telemetry
            .event("agents.question.answered", json!({ "session_id": "s1" }))
            .unwrap();
        let records = read_records(&log_path).unwrap();
        assert_eq!(records[0].metadata["retrieved"], 3);
        assert_eq!(bus.snapshot()[0].source, "tutor-agents");
    }

    #[test]
    fn timed_returns_value_and_logs_duration() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("timing.log");
        let telemetry = AgentTelemetry::builder("tutor-agents")
            .log_path(&log_path)
            .build()
            .unwrap();
        let value = telemetry.timed("retriever.rank", || 41 + 1);
        assert_eq!(value, 42);
        let records = read_records(&log_path).unwrap();
        assert_eq!(records[0].message, "agents.timing");
        assert_eq!(records[0].metadata["operation"], "retriever.rank");
        assert!(records[0].metadata["elapsed_ms"].as_f64().unwrap() >= 0.0);
    }

    #[test]
    fn timing_is_dropped_below_min_level() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("quiet.log");
        let telemetry = AgentTelemetry::builder("tutor-agents")
            .log_path(&log_path)
            .min_level(LogLevel::Info)
            .build()
            .unwrap();
        telemetry.timed("noop", || ());
        assert!(read_records(&log_path).unwrap().is_empty());
    }
}
