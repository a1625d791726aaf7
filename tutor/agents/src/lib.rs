#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

//! Tutoring agents: similarity scoring, retrieval, answer synthesis, teaching
//! expansion, and grading, sequenced by an orchestrator that keeps a bounded
//! memory per session.

/// Pipeline configuration.
#[path = "../config.rs"]
pub mod config;
/// Free-text answer grading.
#[path = "../feedback.rs"]
pub mod feedback;
/// Orchestrator entry point.
#[path = "../main.rs"]
pub mod orchestration_entry;
/// Answer synthesis.
#[path = "../qa.rs"]
pub mod qa;
/// Session records and responses.
#[path = "../records.rs"]
pub mod records;
/// Corpus ranking.
#[path = "../retriever.rs"]
pub mod retriever;
/// String similarity.
#[path = "../similarity.rs"]
pub mod similarity;
/// Telemetry helpers for the agents.
#[path = "../telemetry.rs"]
pub mod telemetry;
/// Teaching expansion.
#[path = "../tutor.rs"]
pub mod tutor;

pub use config::{ConfigError, TutorConfig};
pub use feedback::{assess, Assessment, Grader, SimilarityGrader};
pub use orchestration_entry::Orchestrator;
pub use qa::{AnswerSynthesizer, TemplateAnswerer};
pub use records::{PracticeItem, QuestionResponse, RetrievedRef, SessionRecord, TeachingPacket};
pub use retriever::{LexicalRetriever, RankedCandidate, Retriever};
pub use similarity::similarity;
pub use telemetry::{AgentTelemetry, AgentTelemetryBuilder};
pub use tutor::{TeachingExpander, TemplateTutor};
