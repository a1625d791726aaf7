#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

//! Learning-resource knowledge: the read-only corpus handed to retrieval, the
//! manifest records handed to the planner, and the offline content helpers
//! (summaries, language detection) that sit between them.

/// Corpus documents and construction.
#[path = "../corpus.rs"]
pub mod corpus;

/// Resource manifest records and bandwidth filtering.
#[path = "../resources.rs"]
pub mod resources;

/// Extractive summarization.
#[path = "../summarizer.rs"]
pub mod summarizer;

/// Language detection and the translation seam.
#[path = "../translation.rs"]
pub mod translation;

pub use corpus::{Corpus, CorpusError, Document, DocumentMeta};
pub use resources::{filter_by_bandwidth, Resource};
pub use summarizer::{
    extractive_summary, summarize_resources, ExtractiveSummarizer, Summarizer, SummaryMode,
};
pub use translation::{detect_language, PassthroughTranslator, Translator};
