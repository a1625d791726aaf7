use std::sync::OnceLock;

use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::resources::Resource;

/// Length preset for generated summaries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryMode {
    /// Two sentences.
    #[default]
    Short,
    /// Five sentences.
    Long,
}

impl SummaryMode {
    /// Number of sentences kept for this mode.
    #[must_use]
    pub const fn sentence_budget(self) -> usize {
        match self {
            Self::Short => 2,
            Self::Long => 5,
        }
    }
}

/// Anything that can condense resource text into a summary.
pub trait Summarizer: Send + Sync {
    /// Summarizes `text`; empty input yields an empty summary.
    fn summarize(&self, text: &str, mode: SummaryMode) -> String;
}

/// Offline summarizer that keeps the longest sentences.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractiveSummarizer;

impl Summarizer for ExtractiveSummarizer {
    fn summarize(&self, text: &str, mode: SummaryMode) -> String {
        if text.is_empty() {
            return String::new();
        }
        extractive_summary(text, mode.sentence_budget())
    }
}

fn sentence_break() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[.!?] +").expect("sentence break pattern is valid"))
}

/// Splits after `.`, `!` or `?` followed by spaces. The punctuation stays with its sentence.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    for boundary in sentence_break().find_iter(text) {
        // The punctuation mark is a single ASCII byte.
        sentences.push(&text[start..=boundary.start()]);
        start = boundary.end();
    }
    sentences.push(&text[start..]);
    sentences
}

/// Picks the `max_sentences` longest sentences and returns them in reading order.
///
/// Length is measured in characters; equally long sentences prefer the earlier one.
#[must_use]
pub fn extractive_summary(text: &str, max_sentences: usize) -> String {
    let mut scored: Vec<(usize, usize, &str)> = split_sentences(text.trim())
        .into_iter()
        .enumerate()
        .filter(|(_, sentence)| !sentence.trim().is_empty())
        .map(|(idx, sentence)| (sentence.chars().count(), idx, sentence))
        .collect();
    scored.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
    scored.truncate(max_sentences);
    scored.sort_by_key(|&(_, idx, _)| idx);
    scored
        .into_iter()
        .map(|(_, _, sentence)| sentence)
        .collect::<Vec<_>>()
        .join(" ")
}

fn pseudo_text(resource: &Resource) -> String {
    format!(
        "{}. {}. Example content for resource {}. Contains explanation, examples, and practice tasks.",
        resource.title.as_deref().unwrap_or_default(),
        resource.tags.as_deref().unwrap_or_default(),
        resource.id,
    )
}

/// Summarizes every resource, keyed by resource id in manifest order.
#[must_use]
pub fn summarize_resources(
    resources: &[Resource],
    summarizer: &dyn Summarizer,
    mode: SummaryMode,
) -> IndexMap<String, String> {
    resources
        .iter()
        .map(|resource| {
            (
                resource.id.clone(),
                summarizer.summarize(&pseudo_text(resource), mode),
            )
        })
        .collect()
}
