use std::{cmp::Ordering, sync::Arc};

use serde::{Deserialize, Serialize};
use tutor_knowledge::{Corpus, Document};

use crate::similarity::similarity;

/// Weight of a query found verbatim in the title.
pub const TITLE_HIT: f64 = 1.2;
/// Weight of a query found verbatim in the tags.
pub const TAGS_HIT: f64 = 1.0;
/// Weight of a query found verbatim in the summary.
pub const SUMMARY_HIT: f64 = 0.8;
/// Weight of title similarity.
pub const TITLE_FUZZ: f64 = 0.6;
/// Weight of summary similarity.
pub const SUMMARY_FUZZ: f64 = 0.4;
/// Summaries with at most this many characters are penalized.
pub const SHORT_SUMMARY_CHARS: usize = 50;
/// Penalty applied to short summaries.
pub const SHORT_SUMMARY_PENALTY: f64 = -0.2;

/// A document paired with its score for one query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCandidate {
    /// Document id.
    pub id: String,
    /// Retrieval score, always positive.
    pub score: f64,
    /// The scored document.
    pub document: Document,
}

/// Ranks corpus documents against a query.
pub trait Retriever: Send + Sync {
    /// Agent identifier used in logs.
    fn name(&self) -> &str;
    /// At most `top_k` positively scored candidates, best first.
    fn rank(&self, query: &str, top_k: usize) -> Vec<RankedCandidate>;
}

/// Substring plus fuzzy-title/summary ranker over an in-memory corpus.
#[derive(Debug, Clone)]
pub struct LexicalRetriever {
    corpus: Arc<Corpus>,
}

impl LexicalRetriever {
    /// Creates a retriever over a shared corpus.
    #[must_use]
    pub const fn new(corpus: Arc<Corpus>) -> Self {
        Self { corpus }
    }

    /// Corpus being searched.
    #[must_use]
    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }
}

impl Retriever for LexicalRetriever {
    fn name(&self) -> &str {
        "lexical_retriever"
    }

    fn rank(&self, query: &str, top_k: usize) -> Vec<RankedCandidate> {
        let query = query.trim().to_lowercase();
        if query.is_empty() || top_k == 0 {
            return Vec::new();
        }
        let mut ranked: Vec<RankedCandidate> = self
            .corpus
            .iter()
            .filter_map(|document| {
                let score = score_document(&query, document);
                (score > 0.0).then(|| RankedCandidate {
                    id: document.id.clone(),
                    score,
                    document: document.clone(),
                })
            })
            .collect();
        ranked.sort_by(by_score_then_id);
        ranked.truncate(top_k);
        ranked
    }
}

/// Scores one document against an already lowercased, trimmed query.
#[must_use]
pub fn score_document(query: &str, document: &Document) -> f64 {
    let title = document.title.to_lowercase();
    let tags = document.tags.to_lowercase();
    let summary = document.summary.to_lowercase();

    let mut subscore = 0.0;
    if title.contains(query) {
        subscore += TITLE_HIT;
    }
    if tags.contains(query) {
        subscore += TAGS_HIT;
    }
    if summary.contains(query) {
        subscore += SUMMARY_HIT;
    }
    let score = subscore + TITLE_FUZZ * similarity(query, &title)
        + SUMMARY_FUZZ * similarity(query, &summary);
    let penalty = if summary.chars().count() > SHORT_SUMMARY_CHARS {
        0.0
    } else {
        SHORT_SUMMARY_PENALTY
    };
    (score + penalty).max(0.0)
}

fn by_score_then_id(left: &RankedCandidate, right: &RankedCandidate) -> Ordering {
    right
        .score
        .total_cmp(&left.score)
        .then_with(|| left.id.cmp(&right.id))
}
