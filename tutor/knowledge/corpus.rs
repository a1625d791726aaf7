use std::{fs, path::Path};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::resources::Resource;

/// Locator and cost information attached to a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMeta {
    /// Optional URL of the underlying resource.
    #[serde(default)]
    pub url: Option<String>,
    /// Download cost in kilobytes.
    #[serde(default)]
    pub size_kb: u64,
}

/// Summarized learning resource available for retrieval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Stable unique identifier.
    pub id: String,
    /// Human readable title.
    #[serde(default)]
    pub title: String,
    /// Free-text, comma-like tag list.
    #[serde(default)]
    pub tags: String,
    /// Plain-text summary.
    #[serde(default)]
    pub summary: String,
    /// Locator and cost.
    #[serde(default)]
    pub meta: DocumentMeta,
}

impl Document {
    /// Creates a document without url and with zero size.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        tags: impl Into<String>,
        summary: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            tags: tags.into(),
            summary: summary.into(),
            meta: DocumentMeta::default(),
        }
    }

    /// Attaches a URL.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.meta.url = Some(url.into());
        self
    }

    /// Sets the size in kilobytes.
    #[must_use]
    pub fn with_size_kb(mut self, size_kb: u64) -> Self {
        self.meta.size_kb = size_kb;
        self
    }
}

/// Errors raised while building a corpus.
#[derive(Debug, Error)]
pub enum CorpusError {
    /// A document or resource arrived with a blank id.
    #[error("document is missing an id")]
    MissingId,
    /// Two documents share the same id.
    #[error("duplicate document id `{0}`")]
    DuplicateId(String),
    /// Input could not be decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// Input could not be read.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Read-only collection of documents keyed by id, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    documents: IndexMap<String, Document>,
}

impl Corpus {
    /// Creates an empty corpus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a corpus, failing on the first blank or duplicate id.
    pub fn from_documents(
        documents: impl IntoIterator<Item = Document>,
    ) -> Result<Self, CorpusError> {
        let mut corpus = Self::new();
        for document in documents {
            corpus.insert(document)?;
        }
        Ok(corpus)
    }

    /// Parses a JSON array of documents.
    pub fn from_json_str(raw: &str) -> Result<Self, CorpusError> {
        let documents: Vec<Document> = serde_json::from_str(raw)?;
        Self::from_documents(documents)
    }

    /// Reads a JSON array of documents from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CorpusError> {
        Self::from_json_str(&fs::read_to_string(path)?)
    }

    /// Builds one document per resource, pulling summaries by resource id.
    ///
    /// Missing titles and tags become empty strings, a missing summary becomes
    /// an empty summary, and an unknown size becomes zero.
    pub fn from_resources(
        resources: &[Resource],
        summaries: &IndexMap<String, String>,
    ) -> Result<Self, CorpusError> {
        Self::from_documents(resources.iter().map(|resource| Document {
            id: resource.id.clone(),
            title: resource.title.clone().unwrap_or_default(),
            tags: resource.tags.clone().unwrap_or_default(),
            summary: summaries.get(&resource.id).cloned().unwrap_or_default(),
            meta: DocumentMeta {
                url: resource.url.clone(),
                size_kb: resource.size_or_zero(),
            },
        }))
    }

    /// Adds a document.
    pub fn insert(&mut self, document: Document) -> Result<(), CorpusError> {
        if document.id.trim().is_empty() {
            return Err(CorpusError::MissingId);
        }
        if self.documents.contains_key(&document.id) {
            return Err(CorpusError::DuplicateId(document.id));
        }
        self.documents.insert(document.id.clone(), document);
        Ok(())
    }

    /// Looks up a document.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Document> {
        self.documents.get(id)
    }

    /// Number of documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether the corpus holds no documents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Documents in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.documents.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn rejects_blank_and_duplicate_ids() {
        let mut corpus = Corpus::new();
        corpus
            .insert(Document::new("r1", "Fractions Intro", "math", "parts"))
            .unwrap();
        assert!(matches!(
            corpus.insert(Document::new("  ", "Blank", "", "")),
            Err(CorpusError::MissingId)
        ));
        assert!(matches!(
            corpus.insert(Document::new("r1", "Again", "", "")),
            Err(CorpusError::DuplicateId(id)) if id == "r1"
        ));
        assert_eq!(corpus.len(), 1);
    }

    #[test]
    fn parses_documents_with_defaults() {
        let corpus = Corpus::from_json_str(
            r#"[{"id": "r1", "title": "Fractions Intro", "meta": {"size_kb": 12}},
                {"id": "r2", "summary": "Adding numbers together."}]"#,
        )
        .unwrap();
        let first = corpus.get("r1").unwrap();
        assert_eq!(first.meta.size_kb, 12);
        assert!(first.summary.is_empty());
        assert_eq!(corpus.get("r2").unwrap().title, "");
        let ids: Vec<_> = corpus.iter().map(|doc| doc.id.as_str()).collect();
        assert_eq!(ids, ["r1", "r2"]);
    }

    #[test]
    fn negative_sizes_are_rejected() {
        let err = Corpus::from_json_str(r#"[{"id": "r1", "meta": {"size_kb": -5}}]"#).unwrap_err();
        assert!(matches!(err, CorpusError::Serialization(_)));
    }

    #[test]
    fn builds_from_resources_and_summaries() {
        let resources: Vec<Resource> = serde_json::from_str(
            r#"[{"id": "r1", "title": "Fractions Intro", "tags": "math", "size_kb": 12,
                 "url": "https://example.org/fractions"},
                {"id": "r2", "title": "Addition Basics"}]"#,
        )
        .unwrap();
        let mut summaries = IndexMap::new();
        summaries.insert("r1".to_string(), "Fractions are parts.".to_string());
        let corpus = Corpus::from_resources(&resources, &summaries).unwrap();
        let r1 = corpus.get("r1").unwrap();
        assert_eq!(r1.summary, "Fractions are parts.");
        assert_eq!(r1.meta.url.as_deref(), Some("https://example.org/fractions"));
        let r2 = corpus.get("r2").unwrap();
        assert_eq!(r2.summary, "");
        assert_eq!(r2.tags, "");
        assert_eq!(r2.meta.size_kb, 0);
    }

    #[test]
    fn loads_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("corpus.json");
        fs::write(&path, r#"[{"id": "r1", "title": "Fractions Intro"}]"#).unwrap();
        assert_eq!(Corpus::load(&path).unwrap().len(), 1);
        assert!(matches!(
            Corpus::load(dir.path().join("missing.json")),
            Err(CorpusError::Io(_))
        ));
    }
}
