use serde::{Deserialize, Serialize};

/// One row of the resource manifest. Every column except `id` may be absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    /// Manifest identifier.
    pub id: String,
    /// Download location.
    #[serde(default)]
    pub url: Option<String>,
    /// Display title.
    #[serde(default)]
    pub title: Option<String>,
    /// Language code such as `en`, `hi`, or `kn`.
    #[serde(default)]
    pub language: Option<String>,
    /// Download size in kilobytes; absent means unknown.
    #[serde(default)]
    pub size_kb: Option<u64>,
    /// Free-text tags.
    #[serde(default)]
    pub tags: Option<String>,
}

impl Resource {
    /// Creates a resource with only an id set.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: None,
            title: None,
            language: None,
            size_kb: None,
            tags: None,
        }
    }

    /// Sets the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the language code.
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Sets the size.
    #[must_use]
    pub fn with_size_kb(mut self, size_kb: u64) -> Self {
        self.size_kb = Some(size_kb);
        self
    }

    /// Sets the tags.
    #[must_use]
    pub fn with_tags(mut self, tags: impl Into<String>) -> Self {
        self.tags = Some(tags.into());
        self
    }

    /// Size in kilobytes, treating an unknown size as zero.
    #[must_use]
    pub fn size_or_zero(&self) -> u64 {
        self.size_kb.unwrap_or(0)
    }
}

/// Keeps resources whose size (unknown counts as zero) fits within `max_size_kb`, in order.
#[must_use]
pub fn filter_by_bandwidth(resources: &[Resource], max_size_kb: u64) -> Vec<Resource> {
    resources
        .iter()
        .filter(|resource| resource.size_or_zero() <= max_size_kb)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bandwidth_filter_keeps_small_and_unknown_sizes() {
        let resources = vec![
            Resource::new("big").with_size_kb(400),
            Resource::new("small").with_size_kb(120),
            Resource::new("unknown"),
            Resource::new("edge").with_size_kb(150),
        ];
        let kept: Vec<_> = filter_by_bandwidth(&resources, 150)
            .into_iter()
            .map(|resource| resource.id)
            .collect();
        assert_eq!(kept, ["small", "unknown", "edge"]);
    }

    #[test]
    fn manifest_rows_tolerate_missing_columns() {
        let resource: Resource = serde_json::from_str(r#"{"id": "r9", "language": "kn"}"#).unwrap();
        assert_eq!(resource.language.as_deref(), Some("kn"));
        assert_eq!(resource.size_or_zero(), 0);
        assert!(serde_json::from_str::<Resource>(r#"{"title": "No id"}"#).is_err());
    }
}
