//! Default content with override.
//!
//! Calculator pages pair their results with an essay fetched from a content
//! store. The engine never depends on that fetch: every lookup degrades to a
//! single built-in default record when the store fails or has no entry.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::path::{Path, PathBuf};

use crate::error::FinCalcError;
use crate::FinCalcResult;

/// A keyed content record as stored by the site's content store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentRecord {
    pub id: String,
    pub title: String,
    /// Markdown body, passed through untouched.
    pub content: String,
    #[serde(default)]
    pub meta_title: Option<String>,
    #[serde(default)]
    pub meta_description: Option<String>,
}

/// Read-only access to keyed content records.
pub trait ContentSource {
    fn fetch(&self, id: &str) -> FinCalcResult<Option<ContentRecord>>;
}

/// Content store backed by a directory of `{id}.json` files.
#[derive(Debug, Clone)]
pub struct JsonContentSource {
    root: PathBuf,
}

impl JsonContentSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ContentSource for JsonContentSource {
    fn fetch(&self, id: &str) -> FinCalcResult<Option<ContentRecord>> {
        if id.is_empty() || id.contains(['/', '\\']) || id.contains("..") {
            return Err(FinCalcError::InvalidInput {
                field: "id".into(),
                reason: format!("'{id}' is not a valid content key"),
            });
        }
        let path = self.root.join(format!("{id}.json"));
        if !path.is_file() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&path)?;
        let record: ContentRecord = serde_json::from_str(&contents)?;
        Ok(Some(record))
    }
}

/// Content key of a calculator's essay, e.g. `auto_loan_essay`.
pub fn essay_key(slug: &str) -> String {
    format!("{slug}_essay")
}

/// Built-in essay used when the store cannot supply one.
pub fn default_essay(slug: &str) -> ContentRecord {
    let title = slug
        .split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ");
    let title = format!("{title} Calculator");
    ContentRecord {
        id: essay_key(slug),
        content: format!(
            "## {title}\n\nResults are estimates based on the inputs you provide \
             and published reference rates. They are not financial advice."
        ),
        meta_title: Some(title.clone()),
        meta_description: Some(format!("Free {} with year-by-year projections.", title.to_lowercase())),
        title,
    }
}

/// Resolve a calculator's essay, falling back to the built-in default.
pub fn resolve_content(source: &dyn ContentSource, slug: &str) -> ContentRecord {
    let key = essay_key(slug);
    match source.fetch(&key) {
        Ok(Some(record)) => {
            debug!("content '{key}' served from store");
            record
        }
        Ok(None) => {
            debug!("content '{key}' missing from store, using default");
            default_essay(slug)
        }
        Err(e) => {
            warn!("content '{key}' fetch failed, using default: {e}");
            default_essay(slug)
        }
    }
}

/// Unwrap a load result or degrade to a default, logging the failure.
pub fn or_default<T, E: Display>(what: &str, loaded: Result<T, E>, default: impl FnOnce() -> T) -> T {
    match loaded {
        Ok(value) => value,
        Err(e) => {
            warn!("failed to load {what}, using built-in defaults: {e}");
            default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct MapSource(HashMap<String, ContentRecord>);

    impl ContentSource for MapSource {
        fn fetch(&self, id: &str) -> FinCalcResult<Option<ContentRecord>> {
            Ok(self.0.get(id).cloned())
        }
    }

    struct FailingSource;

    impl ContentSource for FailingSource {
        fn fetch(&self, _id: &str) -> FinCalcResult<Option<ContentRecord>> {
            Err(FinCalcError::Io("connection refused".into()))
        }
    }

    #[test]
    fn test_essay_key_suffix() {
        assert_eq!(essay_key("auto_loan"), "auto_loan_essay");
    }

    #[test]
    fn test_default_essay_title() {
        let record = default_essay("insurance_inflation");
        assert_eq!(record.title, "Insurance Inflation Calculator");
        assert_eq!(record.id, "insurance_inflation_essay");
    }

    #[test]
    fn test_store_record_overrides_default() {
        let stored = ContentRecord {
            id: "ppp_essay".into(),
            title: "Understanding PPP".into(),
            content: "body".into(),
            meta_title: None,
            meta_description: None,
        };
        let mut map = HashMap::new();
        map.insert("ppp_essay".to_string(), stored.clone());
        assert_eq!(resolve_content(&MapSource(map), "ppp"), stored);
    }

    #[test]
    fn test_failure_and_miss_degrade_to_default() {
        assert_eq!(resolve_content(&FailingSource, "ppp"), default_essay("ppp"));
        assert_eq!(
            resolve_content(&MapSource(HashMap::new()), "ppp"),
            default_essay("ppp")
        );
    }

    #[test]
    fn test_json_source_rejects_traversal() {
        let source = JsonContentSource::new("/tmp");
        assert!(source.fetch("../etc/passwd").is_err());
    }

    #[test]
    fn test_json_source_missing_file_is_none() {
        let source = JsonContentSource::new("/nonexistent-content-root");
        assert!(source.fetch("auto_loan_essay").unwrap().is_none());
    }
}
