use chrono::{DateTime, Utc};
use dashmap::DashMap;

#[derive(Clone, Debug)]
pub struct CachedDescription {
    pub html: String,
    pub stored_at: DateTime<Utc>,
}

/// Rendered AI output keyed by the exact excerpt it was produced from.
/// Lives for the whole process; nothing is ever evicted.
#[derive(Debug, Default)]
pub struct DescriptionCache {
    entries: DashMap<String, CachedDescription>,
}

impl DescriptionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, excerpt: &str) -> Option<CachedDescription> {
        self.entries.get(excerpt).map(|entry| entry.value().clone())
    }

    pub fn put(&self, excerpt: String, html: String) {
        self.entries.insert(
            excerpt,
            CachedDescription {
                html,
                stored_at: Utc::now(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
