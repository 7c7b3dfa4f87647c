use serde_json::Value;

use crate::models::{LanguagePreference, MovieRecord};

/// Attaches display fields to records before they leave the gateway
#[derive(Debug, Clone)]
pub struct ResultEnricher {
    image_base_url: String,
}

impl ResultEnricher {
    pub fn new(image_base_url: impl Into<String>) -> Self {
        Self {
            image_base_url: image_base_url.into(),
        }
    }

    /// Sets `poster_url` from `poster_path`, or to null when there is none
    pub fn enrich(&self, mut record: MovieRecord) -> MovieRecord {
        let poster_url = match record.poster_path() {
            Some(path) => Value::String(format!("{}{}", self.image_base_url, path)),
            None => Value::Null,
        };
        record.set("poster_url", poster_url);
        record
    }

    pub fn enrich_all(&self, records: Vec<MovieRecord>) -> Vec<MovieRecord> {
        records.into_iter().map(|record| self.enrich(record)).collect()
    }

    /// Keeps records whose `original_language` matches the preference
    ///
    /// Used for listings whose upstream endpoint cannot filter by language.
    pub fn retain_language(
        records: Vec<MovieRecord>,
        language: LanguagePreference,
    ) -> Vec<MovieRecord> {
        records
            .into_iter()
            .filter(|record| record.original_language() == Some(language.code()))
            .collect()
    }
}
