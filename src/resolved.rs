use indexmap::IndexMap;
use serde::Serialize;

use crate::choice::Choice;

/// Operator answers plus the values derived from the project on disk.
///
/// Built once before any operation runs and only read afterwards. It
/// serializes as one flat map, which is the context every template renders
/// against: `{{ database.value }}`, `{{ app_slug }}`.
#[derive(Debug, Clone, Serialize)]
pub struct Resolved {
    #[serde(flatten)]
    answers: IndexMap<String, Choice>,
    #[serde(flatten)]
    derived: IndexMap<String, String>,
}

impl Resolved {
    pub fn new(answers: IndexMap<String, Choice>, derived: IndexMap<String, String>) -> Self {
        Self { answers, derived }
    }

    pub fn answer(&self, key: &str) -> Option<&Choice> {
        self.answers.get(key)
    }

    pub fn value(&self, key: &str) -> Option<&str> {
        self.derived.get(key).map(String::as_str)
    }
}
