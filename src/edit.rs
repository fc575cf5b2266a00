use std::fs;
use std::path::{Path, PathBuf};

use crate::anchor::{Anchor, Locate, Side};
use crate::report::Outcome;
use crate::utils::{self, Error, Result};

/// One anchored insertion into an existing file.
#[derive(Debug, Clone)]
pub struct EditOperation {
    pub target: PathBuf,
    pub anchor: Anchor,
    pub side: Side,
    pub snippet: String,
    /// Text whose presence means the snippet is already applied. Defaults to
    /// the snippet itself.
    pub signature: Option<String>,
    pub force: bool,
}

impl EditOperation {
    pub fn before(target: impl Into<PathBuf>, anchor: Anchor, snippet: impl Into<String>) -> Self {
        Self::new(target, anchor, Side::Before, snippet)
    }

    pub fn after(target: impl Into<PathBuf>, anchor: Anchor, snippet: impl Into<String>) -> Self {
        Self::new(target, anchor, Side::After, snippet)
    }

    pub fn append(target: impl Into<PathBuf>, snippet: impl Into<String>) -> Self {
        Self::new(target, Anchor::End, Side::After, snippet)
    }

    fn new(target: impl Into<PathBuf>, anchor: Anchor, side: Side, snippet: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            anchor,
            side,
            snippet: snippet.into(),
            signature: None,
            force: false,
        }
    }

    pub fn signature(mut self, signature: impl Into<String>) -> Self {
        self.signature = Some(signature.into());
        self
    }

    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    fn signature_text(&self) -> &str {
        self.signature.as_deref().unwrap_or(&self.snippet)
    }
}

/// Inserts `edit.snippet` next to its anchor inside `root/edit.target`.
///
/// A missing target yields [`Outcome::Missing`] and a present signature yields
/// [`Outcome::Skipped`] unless forced. An anchor that cannot be found is an
/// error whether or not the edit is forced, and the file is left untouched.
pub fn insert(root: &Path, edit: &EditOperation) -> Result<Outcome> {
    let path = root.join(&edit.target);
    if !path.is_file() {
        return Ok(Outcome::Missing);
    }

    let content = fs::read_to_string(&path)?;
    if !edit.force && utils::contains(&content, edit.signature_text()) {
        return Ok(Outcome::Skipped);
    }

    let at = edit
        .anchor
        .locate(&content, edit.side)
        .ok_or_else(|| Error::AnchorNotFound {
            path: edit.target.clone(),
            anchor: edit.anchor.to_string(),
        })?;

    let mut updated = String::with_capacity(content.len() + edit.snippet.len());
    updated.push_str(&content[..at]);
    updated.push_str(&edit.snippet);
    updated.push_str(&content[at..]);

    tracing::debug!(path = %path.display(), offset = at, "inserting snippet");
    utils::rewrite_atomic(&path, &updated)?;
    Ok(Outcome::Inserted)
}
