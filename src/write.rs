use std::fs;
use std::path::{Path, PathBuf};

use crate::report::Outcome;
use crate::resolved::Resolved;
use crate::template::{Content, Renderer};
use crate::utils::{self, Result};

/// One whole-file write.
#[derive(Debug, Clone)]
pub struct WriteOperation {
    pub target: PathBuf,
    pub content: Content,
    pub force: bool,
    pub executable: bool,
}

impl WriteOperation {
    pub fn new(target: impl Into<PathBuf>, content: Content) -> Self {
        Self {
            target: target.into(),
            content,
            force: false,
            executable: false,
        }
    }

    pub fn force(mut self) -> Self {
        self.force = true;
        self
    }

    pub fn executable(mut self) -> Self {
        self.executable = true;
        self
    }
}

/// Writes `write.content` to `root/write.target`.
///
/// An existing file is left untouched unless the write is forced. The
/// executable bit is applied to whatever file ends up at the target, including
/// one that was skipped.
pub fn materialize(
    root: &Path,
    write: &WriteOperation,
    renderer: &Renderer,
    resolved: &Resolved,
) -> Result<Outcome> {
    let path = root.join(&write.target);
    let exists = path.exists();

    let outcome = if exists && !write.force {
        Outcome::Skipped
    } else {
        let content = renderer.render(&write.content, resolved)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content.as_bytes())?;
        tracing::debug!(path = %path.display(), bytes = content.len(), "wrote file");
        if exists {
            Outcome::Overwrote
        } else {
            Outcome::Created
        }
    };

    if write.executable {
        utils::set_executable(&path)?;
    }
    Ok(outcome)
}
