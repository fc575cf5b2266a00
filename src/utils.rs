use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use memchr::memmem;
use tempfile::NamedTempFile;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Template(#[from] minijinja::Error),
    #[error(transparent)]
    Regex(#[from] regex::Error),
    #[error("anchor {anchor} not found in '{}'", path.display())]
    AnchorNotFound { path: PathBuf, anchor: String },
    #[error("dependency manifest not found: '{}'", path.display())]
    MissingManifest { path: PathBuf },
    #[error("input closed before a valid answer was given")]
    InputClosed,
    #[error("failed to read answer: {0}")]
    Prompt(String),
    #[error("preset answer '{selector}' is not a valid choice for '{key}'")]
    InvalidPreset { key: String, selector: String },
    #[error("no answer for '{0}'")]
    MissingAnswer(String),
    #[error("invalid enumeration for '{key}'")]
    InvalidEnumeration {
        key: String,
        source: InvalidEnumerationError,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum InvalidEnumerationError {
    #[error("no choices")]
    Empty,
    #[error("duplicate selector: '{0}'")]
    DuplicateSelector(String),
    #[error("default outside choices")]
    DefaultOutsideChoices,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

pub(crate) fn contains(haystack: &str, needle: &str) -> bool {
    memmem::find(haystack.as_bytes(), needle.as_bytes()).is_some()
}

/// Replaces `path` with `contents` through a sibling temporary file, keeping
/// the permissions of the file being replaced.
pub(crate) fn rewrite_atomic(path: &Path, contents: &str) -> std::io::Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let perms = fs::metadata(path)?.permissions();
    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(contents.as_bytes())?;
    file.as_file().set_permissions(perms)?;
    file.persist(path).map_err(|err| err.error)?;
    Ok(())
}

#[cfg(unix)]
pub(crate) fn set_executable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt as _;
    let mut perms = fs::metadata(path)?.permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms)
}

#[cfg(not(unix))]
pub(crate) fn set_executable(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

pub(crate) fn path_to_string<P: AsRef<Path>>(path: P) -> String {
    path.as_ref().to_string_lossy().into_owned()
}
