//! Appends `gem` declarations to a Gemfile.
//!
//! Declarations are appended as-is: declaring the same gem twice yields two
//! lines, and Bundler is left to settle any conflict.

use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::Write as _;
use std::path::Path;

use crate::utils::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Group {
    Development,
    Test,
    Production,
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, ":development"),
            Self::Test => write!(f, ":test"),
            Self::Production => write!(f, ":production"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    pub name: String,
    pub version: Option<String>,
    /// Empty means the gem is always installed.
    pub groups: Vec<Group>,
}

impl Dependency {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            version: None,
            groups: Vec::new(),
        }
    }

    pub fn version(mut self, version: Option<&str>) -> Self {
        self.version = version.map(str::to_string);
        self
    }

    pub fn group(mut self, groups: &[Group]) -> Self {
        self.groups = groups.to_vec();
        self
    }

    fn line(&self) -> String {
        match &self.version {
            Some(version) => format!("gem \"{}\", \"{}\"", self.name, version),
            None => format!("gem \"{}\"", self.name),
        }
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{} ({})", self.name, version),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Renders declarations; consecutive ones sharing a group set share a block.
pub fn render(dependencies: &[Dependency]) -> String {
    let mut text = String::new();
    for chunk in dependencies.chunk_by(|a, b| a.groups == b.groups) {
        let groups = &chunk[0].groups;
        if groups.is_empty() {
            for dependency in chunk {
                text.push_str(&dependency.line());
                text.push('\n');
            }
            continue;
        }
        let names = groups
            .iter()
            .map(Group::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        text.push_str(&format!("\ngroup {names} do\n"));
        for dependency in chunk {
            text.push_str(&format!("  {}\n", dependency.line()));
        }
        text.push_str("end\n");
    }
    text
}

/// Appends `dependencies` to the manifest at `path`.
pub fn declare(path: &Path, dependencies: &[Dependency]) -> Result<()> {
    if !path.is_file() {
        return Err(Error::MissingManifest {
            path: path.to_path_buf(),
        });
    }
    if dependencies.is_empty() {
        return Ok(());
    }

    let current = fs::read_to_string(path)?;
    let mut text = render(dependencies);
    if !current.is_empty() && !current.ends_with('\n') {
        text.insert(0, '\n');
    }

    let mut file = OpenOptions::new().append(true).open(path)?;
    file.write_all(text.as_bytes())?;
    tracing::debug!(path = %path.display(), count = dependencies.len(), "declared dependencies");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_ungrouped_with_optional_version() {
        let text = render(&[
            Dependency::new("mysql2").version(Some("~> 0.5")),
            Dependency::new("lamby"),
        ]);
        assert_eq!(text, "gem \"mysql2\", \"~> 0.5\"\ngem \"lamby\"\n");
    }

    #[test]
    fn consecutive_group_members_share_a_block() {
        let dev_test = [Group::Development, Group::Test];
        let text = render(&[
            Dependency::new("debug").group(&dev_test),
            Dependency::new("webrick").group(&dev_test),
            Dependency::new("web-console").group(&[Group::Development]),
        ]);
        assert_eq!(
            text,
            "\ngroup :development, :test do\n  gem \"debug\"\n  gem \"webrick\"\nend\n\
             \ngroup :development do\n  gem \"web-console\"\nend\n"
        );
    }

    #[test]
    fn declare_appends_and_does_not_dedupe() {
        let dir = tempfile::tempdir().unwrap();
        let gemfile = dir.path().join("Gemfile");
        fs::write(&gemfile, "source \"https://rubygems.org\"").unwrap();

        declare(&gemfile, &[Dependency::new("pg")]).unwrap();
        declare(&gemfile, &[Dependency::new("pg")]).unwrap();

        let content = fs::read_to_string(&gemfile).unwrap();
        assert_eq!(
            content,
            "source \"https://rubygems.org\"\ngem \"pg\"\ngem \"pg\"\n"
        );
    }

    #[test]
    fn missing_manifest_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = declare(&dir.path().join("Gemfile"), &[Dependency::new("pg")]).unwrap_err();
        assert!(matches!(err, Error::MissingManifest { .. }));
    }
}
