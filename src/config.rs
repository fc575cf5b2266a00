use std::fs;
use std::path::Path;

use anyhow::{bail, Context as _, Result};
use indexmap::IndexMap;
use serde::Deserialize;

const FILE_NAME: &str = ".lamgen.config.toml";

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub(crate) struct Config {
    /// Ruby version used when the project has no usable `.ruby-version`.
    pub(crate) ruby_version: Option<String>,
    /// Answers given ahead of time, keyed by question.
    pub(crate) answers: IndexMap<String, String>,
}

impl Config {
    /// Loads `path`, or `~/.lamgen.config.toml` when no path is given. Only an
    /// explicitly requested file has to exist.
    pub(crate) fn init(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => match home::home_dir() {
                Some(home) => (home.join(FILE_NAME), false),
                None => return Ok(Self::default()),
            },
        };

        if !path.exists() {
            if explicit {
                bail!("config file not found: {}", path.display());
            }
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .context(format!("failed to read config file: {}", path.display()))?;
        Self::parse(&contents).context(format!("failed to parse config file: {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }
}
