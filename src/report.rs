//! Narration of what a run does to the project directory.

use std::fmt;
use std::io::{self, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Create,
    Overwrite,
    Skip,
    Insert,
    Gemfile,
    Warn,
    Error,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let word = match self {
            Self::Create => "create",
            Self::Overwrite => "overwrite",
            Self::Skip => "skip",
            Self::Insert => "insert",
            Self::Gemfile => "gemfile",
            Self::Warn => "warn",
            Self::Error => "error",
        };
        // `pad` honours the width callers ask for
        f.pad(word)
    }
}

/// What a single edit or write did to its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Created,
    Overwrote,
    Inserted,
    /// Already applied or already present; left untouched.
    Skipped,
    /// Optional target absent; nothing to edit.
    Missing,
}

impl Outcome {
    pub fn status(self) -> Status {
        match self {
            Self::Created => Status::Create,
            Self::Overwrote => Status::Overwrite,
            Self::Inserted => Status::Insert,
            Self::Skipped => Status::Skip,
            Self::Missing => Status::Warn,
        }
    }
}

pub trait Reporter {
    /// Free-form narration.
    fn say(&mut self, message: &str);

    /// One outcome line for a single operation.
    fn status(&mut self, status: Status, subject: &str);
}

/// Writes narration to a stream, one aligned line per outcome.
pub struct Console<W: Write> {
    out: W,
}

impl Console<io::Stdout> {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> Console<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for Console<W> {
    fn say(&mut self, message: &str) {
        // narration is best effort
        let _ = writeln!(self.out, "{message}");
    }

    fn status(&mut self, status: Status, subject: &str) {
        let _ = writeln!(self.out, "{status:>12}  {subject}");
    }
}

/// Keeps every narrated line in memory.
#[derive(Debug, Default)]
pub struct Transcript {
    pub said: Vec<String>,
    pub statuses: Vec<(Status, String)>,
}

impl Transcript {
    pub fn subjects(&self, status: Status) -> Vec<&str> {
        self.statuses
            .iter()
            .filter(|(s, _)| *s == status)
            .map(|(_, subject)| subject.as_str())
            .collect()
    }
}

impl Reporter for Transcript {
    fn say(&mut self, message: &str) {
        self.said.push(message.to_string());
    }

    fn status(&mut self, status: Status, subject: &str) {
        self.statuses.push((status, subject.to_string()));
    }
}

/// Tally of narrated outcomes for one run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Summary {
    pub created: u32,
    pub overwrote: u32,
    pub skipped: u32,
    pub inserted: u32,
    pub declared: u32,
    pub warned: u32,
    pub failed: u32,
}

impl Summary {
    pub(crate) fn count(&mut self, status: Status) {
        let slot = match status {
            Status::Create => &mut self.created,
            Status::Overwrite => &mut self.overwrote,
            Status::Skip => &mut self.skipped,
            Status::Insert => &mut self.inserted,
            Status::Gemfile => &mut self.declared,
            Status::Warn => &mut self.warned,
            Status::Error => &mut self.failed,
        };
        *slot += 1;
    }

    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} created, {} overwritten, {} inserted, {} declared, {} skipped, {} warnings, {} failed",
            self.created,
            self.overwrote,
            self.inserted,
            self.declared,
            self.skipped,
            self.warned,
            self.failed
        )
    }
}
