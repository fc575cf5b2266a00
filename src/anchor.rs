use std::fmt;

use memchr::memmem;
use regex::Regex;

#[derive(Debug, Clone)]
pub struct Pattern(Regex);

impl Pattern {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self(Regex::new(pattern)?))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Before,
    After,
}

/// A reference point inside a file's existing content.
#[derive(Debug, Clone)]
pub enum Anchor {
    Literal(String),
    Pattern(Pattern),
    /// End of file; both sides resolve to the content length.
    End,
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(text) => write!(f, "{:?}", text),
            Self::Pattern(pattern) => write!(f, "/{}/", pattern.as_str()),
            Self::End => write!(f, "<end of file>"),
        }
    }
}

/// Finds the byte offset where a snippet should be inserted.
///
/// `Side::After` uses the first match and returns the offset just past it.
/// `Side::Before` uses the last match and returns its start, so a pattern such
/// as `(?m)^end` lands on the closing line of the outermost block.
pub trait Locate {
    fn locate(&self, content: &str, side: Side) -> Option<usize>;
}

impl Locate for Anchor {
    fn locate(&self, content: &str, side: Side) -> Option<usize> {
        match self {
            Self::Literal(text) => {
                let (haystack, needle) = (content.as_bytes(), text.as_bytes());
                match side {
                    Side::After => memmem::find(haystack, needle).map(|at| at + needle.len()),
                    Side::Before => memmem::rfind(haystack, needle),
                }
            }
            Self::Pattern(Pattern(regex)) => match side {
                Side::After => regex.find(content).map(|m| m.end()),
                Side::Before => regex.find_iter(content).last().map(|m| m.start()),
            },
            Self::End => Some(content.len()),
        }
    }
}
