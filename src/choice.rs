use std::io::{BufRead, Write};

use indexmap::IndexMap;
use serde::Serialize;

use crate::utils::{Error, InvalidEnumerationError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Choice {
    pub name: String,
    pub value: String,
    pub dependency: String,
    pub version: Option<String>,
}

impl Choice {
    pub fn new(name: &str, value: &str, dependency: &str, version: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
            dependency: dependency.to_string(),
            version: version.map(str::to_string),
        }
    }
}

/// Ordered selector tokens with exactly one default.
#[derive(Debug, Clone)]
pub struct Enumeration {
    choices: IndexMap<String, Choice>,
    default: String,
}

impl Enumeration {
    pub fn new<S: Into<String>>(
        choices: impl IntoIterator<Item = (S, Choice)>,
        default: &str,
    ) -> Result<Self, InvalidEnumerationError> {
        let mut map = IndexMap::new();
        for (selector, choice) in choices {
            let selector = selector.into();
            if map.contains_key(&selector) {
                return Err(InvalidEnumerationError::DuplicateSelector(selector));
            }
            map.insert(selector, choice);
        }
        if map.is_empty() {
            return Err(InvalidEnumerationError::Empty);
        }
        if !map.contains_key(default) {
            return Err(InvalidEnumerationError::DefaultOutsideChoices);
        }
        Ok(Self {
            choices: map,
            default: default.to_string(),
        })
    }

    pub fn get(&self, selector: &str) -> Option<&Choice> {
        self.choices.get(selector)
    }

    pub fn default_selector(&self) -> &str {
        &self.default
    }

    pub fn default_choice(&self) -> &Choice {
        &self.choices[self.default.as_str()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Choice)> {
        self.choices.iter().map(|(k, v)| (k.as_str(), v))
    }

    fn bounds(&self) -> (&str, &str) {
        // non-empty by construction
        let first = self.choices.first().map(|(k, _)| k.as_str()).unwrap_or_default();
        let last = self.choices.last().map(|(k, _)| k.as_str()).unwrap_or_default();
        (first, last)
    }
}

#[derive(Debug, Clone)]
pub struct Question {
    pub key: String,
    pub heading: String,
    pub enumeration: Enumeration,
}

impl Question {
    pub fn new(key: &str, heading: &str, enumeration: Enumeration) -> Self {
        Self {
            key: key.to_string(),
            heading: heading.to_string(),
            enumeration,
        }
    }

    /// Heading followed by one `  <selector>) <name>` line per choice.
    pub fn listing(&self) -> String {
        let mut listing = format!("{}\n", self.heading);
        for (selector, choice) in self.enumeration.iter() {
            listing.push_str(&format!("  {selector}) {}\n", choice.name));
        }
        listing
    }

    pub fn request(&self) -> String {
        let (first, last) = self.enumeration.bounds();
        format!(
            "Enter number ({first}-{last}) [default: {} for {}]",
            self.enumeration.default_selector(),
            self.enumeration.default_choice().name
        )
    }

    pub fn rejection(&self) -> String {
        let (first, last) = self.enumeration.bounds();
        format!("Invalid selection. Please choose a number from {first} to {last}.")
    }

    /// Looks up an answer given ahead of time instead of asking for it.
    pub fn preset(&self, selector: &str) -> Result<&Choice> {
        self.enumeration
            .get(selector.trim())
            .ok_or_else(|| Error::InvalidPreset {
                key: self.key.clone(),
                selector: selector.to_string(),
            })
    }
}

pub trait Prompter {
    /// Presents `question` and reads one line of operator input.
    fn read_line(&mut self, question: &Question) -> Result<String>;

    /// Shows why the previous answer was not accepted.
    fn reject(&mut self, message: &str);
}

/// Asks `question` until the operator gives a selector the enumeration knows.
///
/// Empty input selects the default. Unknown input is rejected and asked
/// again without limit; only a failing input source ends the loop early.
pub fn resolve<'q>(prompter: &mut dyn Prompter, question: &'q Question) -> Result<&'q Choice> {
    loop {
        let line = prompter.read_line(question)?;
        let selector = match line.trim() {
            "" => question.enumeration.default_selector(),
            selector => selector,
        };
        if let Some(choice) = question.enumeration.get(selector) {
            return Ok(choice);
        }
        tracing::debug!(key = %question.key, input = %line.trim(), "rejected selection");
        prompter.reject(&question.rejection());
    }
}

/// Line-oriented prompter over any reader/writer pair, used when input is
/// piped rather than typed on a terminal.
pub struct LinePrompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LinePrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> Prompter for LinePrompter<R, W> {
    fn read_line(&mut self, question: &Question) -> Result<String> {
        write!(self.output, "{}{}: ", question.listing(), question.request())?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(Error::InputClosed);
        }
        Ok(line)
    }

    fn reject(&mut self, message: &str) {
        let _ = writeln!(self.output, "{message}");
    }
}
