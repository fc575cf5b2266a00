use std::fmt::Display;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::choice::{self, Choice, Prompter, Question};
use crate::edit::{self, EditOperation};
use crate::manifest::{self, Dependency};
use crate::report::{Outcome, Reporter, Status, Summary};
use crate::resolved::Resolved;
use crate::template::Renderer;
use crate::utils::{self, Result};
use crate::write::{self, WriteOperation};

/// Everything a run will do, in the order it will do it.
#[derive(Debug, Clone)]
pub struct Plan {
    /// Manifest path relative to the project root.
    pub manifest: PathBuf,
    pub dependencies: Vec<Dependency>,
    pub edits: Vec<EditOperation>,
    pub writes: Vec<WriteOperation>,
}

impl Plan {
    /// One `status  subject` pair per operation, without touching the disk.
    pub fn describe(&self) -> Vec<(&'static str, String)> {
        let manifest = utils::path_to_string(&self.manifest);
        let dependencies = self
            .dependencies
            .iter()
            .map(|dependency| ("gemfile", format!("{dependency} -> {manifest}")));
        let edits = self.edits.iter().map(|edit| {
            let verb = if edit.force { "insert!" } else { "insert" };
            (verb, format!("{} @ {}", utils::path_to_string(&edit.target), edit.anchor))
        });
        let writes = self.writes.iter().map(|write| {
            let verb = if write.force { "write!" } else { "write" };
            let mut subject = utils::path_to_string(&write.target);
            if write.executable {
                subject.push_str(" (+x)");
            }
            (verb, subject)
        });
        dependencies.chain(edits).chain(writes).collect()
    }
}

/// The content side of a run: what to ask, what to derive, what to change.
pub trait Recipe {
    fn questions(&self) -> Result<Vec<Question>>;

    /// Derives the full configuration from the answers and the project on disk.
    fn resolve(
        &self,
        root: &Path,
        answers: IndexMap<String, Choice>,
        reporter: &mut dyn Reporter,
    ) -> Result<Resolved>;

    fn plan(&self, resolved: &Resolved) -> Result<Plan>;

    fn welcome(&self, _reporter: &mut dyn Reporter) {}

    fn farewell(&self, _reporter: &mut dyn Reporter) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Start,
    PromptingChoices,
    ApplyingDependencies,
    ApplyingEdits,
    MaterializingFiles,
    Done,
}

pub struct Orchestrator<'r> {
    root: PathBuf,
    reporter: &'r mut dyn Reporter,
    renderer: Renderer,
    presets: IndexMap<String, String>,
    phase: Phase,
    summary: Summary,
}

impl<'r> Orchestrator<'r> {
    pub fn new(root: impl Into<PathBuf>, reporter: &'r mut dyn Reporter) -> Self {
        Self {
            root: root.into(),
            reporter,
            renderer: Renderer::new(),
            presets: IndexMap::new(),
            phase: Phase::Start,
            summary: Summary::default(),
        }
    }

    /// Answers to use instead of prompting, keyed by question.
    pub fn presets(mut self, presets: IndexMap<String, String>) -> Self {
        self.presets = presets;
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    fn enter(&mut self, phase: Phase) {
        tracing::debug!(from = ?self.phase, to = ?phase, "phase transition");
        self.phase = phase;
    }

    /// Asks every question and builds the plan. Nothing on disk changes here,
    /// so an error leaves the project untouched.
    pub fn prepare(
        &mut self,
        recipe: &dyn Recipe,
        prompter: &mut dyn Prompter,
    ) -> Result<(Resolved, Plan)> {
        self.enter(Phase::PromptingChoices);
        recipe.welcome(self.reporter);

        let mut answers = IndexMap::new();
        for question in recipe.questions()? {
            let choice = match self.presets.get(&question.key) {
                Some(selector) => question.preset(selector)?,
                None => choice::resolve(prompter, &question)?,
            };
            self.reporter.say(&format!("You selected: {}", choice.name));
            answers.insert(question.key.clone(), choice.clone());
        }

        let resolved = recipe.resolve(&self.root, answers, self.reporter)?;
        let plan = recipe.plan(&resolved)?;
        Ok((resolved, plan))
    }

    /// Runs every operation of `plan`. Failures are narrated and counted but
    /// never stop the operations after them.
    pub fn apply(&mut self, plan: &Plan, resolved: &Resolved) -> Summary {
        self.summary = Summary::default();
        self.enter(Phase::ApplyingDependencies);
        let manifest = self.root.join(&plan.manifest);
        match manifest::declare(&manifest, &plan.dependencies) {
            Ok(()) => {
                for dependency in &plan.dependencies {
                    self.record(Status::Gemfile, &dependency.to_string());
                }
            }
            Err(err) => self.fail(&plan.manifest, err),
        }

        self.enter(Phase::ApplyingEdits);
        for op in &plan.edits {
            let result = edit::insert(&self.root, op);
            self.settle(&op.target, result);
        }

        self.enter(Phase::MaterializingFiles);
        for op in &plan.writes {
            let result = write::materialize(&self.root, op, &self.renderer, resolved);
            self.settle(&op.target, result);
        }

        self.enter(Phase::Done);
        self.summary.clone()
    }

    /// Prepares and applies in one go, bracketed by the recipe's narration.
    pub fn run(&mut self, recipe: &dyn Recipe, prompter: &mut dyn Prompter) -> Result<Summary> {
        let (resolved, plan) = self.prepare(recipe, prompter)?;
        let summary = self.apply(&plan, &resolved);
        recipe.farewell(self.reporter);
        Ok(summary)
    }

    fn settle(&mut self, target: &Path, result: Result<Outcome>) {
        let subject = utils::path_to_string(target);
        match result {
            Ok(Outcome::Missing) => {
                self.record(Status::Warn, &format!("{subject} not found, skipped"))
            }
            Ok(outcome) => self.record(outcome.status(), &subject),
            Err(err) => self.fail(target, err),
        }
    }

    fn fail(&mut self, target: &Path, err: impl Display) {
        tracing::debug!(path = %target.display(), error = %err, "operation failed");
        let subject = format!("{}: {err}", utils::path_to_string(target));
        self.record(Status::Error, &subject);
    }

    fn record(&mut self, status: Status, subject: &str) {
        self.summary.count(status);
        self.reporter.status(status, subject);
    }
}
