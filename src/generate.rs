use std::path::PathBuf;

use anyhow::{bail, Context as _, Result};
use clap::Args;

use lamgen::lamby::Lamby;
use lamgen::plan::{Orchestrator, Recipe as _};
use lamgen::report::Console;

use crate::prompt;
use crate::App;

#[derive(Clone, Args)]
pub(crate) struct Generate {
    #[arg(help = "Rails project to prepare for AWS Lambda.", default_value = ".")]
    dst: PathBuf,
    #[arg(
        short = 'd',
        long = "database",
        value_name = "SELECTOR",
        help = "Database choice (1: MySQL, 2: PostgreSQL, 3: SQLite3); skips the prompt."
    )]
    database: Option<String>,
    #[arg(
        long = "app-name",
        value_name = "NAME",
        help = "Application name for AWS resources. Defaults to the project directory name."
    )]
    app_name: Option<String>,
    #[arg(
        short = 'c',
        long = "config",
        value_name = "PATH",
        help = "Configuration file. Defaults to ~/.lamgen.config.toml."
    )]
    pub(crate) config: Option<PathBuf>,
    #[arg(long = "dry-run", help = "List the planned changes without applying them.")]
    dry_run: bool,
}

impl App {
    pub(crate) fn generate(&self) -> Result<()> {
        let args = &self.cli.generate;

        let root = args.dst.canonicalize().context(format!(
            "failed to resolve project directory: {}",
            args.dst.display()
        ))?;
        if !root.is_dir() {
            bail!("not a directory: {}", root.display());
        }

        let mut presets = self.config.answers.clone();
        if let Some(database) = &args.database {
            presets.insert(String::from("database"), database.clone());
        }

        let mut recipe = Lamby::new().app_name(args.app_name.clone());
        if let Some(ruby_version) = &self.config.ruby_version {
            recipe = recipe.ruby_version(ruby_version.clone());
        }

        let mut console = Console::stdout();
        let mut prompter = prompt::prompter();
        let mut orchestrator = Orchestrator::new(&root, &mut console).presets(presets);
        let (resolved, plan) = orchestrator
            .prepare(&recipe, prompter.as_mut())
            .context("failed to resolve configuration")?;

        if args.dry_run {
            println!();
            for (verb, subject) in plan.describe() {
                println!("{verb:>12}  {subject}");
            }
            return Ok(());
        }

        let summary = orchestrator.apply(&plan, &resolved);
        recipe.farewell(&mut console);
        println!();
        println!("{summary}");

        if !summary.is_success() {
            bail!("{} operation(s) failed", summary.failed);
        }
        Ok(())
    }
}
