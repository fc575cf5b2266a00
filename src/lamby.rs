//! Prepares a freshly generated Rails application for AWS Lambda with Lamby
//! and AWS SAM.
//!
//! Order matters inside the plan: every anchored edit targets a file that no
//! write in the same plan touches, so no anchor is moved by an earlier step.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use indexmap::IndexMap;
use regex::Regex;

use crate::anchor::{Anchor, Pattern};
use crate::choice::{Choice, Enumeration, Question};
use crate::edit::EditOperation;
use crate::manifest::{Dependency, Group};
use crate::plan::{Plan, Recipe};
use crate::report::Reporter;
use crate::resolved::Resolved;
use crate::template::Content;
use crate::utils::{Error, Result};
use crate::write::WriteOperation;

pub const DEFAULT_RUBY_VERSION: &str = "3.2";

pub const GITIGNORE: &str = include_str!("lamby/gitignore");

const RULE: &str = "------------------------------------------------------------";

macro_rules! template {
    ($name:literal, $file:literal) => {
        Content::Template {
            name: $name,
            source: include_str!(concat!("lamby/", $file)),
        }
    };
}

macro_rules! fixed {
    ($file:literal) => {
        Content::Static(include_str!(concat!("lamby/", $file)))
    };
}

#[derive(Debug, Clone)]
pub struct Lamby {
    app_name: Option<String>,
    ruby_version: String,
}

impl Default for Lamby {
    fn default() -> Self {
        Self {
            app_name: None,
            ruby_version: DEFAULT_RUBY_VERSION.to_string(),
        }
    }
}

impl Lamby {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the application name otherwise taken from the project directory.
    pub fn app_name(mut self, app_name: Option<String>) -> Self {
        self.app_name = app_name;
        self
    }

    /// Ruby version used when the project has no usable `.ruby-version`.
    pub fn ruby_version(mut self, ruby_version: impl Into<String>) -> Self {
        self.ruby_version = ruby_version.into();
        self
    }

    fn database() -> Result<Question> {
        let enumeration = Enumeration::new(
            [
                ("1", Choice::new("MySQL", "mysql", "mysql2", Some("~> 0.5"))),
                ("2", Choice::new("PostgreSQL", "postgresql", "pg", None)),
                ("3", Choice::new("SQLite3", "sqlite3", "sqlite3", Some("~> 1.4"))),
            ],
            "1",
        )
        .map_err(|source| Error::InvalidEnumeration {
            key: "database".to_string(),
            source,
        })?;
        Ok(Question::new(
            "database",
            "Choose a database option:",
            enumeration,
        ))
    }

    fn name_for(&self, root: &Path) -> String {
        if let Some(name) = &self.app_name {
            return name.clone();
        }
        root.canonicalize()
            .ok()
            .and_then(|path| path.file_name().map(|name| name.to_string_lossy().into_owned()))
            .unwrap_or_else(|| String::from("app"))
    }
}

/// Lowercases `name` and replaces everything outside `[a-z0-9-]` with `-`,
/// giving a name usable for ECR repositories and CloudFormation stacks.
pub fn sanitize(name: &str) -> String {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN.get_or_init(|| Regex::new(r"[^a-z0-9\-]").unwrap());
    pattern.replace_all(&name.to_lowercase(), "-").into_owned()
}

#[derive(Debug, PartialEq, Eq)]
struct RubyVersion {
    /// Content for `.ruby-version`, prefix included.
    file: String,
    /// Bare version for the `ruby:` base image.
    docker: String,
}

fn read_ruby_version(root: &Path, fallback: &str, reporter: &mut dyn Reporter) -> Result<RubyVersion> {
    let path = root.join(".ruby-version");
    let fallback = RubyVersion {
        file: fallback.to_string(),
        docker: fallback.to_string(),
    };
    if !path.is_file() {
        reporter.say(&format!(
            ".ruby-version file not found, will create it with default Ruby {}.",
            fallback.file
        ));
        return Ok(fallback);
    }

    let content = fs::read_to_string(&path)?;
    let content = content.trim();
    if content.is_empty() {
        reporter.say(&format!(
            "Warning: .ruby-version file is empty, will write default Ruby {}.",
            fallback.file
        ));
        return Ok(fallback);
    }

    let docker = content.rsplit('-').next().unwrap_or(content).to_string();
    reporter.say(&format!("Using Ruby version {docker} from .ruby-version for Dockerfile."));
    Ok(RubyVersion {
        file: content.to_string(),
        docker,
    })
}

impl Recipe for Lamby {
    fn questions(&self) -> Result<Vec<Question>> {
        Ok(vec![Self::database()?])
    }

    fn resolve(
        &self,
        root: &Path,
        answers: IndexMap<String, Choice>,
        reporter: &mut dyn Reporter,
    ) -> Result<Resolved> {
        let app_name = self.name_for(root);
        let ruby = read_ruby_version(root, &self.ruby_version, reporter)?;

        let mut derived = IndexMap::new();
        derived.insert("app_slug".to_string(), sanitize(&app_name));
        derived.insert("app_name".to_string(), app_name);
        derived.insert("ruby_version".to_string(), ruby.file);
        derived.insert("docker_ruby_version".to_string(), ruby.docker);
        Ok(Resolved::new(answers, derived))
    }

    fn plan(&self, resolved: &Resolved) -> Result<Plan> {
        let database = resolved
            .answer("database")
            .ok_or_else(|| Error::MissingAnswer("database".to_string()))?;

        let dev_test = [Group::Development, Group::Test];
        let dependencies = vec![
            Dependency::new(&database.dependency).version(database.version.as_deref()),
            Dependency::new("lamby"),
            Dependency::new("importmap-rails"),
            Dependency::new("sprockets-rails"),
            Dependency::new("stimulus-rails"),
            Dependency::new("turbo-rails"),
            Dependency::new("jbuilder"),
            Dependency::new("debug").group(&dev_test),
            Dependency::new("webrick").group(&dev_test),
            Dependency::new("web-console").group(&[Group::Development]),
            Dependency::new("capybara").group(&[Group::Test]),
            Dependency::new("selenium-webdriver").group(&[Group::Test]),
            Dependency::new("webdrivers").group(&[Group::Test]),
            Dependency::new("lograge").group(&[Group::Production]),
        ];

        let edits = vec![
            EditOperation::before(
                "config/environments/production.rb",
                Anchor::Pattern(Pattern::new(r"(?m)^end")?),
                include_str!("lamby/production_comments.rb"),
            )
            .signature("Recommended additions from lamby-cookiecutter"),
            EditOperation::after(
                "app/controllers/application_controller.rb",
                Anchor::Literal("class ApplicationController < ActionController::Base\n".into()),
                "  protect_from_forgery with: :exception\n",
            )
            .signature("protect_from_forgery with: :exception"),
            EditOperation::append("README.md", include_str!("lamby/readme_section.md"))
                .signature("## AWS Lambda Deployment (via Lamby)"),
            EditOperation::after(
                "config/database.yml",
                Anchor::Pattern(Pattern::new("production:")?),
                include_str!("lamby/database_guidance.yml"),
            )
            .signature("Production Database Configuration for AWS Lambda"),
        ];

        let ruby_version = resolved
            .value("ruby_version")
            .unwrap_or(self.ruby_version.as_str());
        let writes = vec![
            WriteOperation::new("config.ru", fixed!("config.ru")).force(),
            WriteOperation::new(".gitattributes", fixed!("gitattributes")).force(),
            WriteOperation::new(".rubocop.yml", fixed!("rubocop.yml")).force(),
            WriteOperation::new(".gitignore", Content::Static(GITIGNORE)).force(),
            WriteOperation::new("Rakefile", fixed!("Rakefile")).force(),
            WriteOperation::new(".circleci/config.yml", fixed!("circleci.yml")).force(),
            WriteOperation::new(
                ".devcontainer/devcontainer.json",
                template!("devcontainer.json", "devcontainer.json.j2"),
            )
            .force(),
            WriteOperation::new(
                ".devcontainer/Dockerfile",
                template!("devcontainer/Dockerfile", "devcontainer.Dockerfile.j2"),
            )
            .force(),
            WriteOperation::new(".devcontainer/docker-compose.yml", fixed!("docker-compose.yml"))
                .force(),
            WriteOperation::new(
                "config/initializers/secret_key_base.rb",
                fixed!("secret_key_base.rb"),
            ),
            WriteOperation::new("template.yaml", template!("template.yaml", "template.yaml.j2")),
            WriteOperation::new("bin/deploy", template!("bin/deploy", "deploy.sh.j2")).executable(),
            WriteOperation::new(".dockerignore", fixed!("dockerignore")),
            WriteOperation::new(".ruby-version", Content::Text(ruby_version.to_string())).force(),
            WriteOperation::new("Dockerfile", template!("Dockerfile", "Dockerfile.j2")),
        ];

        Ok(Plan {
            manifest: PathBuf::from("Gemfile"),
            dependencies,
            edits,
            writes,
        })
    }

    fn welcome(&self, reporter: &mut dyn Reporter) {
        reporter.say("Welcome to the Lamby App Configurator!");
        reporter.say("This configures your Rails application for AWS Lambda deployment with Lamby.");
        reporter.say(RULE);
        reporter.say("Database Configuration:");
        reporter.say("MySQL is the default and the best-trodden path with Lamby.");
    }

    fn farewell(&self, reporter: &mut dyn Reporter) {
        reporter.say(RULE);
        reporter.say("Next Steps:");
        for step in [
            "1. Review the generated files, especially template.yaml, bin/deploy, and Dockerfile.",
            "2. Configure your production database (e.g., RDS, Aurora Serverless).",
            "3. Set up secure handling for SECRET_KEY_BASE and DATABASE_URL (see below).",
            "4. Set required environment variables (e.g., AWS_REGION).",
            "5. Run ./bin/deploy to deploy your application.",
        ] {
            reporter.say(step);
        }
        reporter.say("");
        reporter.say("Important Note on SECRET_KEY_BASE:");
        for note in [
            "- config/initializers/secret_key_base.rb sets a DUMMY secret key and disables Rails encrypted credentials.",
            "- This initializer is NOT secure for production; remove the dummy ENV['SECRET_KEY_BASE'] line before going live.",
            "- The generated Dockerfile uses Crypteia (LD_PRELOAD) which can fetch secrets from SSM Parameter Store.",
            "- Store the REAL SECRET_KEY_BASE in SSM Parameter Store and let the Lambda execution role read it.",
        ] {
            reporter.say(note);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Transcript;

    #[test]
    fn sanitize_builds_resource_names() {
        assert_eq!(sanitize("My_Awesome.Lambda"), "my-awesome-lambda");
        assert_eq!(sanitize("blog-2024"), "blog-2024");
    }

    #[test]
    fn ruby_version_prefix_is_kept_for_the_file_only() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".ruby-version"), "ruby-3.3.1\n").unwrap();
        let version = read_ruby_version(dir.path(), "3.2", &mut Transcript::default()).unwrap();
        assert_eq!(
            version,
            RubyVersion {
                file: "ruby-3.3.1".into(),
                docker: "3.3.1".into()
            }
        );
    }

    #[test]
    fn ruby_version_falls_back_when_missing_or_empty() {
        let dir = tempfile::tempdir().unwrap();
        let mut transcript = Transcript::default();
        let version = read_ruby_version(dir.path(), "3.2", &mut transcript).unwrap();
        assert_eq!(version.docker, "3.2");

        fs::write(dir.path().join(".ruby-version"), "  \n").unwrap();
        let version = read_ruby_version(dir.path(), "3.1", &mut transcript).unwrap();
        assert_eq!(version.file, "3.1");
        assert!(transcript.said[1].starts_with("Warning: .ruby-version file is empty"));
    }

    #[test]
    fn resolve_derives_every_template_key() {
        let dir = tempfile::tempdir().unwrap();
        let lamby = Lamby::new().app_name(Some("Shop Front".into()));
        let mut answers = IndexMap::new();
        answers.insert(
            "database".to_string(),
            Lamby::database().unwrap().preset("1").unwrap().clone(),
        );
        let resolved = lamby
            .resolve(dir.path(), answers, &mut Transcript::default())
            .unwrap();
        assert_eq!(resolved.value("app_name"), Some("Shop Front"));
        assert_eq!(resolved.value("app_slug"), Some("shop-front"));
        assert_eq!(resolved.value("docker_ruby_version"), Some("3.2"));
    }

    #[test]
    fn plan_leads_with_the_selected_database() {
        let mut answers = IndexMap::new();
        answers.insert(
            "database".to_string(),
            Lamby::database().unwrap().preset("3").unwrap().clone(),
        );
        let resolved = Resolved::new(answers, IndexMap::new());
        let plan = Lamby::new().plan(&resolved).unwrap();
        assert_eq!(plan.dependencies[0].name, "sqlite3");
        assert_eq!(plan.dependencies[0].version.as_deref(), Some("~> 1.4"));
        let deploy = plan
            .writes
            .iter()
            .find(|write| write.target == Path::new("bin/deploy"))
            .unwrap();
        assert!(deploy.executable);
    }
}
