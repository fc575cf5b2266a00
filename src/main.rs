mod config;
mod generate;
mod prompt;

use anyhow::Result;
use clap::{ArgAction, Parser};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::generate::Generate;

#[derive(Parser)]
#[command(version)]
#[command(verbatim_doc_comment)]
#[command(disable_help_flag = true)]
#[command(disable_version_flag = true)]
#[command(about = "Prepare a Rails application for AWS Lambda with Lamby")]
struct Cli {
    #[command(flatten)]
    generate: Generate,

    #[arg(
        short = 'h',
        long = "help",
        help = "Print this help message.",
        action = ArgAction::Help,
    )]
    help: Option<bool>,

    #[arg(
        short = 'V',
        long = "version",
        help = "Print version information.",
        action = ArgAction::Version,
    )]
    version: Option<bool>,
}

pub(crate) struct App {
    cli: Cli,
    config: Config,
}

impl App {
    fn init() -> Result<Self> {
        let cli = Cli::parse();
        let config = Config::init(cli.generate.config.as_deref())?;
        Ok(Self { cli, config })
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("LAMGEN_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    App::init()?.generate()
}
