mod check;
mod completions;
mod generate;
mod info;
mod init;

use std::path::PathBuf;

use check::CheckCommand;
use clap::{Args, Parser, Subcommand};
use completions::CompletionsCommand;
use eyre::Result;
use generate::GenerateCommand;
use info::InfoCommand;
use init::InitCommand;

use crate::logging;

/// Print a library error with its diagnostic decorations and exit.
pub(crate) fn exit_with(error: Box<yobatis_project::Error>) -> ! {
    eprintln!("{:?}", miette::Report::new(*error));
    std::process::exit(1);
}

/// Extension trait for exiting on library errors with pretty formatting
pub(crate) trait UnwrapOrExit<T> {
    fn unwrap_or_exit(self) -> T;
}

impl<T> UnwrapOrExit<T> for yobatis_project::Result<T> {
    fn unwrap_or_exit(self) -> T {
        match self {
            Ok(v) => v,
            Err(e) => exit_with(e),
        }
    }
}

/// The project a command works on.
#[derive(Args)]
pub(crate) struct ProjectArgs {
    /// Root of the maven project (defaults to the current directory)
    #[arg(short, long, default_value = ".")]
    pub project: PathBuf,
}

#[derive(Parser)]
#[command(name = "yobatis")]
#[command(version)]
#[command(about = "Generate MyBatis generator configuration for maven projects")]
pub(crate) struct Cli {
    /// Log pipeline activity to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub fn run(&self) -> Result<()> {
        let _logging = logging::install(self.verbose);

        match &self.command {
            Commands::Generate(cmd) => cmd.run(),
            Commands::Check(cmd) => cmd.run(),
            Commands::Info(cmd) => cmd.run(),
            Commands::Init(cmd) => cmd.run(),
            Commands::Completions(cmd) => cmd.run(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Write or update mybatisGeneratorConfig.xml
    Generate(GenerateCommand),

    /// Resolve the datasource without writing anything
    Check(CheckCommand),

    /// Show the module tree and candidate model and dao folders
    Info(InfoCommand),

    /// Create a yobatis.toml template
    Init(InitCommand),

    /// Generate shell completions
    Completions(CompletionsCommand),
}
