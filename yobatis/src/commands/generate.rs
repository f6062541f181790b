use std::path::PathBuf;

use clap::Args;
use eyre::Result;
use yobatis_project::SettingsFile;

use super::{ProjectArgs, UnwrapOrExit};
use crate::{
    ops::{self, GenerateOptions},
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct GenerateCommand {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Path to yobatis.toml (defaults to <project>/yobatis.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print the merged document instead of writing it
    #[arg(long)]
    pub dry_run: bool,

    /// Write the rendered and merged documents of each run to this directory
    #[arg(long, value_name = "DIR")]
    pub snapshots: Option<PathBuf>,
}

impl GenerateCommand {
    pub fn run(&self) -> Result<()> {
        let settings_file =
            SettingsFile::discover(&self.project.project, self.config.as_deref()).unwrap_or_exit();

        let report = ops::generate(GenerateOptions {
            project_dir: &self.project.project,
            settings: settings_file.settings().clone(),
            dry_run: self.dry_run,
            snapshot_dir: self.snapshots.as_deref(),
        })
        .unwrap_or_exit();
        report.render(&mut TerminalOutput::new());

        Ok(())
    }
}
