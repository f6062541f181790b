use clap::Args;
use eyre::Result;
use yobatis_project::SettingsFile;

use super::{ProjectArgs, UnwrapOrExit, exit_with};
use crate::{
    ops,
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct CheckCommand {
    #[command(flatten)]
    pub project: ProjectArgs,
}

impl CheckCommand {
    /// Run the check command
    pub fn run(&self) -> Result<()> {
        let settings_file = SettingsFile::discover(&self.project.project, None).unwrap_or_exit();

        let mut report =
            ops::check(&self.project.project, settings_file.settings().clone()).unwrap_or_exit();
        report.render(&mut TerminalOutput::new());

        if let Some(problem) = report.problem.take() {
            exit_with(problem);
        }
        if !report.is_valid() {
            std::process::exit(1);
        }

        Ok(())
    }
}
