use clap::Args;
use eyre::Result;

use super::{ProjectArgs, UnwrapOrExit};
use crate::{
    ops,
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct InfoCommand {
    #[command(flatten)]
    pub project: ProjectArgs,
}

impl InfoCommand {
    pub fn run(&self) -> Result<()> {
        let report = ops::info(&self.project.project).unwrap_or_exit();
        report.render(&mut TerminalOutput::new());

        Ok(())
    }
}
