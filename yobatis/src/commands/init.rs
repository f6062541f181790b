use std::fs;

use clap::Args;
use dialoguer::{Confirm, theme::ColorfulTheme};
use eyre::{Context, Result};
use yobatis_project::{SETTINGS_FILE, TEMPLATE};

use super::ProjectArgs;

#[derive(Args)]
pub struct InitCommand {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Overwrite an existing yobatis.toml without asking
    #[arg(short, long)]
    pub force: bool,
}

impl InitCommand {
    pub fn run(&self) -> Result<()> {
        let path = self.project.project.join(SETTINGS_FILE);

        if path.exists() && !self.force && !Self::confirm_overwrite()? {
            println!("Left {} untouched", path.display());
            return Ok(());
        }

        fs::write(&path, TEMPLATE)
            .wrap_err_with(|| format!("Failed to write {}", path.display()))?;

        println!("Created {}", path.display());
        println!();
        println!("Next steps:");
        println!("  list your tables under [[tables]]");
        println!("  yobatis generate");

        Ok(())
    }

    fn confirm_overwrite() -> Result<bool> {
        Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("{} already exists. Overwrite it?", SETTINGS_FILE))
            .default(false)
            .interact()
            .wrap_err("Failed to get confirmation")
    }
}
