//! `yobatis.toml`: optional per-project settings.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Settings file name at the project root.
pub const SETTINGS_FILE: &str = "yobatis.toml";

/// Default name of the written generator configuration.
pub const DEFAULT_OUTPUT_FILE: &str = "mybatisGeneratorConfig.xml";

/// Starting content written by `yobatis init`.
pub const TEMPLATE: &str = r#"[project]
# Local maven repository holding the JDBC connector jar.
# Defaults to ~/.m2/repository.
# maven_repository = "/home/me/.m2/repository"

[output]
# Generator configuration, relative to the project root.
file = "mybatisGeneratorConfig.xml"

# Tables to generate for. Each is assigned to the model package whose name
# shares most words with the table name.
# [[tables]]
# name = "sys_admin"
# primary_keys = ["id"]
# auto_increment = "id"
"#;

/// Root schema of `yobatis.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default)]
    pub project: ProjectSettings,

    #[serde(default)]
    pub output: OutputSettings,

    #[serde(default)]
    pub tables: Vec<TableSpec>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectSettings {
    pub maven_repository: Option<PathBuf>,
}

impl ProjectSettings {
    /// The configured repository, else `~/.m2/repository`.
    pub fn maven_repository(&self) -> PathBuf {
        self.maven_repository.clone().unwrap_or_else(|| {
            std::env::var_os("HOME")
                .map(PathBuf::from)
                .unwrap_or_default()
                .join(".m2")
                .join("repository")
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OutputSettings {
    #[serde(default = "default_output_file")]
    pub file: String,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            file: default_output_file(),
        }
    }
}

fn default_output_file() -> String {
    DEFAULT_OUTPUT_FILE.to_string()
}

/// One table as the metadata provider would describe it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TableSpec {
    pub name: String,

    #[serde(default)]
    pub primary_keys: Vec<String>,

    /// Auto-increment column, if any.
    pub auto_increment: Option<String>,
}

impl Settings {
    /// Parse settings text, labelling errors with the file name.
    pub fn from_str_with_filename(content: &str, filename: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::settings(e, content, filename))
    }
}

/// A `yobatis.toml` with both raw content and parsed settings.
pub struct SettingsFile {
    path: PathBuf,
    content: String,
    settings: Settings,
}

impl SettingsFile {
    /// Open and parse a settings file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let content = std::fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
        let filename = path.display().to_string();
        let settings = Settings::from_str_with_filename(&content, &filename)?;

        Ok(Self {
            path,
            content,
            settings,
        })
    }

    /// Settings for a project: an explicit file when given (it must exist),
    /// else `yobatis.toml` at the project root, else defaults.
    pub fn discover(project_dir: &Path, explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::open(path);
        }
        let path = project_dir.join(SETTINGS_FILE);
        if path.is_file() {
            return Self::open(path);
        }
        Ok(Self {
            path,
            content: String::new(),
            settings: Settings::default(),
        })
    }

    /// Get the file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the raw content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Get the parsed settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Update content and re-parse the settings.
    pub fn set_content(&mut self, content: String) -> Result<()> {
        let filename = self.path.display().to_string();
        let settings = Settings::from_str_with_filename(&content, &filename)?;
        self.content = content;
        self.settings = settings;
        Ok(())
    }

    /// Save the current content to disk.
    pub fn save(&self) -> Result<()> {
        std::fs::write(&self.path, &self.content).map_err(|e| Error::io(&self.path, e))?;
        Ok(())
    }
}
