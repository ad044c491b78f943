//! Project config loading from `aws-install.yaml`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::domain::config::{DEFAULT_CONFIG_FILE, ProjectConfig};

/// Reads the project file from an explicit path or the working directory.
pub struct YamlConfigStore {
    path: PathBuf,
    explicit: bool,
}

impl YamlConfigStore {
    /// Use `explicit` when given (from `--config` or `AWS_INSTALL_CONFIG`),
    /// otherwise `aws-install.yaml` in the working directory.
    #[must_use]
    pub fn locate(explicit: Option<PathBuf>) -> Self {
        match explicit {
            Some(path) => Self {
                path,
                explicit: true,
            },
            None => Self {
                path: PathBuf::from(DEFAULT_CONFIG_FILE),
                explicit: false,
            },
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the file. A missing default file yields an empty config; a
    /// missing explicit file is an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(&self) -> Result<ProjectConfig> {
        if !self.explicit && !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "no project file, using defaults");
            return Ok(ProjectConfig::default());
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("cannot read {}", self.path.display()))?;
        serde_yaml::from_str(&content)
            .with_context(|| format!("cannot parse {}", self.path.display()))
    }
}
