//! Builder for creating and configuring Orchestrator instances.

use std::path::{Path, PathBuf};

use super::Orchestrator;
use crate::{
    error::{CompassError, Result},
    registry::Registry,
    store::SessionStore,
};

/// Builder for creating and configuring Orchestrator instances.
#[derive(Debug, Clone)]
pub struct OrchestratorBuilder {
    data_dir: Option<PathBuf>,
    definitions_dir: Option<PathBuf>,
}

impl OrchestratorBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            data_dir: None,
            definitions_dir: None,
        }
    }

    /// Sets a custom directory for session records.
    ///
    /// If not specified, uses XDG Base Directory specification:
    /// `$XDG_DATA_HOME/compass/sessions` or `~/.local/share/compass/sessions`
    pub fn with_data_dir<P: AsRef<Path>>(mut self, dir: Option<P>) -> Self {
        if let Some(dir) = dir {
            self.data_dir = Some(dir.as_ref().to_path_buf());
        }
        self
    }

    /// Sets a custom directory for workflow and checklist definitions.
    ///
    /// If not specified, uses XDG Base Directory specification:
    /// `$XDG_CONFIG_HOME/compass/definitions` or `~/.config/compass/definitions`
    pub fn with_definitions_dir<P: AsRef<Path>>(mut self, dir: Option<P>) -> Self {
        if let Some(dir) = dir {
            self.definitions_dir = Some(dir.as_ref().to_path_buf());
        }
        self
    }

    /// Builds the configured orchestrator instance.
    ///
    /// # Errors
    ///
    /// Returns `CompassError::Persistence` if the session directory cannot
    /// be created, or `CompassError::XdgDirectory` if a default location
    /// cannot be resolved.
    pub async fn build(self) -> Result<Orchestrator> {
        let data_dir = match self.data_dir {
            Some(dir) => dir,
            None => Self::default_data_dir()?,
        };
        let definitions_dir = match self.definitions_dir {
            Some(dir) => dir,
            None => Self::default_definitions_dir()?,
        };

        let store = SessionStore::new(data_dir)?;
        let registry = Registry::new(definitions_dir);
        Ok(Orchestrator::new(registry, store))
    }

    /// Returns the default session directory following XDG Base Directory
    /// specification.
    fn default_data_dir() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("compass")
            .create_data_directory("sessions")
            .map_err(|e| CompassError::XdgDirectory(e.to_string()))
    }

    /// Returns the default definitions directory following XDG Base
    /// Directory specification.
    fn default_definitions_dir() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("compass")
            .create_config_directory("definitions")
            .map_err(|e| CompassError::XdgDirectory(e.to_string()))
    }
}

impl Default for OrchestratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
