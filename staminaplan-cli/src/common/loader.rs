//! Filesystem-backed [`DataLoader`] with command-line overrides.
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use staminaplan_game::{ActionCatalog, CatalogError, ConfigError, DataLoader, PlanConfig};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Per-field values that replace whatever the configuration file holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlanOverrides {
    pub start_stamina: Option<i64>,
    pub target_stamina: Option<i64>,
    pub remaining_turns: Option<i64>,
    pub skill_level: Option<i64>,
}

impl PlanOverrides {
    #[must_use]
    pub fn apply(&self, mut config: PlanConfig) -> PlanConfig {
        if let Some(v) = self.start_stamina {
            config = config.with_start_stamina(v);
        }
        if let Some(v) = self.target_stamina {
            config = config.with_target_stamina(v);
        }
        if let Some(v) = self.remaining_turns {
            config = config.with_remaining_turns(v);
        }
        if let Some(v) = self.skill_level {
            config = config.with_skill_level(v);
        }
        config
    }
}

#[derive(Debug, Clone, Default)]
pub struct FileLoader {
    actions: Option<PathBuf>,
    config: Option<PathBuf>,
    overrides: PlanOverrides,
}

impl FileLoader {
    pub const fn new(
        actions: Option<PathBuf>,
        config: Option<PathBuf>,
        overrides: PlanOverrides,
    ) -> Self {
        Self {
            actions,
            config,
            overrides,
        }
    }
}

fn read(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

impl DataLoader for FileLoader {
    type Error = LoadError;

    fn load_catalog(&self) -> Result<ActionCatalog, Self::Error> {
        match &self.actions {
            Some(path) => {
                log::info!("loading action catalog from {}", path.display());
                Ok(ActionCatalog::from_json(&read(path)?)?)
            }
            None => Ok(ActionCatalog::load_from_static()),
        }
    }

    fn load_config(&self) -> Result<PlanConfig, Self::Error> {
        let base = match &self.config {
            Some(path) => {
                log::info!("loading configuration from {}", path.display());
                PlanConfig::from_json(&read(path)?)?
            }
            None => PlanConfig::default(),
        };
        Ok(self.overrides.apply(base))
    }
}
