//! StaminaPlan Engine
//!
//! Platform-agnostic planning logic for a turn-limited stamina budget.
//! Given a catalog of repeatable actions and a configuration, the engine
//! enumerates every split of the remaining turns, keeps the splits whose final
//! stamina lands near the target, and ranks them. This crate has no UI or
//! platform-specific dependencies.

pub mod actions;
pub mod config;
pub mod constants;
pub mod costs;
pub mod enumerator;
pub mod numbers;
pub mod ranking;
pub mod session;
pub mod summary;

use thiserror::Error;

// Re-export commonly used types
pub use actions::{ActionCatalog, ActionKind, ActionRole, ActionStyle, CatalogError};
pub use config::{ConfigError, PlanConfig, PlanSettings};
pub use costs::{CostTable, ResolvedCost, effective_delta, format_delta, resolve};
#[cfg(feature = "async")]
pub use enumerator::enumerate_async;
pub use enumerator::{
    Assignment, Compositions, EnumerationStats, enumerate, enumerate_with_stats, final_stamina,
    scheduled_cap, within_tolerance,
};
pub use ranking::{PlanTag, StrategyPlan, is_recommended};
pub use session::PlannerSession;
pub use summary::{PlanSummary, summarize};

/// Errors surfaced by the engine's fallible entry points.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("plan search task failed: {0}")]
    Join(String),
}

/// Trait for abstracting catalog and configuration loading.
/// Platform-specific implementations should provide this.
pub trait DataLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the action catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be read or fails validation.
    fn load_catalog(&self) -> Result<ActionCatalog, Self::Error>;

    /// Load the starting configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be read or parsed.
    fn load_config(&self) -> Result<PlanConfig, Self::Error>;
}

/// Loader backed by the bundled catalog and the reference startup configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticLoader;

impl DataLoader for StaticLoader {
    type Error = PlanError;

    fn load_catalog(&self) -> Result<ActionCatalog, Self::Error> {
        Ok(ActionCatalog::load_from_static())
    }

    fn load_config(&self) -> Result<PlanConfig, Self::Error> {
        Ok(PlanConfig::default())
    }
}

/// Entry point binding a data loader to planner sessions.
pub struct PlannerEngine<L>
where
    L: DataLoader,
{
    data_loader: L,
}

impl<L> PlannerEngine<L>
where
    L: DataLoader,
{
    /// Create a new engine with the provided data loader
    pub const fn new(data_loader: L) -> Self {
        Self { data_loader }
    }

    /// Create a session from the loader's catalog and configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog or configuration cannot be loaded.
    pub fn create_session(&self) -> Result<PlannerSession, L::Error> {
        let catalog = self.data_loader.load_catalog()?;
        let config = self.data_loader.load_config()?;
        Ok(PlannerSession::with_config(catalog, config))
    }

    /// One-shot search: load, resolve, enumerate.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog or configuration cannot be loaded.
    pub fn plan(&self) -> Result<Vec<StrategyPlan>, L::Error> {
        let mut session = self.create_session()?;
        session.recalculate();
        Ok(session.plans().to_vec())
    }
}
