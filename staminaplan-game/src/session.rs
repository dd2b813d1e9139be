use crate::actions::ActionCatalog;
use crate::config::PlanConfig;
use crate::costs::{CostTable, resolve};
use crate::enumerator::enumerate;
use crate::ranking::StrategyPlan;
use crate::summary::{PlanSummary, summarize};

/// Presentation-facing state holder binding a catalog to an editable configuration.
///
/// Edits never trigger a search on their own; callers ask for
/// [`PlannerSession::recalculate`], which replaces the plan list wholesale.
#[derive(Debug, Clone)]
pub struct PlannerSession {
    catalog: ActionCatalog,
    config: PlanConfig,
    costs: CostTable,
    plans: Vec<StrategyPlan>,
    summary: PlanSummary,
    stale: bool,
}

impl PlannerSession {
    /// Construct a session with the reference startup configuration.
    #[must_use]
    pub fn new(catalog: ActionCatalog) -> Self {
        Self::with_config(catalog, PlanConfig::default())
    }

    #[must_use]
    pub fn with_config(catalog: ActionCatalog, config: PlanConfig) -> Self {
        let costs = resolve(&catalog, config.skill_level());
        Self {
            catalog,
            config,
            costs,
            plans: Vec::new(),
            summary: PlanSummary::default(),
            stale: true,
        }
    }

    /// Borrow the catalog.
    #[must_use]
    pub const fn catalog(&self) -> &ActionCatalog {
        &self.catalog
    }

    #[must_use]
    pub const fn config(&self) -> &PlanConfig {
        &self.config
    }

    /// Cost table for the current skill level.
    #[must_use]
    pub const fn costs(&self) -> &CostTable {
        &self.costs
    }

    /// Plans from the last recalculation.
    #[must_use]
    pub fn plans(&self) -> &[StrategyPlan] {
        &self.plans
    }

    #[must_use]
    pub const fn summary(&self) -> PlanSummary {
        self.summary
    }

    /// True when the configuration changed after the last recalculation.
    #[must_use]
    pub const fn is_stale(&self) -> bool {
        self.stale
    }

    pub fn set_start_stamina(&mut self, value: i64) {
        self.replace_config(self.config.with_start_stamina(value));
    }

    pub fn set_target_stamina(&mut self, value: i64) {
        self.replace_config(self.config.with_target_stamina(value));
    }

    pub fn set_remaining_turns(&mut self, value: i64) {
        self.replace_config(self.config.with_remaining_turns(value));
    }

    pub fn set_skill_level(&mut self, value: i64) {
        self.replace_config(self.config.with_skill_level(value));
    }

    pub fn increment_skill(&mut self) {
        let next = i64::from(self.config.skill_level()).saturating_add(1);
        self.set_skill_level(next);
    }

    /// Lower the skill level by one, floored at zero.
    pub fn decrement_skill(&mut self) {
        let next = i64::from(self.config.skill_level()).saturating_sub(1);
        self.set_skill_level(next);
    }

    /// Swap in a whole configuration; the cost table follows any skill change.
    pub fn replace_config(&mut self, config: PlanConfig) {
        if config == self.config {
            return;
        }
        if !self.costs.is_current_for(config.skill_level()) {
            self.costs = resolve(&self.catalog, config.skill_level());
            log::debug!("re-resolved costs for skill level {}", config.skill_level());
        }
        self.config = config;
        self.stale = true;
    }

    /// Run a fresh search for the current configuration.
    pub fn recalculate(&mut self) -> PlanSummary {
        self.install(enumerate(&self.config, &self.costs))
    }

    /// Install a plan list computed elsewhere (e.g. on a worker thread) for
    /// the current configuration.
    pub fn install(&mut self, plans: Vec<StrategyPlan>) -> PlanSummary {
        self.summary = summarize(&plans);
        self.plans = plans;
        self.stale = false;
        log::info!(
            "recalculated: {} plans, {} perfect",
            self.summary.total,
            self.summary.perfect_matches
        );
        self.summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_starts_stale_and_empty() {
        let session = PlannerSession::new(ActionCatalog::load_from_static());
        assert!(session.is_stale());
        assert!(session.plans().is_empty());
        assert_eq!(*session.config(), PlanConfig::default());
    }

    #[test]
    fn edits_do_not_recalculate() {
        let mut session = PlannerSession::new(ActionCatalog::load_from_static());
        let summary = session.recalculate();
        assert!(!session.is_stale());
        assert_eq!(summary.total, session.plans().len());
        let before = session.plans().to_vec();

        session.set_target_stamina(60);
        assert!(session.is_stale());
        assert_eq!(session.plans(), before.as_slice());

        session.recalculate();
        assert!(!session.is_stale());
        assert!(session.plans().iter().all(|p| (p.final_stamina - 60).abs() <= 10));
    }

    #[test]
    fn skill_changes_re_resolve_costs() {
        let mut session = PlannerSession::new(ActionCatalog::load_from_static());
        assert_eq!(session.costs().delta("school"), Some(-10));
        session.increment_skill();
        session.increment_skill();
        assert_eq!(session.config().skill_level(), 2);
        assert!(session.costs().is_current_for(2));
        assert_eq!(session.costs().delta("school"), Some(-8));
        assert_eq!(session.costs().delta("rest"), Some(10));

        session.decrement_skill();
        session.decrement_skill();
        session.decrement_skill();
        assert_eq!(session.config().skill_level(), 0);
        assert_eq!(session.costs().delta("school"), Some(-10));
    }

    #[test]
    fn unchanged_config_keeps_fresh_state() {
        let mut session = PlannerSession::new(ActionCatalog::load_from_static());
        session.recalculate();
        session.set_start_stamina(100);
        assert!(!session.is_stale());
    }

    #[test]
    fn setters_clamp_values() {
        let mut session = PlannerSession::new(ActionCatalog::load_from_static());
        session.set_start_stamina(500);
        session.set_remaining_turns(40);
        assert_eq!(session.config().start_stamina(), 100);
        assert_eq!(session.config().remaining_turns(), 14);
    }
}
