//! Read-only aggregates over a plan list for summary displays.
use serde::{Deserialize, Serialize};

use crate::ranking::StrategyPlan;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlanSummary {
    pub total: usize,
    /// Plans whose final stamina equals the target.
    pub perfect_matches: usize,
    pub recommended: usize,
    /// Smallest absolute error, `None` for an empty list.
    pub best_deviation: Option<i32>,
}

impl PlanSummary {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.total == 0
    }
}

#[must_use]
pub fn summarize(plans: &[StrategyPlan]) -> PlanSummary {
    PlanSummary {
        total: plans.len(),
        perfect_matches: plans.iter().filter(|p| p.is_perfect()).count(),
        recommended: plans.iter().filter(|p| p.recommended).count(),
        best_deviation: plans.iter().map(StrategyPlan::abs_error).min(),
    }
}
