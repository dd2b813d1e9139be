//! Ordering and labelling of surviving plans.
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

use crate::constants::{PLAN_LABEL_PREFIX, RECOMMEND_WINDOW};
use crate::enumerator::Assignment;

/// Category of a plan relative to the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanTag {
    /// Final stamina equals the target exactly.
    PerfectMatch,
    /// Final stamina lands above the target.
    MeetsTarget,
    /// Final stamina falls short of the target.
    NearTarget,
}

impl PlanTag {
    pub const ALL: &'static [Self] = &[Self::PerfectMatch, Self::MeetsTarget, Self::NearTarget];

    #[must_use]
    pub const fn for_deviation(deviation: i32) -> Self {
        if deviation == 0 {
            Self::PerfectMatch
        } else if deviation > 0 {
            Self::MeetsTarget
        } else {
            Self::NearTarget
        }
    }

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::PerfectMatch => "perfect_match",
            Self::MeetsTarget => "meets_target",
            Self::NearTarget => "near_target",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::PerfectMatch => "Perfect Match",
            Self::MeetsTarget => "Meets Target",
            Self::NearTarget => "Near Target",
        }
    }

    /// Opaque style token for display layers.
    #[must_use]
    pub const fn style(self) -> &'static str {
        match self {
            Self::PerfectMatch => "bg-green-100 text-green-700",
            Self::MeetsTarget => "bg-blue-100 text-blue-700",
            Self::NearTarget => "bg-orange-100 text-orange-700",
        }
    }
}

impl std::fmt::Display for PlanTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A filtered assignment awaiting rank and labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Candidate {
    pub counts: Assignment,
    pub final_stamina: i32,
}

/// One ranked, labelled plan. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyPlan {
    /// 1-based position after sorting.
    pub rank: usize,
    pub label: String,
    pub tag: PlanTag,
    pub recommended: bool,
    pub counts: Assignment,
    pub final_stamina: i32,
    /// `final_stamina - target`.
    pub deviation: i32,
}

impl StrategyPlan {
    #[must_use]
    pub const fn is_perfect(&self) -> bool {
        self.deviation == 0
    }

    /// Final stamina is at or above the target.
    #[must_use]
    pub const fn is_achieved(&self) -> bool {
        self.deviation >= 0
    }

    #[must_use]
    pub const fn abs_error(&self) -> i32 {
        self.deviation.abs()
    }

    /// Signed deviation: `+3`, `-4`, `0`.
    #[must_use]
    pub fn deviation_label(&self) -> String {
        crate::costs::format_delta(self.deviation)
    }
}

/// Whether a plan with this deviation should be flagged for the player.
#[must_use]
pub const fn is_recommended(deviation: i32) -> bool {
    deviation.abs() <= RECOMMEND_WINDOW
}

/// Sort by absolute error, then by higher final stamina, and attach labels.
///
/// The sort is stable, so candidates with identical keys keep the order the
/// enumerator produced them in.
pub(crate) fn rank_candidates(mut candidates: Vec<Candidate>, target: i32) -> Vec<StrategyPlan> {
    candidates.sort_by_key(|c| ((c.final_stamina - target).abs(), Reverse(c.final_stamina)));
    candidates
        .into_iter()
        .enumerate()
        .map(|(idx, candidate)| {
            let rank = idx + 1;
            let deviation = candidate.final_stamina - target;
            StrategyPlan {
                rank,
                label: format!("{PLAN_LABEL_PREFIX} {rank}"),
                tag: PlanTag::for_deviation(deviation),
                recommended: is_recommended(deviation),
                counts: candidate.counts,
                final_stamina: candidate.final_stamina,
                deviation,
            }
        })
        .collect()
}
