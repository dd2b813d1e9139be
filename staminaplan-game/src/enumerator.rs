//! Exhaustive plan enumeration.
//!
//! Every way to split the remaining turns across the catalog's kinds is
//! generated in depth-first order (first kind's count varies slowest), scored
//! for final stamina, and kept when it lands within the tolerance band around
//! the target. Survivors are handed to [`crate::ranking`] for ordering and
//! labels.
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::actions::ActionCatalog;
use crate::config::PlanConfig;
use crate::constants::{MAX_ACTION_KINDS, SCHEDULED_CAP_OFFSET, STAMINA_MAX, STAMINA_MIN, TOLERANCE};
use crate::costs::CostTable;
use crate::numbers::saturate_i64_to_i32;
use crate::ranking::{Candidate, StrategyPlan, rank_candidates};

pub(crate) type Counts = SmallVec<[u8; MAX_ACTION_KINDS]>;

/// Action counts in catalog order; the counts sum to the turn budget.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Assignment(Counts);

impl Assignment {
    #[must_use]
    pub fn from_counts(counts: &[u8]) -> Self {
        Self(counts.iter().copied().collect())
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.0.iter().map(|&c| u32::from(c)).sum()
    }

    #[must_use]
    pub fn count_at(&self, index: usize) -> u8 {
        self.0.get(index).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn count_of(&self, catalog: &ActionCatalog, id: &str) -> u8 {
        catalog.index_of(id).map_or(0, |idx| self.count_at(idx))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.0.iter().copied()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

/// Highest count the scheduled kind may take with `turns` remaining.
#[must_use]
pub fn scheduled_cap(turns: u8) -> u8 {
    turns.saturating_sub(SCHEDULED_CAP_OFFSET)
}

/// Lazy generator over every count tuple summing to `turns`.
///
/// Iteration order matches a depth-first walk that picks the first kind's
/// count first: tuples come out in lexicographic order of their free counts.
/// The capped index never exceeds its cap; when it is also the last index
/// (whose count is forced) over-cap tuples are skipped.
#[derive(Debug, Clone)]
pub struct Compositions {
    counts: Counts,
    turns: u8,
    capped: Option<(usize, u8)>,
    started: bool,
    done: bool,
}

impl Compositions {
    /// # Panics
    ///
    /// Panics if `parts` is zero; a validated catalog always has a kind.
    #[must_use]
    pub fn new(parts: usize, turns: u8, capped: Option<(usize, u8)>) -> Self {
        assert!(parts > 0, "composition requires at least one part");
        let mut counts: Counts = SmallVec::from_elem(0, parts);
        counts[parts - 1] = turns;
        Self {
            counts,
            turns,
            capped,
            started: false,
            done: false,
        }
    }

    /// Compositions for a configuration, capping the table's scheduled kind.
    #[must_use]
    pub fn for_plan(config: &PlanConfig, costs: &CostTable) -> Self {
        let turns = config.remaining_turns();
        Self::new(
            costs.len(),
            turns,
            Some((costs.scheduled_index(), scheduled_cap(turns))),
        )
    }

    fn limit(&self, index: usize) -> u8 {
        match self.capped {
            Some((capped, cap)) if capped == index => cap,
            _ => u8::MAX,
        }
    }

    fn within_cap(&self) -> bool {
        match self.capped {
            Some((capped, cap)) => self.counts.get(capped).is_none_or(|&c| c <= cap),
            None => true,
        }
    }

    /// Step to the next tuple in depth-first order. Returns false when exhausted.
    fn advance(&mut self) -> bool {
        let last = self.counts.len() - 1;
        for idx in (0..last).rev() {
            let prefix: u8 = self.counts[..=idx].iter().sum();
            if prefix < self.turns && self.counts[idx] < self.limit(idx) {
                self.counts[idx] += 1;
                for slot in &mut self.counts[idx + 1..last] {
                    *slot = 0;
                }
                self.counts[last] = self.turns - prefix - 1;
                return true;
            }
        }
        false
    }
}

impl Iterator for Compositions {
    type Item = Assignment;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.done {
                return None;
            }
            if self.started {
                if !self.advance() {
                    self.done = true;
                    return None;
                }
            } else {
                self.started = true;
            }
            if self.within_cap() {
                return Some(Assignment(self.counts.clone()));
            }
        }
    }
}

/// Final stamina after applying every action once per count, clamped to [0, 100].
#[must_use]
pub fn final_stamina(start: i32, assignment: &Assignment, costs: &CostTable) -> i32 {
    let total_change: i64 = assignment
        .iter()
        .zip(costs.deltas())
        .map(|(count, delta)| i64::from(count) * i64::from(delta))
        .sum();
    let raw = i64::from(start) + total_change;
    saturate_i64_to_i32(raw.clamp(i64::from(STAMINA_MIN), i64::from(STAMINA_MAX)))
}

/// Whether `final_stamina` lies inside the accepted band around `target`.
#[must_use]
pub fn within_tolerance(final_stamina: i32, target: i32) -> bool {
    (final_stamina - target).abs() <= TOLERANCE
}

/// Counters describing one enumeration pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EnumerationStats {
    /// Tuples produced by the generator (after the scheduled cap).
    pub generated: usize,
    /// Tuples that survived the tolerance filter.
    pub kept: usize,
}

/// Enumerate, filter, sort and label every plan for `config`.
///
/// `costs` must be resolved for `config.skill_level()`; a stale table is
/// still searched but the mismatch is logged.
#[must_use]
pub fn enumerate(config: &PlanConfig, costs: &CostTable) -> Vec<StrategyPlan> {
    enumerate_with_stats(config, costs).0
}

/// [`enumerate`] plus generator/filter counters.
#[must_use]
pub fn enumerate_with_stats(
    config: &PlanConfig,
    costs: &CostTable,
) -> (Vec<StrategyPlan>, EnumerationStats) {
    debug_assert!(!costs.is_empty(), "cost table must cover at least one kind");
    if !costs.is_current_for(config.skill_level()) {
        log::warn!(
            "cost table resolved for skill {} used with skill {}",
            costs.skill_level(),
            config.skill_level()
        );
    }

    let start = config.start_stamina();
    let target = config.target_stamina();
    let mut stats = EnumerationStats::default();
    let mut candidates = Vec::new();

    for assignment in Compositions::for_plan(config, costs) {
        stats.generated += 1;
        let final_stamina = final_stamina(start, &assignment, costs);
        if within_tolerance(final_stamina, target) {
            candidates.push(Candidate {
                counts: assignment,
                final_stamina,
            });
        }
    }
    stats.kept = candidates.len();

    log::debug!(
        "enumerated {} assignments over {} turns, kept {} within ±{TOLERANCE} of {target}",
        stats.generated,
        config.remaining_turns(),
        stats.kept
    );

    (rank_candidates(candidates, target), stats)
}

#[cfg(feature = "async")]
mod async_support {
    use super::{CostTable, PlanConfig, StrategyPlan, enumerate};
    use crate::PlanError;

    /// Run [`enumerate`] on the blocking pool so the caller's task stays responsive.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::Join`] if the blocking task panics or is cancelled.
    pub async fn enumerate_async(
        config: PlanConfig,
        costs: CostTable,
    ) -> Result<Vec<StrategyPlan>, PlanError> {
        tokio::task::spawn_blocking(move || enumerate(&config, &costs))
            .await
            .map_err(|err| PlanError::Join(err.to_string()))
    }
}

#[cfg(feature = "async")]
pub use async_support::enumerate_async;
