//! Cost resolver: effective per-action stamina deltas for a skill level.
use serde::{Deserialize, Serialize};

use crate::actions::{ActionCatalog, ActionKind, ActionRole};
use crate::numbers::saturate_i64_to_i32;

/// Effective delta for one kind at the resolved skill level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedCost {
    pub kind_id: String,
    pub delta: i32,
}

/// Per-kind deltas for a single skill level, in catalog order.
///
/// A table is only valid for the skill level it was resolved for; callers
/// holding one across a skill change must resolve a fresh table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostTable {
    skill_level: u32,
    entries: Vec<ResolvedCost>,
    restorative: usize,
    scheduled: usize,
}

/// Effective delta of a single kind.
///
/// Restorative kinds keep their base cost. Every other kind loses one point
/// of cost per skill level, floored at zero.
#[must_use]
pub fn effective_delta(kind: &ActionKind, skill_level: u32) -> i32 {
    if kind.role.is_restorative() {
        return kind.base_cost;
    }
    saturate_i64_to_i32((i64::from(kind.base_cost) + i64::from(skill_level)).min(0))
}

/// Resolve every kind of the catalog for `skill_level`.
#[must_use]
pub fn resolve(catalog: &ActionCatalog, skill_level: u32) -> CostTable {
    let entries = catalog
        .iter()
        .map(|kind| ResolvedCost {
            kind_id: kind.id.clone(),
            delta: effective_delta(kind, skill_level),
        })
        .collect();
    CostTable {
        skill_level,
        entries,
        restorative: catalog.restorative_index(),
        scheduled: catalog.scheduled_index(),
    }
}

impl CostTable {
    #[must_use]
    pub const fn skill_level(&self) -> u32 {
        self.skill_level
    }

    #[must_use]
    pub fn is_current_for(&self, skill_level: u32) -> bool {
        self.skill_level == skill_level
    }

    #[must_use]
    pub fn entries(&self) -> &[ResolvedCost] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn delta(&self, kind_id: &str) -> Option<i32> {
        self.entries
            .iter()
            .find(|e| e.kind_id == kind_id)
            .map(|e| e.delta)
    }

    #[must_use]
    pub fn delta_at(&self, index: usize) -> Option<i32> {
        self.entries.get(index).map(|e| e.delta)
    }

    pub fn deltas(&self) -> impl Iterator<Item = i32> + '_ {
        self.entries.iter().map(|e| e.delta)
    }

    #[must_use]
    pub const fn restorative_index(&self) -> usize {
        self.restorative
    }

    #[must_use]
    pub const fn scheduled_index(&self) -> usize {
        self.scheduled
    }

    /// Role of the entry at `index` as recorded at resolve time.
    #[must_use]
    pub fn role_at(&self, index: usize) -> ActionRole {
        if index == self.restorative {
            ActionRole::Restore
        } else if index == self.scheduled {
            ActionRole::Scheduled
        } else {
            ActionRole::Spend
        }
    }
}

/// Render a delta the way the cost sidebar shows it: `+10`, `-17`, `0`.
#[must_use]
pub fn format_delta(delta: i32) -> String {
    if delta > 0 {
        format!("+{delta}")
    } else {
        delta.to_string()
    }
}
