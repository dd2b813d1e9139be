//! Action kinds and the validated catalog the planner searches over.
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::constants::MAX_ACTION_KINDS;

const DEFAULT_ACTIONS_DATA: &str = include_str!("../assets/actions.json");

/// How a kind participates in the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionRole {
    /// Consumes stamina; skill level erodes the cost toward zero.
    Spend,
    /// Consumes stamina like `Spend`, and its count is capped by remaining turns.
    Scheduled,
    /// Restores stamina; unaffected by skill level.
    Restore,
}

impl ActionRole {
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Spend => "spend",
            Self::Scheduled => "scheduled",
            Self::Restore => "restore",
        }
    }

    #[must_use]
    pub const fn is_restorative(self) -> bool {
        matches!(self, Self::Restore)
    }
}

/// Presentation hints; never interpreted by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ActionStyle {
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub icon_color: String,
}

/// A repeatable daily action with a base stamina cost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionKind {
    pub id: String,
    pub name: String,
    /// Negative consumes stamina, positive restores it.
    pub base_cost: i32,
    #[serde(default = "default_role")]
    pub role: ActionRole,
    #[serde(default)]
    pub style: ActionStyle,
}

const fn default_role() -> ActionRole {
    ActionRole::Spend
}

impl ActionKind {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, base_cost: i32, role: ActionRole) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            base_cost,
            role,
            style: ActionStyle::default(),
        }
    }

    #[must_use]
    pub fn with_style(mut self, style: ActionStyle) -> Self {
        self.style = style;
        self
    }
}

/// Errors raised when a catalog violates its structural invariants.
#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    #[error("action catalog is empty")]
    Empty,
    #[error("action catalog holds {count} kinds (max {max})")]
    TooManyKinds { count: usize, max: usize },
    #[error("duplicate action id '{0}'")]
    DuplicateId(String),
    #[error("expected exactly one restorative kind, found {0}")]
    RestorativeCount(usize),
    #[error("expected exactly one scheduled kind, found {0}")]
    ScheduledCount(usize),
    #[error("{id} is restorative but has negative base cost {base_cost}")]
    RestoreCostNegative { id: String, base_cost: i32 },
    #[error("{id} spends stamina but has positive base cost {base_cost}")]
    SpendCostPositive { id: String, base_cost: i32 },
    #[error("invalid catalog json: {0}")]
    Json(String),
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    kinds: Vec<ActionKind>,
}

/// Ordered, validated list of action kinds.
///
/// The order is the enumeration order: counts are assigned to the first kind
/// first and the last kind absorbs whatever turns remain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionCatalog {
    kinds: Vec<ActionKind>,
    #[serde(skip)]
    restorative: usize,
    #[serde(skip)]
    scheduled: usize,
}

impl ActionCatalog {
    /// Validate and wrap a list of kinds.
    ///
    /// # Errors
    ///
    /// Returns an error if the list is empty, too large, has duplicate ids,
    /// does not hold exactly one restorative and one scheduled kind, or a
    /// cost sign contradicts its role.
    pub fn new(kinds: Vec<ActionKind>) -> Result<Self, CatalogError> {
        if kinds.is_empty() {
            return Err(CatalogError::Empty);
        }
        if kinds.len() > MAX_ACTION_KINDS {
            return Err(CatalogError::TooManyKinds {
                count: kinds.len(),
                max: MAX_ACTION_KINDS,
            });
        }

        let mut seen = HashSet::with_capacity(kinds.len());
        for kind in &kinds {
            if !seen.insert(kind.id.as_str()) {
                return Err(CatalogError::DuplicateId(kind.id.clone()));
            }
            match kind.role {
                ActionRole::Restore if kind.base_cost < 0 => {
                    return Err(CatalogError::RestoreCostNegative {
                        id: kind.id.clone(),
                        base_cost: kind.base_cost,
                    });
                }
                ActionRole::Spend | ActionRole::Scheduled if kind.base_cost > 0 => {
                    return Err(CatalogError::SpendCostPositive {
                        id: kind.id.clone(),
                        base_cost: kind.base_cost,
                    });
                }
                _ => {}
            }
        }

        let restorative = single_index(&kinds, ActionRole::Restore)
            .map_err(CatalogError::RestorativeCount)?;
        let scheduled =
            single_index(&kinds, ActionRole::Scheduled).map_err(CatalogError::ScheduledCount)?;

        Ok(Self {
            kinds,
            restorative,
            scheduled,
        })
    }

    /// Load a catalog from JSON of the form `{ "kinds": [...] }`.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed or the catalog is invalid.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile =
            serde_json::from_str(json).map_err(|err| CatalogError::Json(err.to_string()))?;
        Self::new(file.kinds)
    }

    /// The bundled five-kind reference catalog.
    #[must_use]
    pub fn load_from_static() -> Self {
        Self::from_json(DEFAULT_ACTIONS_DATA).unwrap_or_else(|err| {
            log::error!("bundled action catalog rejected: {err}");
            Self::fallback()
        })
    }

    fn fallback() -> Self {
        let kinds = vec![
            ActionKind::new("school", "Class", -10, ActionRole::Scheduled),
            ActionKind::new("research", "Research", -17, ActionRole::Spend),
            ActionKind::new("fitness", "Fitness", -25, ActionRole::Spend),
            ActionKind::new("work", "Part-time Job", -30, ActionRole::Spend),
            ActionKind::new("rest", "Rest", 10, ActionRole::Restore),
        ];
        Self {
            kinds,
            restorative: 4,
            scheduled: 0,
        }
    }

    #[must_use]
    pub fn kinds(&self) -> &[ActionKind] {
        &self.kinds
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// Always false for a validated catalog.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&ActionKind> {
        self.kinds.iter().find(|k| k.id == id)
    }

    #[must_use]
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.kinds.iter().position(|k| k.id == id)
    }

    #[must_use]
    pub const fn restorative_index(&self) -> usize {
        self.restorative
    }

    #[must_use]
    pub const fn scheduled_index(&self) -> usize {
        self.scheduled
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ActionKind> {
        self.kinds.iter()
    }
}

impl Default for ActionCatalog {
    fn default() -> Self {
        Self::load_from_static()
    }
}

impl<'a> IntoIterator for &'a ActionCatalog {
    type Item = &'a ActionKind;
    type IntoIter = std::slice::Iter<'a, ActionKind>;

    fn into_iter(self) -> Self::IntoIter {
        self.kinds.iter()
    }
}

fn single_index(kinds: &[ActionKind], role: ActionRole) -> Result<usize, usize> {
    let matches: Vec<usize> = kinds
        .iter()
        .enumerate()
        .filter(|(_, k)| k.role == role)
        .map(|(idx, _)| idx)
        .collect();
    match matches.as_slice() {
        [only] => Ok(*only),
        other => Err(other.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(id: &str, cost: i32, role: ActionRole) -> ActionKind {
        ActionKind::new(id, id.to_uppercase(), cost, role)
    }

    #[test]
    fn static_catalog_matches_reference_order() {
        let catalog = ActionCatalog::load_from_static();
        let ids: Vec<&str> = catalog.iter().map(|k| k.id.as_str()).collect();
        assert_eq!(ids, ["school", "research", "fitness", "work", "rest"]);
        let costs: Vec<i32> = catalog.iter().map(|k| k.base_cost).collect();
        assert_eq!(costs, [-10, -17, -25, -30, 10]);
        assert_eq!(catalog.scheduled_index(), 0);
        assert_eq!(catalog.restorative_index(), 4);
        assert_eq!(catalog.get("fitness").unwrap().style.icon, "fitness_center");
    }

    #[test]
    fn fallback_agrees_with_bundled_asset() {
        let bundled = ActionCatalog::load_from_static();
        let fallback = ActionCatalog::fallback();
        assert_eq!(bundled.len(), fallback.len());
        for (a, b) in bundled.iter().zip(fallback.iter()) {
            assert_eq!(a.id, b.id);
            assert_eq!(a.base_cost, b.base_cost);
            assert_eq!(a.role, b.role);
        }
    }

    #[test]
    fn rejects_structural_violations() {
        assert_eq!(ActionCatalog::new(vec![]), Err(CatalogError::Empty));

        let no_rest = vec![kind("a", -1, ActionRole::Scheduled)];
        assert_eq!(
            ActionCatalog::new(no_rest),
            Err(CatalogError::RestorativeCount(0))
        );

        let two_scheduled = vec![
            kind("a", -1, ActionRole::Scheduled),
            kind("b", -2, ActionRole::Scheduled),
            kind("r", 5, ActionRole::Restore),
        ];
        assert_eq!(
            ActionCatalog::new(two_scheduled),
            Err(CatalogError::ScheduledCount(2))
        );

        let duplicate = vec![
            kind("a", -1, ActionRole::Scheduled),
            kind("a", 5, ActionRole::Restore),
        ];
        assert_eq!(
            ActionCatalog::new(duplicate),
            Err(CatalogError::DuplicateId("a".to_string()))
        );
    }

    #[test]
    fn rejects_cost_sign_mismatch() {
        let bad_rest = vec![
            kind("a", -1, ActionRole::Scheduled),
            kind("r", -5, ActionRole::Restore),
        ];
        assert!(matches!(
            ActionCatalog::new(bad_rest),
            Err(CatalogError::RestoreCostNegative { .. })
        ));

        let bad_spend = vec![
            kind("a", 3, ActionRole::Scheduled),
            kind("r", 5, ActionRole::Restore),
        ];
        assert!(matches!(
            ActionCatalog::new(bad_spend),
            Err(CatalogError::SpendCostPositive { .. })
        ));
    }

    #[test]
    fn rejects_oversized_catalog() {
        let mut kinds: Vec<ActionKind> = (0..MAX_ACTION_KINDS)
            .map(|i| kind(&format!("s{i}"), -1, ActionRole::Spend))
            .collect();
        kinds.push(kind("r", 5, ActionRole::Restore));
        assert!(matches!(
            ActionCatalog::new(kinds),
            Err(CatalogError::TooManyKinds { .. })
        ));
    }

    #[test]
    fn from_json_defaults_role_and_style() {
        let json = r#"{
            "kinds": [
                { "id": "lecture", "name": "Lecture", "base_cost": -8, "role": "scheduled" },
                { "id": "gym", "name": "Gym", "base_cost": -20 },
                { "id": "nap", "name": "Nap", "base_cost": 5, "role": "restore" }
            ]
        }"#;
        let catalog = ActionCatalog::from_json(json).unwrap();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.get("gym").unwrap().role, ActionRole::Spend);
        assert_eq!(catalog.index_of("nap"), Some(2));
        assert!(catalog.get("gym").unwrap().style.icon.is_empty());
    }

    #[test]
    fn from_json_reports_parse_errors() {
        assert!(matches!(
            ActionCatalog::from_json("{ not json"),
            Err(CatalogError::Json(_))
        ));
    }
}
