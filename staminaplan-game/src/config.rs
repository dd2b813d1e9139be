//! Planner configuration with per-field clamping.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    DEFAULT_REMAINING_TURNS, DEFAULT_SKILL_LEVEL, DEFAULT_START_STAMINA, DEFAULT_TARGET_STAMINA,
    STAMINA_MAX, STAMINA_MIN, TURNS_MAX, TURNS_MIN,
};
use crate::numbers::{saturate_i64_to_i32, saturate_i64_to_u32, saturate_i64_to_u8};

/// Errors raised while reading a configuration document.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Raw, unvalidated settings as supplied by a caller or a JSON document.
///
/// Every field is optional; missing fields take the reference defaults and
/// out-of-range values are clamped when converted into [`PlanConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSettings {
    #[serde(default = "PlanSettings::default_start")]
    pub start_stamina: i64,
    #[serde(default = "PlanSettings::default_target")]
    pub target_stamina: i64,
    #[serde(default = "PlanSettings::default_turns")]
    pub remaining_turns: i64,
    #[serde(default = "PlanSettings::default_skill")]
    pub skill_level: i64,
}

impl PlanSettings {
    const fn default_start() -> i64 {
        DEFAULT_START_STAMINA as i64
    }

    const fn default_target() -> i64 {
        DEFAULT_TARGET_STAMINA as i64
    }

    const fn default_turns() -> i64 {
        DEFAULT_REMAINING_TURNS as i64
    }

    const fn default_skill() -> i64 {
        DEFAULT_SKILL_LEVEL as i64
    }
}

impl Default for PlanSettings {
    fn default() -> Self {
        Self {
            start_stamina: Self::default_start(),
            target_stamina: Self::default_target(),
            remaining_turns: Self::default_turns(),
            skill_level: Self::default_skill(),
        }
    }
}

/// Validated configuration: stamina values in [0, 100], turns in [1, 14],
/// skill level non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "PlanSettings")]
pub struct PlanConfig {
    start_stamina: i32,
    target_stamina: i32,
    remaining_turns: u8,
    skill_level: u32,
}

impl PlanConfig {
    /// Build a configuration, clamping each field independently.
    #[must_use]
    pub fn new(start_stamina: i64, target_stamina: i64, remaining_turns: i64, skill_level: i64) -> Self {
        Self {
            start_stamina: clamp_stamina(start_stamina),
            target_stamina: clamp_stamina(target_stamina),
            remaining_turns: clamp_turns(remaining_turns),
            skill_level: saturate_i64_to_u32(skill_level),
        }
    }

    /// Parse a configuration document; absent fields fall back to defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or holds non-integer values.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    #[must_use]
    pub const fn start_stamina(&self) -> i32 {
        self.start_stamina
    }

    #[must_use]
    pub const fn target_stamina(&self) -> i32 {
        self.target_stamina
    }

    #[must_use]
    pub const fn remaining_turns(&self) -> u8 {
        self.remaining_turns
    }

    #[must_use]
    pub const fn skill_level(&self) -> u32 {
        self.skill_level
    }

    #[must_use]
    pub fn with_start_stamina(mut self, value: i64) -> Self {
        self.start_stamina = clamp_stamina(value);
        self
    }

    #[must_use]
    pub fn with_target_stamina(mut self, value: i64) -> Self {
        self.target_stamina = clamp_stamina(value);
        self
    }

    #[must_use]
    pub fn with_remaining_turns(mut self, value: i64) -> Self {
        self.remaining_turns = clamp_turns(value);
        self
    }

    #[must_use]
    pub fn with_skill_level(mut self, value: i64) -> Self {
        self.skill_level = saturate_i64_to_u32(value);
        self
    }

    /// Back to the raw shape, e.g. for re-serialising or editing.
    #[must_use]
    pub fn settings(&self) -> PlanSettings {
        PlanSettings {
            start_stamina: i64::from(self.start_stamina),
            target_stamina: i64::from(self.target_stamina),
            remaining_turns: i64::from(self.remaining_turns),
            skill_level: i64::from(self.skill_level),
        }
    }
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self::from(PlanSettings::default())
    }
}

impl From<PlanSettings> for PlanConfig {
    fn from(settings: PlanSettings) -> Self {
        Self::new(
            settings.start_stamina,
            settings.target_stamina,
            settings.remaining_turns,
            settings.skill_level,
        )
    }
}

fn clamp_stamina(value: i64) -> i32 {
    saturate_i64_to_i32(value.clamp(i64::from(STAMINA_MIN), i64::from(STAMINA_MAX)))
}

fn clamp_turns(value: i64) -> u8 {
    saturate_i64_to_u8(value.clamp(i64::from(TURNS_MIN), i64::from(TURNS_MAX)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_reference_startup() {
        let cfg = PlanConfig::default();
        assert_eq!(cfg.start_stamina(), 100);
        assert_eq!(cfg.target_stamina(), 1);
        assert_eq!(cfg.remaining_turns(), 14);
        assert_eq!(cfg.skill_level(), 0);
    }

    #[test]
    fn new_clamps_each_field_independently() {
        let cfg = PlanConfig::new(250, -4, 99, -3);
        assert_eq!(cfg.start_stamina(), 100);
        assert_eq!(cfg.target_stamina(), 0);
        assert_eq!(cfg.remaining_turns(), 14);
        assert_eq!(cfg.skill_level(), 0);

        let cfg = PlanConfig::new(-1, 101, 0, 7);
        assert_eq!(cfg.start_stamina(), 0);
        assert_eq!(cfg.target_stamina(), 100);
        assert_eq!(cfg.remaining_turns(), 1);
        assert_eq!(cfg.skill_level(), 7);
    }

    #[test]
    fn skill_level_has_no_upper_bound_beyond_u32() {
        let cfg = PlanConfig::default().with_skill_level(1_000);
        assert_eq!(cfg.skill_level(), 1_000);
    }

    #[test]
    fn builders_reclamp() {
        let cfg = PlanConfig::default()
            .with_start_stamina(120)
            .with_target_stamina(55)
            .with_remaining_turns(-2);
        assert_eq!(cfg.start_stamina(), 100);
        assert_eq!(cfg.target_stamina(), 55);
        assert_eq!(cfg.remaining_turns(), 1);
    }

    #[test]
    fn json_is_lenient_and_clamped() {
        let cfg = PlanConfig::from_json(r#"{ "target_stamina": 140, "remaining_turns": 3 }"#)
            .unwrap();
        assert_eq!(cfg.start_stamina(), 100);
        assert_eq!(cfg.target_stamina(), 100);
        assert_eq!(cfg.remaining_turns(), 3);

        assert!(PlanConfig::from_json(r#"{ "skill_level": "high" }"#).is_err());
    }

    #[test]
    fn serialized_shape_reads_back() {
        let cfg = PlanConfig::new(80, 20, 10, 4);
        let json = serde_json::to_string(&cfg).unwrap();
        assert!(json.contains("\"remaining_turns\":10"));
        assert_eq!(PlanConfig::from_json(&json).unwrap(), cfg);
        assert_eq!(PlanConfig::from(cfg.settings()), cfg);
    }
}
