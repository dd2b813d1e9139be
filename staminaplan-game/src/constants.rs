//! Search bounds and tuning values for the StaminaPlan engine.
//!
//! The action catalog is data; these limits are not, and changing them
//! changes which plans exist.

// Stamina bounds -----------------------------------------------------------
pub const STAMINA_MIN: i32 = 0;
pub const STAMINA_MAX: i32 = 100;

// Turn budget --------------------------------------------------------------
pub const TURNS_MIN: u8 = 1;
pub const TURNS_MAX: u8 = 14;

// Search tuning ------------------------------------------------------------
/// Widest accepted gap between final stamina and the target.
pub const TOLERANCE: i32 = 10;
/// Plans whose gap is within this window are flagged as recommended.
pub const RECOMMEND_WINDOW: i32 = 2;
/// The scheduled kind may be used at most `turns - SCHEDULED_CAP_OFFSET` times.
pub const SCHEDULED_CAP_OFFSET: u8 = 9;
/// Upper bound on catalog size; keeps per-assignment counts inline.
pub const MAX_ACTION_KINDS: usize = 8;

// Reference startup configuration -----------------------------------------
pub(crate) const DEFAULT_START_STAMINA: i32 = 100;
pub(crate) const DEFAULT_TARGET_STAMINA: i32 = 1;
pub(crate) const DEFAULT_REMAINING_TURNS: u8 = 14;
pub(crate) const DEFAULT_SKILL_LEVEL: u32 = 0;

// Labels -------------------------------------------------------------------
pub(crate) const PLAN_LABEL_PREFIX: &str = "Plan";
