//! Fixed animation timing, in milliseconds.
//!
//! One beam runs on this schedule relative to its emission at `t = 0`:
//!
//! ```text
//! 0      source lit, pulse created, pulse starts travelling
//! 1200   pulse arrives, target lit
//! 1500   source released; pulse fully faded
//! 1600   pulse removed from the collection
//! 2000   target released; a chain re-emits from the target
//! ```

/// Pulse travel time from source to target.
pub const TRAVEL_MS: u64 = 1_200;

/// Pulse fade time. Longer than travel so the trail outlives the arrival.
pub const FADE_MS: u64 = 1_500;

/// Grace period after the fade before the pulse is dropped.
pub const PULSE_LINGER_MS: u64 = 100;

/// Total time a pulse stays in the collection.
pub const PULSE_LIFETIME_MS: u64 = FADE_MS + PULSE_LINGER_MS;

/// Target lights once the pulse arrives.
pub const TARGET_LIGHT_MS: u64 = TRAVEL_MS;

/// Source releases shortly after the target lights.
pub const SOURCE_CLEAR_MS: u64 = TRAVEL_MS + 300;

/// Target releases (and a chain hands off) after this.
pub const TARGET_CLEAR_MS: u64 = TRAVEL_MS + 800;

/// Start offset between consecutive chains on the same stage.
pub const CHAIN_STAGGER_MS: u64 = 800;

/// Breathing toggle period on the single-node stage.
pub const BREATH_PERIOD_MS: u64 = 2_000;

/// Minimum spacing between two hover bursts from the same node.
pub const HOVER_COOLDOWN_MS: u64 = 1_200;

const _: () = assert!(TARGET_LIGHT_MS < SOURCE_CLEAR_MS && SOURCE_CLEAR_MS < TARGET_CLEAR_MS);
const _: () = assert!(FADE_MS > TRAVEL_MS);
