//! # Durability Policy
//!
//! Rarity-adjusted maximum durability and the absolute ceiling for future
//! max-durability item effects.
//!
//! The per-ordinal step used here is independent of
//! [`RarityTier::max_durability_bonus`], which is kept for the upgrade system.

use crate::rarity::RarityTier;

/// Stateless durability formulas.
#[derive(Clone, Copy, Debug, Default)]
pub struct DurabilityPolicy;

impl DurabilityPolicy {
    /// Bonus added to the base maximum per tier step above `Common`.
    pub const RARITY_STEP_MAX_DURABILITY_BONUS: f64 = 0.10;

    /// Hard ceiling as a multiple of the un-buffed base maximum.
    pub const HARD_MAX_DURABILITY_MULTIPLIER: f64 = 2.00;

    /// `base_max * (1 + ordinal * 0.10)`, or zero for a non-positive base.
    ///
    /// An absent rarity counts as `Common`.
    #[must_use]
    pub fn rarity_adjusted_base_max(base_max: f64, rarity: Option<RarityTier>) -> f64 {
        if base_max.is_nan() || base_max <= 0.0 {
            return 0.0;
        }
        let tier = rarity.unwrap_or_default();
        let bonus = f64::from(tier.ordinal()) * Self::RARITY_STEP_MAX_DURABILITY_BONUS;
        base_max * (1.0 + bonus)
    }

    /// `max(0, base_max) * 2.0`.
    #[must_use]
    pub fn hard_cap(base_max: f64) -> f64 {
        base_max.max(0.0) * Self::HARD_MAX_DURABILITY_MULTIPLIER
    }
}
