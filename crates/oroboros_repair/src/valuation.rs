//! # High Alchemy Valuation
//!
//! Coin value of an item destroyed at the disenchant sink.
//!
//! ```text
//! tier_scalar     = max(1.0, source.tier_scalar_for(item_id))
//! tier_multiplier = 0.75 + 0.25 * sqrt(tier_scalar)
//! coins           = max(1, round(rarity_base * tier_multiplier))
//! ```
//!
//! The square root keeps high-tier commons below low-tier legendaries.

use crate::rarity::RarityTier;

/// Lowest scalar a keyword table can report.
const MIN_TIER_SCALAR: f64 = 0.25;

/// External lookup for an item's crafting-tier scalar.
pub trait TierScalarSource: Send + Sync {
    /// Scalar for `item_id`; 1.0 means base tier.
    fn tier_scalar_for(&self, item_id: &str) -> f64;
}

/// Every item is base tier.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnitTierScalars;

impl TierScalarSource for UnitTierScalars {
    fn tier_scalar_for(&self, _item_id: &str) -> f64 {
        1.0
    }
}

/// Keyword table: the highest scalar whose keyword the id contains.
#[derive(Clone, Debug, Default)]
pub struct KeywordTierScalars {
    entries: Vec<(String, f64)>,
}

impl KeywordTierScalars {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a keyword. Blank keywords and non-finite or non-positive scalars
    /// are ignored.
    pub fn insert(&mut self, keyword: &str, scalar: f64) {
        let keyword = keyword.trim();
        if keyword.is_empty() || !scalar.is_finite() || scalar <= 0.0 {
            return;
        }
        self.entries.push((keyword.to_lowercase(), scalar));
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, keyword: &str, scalar: f64) -> Self {
        self.insert(keyword, scalar);
        self
    }

    /// Number of usable keywords.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no keyword is usable.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: AsRef<str>> FromIterator<(K, f64)> for KeywordTierScalars {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (keyword, scalar) in iter {
            table.insert(keyword.as_ref(), scalar);
        }
        table
    }
}

impl TierScalarSource for KeywordTierScalars {
    fn tier_scalar_for(&self, item_id: &str) -> f64 {
        if item_id.trim().is_empty() {
            return 1.0;
        }
        let normalized = item_id.to_lowercase();
        let best = self
            .entries
            .iter()
            .filter(|(keyword, _)| normalized.contains(keyword.as_str()))
            .fold(1.0_f64, |best, &(_, scalar)| best.max(scalar));
        best.max(MIN_TIER_SCALAR)
    }
}

/// Stateless coin-sink formulas.
#[derive(Clone, Copy, Debug, Default)]
pub struct ValuationPolicy;

impl ValuationPolicy {
    /// Item id of the coins paid out.
    pub const COIN_ITEM_ID: &'static str = "copper_coins";

    /// Base coin value per tier before the crafting-tier multiplier.
    #[must_use]
    pub const fn rarity_base(rarity: RarityTier) -> f64 {
        match rarity {
            RarityTier::Common => 20.0,
            RarityTier::Uncommon => 35.0,
            RarityTier::Rare => 60.0,
            RarityTier::Epic | RarityTier::Vocational => 95.0,
            RarityTier::Legendary => 145.0,
            RarityTier::Mythic => 220.0,
        }
    }

    /// Coins paid for liquidating `item_id`. An absent rarity counts as
    /// `Common`. Always at least one.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn estimate_coin_return(
        item_id: &str,
        rarity: Option<RarityTier>,
        scalars: &dyn TierScalarSource,
    ) -> u32 {
        let raw_scalar = scalars.tier_scalar_for(item_id);
        let tier_scalar = if raw_scalar.is_finite() { raw_scalar.max(1.0) } else { 1.0 };
        let tier_multiplier = 0.75 + 0.25 * tier_scalar.sqrt();

        let coins = (Self::rarity_base(rarity.unwrap_or_default()) * tier_multiplier).round();
        (coins as u32).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mythic_at_base_tier() {
        assert_eq!(
            ValuationPolicy::estimate_coin_return("Weapon_Sword_Mythic", Some(RarityTier::Mythic), &UnitTierScalars),
            220
        );
    }

    #[test]
    fn test_rarity_table_at_base_tier() {
        let expected = [20, 35, 60, 95, 95, 145, 220];
        for (tier, coins) in RarityTier::ALL.into_iter().zip(expected) {
            assert_eq!(
                ValuationPolicy::estimate_coin_return("item", Some(tier), &UnitTierScalars),
                coins,
                "tier {tier}"
            );
        }
        assert_eq!(ValuationPolicy::estimate_coin_return("item", None, &UnitTierScalars), 20);
    }

    #[test]
    fn test_tier_scalar_is_sub_linear() {
        let scalars = KeywordTierScalars::new().with("adamantite", 4.0);

        // 0.75 + 0.25 * 2 = 1.25
        assert_eq!(
            ValuationPolicy::estimate_coin_return("Weapon_Sword_Adamantite", Some(RarityTier::Common), &scalars),
            25
        );
        // 220 * 1.25 = 275
        assert_eq!(
            ValuationPolicy::estimate_coin_return("Weapon_Sword_Adamantite_Mythic", Some(RarityTier::Mythic), &scalars),
            275
        );

        let high_common = ValuationPolicy::estimate_coin_return(
            "Weapon_Sword_Adamantite",
            Some(RarityTier::Common),
            &KeywordTierScalars::new().with("adamantite", 9.0),
        );
        let low_legendary =
            ValuationPolicy::estimate_coin_return("Weapon_Sword_Crude", Some(RarityTier::Legendary), &scalars);
        assert!(high_common < low_legendary);
    }

    #[test]
    fn test_scalars_below_one_do_not_reduce_value() {
        let scalars = KeywordTierScalars::new().with("crude", 0.5);
        assert!((scalars.tier_scalar_for("Weapon_Sword_Crude") - 1.0).abs() < f64::EPSILON);
        assert_eq!(
            ValuationPolicy::estimate_coin_return("Weapon_Sword_Crude", Some(RarityTier::Rare), &scalars),
            60
        );
    }

    #[test]
    fn test_keyword_table_takes_highest_match() {
        let scalars: KeywordTierScalars = [("iron", 1.5), ("Sword", 2.0), ("", 9.0), ("bogus", f64::NAN), ("neg", -1.0)]
            .into_iter()
            .collect();

        assert_eq!(scalars.len(), 2);
        assert!((scalars.tier_scalar_for("Weapon_Sword_Iron") - 2.0).abs() < f64::EPSILON);
        assert!((scalars.tier_scalar_for("Armor_Iron") - 1.5).abs() < f64::EPSILON);
        assert!((scalars.tier_scalar_for("Armor_Copper") - 1.0).abs() < f64::EPSILON);
        assert!((scalars.tier_scalar_for("   ") - 1.0).abs() < f64::EPSILON);
    }
}
