//! # Rarity Tiers
//!
//! Ordered rarity scale used by repair, durability and valuation balancing.
//!
//! Ordinal position is what gates features (gem slots, durability steps).
//! `Epic` and `Vocational` carry identical multipliers but distinct ordinals,
//! so a `Vocational` item always ranks one step above an `Epic` one.

use serde::{Deserialize, Serialize};

/// Rarity tier of an equippable item.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[repr(u8)]
pub enum RarityTier {
    /// Common items.
    #[default]
    Common = 0,
    /// Uncommon items.
    Uncommon = 1,
    /// Rare items - first tier that pays the gem slot.
    Rare = 2,
    /// Epic items.
    Epic = 3,
    /// Vocational items - epic costs, one ordinal higher.
    Vocational = 4,
    /// Legendary items.
    Legendary = 5,
    /// Mythic items.
    Mythic = 6,
}

/// Keyword scan order. First hit wins, so "legendary" beats "rare" and
/// "uncommon" is checked before its "common" substring.
const CLASSIFIER_KEYWORDS: [(&str, RarityTier); 7] = [
    ("mythic", RarityTier::Mythic),
    ("legendary", RarityTier::Legendary),
    ("epic", RarityTier::Epic),
    ("vocational", RarityTier::Vocational),
    ("rare", RarityTier::Rare),
    ("uncommon", RarityTier::Uncommon),
    ("common", RarityTier::Common),
];

impl RarityTier {
    /// Every tier in declaration (ordinal) order.
    pub const ALL: [Self; 7] = [
        Self::Common,
        Self::Uncommon,
        Self::Rare,
        Self::Epic,
        Self::Vocational,
        Self::Legendary,
        Self::Mythic,
    ];

    /// Multiplier applied to every repair material quantity.
    #[inline]
    #[must_use]
    pub const fn repair_cost_multiplier(self) -> f64 {
        match self {
            Self::Common => 1.00,
            Self::Uncommon => 1.15,
            Self::Rare => 1.30,
            Self::Epic | Self::Vocational => 1.50,
            Self::Legendary => 1.75,
            Self::Mythic => 2.00,
        }
    }

    /// Per-tier max-durability bonus.
    ///
    /// Reserved for the durability upgrade items; the rarity-adjusted maximum
    /// in [`DurabilityPolicy`](crate::durability::DurabilityPolicy) uses a flat
    /// per-ordinal step instead.
    #[inline]
    #[must_use]
    pub const fn max_durability_bonus(self) -> f64 {
        match self {
            Self::Common => 0.00,
            Self::Uncommon => 0.10,
            Self::Rare => 0.20,
            Self::Epic | Self::Vocational => 0.30,
            Self::Legendary => 0.40,
            Self::Mythic => 0.50,
        }
    }

    /// Position in the declared ordering, `Common` = 0.
    #[inline]
    #[must_use]
    pub const fn ordinal(self) -> u8 {
        self as u8
    }

    /// Upper-case label used in operator and player messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Common => "COMMON",
            Self::Uncommon => "UNCOMMON",
            Self::Rare => "RARE",
            Self::Epic => "EPIC",
            Self::Vocational => "VOCATIONAL",
            Self::Legendary => "LEGENDARY",
            Self::Mythic => "MYTHIC",
        }
    }

    /// Classifies an item by scanning its identifier for rarity keywords.
    ///
    /// Case-insensitive. Unmatched, empty or absent ids are `Common`.
    #[must_use]
    pub fn classify(item_id: Option<&str>) -> Self {
        let Some(item_id) = item_id else {
            return Self::Common;
        };

        let normalized = item_id.to_lowercase();
        CLASSIFIER_KEYWORDS
            .iter()
            .find(|(keyword, _)| normalized.contains(keyword))
            .map_or(Self::Common, |&(_, tier)| tier)
    }

    /// Shorthand for [`classify`](Self::classify) on a present id.
    #[inline]
    #[must_use]
    pub fn from_item_id(item_id: &str) -> Self {
        Self::classify(Some(item_id))
    }
}

impl std::fmt::Display for RarityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
