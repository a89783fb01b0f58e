//! # Salvage Policy
//!
//! Partial material refunds for breaking an item down at a salvage bench.
//! The refund ratio is a coarse per-bench-tier table:
//!
//! | Bench tier | Ratio |
//! |------------|-------|
//! | 3          | 0.80  |
//! | 2          | 0.60  |
//! | otherwise  | 0.40  |

use crate::material::MaterialCost;
use crate::rarity::RarityTier;
use crate::resolver::ProfileResolver;

/// Stateless salvage formulas.
#[derive(Clone, Copy, Debug, Default)]
pub struct SalvagePolicy;

impl SalvagePolicy {
    /// Bench tier used by the plain salvage action.
    pub const DEFAULT_BENCH_TIER: i32 = 1;

    /// Fraction of each material refunded at `bench_tier`.
    #[must_use]
    pub const fn return_ratio(bench_tier: i32) -> f64 {
        match bench_tier {
            3 => 0.80,
            2 => 0.60,
            _ => 0.40,
        }
    }

    /// Refunds `max(1, floor(quantity * ratio))` of every source material,
    /// preserving order.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn estimate_salvage_returns(source: &[MaterialCost], bench_tier: i32) -> Vec<MaterialCost> {
        let ratio = Self::return_ratio(bench_tier);
        source
            .iter()
            .map(|cost| {
                let refunded = (f64::from(cost.quantity()) * ratio).floor() as u32;
                MaterialCost::new(cost.item_id(), refunded.max(1))
            })
            .collect()
    }

    /// Refund for salvaging a whole item: the full-repair cost of its profile
    /// at `rarity`, scaled by the bench ratio.
    ///
    /// A blank item id refunds nothing.
    #[must_use]
    pub fn estimate_for_item(
        resolver: &ProfileResolver,
        item_id: &str,
        rarity: Option<RarityTier>,
        bench_tier: i32,
    ) -> Vec<MaterialCost> {
        if item_id.trim().is_empty() {
            return Vec::new();
        }
        let profile = resolver.resolve_id(item_id);
        let full_costs = profile.build_costs(1.0, rarity);
        Self::estimate_salvage_returns(&full_costs, bench_tier)
    }
}
