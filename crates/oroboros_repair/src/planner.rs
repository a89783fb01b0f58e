//! # Repair Planner
//!
//! Turns an item snapshot into a full-repair plan.
//!
//! ```text
//! ItemSnapshot ──> RarityTier::classify ──┐
//!              └─> ProfileResolver ───────┼──> RepairProfile::build_costs ──> RepairPlan
//!              └─> missing ratio ─────────┘
//! ```
//!
//! Full, empty or degenerate items (max ≤ 0, non-finite durability) produce a
//! zero-cost, non-repairable plan. Repairing a full item is always a free
//! no-op.

use std::sync::Arc;

use crate::material::{MaterialCost, MaterialLedger};
use crate::rarity::RarityTier;
use crate::resolver::ProfileResolver;

/// Read-only view of a damaged item, supplied by the inventory layer.
#[derive(Clone, Debug, PartialEq)]
pub struct ItemSnapshot {
    /// Item identifier, e.g. `Weapon_Sword_Iron_Rare`.
    pub item_id: String,
    /// Current durability.
    pub current_durability: f64,
    /// Maximum durability.
    pub max_durability: f64,
}

impl ItemSnapshot {
    /// Creates a snapshot.
    #[must_use]
    pub fn new(item_id: impl Into<String>, current_durability: f64, max_durability: f64) -> Self {
        Self {
            item_id: item_id.into(),
            current_durability,
            max_durability,
        }
    }

    /// True for an empty slot (blank identifier).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.item_id.trim().is_empty()
    }

    /// Durability points missing, or `None` when there is nothing to repair.
    fn missing_durability(&self) -> Option<f64> {
        let (current, max) = (self.current_durability, self.max_durability);
        if self.is_empty() || !current.is_finite() || !max.is_finite() {
            return None;
        }
        if max <= 0.0 || current >= max {
            return None;
        }
        Some(max - current)
    }
}

/// Computed plan for restoring one item to full durability.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RepairPlan {
    rarity: RarityTier,
    restore_amount: u32,
    material_costs: Vec<MaterialCost>,
}

impl RepairPlan {
    /// Creates a plan.
    #[must_use]
    pub fn new(rarity: RarityTier, restore_amount: u32, material_costs: Vec<MaterialCost>) -> Self {
        Self {
            rarity,
            restore_amount,
            material_costs,
        }
    }

    /// The zero-cost, non-repairable plan.
    #[must_use]
    pub fn nothing() -> Self {
        Self::new(RarityTier::Common, 0, Vec::new())
    }

    /// Rarity the costs were scaled by.
    #[must_use]
    pub const fn rarity(&self) -> RarityTier {
        self.rarity
    }

    /// Durability points restored by the repair.
    #[must_use]
    pub const fn restore_amount(&self) -> u32 {
        self.restore_amount
    }

    /// Materials consumed, in `[primary, secondary, gem?]` order.
    #[must_use]
    pub fn material_costs(&self) -> &[MaterialCost] {
        &self.material_costs
    }

    /// True if the repair restores something and costs something.
    #[must_use]
    pub fn is_repairable(&self) -> bool {
        self.restore_amount > 0 && !self.material_costs.is_empty()
    }

    /// First material in plan order the ledger cannot cover.
    #[must_use]
    pub fn first_missing_material<L: MaterialLedger + ?Sized>(&self, ledger: &L) -> Option<&MaterialCost> {
        self.material_costs
            .iter()
            .find(|cost| ledger.count_of(cost.item_id()) < cost.quantity())
    }

    /// True if the plan has costs and the ledger covers all of them.
    #[must_use]
    pub fn can_afford<L: MaterialLedger + ?Sized>(&self, ledger: &L) -> bool {
        !self.material_costs.is_empty() && self.first_missing_material(ledger).is_none()
    }

    /// Compact cost line for bench UIs, e.g. `x6 + x4 + x1`.
    #[must_use]
    pub fn cost_summary(&self) -> String {
        self.material_costs
            .iter()
            .map(|cost| format!("x{}", cost.quantity()))
            .collect::<Vec<_>>()
            .join(" + ")
    }
}

impl Default for RepairPlan {
    fn default() -> Self {
        Self::nothing()
    }
}

/// Plans full repairs against the shared resolver.
#[derive(Clone, Debug)]
pub struct RepairPlanner {
    resolver: Arc<ProfileResolver>,
}

impl RepairPlanner {
    /// Creates a planner bound to `resolver`.
    #[must_use]
    pub fn new(resolver: Arc<ProfileResolver>) -> Self {
        Self { resolver }
    }

    /// The resolver this planner reads.
    #[must_use]
    pub fn resolver(&self) -> &Arc<ProfileResolver> {
        &self.resolver
    }

    /// Plans restoring `item` to full durability.
    ///
    /// Pure function of the snapshot and the resolver's current rules.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn plan_full_repair(&self, item: &ItemSnapshot) -> RepairPlan {
        let Some(missing) = item.missing_durability() else {
            return RepairPlan::nothing();
        };

        let rarity = RarityTier::from_item_id(&item.item_id);
        let profile = self.resolver.resolve_id(&item.item_id);

        let missing_ratio = missing / item.max_durability;
        let restore_amount = missing.ceil() as u32;

        RepairPlan::new(
            rarity,
            restore_amount,
            profile.build_costs(missing_ratio, Some(rarity)),
        )
    }
}
