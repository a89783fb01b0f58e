//! # Repair Profiles
//!
//! A profile is the cost formula for one family of items: which materials
//! repair it and how many units a full repair takes before rarity scaling.
//!
//! ```text
//! units = max(1, ceil(base_cost * clamp(missing_ratio, 0, 1) * rarity_multiplier))
//! ```
//!
//! Output order is always `[primary, secondary, gem?]`. The gem slot is only
//! paid at `Rare` and above.

use crate::material::MaterialCost;
use crate::rarity::RarityTier;

/// Default units of the primary material for a full repair.
pub const DEFAULT_PRIMARY_BASE_COST: u32 = 6;

/// Default units of the secondary material for a full repair.
pub const DEFAULT_SECONDARY_BASE_COST: u32 = 4;

/// Default units of the rare gem for a full repair.
pub const DEFAULT_GEM_BASE_COST: u32 = 1;

/// Declarative repair cost formula for an item family.
///
/// Built once through [`RepairProfileBuilder`] and immutable afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RepairProfile {
    primary_material: String,
    secondary_material: String,
    rare_gem_material: Option<String>,
    primary_base_cost: u32,
    secondary_base_cost: u32,
    gem_base_cost: u32,
}

impl RepairProfile {
    /// Starts a profile with its two mandatory materials.
    #[must_use]
    pub fn builder(
        primary_material: impl Into<String>,
        secondary_material: impl Into<String>,
    ) -> RepairProfileBuilder {
        RepairProfileBuilder {
            primary_material: primary_material.into(),
            secondary_material: secondary_material.into(),
            rare_gem_material: None,
            primary_base_cost: DEFAULT_PRIMARY_BASE_COST,
            secondary_base_cost: DEFAULT_SECONDARY_BASE_COST,
            gem_base_cost: DEFAULT_GEM_BASE_COST,
        }
    }

    /// Primary material item id.
    #[must_use]
    pub fn primary_material(&self) -> &str {
        &self.primary_material
    }

    /// Secondary material item id.
    #[must_use]
    pub fn secondary_material(&self) -> &str {
        &self.secondary_material
    }

    /// Rare gem material item id, if this family uses one.
    #[must_use]
    pub fn rare_gem_material(&self) -> Option<&str> {
        self.rare_gem_material.as_deref()
    }

    /// Primary units for a full repair at rarity multiplier 1.0.
    #[must_use]
    pub const fn primary_base_cost(&self) -> u32 {
        self.primary_base_cost
    }

    /// Secondary units for a full repair at rarity multiplier 1.0.
    #[must_use]
    pub const fn secondary_base_cost(&self) -> u32 {
        self.secondary_base_cost
    }

    /// Gem units for a full repair at rarity multiplier 1.0.
    #[must_use]
    pub const fn gem_base_cost(&self) -> u32 {
        self.gem_base_cost
    }

    /// Computes the material costs for restoring `missing_ratio` of the
    /// item's maximum durability.
    ///
    /// Returns an empty list when nothing is missing. An absent rarity scales
    /// by 1.0 and never pays the gem slot.
    #[must_use]
    pub fn build_costs(&self, missing_ratio: f64, rarity: Option<RarityTier>) -> Vec<MaterialCost> {
        if missing_ratio.is_nan() || missing_ratio <= 0.0 {
            return Vec::new();
        }

        let missing = missing_ratio.clamp(0.0, 1.0);
        let multiplier = rarity.map_or(1.0, RarityTier::repair_cost_multiplier);

        let mut costs = Vec::with_capacity(3);
        costs.push(MaterialCost::new(
            self.primary_material.as_str(),
            scale(self.primary_base_cost, missing, multiplier),
        ));
        costs.push(MaterialCost::new(
            self.secondary_material.as_str(),
            scale(self.secondary_base_cost, missing, multiplier),
        ));

        if let (Some(gem), Some(tier)) = (&self.rare_gem_material, rarity) {
            if tier >= RarityTier::Rare {
                costs.push(MaterialCost::new(
                    gem.as_str(),
                    scale(self.gem_base_cost, missing, multiplier),
                ));
            }
        }

        costs
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn scale(base_cost: u32, missing: f64, multiplier: f64) -> u32 {
    let raw = f64::from(base_cost) * missing * multiplier;
    (raw.ceil() as u32).max(1)
}

/// Builder for [`RepairProfile`]. Base costs are clamped to at least one.
#[derive(Clone, Debug)]
pub struct RepairProfileBuilder {
    primary_material: String,
    secondary_material: String,
    rare_gem_material: Option<String>,
    primary_base_cost: u32,
    secondary_base_cost: u32,
    gem_base_cost: u32,
}

impl RepairProfileBuilder {
    /// Sets the primary and secondary base costs.
    #[must_use]
    pub fn base_costs(mut self, primary: u32, secondary: u32) -> Self {
        self.primary_base_cost = primary.max(1);
        self.secondary_base_cost = secondary.max(1);
        self
    }

    /// Adds a rare gem slot paid by `Rare` and higher tiers.
    #[must_use]
    pub fn rare_gem(mut self, material: impl Into<String>, base_cost: u32) -> Self {
        self.rare_gem_material = Some(material.into());
        self.gem_base_cost = base_cost.max(1);
        self
    }

    /// Finishes the profile.
    #[must_use]
    pub fn build(self) -> RepairProfile {
        RepairProfile {
            primary_material: self.primary_material,
            secondary_material: self.secondary_material,
            rare_gem_material: self.rare_gem_material,
            primary_base_cost: self.primary_base_cost,
            secondary_base_cost: self.secondary_base_cost,
            gem_base_cost: self.gem_base_cost,
        }
    }
}
