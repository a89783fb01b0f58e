//! # Repair Engine
//!
//! Composition root for the repair core. One engine per server; it owns the
//! shared resolver handle, the config store and the tier-scalar source, and
//! is what the repair bench, salvage bench and admin commands talk to.
//!
//! ```text
//! admin "reload" ──> RepairEngine::reload_config
//!                         │
//!                         ├── ProfileConfigStore::load_or_create   (file I/O, no lock held)
//!                         └── ProfileResolver::reload_from_config  (write lock, swap)
//!
//! repair bench ──> plan_repair ──────────> RepairPlanner
//! salvage bench ─> estimate_salvage ─────> SalvagePolicy
//! high alchemy ──> estimate_high_alchemy ─> ValuationPolicy
//! ```

use std::sync::Arc;

use crate::config::ProfileConfigStore;
use crate::material::MaterialCost;
use crate::planner::{ItemSnapshot, RepairPlan, RepairPlanner};
use crate::rarity::RarityTier;
use crate::resolver::ProfileResolver;
use crate::salvage::SalvagePolicy;
use crate::valuation::{TierScalarSource, UnitTierScalars, ValuationPolicy};

// ============================================================================
// Reload Report
// ============================================================================

/// Outcome of a config reload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReloadReport {
    /// Definitions read from the config store (zero without a store).
    pub loaded: usize,
    /// Rules active after the reload.
    pub compiled: usize,
}

// ============================================================================
// Repair Engine
// ============================================================================

/// Repair, salvage and high-alchemy entry point.
pub struct RepairEngine {
    resolver: Arc<ProfileResolver>,
    planner: RepairPlanner,
    store: Option<ProfileConfigStore>,
    tier_scalars: Box<dyn TierScalarSource>,
}

impl RepairEngine {
    /// Creates an engine around an existing resolver handle.
    #[must_use]
    pub fn new(resolver: Arc<ProfileResolver>) -> Self {
        Self {
            planner: RepairPlanner::new(Arc::clone(&resolver)),
            resolver,
            store: None,
            tier_scalars: Box::new(UnitTierScalars),
        }
    }

    /// Creates an engine with a fresh resolver on the built-in rules.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(Arc::new(ProfileResolver::new()))
    }

    /// Attaches the config store used by [`reload_config`](Self::reload_config).
    #[must_use]
    pub fn with_config_store(mut self, store: ProfileConfigStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Replaces the tier-scalar lookup used for high alchemy.
    #[must_use]
    pub fn with_tier_scalars(mut self, source: impl TierScalarSource + 'static) -> Self {
        self.tier_scalars = Box::new(source);
        self
    }

    /// Shared resolver handle.
    #[must_use]
    pub fn resolver(&self) -> &Arc<ProfileResolver> {
        &self.resolver
    }

    /// Attached config store, if any.
    #[must_use]
    pub fn config_store(&self) -> Option<&ProfileConfigStore> {
        self.store.as_ref()
    }

    /// Reloads rules from the config store, seeding it with the built-in
    /// rules when the file is missing. Without a store, resets to defaults.
    ///
    /// File I/O happens before the resolver lock is taken.
    pub fn reload_config(&self) -> ReloadReport {
        let Some(store) = &self.store else {
            self.resolver.reset_to_defaults();
            return ReloadReport {
                loaded: 0,
                compiled: self.resolver.rule_count(),
            };
        };

        let config = store.load_or_create(&ProfileResolver::default_definitions());
        let compiled = self.resolver.reload_from_config(&config.profiles);

        tracing::debug!(
            "Repair config reload from {}: {} definitions, {} rules",
            store.path().display(),
            config.profiles.len(),
            compiled
        );

        ReloadReport {
            loaded: config.profiles.len(),
            compiled,
        }
    }

    /// Plans a full repair of `item`.
    #[must_use]
    pub fn plan_repair(&self, item: &ItemSnapshot) -> RepairPlan {
        self.planner.plan_full_repair(item)
    }

    /// Materials refunded for salvaging `item_id` at `bench_tier`.
    #[must_use]
    pub fn estimate_salvage(
        &self,
        item_id: &str,
        rarity: Option<RarityTier>,
        bench_tier: i32,
    ) -> Vec<MaterialCost> {
        SalvagePolicy::estimate_for_item(&self.resolver, item_id, rarity, bench_tier)
    }

    /// Coins paid for liquidating `item_id`.
    #[must_use]
    pub fn estimate_high_alchemy(&self, item_id: &str, rarity: Option<RarityTier>) -> u32 {
        ValuationPolicy::estimate_coin_return(item_id, rarity, self.tier_scalars.as_ref())
    }
}

impl Default for RepairEngine {
    fn default() -> Self {
        Self::with_defaults()
    }
}
