//! # OROBOROS Repair System
//!
//! Repair, salvage and high-alchemy economics for equippable items.
//!
//! ## Design Principles
//!
//! 1. **Rule engine** - Item identifiers resolve to repair profiles through a
//!    prioritized, hot-reloadable ruleset
//! 2. **Total API** - Every public operation returns a value; bad config entries
//!    are skipped and an empty ruleset falls back to built-in defaults
//! 3. **External configuration** - Rules live in `repair_profiles.json`
//! 4. **Deterministic** - Same item + same ruleset = same plan, always
//!
//! ## Thread Safety
//!
//! [`ProfileResolver`] is the only shared mutable state. Reads and reloads go
//! through one `parking_lot::RwLock`, so a reload is never observed half-built.
//!
//! ## Example
//!
//! ```rust,ignore
//! use oroboros_repair::{ItemSnapshot, ProfileConfigStore, RepairEngine};
//!
//! let engine = RepairEngine::with_defaults()
//!     .with_config_store(ProfileConfigStore::new("data/config"));
//! engine.reload_config();
//!
//! let plan = engine.plan_repair(&ItemSnapshot::new("Weapon_Sword_Iron_Rare", 0.0, 100.0));
//! assert!(plan.is_repairable());
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod durability;
pub mod engine;
pub mod error;
pub mod material;
pub mod planner;
pub mod profile;
pub mod rarity;
pub mod resolver;
pub mod salvage;
pub mod valuation;

pub use config::{ProfileConfigStore, RepairProfileConfig, RepairProfileDefinition};
pub use durability::DurabilityPolicy;
pub use engine::{ReloadReport, RepairEngine};
pub use error::{RepairError, RepairResult};
pub use material::{MaterialCost, MaterialLedger, MaterialStock};
pub use planner::{ItemSnapshot, RepairPlan, RepairPlanner};
pub use profile::{RepairProfile, RepairProfileBuilder};
pub use rarity::RarityTier;
pub use resolver::{MatchType, ProfileResolver};
pub use salvage::SalvagePolicy;
pub use valuation::{KeywordTierScalars, TierScalarSource, UnitTierScalars, ValuationPolicy};
