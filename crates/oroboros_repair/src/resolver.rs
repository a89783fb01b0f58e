//! # Profile Resolver
//!
//! **The rule engine.** Maps free-form item identifiers to repair profiles.
//!
//! ## Matching
//!
//! Every compiled rule is checked against the lower-cased item id; there is
//! no short-circuit. Among the rules that match, the winner is decided
//! pairwise, first difference wins:
//!
//! 1. Higher declared `priority`
//! 2. Longer keyword (more specific)
//! 3. Earlier registration (lower insertion order)
//!
//! No match, or a blank id, resolves to the built-in default profile.
//!
//! ## Reloads
//!
//! Definitions are compiled outside the lock and swapped in under the write
//! lock, so readers see either the old or the new rule list, never a mix.
//! A definition list that compiles to nothing falls back to the defaults.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::config::RepairProfileDefinition;
use crate::profile::RepairProfile;

/// How a rule keyword is compared against a normalized item id.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MatchType {
    /// Item id equals the keyword.
    Exact,
    /// Item id starts with the keyword.
    Prefix,
    /// Item id contains the keyword anywhere.
    #[default]
    Contains,
}

impl MatchType {
    /// Parses a config value. Absent, blank or unknown values are `Contains`.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|value| value.trim().to_lowercase()).as_deref() {
            Some("exact") => Self::Exact,
            Some("prefix") => Self::Prefix,
            _ => Self::Contains,
        }
    }

    /// Config spelling of this match type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Prefix => "prefix",
            Self::Contains => "contains",
        }
    }

    /// Tests a normalized (lower-cased) candidate against a lower-cased keyword.
    #[inline]
    #[must_use]
    pub fn matches(self, candidate: &str, keyword: &str) -> bool {
        match self {
            Self::Exact => candidate == keyword,
            Self::Prefix => candidate.starts_with(keyword),
            Self::Contains => candidate.contains(keyword),
        }
    }
}

/// A compiled rule.
#[derive(Clone, Debug)]
struct Rule {
    keyword: String,
    match_type: MatchType,
    priority: i32,
    order: usize,
    profile: Arc<RepairProfile>,
}

impl Rule {
    #[inline]
    fn matches(&self, normalized_id: &str) -> bool {
        self.match_type.matches(normalized_id, &self.keyword)
    }

    /// True if `self` beats `other` under (priority desc, keyword length desc,
    /// insertion order asc).
    fn outranks(&self, other: &Self) -> bool {
        if self.priority != other.priority {
            return self.priority > other.priority;
        }
        if self.keyword.len() != other.keyword.len() {
            return self.keyword.len() > other.keyword.len();
        }
        self.order < other.order
    }
}

/// Compiles definitions into rules.
///
/// Malformed entries are skipped but still consume an insertion slot, so the
/// order of valid rules does not shift with the number of broken ones.
fn compile(definitions: &[RepairProfileDefinition]) -> Vec<Rule> {
    let mut rules = Vec::with_capacity(definitions.len());

    for (order, definition) in definitions.iter().enumerate() {
        let (Some(keyword), Some(profile)) = (definition.normalized_keyword(), definition.to_profile())
        else {
            tracing::debug!(
                "Skipping repair profile definition #{} (keyword {:?}): blank keyword or material",
                order,
                definition.keyword
            );
            continue;
        };

        rules.push(Rule {
            keyword,
            match_type: MatchType::parse(definition.match_type.as_deref()),
            priority: definition.priority,
            order,
            profile: Arc::new(profile),
        });
    }

    rules
}

/// Resolves item identifiers to repair profiles.
///
/// One instance is owned by the server's composition root and shared by
/// handle (`Arc<ProfileResolver>`) with the repair bench, salvage bench and
/// admin commands.
#[derive(Debug)]
pub struct ProfileResolver {
    /// Compiled rules in insertion order.
    rules: RwLock<Vec<Rule>>,
    /// Returned for blank ids and ids no rule matches.
    default_profile: Arc<RepairProfile>,
}

impl ProfileResolver {
    /// Creates a resolver loaded with the built-in rule set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rules: RwLock::new(compile(&Self::default_definitions())),
            default_profile: Arc::new(Self::fallback_profile()),
        }
    }

    /// The hard-coded profile for unmatched or blank ids.
    #[must_use]
    pub fn fallback_profile() -> RepairProfile {
        RepairProfile::builder("Ingredient_Bar_Iron", "Ingredient_Leather_Light")
            .base_costs(6, 4)
            .rare_gem("Ingredient_Essence_Void", 1)
            .build()
    }

    /// Shared handle to the default profile.
    #[must_use]
    pub fn default_profile(&self) -> Arc<RepairProfile> {
        Arc::clone(&self.default_profile)
    }

    /// Resolves an item id to its best-matching profile.
    ///
    /// Case-insensitive. Never fails: blank, absent or unmatched ids get the
    /// default profile.
    #[must_use]
    pub fn resolve(&self, item_id: Option<&str>) -> Arc<RepairProfile> {
        let Some(item_id) = item_id.filter(|id| !id.trim().is_empty()) else {
            return self.default_profile();
        };

        let normalized = item_id.to_lowercase();
        let rules = self.rules.read();

        let mut best: Option<&Rule> = None;
        for rule in rules.iter() {
            if !rule.matches(&normalized) {
                continue;
            }
            if best.map_or(true, |current| rule.outranks(current)) {
                best = Some(rule);
            }
        }

        best.map_or_else(|| self.default_profile(), |rule| Arc::clone(&rule.profile))
    }

    /// Shorthand for [`resolve`](Self::resolve) on a present id.
    #[inline]
    #[must_use]
    pub fn resolve_id(&self, item_id: &str) -> Arc<RepairProfile> {
        self.resolve(Some(item_id))
    }

    /// Replaces the rule list with the built-in rule set.
    pub fn reset_to_defaults(&self) {
        let compiled = compile(&Self::default_definitions());
        *self.rules.write() = compiled;
    }

    /// Replaces the rule list with rules compiled from `definitions`.
    ///
    /// An empty list, or one where every entry is malformed, falls back to
    /// the built-in rule set. Returns the number of rules now active.
    pub fn reload_from_config(&self, definitions: &[RepairProfileDefinition]) -> usize {
        let mut compiled = compile(definitions);
        let skipped = definitions.len() - compiled.len();

        if compiled.is_empty() {
            tracing::warn!(
                "Repair profile config produced no usable rules ({} definitions); using built-in defaults",
                definitions.len()
            );
            compiled = compile(&Self::default_definitions());
        } else {
            tracing::info!(
                "Loaded {} repair profile rules ({} skipped)",
                compiled.len(),
                skipped
            );
        }

        let count = compiled.len();
        *self.rules.write() = compiled;
        count
    }

    /// Number of compiled rules currently active.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.read().len()
    }

    /// The built-in rule set, also written out as the seed config file.
    #[must_use]
    pub fn default_definitions() -> Vec<RepairProfileDefinition> {
        const FIRE: &str = "Ingredient_Essence_Fire";
        const VOID: &str = "Ingredient_Essence_Void";

        let def = |keyword: &str,
                   match_type: MatchType,
                   priority: i32,
                   primary: &str,
                   secondary: &str,
                   gem: &str,
                   costs: (i32, i32, i32)| {
            RepairProfileDefinition::new(keyword, match_type, priority, primary, secondary)
                .with_base_costs(costs.0, costs.1)
                .with_rare_gem(gem, costs.2)
        };

        vec![
            // Metal tiers outrank the weapon-type and generic rules.
            def("adamantite", MatchType::Contains, 300, "Ingredient_Bar_Adamantite", "Ingredient_Leather_Heavy", FIRE, (10, 6, 2)),
            def("mithril", MatchType::Contains, 290, "Ingredient_Bar_Mithril", "Ingredient_Leather_Medium", FIRE, (9, 5, 2)),
            def("steel", MatchType::Contains, 280, "Ingredient_Bar_Steel", "Ingredient_Leather_Medium", FIRE, (8, 5, 1)),
            def("iron", MatchType::Contains, 270, "Ingredient_Bar_Iron", "Ingredient_Leather_Light", FIRE, (7, 4, 1)),
            def("copper", MatchType::Contains, 260, "Ingredient_Bar_Copper", "Ingredient_Leather_Light", FIRE, (6, 4, 1)),
            // Weapon types
            def("weapon_shortbow_", MatchType::Prefix, 240, "Ingredient_Plank_Oak", "Ingredient_Fabric_Scrap_Linen", FIRE, (6, 5, 1)),
            def("weapon_staff_", MatchType::Prefix, 235, "Ingredient_Plank_Oak", "Ingredient_Fabric_Scrap_Linen", VOID, (6, 5, 1)),
            def("weapon_daggers_", MatchType::Prefix, 230, "Ingredient_Bar_Iron", "Ingredient_Leather_Light", FIRE, (6, 4, 1)),
            // Armor and cloth
            def("armor_", MatchType::Prefix, 200, "Ingredient_Bar_Iron", "Ingredient_Leather_Light", VOID, (8, 5, 1)),
            def("robe", MatchType::Contains, 190, "Ingredient_Bolt_Linen", "Ingredient_Fabric_Scrap_Linen", VOID, (7, 4, 1)),
            def("cloth", MatchType::Contains, 180, "Ingredient_Bolt_Linen", "Ingredient_Fabric_Scrap_Linen", VOID, (6, 4, 1)),
            // Gatherer tools
            def("tool_pickaxe_", MatchType::Prefix, 170, "Ingredient_Bar_Iron", "Ingredient_Plank_Oak", FIRE, (6, 3, 1)),
            def("tool_hatchet_", MatchType::Prefix, 160, "Ingredient_Bar_Iron", "Ingredient_Plank_Oak", FIRE, (6, 3, 1)),
            def("fishing_rod", MatchType::Contains, 150, "Ingredient_Plank_Oak", "Ingredient_Fabric_Scrap_Linen", VOID, (4, 4, 1)),
            def("tool_", MatchType::Prefix, 140, "Ingredient_Plank_Oak", "Ingredient_Block_Stone", FIRE, (5, 4, 1)),
            // Generic fallbacks
            def("weapon_", MatchType::Prefix, 100, "Ingredient_Bar_Iron", "Ingredient_Leather_Light", FIRE, (7, 4, 1)),
            def("armor", MatchType::Contains, 90, "Ingredient_Bar_Iron", "Ingredient_Leather_Light", VOID, (8, 5, 1)),
        ]
    }
}

impl Default for ProfileResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule_def(keyword: &str, match_type: MatchType, priority: i32, primary: &str) -> RepairProfileDefinition {
        RepairProfileDefinition::new(keyword, match_type, priority, primary, "Secondary")
    }

    #[test]
    fn test_match_type_parse() {
        assert_eq!(MatchType::parse(Some("exact")), MatchType::Exact);
        assert_eq!(MatchType::parse(Some("PREFIX")), MatchType::Prefix);
        assert_eq!(MatchType::parse(Some("contains")), MatchType::Contains);
        assert_eq!(MatchType::parse(Some("regex")), MatchType::Contains);
        assert_eq!(MatchType::parse(Some("  ")), MatchType::Contains);
        assert_eq!(MatchType::parse(None), MatchType::Contains);
    }

    #[test]
    fn test_match_type_matches() {
        assert!(MatchType::Exact.matches("weapon_sword", "weapon_sword"));
        assert!(!MatchType::Exact.matches("weapon_sword_iron", "weapon_sword"));
        assert!(MatchType::Prefix.matches("weapon_sword_iron", "weapon_"));
        assert!(!MatchType::Prefix.matches("old_weapon_sword", "weapon_"));
        assert!(MatchType::Contains.matches("old_weapon_sword", "weapon_"));
    }

    #[test]
    fn test_copper_sword_beats_generic_weapon_rule() {
        let resolver = ProfileResolver::new();
        let profile = resolver.resolve_id("Weapon_Sword_Copper");
        assert_eq!(profile.primary_material(), "Ingredient_Bar_Copper");
    }

    #[test]
    fn test_metal_outranks_weapon_type() {
        let resolver = ProfileResolver::new();
        // "iron" (270) beats "weapon_daggers_" (230)
        let profile = resolver.resolve_id("Weapon_Daggers_Iron");
        assert_eq!(profile.primary_material(), "Ingredient_Bar_Iron");
        assert_eq!(profile.primary_base_cost(), 7);
        // Shortbow with no metal keyword uses the shortbow rule
        let profile = resolver.resolve_id("Weapon_Shortbow_Oak");
        assert_eq!(profile.primary_material(), "Ingredient_Plank_Oak");
    }

    #[test]
    fn test_case_insensitive() {
        let resolver = ProfileResolver::new();
        assert_eq!(
            resolver.resolve_id("ARMOR_CHEST_CLOTH"),
            resolver.resolve_id("armor_chest_cloth")
        );
    }

    #[test]
    fn test_blank_and_unknown_ids_get_default() {
        let resolver = ProfileResolver::new();
        let fallback = ProfileResolver::fallback_profile();

        assert_eq!(*resolver.resolve(None), fallback);
        assert_eq!(*resolver.resolve(Some("")), fallback);
        assert_eq!(*resolver.resolve(Some("   ")), fallback);
        assert_eq!(*resolver.resolve_id("\u{1F5E1}garbage!!"), fallback);
        assert_eq!(fallback.rare_gem_material(), Some("Ingredient_Essence_Void"));
    }

    #[test]
    fn test_priority_wins() {
        let resolver = ProfileResolver::new();
        resolver.reload_from_config(&[
            rule_def("sword", MatchType::Contains, 10, "Low"),
            rule_def("s", MatchType::Contains, 20, "High"),
        ]);
        assert_eq!(resolver.resolve_id("sword").primary_material(), "High");
    }

    #[test]
    fn test_longer_keyword_wins_at_equal_priority() {
        let resolver = ProfileResolver::new();
        resolver.reload_from_config(&[
            rule_def("sw", MatchType::Contains, 10, "Short"),
            rule_def("sword", MatchType::Contains, 10, "Long"),
        ]);
        assert_eq!(resolver.resolve_id("sword").primary_material(), "Long");
    }

    #[test]
    fn test_first_registered_wins_full_tie() {
        let resolver = ProfileResolver::new();
        resolver.reload_from_config(&[
            rule_def("abc", MatchType::Contains, 10, "First"),
            rule_def("bcd", MatchType::Contains, 10, "Second"),
        ]);
        assert_eq!(resolver.resolve_id("abcd").primary_material(), "First");

        resolver.reload_from_config(&[
            rule_def("bcd", MatchType::Contains, 10, "Second"),
            rule_def("abc", MatchType::Contains, 10, "First"),
        ]);
        assert_eq!(resolver.resolve_id("abcd").primary_material(), "Second");
    }

    #[test]
    fn test_malformed_definitions_skipped_but_keep_order() {
        let resolver = ProfileResolver::new();
        let mut blank_keyword = rule_def("", MatchType::Contains, 10, "Broken");
        blank_keyword.keyword = Some("   ".to_string());
        let mut blank_secondary = rule_def("abc", MatchType::Contains, 50, "Broken");
        blank_secondary.secondary_material = None;

        let count = resolver.reload_from_config(&[
            blank_keyword,
            blank_secondary,
            rule_def("bcd", MatchType::Contains, 10, "Valid"),
        ]);

        assert_eq!(count, 1);
        assert_eq!(resolver.resolve_id("abcd").primary_material(), "Valid");
    }

    #[test]
    fn test_exact_rule() {
        let resolver = ProfileResolver::new();
        resolver.reload_from_config(&[rule_def("Weapon_Sword_Crude", MatchType::Exact, 10, "Exact")]);

        assert_eq!(resolver.resolve_id("weapon_sword_crude").primary_material(), "Exact");
        assert_eq!(*resolver.resolve_id("weapon_sword_crude_2"), ProfileResolver::fallback_profile());
    }

    #[test]
    fn test_empty_reload_falls_back_to_defaults() {
        let resolver = ProfileResolver::new();
        let default_count = resolver.rule_count();

        resolver.reload_from_config(&[rule_def("abc", MatchType::Contains, 10, "Custom")]);
        assert_eq!(resolver.rule_count(), 1);

        assert_eq!(resolver.reload_from_config(&[]), default_count);
        assert_eq!(resolver.rule_count(), default_count);

        let mut broken = rule_def("abc", MatchType::Contains, 10, "Broken");
        broken.primary_material = Some(String::new());
        assert_eq!(resolver.reload_from_config(&[broken]), default_count);
        assert_eq!(
            resolver.resolve_id("Weapon_Sword_Copper").primary_material(),
            "Ingredient_Bar_Copper"
        );
    }

    #[test]
    fn test_reset_to_defaults() {
        let resolver = ProfileResolver::new();
        resolver.reload_from_config(&[rule_def("copper", MatchType::Contains, 999, "Custom")]);
        assert_eq!(resolver.resolve_id("Weapon_Sword_Copper").primary_material(), "Custom");

        resolver.reset_to_defaults();
        assert_eq!(
            resolver.resolve_id("Weapon_Sword_Copper").primary_material(),
            "Ingredient_Bar_Copper"
        );
        assert_eq!(resolver.rule_count(), ProfileResolver::default_definitions().len());
    }

    #[test]
    fn test_every_default_keyword_resolves_to_its_own_rule() {
        let resolver = ProfileResolver::new();
        for definition in ProfileResolver::default_definitions() {
            let keyword = definition.keyword.clone().unwrap_or_default();
            let expected = definition.to_profile().map(Arc::new);
            assert_eq!(Some(resolver.resolve_id(&keyword)), expected, "keyword {keyword}");
        }
    }
}
