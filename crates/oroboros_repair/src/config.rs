//! # Repair Profile Config
//!
//! Translation layer between `repair_profiles.json` and the resolver's rule
//! list. The file is both the first-run seed (written from the built-in
//! defaults) and the live override surface operators edit.
//!
//! ## Format
//!
//! ```json
//! {
//!   "profiles": [
//!     {
//!       "keyword": "copper",
//!       "matchType": "contains",
//!       "priority": 260,
//!       "primaryMaterial": "Ingredient_Bar_Copper",
//!       "secondaryMaterial": "Ingredient_Leather_Light",
//!       "rareGemMaterial": "Ingredient_Essence_Fire",
//!       "primaryBaseCost": 6,
//!       "secondaryBaseCost": 4,
//!       "gemBaseCost": 1
//!     }
//!   ]
//! }
//! ```
//!
//! A path ending in `.toml` is read and written as TOML with the same schema
//! (`[[profiles]]` tables).
//!
//! ## Failure Policy
//!
//! [`ProfileConfigStore::load_or_create`] never fails. I/O and parse errors
//! are logged and the built-in defaults are used instead.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{RepairError, RepairResult};
use crate::profile::{
    RepairProfile, DEFAULT_GEM_BASE_COST, DEFAULT_PRIMARY_BASE_COST, DEFAULT_SECONDARY_BASE_COST,
};
use crate::resolver::MatchType;

/// Default config file name inside the config root.
pub const CONFIG_FILE_NAME: &str = "repair_profiles.json";

fn default_match_type() -> Option<String> {
    Some(MatchType::Contains.as_str().to_string())
}

#[allow(clippy::cast_possible_wrap)]
const fn default_primary_cost() -> i32 {
    DEFAULT_PRIMARY_BASE_COST as i32
}

#[allow(clippy::cast_possible_wrap)]
const fn default_secondary_cost() -> i32 {
    DEFAULT_SECONDARY_BASE_COST as i32
}

#[allow(clippy::cast_possible_wrap)]
const fn default_gem_cost() -> i32 {
    DEFAULT_GEM_BASE_COST as i32
}

/// Serializable mirror of one resolver rule.
///
/// Everything is optional on the wire; blank keyword or materials make the
/// definition unusable and the resolver skips it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairProfileDefinition {
    /// Keyword matched against the lower-cased item id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    /// `exact`, `prefix` or `contains`. Anything else means `contains`.
    #[serde(default = "default_match_type", skip_serializing_if = "Option::is_none")]
    pub match_type: Option<String>,
    /// Higher priority wins.
    #[serde(default)]
    pub priority: i32,
    /// Primary repair material item id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_material: Option<String>,
    /// Secondary repair material item id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_material: Option<String>,
    /// Gem material paid at `Rare` and above.
    #[serde(
        default,
        alias = "rareCatalystMaterial",
        skip_serializing_if = "Option::is_none"
    )]
    pub rare_gem_material: Option<String>,
    /// Primary units for a full repair.
    #[serde(default = "default_primary_cost")]
    pub primary_base_cost: i32,
    /// Secondary units for a full repair.
    #[serde(default = "default_secondary_cost")]
    pub secondary_base_cost: i32,
    /// Gem units for a full repair.
    #[serde(default = "default_gem_cost", alias = "catalystBaseCost")]
    pub gem_base_cost: i32,
}

impl RepairProfileDefinition {
    /// Creates a definition with default base costs and no gem slot.
    #[must_use]
    pub fn new(
        keyword: impl Into<String>,
        match_type: MatchType,
        priority: i32,
        primary_material: impl Into<String>,
        secondary_material: impl Into<String>,
    ) -> Self {
        Self {
            keyword: Some(keyword.into()),
            match_type: Some(match_type.as_str().to_string()),
            priority,
            primary_material: Some(primary_material.into()),
            secondary_material: Some(secondary_material.into()),
            rare_gem_material: None,
            primary_base_cost: default_primary_cost(),
            secondary_base_cost: default_secondary_cost(),
            gem_base_cost: default_gem_cost(),
        }
    }

    /// Sets primary and secondary base costs.
    #[must_use]
    pub fn with_base_costs(mut self, primary: i32, secondary: i32) -> Self {
        self.primary_base_cost = primary;
        self.secondary_base_cost = secondary;
        self
    }

    /// Sets the rare gem material and its base cost.
    #[must_use]
    pub fn with_rare_gem(mut self, material: impl Into<String>, base_cost: i32) -> Self {
        self.rare_gem_material = Some(material.into());
        self.gem_base_cost = base_cost;
        self
    }

    /// Lower-cased keyword, or `None` if blank.
    #[must_use]
    pub fn normalized_keyword(&self) -> Option<String> {
        non_blank(self.keyword.as_deref()).map(str::to_lowercase)
    }

    /// Builds the profile this definition describes.
    ///
    /// `None` when the primary or secondary material is blank. A blank gem
    /// material means no gem slot. Base costs below one are raised to one.
    #[must_use]
    pub fn to_profile(&self) -> Option<RepairProfile> {
        let primary = non_blank(self.primary_material.as_deref())?;
        let secondary = non_blank(self.secondary_material.as_deref())?;

        let mut builder = RepairProfile::builder(primary, secondary)
            .base_costs(positive(self.primary_base_cost), positive(self.secondary_base_cost));

        if let Some(gem) = non_blank(self.rare_gem_material.as_deref()) {
            builder = builder.rare_gem(gem, positive(self.gem_base_cost));
        }

        Some(builder.build())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn positive(cost: i32) -> u32 {
    cost.max(1).unsigned_abs()
}

/// The on-disk config document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepairProfileConfig {
    /// Rule definitions in registration order.
    #[serde(default)]
    pub profiles: Vec<RepairProfileDefinition>,
}

impl RepairProfileConfig {
    /// Wraps a definition list.
    #[must_use]
    pub fn new(profiles: Vec<RepairProfileDefinition>) -> Self {
        Self { profiles }
    }
}

/// Serialization format of the config file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigFormat {
    /// Pretty-printed JSON (default).
    Json,
    /// TOML with `[[profiles]]` tables.
    Toml,
}

impl ConfigFormat {
    /// Picks the format from a file extension. Anything but `.toml` is JSON.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Self::Toml,
            _ => Self::Json,
        }
    }
}

/// Loads and seeds the repair profile config file.
#[derive(Clone, Debug)]
pub struct ProfileConfigStore {
    path: PathBuf,
    format: ConfigFormat,
}

impl ProfileConfigStore {
    /// Store for `<root>/repair_profiles.json`. Creates `root` if missing.
    #[must_use]
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        if let Err(err) = fs::create_dir_all(root) {
            tracing::warn!(
                "Failed to create config directory at {}: {}",
                root.display(),
                err
            );
        }
        Self::at_path(root.join(CONFIG_FILE_NAME))
    }

    /// Store for an explicit file path. Format follows the extension.
    #[must_use]
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let format = ConfigFormat::from_path(&path);
        Self { path, format }
    }

    /// Config file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Config file format.
    #[must_use]
    pub const fn format(&self) -> ConfigFormat {
        self.format
    }

    /// Loads the config, or seeds the file with `defaults` when it is missing
    /// or holds no profiles.
    ///
    /// Never fails. A file that exists but cannot be read or parsed is left
    /// untouched and `defaults` are returned for this load.
    #[must_use]
    pub fn load_or_create(&self, defaults: &[RepairProfileDefinition]) -> RepairProfileConfig {
        match self.try_load() {
            Ok(Some(config)) if !config.profiles.is_empty() => return config,
            Ok(_) => {}
            Err(err) => {
                tracing::warn!("Failed to load repair profiles: {}", err);
                return RepairProfileConfig::new(defaults.to_vec());
            }
        }

        let seeded = RepairProfileConfig::new(defaults.to_vec());
        match self.try_save(&seeded) {
            Ok(()) => tracing::info!(
                "Wrote {} default repair profiles to {}",
                seeded.profiles.len(),
                self.path.display()
            ),
            Err(err) => tracing::warn!("Failed to save repair profiles: {}", err),
        }
        seeded
    }

    /// Reads the config file. `Ok(None)` when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`RepairError::Io`] if the file cannot be read and
    /// [`RepairError::Parse`] if its contents are not a profile document.
    pub fn try_load(&self) -> RepairResult<Option<RepairProfileConfig>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let raw = fs::read_to_string(&self.path).map_err(|err| RepairError::io(&self.path, &err))?;
        if raw.trim().is_empty() {
            return Ok(None);
        }

        let parsed: Result<RepairProfileConfig, String> = match self.format {
            ConfigFormat::Json => serde_json::from_str(&raw).map_err(|err| err.to_string()),
            ConfigFormat::Toml => toml::from_str(&raw).map_err(|err| err.to_string()),
        };

        parsed.map(Some).map_err(|message| RepairError::Parse {
            path: self.path.clone(),
            message,
        })
    }

    /// Writes `config` to the file, replacing its contents.
    ///
    /// # Errors
    ///
    /// Returns [`RepairError::Serialize`] if encoding fails and
    /// [`RepairError::Io`] if the file cannot be written.
    pub fn try_save(&self, config: &RepairProfileConfig) -> RepairResult<()> {
        let encoded = match self.format {
            ConfigFormat::Json => serde_json::to_string_pretty(config).map_err(|err| err.to_string()),
            ConfigFormat::Toml => toml::to_string_pretty(config).map_err(|err| err.to_string()),
        }
        .map_err(RepairError::Serialize)?;

        fs::write(&self.path, encoded).map_err(|err| RepairError::io(&self.path, &err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::ProfileResolver;

    fn temp_root(tag: &str) -> PathBuf {
        let id = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("test_repair_config_{tag}_{id}"))
    }

    #[test]
    fn test_definition_defaults_from_json() {
        let definition: RepairProfileDefinition = serde_json::from_str(
            r#"{"keyword": "bronze", "primaryMaterial": "Bar_Bronze", "secondaryMaterial": "Leather"}"#,
        )
        .unwrap();

        assert_eq!(definition.match_type.as_deref(), Some("contains"));
        assert_eq!(definition.priority, 0);
        assert_eq!(definition.primary_base_cost, 6);
        assert_eq!(definition.secondary_base_cost, 4);
        assert_eq!(definition.gem_base_cost, 1);
        assert_eq!(definition.rare_gem_material, None);
    }

    #[test]
    fn test_catalyst_aliases_fill_gem_slot() {
        let definition: RepairProfileDefinition = serde_json::from_str(
            r#"{"keyword": "x", "primaryMaterial": "a", "secondaryMaterial": "b",
                "rareCatalystMaterial": "Gem", "catalystBaseCost": 3}"#,
        )
        .unwrap();

        let profile = definition.to_profile().unwrap();
        assert_eq!(profile.rare_gem_material(), Some("Gem"));
        assert_eq!(profile.gem_base_cost(), 3);
    }

    #[test]
    fn test_to_profile_rejects_blank_materials() {
        let mut definition = RepairProfileDefinition::new("x", MatchType::Contains, 0, "a", " ");
        assert!(definition.to_profile().is_none());

        definition.secondary_material = Some("b".to_string());
        definition.rare_gem_material = Some(String::new());
        definition.primary_base_cost = -5;
        let profile = definition.to_profile().unwrap();
        assert_eq!(profile.rare_gem_material(), None);
        assert_eq!(profile.primary_base_cost(), 1);
    }

    #[test]
    fn test_normalized_keyword() {
        let definition = RepairProfileDefinition::new("Weapon_", MatchType::Prefix, 0, "a", "b");
        assert_eq!(definition.normalized_keyword().as_deref(), Some("weapon_"));

        let blank = RepairProfileDefinition::new("  ", MatchType::Prefix, 0, "a", "b");
        assert_eq!(blank.normalized_keyword(), None);
    }

    #[test]
    fn test_load_or_create_seeds_missing_file() {
        let root = temp_root("seed");
        let store = ProfileConfigStore::new(&root);
        let defaults = ProfileResolver::default_definitions();

        assert!(store.try_load().unwrap().is_none());
        let config = store.load_or_create(&defaults);

        assert_eq!(config.profiles, defaults);
        assert!(store.path().exists());
        assert_eq!(store.try_load().unwrap().unwrap().profiles, defaults);

        std::fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn test_load_or_create_keeps_operator_file() {
        let root = temp_root("keep");
        let store = ProfileConfigStore::new(&root);
        let custom = RepairProfileConfig::new(vec![RepairProfileDefinition::new(
            "bronze",
            MatchType::Contains,
            500,
            "Ingredient_Bar_Bronze",
            "Ingredient_Leather_Light",
        )]);
        store.try_save(&custom).unwrap();

        let loaded = store.load_or_create(&ProfileResolver::default_definitions());
        assert_eq!(loaded, custom);

        std::fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn test_empty_profile_list_is_reseeded() {
        let root = temp_root("empty");
        let store = ProfileConfigStore::new(&root);
        std::fs::write(store.path(), r#"{"profiles": []}"#).unwrap();

        let defaults = ProfileResolver::default_definitions();
        assert_eq!(store.load_or_create(&defaults).profiles, defaults);
        assert_eq!(store.try_load().unwrap().unwrap().profiles, defaults);

        std::fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn test_malformed_file_uses_defaults_and_is_not_overwritten() {
        let root = temp_root("broken");
        let store = ProfileConfigStore::new(&root);
        std::fs::write(store.path(), "{ not json").unwrap();

        assert!(matches!(store.try_load(), Err(RepairError::Parse { .. })));

        let defaults = ProfileResolver::default_definitions();
        assert_eq!(store.load_or_create(&defaults).profiles, defaults);
        assert_eq!(std::fs::read_to_string(store.path()).unwrap(), "{ not json");

        std::fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn test_toml_round_trip() {
        let root = temp_root("toml");
        std::fs::create_dir_all(&root).unwrap();
        let store = ProfileConfigStore::at_path(root.join("repair_profiles.toml"));
        assert_eq!(store.format(), ConfigFormat::Toml);

        let defaults = ProfileResolver::default_definitions();
        let seeded = store.load_or_create(&defaults);
        assert_eq!(seeded.profiles, defaults);

        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("[[profiles]]"));
        assert_eq!(store.try_load().unwrap().unwrap().profiles, defaults);

        std::fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn test_unwritable_location_still_returns_defaults() {
        let root = temp_root("unwritable");
        // Parent directory never created: the write fails and is only logged.
        let store = ProfileConfigStore::at_path(root.join("missing").join(CONFIG_FILE_NAME));

        let defaults = ProfileResolver::default_definitions();
        assert_eq!(store.load_or_create(&defaults).profiles, defaults);
        assert!(!store.path().exists());
    }
}
