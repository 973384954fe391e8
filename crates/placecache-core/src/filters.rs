//! Classification lists used to filter and rank provider candidates.
//!
//! The built-in profile covers the common grocery/food deployment. A YAML
//! file with the same shape can replace it at startup.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

const DEFAULT_FOOD_CATEGORIES: &[&str] = &[
    "bakery",
    "cafe",
    "convenience_store",
    "food",
    "grocery_or_supermarket",
    "meal_delivery",
    "meal_takeaway",
    "restaurant",
    "supermarket",
];

const DEFAULT_RETAILERS: &[&str] = &[
    "aldi",
    "costco",
    "food lion",
    "harris teeter",
    "kroger",
    "publix",
    "safeway",
    "target",
    "trader joe's",
    "walmart",
    "whole foods market",
];

const DEFAULT_DENY_LIST: &[&str] = &["pharmacy", "fuel", "gas station", "optical", "photo"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterProfile {
    /// Provider category tags that count as food-related.
    #[serde(default = "default_food_categories")]
    pub food_categories: Vec<String>,
    /// Known retailer display names, matched case-insensitively by exact
    /// name or name prefix.
    #[serde(default = "default_retailers")]
    pub retailers: Vec<String>,
    /// Name substrings that exclude a candidate regardless of category.
    #[serde(default = "default_deny_list")]
    pub deny_list: Vec<String>,
    /// Rank retailer matches ahead of generic matches regardless of distance.
    #[serde(default)]
    pub prioritize_retailers: bool,
}

impl Default for FilterProfile {
    fn default() -> Self {
        Self {
            food_categories: default_food_categories(),
            retailers: default_retailers(),
            deny_list: default_deny_list(),
            prioritize_retailers: false,
        }
    }
}

impl FilterProfile {
    /// Lower-cases and trims every entry, dropping blanks.
    #[must_use]
    pub fn normalized(self) -> Self {
        let clean = |items: Vec<String>| -> Vec<String> {
            items
                .into_iter()
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect()
        };
        Self {
            food_categories: clean(self.food_categories),
            retailers: clean(self.retailers),
            deny_list: clean(self.deny_list),
            prioritize_retailers: self.prioritize_retailers,
        }
    }
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

fn default_food_categories() -> Vec<String> {
    owned(DEFAULT_FOOD_CATEGORIES)
}

fn default_retailers() -> Vec<String> {
    owned(DEFAULT_RETAILERS)
}

fn default_deny_list() -> Vec<String> {
    owned(DEFAULT_DENY_LIST)
}

/// Load and validate a filter profile from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or defines no
/// relevant category or retailer at all.
pub fn load_filter_profile(path: &Path) -> Result<FilterProfile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FiltersFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let profile: FilterProfile = serde_yaml::from_str(&content)?;
    let profile = profile.normalized();

    if profile.food_categories.is_empty() && profile.retailers.is_empty() {
        return Err(ConfigError::Validation(format!(
            "filters file {} defines neither food categories nor retailers",
            path.display()
        )));
    }

    Ok(profile)
}
