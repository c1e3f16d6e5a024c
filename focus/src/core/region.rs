//! Region ranks and the category → rank mapping used as the primary sort key.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Total-order position of a logical world region (kanto = 0).
pub type RegionRank = u32;

/// Region table and category overrides, as loaded from configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionSettings {
    /// Region names in rank order. The `final` rank is one past the last entry.
    pub regions: Vec<String>,
    /// Categories pursued together with another region's content.
    pub category_aliases: BTreeMap<String, String>,
    /// A category whose rank is switched by a persisted preference.
    pub deferrable: Option<DeferrableCategory>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeferrableCategory {
    pub category: String,
    /// Region the category ranks as when it is not deferred.
    pub region: String,
    /// Preference key holding the "do it last" flag.
    pub preference_key: String,
    pub default_deferred: bool,
}

impl Default for RegionSettings {
    fn default() -> Self {
        let regions = [
            "kanto", "johto", "hoenn", "sinnoh", "unova", "kalos", "alola", "galar", "hisui",
            "paldea",
        ];
        let category_aliases = [("sevii", "hoenn"), ("orre", "sinnoh")]
            .into_iter()
            .map(|(category, region)| (category.to_string(), region.to_string()))
            .collect();
        Self {
            regions: regions.iter().map(|name| name.to_string()).collect(),
            category_aliases,
            deferrable: Some(DeferrableCategory {
                category: "magikarpJump".to_string(),
                region: "galar".to_string(),
                preference_key: "Focus-Achievements-DoMagikarpIslandLast".to_string(),
                default_deferred: false,
            }),
        }
    }
}

impl RegionSettings {
    /// Returns a list of problems; empty means the settings are usable.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.regions.is_empty() {
            errors.push("regions must not be empty".to_string());
        }
        for (index, name) in self.regions.iter().enumerate() {
            if self.regions[..index].contains(name) {
                errors.push(format!("duplicate region '{name}'"));
            }
        }
        for (category, target) in &self.category_aliases {
            if !self.regions.contains(target) {
                errors.push(format!(
                    "alias '{category}' targets unknown region '{target}'"
                ));
            }
        }
        if let Some(deferrable) = &self.deferrable {
            if !self.regions.contains(&deferrable.region) {
                errors.push(format!(
                    "deferrable category '{}' targets unknown region '{}'",
                    deferrable.category, deferrable.region
                ));
            }
            if deferrable.preference_key.trim().is_empty() {
                errors.push("deferrable.preference_key must not be empty".to_string());
            }
        }
        errors
    }
}

/// Total order over regions with the category overrides applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionOrdering {
    ranks: BTreeMap<String, RegionRank>,
    aliases: BTreeMap<String, RegionRank>,
    deferrable: Option<(String, RegionRank)>,
    defer_last: bool,
    final_rank: RegionRank,
}

impl RegionOrdering {
    /// Builds the ordering. Alias targets missing from the region table rank as `final`.
    pub fn new(settings: &RegionSettings) -> Self {
        let ranks: BTreeMap<String, RegionRank> = settings
            .regions
            .iter()
            .enumerate()
            .map(|(rank, name)| (name.clone(), rank as RegionRank))
            .collect();
        let final_rank = settings.regions.len() as RegionRank;
        let lookup = |name: &str| ranks.get(name).copied().unwrap_or(final_rank);
        let aliases = settings
            .category_aliases
            .iter()
            .map(|(category, target)| (category.clone(), lookup(target)))
            .collect();
        let deferrable = settings
            .deferrable
            .as_ref()
            .map(|d| (d.category.clone(), lookup(&d.region)));
        let defer_last = settings
            .deferrable
            .as_ref()
            .is_some_and(|d| d.default_deferred);
        Self {
            ranks,
            aliases,
            deferrable,
            defer_last,
            final_rank,
        }
    }

    pub fn defer_last(&self) -> bool {
        self.defer_last
    }

    pub fn set_defer_last(&mut self, defer_last: bool) {
        self.defer_last = defer_last;
    }

    /// Rank given to content that belongs to no known region.
    pub fn final_rank(&self) -> RegionRank {
        self.final_rank
    }

    pub fn region_rank(&self, name: &str) -> Option<RegionRank> {
        self.ranks.get(name).copied()
    }

    /// Resolves a goal category to its region rank.
    ///
    /// Lookup order: deferrable category, aliases, region names, then `final`.
    pub fn rank(&self, category: &str) -> RegionRank {
        if let Some((deferrable, normal)) = &self.deferrable {
            if deferrable == category {
                return if self.defer_last {
                    self.final_rank
                } else {
                    *normal
                };
            }
        }
        if let Some(rank) = self.aliases.get(category) {
            return *rank;
        }
        self.region_rank(category).unwrap_or(self.final_rank)
    }
}

impl Default for RegionOrdering {
    fn default() -> Self {
        Self::new(&RegionSettings::default())
    }
}
