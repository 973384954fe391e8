//! Candidate classification, distance ordering, and truncation.

use std::cmp::Ordering;

use placecache_core::{great_circle_distance_m, Coordinate, FilterProfile, PlaceResult, QueryMode};
use placecache_provider::NearbyPlace;

/// How one provider candidate relates to the configured filter lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Name matched the deny list; never returned by a filtered search.
    Denied,
    /// Name matched an allow-listed retailer.
    Retailer,
    /// A category tag matched the food list.
    Food,
    Irrelevant,
}

impl Classification {
    /// Whether a candidate of this class survives filtering in `mode`.
    #[must_use]
    pub fn is_relevant(self, mode: QueryMode) -> bool {
        match mode {
            QueryMode::FoodAndRetail => matches!(self, Self::Retailer | Self::Food),
            QueryMode::RetailerOnly => self == Self::Retailer,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResultRanker {
    profile: FilterProfile,
    max_results: usize,
}

impl ResultRanker {
    /// `max_results` is the hard upper bound on every ranked output.
    #[must_use]
    pub fn new(profile: FilterProfile, max_results: usize) -> Self {
        Self {
            profile: profile.normalized(),
            max_results,
        }
    }

    #[must_use]
    pub fn max_results(&self) -> usize {
        self.max_results
    }

    /// Deny-list hits win over everything; retailer names win over category
    /// tags. Matching is case-insensitive.
    #[must_use]
    pub fn classify(&self, place: &NearbyPlace) -> Classification {
        let name = place.name.trim().to_lowercase();

        if self
            .profile
            .deny_list
            .iter()
            .any(|needle| name.contains(needle.as_str()))
        {
            return Classification::Denied;
        }

        if self
            .profile
            .retailers
            .iter()
            .any(|retailer| name.starts_with(retailer.as_str()))
        {
            return Classification::Retailer;
        }

        if place.types.iter().any(|t| {
            let t = t.to_lowercase();
            self.profile.food_categories.iter().any(|c| *c == t)
        }) {
            return Classification::Food;
        }

        Classification::Irrelevant
    }

    /// Candidates relevant under `mode`, in provider order.
    #[must_use]
    pub fn filter(&self, candidates: &[NearbyPlace], mode: QueryMode) -> Vec<NearbyPlace> {
        candidates
            .iter()
            .filter(|p| self.classify(p).is_relevant(mode))
            .cloned()
            .collect()
    }

    /// Orders candidates by great-circle distance from `origin`, optionally
    /// putting retailer matches first, and truncates to the output bound.
    /// Ties keep provider order. Distance is dropped from the output.
    #[must_use]
    pub fn rank(&self, origin: Coordinate, candidates: Vec<NearbyPlace>) -> Vec<PlaceResult> {
        let mut scored: Vec<(bool, f64, NearbyPlace)> = candidates
            .into_iter()
            .map(|place| {
                let retailer = self.profile.prioritize_retailers
                    && self.classify(&place) == Classification::Retailer;
                let distance = great_circle_distance_m(origin, place.location);
                (retailer, distance, place)
            })
            .collect();

        // `sort_by` is stable, which keeps provider order for equal keys.
        scored.sort_by(|a, b| match b.0.cmp(&a.0) {
            Ordering::Equal => a.1.total_cmp(&b.1),
            other => other,
        });

        scored
            .into_iter()
            .take(self.max_results)
            .map(|(_, _, place)| PlaceResult {
                id: place.place_id,
                name: place.name,
                address: place.vicinity.unwrap_or_default(),
                latitude: place.location.latitude,
                longitude: place.location.longitude,
                rating: place.rating,
            })
            .collect()
    }
}
