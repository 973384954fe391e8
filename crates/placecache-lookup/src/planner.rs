//! Staged upstream search.
//!
//! Stages run strictly in sequence, each a full independent provider call:
//!
//! 1. the caller's radius and category;
//! 2. no category, radius raised to the relaxed floor;
//! 3. no category, the wide fixed radius (only while still below it).
//!
//! After each stage the raw candidates are filtered; the next stage runs only
//! when the filtered set is empty. A stage identical to the previous one is
//! skipped. Any provider failure or timeout aborts the whole plan.

use std::sync::Arc;
use std::time::Duration;

use placecache_core::{GeoQuery, QueryMode};
use placecache_provider::{MapsProvider, NearbyPlace, NearbySearch, ProviderError};

use crate::ranker::ResultRanker;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchStage {
    /// 1-based position in the full stage sequence.
    pub number: u8,
    pub radius: u32,
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlanOutcome {
    /// A stage produced candidates that survived filtering.
    Matched { stage: u8, places: Vec<NearbyPlace> },
    /// Nothing survived filtering in food-and-retail mode; these are the raw
    /// candidates of the first stage that returned any.
    Unfiltered { places: Vec<NearbyPlace> },
    /// No usable candidates from any stage.
    Exhausted,
}

pub struct QueryPlanner {
    provider: Arc<dyn MapsProvider>,
    relaxed_radius_m: u32,
    wide_radius_m: u32,
    call_timeout: Duration,
}

impl QueryPlanner {
    #[must_use]
    pub fn new(
        provider: Arc<dyn MapsProvider>,
        relaxed_radius_m: u32,
        wide_radius_m: u32,
        call_timeout: Duration,
    ) -> Self {
        Self {
            provider,
            relaxed_radius_m,
            wide_radius_m,
            call_timeout,
        }
    }

    /// The stages `query` would run through, duplicates removed.
    #[must_use]
    pub fn stages(&self, query: &GeoQuery) -> Vec<SearchStage> {
        let exact = SearchStage {
            number: 1,
            radius: query.radius,
            category: query.category.clone(),
        };
        let relaxed = SearchStage {
            number: 2,
            radius: query.radius.max(self.relaxed_radius_m),
            category: None,
        };
        let wide = (relaxed.radius < self.wide_radius_m).then(|| SearchStage {
            number: 3,
            radius: self.wide_radius_m,
            category: None,
        });

        let mut stages = vec![exact];
        for stage in std::iter::once(relaxed).chain(wide) {
            let duplicate = stages
                .last()
                .is_some_and(|prev| prev.radius == stage.radius && prev.category == stage.category);
            if !duplicate {
                stages.push(stage);
            }
        }
        stages
    }

    /// Runs the stages for `query`, filtering with `ranker` after each one.
    ///
    /// # Errors
    ///
    /// Returns the first [`ProviderError`] raised by any stage, including a
    /// [`ProviderError::Timeout`] when a call exceeds the per-call bound.
    pub async fn plan(
        &self,
        query: &GeoQuery,
        ranker: &ResultRanker,
    ) -> Result<PlanOutcome, ProviderError> {
        let mut first_raw: Option<Vec<NearbyPlace>> = None;

        for stage in self.stages(query) {
            tracing::debug!(
                stage = stage.number,
                radius = stage.radius,
                category = stage.category.as_deref().unwrap_or("*"),
                "planner stage attempted"
            );

            let raw = self.search(query, &stage).await?;
            let relevant = ranker.filter(&raw, query.mode);
            if !relevant.is_empty() {
                tracing::debug!(
                    stage = stage.number,
                    raw = raw.len(),
                    relevant = relevant.len(),
                    "planner stage satisfied"
                );
                return Ok(PlanOutcome::Matched {
                    stage: stage.number,
                    places: relevant,
                });
            }

            if first_raw.is_none() && !raw.is_empty() {
                first_raw = Some(raw);
            }
        }

        match (query.mode, first_raw) {
            (QueryMode::FoodAndRetail, Some(places)) => {
                tracing::debug!(raw = places.len(), "no classified candidates; using raw set");
                Ok(PlanOutcome::Unfiltered { places })
            }
            _ => Ok(PlanOutcome::Exhausted),
        }
    }

    async fn search(
        &self,
        query: &GeoQuery,
        stage: &SearchStage,
    ) -> Result<Vec<NearbyPlace>, ProviderError> {
        let request = NearbySearch {
            location: query.origin(),
            radius: stage.radius,
            category: stage.category.clone(),
        };
        tokio::time::timeout(self.call_timeout, self.provider.nearby_search(&request))
            .await
            .map_err(|_| ProviderError::Timeout(self.call_timeout.as_secs()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Unused;

    #[async_trait::async_trait]
    impl MapsProvider for Unused {
        async fn nearby_search(
            &self,
            _request: &NearbySearch,
        ) -> Result<Vec<NearbyPlace>, ProviderError> {
            unreachable!("stage computation makes no calls")
        }

        async fn reverse_geocode(
            &self,
            _point: placecache_core::Coordinate,
        ) -> Result<Vec<placecache_provider::GeocodedAddress>, ProviderError> {
            unreachable!("stage computation makes no calls")
        }

        async fn route_distance(
            &self,
            _origin: placecache_core::Coordinate,
            _destination: placecache_core::Coordinate,
        ) -> Result<f64, ProviderError> {
            unreachable!("stage computation makes no calls")
        }
    }

    fn planner() -> QueryPlanner {
        QueryPlanner::new(Arc::new(Unused), 1_000, 5_000, Duration::from_secs(10))
    }

    fn query(radius: u32, category: Option<&str>) -> GeoQuery {
        GeoQuery::new(
            33.749,
            -84.388,
            Some(radius),
            category.map(String::from),
            QueryMode::FoodAndRetail,
        )
    }

    fn shape(stages: &[SearchStage]) -> Vec<(u8, u32, Option<&str>)> {
        stages
            .iter()
            .map(|s| (s.number, s.radius, s.category.as_deref()))
            .collect()
    }

    #[test]
    fn small_radius_with_category_runs_all_three_stages() {
        let stages = planner().stages(&query(200, Some("restaurant")));
        assert_eq!(
            shape(&stages),
            vec![
                (1, 200, Some("restaurant")),
                (2, 1_000, None),
                (3, 5_000, None)
            ]
        );
    }

    #[test]
    fn radius_above_floor_is_kept_for_relaxed_stage() {
        let stages = planner().stages(&query(2_000, Some("cafe")));
        assert_eq!(
            shape(&stages),
            vec![(1, 2_000, Some("cafe")), (2, 2_000, None), (3, 5_000, None)]
        );
    }

    #[test]
    fn relaxed_stage_identical_to_exact_is_skipped() {
        let stages = planner().stages(&query(1_000, None));
        assert_eq!(shape(&stages), vec![(1, 1_000, None), (3, 5_000, None)]);
    }

    #[test]
    fn wide_stage_is_omitted_at_or_above_wide_radius() {
        let stages = planner().stages(&query(8_000, Some("bakery")));
        assert_eq!(shape(&stages), vec![(1, 8_000, Some("bakery")), (2, 8_000, None)]);

        let stages = planner().stages(&query(5_000, None));
        assert_eq!(shape(&stages), vec![(1, 5_000, None)]);
    }
}
