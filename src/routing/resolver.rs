//! Route resolution between two destinations
//!
//! Resolution is a lookup, not an optimiser: a direct segment if one exists,
//! otherwise one transfer through the hub. The `Search` strategy widens this
//! to a fewest-hops breadth-first search over the route graph.

use super::{TravelPreference, select_segment};
use crate::config::RoutingConfig;
use crate::models::RouteSegment;
use crate::registry::Registry;
use pathfinding::prelude::bfs;
use tracing::{debug, trace};

/// How connections without a direct segment are found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteStrategy {
    /// Direct segment, else exactly one transfer at the hub
    Hub,
    /// Fewest-hops search bounded by a hop limit
    Search { max_hops: usize },
}

impl RouteStrategy {
    #[must_use]
    pub fn from_config(config: &RoutingConfig) -> Self {
        match config.strategy.as_str() {
            "search" => RouteStrategy::Search {
                max_hops: config.max_hops as usize,
            },
            _ => RouteStrategy::Hub,
        }
    }
}

/// Finds the segments linking two destinations
#[derive(Debug, Clone)]
pub struct RouteResolver<'a> {
    registry: &'a Registry,
    hub: String,
    strategy: RouteStrategy,
}

impl<'a> RouteResolver<'a> {
    /// Resolver using `hub` for single-transfer fallback
    #[must_use]
    pub fn new(registry: &'a Registry, hub: &str) -> Self {
        Self {
            registry,
            hub: hub.to_lowercase(),
            strategy: RouteStrategy::Hub,
        }
    }

    #[must_use]
    pub fn from_config(registry: &'a Registry, config: &RoutingConfig) -> Self {
        Self::new(registry, &config.hub).with_strategy(RouteStrategy::from_config(config))
    }

    #[must_use]
    pub fn with_strategy(mut self, strategy: RouteStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    #[must_use]
    pub fn hub(&self) -> &str {
        &self.hub
    }

    #[must_use]
    pub fn registry(&self) -> &'a Registry {
        self.registry
    }

    /// Every segment between `from` and `to`, in either stored direction,
    /// oriented so that it departs from `from`.
    #[must_use]
    pub fn find_direct_routes(&self, from: &str, to: &str) -> Vec<RouteSegment> {
        self.direct_candidates(from, to)
            .into_iter()
            .map(|segment| orient(segment, from))
            .collect()
    }

    /// Resolve the hops from `from` to `to` with the configured strategy.
    ///
    /// Returns `None` when no connection exists.
    #[must_use]
    pub fn resolve(
        &self,
        from: &str,
        to: &str,
        preference: Option<TravelPreference>,
    ) -> Option<Vec<RouteSegment>> {
        let hops = match self.strategy {
            RouteStrategy::Hub => self.resolve_via_hub(from, to, preference),
            RouteStrategy::Search { max_hops } => {
                self.resolve_by_search(from, to, preference, max_hops)
            }
        };

        match &hops {
            Some(hops) => debug!(
                "Resolved {} -> {} in {} hop(s): {:?}",
                from,
                to,
                hops.len(),
                hops.iter().map(|h| h.id.as_str()).collect::<Vec<_>>()
            ),
            None => debug!("No connection found for {} -> {}", from, to),
        }
        hops
    }

    /// Direct segment first, then `from -> hub -> to`
    #[must_use]
    pub fn resolve_via_hub(
        &self,
        from: &str,
        to: &str,
        preference: Option<TravelPreference>,
    ) -> Option<Vec<RouteSegment>> {
        if let Some(direct) = self.pick(from, to, preference) {
            return Some(vec![direct]);
        }

        if from.eq_ignore_ascii_case(&self.hub) || to.eq_ignore_ascii_case(&self.hub) {
            return None;
        }

        trace!("No direct segment {} -> {}, trying hub {}", from, to, self.hub);
        let first = self.pick(from, &self.hub, preference)?;
        let second = self.pick(&self.hub, to, preference)?;
        Some(vec![first, second])
    }

    /// Fewest-hops path over the route graph, at most `max_hops` segments long
    #[must_use]
    pub fn resolve_by_search(
        &self,
        from: &str,
        to: &str,
        preference: Option<TravelPreference>,
        max_hops: usize,
    ) -> Option<Vec<RouteSegment>> {
        let start = self.registry.destination(from)?.id.clone();
        let goal = self.registry.destination(to)?.id.clone();

        let path = bfs(
            &start,
            |node: &String| {
                self.registry
                    .routes_from(node)
                    .filter_map(|r| r.other_end(node).map(str::to_string))
                    .collect::<Vec<_>>()
            },
            |node| *node == goal,
        )?;

        let hop_count = path.len().saturating_sub(1);
        if hop_count == 0 || hop_count > max_hops {
            trace!(
                "Search path {} -> {} has {} hops (limit {})",
                from, to, hop_count, max_hops
            );
            return None;
        }

        path.windows(2)
            .map(|pair| self.pick(&pair[0], &pair[1], preference))
            .collect()
    }

    fn direct_candidates(&self, from: &str, to: &str) -> Vec<&'a RouteSegment> {
        let (from, to) = (from.trim(), to.trim());
        self.registry
            .routes()
            .iter()
            .filter(|segment| segment.connects(from, to))
            .collect()
    }

    fn pick(
        &self,
        from: &str,
        to: &str,
        preference: Option<TravelPreference>,
    ) -> Option<RouteSegment> {
        let candidates = self.direct_candidates(from, to);
        select_segment(&candidates, preference).map(|segment| orient(segment, from))
    }
}

/// Copy of `segment` whose `from` end is `from`
fn orient(segment: &RouteSegment, from: &str) -> RouteSegment {
    let mut oriented = segment.clone();
    if !segment.from.eq_ignore_ascii_case(from.trim()) {
        std::mem::swap(&mut oriented.from, &mut oriented.to);
    }
    oriented
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransportMode;
    use rstest::{fixture, rstest};

    #[fixture]
    fn registry() -> Registry {
        Registry::builtin()
    }

    #[rstest]
    #[case("male", "north-male-atoll")]
    #[case("North-Male-Atoll", "MALE")]
    #[case("addu-atoll", "fuvahmulah")]
    #[case("maafushi", "south-male-atoll")]
    fn test_find_direct_routes_match_query(registry: Registry, #[case] from: &str, #[case] to: &str) {
        let resolver = RouteResolver::new(&registry, "male");
        let routes = resolver.find_direct_routes(from, to);
        assert!(!routes.is_empty());
        for route in routes {
            assert!(route.from.eq_ignore_ascii_case(from));
            assert!(route.to.eq_ignore_ascii_case(to));
        }
    }

    #[rstest]
    fn test_find_direct_routes_none(registry: Registry) {
        let resolver = RouteResolver::new(&registry, "male");
        assert!(resolver.find_direct_routes("baa-atoll", "ari-atoll").is_empty());
        assert!(resolver.find_direct_routes("male", "atlantis").is_empty());
    }

    #[rstest]
    fn test_resolve_direct_with_preference(registry: Registry) {
        let resolver = RouteResolver::new(&registry, "male");

        let fastest = resolver.resolve("male", "ari-atoll", Some(TravelPreference::Speed)).unwrap();
        assert_eq!(fastest.len(), 1);
        assert_eq!(fastest[0].mode, TransportMode::Seaplane);

        let cheapest = resolver.resolve("ari-atoll", "male", Some(TravelPreference::Cost)).unwrap();
        assert_eq!(cheapest[0].mode, TransportMode::Ferry);
        assert_eq!(cheapest[0].from, "ari-atoll");
        assert_eq!(cheapest[0].to, "male");

        let default = resolver.resolve("male", "ari-atoll", None).unwrap();
        assert_eq!(default[0].id, "fe-male-ari");
    }

    #[rstest]
    fn test_resolve_via_hub(registry: Registry) {
        let resolver = RouteResolver::new(&registry, "male");
        let hops = resolver.resolve("baa-atoll", "ari-atoll", None).unwrap();

        assert_eq!(hops.len(), 2);
        assert_eq!(hops[0].from, "baa-atoll");
        assert_eq!(hops[0].to, "male");
        assert_eq!(hops[1].from, "male");
        assert_eq!(hops[1].to, "ari-atoll");
    }

    #[rstest]
    fn test_resolve_hub_cannot_reach_two_hops_from_hub(registry: Registry) {
        let resolver = RouteResolver::new(&registry, "male");
        assert!(resolver.resolve("male", "fuvahmulah", None).is_none());
        assert!(resolver.resolve("thoddoo", "fuvahmulah", None).is_none());
        assert!(resolver.resolve("male", "atlantis", None).is_none());
    }

    #[rstest]
    fn test_resolve_by_search_reaches_further(registry: Registry) {
        let resolver =
            RouteResolver::new(&registry, "male").with_strategy(RouteStrategy::Search { max_hops: 3 });

        let hops = resolver.resolve("male", "fuvahmulah", Some(TravelPreference::Speed)).unwrap();
        assert_eq!(hops.len(), 2);
        assert_eq!(hops[0].to, "addu-atoll");
        assert_eq!(hops[1].from, "addu-atoll");
        assert_eq!(hops[1].id, "sb-addu-fuvahmulah");

        let three = resolver.resolve("thoddoo", "fuvahmulah", None).unwrap();
        assert_eq!(three.len(), 3);
    }

    #[rstest]
    fn test_resolve_by_search_respects_hop_limit(registry: Registry) {
        let resolver = RouteResolver::new(&registry, "male");
        assert!(resolver.resolve_by_search("thoddoo", "fuvahmulah", None, 2).is_none());
        assert!(resolver.resolve_by_search("male", "atlantis", None, 5).is_none());
    }

    #[rstest]
    fn test_strategy_from_config() {
        let mut config = RoutingConfig::default();
        assert_eq!(RouteStrategy::from_config(&config), RouteStrategy::Hub);
        config.strategy = "search".to_string();
        config.max_hops = 4;
        assert_eq!(
            RouteStrategy::from_config(&config),
            RouteStrategy::Search { max_hops: 4 }
        );
    }
}
