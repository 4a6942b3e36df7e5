//! Session shell tying the catalog, query state, and route selection together.
//!
//! [`Session`] sequences calls into the pure search and pagination functions
//! and records their output in a serialisable [`QueryState`]. Each search is
//! tagged with a [`RequestToken`]; a result whose token is no longer the
//! latest issued is discarded, so a slow response can never overwrite a newer
//! search.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::catalog::SpotCatalog;
use crate::error::{Error, Result};
use crate::geo::GeoPoint;
use crate::geocode::{resolve_location, GeocodeOutcome, Geocoder};
use crate::pagination::Pagination;
use crate::routing::{RouteSelection, Router, ToggleOutcome, TravelProfile, WalkingRoute};
use crate::search::{
    apply_filters, effective_radius, filter_by_distance, filter_by_text, FilterCriteria, SpotMatch,
};
use crate::spot::SpotId;

/// Monotonically increasing tag for an externally-triggered request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// What produced the current result set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SearchOrigin {
    /// The full dataset, before any search.
    All,
    /// Text or ZIP matching over the dataset.
    Text { query: String },
    /// Spots within a radius of a point.
    Proximity { center: GeoPoint, radius_miles: f64 },
    /// Borough/type/text filters.
    Filters { criteria: FilterCriteria },
}

/// Serialisable snapshot of the user's current search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryState {
    pub term: String,
    pub borough: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub center: Option<GeoPoint>,
    pub radius_miles: Option<f64>,
    pub pagination: Pagination,
    pub origin: SearchOrigin,
    pub results: Vec<SpotMatch>,
}

impl QueryState {
    fn showing_all(catalog: &SpotCatalog) -> Self {
        Self {
            term: String::new(),
            borough: None,
            kind: None,
            center: None,
            radius_miles: None,
            pagination: Pagination::default(),
            origin: SearchOrigin::All,
            results: apply_filters(catalog.spots(), &FilterCriteria::default()),
        }
    }
}

/// Owning shell for one user's interaction with the catalog.
#[derive(Debug, Clone)]
pub struct Session {
    catalog: Arc<SpotCatalog>,
    query: QueryState,
    route: RouteSelection,
    latest_token: u64,
}

impl Session {
    /// Start a session showing every spot in the catalog.
    pub fn new(catalog: Arc<SpotCatalog>) -> Self {
        let query = QueryState::showing_all(&catalog);
        Self {
            catalog,
            query,
            route: RouteSelection::default(),
            latest_token: 0,
        }
    }

    pub fn catalog(&self) -> &SpotCatalog {
        &self.catalog
    }

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    pub fn route(&self) -> &RouteSelection {
        &self.route
    }

    /// Issue a new token, invalidating every earlier one.
    pub fn begin_request(&mut self) -> RequestToken {
        self.latest_token += 1;
        RequestToken(self.latest_token)
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        token.0 == self.latest_token
    }

    /// Install `results` if `token` is still the latest request.
    ///
    /// Returns `false` (and changes nothing) for stale tokens.
    pub fn complete(
        &mut self,
        token: RequestToken,
        origin: SearchOrigin,
        results: Vec<SpotMatch>,
    ) -> bool {
        if !self.is_current(token) {
            debug!(
                token = token.0,
                latest = self.latest_token,
                "discarding stale search result"
            );
            return false;
        }

        self.query.origin = origin;
        self.query.results = results;
        self.query.pagination.reset();
        true
    }

    /// Set the radius used by subsequent proximity searches.
    pub fn set_radius(&mut self, radius_miles: Option<f64>) {
        self.query.radius_miles = radius_miles;
    }

    /// Search box: geocode `query` and show nearby spots, falling back to a
    /// text/ZIP match when the location cannot be resolved.
    ///
    /// An empty query is ignored and returns `false`.
    pub fn search(&mut self, geocoder: &dyn Geocoder, query: &str) -> bool {
        let query = query.trim();
        if query.is_empty() {
            return false;
        }

        let token = self.begin_request();
        self.query.term = query.to_string();
        self.query.borough = None;
        self.query.kind = None;

        let outcome = match resolve_location(&self.catalog, geocoder, query) {
            Ok(outcome) => outcome,
            Err(error) => {
                warn!(%error, query, "geocoding failed; falling back to text search");
                GeocodeOutcome::NotFound
            }
        };

        match outcome.point() {
            Some(center) => self.finish_proximity(token, center),
            None => {
                self.query.center = None;
                let results = filter_by_text(self.catalog.spots(), query);
                self.complete(
                    token,
                    SearchOrigin::Text {
                        query: query.to_string(),
                    },
                    results,
                )
            }
        }
    }

    /// Near-me: show spots around the caller's position.
    pub fn search_near(&mut self, position: GeoPoint) -> Result<bool> {
        validate_position(&position)?;
        let token = self.begin_request();
        self.query.term.clear();
        self.query.borough = None;
        self.query.kind = None;
        Ok(self.finish_proximity(token, position))
    }

    /// Structured filters, always evaluated against the full catalog.
    pub fn apply_filters(&mut self, criteria: FilterCriteria) -> bool {
        let token = self.begin_request();
        self.query.borough = criteria.borough.clone();
        self.query.kind = criteria.kind.clone();
        self.query.term = criteria.text.clone().unwrap_or_default();
        self.query.center = None;

        let results = apply_filters(self.catalog.spots(), &criteria);
        self.complete(token, SearchOrigin::Filters { criteria }, results)
    }

    /// Reveal the next page of the current results without searching again.
    pub fn load_more(&mut self) {
        self.query.pagination.load_more();
    }

    /// Jump straight to `page` (at least 1) of the current results.
    pub fn show_page(&mut self, page: usize) {
        self.query.pagination.show_page(page);
    }

    /// Currently visible prefix of the results.
    pub fn visible(&self) -> &[SpotMatch] {
        self.query.pagination.visible(&self.query.results)
    }

    pub fn total(&self) -> usize {
        self.query.results.len()
    }

    pub fn has_more(&self) -> bool {
        self.query.pagination.has_more(self.query.results.len())
    }

    /// Flip route mode; returns whether it is now on.
    pub fn toggle_route_mode(&mut self) -> bool {
        self.route.toggle_mode()
    }

    /// Add or remove a spot from the route selection.
    pub fn toggle_route_spot(&mut self, id: SpotId) -> Result<ToggleOutcome> {
        if !self.catalog.contains(id) {
            return Err(Error::UnknownSpot { id });
        }
        self.route.toggle(id)
    }

    /// Plan a walking route through the selected spots in selection order.
    pub fn plan_route(&mut self, router: &dyn Router) -> Result<Vec<WalkingRoute>> {
        let waypoints = self.route.waypoints(&self.catalog);
        if waypoints.len() < 2 {
            return Err(Error::NotEnoughWaypoints {
                count: waypoints.len(),
            });
        }
        router.route(&waypoints, TravelProfile::Walking)
    }

    fn finish_proximity(&mut self, token: RequestToken, center: GeoPoint) -> bool {
        let radius = effective_radius(self.query.radius_miles);
        self.query.center = Some(center);
        let results = filter_by_distance(self.catalog.spots(), &center, Some(radius));
        self.complete(
            token,
            SearchOrigin::Proximity {
                center,
                radius_miles: radius,
            },
            results,
        )
    }
}

fn validate_position(position: &GeoPoint) -> Result<()> {
    let valid = position.is_finite()
        && (-90.0..=90.0).contains(&position.lat)
        && (-180.0..=180.0).contains(&position.lng);
    if valid {
        Ok(())
    } else {
        Err(Error::LocationUnavailable {
            message: format!("invalid coordinates {}, {}", position.lat, position.lng),
        })
    }
}
