//! Route planning across a small set of selected spots.
//!
//! [`RouteSelection`] tracks which spots the user picked, in the order they
//! were picked, and [`Router`] hands the resulting waypoints to an external
//! routing service.

use std::fmt;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::catalog::SpotCatalog;
use crate::config::{build_client, ServiceEndpoints};
use crate::error::{Error, Result};
use crate::geo::GeoPoint;
use crate::spot::SpotId;

/// Largest number of spots a route may contain.
pub const MAX_ROUTE_SPOTS: usize = 5;

/// Meters per statute mile, used for route summaries.
pub const METERS_PER_MILE: f64 = 1609.34;

/// Result of toggling a spot in the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToggleOutcome {
    Added,
    Removed,
    /// Route mode is off; nothing changed.
    Inactive,
}

/// Ordered, capped set of spots picked for a route, plus the route mode switch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteSelection {
    active: bool,
    spots: Vec<SpotId>,
}

impl RouteSelection {
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Flip route mode. Both directions start from an empty selection.
    pub fn toggle_mode(&mut self) -> bool {
        self.set_active(!self.active);
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
        self.spots.clear();
    }

    /// Add `id`, or remove it when already selected.
    ///
    /// Adding past [`MAX_ROUTE_SPOTS`] fails with
    /// [`Error::RouteSelectionFull`] and leaves the selection unchanged.
    pub fn toggle(&mut self, id: SpotId) -> Result<ToggleOutcome> {
        if !self.active {
            return Ok(ToggleOutcome::Inactive);
        }

        if let Some(position) = self.spots.iter().position(|&existing| existing == id) {
            self.spots.remove(position);
            return Ok(ToggleOutcome::Removed);
        }

        if self.spots.len() >= MAX_ROUTE_SPOTS {
            return Err(Error::RouteSelectionFull {
                max: MAX_ROUTE_SPOTS,
            });
        }

        self.spots.push(id);
        Ok(ToggleOutcome::Added)
    }

    pub fn contains(&self, id: SpotId) -> bool {
        self.spots.contains(&id)
    }

    /// Selected identifiers in selection order.
    pub fn ids(&self) -> &[SpotId] {
        &self.spots
    }

    pub fn len(&self) -> usize {
        self.spots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spots.is_empty()
    }

    /// A route needs at least two stops.
    pub fn is_routable(&self) -> bool {
        self.spots.len() >= 2
    }

    /// Positions of the selected spots in selection order.
    ///
    /// Identifiers missing from `catalog` are skipped.
    pub fn waypoints(&self, catalog: &SpotCatalog) -> Vec<GeoPoint> {
        self.spots
            .iter()
            .filter_map(|&id| catalog.get(id))
            .map(|spot| spot.position())
            .collect()
    }
}

/// Letter label for the stop at `index` (A, B, C, ...).
pub fn stop_label(index: usize) -> char {
    (b'A'..=b'Z')
        .nth(index)
        .map(char::from)
        .unwrap_or('?')
}

/// Travel mode requested from the routing service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelProfile {
    #[default]
    Walking,
}

impl fmt::Display for TravelProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            TravelProfile::Walking => "walking",
        };
        f.write_str(value)
    }
}

/// One turn-by-turn instruction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteInstruction {
    pub instruction: String,
    pub distance_meters: f64,
    pub duration_seconds: f64,
}

/// A candidate route returned by the routing service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WalkingRoute {
    pub distance_meters: f64,
    pub duration_seconds: f64,
    pub steps: Vec<RouteInstruction>,
}

impl WalkingRoute {
    pub fn distance_miles(&self) -> f64 {
        self.distance_meters / METERS_PER_MILE
    }

    /// Total time rounded to whole minutes.
    pub fn duration_minutes(&self) -> u64 {
        (self.duration_seconds / 60.0).round().max(0.0) as u64
    }
}

/// External routing collaborator.
pub trait Router {
    /// Plan routes through `waypoints` in order; the first route is preferred.
    fn route(&self, waypoints: &[GeoPoint], profile: TravelProfile) -> Result<Vec<WalkingRoute>>;
}

/// [`Router`] backed by an OSRM `route/v1` endpoint.
#[derive(Debug, Clone)]
pub struct OsrmRouter {
    client: Client,
    base_url: String,
}

impl OsrmRouter {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: build_client()?,
            base_url: base_url.into(),
        })
    }

    pub fn from_endpoints(endpoints: &ServiceEndpoints) -> Result<Self> {
        Self::new(endpoints.router_url.clone())
    }

    fn route_url(&self, waypoints: &[GeoPoint], profile: TravelProfile) -> String {
        let coordinates = waypoints
            .iter()
            .map(|point| format!("{},{}", point.lng, point.lat))
            .collect::<Vec<_>>()
            .join(";");
        format!(
            "{base}/route/v1/{profile}/{coordinates}",
            base = self.base_url.trim_end_matches('/'),
        )
    }
}

impl Router for OsrmRouter {
    fn route(&self, waypoints: &[GeoPoint], profile: TravelProfile) -> Result<Vec<WalkingRoute>> {
        if waypoints.len() < 2 {
            return Err(Error::NotEnoughWaypoints {
                count: waypoints.len(),
            });
        }

        let url = self.route_url(waypoints, profile);
        debug!(%url, stops = waypoints.len(), "requesting route");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("alternatives", "true"),
                ("steps", "true"),
                ("overview", "false"),
            ])
            .send()?;

        let status = response.status();
        let body = match response.json::<OsrmResponse>() {
            Ok(body) => body,
            Err(error) if !status.is_success() => {
                warn!(%status, %error, "routing service returned an unreadable error");
                return Err(Error::RoutingFailed {
                    message: format!("HTTP {status}"),
                });
            }
            Err(error) => return Err(error.into()),
        };

        routes_from_response(body)
    }
}

#[derive(Debug, Deserialize)]
struct OsrmResponse {
    code: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    distance: f64,
    duration: f64,
    #[serde(default)]
    legs: Vec<OsrmLeg>,
}

#[derive(Debug, Deserialize)]
struct OsrmLeg {
    #[serde(default)]
    steps: Vec<OsrmStep>,
}

#[derive(Debug, Deserialize)]
struct OsrmStep {
    distance: f64,
    duration: f64,
    #[serde(default)]
    name: String,
    maneuver: OsrmManeuver,
}

#[derive(Debug, Deserialize)]
struct OsrmManeuver {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    modifier: Option<String>,
}

fn routes_from_response(body: OsrmResponse) -> Result<Vec<WalkingRoute>> {
    if body.code != "Ok" {
        return Err(Error::RoutingFailed {
            message: body.message.unwrap_or(body.code),
        });
    }
    if body.routes.is_empty() {
        return Err(Error::RoutingFailed {
            message: "no route found".to_string(),
        });
    }

    Ok(body
        .routes
        .into_iter()
        .map(|route| WalkingRoute {
            distance_meters: route.distance,
            duration_seconds: route.duration,
            steps: route
                .legs
                .iter()
                .flat_map(|leg| leg.steps.iter())
                .map(|step| RouteInstruction {
                    instruction: describe_step(step),
                    distance_meters: step.distance,
                    duration_seconds: step.duration,
                })
                .collect(),
        })
        .collect())
}

fn describe_step(step: &OsrmStep) -> String {
    let maneuver = &step.maneuver;
    let action = match (maneuver.kind.as_str(), maneuver.modifier.as_deref()) {
        ("depart", _) => "Head out".to_string(),
        ("arrive", _) => return "Arrive at stop".to_string(),
        ("turn", Some(modifier)) | ("end of road", Some(modifier)) | ("fork", Some(modifier)) => {
            format!("Turn {modifier}")
        }
        ("continue", Some(modifier)) | ("new name", Some(modifier)) => {
            format!("Continue {modifier}")
        }
        (kind, Some(modifier)) => format!("{} {modifier}", capitalize(kind)),
        (kind, None) => capitalize(kind),
    };

    if step.name.is_empty() {
        action
    } else {
        format!("{action} onto {}", step.name)
    }
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::sample_catalog;

    fn active_selection() -> RouteSelection {
        let mut selection = RouteSelection::default();
        selection.set_active(true);
        selection
    }

    #[test]
    fn sixth_spot_is_rejected_without_change() {
        let mut selection = active_selection();
        for id in 0..5 {
            assert_eq!(selection.toggle(id).unwrap(), ToggleOutcome::Added);
        }

        let before = selection.clone();
        let err = selection.toggle(5).expect_err("selection is full");
        assert!(matches!(err, Error::RouteSelectionFull { max: 5 }));
        assert_eq!(selection, before);
    }

    #[test]
    fn toggling_existing_member_removes_it() {
        let mut selection = active_selection();
        selection.toggle(3).unwrap();
        selection.toggle(1).unwrap();
        assert_eq!(selection.toggle(3).unwrap(), ToggleOutcome::Removed);
        assert_eq!(selection.ids(), [1]);
    }

    #[test]
    fn removal_frees_room_in_full_selection() {
        let mut selection = active_selection();
        for id in 0..5 {
            selection.toggle(id).unwrap();
        }
        selection.toggle(2).unwrap();
        assert_eq!(selection.toggle(9).unwrap(), ToggleOutcome::Added);
        assert_eq!(selection.ids(), [0, 1, 3, 4, 9]);
    }

    #[test]
    fn disabling_route_mode_clears_selection() {
        let mut selection = active_selection();
        selection.toggle(0).unwrap();
        selection.toggle(1).unwrap();
        assert!(!selection.toggle_mode());
        assert!(selection.is_empty());
    }

    #[test]
    fn toggling_while_inactive_is_ignored() {
        let mut selection = RouteSelection::default();
        assert_eq!(selection.toggle(0).unwrap(), ToggleOutcome::Inactive);
        assert!(selection.is_empty());
    }

    #[test]
    fn waypoints_follow_selection_order() {
        let catalog = sample_catalog();
        let mut selection = active_selection();
        selection.toggle(2).unwrap();
        selection.toggle(0).unwrap();
        selection.toggle(42).unwrap();

        let waypoints = selection.waypoints(&catalog);
        assert_eq!(
            waypoints,
            [
                catalog.get(2).unwrap().position(),
                catalog.get(0).unwrap().position()
            ]
        );
        assert!(selection.is_routable());
    }

    #[test]
    fn stop_labels_are_letters() {
        assert_eq!(stop_label(0), 'A');
        assert_eq!(stop_label(4), 'E');
        assert_eq!(stop_label(26), '?');
    }

    #[test]
    fn osrm_url_lists_lng_lat_pairs() {
        let router = OsrmRouter::new("https://router.example.org/").unwrap();
        let url = router.route_url(
            &[GeoPoint::new(40.75, -73.98), GeoPoint::new(40.76, -73.99)],
            TravelProfile::Walking,
        );
        assert_eq!(
            url,
            "https://router.example.org/route/v1/walking/-73.98,40.75;-73.99,40.76"
        );
    }

    #[test]
    fn osrm_response_becomes_walking_routes() {
        let body: OsrmResponse = serde_json::from_str(
            r#"{
                "code": "Ok",
                "routes": [{
                    "distance": 3218.68,
                    "duration": 2430.0,
                    "legs": [{
                        "steps": [
                            {"distance": 100.0, "duration": 70.0, "name": "Broadway",
                             "maneuver": {"type": "depart"}},
                            {"distance": 3118.68, "duration": 2360.0, "name": "W 34th St",
                             "maneuver": {"type": "turn", "modifier": "left"}},
                            {"distance": 0.0, "duration": 0.0, "name": "",
                             "maneuver": {"type": "arrive"}}
                        ]
                    }]
                }]
            }"#,
        )
        .expect("valid OSRM body");

        let routes = routes_from_response(body).expect("routes");
        assert_eq!(routes.len(), 1);
        let route = &routes[0];
        assert!((route.distance_miles() - 2.0).abs() < 0.01);
        assert_eq!(route.duration_minutes(), 41);
        let instructions: Vec<&str> = route.steps.iter().map(|s| s.instruction.as_str()).collect();
        assert_eq!(
            instructions,
            [
                "Head out onto Broadway",
                "Turn left onto W 34th St",
                "Arrive at stop"
            ]
        );
    }

    #[test]
    fn osrm_error_code_is_routing_failure() {
        let body: OsrmResponse =
            serde_json::from_str(r#"{"code": "NoRoute", "message": "Impossible route"}"#)
                .expect("valid body");
        let err = routes_from_response(body).expect_err("should fail");
        assert!(matches!(err, Error::RoutingFailed { message } if message == "Impossible route"));
    }

    #[test]
    fn router_requires_two_waypoints() {
        let router = OsrmRouter::new("http://127.0.0.1:9").unwrap();
        let err = router
            .route(&[GeoPoint::new(40.7, -74.0)], TravelProfile::Walking)
            .expect_err("needs two");
        assert!(matches!(err, Error::NotEnoughWaypoints { count: 1 }));
    }
}
