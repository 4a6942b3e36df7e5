//! Serialisable views over session state for presentation layers.
//!
//! These types carry no behaviour of their own; they flatten the session's
//! visible results and planned routes into shapes that render directly as
//! text cards or JSON.

use serde::Serialize;

use crate::catalog::SpotCatalog;
use crate::routing::{stop_label, RouteInstruction, RouteSelection, TravelProfile, WalkingRoute};
use crate::search::SpotMatch;
use crate::session::Session;
use crate::spot::SpotId;

const DIRECTIONS_BASE_URL: &str = "https://www.google.com/maps/dir/?api=1&destination=";

/// One spot as shown in the results list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpotCard {
    pub id: SpotId,
    pub name: String,
    pub location: String,
    pub borough: String,
    pub provider: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub latitude: f64,
    pub longitude: f64,
    pub zipcode: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_miles: Option<f64>,
    /// Whether the spot is part of the current route selection.
    pub selected: bool,
    pub directions_url: String,
}

impl SpotCard {
    pub fn from_match(entry: &SpotMatch, route: &RouteSelection) -> Self {
        let spot = &entry.spot;
        Self {
            id: spot.id,
            name: spot.name.clone(),
            location: spot.location.clone(),
            borough: spot.borough.clone(),
            provider: spot.provider.clone(),
            kind: spot.kind.clone(),
            latitude: spot.latitude,
            longitude: spot.longitude,
            zipcode: spot.zipcode.clone(),
            distance_miles: entry.distance,
            selected: route.contains(spot.id),
            directions_url: format!(
                "{DIRECTIONS_BASE_URL}{},{}",
                spot.latitude, spot.longitude
            ),
        }
    }
}

/// The visible prefix of a result set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultsPage {
    pub total: usize,
    pub shown: usize,
    pub page: usize,
    pub has_more: bool,
    pub cards: Vec<SpotCard>,
}

impl ResultsPage {
    pub fn from_session(session: &Session) -> Self {
        let cards: Vec<SpotCard> = session
            .visible()
            .iter()
            .map(|entry| SpotCard::from_match(entry, session.route()))
            .collect();

        Self {
            total: session.total(),
            shown: cards.len(),
            page: session.query().pagination.page(),
            has_more: session.has_more(),
            cards,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

/// A lettered waypoint of a planned route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteStopSummary {
    pub label: char,
    pub id: SpotId,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// The preferred route plus the count of alternatives offered.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteSummary {
    pub profile: TravelProfile,
    pub distance_miles: f64,
    pub duration_minutes: u64,
    pub alternatives: usize,
    pub stops: Vec<RouteStopSummary>,
    pub steps: Vec<RouteInstruction>,
}

impl RouteSummary {
    /// Summarise `routes` for the spots in `selection`.
    ///
    /// Returns `None` when the router produced no routes.
    pub fn new(
        catalog: &SpotCatalog,
        selection: &RouteSelection,
        profile: TravelProfile,
        routes: &[WalkingRoute],
    ) -> Option<Self> {
        let preferred = routes.first()?;

        let stops = selection
            .ids()
            .iter()
            .filter_map(|&id| catalog.get(id))
            .enumerate()
            .map(|(index, spot)| RouteStopSummary {
                label: stop_label(index),
                id: spot.id,
                name: spot.name.clone(),
                latitude: spot.latitude,
                longitude: spot.longitude,
            })
            .collect();

        Some(Self {
            profile,
            distance_miles: preferred.distance_miles(),
            duration_minutes: preferred.duration_minutes(),
            alternatives: routes.len() - 1,
            stops,
            steps: preferred.steps.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::test_helpers::{sample_catalog, SpotBuilder};

    #[test]
    fn cards_link_to_directions_and_flag_selection() {
        let catalog = sample_catalog();
        let mut route = RouteSelection::default();
        route.set_active(true);
        route.toggle(2).unwrap();

        let entry = SpotMatch {
            spot: catalog.get(2).unwrap().clone(),
            distance: Some(0.42),
        };
        let card = SpotCard::from_match(&entry, &route);

        assert!(card.selected);
        assert_eq!(card.distance_miles, Some(0.42));
        assert_eq!(
            card.directions_url,
            "https://www.google.com/maps/dir/?api=1&destination=40.7497,-73.9877"
        );
    }

    #[test]
    fn card_json_uses_type_key_and_omits_missing_distance() {
        let catalog = sample_catalog();
        let entry = SpotMatch {
            spot: catalog.get(0).unwrap().clone(),
            distance: None,
        };
        let json = serde_json::to_value(SpotCard::from_match(&entry, &RouteSelection::default()))
            .expect("serialise");

        assert_eq!(json["type"], "Free");
        assert!(json.get("distance_miles").is_none());
    }

    #[test]
    fn results_page_reports_visible_prefix() {
        let spots = (0..23)
            .map(|id| SpotBuilder::new(id).name(&format!("Spot {id}")).build())
            .collect();
        let mut session = Session::new(Arc::new(SpotCatalog::new(spots)));

        let page = ResultsPage::from_session(&session);
        assert_eq!((page.total, page.shown, page.page), (23, 10, 1));
        assert!(page.has_more);

        session.load_more();
        session.load_more();
        let page = ResultsPage::from_session(&session);
        assert_eq!(page.shown, 23);
        assert!(!page.has_more);
        assert_eq!(page.cards.last().map(|card| card.id), Some(22));
    }

    #[test]
    fn route_summary_letters_stops_in_selection_order() {
        let catalog = sample_catalog();
        let mut selection = RouteSelection::default();
        selection.set_active(true);
        selection.toggle(3).unwrap();
        selection.toggle(0).unwrap();

        let routes = vec![
            WalkingRoute {
                distance_meters: 1609.34 * 3.0,
                duration_seconds: 3600.0,
                steps: Vec::new(),
            },
            WalkingRoute {
                distance_meters: 6000.0,
                duration_seconds: 4000.0,
                steps: Vec::new(),
            },
        ];

        let summary = RouteSummary::new(&catalog, &selection, TravelProfile::Walking, &routes)
            .expect("has a route");
        assert!((summary.distance_miles - 3.0).abs() < 1e-9);
        assert_eq!(summary.duration_minutes, 60);
        assert_eq!(summary.alternatives, 1);
        let stops: Vec<(char, SpotId)> = summary.stops.iter().map(|s| (s.label, s.id)).collect();
        assert_eq!(stops, [('A', 3), ('B', 0)]);
    }

    #[test]
    fn no_routes_means_no_summary() {
        let catalog = sample_catalog();
        assert!(RouteSummary::new(
            &catalog,
            &RouteSelection::default(),
            TravelProfile::Walking,
            &[]
        )
        .is_none());
    }
}
