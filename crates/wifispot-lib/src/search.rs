//! Text, ZIP, proximity, and structured filtering over the spot catalog.
//!
//! Every function here is pure: it reads the full spot slice and returns a new
//! ordered sequence of [`SpotMatch`] values without touching the source.

use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;
use crate::spot::Spot;

/// Radius used by proximity searches when none (or a nonsensical one) is given.
pub const DEFAULT_RADIUS_MILES: f64 = 2.0;

/// A spot selected by a search, with its distance when a proximity filter ran.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpotMatch {
    pub spot: Spot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
}

impl SpotMatch {
    fn plain(spot: &Spot) -> Self {
        Self {
            spot: spot.clone(),
            distance: None,
        }
    }
}

/// Borough/type/text constraints for structured filtering.
///
/// Empty or whitespace-only values are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub borough: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub text: Option<String>,
}

impl FilterCriteria {
    fn normalized(value: &Option<String>) -> Option<String> {
        value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_lowercase)
    }
}

/// True when `query` (after trimming) is exactly five ASCII digits.
pub fn is_zip_code(query: &str) -> bool {
    let query = query.trim();
    query.len() == 5 && query.bytes().all(|b| b.is_ascii_digit())
}

/// Text/ZIP search.
///
/// A five-digit query matches zipcodes exactly; anything else is a
/// case-insensitive substring match over name, location, provider, borough,
/// and zipcode.
pub fn filter_by_text(spots: &[Spot], query: &str) -> Vec<SpotMatch> {
    let query = query.trim();
    if is_zip_code(query) {
        return spots
            .iter()
            .filter(|spot| spot.zipcode == query)
            .map(SpotMatch::plain)
            .collect();
    }

    let needle = query.to_lowercase();
    spots
        .iter()
        .filter(|spot| spot.matches_text(&needle))
        .map(SpotMatch::plain)
        .collect()
}

/// Proximity search: spots within `radius_miles` of `center`, nearest first.
pub fn filter_by_distance(
    spots: &[Spot],
    center: &GeoPoint,
    radius_miles: Option<f64>,
) -> Vec<SpotMatch> {
    let radius = effective_radius(radius_miles);

    let mut matches: Vec<SpotMatch> = spots
        .iter()
        .filter_map(|spot| {
            let distance = center.distance_to(&spot.position());
            (distance <= radius).then(|| SpotMatch {
                spot: spot.clone(),
                distance: Some(distance),
            })
        })
        .collect();

    matches.sort_by(|a, b| {
        a.distance
            .unwrap_or(f64::INFINITY)
            .total_cmp(&b.distance.unwrap_or(f64::INFINITY))
    });
    matches
}

/// Structured filtering; every active constraint must hold.
///
/// Always starts from the full slice it is given, never from a previous result.
pub fn apply_filters(spots: &[Spot], criteria: &FilterCriteria) -> Vec<SpotMatch> {
    let borough = FilterCriteria::normalized(&criteria.borough);
    let kind = FilterCriteria::normalized(&criteria.kind);
    let text = FilterCriteria::normalized(&criteria.text);

    spots
        .iter()
        .filter(|spot| {
            borough
                .as_deref()
                .map_or(true, |b| spot.borough.to_lowercase() == b)
        })
        .filter(|spot| kind.as_deref().map_or(true, |k| spot.kind.to_lowercase() == k))
        .filter(|spot| text.as_deref().map_or(true, |t| spot.matches_text(t)))
        .map(SpotMatch::plain)
        .collect()
}

pub(crate) fn effective_radius(radius_miles: Option<f64>) -> f64 {
    match radius_miles {
        Some(radius) if radius.is_finite() && radius > 0.0 => radius,
        _ => DEFAULT_RADIUS_MILES,
    }
}
