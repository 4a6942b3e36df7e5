//! Resolve free-text or ZIP queries to a point inside the service area.
//!
//! ZIP codes present in the dataset are resolved locally from the centroid of
//! their spots. Everything else goes to an external [`Geocoder`], and the
//! first candidate is only accepted when it falls inside [`SERVICE_AREA`].

use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::debug;

use crate::catalog::SpotCatalog;
use crate::config::{build_client, ServiceEndpoints};
use crate::error::{Error, Result};
use crate::geo::{BoundingBox, GeoPoint, SERVICE_AREA};
use crate::search::is_zip_code;

/// Appended to ZIP codes that have no local match before the external lookup.
pub const ZIP_LOCALITY_QUALIFIER: &str = ", New York City";

/// Result of resolving a query to a location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeocodeOutcome {
    /// A usable point inside the service area.
    Resolved(GeoPoint),
    /// The lookup returned no candidates.
    NotFound,
    /// The first candidate lies outside the service area.
    OutOfBounds(GeoPoint),
}

impl GeocodeOutcome {
    /// The resolved point, if any. Out-of-bounds candidates are not usable.
    pub fn point(&self) -> Option<GeoPoint> {
        match self {
            GeocodeOutcome::Resolved(point) => Some(*point),
            GeocodeOutcome::NotFound | GeocodeOutcome::OutOfBounds(_) => None,
        }
    }
}

/// External text-geocoding collaborator.
pub trait Geocoder {
    /// Look up `query`, biased to `viewbox`, returning candidates best first.
    fn lookup(&self, query: &str, viewbox: &BoundingBox) -> Result<Vec<GeoPoint>>;
}

/// Geocoder that never finds anything; only in-dataset ZIP centroids resolve.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineGeocoder;

impl Geocoder for OfflineGeocoder {
    fn lookup(&self, _query: &str, _viewbox: &BoundingBox) -> Result<Vec<GeoPoint>> {
        Ok(Vec::new())
    }
}

/// Resolve `query` to a location, preferring in-dataset ZIP centroids.
///
/// Transport failures are returned as errors; callers treat them the same as
/// [`GeocodeOutcome::NotFound`].
pub fn resolve_location(
    catalog: &SpotCatalog,
    geocoder: &dyn Geocoder,
    query: &str,
) -> Result<GeocodeOutcome> {
    let query = query.trim();
    let is_zip = is_zip_code(query);

    if is_zip {
        if let Some(centroid) = catalog.zip_centroid(query) {
            debug!(zip = query, ?centroid, "resolved ZIP from dataset centroid");
            return Ok(GeocodeOutcome::Resolved(centroid));
        }
    }

    let lookup_query = if is_zip {
        format!("{query}{ZIP_LOCALITY_QUALIFIER}")
    } else {
        query.to_string()
    };

    let candidates = geocoder.lookup(&lookup_query, &SERVICE_AREA)?;
    let Some(first) = candidates.first().copied() else {
        debug!(query = %lookup_query, "geocoder returned no candidates");
        return Ok(GeocodeOutcome::NotFound);
    };

    if SERVICE_AREA.contains(&first) {
        Ok(GeocodeOutcome::Resolved(first))
    } else {
        debug!(query = %lookup_query, ?first, "geocoded point outside service area");
        Ok(GeocodeOutcome::OutOfBounds(first))
    }
}

/// [`Geocoder`] backed by the Nominatim search API.
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    client: Client,
    base_url: String,
}

impl NominatimGeocoder {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: build_client()?,
            base_url: base_url.into(),
        })
    }

    pub fn from_endpoints(endpoints: &ServiceEndpoints) -> Result<Self> {
        Self::new(endpoints.geocoder_url.clone())
    }
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
}

impl NominatimPlace {
    fn to_point(&self) -> Result<GeoPoint> {
        let parse = |raw: &str| {
            raw.trim()
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
        };
        match (parse(&self.lat), parse(&self.lon)) {
            (Some(lat), Some(lng)) => Ok(GeoPoint::new(lat, lng)),
            _ => Err(Error::InvalidGeocodeCandidate {
                message: format!("lat={:?} lon={:?}", self.lat, self.lon),
            }),
        }
    }
}

impl Geocoder for NominatimGeocoder {
    fn lookup(&self, query: &str, viewbox: &BoundingBox) -> Result<Vec<GeoPoint>> {
        let viewbox = viewbox.viewbox();
        let places = self
            .client
            .get(&self.base_url)
            .query(&[
                ("format", "json"),
                ("q", query),
                ("bounded", "1"),
                ("viewbox", viewbox.as_str()),
            ])
            .send()?
            .error_for_status()?
            .json::<Vec<NominatimPlace>>()?;

        first_candidate(&places)
    }
}

/// Only the best-ranked place is used, so later malformed entries are ignored.
fn first_candidate(places: &[NominatimPlace]) -> Result<Vec<GeoPoint>> {
    places
        .first()
        .map(NominatimPlace::to_point)
        .transpose()
        .map(|point| point.into_iter().collect())
}
