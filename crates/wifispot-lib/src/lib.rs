//! WiFi spot finder library entry points.
//!
//! This crate exposes helpers to locate the public WiFi dataset, parse it into
//! an in-memory catalog, search and filter it by text, ZIP code, or proximity,
//! paginate the results, and plan short walking routes across selected spots.
//! Higher-level consumers (the CLI) should only depend on the functions
//! exported here instead of reimplementing behavior.
//!

#![deny(warnings)]

pub mod catalog;
pub mod config;
pub mod dataset;
pub mod error;
pub mod geo;
pub mod geocode;
pub mod output;
pub mod pagination;
pub mod parser;
pub mod routing;
pub mod search;
pub mod session;
pub mod spot;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use catalog::SpotCatalog;
pub use config::ServiceEndpoints;
pub use dataset::{default_dataset_path, ensure_dataset, load_catalog, DatasetSource};
pub use error::{Error, Result};
pub use geo::{haversine_miles, BoundingBox, GeoPoint, EARTH_RADIUS_MILES, SERVICE_AREA};
pub use geocode::{
    resolve_location, GeocodeOutcome, Geocoder, NominatimGeocoder, OfflineGeocoder,
    ZIP_LOCALITY_QUALIFIER,
};
pub use output::{ResultsPage, RouteStopSummary, RouteSummary, SpotCard};
pub use pagination::{Pagination, PAGE_SIZE};
pub use parser::parse_spots;
pub use routing::{
    stop_label, OsrmRouter, RouteInstruction, RouteSelection, Router, ToggleOutcome,
    TravelProfile, WalkingRoute, MAX_ROUTE_SPOTS, METERS_PER_MILE,
};
pub use search::{
    apply_filters, filter_by_distance, filter_by_text, is_zip_code, FilterCriteria, SpotMatch,
    DEFAULT_RADIUS_MILES,
};
pub use session::{QueryState, RequestToken, SearchOrigin, Session};
pub use spot::{normalize_borough, Spot, SpotId, UNKNOWN};
