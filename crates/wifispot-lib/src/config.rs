//! External service endpoints and their environment overrides.

use std::env;
use std::time::Duration;

/// NYC Open Data export of the public WiFi hotspot locations.
pub const DEFAULT_DATASET_URL: &str =
    "https://data.cityofnewyork.us/api/views/yjub-udmw/rows.csv?accessType=DOWNLOAD";
/// Nominatim free-text search endpoint.
pub const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org/search";
/// Public OSRM demo server.
pub const DEFAULT_ROUTER_URL: &str = "https://router.project-osrm.org";

pub const DATASET_URL_ENV: &str = "WIFISPOT_DATASET_URL";
pub const GEOCODER_URL_ENV: &str = "WIFISPOT_GEOCODER_URL";
pub const ROUTER_URL_ENV: &str = "WIFISPOT_ROUTER_URL";

/// Timeout applied to every outbound HTTP request.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Base URLs for the dataset download and the geocoding/routing collaborators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEndpoints {
    pub dataset_url: String,
    pub geocoder_url: String,
    pub router_url: String,
}

impl Default for ServiceEndpoints {
    fn default() -> Self {
        Self {
            dataset_url: DEFAULT_DATASET_URL.to_string(),
            geocoder_url: DEFAULT_GEOCODER_URL.to_string(),
            router_url: DEFAULT_ROUTER_URL.to_string(),
        }
    }
}

impl ServiceEndpoints {
    /// Defaults overridden by any non-empty `WIFISPOT_*_URL` variables.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        if let Some(url) = read(DATASET_URL_ENV) {
            self.dataset_url = url;
        }
        if let Some(url) = read(GEOCODER_URL_ENV) {
            self.geocoder_url = url;
        }
        if let Some(url) = read(ROUTER_URL_ENV) {
            self.router_url = url;
        }
        self
    }
}

/// User agent sent to every external service.
///
/// Nominatim's usage policy rejects requests without an identifying agent.
pub(crate) fn user_agent() -> String {
    format!("wifispot-lib/{}", env!("CARGO_PKG_VERSION"))
}

pub(crate) fn build_client() -> crate::Result<reqwest::blocking::Client> {
    reqwest::blocking::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .user_agent(user_agent())
        .build()
        .map_err(crate::Error::Http)
}
