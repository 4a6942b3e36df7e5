use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;

/// Sequential identifier assigned to a spot at parse time.
pub type SpotId = usize;

/// Placeholder used for text fields that were absent from the dataset row.
pub const UNKNOWN: &str = "Unknown";

/// Borough codes used by the city dataset, indexed by their numeric code.
const BOROUGH_CODES: [(&str, &str); 5] = [
    ("1", "Manhattan"),
    ("2", "Bronx"),
    ("3", "Brooklyn"),
    ("4", "Queens"),
    ("5", "Staten Island"),
];

/// A public WiFi access point loaded from the dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spot {
    pub id: SpotId,
    pub name: String,
    pub location: String,
    pub provider: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub latitude: f64,
    pub longitude: f64,
    pub borough: String,
    pub zipcode: String,
}

impl Spot {
    /// Geographic position of the spot.
    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }

    /// Text fields consulted by free-text search, in match order.
    pub fn searchable_fields(&self) -> [&str; 5] {
        [
            &self.name,
            &self.location,
            &self.provider,
            &self.borough,
            &self.zipcode,
        ]
    }

    /// Case-insensitive substring match against any searchable field.
    ///
    /// `needle` must already be lowercased.
    pub fn matches_text(&self, needle: &str) -> bool {
        self.searchable_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

/// Map a raw borough value to its canonical name.
///
/// Single-digit codes `1`..`5` resolve to the five borough names; any other
/// non-empty value is returned unchanged and an empty value becomes
/// [`UNKNOWN`].
pub fn normalize_borough(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return UNKNOWN.to_string();
    }

    BOROUGH_CODES
        .iter()
        .find(|(code, _)| *code == raw)
        .map(|(_, name)| (*name).to_string())
        .unwrap_or_else(|| raw.to_string())
}
