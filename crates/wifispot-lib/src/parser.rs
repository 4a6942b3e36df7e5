//! Dataset row parsing.
//!
//! Turns the comma-separated WiFi hotspot export into [`Spot`] records. Header
//! names are matched case-insensitively against a small table of synonyms so
//! both the current and older exports of the city dataset load. Rows whose
//! coordinates are missing or not numeric never make it into the output.

use std::collections::BTreeMap;
use std::io::Read;

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::spot::{normalize_borough, Spot, SpotId, UNKNOWN};

/// Canonical field name -> header synonyms, in priority order.
const FIELD_SYNONYMS: &[(&str, &[&str])] = &[
    ("name", &["name"]),
    ("location", &["location"]),
    ("provider", &["provider"]),
    ("type", &["type"]),
    ("latitude", &["latitude"]),
    ("longitude", &["longitude"]),
    ("borough", &["borough", "boroname", "borocode"]),
    ("zipcode", &["zipcode", "postcode"]),
];

/// Parse raw dataset text into spots.
///
/// Never fails: an empty input or a missing header row yields an empty
/// collection, and malformed rows are skipped.
pub fn parse_spots(text: &str) -> Vec<Spot> {
    match parse_spots_from_reader(text.as_bytes()) {
        Ok(spots) => spots,
        Err(error) => {
            warn!(%error, "failed to read dataset header; treating dataset as empty");
            Vec::new()
        }
    }
}

/// Parse spots from any reader.
///
/// Only a failure to read the header row is reported as an error; individual
/// rows that cannot be read are logged and skipped.
pub fn parse_spots_from_reader<R: Read>(reader: R) -> Result<Vec<Spot>> {
    let mut csv_reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .quoting(false)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let columns = ColumnMap::from_headers(&headers);

    let mut spots = Vec::new();
    let mut next_id: SpotId = 0;
    let mut dropped = 0usize;

    for result in csv_reader.records() {
        let record = match result {
            Ok(record) => record,
            Err(error) => {
                warn!(%error, "skipping unreadable dataset row");
                continue;
            }
        };

        // Whitespace-only lines trim down to a single empty field.
        if record.len() == 1 && record.get(0).is_some_and(str::is_empty) {
            continue;
        }

        let id = next_id;
        next_id += 1;

        match columns.build_spot(id, &record) {
            Some(spot) => spots.push(spot),
            None => {
                dropped += 1;
                debug!(id, "dropping row with missing or invalid coordinates");
            }
        }
    }

    info!(
        loaded = spots.len(),
        dropped, "parsed WiFi spots from dataset"
    );
    Ok(spots)
}

/// Resolved column indices for each canonical field.
#[derive(Debug, Default)]
struct ColumnMap {
    indices: BTreeMap<&'static str, Vec<usize>>,
}

impl ColumnMap {
    fn from_headers(headers: &StringRecord) -> Self {
        let normalized: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();

        let mut indices = BTreeMap::new();
        for (canon, synonyms) in FIELD_SYNONYMS {
            let found: Vec<usize> = synonyms
                .iter()
                .filter_map(|alt| normalized.iter().position(|h| h == alt))
                .collect();
            indices.insert(*canon, found);
        }

        Self { indices }
    }

    /// First non-empty value among the columns mapped to `field`.
    fn first_value<'r>(&self, field: &str, record: &'r StringRecord) -> Option<&'r str> {
        self.indices
            .get(field)?
            .iter()
            .filter_map(|&i| record.get(i))
            .find(|value| !value.is_empty())
    }

    fn text_or_unknown(&self, field: &str, record: &StringRecord) -> String {
        self.first_value(field, record)
            .unwrap_or(UNKNOWN)
            .to_string()
    }

    fn coordinate(&self, field: &str, record: &StringRecord) -> Option<f64> {
        self.first_value(field, record)?
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
    }

    fn build_spot(&self, id: SpotId, record: &StringRecord) -> Option<Spot> {
        let latitude = self.coordinate("latitude", record)?;
        let longitude = self.coordinate("longitude", record)?;

        let location = self.text_or_unknown("location", record);
        let name = self
            .first_value("name", record)
            .map(str::to_string)
            .unwrap_or_else(|| location.clone());

        Some(Spot {
            id,
            name,
            location,
            provider: self.text_or_unknown("provider", record),
            kind: self.text_or_unknown("type", record),
            latitude,
            longitude,
            borough: normalize_borough(self.first_value("borough", record).unwrap_or("")),
            zipcode: self.text_or_unknown("zipcode", record),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Name,Location,Provider,Type,Latitude,Longitude,Borocode,Zipcode";

    #[test]
    fn empty_input_yields_no_spots() {
        assert!(parse_spots("").is_empty());
        assert!(parse_spots("\n\n").is_empty());
    }

    #[test]
    fn header_only_yields_no_spots() {
        assert!(parse_spots(HEADER).is_empty());
    }

    #[test]
    fn rows_without_valid_coordinates_are_dropped() {
        let text = format!(
            "{HEADER}\n\
             A,1 Main St,LinkNYC,Free,40.70,-74.00,1,10004\n\
             B,2 Main St,LinkNYC,Free,,-74.00,1,10004\n\
             C,3 Main St,LinkNYC,Free,north,-74.00,1,10004\n\
             D,4 Main St,LinkNYC,Free,40.71\n\
             E,5 Main St,LinkNYC,Free,40.72,-74.01,1,10004\n"
        );
        let spots = parse_spots(&text);
        let names: Vec<&str> = spots.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["A", "E"]);
        assert!(spots
            .iter()
            .all(|s| s.latitude.is_finite() && s.longitude.is_finite()));
    }

    #[test]
    fn identifiers_follow_row_position() {
        let text = format!(
            "{HEADER}\n\
             A,1 Main St,LinkNYC,Free,40.70,-74.00,1,10004\n\
             B,2 Main St,LinkNYC,Free,bad,-74.00,1,10004\n\
             \n\
             C,3 Main St,LinkNYC,Free,40.72,-74.01,1,10004\n"
        );
        let spots = parse_spots(&text);
        let ids: Vec<SpotId> = spots.iter().map(|s| s.id).collect();
        assert_eq!(ids, [0, 2]);
    }

    #[test]
    fn whitespace_only_lines_do_not_consume_ids() {
        let text = format!(
            "{HEADER}\n\
             A,1 Main St,LinkNYC,Free,40.70,-74.00,1,10004\n   \n\
             C,3 Main St,LinkNYC,Free,40.72,-74.01,1,10004\n"
        );
        let ids: Vec<SpotId> = parse_spots(&text).iter().map(|s| s.id).collect();
        assert_eq!(ids, [0, 1]);
    }

    #[test]
    fn headers_match_case_insensitively_and_fields_are_trimmed() {
        let text = "  NAME , latitude,LONGITUDE , PostCode\n  Cafe  , 40.7 , -73.9 , 11201 \n";
        let spots = parse_spots(text);
        assert_eq!(spots.len(), 1);
        assert_eq!(spots[0].name, "Cafe");
        assert_eq!(spots[0].zipcode, "11201");
        assert_eq!(spots[0].provider, UNKNOWN);
        assert_eq!(spots[0].borough, UNKNOWN);
    }

    #[test]
    fn borough_columns_are_checked_in_priority_order() {
        let text = "name,latitude,longitude,borocode,boroname,borough\n\
                    A,40.7,-73.9,3,Queens,\n\
                    B,40.7,-73.9,3,,\n\
                    C,40.7,-73.9,3,Queens,Bronx\n";
        let spots = parse_spots(text);
        assert_eq!(spots[0].borough, "Queens");
        assert_eq!(spots[1].borough, "Brooklyn");
        assert_eq!(spots[2].borough, "Bronx");
    }

    #[test]
    fn name_falls_back_to_location() {
        let text = "name,location,latitude,longitude\n,Union Square,40.73,-73.99\n,,40.73,-73.99\n";
        let spots = parse_spots(text);
        assert_eq!(spots[0].name, "Union Square");
        assert_eq!(spots[1].name, UNKNOWN);
        assert_eq!(spots[1].location, UNKNOWN);
    }

    #[test]
    fn missing_coordinate_columns_drop_every_row() {
        let text = "name,location\nA,Somewhere\n";
        assert!(parse_spots(text).is_empty());
    }
}
