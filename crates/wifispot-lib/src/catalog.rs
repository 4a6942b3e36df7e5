use std::collections::{BTreeSet, HashMap};
use std::io::Read;

use strsim::jaro_winkler;

use crate::error::Result;
use crate::geo::GeoPoint;
use crate::parser::{parse_spots, parse_spots_from_reader};
use crate::spot::{Spot, SpotId};

/// Minimum Jaro-Winkler similarity for a vocabulary suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.8;

/// In-memory collection of every spot loaded from the dataset.
///
/// The catalog is built once and never mutated; searches produce new derived
/// sequences.
#[derive(Debug, Clone, Default)]
pub struct SpotCatalog {
    spots: Vec<Spot>,
    index: HashMap<SpotId, usize>,
}

impl SpotCatalog {
    /// Build a catalog from already-parsed spots.
    pub fn new(spots: Vec<Spot>) -> Self {
        let index = spots
            .iter()
            .enumerate()
            .map(|(position, spot)| (spot.id, position))
            .collect();
        Self { spots, index }
    }

    /// Parse raw dataset text into a catalog.
    pub fn from_text(text: &str) -> Self {
        Self::new(parse_spots(text))
    }

    /// Parse a catalog from a reader (e.g., file or in-memory buffer).
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(Self::new(parse_spots_from_reader(reader)?))
    }

    /// All spots in dataset order.
    pub fn spots(&self) -> &[Spot] {
        &self.spots
    }

    pub fn len(&self) -> usize {
        self.spots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spots.is_empty()
    }

    /// Lookup a spot by identifier.
    pub fn get(&self, id: SpotId) -> Option<&Spot> {
        self.index.get(&id).map(|&position| &self.spots[position])
    }

    pub fn contains(&self, id: SpotId) -> bool {
        self.index.contains_key(&id)
    }

    /// Distinct borough names present in the dataset, sorted.
    pub fn boroughs(&self) -> Vec<String> {
        vocabulary(self.spots.iter().map(|spot| spot.borough.as_str()))
    }

    /// Distinct connection types present in the dataset, sorted.
    pub fn types(&self) -> Vec<String> {
        vocabulary(self.spots.iter().map(|spot| spot.kind.as_str()))
    }

    /// Mean position of every spot whose zipcode equals `zip` exactly.
    pub fn zip_centroid(&self, zip: &str) -> Option<GeoPoint> {
        let (count, lat_sum, lng_sum) = self
            .spots
            .iter()
            .filter(|spot| spot.zipcode == zip)
            .fold((0usize, 0.0f64, 0.0f64), |(n, lat, lng), spot| {
                (n + 1, lat + spot.latitude, lng + spot.longitude)
            });

        if count == 0 {
            return None;
        }
        Some(GeoPoint::new(lat_sum / count as f64, lng_sum / count as f64))
    }

    /// Suggest vocabulary entries similar to `value`, best match first.
    ///
    /// `vocabulary` is typically [`SpotCatalog::boroughs`] or
    /// [`SpotCatalog::types`].
    pub fn fuzzy_vocabulary_matches(
        value: &str,
        vocabulary: &[String],
        limit: usize,
    ) -> Vec<String> {
        let needle = value.trim().to_lowercase();
        let mut scored: Vec<(f64, &String)> = vocabulary
            .iter()
            .map(|entry| (jaro_winkler(&needle, &entry.to_lowercase()), entry))
            .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
            .collect();

        scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(b.1)));
        scored
            .into_iter()
            .take(limit)
            .map(|(_, entry)| entry.clone())
            .collect()
    }
}

fn vocabulary<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    values
        .filter(|value| !value.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{sample_catalog, SpotBuilder};

    #[test]
    fn lookup_by_id_survives_gaps() {
        let catalog = SpotCatalog::new(vec![
            SpotBuilder::new(0).name("first").build(),
            SpotBuilder::new(2).name("third").build(),
        ]);
        assert_eq!(catalog.get(2).map(|s| s.name.as_str()), Some("third"));
        assert!(catalog.get(1).is_none());
        assert!(catalog.contains(0));
    }

    #[test]
    fn vocabularies_are_sorted_and_deduplicated() {
        let catalog = sample_catalog();
        assert_eq!(catalog.boroughs(), ["Brooklyn", "Manhattan", "Queens"]);
        assert_eq!(catalog.types(), ["Free", "Limited Free", "Partner Site"]);
    }

    #[test]
    fn zip_centroid_averages_matching_spots() {
        let catalog = SpotCatalog::new(vec![
            SpotBuilder::new(0).zipcode("10001").at(40.0, -74.0).build(),
            SpotBuilder::new(1).zipcode("10001").at(41.0, -73.0).build(),
            SpotBuilder::new(2).zipcode("10002").at(10.0, 10.0).build(),
        ]);
        let centroid = catalog.zip_centroid("10001").expect("zip present");
        assert!((centroid.lat - 40.5).abs() < 1e-9);
        assert!((centroid.lng + 73.5).abs() < 1e-9);
        assert!(catalog.zip_centroid("99999").is_none());
    }

    #[test]
    fn fuzzy_vocabulary_suggests_close_borough() {
        let catalog = sample_catalog();
        let boroughs = catalog.boroughs();
        let matches = SpotCatalog::fuzzy_vocabulary_matches("Brooklin", &boroughs, 2);
        assert_eq!(matches.first().map(String::as_str), Some("Brooklyn"));
        assert!(SpotCatalog::fuzzy_vocabulary_matches("zzzz", &boroughs, 2).is_empty());
    }
}
