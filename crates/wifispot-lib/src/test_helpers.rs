// Test-only helpers for `wifispot-lib` tests
#![allow(dead_code)]
use crate::catalog::SpotCatalog;
use crate::spot::{Spot, SpotId, UNKNOWN};

/// Builder to create `Spot` instances in tests with sensible defaults.
pub struct SpotBuilder {
    spot: Spot,
}

impl SpotBuilder {
    #[must_use]
    pub fn new(id: SpotId) -> Self {
        Self {
            spot: Spot {
                id,
                name: format!("Spot {id}"),
                location: UNKNOWN.to_string(),
                provider: UNKNOWN.to_string(),
                kind: "Free".to_string(),
                latitude: 40.7128,
                longitude: -74.0060,
                borough: "Manhattan".to_string(),
                zipcode: "10007".to_string(),
            },
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.spot.name = name.to_string();
        self
    }

    pub fn location(mut self, location: &str) -> Self {
        self.spot.location = location.to_string();
        self
    }

    pub fn provider(mut self, provider: &str) -> Self {
        self.spot.provider = provider.to_string();
        self
    }

    pub fn kind(mut self, kind: &str) -> Self {
        self.spot.kind = kind.to_string();
        self
    }

    pub fn at(mut self, latitude: f64, longitude: f64) -> Self {
        self.spot.latitude = latitude;
        self.spot.longitude = longitude;
        self
    }

    pub fn borough(mut self, borough: &str) -> Self {
        self.spot.borough = borough.to_string();
        self
    }

    pub fn zipcode(mut self, zipcode: &str) -> Self {
        self.spot.zipcode = zipcode.to_string();
        self
    }

    pub fn build(self) -> Spot {
        self.spot
    }
}

/// Small catalog spread across three boroughs, used by several unit tests.
pub fn sample_catalog() -> SpotCatalog {
    SpotCatalog::new(vec![
        SpotBuilder::new(0)
            .name("Bryant Park")
            .location("42nd St & 6th Ave")
            .provider("LinkNYC")
            .kind("Free")
            .at(40.7536, -73.9832)
            .borough("Manhattan")
            .zipcode("10018")
            .build(),
        SpotBuilder::new(1)
            .name("Grand Army Plaza")
            .location("Flatbush Ave")
            .provider("Spectrum")
            .kind("Limited Free")
            .at(40.6740, -73.9700)
            .borough("Brooklyn")
            .zipcode("11238")
            .build(),
        SpotBuilder::new(2)
            .name("Herald Square")
            .location("34th St & Broadway")
            .provider("LinkNYC")
            .kind("Free")
            .at(40.7497, -73.9877)
            .borough("Manhattan")
            .zipcode("10001")
            .build(),
        SpotBuilder::new(3)
            .name("Flushing Library")
            .location("41-17 Main St")
            .provider("Queens Library")
            .kind("Partner Site")
            .at(40.7580, -73.8300)
            .borough("Queens")
            .zipcode("11355")
            .build(),
    ])
}
