//! Defines the data structures representing ZIP-code station mappings used by
//! the station index. Each record ties a US ZIP code to its nearest NOAA/NWS
//! observation station plus a handful of alternates.

use serde::{Deserialize, Serialize};

/// A single entry in the station index: one ZIP code mapped to its primary
/// weather station and alternates.
///
/// Records are loaded once from the static dataset and never mutated.
/// The `zip` field is always exactly 5 digits, zero-padded.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StationRecord {
    /// Normalized 5-digit ZIP code (e.g., "02108").
    pub zip: String,
    /// Human-readable place name (e.g., "Boston, MA").
    pub location: String,
    /// Latitude of the ZIP centroid in decimal degrees.
    pub latitude: f64,
    /// Longitude of the ZIP centroid in decimal degrees.
    pub longitude: f64,
    /// Elevation above sea level in meters.
    pub elevation_meters: f64,
    /// The closest station with usable climate normals.
    pub primary_station: StationRef,
    /// Further station IDs, ordered by distance, used to widen normals queries.
    #[serde(default)]
    pub alternate_stations: Vec<String>,
}

/// Identity and distance of a station relative to a ZIP centroid.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StationRef {
    /// The station identifier (e.g., "GHCND:USW00014739").
    pub id: String,
    /// The station's display name.
    pub name: String,
    /// Distance from the ZIP centroid in meters.
    pub distance_meters: f64,
}

impl StationRecord {
    /// Primary station ID followed by the alternates, in dataset order.
    ///
    /// This is the station set handed to the normals client, so a ZIP with
    /// sparse primary-station coverage can still be summarized from nearby
    /// stations in the same request.
    pub fn station_ids(&self) -> Vec<String> {
        let mut ids = Vec::with_capacity(1 + self.alternate_stations.len());
        ids.push(self.primary_station.id.clone());
        ids.extend(self.alternate_stations.iter().cloned());
        ids
    }
}
