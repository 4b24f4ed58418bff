//! Maps normalized ZIP codes to weather stations, backed by a static dataset
//! bundled into the binary. Lookup is O(1) over a prebuilt map; search walks
//! all records, which stays interactive for a dataset bounded in the tens of
//! thousands of entries.

use crate::stations::error::StationIndexError;
use crate::types::station::StationRecord;
use log::info;
use std::collections::HashMap;

const BUNDLED_DATASET: &str = include_str!("../../data/zip_stations.json");
const DEFAULT_SEARCH_LIMIT: usize = 10;

/// Normalizes a loosely formatted ZIP code to exactly 5 digits.
///
/// Strips every non-digit character, truncates to the first 5 digits, and
/// left-zero-pads shorter inputs. Inputs with no digits at all yield `None`.
///
/// # Examples
///
/// ```
/// use frostcast::normalize_zip;
///
/// assert_eq!(normalize_zip("98765-4321").as_deref(), Some("98765"));
/// assert_eq!(normalize_zip("1").as_deref(), Some("00001"));
/// assert_eq!(normalize_zip("zip please"), None);
/// ```
pub fn normalize_zip(raw: &str) -> Option<String> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    let truncated = &digits[..digits.len().min(5)];
    Some(format!("{truncated:0>5}"))
}

/// Immutable ZIP-to-station index.
///
/// Loaded once (from the bundled dataset or a caller-provided one) and read
/// thereafter; no method takes `&mut self`.
#[derive(Debug, Clone)]
pub struct StationIndex {
    records: Vec<StationRecord>,
    by_zip: HashMap<String, usize>,
}

impl StationIndex {
    /// Builds the index from the dataset bundled with the crate.
    pub fn bundled() -> Result<Self, StationIndexError> {
        Self::from_json(BUNDLED_DATASET)
    }

    /// Builds the index from a caller-provided JSON array of records, for
    /// deployments carrying their own ZIP coverage.
    pub fn from_json(json: &str) -> Result<Self, StationIndexError> {
        let records: Vec<StationRecord> = serde_json::from_str(json)?;
        if records.is_empty() {
            return Err(StationIndexError::EmptyDataset);
        }
        // First record wins on duplicate ZIPs, matching dataset order.
        let mut by_zip = HashMap::with_capacity(records.len());
        for (i, record) in records.iter().enumerate() {
            by_zip.entry(record.zip.clone()).or_insert(i);
        }
        info!("Loaded station index with {} ZIP records", records.len());
        Ok(StationIndex { records, by_zip })
    }

    /// Looks up the station record for a (loosely formatted) ZIP code.
    ///
    /// Returns `None` for ZIPs outside the dataset; unknown locations are an
    /// expected outcome, not an error.
    pub fn lookup(&self, raw_zip: &str) -> Option<&StationRecord> {
        let zip = normalize_zip(raw_zip)?;
        self.by_zip.get(&zip).map(|&i| &self.records[i])
    }

    /// Searches records whose ZIP starts with the query's digits or whose
    /// location name contains the query as a case-insensitive substring.
    ///
    /// Results keep dataset iteration order (no relevance ranking) and are
    /// capped at `limit` (default 10).
    pub fn search(&self, query: &str, limit: Option<usize>) -> Vec<&StationRecord> {
        let limit = limit.unwrap_or(DEFAULT_SEARCH_LIMIT);
        if limit == 0 {
            return Vec::new();
        }
        // Prefix matching uses the digits as typed, without zero-padding:
        // a query of "9" should match every 9xxxx ZIP, not only "00009".
        let digits: String = query.chars().filter(|c| c.is_ascii_digit()).collect();
        let needle = query.trim().to_lowercase();

        let mut matches = Vec::new();
        for record in &self.records {
            let zip_hit = !digits.is_empty() && record.zip.starts_with(&digits);
            let name_hit = !needle.is_empty() && record.location.to_lowercase().contains(&needle);
            if zip_hit || name_hit {
                matches.push(record);
                if matches.len() == limit {
                    break;
                }
            }
        }
        matches
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_and_pads() {
        assert_eq!(normalize_zip("98765-4321").as_deref(), Some("98765"));
        assert_eq!(normalize_zip("1").as_deref(), Some("00001"));
        assert_eq!(normalize_zip(" 02108 ").as_deref(), Some("02108"));
        assert_eq!(normalize_zip("abc123").as_deref(), Some("00123"));
        assert_eq!(normalize_zip("1234567890").as_deref(), Some("12345"));
    }

    #[test]
    fn normalize_rejects_digitless_input() {
        assert_eq!(normalize_zip(""), None);
        assert_eq!(normalize_zip("no digits here"), None);
        assert_eq!(normalize_zip("---"), None);
    }

    #[test]
    fn bundled_index_loads() {
        let index = StationIndex::bundled().expect("bundled dataset should parse");
        assert!(!index.is_empty());
    }

    #[test]
    fn lookup_normalizes_before_matching() {
        let index = StationIndex::bundled().unwrap();
        let direct = index.lookup("10001").expect("10001 is in the dataset");
        let messy = index.lookup("10001-1234").expect("ZIP+4 should normalize");
        assert_eq!(direct.zip, "10001");
        assert_eq!(direct, messy);
    }

    #[test]
    fn lookup_unknown_zip_is_none() {
        let index = StationIndex::bundled().unwrap();
        assert!(index.lookup("99999").is_none());
        assert!(index.lookup("not a zip").is_none());
    }

    #[test]
    fn search_matches_zip_prefix_without_padding() {
        let index = StationIndex::bundled().unwrap();
        let results = index.search("9", None);
        assert!(!results.is_empty());
        assert!(results.iter().all(|r| r.zip.starts_with('9')));
    }

    #[test]
    fn search_matches_location_substring() {
        let index = StationIndex::bundled().unwrap();
        let results = index.search("boston", None);
        assert!(results.iter().any(|r| r.zip == "02108"));
    }

    #[test]
    fn search_respects_limit() {
        let index = StationIndex::bundled().unwrap();
        let results = index.search("0", Some(2));
        assert!(results.len() <= 2);
        assert!(index.search("0", Some(0)).is_empty());
    }

    #[test]
    fn empty_dataset_is_rejected() {
        assert!(matches!(
            StationIndex::from_json("[]"),
            Err(StationIndexError::EmptyDataset)
        ));
    }
}
