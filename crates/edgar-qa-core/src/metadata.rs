//! Filing metadata extraction from a structured location descriptor.
//!
//! A filing's location descriptor is the 4-level hierarchy
//! `entity / filing-type / accession / filename`. Descriptors with
//! fewer levels do not fail: missing fields degrade to the [`UNKNOWN`]
//! sentinel so that a downstream ticker filter on such a record is
//! still well-defined (it matches nothing the caller asked for).

use crate::models::FilingMeta;

/// Sentinel for metadata fields that could not be derived.
pub const UNKNOWN: &str = "UNKNOWN";

impl FilingMeta {
    /// Derive filing metadata from the trailing components of a
    /// location descriptor.
    ///
    /// With a full descriptor the last four components are
    /// `ticker / filing_type / accession / filename`; shorter
    /// descriptors fill the missing leading fields with [`UNKNOWN`].
    /// The filename is always the final component (empty descriptors
    /// get an `UNKNOWN` filename).
    pub fn from_locator(parts: &[&str]) -> Self {
        let n = parts.len();
        let level = |offset: usize| {
            if n >= offset {
                parts[n - offset].to_string()
            } else {
                UNKNOWN.to_string()
            }
        };

        Self {
            ticker: level(4),
            filing_type: level(3),
            accession_number: level(2),
            filename: level(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_descriptor_maps_positionally() {
        let meta = FilingMeta::from_locator(&["AAPL", "10-K", "0000320193-24-000123", "filing.html"]);
        assert_eq!(meta.ticker, "AAPL");
        assert_eq!(meta.filing_type, "10-K");
        assert_eq!(meta.accession_number, "0000320193-24-000123");
        assert_eq!(meta.filename, "filing.html");
    }

    #[test]
    fn deeper_descriptor_uses_trailing_levels() {
        let meta = FilingMeta::from_locator(&["data", "raw", "MSFT", "10-Q", "acc-001", "doc.html"]);
        assert_eq!(meta.ticker, "MSFT");
        assert_eq!(meta.filing_type, "10-Q");
    }

    #[test]
    fn short_descriptor_degrades_to_unknown() {
        let meta = FilingMeta::from_locator(&["acc-001", "doc.html"]);
        assert_eq!(meta.ticker, UNKNOWN);
        assert_eq!(meta.filing_type, UNKNOWN);
        assert_eq!(meta.accession_number, "acc-001");
        assert_eq!(meta.filename, "doc.html");
    }

    #[test]
    fn bare_filename() {
        let meta = FilingMeta::from_locator(&["doc.html"]);
        assert_eq!(meta.ticker, UNKNOWN);
        assert_eq!(meta.filing_type, UNKNOWN);
        assert_eq!(meta.accession_number, UNKNOWN);
        assert_eq!(meta.filename, "doc.html");
    }

    #[test]
    fn empty_descriptor_is_all_unknown() {
        let meta = FilingMeta::from_locator(&[]);
        assert_eq!(meta.ticker, UNKNOWN);
        assert_eq!(meta.filename, UNKNOWN);
    }
}
