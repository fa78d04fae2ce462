//! Tracked entity catalog.
//!
//! The static list of tickers the corpus covers. Consumed by the
//! presentation layer (`eqa companies`) only; the query path never
//! validates a ticker against it; an unknown ticker simply matches
//! nothing in the index.

pub const TRACKED_TICKERS: &[&str] = &[
    "AAPL", "MSFT", "NVDA", "GOOGL", "AMZN", "META", "TSLA", "AVGO", "ORCL", "ADBE", "CRM",
    "CSCO", "ACN", "AMD", "IBM", "INTU", "NOW", "TXN", "QCOM", "AMAT", "PANW", "MU", "INTC",
    "ADI", "LRCX", "KLAC", "SNPS", "CDNS", "MCHP", "NXPI", "MRVL", "FTNT", "WDAY", "TEAM",
    "SNOW",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_is_nonempty_and_unique() {
        assert_eq!(TRACKED_TICKERS.len(), 35);
        let mut seen = std::collections::HashSet::new();
        for t in TRACKED_TICKERS {
            assert!(seen.insert(t), "duplicate ticker {t}");
        }
    }
}
