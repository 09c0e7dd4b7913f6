//! Price file loading.
//!
//! Two layouts, chosen by file extension:
//! - `.csv`: header `timestamp,price`; timestamps are RFC 3339, a plain
//!   `YYYY-MM-DD` date (midnight UTC) or epoch milliseconds.
//! - `.json`: a market-chart document `{"prices": [[ms, price], ...]}`.
//!
//! Files are read as-is: out-of-order or duplicate timestamps are rejected by
//! `PriceSeries`, not repaired here.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::Deserialize;
use std::path::Path;
use votelab_core::{PricePoint, PriceSeries};

#[derive(Debug, Deserialize)]
struct CsvRow {
    timestamp: String,
    price: f64,
}

#[derive(Debug, Deserialize)]
struct MarketChart {
    prices: Vec<(i64, f64)>,
}

/// Load a price series from `path`, dispatching on its extension.
pub fn load_prices(path: &Path) -> Result<PriceSeries> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    let series = match ext.as_deref() {
        Some("csv") => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("failed to open {}", path.display()))?;
            parse_csv(file)
        }
        Some("json") => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            parse_market_chart(&content)
        }
        _ => bail!(
            "unsupported price file '{}': expected a .csv or .json extension",
            path.display()
        ),
    }
    .with_context(|| format!("invalid price file {}", path.display()))?;

    tracing::debug!(path = %path.display(), points = series.len(), "loaded price series");
    Ok(series)
}

/// Parse `timestamp,price` CSV rows.
pub fn parse_csv<R: std::io::Read>(reader: R) -> Result<PriceSeries> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut points = Vec::new();
    for (i, row) in rdr.deserialize::<CsvRow>().enumerate() {
        // line 1 is the header
        let row = row.with_context(|| format!("malformed CSV row at line {}", i + 2))?;
        let timestamp = parse_timestamp(&row.timestamp)
            .with_context(|| format!("bad timestamp at line {}", i + 2))?;
        points.push(PricePoint::new(timestamp, row.price));
    }
    Ok(PriceSeries::new(points)?)
}

/// Parse a market-chart JSON document.
pub fn parse_market_chart(content: &str) -> Result<PriceSeries> {
    let chart: MarketChart =
        serde_json::from_str(content).context("expected {\"prices\": [[ms, price], ...]}")?;
    Ok(PriceSeries::from_millis(&chart.prices)?)
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    if let Ok(millis) = raw.parse::<i64>() {
        return Utc
            .timestamp_millis_opt(millis)
            .single()
            .with_context(|| format!("epoch milliseconds {millis} out of range"));
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("'{raw}' is not RFC 3339, YYYY-MM-DD or epoch milliseconds"))?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .with_context(|| format!("'{raw}' has no midnight"))?;
    Ok(Utc.from_utc_datetime(&midnight))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use votelab_core::SeriesError;

    fn temp_file(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn csv_with_mixed_timestamp_styles() {
        let file = temp_file(
            ".csv",
            "timestamp,price\n\
             2024-01-01,100.5\n\
             2024-01-02T12:00:00Z,101\n\
             1704326400000, 99.25\n",
        );
        let series = load_prices(file.path()).unwrap();
        assert_eq!(series.prices(), vec![100.5, 101.0, 99.25]);
        assert_eq!(
            series.get(2).unwrap().timestamp,
            Utc.with_ymd_and_hms(2024, 1, 4, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn market_chart_json() {
        let file = temp_file(
            ".JSON",
            r#"{"prices": [[1700000000000, 35000.1], [1700003600000, 35100.0]],
                "total_volumes": []}"#,
        );
        let series = load_prices(file.path()).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.latest().unwrap().price, 35100.0);
    }

    #[test]
    fn out_of_order_rows_are_rejected() {
        let csv = "timestamp,price\n2024-01-02,1\n2024-01-01,2\n";
        let err = parse_csv(csv.as_bytes()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<SeriesError>(),
            Some(&SeriesError::NonMonotonicTimestamp { index: 1 })
        );
    }

    #[test]
    fn non_positive_price_is_rejected() {
        let err = parse_market_chart(r#"{"prices": [[0, 0.0]]}"#).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SeriesError>(),
            Some(SeriesError::InvalidPrice { index: 0, .. })
        ));
    }

    #[test]
    fn bad_timestamp_names_the_line() {
        let err = parse_csv("timestamp,price\n2024-01-01,1\nyesterday,2\n".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("line 3"));
    }

    #[test]
    fn unknown_extension_fails() {
        let file = temp_file(".parquet", "");
        assert!(load_prices(file.path()).is_err());
    }

    #[test]
    fn empty_csv_is_an_empty_series() {
        let series = parse_csv("timestamp,price\n".as_bytes()).unwrap();
        assert!(series.is_empty());
    }
}
