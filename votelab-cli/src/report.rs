//! Run reports: text summary, JSON document and per-step signal CSV.

use anyhow::{Context, Result};
use std::path::Path;
use votelab_core::indicators::value_at;
use votelab_core::{PipelineOutput, PriceSeries, ProfileSet, TransitionKind};

/// Transitions listed in the text summary; the JSON report carries all of them.
const MAX_LISTED_TRANSITIONS: usize = 10;

fn kind_label(kind: TransitionKind) -> &'static str {
    match kind {
        TransitionKind::Buy => "BUY",
        TransitionKind::Sell => "SELL",
    }
}

/// Human-readable summary of one run.
pub fn render_summary(series: &PriceSeries, output: &PipelineOutput, horizon: &str) -> String {
    let summary = &output.summary;
    let mut lines = vec![
        String::new(),
        "=== Vote Result ===".to_string(),
        format!("Run:            {}", output.fingerprint.short_id()),
        format!("Horizon:        {horizon}"),
        format!("Indicators:     {}", output.selection),
    ];

    match (series.points().first(), series.points().last()) {
        (Some(first), Some(last)) => lines.push(format!(
            "Period:         {} to {} ({} points)",
            first.timestamp.format("%Y-%m-%d %H:%M"),
            last.timestamp.format("%Y-%m-%d %H:%M"),
            series.len()
        )),
        _ => lines.push("Period:         (empty series)".to_string()),
    }

    lines.push(format!(
        "Bullish steps:  {} ({:.1}%)",
        summary.bullish_count,
        summary.bullish_ratio() * 100.0
    ));
    lines.push(format!("Buy events:     {}", summary.buy_events));
    lines.push(format!("Sell events:    {}", summary.sell_events));

    if let (Some(record), Some(point)) = (output.records.last(), series.points().last()) {
        lines.push(format!(
            "Latest:         {} at {:.4} ({} buy / {} sell / {} abstain)",
            if record.signal { "BULLISH" } else { "BEARISH" },
            point.price,
            record.buy_votes,
            record.sell_votes,
            record.abstentions(output.selection.len())
        ));
    }

    if !summary.transitions.is_empty() {
        lines.push(String::new());
        lines.push("--- Transitions ---".to_string());
        let skip = summary.transitions.len().saturating_sub(MAX_LISTED_TRANSITIONS);
        if skip > 0 {
            lines.push(format!("({skip} earlier transitions omitted)"));
        }
        for event in &summary.transitions[skip..] {
            lines.push(format!(
                "{}  {:<4}  {:.4}",
                event.timestamp.format("%Y-%m-%d %H:%M"),
                kind_label(event.kind),
                event.price
            ));
        }
    }

    lines.push(String::new());
    lines.join("\n")
}

/// Serialize the full pipeline output to pretty JSON.
pub fn export_json(output: &PipelineOutput) -> Result<String> {
    serde_json::to_string_pretty(output).context("failed to serialize pipeline output to JSON")
}

/// One row per step: timestamp, price, vote tally, then every derived series.
///
/// Undefined indicator values are written as empty cells.
pub fn export_signals_csv(series: &PriceSeries, output: &PipelineOutput) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    let mut header = vec![
        "index".to_string(),
        "timestamp".to_string(),
        "price".to_string(),
        "buy_votes".to_string(),
        "sell_votes".to_string(),
        "signal".to_string(),
    ];
    header.extend(output.indicators.names().map(str::to_string));
    wtr.write_record(&header)?;

    for (i, (point, record)) in series.points().iter().zip(&output.records).enumerate() {
        let mut row = vec![
            i.to_string(),
            point.timestamp.to_rfc3339(),
            format!("{:.6}", point.price),
            record.buy_votes.to_string(),
            record.sell_votes.to_string(),
            record.signal.to_string(),
        ];
        row.extend(output.indicators.iter().map(|(_, values)| {
            value_at(values, i).map_or(String::new(), |v| format!("{v:.6}"))
        }));
        wtr.write_record(&row)?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

pub fn write_signals_csv(path: &Path, series: &PriceSeries, output: &PipelineOutput) -> Result<()> {
    let csv = export_signals_csv(series, output)?;
    std::fs::write(path, csv)
        .with_context(|| format!("failed to write signals CSV {}", path.display()))
}

/// Table of every resolved profile.
pub fn render_profiles(profiles: &ProfileSet) -> String {
    let mut lines = vec![
        format!(
            "{:<10} {:>5} {:>5} {:>5} {:>10} {:>10} {:>12} {:>10}",
            "Profile", "SMA", "EMA", "RSI", "MACD fast", "MACD slow", "MACD signal", "BB window"
        ),
        "-".repeat(74),
    ];
    for (label, p) in profiles.iter() {
        lines.push(format!(
            "{:<10} {:>5} {:>5} {:>5} {:>10} {:>10} {:>12} {:>10}",
            label, p.sma, p.ema, p.rsi, p.macd_fast, p.macd_slow, p.macd_signal, p.bb_window
        ));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use votelab_core::{IndicatorParams, IndicatorSelection, PricePoint};

    fn series(prices: &[f64]) -> PriceSeries {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        PriceSeries::new(
            prices
                .iter()
                .enumerate()
                .map(|(i, &p)| PricePoint::new(base + Duration::days(i as i64), p))
                .collect(),
        )
        .unwrap()
    }

    fn sma_run(prices: &[f64], window: usize) -> (PriceSeries, PipelineOutput) {
        let s = series(prices);
        let params = IndicatorParams {
            sma: window,
            ..IndicatorParams::short()
        };
        let out =
            votelab_core::run(&s, &IndicatorSelection::parse("SMA").unwrap(), &params).unwrap();
        (s, out)
    }

    #[test]
    fn signals_csv_leaves_warmup_cells_empty() {
        let (s, out) = sma_run(&[10.0, 12.0, 11.0], 2);
        let csv = export_signals_csv(&s, &out).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "index,timestamp,price,buy_votes,sell_votes,signal,sma_2");
        assert!(lines[1].ends_with(",0,0,false,"));
        assert!(lines[2].ends_with(",1,0,true,11.000000"));
        assert!(lines[3].ends_with(",0,1,false,11.500000"));
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn summary_lists_transitions() {
        let (s, out) = sma_run(&[10.0, 12.0, 11.0], 2);
        let text = render_summary(&s, &out, "short");
        assert!(text.contains("Horizon:        short"));
        assert!(text.contains("Bullish steps:  1 (33.3%)"));
        assert!(text.contains("BUY"));
        assert!(text.contains("SELL"));
        assert!(text.contains("BEARISH at 11.0000 (0 buy / 1 sell / 0 abstain)"));
    }

    #[test]
    fn summary_of_empty_series() {
        let (s, out) = sma_run(&[], 2);
        let text = render_summary(&s, &out, "long");
        assert!(text.contains("(empty series)"));
        assert!(!text.contains("Latest:"));
    }

    #[test]
    fn json_report_has_fingerprint_and_records() {
        let (_, out) = sma_run(&[10.0, 12.0], 2);
        let value: serde_json::Value = serde_json::from_str(&export_json(&out).unwrap()).unwrap();
        assert_eq!(value["fingerprint"]["run_id"].as_str().map(str::len), Some(64));
        assert_eq!(value["records"].as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn profile_table_has_one_row_per_label() {
        let text = render_profiles(&ProfileSet::builtin());
        assert_eq!(text.lines().count(), 4);
        assert!(text.lines().nth(2).unwrap().starts_with("long"));
    }
}
