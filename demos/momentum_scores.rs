//! Momentum scores for a small multi-asset universe.
//!
//! This example demonstrates:
//! - Loading an engine configuration (pass a TOML path as the first argument)
//! - Building a price table row by row with `TableBuilder`
//! - Scoring every asset with the 1/3/6/12-month composite
//! - Ranking assets by their latest score
//!
//! Run with `RUST_LOG=ronda=debug` to see the pipeline spans.

use chrono::{Months, NaiveDate};
use ronda::{Engine, EngineConfig, TableBuilder, TimeSeriesTable, init_tracing};

/// Universe with a monthly drift for each synthetic price path.
const UNIVERSE: &[(&str, f64)] = &[
    ("SPY", 0.010),
    ("EFA", 0.006),
    ("EEM", 0.004),
    ("TLT", -0.002),
    ("GLD", 0.008),
];

/// Number of monthly observations.
const MONTHS: u32 = 36;

fn main() -> anyhow::Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::default(),
    };
    init_tracing(&config.logging)?;

    let prices = synthetic_prices()?;
    tracing::info!(rows = prices.len(), assets = prices.width(), "prices generated");

    let engine = Engine::new(&config)?;
    let scores = engine.score(&prices)?;
    if scores.is_empty() {
        println!("Not enough history to score any month.");
        return Ok(());
    }

    let last = scores.len() - 1;
    let date = scores.times()[last];
    let mut ranked = Vec::with_capacity(scores.width());
    for name in scores.column_names() {
        if let Some(score) = scores.values(&name)?[last] {
            ranked.push((name, score));
        }
    }
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    println!("Momentum ranking as of {date}");
    println!("{:-<30}", "");
    for (rank, (asset, score)) in ranked.iter().enumerate() {
        println!("{:>2}. {asset:<6} {score:>12.4}", rank + 1);
    }
    println!("{:-<30}", "");
    println!("{} scored months", scores.len());

    Ok(())
}

/// Deterministic price paths with a drift and a small seasonal wobble.
fn synthetic_prices() -> anyhow::Result<TimeSeriesTable> {
    let names: Vec<&str> = UNIVERSE.iter().map(|(name, _)| *name).collect();
    let mut builder = TableBuilder::with_capacity(names, MONTHS as usize);
    let start = NaiveDate::from_ymd_opt(2021, 1, 31).ok_or_else(|| anyhow::anyhow!("bad start"))?;

    let mut levels = vec![100.0; UNIVERSE.len()];
    for month in 0..MONTHS {
        let date = start
            .checked_add_months(Months::new(month))
            .ok_or_else(|| anyhow::anyhow!("date overflow at month {month}"))?;
        let wobble = 0.01 * (f64::from(month) * 0.7).sin();
        for (level, (_, drift)) in levels.iter_mut().zip(UNIVERSE) {
            *level *= 1.0 + drift + wobble;
        }
        let row: Vec<Option<f64>> = levels.iter().copied().map(Some).collect();
        builder.push_row(date, &row)?;
    }

    Ok(builder.build()?)
}
