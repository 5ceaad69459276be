//! Rolling average and lag over a short daily price series.
//!
//! Shows the warm-up trimming of the rolling average, the leading gap left by
//! the lag operator, and how the row filter removes it.

use chrono::{Days, NaiveDate};
use ronda::{Lag, RollingAverage, RowFilter, TimeSeriesTable, Transform};

const CLOSES: &[f64] = &[
    101.2, 102.5, 101.9, 103.4, 104.0, 103.1, 105.6, 106.2, 105.8, 107.3, 108.1, 107.7,
];

fn main() -> anyhow::Result<()> {
    let start = NaiveDate::from_ymd_opt(2024, 3, 1).ok_or_else(|| anyhow::anyhow!("bad start"))?;
    let times = (0..CLOSES.len() as u64)
        .map(|d| {
            start
                .checked_add_days(Days::new(d))
                .ok_or_else(|| anyhow::anyhow!("date overflow"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    let prices = TimeSeriesTable::from_columns(times, vec![("QQQ", CLOSES.to_vec())])?;

    let sma = RollingAverage::with_lookback(5);
    let smoothed = sma.apply(&prices)?;
    println!(
        "{}-day average ({} of {} rows after warm-up)",
        sma.lookback(),
        smoothed.len(),
        prices.len()
    );
    for row in smoothed.rows()? {
        let close = row.get("QQQ").unwrap_or(f64::NAN);
        let mean = row.get("QQQ_SMA").unwrap_or(f64::NAN);
        println!("  {}  {close:>8.2}  {mean:>8.2}", row.time);
    }

    let lagged = Lag::with_periods(3).apply(&prices)?;
    let dense = RowFilter::any_missing().apply(&lagged)?;
    println!(
        "\n3-day lag: {} rows, {} after dropping the leading gap",
        lagged.len(),
        dense.len()
    );

    Ok(())
}
