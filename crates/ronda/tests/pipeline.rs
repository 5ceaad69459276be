//! End-to-end tests: frame in, engine run, frame out.

use approx::assert_relative_eq;
use chrono::NaiveDate;
use polars::prelude::*;
use ronda::{Engine, EngineConfig, RondaError, TimeSeriesTable, create_transform};

fn month_starts(n: usize) -> Vec<NaiveDate> {
    (0..n)
        .map(|m| {
            NaiveDate::from_ymd_opt(2019 + (m / 12) as i32, (m % 12) as u32 + 1, 1).unwrap()
        })
        .collect()
}

/// SPY doubles every month, TLT is flat, AGG is integer-typed and flat.
fn price_frame(n: usize) -> DataFrame {
    let spy: Vec<f64> = (0..n).map(|t| 2f64.powi(t as i32)).collect();
    let tlt = vec![95.5; n];
    let agg = vec![100i64; n];
    df!(
        "date" => month_starts(n),
        "SPY" => spy,
        "TLT" => tlt,
        "AGG" => agg,
    )
    .unwrap()
}

#[test]
fn test_frame_through_engine() {
    let prices = TimeSeriesTable::from_dataframe(&price_frame(16), "date").unwrap();
    assert_eq!(prices.column_names(), vec!["SPY", "TLT", "AGG"]);

    let output = Engine::default().run(&prices).unwrap();

    let smoothed = output.smoothed.unwrap();
    assert_eq!(smoothed.len(), 7);
    assert_eq!(smoothed.times()[0], month_starts(16)[9]);
    assert_eq!(
        smoothed.column_names(),
        vec!["SPY", "SPY_SMA", "TLT", "TLT_SMA", "AGG", "AGG_SMA"]
    );
    for value in smoothed.values("TLT_SMA").unwrap() {
        assert_relative_eq!(value.unwrap(), 95.5, epsilon = 1e-12);
    }

    let scores = output.scores;
    assert_eq!(scores.len(), 4);
    assert_eq!(scores.times(), &month_starts(16)[12..]);
    for ((spy, tlt), agg) in scores
        .values("SPY")
        .unwrap()
        .into_iter()
        .zip(scores.values("TLT").unwrap())
        .zip(scores.values("AGG").unwrap())
    {
        assert_relative_eq!(spy.unwrap(), 1065.25, epsilon = 1e-9);
        assert_relative_eq!(tlt.unwrap(), 0.0, epsilon = 1e-12);
        assert_relative_eq!(agg.unwrap(), 0.0, epsilon = 1e-12);
    }

    let frame = scores.to_dataframe().unwrap();
    assert_eq!(frame.height(), 4);
    assert_eq!(frame.width(), 4);
    assert_eq!(frame.get_column_names()[0].as_str(), "date");
}

#[test]
fn test_config_driven_engine() {
    let config = EngineConfig::from_toml_str(
        r#"
        [rolling]
        lookback = 2
        suffix = "_AVG"

        [momentum]
        scale = 1.0
        periods = [{ period = 1, weight = 1.0 }]
        "#,
    )
    .unwrap();
    let engine = Engine::new(&config).unwrap();

    let prices = TimeSeriesTable::from_dataframe(&price_frame(4), "date").unwrap();
    let output = engine.run(&prices).unwrap();

    let smoothed = output.smoothed.unwrap();
    assert_eq!(smoothed.len(), 3);
    assert_eq!(
        smoothed.values("SPY_AVG").unwrap(),
        vec![Some(1.5), Some(3.0), Some(6.0)]
    );

    // one-period return of a doubling series
    assert_eq!(output.scores.len(), 3);
    assert_eq!(
        output.scores.values("SPY").unwrap(),
        vec![Some(1.0), Some(1.0), Some(1.0)]
    );
}

#[test]
fn test_zero_price_fails_the_run() {
    let n = 16;
    let mut tlt = vec![10.0; n];
    tlt[4] = 0.0;
    let prices = TimeSeriesTable::from_columns(
        month_starts(n),
        vec![("SPY", vec![1.0; n]), ("TLT", tlt)],
    )
    .unwrap();

    let err = Engine::default().run(&prices).unwrap_err();
    assert!(matches!(
        err,
        RondaError::EvaluationFailure { ref asset, period: 1, .. } if asset == "TLT"
    ));
}

#[test]
fn test_registry_chain() {
    let config = EngineConfig::default();
    let prices = TimeSeriesTable::from_dataframe(&price_frame(14), "date").unwrap();

    let lagged = create_transform("lag", &config).unwrap().apply(&prices).unwrap();
    assert_eq!(lagged.len(), 14);
    assert_eq!(lagged.values("SPY_LAG1").unwrap()[0], None);

    let dense = create_transform("dropna", &config)
        .unwrap()
        .apply(&lagged)
        .unwrap();
    assert_eq!(dense.len(), 13);
    assert_eq!(dense.times()[0], prices.times()[1]);

    let scores = create_transform("momentum", &config)
        .unwrap()
        .apply(&prices)
        .unwrap();
    assert_eq!(scores.len(), 2);
}

#[test]
fn test_missing_date_column() {
    let frame = price_frame(3).drop("date").unwrap();
    let result = TimeSeriesTable::from_dataframe(&frame, "date");
    assert!(matches!(result, Err(RondaError::ColumnNotFound(ref c)) if c == "date"));
}

#[test]
fn test_config_from_file() {
    let path = std::env::temp_dir().join(format!("ronda-pipeline-{}.toml", std::process::id()));
    std::fs::write(&path, "[lag]\nperiods = 3\ndrop_leading = true\n").unwrap();

    let config = EngineConfig::from_file(&path);
    std::fs::remove_file(&path).unwrap();

    let config = config.unwrap();
    assert_eq!(config.lag.periods, 3);
    assert!(config.lag.drop_leading);
    assert_eq!(config.rolling, ronda::RollingAverageConfig::default());
}
