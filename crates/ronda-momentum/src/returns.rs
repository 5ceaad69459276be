//! Period-over-period returns from a price and its lag.

use ronda_traits::{Result, RondaError, defined};

/// Simple return `price / lagged - 1` for one observation.
///
/// Returns `Ok(None)` when either input is missing. A defined price over a
/// zero lagged price, or any other combination that does not produce a finite
/// return, is an [`RondaError::EvaluationFailure`] naming the asset and period.
pub fn period_return(
    asset: &str,
    period: usize,
    price: Option<f64>,
    lagged: Option<f64>,
) -> Result<Option<f64>> {
    let (Some(price), Some(lagged)) = (defined(price), defined(lagged)) else {
        return Ok(None);
    };

    if lagged == 0.0 {
        return Err(RondaError::evaluation(
            asset,
            period,
            format!("division by zero: lagged price is 0 (current price {price})"),
        ));
    }

    let value = price / lagged - 1.0;
    if !value.is_finite() {
        return Err(RondaError::evaluation(
            asset,
            period,
            format!("non-finite return from {price} / {lagged}"),
        ));
    }
    Ok(Some(value))
}

/// Row-wise [`period_return`] over aligned price and lagged-price series.
pub fn period_returns(
    asset: &str,
    period: usize,
    prices: &[Option<f64>],
    lagged: &[Option<f64>],
) -> Result<Vec<Option<f64>>> {
    if prices.len() != lagged.len() {
        return Err(RondaError::evaluation(
            asset,
            period,
            format!(
                "price and lag series are misaligned ({} vs {} rows)",
                prices.len(),
                lagged.len()
            ),
        ));
    }

    prices
        .iter()
        .zip(lagged)
        .map(|(price, lag)| period_return(asset, period, *price, *lag))
        .collect()
}
