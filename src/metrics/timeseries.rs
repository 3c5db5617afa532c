use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

//a point in the equity curve
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct EquityPoint {
    pub date: NaiveDate,
    pub equity: f64,
    //equity over running peak minus one, zero or negative
    pub drawdown: f64,
    pub returns: f64,
}

//drawdown of every bar against the running peak of the curve itself
pub fn drawdown_series(equity: &[f64]) -> Vec<f64> {
    let mut peak = f64::NEG_INFINITY;

    equity
        .iter()
        .map(|&value| {
            peak = peak.max(value);
            value / peak - 1.0
        })
        .collect()
}

//most negative drawdown, zero for an empty curve
pub fn max_drawdown(equity: &[f64]) -> f64 {
    drawdown_series(equity).into_iter().fold(0.0, f64::min)
}

//final equity over the seed, minus one
pub fn total_return(equity: &[f64], initial_equity: f64) -> f64 {
    match equity.last() {
        Some(last) => last / initial_equity - 1.0,
        None => 0.0,
    }
}

//share of strictly positive returns among the non-zero ones
//flat bars are left out of the denominator; none when every bar is flat
pub fn win_rate(returns: &[f64]) -> Option<f64> {
    let (wins, counted) = returns
        .iter()
        .filter(|r| **r != 0.0)
        .fold((0usize, 0usize), |(wins, counted), r| {
            (wins + usize::from(*r > 0.0), counted + 1)
        });

    if counted == 0 {
        None
    } else {
        Some(wins as f64 / counted as f64)
    }
}

//number of bars whose exposure differs from the bar before
//the first bar is compared against the seed exposure
pub fn count_trades<T: PartialEq + Copy>(exposures: &[T], initial: T) -> usize {
    let mut previous = initial;
    let mut trades = 0;

    for &exposure in exposures {
        if exposure != previous {
            trades += 1;
        }
        previous = exposure;
    }

    trades
}

//builds the curve from dates, equity values and per-bar returns
pub fn calculate_equity_curve(
    dates: &[NaiveDate],
    equity_values: &[f64],
    returns: &[f64],
) -> Vec<EquityPoint> {
    let drawdowns = drawdown_series(equity_values);

    dates
        .iter()
        .zip(equity_values)
        .zip(returns)
        .zip(drawdowns)
        .map(|(((&date, &equity), &returns), drawdown)| EquityPoint {
            date,
            equity,
            drawdown,
            returns,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drawdown_tracks_running_peak() {
        let dd = drawdown_series(&[1.0, 1.2, 0.9, 1.5]);
        assert_eq!(dd[0], 0.0);
        assert_eq!(dd[1], 0.0);
        assert!((dd[2] - (0.9 / 1.2 - 1.0)).abs() < 1e-15);
        assert_eq!(dd[3], 0.0);
        assert!((max_drawdown(&[1.0, 1.2, 0.9, 1.5]) + 0.25).abs() < 1e-12);
    }

    #[test]
    fn win_rate_ignores_flat_bars() {
        assert_eq!(win_rate(&[0.0, 0.01, -0.02, 0.0, 0.03]), Some(2.0 / 3.0));
        assert_eq!(win_rate(&[0.0, 0.0]), None);
        assert_eq!(win_rate(&[]), None);
    }

    #[test]
    fn trades_count_on_leverage_switches() {
        assert_eq!(count_trades(&[0.0, 0.0, 1.0, 1.0, -1.0, -1.0], 0.0), 2);
        assert_eq!(count_trades(&[1.0, 1.0], 0.0), 1);
        assert_eq!(count_trades(&[3_i64, 3, 0], 0), 2);
    }

    #[test]
    fn total_return_normalizes_by_seed() {
        assert!((total_return(&[100.0, 150.0], 100.0) - 0.5).abs() < 1e-15);
        assert_eq!(total_return(&[], 1.0), 0.0);
    }
}
