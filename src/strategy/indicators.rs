use crate::config::MaWindows;
use serde::{Deserialize, Serialize};

//simple moving average over each trailing window of closes
//the first window - 1 values are undefined
//each mean is summed from scratch so equal inputs always give equal outputs
pub fn rolling_sma(closes: &[f64], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; closes.len()];
    }

    let defined = closes
        .windows(window)
        .map(|slice| Some(slice.iter().sum::<f64>() / window as f64));

    std::iter::repeat(None)
        .take(window.saturating_sub(1).min(closes.len()))
        .chain(defined)
        .collect()
}

//the three moving averages for every bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSet {
    pub ma_short: Vec<Option<f64>>,
    pub ma_medium: Vec<Option<f64>>,
    pub ma_season: Vec<Option<f64>>,
}

impl IndicatorSet {
    //builds all three averages; the windows are independent so they run in parallel
    pub fn build(closes: &[f64], windows: &MaWindows) -> Self {
        let ((ma_short, ma_medium), ma_season) = rayon::join(
            || {
                rayon::join(
                    || rolling_sma(closes, windows.short),
                    || rolling_sma(closes, windows.medium),
                )
            },
            || rolling_sma(closes, windows.season),
        );

        IndicatorSet {
            ma_short,
            ma_medium,
            ma_season,
        }
    }

    pub fn len(&self) -> usize {
        self.ma_short.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ma_short.is_empty()
    }
}
