use crate::error::BacktestError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

//represents one trading day of the close series
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Bar {
    pub date: NaiveDate,
    pub close: f64,
}

impl Bar {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Bar { date, close }
    }
}

//an ordered, validated close series
//dates are strictly increasing and every close is finite and positive
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PriceSeries {
    bars: Vec<Bar>,
}

impl PriceSeries {
    //validates and wraps the bars, rejecting the first offending record
    pub fn new(bars: Vec<Bar>) -> Result<Self, BacktestError> {
        for (index, bar) in bars.iter().enumerate() {
            if !bar.close.is_finite() {
                return Err(BacktestError::record(
                    index,
                    format!("close {} is not finite", bar.close),
                ));
            }

            if bar.close <= 0.0 {
                return Err(BacktestError::record(
                    index,
                    format!("close {} is not positive", bar.close),
                ));
            }

            if index > 0 && bars[index - 1].date >= bar.date {
                return Err(BacktestError::record(
                    index,
                    format!(
                        "date {} does not follow {}",
                        bar.date,
                        bars[index - 1].date
                    ),
                ));
            }
        }

        Ok(PriceSeries { bars })
    }

    //builds a series from (date, close) pairs
    pub fn from_pairs<I>(pairs: I) -> Result<Self, BacktestError>
    where
        I: IntoIterator<Item = (NaiveDate, f64)>,
    {
        PriceSeries::new(
            pairs
                .into_iter()
                .map(|(date, close)| Bar::new(date, close))
                .collect(),
        )
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|bar| bar.close).collect()
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn first(&self) -> Option<&Bar> {
        self.bars.first()
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn accepts_increasing_dates() {
        let series = PriceSeries::from_pairs(vec![(day(1), 10.0), (day(2), 11.0)]).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.closes(), vec![10.0, 11.0]);
    }

    #[test]
    fn rejects_repeated_date() {
        let err = PriceSeries::from_pairs(vec![(day(1), 10.0), (day(1), 11.0)]).unwrap_err();
        assert!(matches!(err, BacktestError::InvalidInputRecord { index: 1, .. }));
    }

    #[test]
    fn rejects_decreasing_date() {
        let err = PriceSeries::from_pairs(vec![(day(1), 10.0), (day(3), 11.0), (day(2), 12.0)])
            .unwrap_err();
        assert!(matches!(err, BacktestError::InvalidInputRecord { index: 2, .. }));
    }

    #[test]
    fn rejects_non_positive_and_nan_close() {
        let err = PriceSeries::from_pairs(vec![(day(1), 0.0)]).unwrap_err();
        assert!(matches!(err, BacktestError::InvalidInputRecord { index: 0, .. }));

        let err = PriceSeries::from_pairs(vec![(day(1), 1.0), (day(2), f64::NAN)]).unwrap_err();
        assert!(matches!(err, BacktestError::InvalidInputRecord { index: 1, .. }));
    }
}
