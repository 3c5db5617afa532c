use crate::config::ModelKind;
use crate::metrics::{calculate_equity_curve, CollapseReport, EquityPoint, SummaryMetrics};
use crate::strategy::regime::Season;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

//one row of the result table
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BarRecord {
    pub date: NaiveDate,
    pub close: f64,
    pub ma_short: Option<f64>,
    pub ma_medium: Option<f64>,
    pub ma_season: Option<f64>,
    pub up_event: bool,
    pub down_event: bool,
    pub season: Season,
    //capped output of the state machine
    pub target_leverage: f64,
    //realized leverage (derived from contracts in the discrete model)
    pub leverage_today: f64,
    pub contracts: Option<i64>,
    pub bar_return: Option<f64>,
    pub trade_cost: f64,
    pub strategy_return: f64,
    pub equity: f64,
    pub drawdown: f64,
    pub traded: bool,
}

impl BarRecord {
    pub fn season_up(&self) -> bool {
        self.season == Season::Up
    }

    pub fn event(&self) -> Option<EventKind> {
        if self.up_event {
            Some(EventKind::Up)
        } else if self.down_event {
            Some(EventKind::Down)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Up,
    Down,
}

//a bar on which an up or down event fired
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RegimeEvent {
    pub date: NaiveDate,
    pub kind: EventKind,
    pub season: Season,
    pub leverage_today: f64,
}

//result of a backtest
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BacktestResult {
    pub model: ModelKind,
    pub records: Vec<BarRecord>,
    pub summary: SummaryMetrics,
    //discrete model only
    pub collapse_report: Option<CollapseReport>,
}

impl BacktestResult {
    //every bar carrying an event, in date order
    pub fn events(&self) -> Vec<RegimeEvent> {
        self.records
            .iter()
            .filter_map(|record| {
                record.event().map(|kind| RegimeEvent {
                    date: record.date,
                    kind,
                    season: record.season,
                    leverage_today: record.leverage_today,
                })
            })
            .collect()
    }

    pub fn equity_curve(&self) -> Vec<EquityPoint> {
        let dates: Vec<NaiveDate> = self.records.iter().map(|r| r.date).collect();
        let equity: Vec<f64> = self.records.iter().map(|r| r.equity).collect();
        let returns: Vec<f64> = self.records.iter().map(|r| r.strategy_return).collect();
        calculate_equity_curve(&dates, &equity, &returns)
    }

    pub fn leverage_series(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.leverage_today).collect()
    }
}
