use crate::config::ModelKind;
use crate::engine::result::BarRecord;
use crate::metrics::timeseries::{count_trades, max_drawdown, total_return, win_rate};
use indexmap::IndexMap;
use prettytable::{Cell, Row, Table};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

const TRADING_DAYS_PER_YEAR: f64 = 252.0;

//summary metrics for a backtest
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SummaryMetrics {
    pub model: ModelKind,
    pub num_bars: usize,
    pub initial_equity: f64,
    pub final_equity: f64,
    pub total_return: f64,
    pub max_drawdown: f64,
    //none when no bar had a non-zero return
    pub win_rate: Option<f64>,
    pub trades_count: usize,
    pub num_events: usize,
    pub cagr: f64,
    pub sharpe_ratio: f64,
    pub sortino_ratio: f64,
    //share of bars with non-zero exposure
    pub exposure: f64,
}

impl SummaryMetrics {
    //calculate summary metrics from the finished result table
    pub fn from_records(
        records: &[BarRecord],
        model: ModelKind,
        initial_equity: f64,
        initial_leverage: f64,
    ) -> Self {
        let equity: Vec<f64> = records.iter().map(|r| r.equity).collect();
        let returns: Vec<f64> = records.iter().map(|r| r.strategy_return).collect();

        let final_equity = equity.last().copied().unwrap_or(initial_equity);

        let trades_count = match model {
            ModelKind::Continuous => {
                let leverage: Vec<f64> = records.iter().map(|r| r.leverage_today).collect();
                count_trades(&leverage, initial_leverage)
            }
            ModelKind::Discrete => {
                let contracts: Vec<i64> = records.iter().map(|r| r.contracts.unwrap_or(0)).collect();
                count_trades(&contracts, 0)
            }
        };

        //the first bar never has a return
        let period_returns = returns.get(1..).unwrap_or(&[]);

        let exposure = if records.is_empty() {
            0.0
        } else {
            records.iter().filter(|r| r.leverage_today != 0.0).count() as f64
                / records.len() as f64
        };

        SummaryMetrics {
            model,
            num_bars: records.len(),
            initial_equity,
            final_equity,
            total_return: total_return(&equity, initial_equity),
            max_drawdown: max_drawdown(&equity),
            win_rate: win_rate(&returns),
            trades_count,
            num_events: records.iter().filter(|r| r.up_event || r.down_event).count(),
            cagr: calculate_cagr(records, initial_equity, final_equity),
            sharpe_ratio: calculate_sharpe_ratio(period_returns),
            sortino_ratio: calculate_sortino_ratio(period_returns),
            exposure,
        }
    }

    //labelled, formatted values in display order
    pub fn rows(&self) -> IndexMap<&'static str, String> {
        let equity_precision = match self.model {
            ModelKind::Continuous => 4,
            ModelKind::Discrete => 2,
        };

        let mut rows = IndexMap::new();
        rows.insert("Model", format!("{:?}", self.model));
        rows.insert("Bars", self.num_bars.to_string());
        rows.insert(
            "Initial Equity",
            format!("{:.*}", equity_precision, self.initial_equity),
        );
        rows.insert(
            "Final Equity",
            format!("{:.*}", equity_precision, self.final_equity),
        );
        rows.insert("Total Return", format!("{:.2}%", self.total_return * 100.0));
        rows.insert("Max Drawdown", format!("{:.2}%", self.max_drawdown * 100.0));
        rows.insert(
            "Win Rate",
            self.win_rate
                .map(|rate| format!("{:.2}%", rate * 100.0))
                .unwrap_or_else(|| "N/A".to_string()),
        );
        rows.insert("Trades", self.trades_count.to_string());
        rows.insert("Events", self.num_events.to_string());
        rows.insert("CAGR", format!("{:.2}%", self.cagr * 100.0));
        rows.insert("Sharpe Ratio", format!("{:.3}", self.sharpe_ratio));
        rows.insert("Sortino Ratio", format!("{:.3}", self.sortino_ratio));
        rows.insert("Exposure", format!("{:.2}%", self.exposure * 100.0));
        rows
    }

    //prints metrics in a formatted table
    pub fn pretty_print_table(&self) {
        let mut table = Table::new();

        table.add_row(Row::new(vec![Cell::new("Metric"), Cell::new("Value")]));

        for (label, value) in self.rows() {
            table.add_row(Row::new(vec![Cell::new(label), Cell::new(&value)]));
        }

        table.printstd();
    }
}

fn calculate_cagr(records: &[BarRecord], initial_equity: f64, final_equity: f64) -> f64 {
    let (first, last) = match (records.first(), records.last()) {
        (Some(first), Some(last)) => (first.date, last.date),
        _ => return 0.0,
    };

    let years = (last - first).num_days() as f64 / 365.25;
    if years <= 0.0 {
        return 0.0;
    }

    let growth = final_equity / initial_equity;
    if growth <= 0.0 {
        //the account is gone
        return -1.0;
    }

    growth.powf(1.0 / years) - 1.0
}

fn calculate_sharpe_ratio(returns: &[f64]) -> f64 {
    if returns.len() < 2 {
        return 0.0;
    }

    let mean = returns.mean();
    let std_dev = returns.std_dev();

    if std_dev == 0.0 || !std_dev.is_finite() {
        return 0.0;
    }

    //annualize assuming daily returns
    (mean / std_dev) * TRADING_DAYS_PER_YEAR.sqrt()
}

fn calculate_sortino_ratio(returns: &[f64]) -> f64 {
    if returns.is_empty() {
        return 0.0;
    }

    //undefined without a losing bar; reported as zero so it stays finite
    if !returns.iter().any(|&r| r < 0.0) {
        return 0.0;
    }

    let mean = returns.mean();

    //downside deviation: root mean square of the shortfall below zero
    let downside_dev = returns.iter().map(|&r| r.min(0.0).powi(2)).mean().sqrt();

    if downside_dev == 0.0 || !downside_dev.is_finite() {
        return 0.0;
    }

    (mean / downside_dev) * TRADING_DAYS_PER_YEAR.sqrt()
}
