use crate::engine::{BacktestResult, RegimeEvent};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

//column layout of the exported result table
#[derive(Debug, Serialize)]
struct ResultRow {
    date: NaiveDate,
    close: f64,
    ma_short: Option<f64>,
    ma_medium: Option<f64>,
    ma_season: Option<f64>,
    leverage_today: f64,
    contracts: Option<i64>,
    strategy_return: f64,
    equity: f64,
    up_event: bool,
    down_event: bool,
    season_up: bool,
}

//writes the per-bar result table as csv
pub fn write_results_csv<W: Write>(result: &BacktestResult, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    for record in &result.records {
        csv_writer
            .serialize(ResultRow {
                date: record.date,
                close: record.close,
                ma_short: record.ma_short,
                ma_medium: record.ma_medium,
                ma_season: record.ma_season,
                leverage_today: record.leverage_today,
                contracts: record.contracts,
                strategy_return: record.strategy_return,
                equity: record.equity,
                up_event: record.up_event,
                down_event: record.down_event,
                season_up: record.season_up(),
            })
            .context(format!("Failed to write result row for {}", record.date))?;
    }

    csv_writer.flush()?;
    Ok(())
}

//writes the event table (date, kind, season, leverage) as csv
pub fn write_events_csv<W: Write>(events: &[RegimeEvent], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    for event in events {
        csv_writer.serialize(event)?;
    }

    csv_writer.flush()?;
    Ok(())
}

//saves the result table to a file
pub fn save_results_csv<P: AsRef<Path>>(result: &BacktestResult, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = std::fs::File::create(path).context(format!("Failed to create {:?}", path))?;
    write_results_csv(result, file)
}

//saves the event table to a file
pub fn save_events_csv<P: AsRef<Path>>(events: &[RegimeEvent], path: P) -> Result<()> {
    let path = path.as_ref();
    let file = std::fs::File::create(path).context(format!("Failed to create {:?}", path))?;
    write_events_csv(events, file)
}
