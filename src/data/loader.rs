use crate::data::bar::{Bar, PriceSeries};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use std::io::Read;
use std::path::Path;
use thiserror::Error;

//header aliases accepted for each column, matched after trimming
const DATE_HEADERS: &[&str] = &["date", "交易日期"];
const CLOSE_HEADERS: &[&str] = &["close", "收盤", "taiex_close"];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y%m%d"];

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Missing {column} column, expected one of {expected:?}")]
    MissingColumn {
        column: &'static str,
        expected: &'static [&'static str],
    },
}

//loads a close series from a csv file
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<PriceSeries> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .context(format!("Failed to open CSV file: {:?}", path))?;

    read_csv(file).context(format!("Failed to load price series from {:?}", path))
}

//reads a close series from any csv source
//rows whose date or close cannot be parsed are dropped, the rest sorted by date
pub fn read_csv<R: Read>(source: R) -> Result<PriceSeries> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(source);

    let headers = reader.headers().context("Failed to read CSV header")?.clone();
    let date_idx = find_column(&headers, DATE_HEADERS).ok_or(LoadError::MissingColumn {
        column: "date",
        expected: DATE_HEADERS,
    })?;
    let close_idx = find_column(&headers, CLOSE_HEADERS).ok_or(LoadError::MissingColumn {
        column: "close",
        expected: CLOSE_HEADERS,
    })?;

    let mut bars = Vec::new();
    let mut dropped = 0usize;

    for (index, result) in reader.records().enumerate() {
        let record =
            result.context(format!("Failed to parse CSV record at line {}", index + 2))?;

        let date = record.get(date_idx).and_then(parse_date);
        let close = record.get(close_idx).and_then(parse_close);

        match (date, close) {
            (Some(date), Some(close)) => bars.push(Bar::new(date, close)),
            _ => dropped += 1,
        }
    }

    if dropped > 0 {
        tracing::debug!(dropped, "skipped rows with unparsable date or close");
    }

    //sort by date to ensure chronological order
    bars.sort_by(|a, b| a.date.cmp(&b.date));

    Ok(PriceSeries::new(bars)?)
}

fn find_column(headers: &StringRecord, aliases: &[&str]) -> Option<usize> {
    headers.iter().position(|header| {
        let header = header.trim().trim_start_matches('\u{feff}');
        aliases.iter().any(|alias| header.eq_ignore_ascii_case(alias))
    })
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    //accept timestamps by keeping only the date part
    let raw = raw.split([' ', 'T']).next().unwrap_or(raw);

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
}

fn parse_close(raw: &str) -> Option<f64> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    cleaned.parse::<f64>().ok().filter(|close| close.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_plain_headers_and_sorts() {
        let data = "date,close\n2024-01-03,102\n2024-01-02,101.5\n";
        let series = read_csv(data.as_bytes()).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.closes(), vec![101.5, 102.0]);
    }

    #[test]
    fn normalizes_exchange_headers_and_drops_bad_rows() {
        let data = "交易日期,收盤\n2024/01/02,\"17,853.76\"\n2024/01/03,--\nnot-a-date,1\n";
        let series = read_csv(data.as_bytes()).unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series.bars()[0].close, 17853.76);
    }

    #[test]
    fn missing_close_column_is_an_error() {
        let data = "date,open\n2024-01-02,1\n";
        let err = read_csv(data.as_bytes()).unwrap_err();
        assert!(err.downcast_ref::<LoadError>().is_some());
    }

    #[test]
    fn duplicate_dates_fail_validation() {
        let data = "date,close\n2024-01-02,1\n2024-01-02,2\n";
        assert!(read_csv(data.as_bytes()).is_err());
    }
}
