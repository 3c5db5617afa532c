//! End-to-end tests for the backtest pipeline.
//!
//! Covers the fixed scenarios: discrete P&L, continuous round trip,
//! event-driven leverage with costs, collapse detection, and the
//! load -> run -> export path through real files.

use chrono::NaiveDate;
use regime_lev::prelude::*;
use std::io::Write;

fn series(closes: &[f64]) -> PriceSeries {
    let start = NaiveDate::from_ymd_opt(2021, 3, 1).unwrap();
    PriceSeries::from_pairs(
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| (start + chrono::Duration::days(i as i64), close)),
    )
    .unwrap()
}

fn windows(short: usize, medium: usize, season: usize) -> MaWindows {
    MaWindows {
        short,
        medium,
        season,
    }
}

fn constant(leverage: f64) -> RegimeCoefficients {
    RegimeCoefficients {
        x: leverage,
        y: leverage,
        a: leverage,
        b: leverage,
    }
}

fn discrete(leverage: f64, capital: f64, multiplier: f64) -> BacktestConfig {
    BacktestConfig {
        windows: windows(1, 1, 1),
        coefficients: constant(leverage),
        max_leverage: None,
        model: ModelConfig::Discrete {
            initial_leverage: leverage,
            initial_capital: capital,
            contract_multiplier: multiplier,
        },
    }
}

// ── Discrete model ───────────────────────────────────────────────────

#[test]
fn discrete_pnl_matches_hand_computation() {
    let result = run_backtest(
        &series(&[100.0, 102.0, 99.0]),
        discrete(1.0, 1_000_000.0, 10.0),
    )
    .unwrap();

    let contracts0 = result.records[0].contracts.unwrap();
    assert_eq!(contracts0, (1_000_000.0_f64 * 1.0 / (100.0 * 10.0)).floor() as i64);

    let equity0 = result.records[0].equity;
    assert_eq!(equity0, 1_000_000.0);
    assert_eq!(
        result.records[1].equity,
        equity0 + contracts0 as f64 * (102.0 - 100.0) * 10.0
    );

    //held throughout, so only the opening bar is a trade
    assert_eq!(result.summary.trades_count, 1);
    assert!((result.summary.total_return - (990_000.0 / 1_000_000.0 - 1.0)).abs() < 1e-12);
}

#[test]
fn crash_shows_up_in_collapse_report() {
    let result = run_backtest(
        &series(&[100.0, 100.0, 70.0, 50.0, 40.0]),
        discrete(5.0, 1_000_000.0, 1.0),
    )
    .unwrap();

    let report = result.collapse_report.expect("discrete run has a report");
    let first = report.first().expect("equity fell through the floor");
    assert_eq!(first.index, 2);
    assert!(first.total_loss);
    assert!(first.below_floor);
    assert!(first.equity <= 0.01 * 1_000_000.0);

    //no contracts are held once the account is gone
    assert_eq!(result.records[2].contracts, Some(0));
    assert_eq!(result.records[4].equity, result.records[2].equity);
}

#[test]
fn calm_series_has_empty_collapse_report() {
    let result = run_backtest(
        &series(&[100.0, 101.0, 99.0, 100.0]),
        discrete(1.0, 1_000_000.0, 1.0),
    )
    .unwrap();

    assert!(result.collapse_report.unwrap().is_empty());
}

#[test]
fn discrete_cap_bounds_derived_leverage() {
    let mut config = discrete(3.0, 1_000_000.0, 10.0);
    config.max_leverage = Some(1.5);

    let result = run_backtest(&series(&[100.0, 103.0, 97.0, 101.0, 99.5]), config).unwrap();
    for record in &result.records {
        assert!(record.leverage_today.abs() <= 1.5 + 1e-12);
        assert_eq!(record.target_leverage, 1.5);
    }
}

// ── Continuous model ─────────────────────────────────────────────────

#[test]
fn constant_unit_leverage_tracks_the_index() {
    let closes = [100.0, 103.5, 99.2, 101.7, 108.3, 104.9, 110.0];
    let config = BacktestConfig {
        windows: windows(2, 3, 4),
        coefficients: constant(1.0),
        max_leverage: None,
        model: ModelConfig::Continuous {
            initial_leverage: 1.0,
            fee_rate: 0.0,
            slippage_rate: 0.0,
        },
    };

    let result = run_backtest(&series(&closes), config).unwrap();
    let last = result.records.last().unwrap().equity;
    assert!((last - 110.0 / 100.0).abs() < 1e-12);
    assert_eq!(result.summary.trades_count, 0);
}

#[test]
fn events_drive_leverage_and_costs() {
    let config = BacktestConfig {
        windows: windows(2, 2, 2),
        coefficients: RegimeCoefficients::default(),
        max_leverage: None,
        model: ModelConfig::Continuous {
            initial_leverage: 0.0,
            fee_rate: 0.001,
            slippage_rate: 0.0005,
        },
    };

    let result = run_backtest(&series(&[10.0, 10.0, 8.0, 12.0, 12.0, 12.0]), config).unwrap();
    let leverage = result.leverage_series();
    assert_eq!(leverage, vec![0.0, 0.0, 0.0, -1.0, 1.0, -1.0]);

    let kinds: Vec<EventKind> = result.events().iter().map(|e| e.kind).collect();
    assert_eq!(kinds, vec![EventKind::Down, EventKind::Up, EventKind::Down]);
    assert_eq!(result.events()[1].season, Season::Up);

    for record in &result.records {
        let expected = if record.traded { 0.0015 } else { 0.0 };
        assert!((record.trade_cost - expected).abs() < 1e-15);
    }
    assert_eq!(result.summary.trades_count, 3);

    //bar 3: short at -1 through the 8 -> 12 move, less costs
    assert!((result.records[3].strategy_return - (-0.5 - 0.0015)).abs() < 1e-12);
}

#[test]
fn simplified_variant_charges_nothing() {
    let config = BacktestConfig::simplified(
        windows(2, 2, 2),
        RegimeCoefficients::default(),
        0.0,
        None,
    );

    let result = run_backtest(&series(&[10.0, 10.0, 8.0, 12.0, 12.0, 12.0]), config).unwrap();
    assert!(result.records.iter().all(|r| r.trade_cost == 0.0));
}

#[test]
fn undefined_season_average_resolves_to_season_down() {
    //season window longer than the series: every event uses a or b
    let config = BacktestConfig {
        windows: windows(2, 2, 6),
        coefficients: RegimeCoefficients {
            x: 9.0,
            y: -9.0,
            a: 0.5,
            b: -0.5,
        },
        max_leverage: None,
        model: ModelConfig::default(),
    };

    let result = run_backtest(
        &series(&[10.0, 10.0, 8.0, 12.0, 12.0, 12.0, 12.0, 12.0]),
        config,
    )
    .unwrap();

    assert_eq!(result.records[3].leverage_today, -0.5);
    assert_eq!(result.records[4].leverage_today, 0.5);
    assert!(result.records[4].season == Season::Down);
}

#[test]
fn exactly_required_bars_is_enough() {
    let config = BacktestConfig {
        windows: windows(2, 3, 4),
        ..Default::default()
    };
    let required = config.windows.required_bars();
    assert_eq!(required, 6);

    let closes = [100.0, 101.0, 99.0, 102.0, 103.0, 101.5];
    let result = run_backtest(&series(&closes[..required]), config.clone()).unwrap();
    assert_eq!(result.records.len(), required);

    let err = run_backtest(&series(&closes[..required - 1]), config).unwrap_err();
    assert_eq!(
        err,
        BacktestError::InsufficientData {
            required: 6,
            available: 5
        }
    );
}

#[test]
fn insufficient_bars_are_rejected() {
    let err = run_backtest(&series(&[1.0, 2.0, 3.0]), BacktestConfig::default()).unwrap_err();
    assert!(matches!(
        err,
        BacktestError::InsufficientData {
            required: 62,
            available: 3
        }
    ));
}

#[test]
fn single_losing_bar_keeps_summary_finite() {
    let config = BacktestConfig::simplified(windows(1, 1, 1), constant(1.0), 1.0, None);
    let result = run_backtest(&series(&[100.0, 110.0, 105.0, 120.0, 130.0]), config).unwrap();

    let losing = result
        .records
        .iter()
        .filter(|r| r.strategy_return < 0.0)
        .count();
    assert_eq!(losing, 1);
    assert!(result.summary.sortino_ratio.is_finite());
    assert!(result.summary.sortino_ratio > 0.0);

    let json = serde_json::to_string(&result).unwrap();
    let restored: BacktestResult = serde_json::from_str(&json).unwrap();
    assert_eq!(restored.records.len(), result.records.len());
    assert!((restored.summary.sortino_ratio - result.summary.sortino_ratio).abs() < 1e-9);
}

// ── Files ────────────────────────────────────────────────────────────

#[test]
fn load_run_and_export_through_files() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("taiex.csv");
    let mut file = std::fs::File::create(&input).unwrap();
    writeln!(file, "交易日期,收盤").unwrap();
    for (i, close) in [10.0, 10.0, 8.0, 12.0, 12.0, 12.0].iter().enumerate() {
        writeln!(file, "2024/05/{:02},{}", i + 1, close).unwrap();
    }
    drop(file);

    let series = load_csv(&input).unwrap();
    let config = BacktestConfig {
        windows: windows(2, 2, 2),
        ..Default::default()
    };
    let result = run_backtest(&series, config).unwrap();

    let output = dir.path().join("results.csv");
    save_results_csv(&result, &output).unwrap();
    let text = std::fs::read_to_string(&output).unwrap();
    let mut lines = text.lines();
    assert_eq!(
        lines.next().unwrap(),
        "date,close,ma_short,ma_medium,ma_season,leverage_today,contracts,strategy_return,equity,up_event,down_event,season_up"
    );
    assert_eq!(lines.count(), 6);

    let events_path = dir.path().join("events.csv");
    save_events_csv(&result.events(), &events_path).unwrap();
    let events = std::fs::read_to_string(&events_path).unwrap();
    assert!(events.starts_with("date,kind,season,leverage_today"));
    assert_eq!(events.lines().count(), 4);
}

#[test]
fn equity_curve_mirrors_result_table() {
    let result = run_backtest(
        &series(&[100.0, 104.0, 98.0, 103.0]),
        discrete(1.0, 1_000_000.0, 10.0),
    )
    .unwrap();

    let curve = result.equity_curve();
    assert_eq!(curve.len(), result.records.len());
    for (point, record) in curve.iter().zip(&result.records) {
        assert_eq!(point.date, record.date);
        assert_eq!(point.equity, record.equity);
        assert_eq!(point.drawdown, record.drawdown);
        assert!(point.drawdown <= 0.0);
    }
    assert!((result.summary.max_drawdown - (980_000.0 / 1_040_000.0 - 1.0)).abs() < 1e-12);
}
