use crate::config::BacktestConfig;
use crate::data::PriceSeries;
use crate::engine::result::{BacktestResult, BarRecord};
use crate::error::BacktestError;
use crate::metrics::{drawdown_series, CollapseReport, SummaryMetrics};
use crate::portfolio::{build_model, ExposureModel};
use crate::strategy::indicators::IndicatorSet;
use crate::strategy::leverage::LeverageStateMachine;
use crate::strategy::regime::detect_events;
use tracing::{debug, info, warn};

//main backtest engine
//holds only configuration, so one engine can run any number of series
pub struct BacktestEngine {
    config: BacktestConfig,
    machine: LeverageStateMachine,
    model: Box<dyn ExposureModel>,
}

impl BacktestEngine {
    //validates the configuration and builds the exposure model it selects
    pub fn new(config: BacktestConfig) -> Result<Self, BacktestError> {
        config.validate()?;

        let machine = LeverageStateMachine::new(config.coefficients, config.leverage_cap());
        let model = build_model(&config);

        Ok(BacktestEngine {
            config,
            machine,
            model,
        })
    }

    pub fn config(&self) -> &BacktestConfig {
        &self.config
    }

    //runs the full pipeline over the series in one left-to-right pass
    pub fn run(&self, series: &PriceSeries) -> Result<BacktestResult, BacktestError> {
        let required = self.config.windows.required_bars();
        if series.len() < required {
            return Err(BacktestError::InsufficientData {
                required,
                available: series.len(),
            });
        }

        let closes = series.closes();
        let indicators = IndicatorSet::build(&closes, &self.config.windows);
        let flags = detect_events(&closes, &indicators);

        debug!(
            bars = series.len(),
            events = flags.iter().filter(|f| f.has_event()).count(),
            model = ?self.model.kind(),
            "indicators and events ready"
        );

        //fold over the bars; the carry is the only state passed between them
        let mut records: Vec<BarRecord> = series
            .bars()
            .iter()
            .zip(&flags)
            .enumerate()
            .scan(self.model.initial_carry(), |carry, (i, (bar, bar_flags))| {
                let target = self.machine.next(carry.previous_target, bar_flags);
                let step = self.model.step(carry, bar.close, target);
                *carry = carry.advance(target, bar.close, &step);

                Some(BarRecord {
                    date: bar.date,
                    close: bar.close,
                    ma_short: indicators.ma_short[i],
                    ma_medium: indicators.ma_medium[i],
                    ma_season: indicators.ma_season[i],
                    up_event: bar_flags.up_event,
                    down_event: bar_flags.down_event,
                    season: bar_flags.season,
                    target_leverage: target,
                    leverage_today: step.leverage_today,
                    contracts: step.contracts,
                    bar_return: step.bar_return,
                    trade_cost: step.trade_cost,
                    strategy_return: step.strategy_return,
                    equity: step.equity,
                    drawdown: 0.0,
                    traded: step.traded,
                })
            })
            .collect();

        let equity: Vec<f64> = records.iter().map(|r| r.equity).collect();
        for (record, drawdown) in records.iter_mut().zip(drawdown_series(&equity)) {
            record.drawdown = drawdown;
        }

        if let Some(record) = records.iter().find(|r| r.equity <= 0.0) {
            warn!(
                date = %record.date,
                equity = record.equity,
                "equity reached zero or below"
            );
        }

        let collapse_report = self.model.collapse_floor().map(|floor| {
            let dates: Vec<_> = records.iter().map(|r| r.date).collect();
            let returns: Vec<f64> = records.iter().map(|r| r.strategy_return).collect();
            CollapseReport::scan(&dates, &returns, &equity, floor)
        });

        if let Some(first) = collapse_report.as_ref().and_then(|report| report.first()) {
            warn!(
                date = %first.date,
                equity = first.equity,
                "account collapsed"
            );
        }

        let summary = SummaryMetrics::from_records(
            &records,
            self.model.kind(),
            self.model.initial_equity(),
            self.config.model.initial_leverage(),
        );

        info!(
            total_return = summary.total_return,
            max_drawdown = summary.max_drawdown,
            trades = summary.trades_count,
            "backtest finished"
        );

        Ok(BacktestResult {
            model: self.model.kind(),
            records,
            summary,
            collapse_report,
        })
    }
}

//convenience wrapper for a single run
pub fn run_backtest(
    series: &PriceSeries,
    config: BacktestConfig,
) -> Result<BacktestResult, BacktestError> {
    BacktestEngine::new(config)?.run(series)
}
