//a moving-average regime-switching leverage backtester for daily closes

pub mod config;
pub mod data;
pub mod engine;
pub mod error;
pub mod instrument;
pub mod metrics;
pub mod portfolio;
pub mod strategy;

//prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{BacktestConfig, MaWindows, ModelConfig, ModelKind, RegimeCoefficients};
    pub use crate::data::{load_csv, read_csv, save_events_csv, save_results_csv, Bar, PriceSeries};
    pub use crate::engine::{
        run_backtest, BacktestEngine, BacktestResult, BarRecord, EventKind, RegimeEvent,
    };
    pub use crate::error::BacktestError;
    pub use crate::instrument::FuturesContract;
    pub use crate::metrics::{CollapseEvent, CollapseReport, EquityPoint, SummaryMetrics};
    pub use crate::portfolio::{ContinuousLeverage, DiscreteContracts, ExposureModel, Position};
    pub use crate::strategy::{IndicatorSet, LeverageStateMachine, Season};
}
