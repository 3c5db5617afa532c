pub mod backtest;
pub mod result;

pub use backtest::{run_backtest, BacktestEngine};
pub use result::{BacktestResult, BarRecord, EventKind, RegimeEvent};
