pub mod backtest_config;

pub use backtest_config::{BacktestConfig, MaWindows, ModelConfig, ModelKind, RegimeCoefficients};
