pub mod collapse;
pub mod summary;
pub mod timeseries;

pub use collapse::{CollapseEvent, CollapseReport};
pub use summary::SummaryMetrics;
pub use timeseries::{
    calculate_equity_curve, count_trades, drawdown_series, max_drawdown, total_return, win_rate,
    EquityPoint,
};
