pub mod indicators;
pub mod leverage;
pub mod regime;

pub use indicators::{rolling_sma, IndicatorSet};
pub use leverage::{apply_cap, LeverageStateMachine};
pub use regime::{detect_events, EventFlags, Season};
