pub mod account;
pub mod leveraged;
pub mod position;

pub use account::DiscreteContracts;
pub use leveraged::ContinuousLeverage;
pub use position::Position;

use crate::config::{BacktestConfig, ModelConfig, ModelKind};
use crate::instrument::FuturesContract;

//state carried from one bar to the next
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Carry {
    //capped target leverage held by the state machine
    pub previous_target: f64,
    //realized leverage of the previous bar
    pub previous_leverage: f64,
    pub previous_equity: f64,
    pub previous_close: Option<f64>,
    pub previous_contracts: i64,
}

impl Carry {
    pub fn seed(initial_leverage: f64, initial_equity: f64) -> Self {
        Carry {
            previous_target: initial_leverage,
            previous_leverage: initial_leverage,
            previous_equity: initial_equity,
            previous_close: None,
            previous_contracts: 0,
        }
    }

    //the carry handed to the next bar
    pub fn advance(&self, target: f64, close: f64, step: &Step) -> Carry {
        Carry {
            previous_target: target,
            previous_leverage: step.leverage_today,
            previous_equity: step.equity,
            previous_close: Some(close),
            previous_contracts: step.contracts.unwrap_or(0),
        }
    }
}

//outcome of one bar under an exposure model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub leverage_today: f64,
    //whole contracts held after the bar, discrete model only
    pub contracts: Option<i64>,
    //close-to-close return, undefined on the first bar
    pub bar_return: Option<f64>,
    pub trade_cost: f64,
    pub strategy_return: f64,
    pub equity: f64,
    //exposure differs from the previous bar
    pub traded: bool,
}

//turns the target leverage into exposure, costs and equity for one bar
pub trait ExposureModel: Send + Sync {
    fn kind(&self) -> ModelKind;

    //equity before the first bar
    fn initial_equity(&self) -> f64;

    fn initial_carry(&self) -> Carry;

    fn step(&self, carry: &Carry, close: f64, target: f64) -> Step;

    //equity at or below this level counts as a collapse
    fn collapse_floor(&self) -> Option<f64> {
        None
    }
}

//builds the exposure model selected by the configuration
pub fn build_model(config: &BacktestConfig) -> Box<dyn ExposureModel> {
    match config.model {
        ModelConfig::Continuous {
            initial_leverage,
            fee_rate,
            slippage_rate,
        } => Box::new(ContinuousLeverage::new(
            initial_leverage,
            fee_rate,
            slippage_rate,
        )),
        ModelConfig::Discrete {
            initial_leverage,
            initial_capital,
            contract_multiplier,
        } => Box::new(DiscreteContracts::new(
            FuturesContract::new(contract_multiplier),
            initial_leverage,
            initial_capital,
            config.leverage_cap(),
        )),
    }
}
