use crate::config::ModelKind;
use crate::portfolio::{Carry, ExposureModel, Step};

//fractional leverage applied to each close-to-close return
//equity compounds from 1.0 and has no floor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContinuousLeverage {
    initial_leverage: f64,
    fee_rate: f64,
    slippage_rate: f64,
}

impl ContinuousLeverage {
    pub fn new(initial_leverage: f64, fee_rate: f64, slippage_rate: f64) -> Self {
        ContinuousLeverage {
            initial_leverage,
            fee_rate,
            slippage_rate,
        }
    }

    //flat cost charged whenever leverage changes
    pub fn switch_cost(&self) -> f64 {
        self.fee_rate + self.slippage_rate
    }
}

impl ExposureModel for ContinuousLeverage {
    fn kind(&self) -> ModelKind {
        ModelKind::Continuous
    }

    fn initial_equity(&self) -> f64 {
        1.0
    }

    fn initial_carry(&self) -> Carry {
        Carry::seed(self.initial_leverage, self.initial_equity())
    }

    fn step(&self, carry: &Carry, close: f64, target: f64) -> Step {
        let leverage_today = target;
        let traded = leverage_today != carry.previous_leverage;
        let bar_return = carry.previous_close.map(|prev| close / prev - 1.0);

        //the first bar has no return, so nothing is charged there either
        let (trade_cost, strategy_return) = match bar_return {
            Some(ret) => {
                let cost = if traded { self.switch_cost() } else { 0.0 };
                (cost, ret * leverage_today - cost)
            }
            None => (0.0, 0.0),
        };

        Step {
            leverage_today,
            contracts: None,
            bar_return,
            trade_cost,
            strategy_return,
            equity: carry.previous_equity * (1.0 + strategy_return),
            traded,
        }
    }
}
