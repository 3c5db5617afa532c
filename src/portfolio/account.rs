use crate::config::ModelKind;
use crate::instrument::FuturesContract;
use crate::portfolio::position::Position;
use crate::portfolio::{Carry, ExposureModel, Step};

//equity at or below this share of initial capital is a collapse
pub const COLLAPSE_EQUITY_FRACTION: f64 = 0.01;

//cash account holding whole contracts
//pnl is marked to market each bar; there is no fee model
#[derive(Debug, Clone, PartialEq)]
pub struct DiscreteContracts {
    contract: FuturesContract,
    initial_leverage: f64,
    initial_capital: f64,
    cap: Option<f64>,
}

impl DiscreteContracts {
    pub fn new(
        contract: FuturesContract,
        initial_leverage: f64,
        initial_capital: f64,
        cap: Option<f64>,
    ) -> Self {
        DiscreteContracts {
            contract,
            initial_leverage,
            initial_capital,
            cap,
        }
    }
}

impl ExposureModel for DiscreteContracts {
    fn kind(&self) -> ModelKind {
        ModelKind::Discrete
    }

    fn initial_equity(&self) -> f64 {
        self.initial_capital
    }

    fn initial_carry(&self) -> Carry {
        Carry::seed(self.initial_leverage, self.initial_capital)
    }

    fn step(&self, carry: &Carry, close: f64, target: f64) -> Step {
        //mark yesterday's contracts to today's close
        let pnl = carry
            .previous_close
            .map(|prev| {
                self.contract
                    .pnl_from_price_move(close - prev, carry.previous_contracts)
            })
            .unwrap_or(0.0);

        let equity = carry.previous_equity + pnl;
        let strategy_return = if carry.previous_equity == 0.0 {
            0.0
        } else {
            pnl / carry.previous_equity
        };

        //then resize against the new equity
        let position = Position::size(equity, close, &self.contract, target, self.cap);

        Step {
            leverage_today: position.leverage,
            contracts: Some(position.contracts),
            bar_return: carry.previous_close.map(|prev| close / prev - 1.0),
            trade_cost: 0.0,
            strategy_return,
            equity,
            traded: position.contracts != carry.previous_contracts,
        }
    }

    fn collapse_floor(&self) -> Option<f64> {
        Some(COLLAPSE_EQUITY_FRACTION * self.initial_capital)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(cap: Option<f64>) -> DiscreteContracts {
        DiscreteContracts::new(FuturesContract::new(10.0), 1.0, 1_000_000.0, cap)
    }

    #[test]
    fn marks_previous_contracts_to_market() {
        let model = account(None);
        let first = model.step(&model.initial_carry(), 100.0, 1.0);
        assert_eq!(first.contracts, Some(1000));
        assert_eq!(first.equity, 1_000_000.0);
        assert!(first.traded);

        let carry = model.initial_carry().advance(1.0, 100.0, &first);
        let second = model.step(&carry, 102.0, 1.0);
        assert_eq!(second.equity, 1_000_000.0 + 1000.0 * 2.0 * 10.0);
        assert!((second.strategy_return - 0.02).abs() < 1e-12);
    }

    #[test]
    fn zero_prior_equity_gives_zero_return() {
        let model = account(None);
        let carry = Carry {
            previous_target: 1.0,
            previous_leverage: 0.0,
            previous_equity: 0.0,
            previous_close: Some(100.0),
            previous_contracts: 0,
        };
        let step = model.step(&carry, 90.0, 1.0);
        assert_eq!(step.strategy_return, 0.0);
        assert_eq!(step.contracts, Some(0));
    }

    #[test]
    fn collapse_floor_is_one_percent_of_capital() {
        assert_eq!(account(None).collapse_floor(), Some(10_000.0));
    }
}
