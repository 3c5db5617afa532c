use crate::instrument::FuturesContract;
use serde::{Deserialize, Serialize};

//whole-contract position sized from equity and a target leverage
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    //net contracts (positive for long, negative for short, 0 for flat)
    pub contracts: i64,

    //notional over equity implied by the contracts
    pub leverage: f64,
}

impl Position {
    //sizes the position for the given equity and close
    //the cap, when set, bounds the contract count by magnitude
    pub fn size(
        equity: f64,
        close: f64,
        contract: &FuturesContract,
        target_leverage: f64,
        cap: Option<f64>,
    ) -> Self {
        let contract_value = contract.contract_value(close);
        let desired = desired_contracts(equity, contract_value, target_leverage);

        let contracts = match cap.filter(|cap| *cap > 0.0) {
            Some(cap) => {
                let max = max_contracts(equity, contract_value, cap);
                desired.signum() * desired.abs().min(max)
            }
            None => desired,
        };

        Position {
            contracts,
            leverage: derived_leverage(contracts, contract.notional_value(close, contracts), equity),
        }
    }
}

//floor(E * |L| / (P * M)) with the sign of L
//no contracts are held once equity is gone
pub fn desired_contracts(equity: f64, contract_value: f64, target_leverage: f64) -> i64 {
    if contract_value == 0.0 {
        return 0;
    }

    let magnitude = (equity.max(0.0) * target_leverage.abs() / contract_value).floor() as i64;
    if target_leverage < 0.0 {
        -magnitude
    } else {
        magnitude
    }
}

//largest contract count the cap allows
pub fn max_contracts(equity: f64, contract_value: f64, cap: f64) -> i64 {
    if contract_value == 0.0 {
        return 0;
    }

    (equity.max(0.0) * cap.abs() / contract_value).floor() as i64
}

fn derived_leverage(contracts: i64, notional: f64, equity: f64) -> f64 {
    if contracts == 0 || equity <= 0.0 {
        0.0
    } else {
        notional / equity
    }
}
