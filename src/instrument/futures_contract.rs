use serde::{Deserialize, Serialize};

//the contract traded by the discrete model
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FuturesContract {
    //cash value of one full point move of one contract
    pub multiplier: f64,
}

impl FuturesContract {
    pub fn new(multiplier: f64) -> Self {
        FuturesContract { multiplier }
    }

    //cash value of one contract at a given price
    pub fn contract_value(&self, price: f64) -> f64 {
        price * self.multiplier
    }

    //calculates pnl from a price move
    //quantity - number of contracts (positive for long, negative for short)
    pub fn pnl_from_price_move(&self, price_diff: f64, quantity: i64) -> f64 {
        quantity as f64 * price_diff * self.multiplier
    }

    //calculates the signed notional value of a position
    pub fn notional_value(&self, price: f64, quantity: i64) -> f64 {
        quantity as f64 * self.contract_value(price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pnl_scales_with_multiplier_and_sign() {
        let contract = FuturesContract::new(200.0);
        assert_eq!(contract.pnl_from_price_move(5.0, 2), 2000.0);
        assert_eq!(contract.pnl_from_price_move(5.0, -2), -2000.0);
        assert_eq!(contract.notional_value(100.0, -3), -60000.0);
    }
}
