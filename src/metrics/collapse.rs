use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

//a bar where the account was wiped out or nearly so
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CollapseEvent {
    pub index: usize,
    pub date: NaiveDate,
    pub strategy_return: f64,
    pub equity: f64,
    //single-bar return of -100% or worse
    pub total_loss: bool,
    //equity at or below the floor
    pub below_floor: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CollapseReport {
    pub floor: f64,
    pub events: Vec<CollapseEvent>,
}

impl CollapseReport {
    //scans the curve for bars with return <= -1 or equity <= floor
    pub fn scan(dates: &[NaiveDate], returns: &[f64], equity: &[f64], floor: f64) -> Self {
        let events = dates
            .iter()
            .zip(returns)
            .zip(equity)
            .enumerate()
            .filter_map(|(index, ((&date, &strategy_return), &equity))| {
                let total_loss = strategy_return <= -1.0;
                let below_floor = equity <= floor;
                (total_loss || below_floor).then_some(CollapseEvent {
                    index,
                    date,
                    strategy_return,
                    equity,
                    total_loss,
                    below_floor,
                })
            })
            .collect();

        CollapseReport { floor, events }
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn first(&self) -> Option<&CollapseEvent> {
        self.events.first()
    }
}
