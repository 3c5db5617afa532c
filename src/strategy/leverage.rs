use crate::config::RegimeCoefficients;
use crate::strategy::regime::EventFlags;

//clamps leverage magnitude to the cap, keeping its sign
pub fn apply_cap(leverage: f64, cap: Option<f64>) -> f64 {
    match cap {
        Some(cap) if cap > 0.0 && leverage.abs() > cap => leverage.signum() * cap,
        _ => leverage,
    }
}

//maps regime events to a target leverage with a first-order hold
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeverageStateMachine {
    coefficients: RegimeCoefficients,
    cap: Option<f64>,
}

impl LeverageStateMachine {
    pub fn new(coefficients: RegimeCoefficients, cap: Option<f64>) -> Self {
        LeverageStateMachine {
            coefficients,
            cap: cap.map(f64::abs),
        }
    }

    //raw target for a bar, none when no event fires
    //checked in the order x, y, a, b and the first match wins
    pub fn resolve_target(&self, flags: &EventFlags) -> Option<f64> {
        let RegimeCoefficients { x, y, a, b } = self.coefficients;

        if flags.up_event && flags.season_up() {
            Some(x)
        } else if flags.down_event && flags.season_up() {
            Some(y)
        } else if flags.up_event && flags.season_down() {
            Some(a)
        } else if flags.down_event && flags.season_down() {
            Some(b)
        } else {
            None
        }
    }

    //capped target for this bar given the previous bar's capped target
    pub fn next(&self, previous: f64, flags: &EventFlags) -> f64 {
        let raw = self.resolve_target(flags).unwrap_or(previous);
        apply_cap(raw, self.cap)
    }

    pub fn cap(&self) -> Option<f64> {
        self.cap
    }
}
