use crate::error::BacktestError;
use serde::{Deserialize, Serialize};
use std::path::Path;

//moving average window lengths
//the two fast windows drive crossover events, the season window the trend filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaWindows {
    pub short: usize,
    pub medium: usize,
    pub season: usize,
}

impl Default for MaWindows {
    fn default() -> Self {
        MaWindows {
            short: 10,
            medium: 20,
            season: 60,
        }
    }
}

impl MaWindows {
    pub fn longest(&self) -> usize {
        self.short.max(self.medium).max(self.season)
    }

    //bars needed for the longest window plus the two lag bars
    pub fn required_bars(&self) -> usize {
        self.longest() + 2
    }
}

//target leverage per (event, season) combination
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegimeCoefficients {
    //up event above the season average
    pub x: f64,
    //down event above the season average
    pub y: f64,
    //up event below the season average
    pub a: f64,
    //down event below the season average
    pub b: f64,
}

impl Default for RegimeCoefficients {
    fn default() -> Self {
        RegimeCoefficients {
            x: 1.0,
            y: -1.0,
            a: 1.0,
            b: -1.0,
        }
    }
}

//how target leverage becomes capital exposure
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ModelConfig {
    //fractional leverage scaling each bar's return, equity seeded at 1.0
    Continuous {
        initial_leverage: f64,
        fee_rate: f64,
        slippage_rate: f64,
    },
    //whole contracts sized from a cash account
    Discrete {
        initial_leverage: f64,
        initial_capital: f64,
        contract_multiplier: f64,
    },
}

impl Default for ModelConfig {
    fn default() -> Self {
        ModelConfig::for_kind(ModelKind::Continuous, 0.0)
    }
}

impl ModelConfig {
    //discrete model with the default capital and multiplier
    pub fn discrete() -> Self {
        ModelConfig::for_kind(ModelKind::Discrete, 0.0)
    }

    //default settings for a model kind, keeping the given seed leverage
    pub fn for_kind(kind: ModelKind, initial_leverage: f64) -> Self {
        match kind {
            ModelKind::Continuous => ModelConfig::Continuous {
                initial_leverage,
                fee_rate: 0.0,
                slippage_rate: 0.0,
            },
            ModelKind::Discrete => ModelConfig::Discrete {
                initial_leverage,
                initial_capital: 1_000_000.0,
                contract_multiplier: 200.0,
            },
        }
    }

    pub fn initial_leverage(&self) -> f64 {
        match *self {
            ModelConfig::Continuous {
                initial_leverage, ..
            }
            | ModelConfig::Discrete {
                initial_leverage, ..
            } => initial_leverage,
        }
    }

    pub fn kind(&self) -> ModelKind {
        match self {
            ModelConfig::Continuous { .. } => ModelKind::Continuous,
            ModelConfig::Discrete { .. } => ModelKind::Discrete,
        }
    }
}

//exposure model selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    Continuous,
    Discrete,
}

impl ModelKind {
    //parse model kind from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "continuous" | "leverage" => Some(ModelKind::Continuous),
            "discrete" | "contracts" => Some(ModelKind::Discrete),
            _ => None,
        }
    }
}

//complete engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BacktestConfig {
    pub windows: MaWindows,
    pub coefficients: RegimeCoefficients,

    //optional symmetric cap on leverage magnitude
    #[serde(default)]
    pub max_leverage: Option<f64>,

    pub model: ModelConfig,
}

impl BacktestConfig {
    //continuous model without transaction costs
    pub fn simplified(
        windows: MaWindows,
        coefficients: RegimeCoefficients,
        initial_leverage: f64,
        max_leverage: Option<f64>,
    ) -> Self {
        BacktestConfig {
            windows,
            coefficients,
            max_leverage,
            model: ModelConfig::Continuous {
                initial_leverage,
                fee_rate: 0.0,
                slippage_rate: 0.0,
            },
        }
    }

    //the cap actually applied, if any
    pub fn leverage_cap(&self) -> Option<f64> {
        self.max_leverage.filter(|cap| *cap > 0.0)
    }

    //checks every option before a run
    //degenerate windows (season shorter than the fast ones) are accepted
    pub fn validate(&self) -> Result<(), BacktestError> {
        let MaWindows {
            short,
            medium,
            season,
        } = self.windows;
        for (name, window) in [("ma_short", short), ("ma_medium", medium), ("ma_season", season)] {
            if window == 0 {
                return Err(BacktestError::config(format!("{name} window must be positive")));
            }
        }

        let RegimeCoefficients { x, y, a, b } = self.coefficients;
        for (name, value) in [("x", x), ("y", y), ("a", a), ("b", b)] {
            if !value.is_finite() {
                return Err(BacktestError::config(format!(
                    "coefficient {name} must be finite, got {value}"
                )));
            }
        }

        if let Some(cap) = self.max_leverage {
            if !cap.is_finite() || cap <= 0.0 {
                return Err(BacktestError::config(format!(
                    "max_leverage must be a positive number, got {cap}"
                )));
            }
        }

        if !self.model.initial_leverage().is_finite() {
            return Err(BacktestError::config("initial_leverage must be finite"));
        }

        match self.model {
            ModelConfig::Continuous {
                fee_rate,
                slippage_rate,
                ..
            } => {
                for (name, rate) in [("fee_rate", fee_rate), ("slippage_rate", slippage_rate)] {
                    if !rate.is_finite() || rate < 0.0 {
                        return Err(BacktestError::config(format!(
                            "{name} must be a non-negative number, got {rate}"
                        )));
                    }
                }
            }
            ModelConfig::Discrete {
                initial_capital,
                contract_multiplier,
                ..
            } => {
                if !initial_capital.is_finite() || initial_capital <= 0.0 {
                    return Err(BacktestError::config(format!(
                        "initial_capital must be positive, got {initial_capital}"
                    )));
                }
                if !contract_multiplier.is_finite() || contract_multiplier <= 0.0 {
                    return Err(BacktestError::config(format!(
                        "contract_multiplier must be positive, got {contract_multiplier}"
                    )));
                }
            }
        }

        Ok(())
    }

    //load configuration from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: BacktestConfig = serde_json::from_str(&contents)?;
        Ok(config)
    }

    //save configuration to a JSON file
    pub fn to_json_file<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
