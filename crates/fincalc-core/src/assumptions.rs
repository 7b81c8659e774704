//! Policy assumptions behind the planners.
//!
//! These are tunable modelling choices, not market data. Every constant is
//! exposed through `PolicyAssumptions` so callers can override it from a JSON
//! file without touching the engine.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::FinCalcError;
use crate::types::Rate;
use crate::FinCalcResult;

/// Years between an individual and their heir.
pub const GENERATION_GAP_YEARS: u32 = 25;

/// Widest generation gap the planner accepts.
pub const MAX_GENERATION_GAP_YEARS: u32 = 100;

/// Cumulative healthcare erosion applied per generation (2% × generation index).
pub const HEALTHCARE_EROSION_PER_GENERATION: Rate = dec!(0.02);

/// Annual new-vehicle price inflation.
pub const VEHICLE_PRICE_INFLATION: Rate = dec!(0.04);

/// Annual fuel price inflation.
pub const FUEL_PRICE_INFLATION: Rate = dec!(0.04);

/// Rate offset between the conservative/current/aggressive scenarios.
pub const DEFAULT_SCENARIO_SPREAD: Rate = dec!(0.02);

/// Assumptions used by the multi-generation wealth planner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacyAssumptions {
    pub generation_gap_years: u32,
    pub healthcare_erosion_per_generation: Rate,
}

impl Default for LegacyAssumptions {
    fn default() -> Self {
        Self {
            generation_gap_years: GENERATION_GAP_YEARS,
            healthcare_erosion_per_generation: HEALTHCARE_EROSION_PER_GENERATION,
        }
    }
}

impl LegacyAssumptions {
    pub fn validate(&self) -> FinCalcResult<()> {
        if self.generation_gap_years == 0 || self.generation_gap_years > MAX_GENERATION_GAP_YEARS {
            return Err(FinCalcError::InvalidInput {
                field: "legacy.generation_gap_years".into(),
                reason: format!(
                    "Generation gap must be between 1 and {MAX_GENERATION_GAP_YEARS} years"
                ),
            });
        }
        if self.healthcare_erosion_per_generation < Decimal::ZERO {
            return Err(FinCalcError::InvalidInput {
                field: "legacy.healthcare_erosion_per_generation".into(),
                reason: "Healthcare erosion cannot be negative".into(),
            });
        }
        Ok(())
    }
}

/// Every overridable planning constant in one place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyAssumptions {
    pub legacy: LegacyAssumptions,
    pub vehicle_price_inflation: Rate,
    pub fuel_price_inflation: Rate,
    pub scenario_spread: Rate,
}

impl Default for PolicyAssumptions {
    fn default() -> Self {
        Self {
            legacy: LegacyAssumptions::default(),
            vehicle_price_inflation: VEHICLE_PRICE_INFLATION,
            fuel_price_inflation: FUEL_PRICE_INFLATION,
            scenario_spread: DEFAULT_SCENARIO_SPREAD,
        }
    }
}

impl PolicyAssumptions {
    /// Parse assumptions from JSON; omitted fields keep their defaults.
    pub fn from_json_str(json: &str) -> FinCalcResult<Self> {
        let parsed: Self = serde_json::from_str(json)?;
        parsed.validate()?;
        Ok(parsed)
    }

    pub fn from_json_path(path: &Path) -> FinCalcResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Load assumptions, degrading to the defaults when the file is unusable.
    pub fn load_or_default(path: &Path) -> Self {
        crate::content::or_default(
            "policy assumptions",
            Self::from_json_path(path),
            Self::default,
        )
    }

    fn validate(&self) -> FinCalcResult<()> {
        self.legacy.validate()?;
        if self.scenario_spread < Decimal::ZERO {
            return Err(FinCalcError::InvalidInput {
                field: "scenario_spread".into(),
                reason: "Scenario spread cannot be negative".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override_keeps_defaults() {
        let parsed =
            PolicyAssumptions::from_json_str(r#"{"vehicle_price_inflation": "0.05"}"#).unwrap();
        assert_eq!(parsed.vehicle_price_inflation, dec!(0.05));
        assert_eq!(parsed.fuel_price_inflation, FUEL_PRICE_INFLATION);
        assert_eq!(parsed.legacy.generation_gap_years, 25);
    }

    #[test]
    fn test_zero_generation_gap_rejected() {
        let json = r#"{"legacy": {"generation_gap_years": 0}}"#;
        assert!(PolicyAssumptions::from_json_str(json).is_err());
        let json = r#"{"legacy": {"generation_gap_years": 1000}}"#;
        assert!(PolicyAssumptions::from_json_str(json).is_err());
    }

    #[test]
    fn test_missing_file_falls_back() {
        let loaded = PolicyAssumptions::load_or_default(Path::new("/nonexistent/assumptions.json"));
        assert_eq!(loaded, PolicyAssumptions::default());
    }
}
