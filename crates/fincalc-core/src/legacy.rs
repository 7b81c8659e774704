//! Multi-generation wealth planner.
//!
//! Chains compound growth across fixed generation gaps and subtracts two
//! competing erosion factors: general inflation (through the real return) and
//! healthcare costs (a cumulative per-generation haircut).

use log::debug;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::assumptions::LegacyAssumptions;
use crate::error::FinCalcError;
use crate::math::grow;
use crate::projection::require_representable;
use crate::tables::{RateTables, Strategy};
use crate::types::{with_metadata, ComputationOutput, Currency, Money, Rate};
use crate::FinCalcResult;

/// Most generations the validated planner will project.
pub const MAX_GENERATIONS: u32 = 10;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Wealth position at the end of one generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationStep {
    pub generation_index: u32,
    pub years_elapsed: u32,
    pub nominal_value: Money,
    pub inflation_adjusted_value: Money,
    pub inflation_loss: Money,
    pub healthcare_loss: Money,
    /// Clamped to [0, nominal_value].
    pub real_value_retained: Money,
    pub purchasing_power_retained_pct: Decimal,
}

/// Input for `plan_legacy`. Rates left empty are resolved from the rate tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyInput {
    pub initial_wealth: Money,
    #[serde(default)]
    pub currency: Currency,
    #[serde(default)]
    pub strategy: Strategy,
    pub generation_count: u32,
    #[serde(default)]
    pub portfolio_return: Option<Rate>,
    #[serde(default)]
    pub general_inflation: Option<Rate>,
    #[serde(default)]
    pub healthcare_inflation_multiplier: Option<Decimal>,
    /// Gap and erosion overrides; the built-in defaults apply when absent.
    #[serde(default)]
    pub assumptions: Option<LegacyAssumptions>,
}

impl LegacyInput {
    /// Use `fallback` when the request carries no assumptions of its own.
    pub fn fill_assumptions(&mut self, fallback: LegacyAssumptions) {
        self.assumptions.get_or_insert(fallback);
    }
}

/// Output of `plan_legacy`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyOutput {
    pub portfolio_return: Rate,
    pub general_inflation: Rate,
    pub healthcare_inflation_multiplier: Decimal,
    pub steps: Vec<GenerationStep>,
    pub final_real_value_retained: Money,
    pub final_purchasing_power_retained_pct: Decimal,
}

// ---------------------------------------------------------------------------
// Pure calculators
// ---------------------------------------------------------------------------

/// Project wealth across `generation_count` generations spaced `gap_years` apart,
/// using the default healthcare erosion of 2% per generation.
pub fn project_generations(
    initial_wealth: Money,
    portfolio_return: Rate,
    general_inflation: Rate,
    healthcare_inflation_multiplier: Decimal,
    generation_count: u32,
    gap_years: u32,
) -> Vec<GenerationStep> {
    let assumptions = LegacyAssumptions {
        generation_gap_years: gap_years,
        ..LegacyAssumptions::default()
    };
    project_generations_with(
        &assumptions,
        initial_wealth,
        portfolio_return,
        general_inflation,
        healthcare_inflation_multiplier,
        generation_count,
    )
}

/// Same as `project_generations`, with gap and erosion taken from `assumptions`.
pub fn project_generations_with(
    assumptions: &LegacyAssumptions,
    initial_wealth: Money,
    portfolio_return: Rate,
    general_inflation: Rate,
    healthcare_inflation_multiplier: Decimal,
    generation_count: u32,
) -> Vec<GenerationStep> {
    let real_return = portfolio_return - general_inflation;

    (1..=generation_count)
        .map(|g| {
            let years = g.saturating_mul(assumptions.generation_gap_years);
            let nominal_value = grow(initial_wealth, portfolio_return, years);
            let inflation_adjusted_value = grow(initial_wealth, real_return, years);

            let erosion_factor = assumptions
                .healthcare_erosion_per_generation
                .saturating_mul(Decimal::from(g));
            let healthcare_erosion = inflation_adjusted_value
                .saturating_mul(erosion_factor)
                .saturating_mul(healthcare_inflation_multiplier);

            let real_value_retained = inflation_adjusted_value
                .saturating_sub(healthcare_erosion)
                .min(nominal_value)
                .max(Decimal::ZERO);

            let purchasing_power_retained_pct = if nominal_value > Decimal::ZERO {
                real_value_retained / nominal_value * dec!(100)
            } else {
                Decimal::ZERO
            };

            GenerationStep {
                generation_index: g,
                years_elapsed: years,
                nominal_value,
                inflation_adjusted_value,
                inflation_loss: nominal_value.saturating_sub(inflation_adjusted_value),
                healthcare_loss: healthcare_erosion,
                real_value_retained,
                purchasing_power_retained_pct,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Validated entry point
// ---------------------------------------------------------------------------

/// Resolve rates from the tables, validate, and project the generations.
pub fn plan_legacy(
    input: &LegacyInput,
    tables: &RateTables,
) -> FinCalcResult<ComputationOutput<LegacyOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.initial_wealth <= Decimal::ZERO {
        return Err(FinCalcError::InvalidInput {
            field: "initial_wealth".into(),
            reason: "Initial wealth must be greater than zero".into(),
        });
    }
    if input.generation_count == 0 || input.generation_count > MAX_GENERATIONS {
        return Err(FinCalcError::InvalidInput {
            field: "generation_count".into(),
            reason: format!("Generation count must be between 1 and {MAX_GENERATIONS}"),
        });
    }
    let assumptions = input.assumptions.unwrap_or_default();
    assumptions.validate()?;

    let portfolio_return = match input.portfolio_return {
        Some(r) => r,
        None => tables.portfolio_return(&input.currency, input.strategy)?,
    };
    let general_inflation = match input.general_inflation {
        Some(r) => r,
        None => tables.general_inflation(&input.currency)?,
    };
    let healthcare_inflation_multiplier = match input.healthcare_inflation_multiplier {
        Some(m) => m,
        None => tables.healthcare_multiplier(&input.currency)?,
    };

    for (field, rate) in [
        ("portfolio_return", portfolio_return),
        ("general_inflation", general_inflation),
    ] {
        if rate <= dec!(-1) {
            return Err(FinCalcError::InvalidInput {
                field: field.into(),
                reason: "Rate must be greater than -100%".into(),
            });
        }
    }
    if healthcare_inflation_multiplier < Decimal::ZERO {
        return Err(FinCalcError::InvalidInput {
            field: "healthcare_inflation_multiplier".into(),
            reason: "Multiplier cannot be negative".into(),
        });
    }

    let horizon = input.generation_count * assumptions.generation_gap_years;
    require_representable("portfolio_return", input.initial_wealth, portfolio_return, horizon)?;
    require_representable(
        "general_inflation",
        input.initial_wealth,
        portfolio_return - general_inflation,
        horizon,
    )?;

    if portfolio_return < general_inflation {
        warnings.push("Portfolio return is below inflation; real wealth shrinks every year".into());
    }
    debug!(
        "legacy plan: {} {} over {} generations at {} (inflation {}, healthcare x{})",
        input.initial_wealth,
        input.currency,
        input.generation_count,
        portfolio_return,
        general_inflation,
        healthcare_inflation_multiplier
    );

    let steps = project_generations_with(
        &assumptions,
        input.initial_wealth,
        portfolio_return,
        general_inflation,
        healthcare_inflation_multiplier,
        input.generation_count,
    );

    if let Some(exhausted) = steps.iter().find(|s| s.real_value_retained.is_zero()) {
        warnings.push(format!(
            "Healthcare erosion consumes all real value by generation {}",
            exhausted.generation_index
        ));
    }

    let (final_real_value_retained, final_purchasing_power_retained_pct) = steps
        .last()
        .map(|s| (s.real_value_retained, s.purchasing_power_retained_pct))
        .unwrap_or((Decimal::ZERO, Decimal::ZERO));

    let output = LegacyOutput {
        portfolio_return,
        general_inflation,
        healthcare_inflation_multiplier,
        steps,
        final_real_value_retained,
        final_purchasing_power_retained_pct,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Multi-Generation Wealth Erosion (real return less cumulative healthcare haircut)",
        &serde_json::json!({
            "currency": input.currency,
            "strategy": input.strategy,
            "generation_gap_years": assumptions.generation_gap_years,
            "healthcare_erosion_per_generation": assumptions.healthcare_erosion_per_generation.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_zero_generations_is_empty() {
        let steps = project_generations(dec!(1_000_000), dec!(0.075), dec!(0.032), dec!(1.81), 0, 25);
        assert!(steps.is_empty());
    }

    #[test]
    fn test_first_generation_hand_calc() {
        // Flat returns isolate the healthcare haircut: 100 * (1 - 0.02 * 1.5) = 97
        let steps = project_generations(dec!(100), Decimal::ZERO, Decimal::ZERO, dec!(1.5), 1, 25);
        let s = &steps[0];
        assert_eq!(s.years_elapsed, 25);
        assert_eq!(s.nominal_value, dec!(100));
        assert_eq!(s.inflation_loss, Decimal::ZERO);
        assert_eq!(s.healthcare_loss, dec!(3));
        assert_eq!(s.real_value_retained, dec!(97));
        assert_eq!(s.purchasing_power_retained_pct, dec!(97));
    }

    #[test]
    fn test_custom_erosion_assumption() {
        let assumptions = LegacyAssumptions {
            generation_gap_years: 10,
            healthcare_erosion_per_generation: dec!(0.05),
        };
        let steps = project_generations_with(&assumptions, dec!(100), Decimal::ZERO, Decimal::ZERO, Decimal::ONE, 2);
        assert_eq!(steps[1].years_elapsed, 20);
        assert_eq!(steps[1].real_value_retained, dec!(90));
    }

    #[test]
    fn test_retained_clamped_at_zero() {
        let steps = project_generations(dec!(1000), dec!(0.05), dec!(0.02), dec!(100), 2, 25);
        assert!(steps.iter().all(|s| s.real_value_retained == Decimal::ZERO));
    }

    #[test]
    fn test_deflation_does_not_exceed_nominal() {
        let steps = project_generations(dec!(1000), dec!(0.02), dec!(-0.03), Decimal::ZERO, 2, 25);
        for s in &steps {
            assert!(s.inflation_adjusted_value > s.nominal_value);
            assert_eq!(s.real_value_retained, s.nominal_value);
        }
    }

    #[test]
    fn test_plan_legacy_resolves_from_tables() {
        let input = LegacyInput {
            initial_wealth: dec!(1_000_000),
            currency: Currency::USD,
            strategy: Strategy::Balanced,
            generation_count: 3,
            portfolio_return: None,
            general_inflation: None,
            healthcare_inflation_multiplier: None,
            assumptions: None,
        };
        let out = plan_legacy(&input, &RateTables::default()).unwrap();
        assert_eq!(out.result.portfolio_return, dec!(0.075));
        assert_eq!(out.result.general_inflation, dec!(0.032));
        assert_eq!(out.result.healthcare_inflation_multiplier, dec!(1.8125));
        assert_eq!(out.result.steps.len(), 3);
    }

    #[test]
    fn test_plan_legacy_rejects_zero_generations() {
        let input = LegacyInput {
            initial_wealth: dec!(1_000_000),
            currency: Currency::USD,
            strategy: Strategy::Balanced,
            generation_count: 0,
            portfolio_return: None,
            general_inflation: None,
            healthcare_inflation_multiplier: None,
            assumptions: None,
        };
        assert!(plan_legacy(&input, &RateTables::default()).is_err());
    }

    #[test]
    fn test_plan_legacy_assumption_overrides() {
        let mut input = LegacyInput {
            initial_wealth: dec!(100),
            currency: Currency::USD,
            strategy: Strategy::Balanced,
            generation_count: 2,
            portfolio_return: Some(Decimal::ZERO),
            general_inflation: Some(Decimal::ZERO),
            healthcare_inflation_multiplier: Some(Decimal::ONE),
            assumptions: None,
        };
        let defaults = plan_legacy(&input, &RateTables::default()).unwrap();
        assert_eq!(defaults.result.steps[1].years_elapsed, 50);

        input.assumptions = Some(LegacyAssumptions {
            generation_gap_years: 30,
            healthcare_erosion_per_generation: dec!(0.05),
        });
        let custom = plan_legacy(&input, &RateTables::default()).unwrap();
        assert_eq!(custom.result.steps[1].years_elapsed, 60);
        assert_eq!(custom.result.final_real_value_retained, dec!(90));

        // A request's own assumptions win over the fallback
        input.fill_assumptions(LegacyAssumptions::default());
        assert_eq!(input.assumptions.map(|a| a.generation_gap_years), Some(30));
        input.assumptions = None;
        input.fill_assumptions(LegacyAssumptions {
            generation_gap_years: 40,
            ..LegacyAssumptions::default()
        });
        let filled = plan_legacy(&input, &RateTables::default()).unwrap();
        assert_eq!(filled.result.steps[1].years_elapsed, 80);
    }

    #[test]
    fn test_plan_legacy_rejects_unrepresentable_return() {
        let input = LegacyInput {
            initial_wealth: dec!(1_000_000),
            currency: Currency::USD,
            strategy: Strategy::Balanced,
            generation_count: MAX_GENERATIONS,
            portfolio_return: Some(dec!(5)),
            general_inflation: None,
            healthcare_inflation_multiplier: None,
            assumptions: None,
        };
        let err = plan_legacy(&input, &RateTables::default()).unwrap_err();
        assert!(matches!(err, FinCalcError::InvalidInput { ref field, .. } if field == "portfolio_return"));
    }
}
