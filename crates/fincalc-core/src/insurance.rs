//! Insurance premium inflation.
//!
//! Premiums track medical inflation; their real burden is measured against
//! general inflation.

use log::debug;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::FinCalcError;
use crate::projection::{project_with_deflator, require_representable, ProjectionPoint};
use crate::tables::RateTables;
use crate::types::{with_metadata, ComputationOutput, Currency, Money, Rate};
use crate::FinCalcResult;

/// Longest premium horizon accepted.
pub const MAX_PREMIUM_YEARS: u32 = 100;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsuranceInput {
    pub annual_premium: Money,
    #[serde(default)]
    pub currency: Currency,
    pub years: u32,
    #[serde(default)]
    pub medical_inflation: Option<Rate>,
    #[serde(default)]
    pub general_inflation: Option<Rate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsuranceOutput {
    pub medical_inflation: Rate,
    pub general_inflation: Rate,
    pub series: Vec<ProjectionPoint>,
    pub final_premium: Money,
    /// Final premium as a multiple of today's.
    pub premium_multiple: Decimal,
    /// Premiums paid at the start of each year over the horizon.
    pub cumulative_premiums: Money,
    pub cumulative_real_premiums: Money,
}

/// Premium path: nominal grows at medical inflation, real is deflated by general inflation.
pub fn project_premiums(
    annual_premium: Money,
    medical_inflation: Rate,
    general_inflation: Rate,
    years: u32,
) -> Vec<ProjectionPoint> {
    project_with_deflator(annual_premium, medical_inflation, general_inflation, years)
}

fn out_of_range(field: &str) -> FinCalcError {
    FinCalcError::InvalidInput {
        field: field.into(),
        reason: "Premium totals exceed the representable range".into(),
    }
}

fn total(field: &str, mut values: impl Iterator<Item = Money>) -> FinCalcResult<Money> {
    values.try_fold(Decimal::ZERO, |acc, v| {
        acc.checked_add(v).ok_or_else(|| out_of_range(field))
    })
}

pub fn calculate_insurance_inflation(
    input: &InsuranceInput,
    tables: &RateTables,
) -> FinCalcResult<ComputationOutput<InsuranceOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.annual_premium <= Decimal::ZERO {
        return Err(FinCalcError::InvalidInput {
            field: "annual_premium".into(),
            reason: "Premium must be greater than zero".into(),
        });
    }
    if input.years == 0 || input.years > MAX_PREMIUM_YEARS {
        return Err(FinCalcError::InvalidInput {
            field: "years".into(),
            reason: format!("Years must be between 1 and {MAX_PREMIUM_YEARS}"),
        });
    }

    let medical_inflation = match input.medical_inflation {
        Some(r) => r,
        None => tables.medical_inflation(&input.currency)?,
    };
    let general_inflation = match input.general_inflation {
        Some(r) => r,
        None => tables.general_inflation(&input.currency)?,
    };
    for (field, rate) in [
        ("medical_inflation", medical_inflation),
        ("general_inflation", general_inflation),
    ] {
        if rate <= dec!(-1) {
            return Err(FinCalcError::InvalidInput {
                field: field.into(),
                reason: "Rate must be greater than -100%".into(),
            });
        }
    }
    require_representable(
        "medical_inflation",
        input.annual_premium,
        medical_inflation,
        input.years,
    )?;
    require_representable("general_inflation", Decimal::ONE, general_inflation, input.years)?;
    if medical_inflation < general_inflation {
        warnings.push("Medical inflation below general inflation; premiums shrink in real terms".into());
    }
    debug!(
        "insurance premium {} {} over {} years at medical {} / general {}",
        input.annual_premium, input.currency, input.years, medical_inflation, general_inflation
    );

    let series = project_premiums(input.annual_premium, medical_inflation, general_inflation, input.years);

    let paid = &series[..input.years as usize];
    let cumulative_premiums = total("medical_inflation", paid.iter().map(|p| p.nominal_value))?;
    let cumulative_real_premiums =
        total("general_inflation", paid.iter().filter_map(|p| p.real_value))?;
    let final_premium = series
        .last()
        .map(|p| p.nominal_value)
        .unwrap_or(input.annual_premium);
    let premium_multiple = final_premium
        .checked_div(input.annual_premium)
        .ok_or_else(|| out_of_range("annual_premium"))?;

    let output = InsuranceOutput {
        medical_inflation,
        general_inflation,
        premium_multiple,
        final_premium,
        cumulative_premiums,
        cumulative_real_premiums,
        series,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Medical-Inflation Premium Projection",
        input,
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
    fn test_premium_doubles_at_rule_of_72_pace() {
        let series = project_premiums(dec!(1000), dec!(0.072), dec!(0.03), 10);
        let last = series.last().unwrap();
        assert!((last.nominal_value - dec!(2004)).abs() < dec!(5));
        assert!(last.real_value.unwrap() < last.nominal_value);
    }

    #[test]
    fn test_cumulative_premiums_excludes_final_point() {
        let input = InsuranceInput {
            annual_premium: dec!(100),
            currency: Currency::USD,
            years: 2,
            medical_inflation: Some(dec!(0.10)),
            general_inflation: Some(Decimal::ZERO),
        };
        let out = calculate_insurance_inflation(&input, &RateTables::default()).unwrap();
        // 100 + 110 paid; the year-2 point (121) is the premium going forward
        assert_eq!(out.result.cumulative_premiums, dec!(210));
        assert_eq!(out.result.final_premium, dec!(121));
        assert_eq!(out.result.premium_multiple, dec!(1.21));
    }

    #[test]
    fn test_rates_resolved_from_tables() {
        let input = InsuranceInput {
            annual_premium: dec!(6000),
            currency: Currency::INR,
            years: 20,
            medical_inflation: None,
            general_inflation: None,
        };
        let out = calculate_insurance_inflation(&input, &RateTables::default()).unwrap();
        assert_eq!(out.result.medical_inflation, dec!(0.120));
        assert_eq!(out.result.series.len(), 21);
    }

    #[test]
    fn test_runaway_medical_inflation_is_rejected() {
        let input = InsuranceInput {
            annual_premium: dec!(6000),
            currency: Currency::USD,
            years: MAX_PREMIUM_YEARS,
            medical_inflation: Some(dec!(10)),
            general_inflation: None,
        };
        let err = calculate_insurance_inflation(&input, &RateTables::default()).unwrap_err();
        assert!(
            matches!(err, FinCalcError::InvalidInput { ref field, .. } if field == "medical_inflation")
        );
    }
}
