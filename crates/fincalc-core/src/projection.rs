//! Compound growth projections.
//!
//! The series is the primary product: every caller needs both the final
//! figure and the trajectory, so the final value is simply the last point.

use log::debug;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::FinCalcError;
use crate::math::{checked_grow, checked_pow_frac, deflate, grow};
use crate::types::{with_metadata, CompoundingUnit, ComputationOutput, Money, Rate};
use crate::FinCalcResult;

/// Longest horizon the validated entry points accept (100 years of months).
pub const MAX_PERIODS: u32 = 1200;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Input snapshot for a compound projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionInput {
    pub base_value: Money,
    /// Annual growth rate; negative for erosion scenarios.
    pub annual_rate: Rate,
    pub periods: u32,
    #[serde(default)]
    pub compounding: CompoundingUnit,
    /// Optional annual deflator (e.g. general inflation) for real values.
    #[serde(default)]
    pub deflator_rate: Option<Rate>,
}

/// One point of a projection series. Index in the series equals `period`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionPoint {
    pub period: u32,
    pub nominal_value: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub real_value: Option<Money>,
}

/// Output of `run_projection`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionOutput {
    pub series: Vec<ProjectionPoint>,
    pub final_nominal_value: Money,
    pub final_real_value: Option<Money>,
    pub total_growth: Money,
    pub total_growth_pct: Rate,
    /// Annualised growth of the nominal series.
    pub cagr: Option<Rate>,
}

// ---------------------------------------------------------------------------
// Pure calculators
// ---------------------------------------------------------------------------

/// Project `base_value` forward at `rate` per period for `periods` periods.
pub fn project(base_value: Money, rate: Rate, periods: u32) -> Vec<ProjectionPoint> {
    (0..=periods)
        .map(|p| ProjectionPoint {
            period: p,
            nominal_value: grow(base_value, rate, p),
            real_value: None,
        })
        .collect()
}

/// Project nominal growth and its real value under a second (deflator) rate.
pub fn project_with_deflator(
    base_value: Money,
    rate: Rate,
    deflator_rate: Rate,
    periods: u32,
) -> Vec<ProjectionPoint> {
    (0..=periods)
        .map(|p| {
            let nominal_value = grow(base_value, rate, p);
            ProjectionPoint {
                period: p,
                nominal_value,
                real_value: deflate(nominal_value, deflator_rate, p),
            }
        })
        .collect()
}

/// Project a full input snapshot, converting annual rates to the compounding unit.
pub fn project_input(input: &ProjectionInput) -> Vec<ProjectionPoint> {
    let rate = input.compounding.periodic_rate(input.annual_rate);
    match input.deflator_rate {
        Some(deflator) => project_with_deflator(
            input.base_value,
            rate,
            input.compounding.periodic_rate(deflator),
            input.periods,
        ),
        None => project(input.base_value, rate, input.periods),
    }
}

/// Compound annual growth rate: (end / start)^(1 / years) - 1.
pub fn cagr(start: Money, end: Money, years: Decimal) -> Option<Rate> {
    if start <= Decimal::ZERO || end <= Decimal::ZERO || years <= Decimal::ZERO {
        return None;
    }
    let ratio = end.checked_div(start)?;
    let exponent = Decimal::ONE.checked_div(years)?;
    checked_pow_frac(ratio, exponent).map(|g| g - Decimal::ONE)
}

/// What `amount` today is worth after `years` of `inflation_rate`.
pub fn purchasing_power(amount: Money, inflation_rate: Rate, years: u32) -> Money {
    deflate(amount, inflation_rate, years).unwrap_or(Decimal::ZERO)
}

// ---------------------------------------------------------------------------
// Validated entry point
// ---------------------------------------------------------------------------

pub(crate) fn validate_projection_input(input: &ProjectionInput) -> FinCalcResult<()> {
    if input.base_value <= Decimal::ZERO {
        return Err(FinCalcError::InvalidInput {
            field: "base_value".into(),
            reason: "Base value must be greater than zero".into(),
        });
    }
    if input.annual_rate <= dec!(-1) {
        return Err(FinCalcError::InvalidInput {
            field: "annual_rate".into(),
            reason: "Rate must be greater than -100%".into(),
        });
    }
    if let Some(deflator) = input.deflator_rate {
        if deflator <= dec!(-1) {
            return Err(FinCalcError::InvalidInput {
                field: "deflator_rate".into(),
                reason: "Deflator must be greater than -100%".into(),
            });
        }
    }
    if input.periods > MAX_PERIODS {
        return Err(FinCalcError::InvalidInput {
            field: "periods".into(),
            reason: format!("At most {MAX_PERIODS} periods are supported"),
        });
    }
    Ok(())
}

/// Reject a growth path whose endpoint would leave the Decimal range.
pub(crate) fn require_representable(
    field: &str,
    base_value: Money,
    rate: Rate,
    periods: u32,
) -> FinCalcResult<()> {
    match checked_grow(base_value, rate, periods) {
        Some(_) => Ok(()),
        None => Err(FinCalcError::InvalidInput {
            field: field.into(),
            reason: format!(
                "Growing {base_value} at {rate} for {periods} periods exceeds the representable range"
            ),
        }),
    }
}

/// Range check for a full snapshot: nominal growth and the deflator compound.
pub(crate) fn require_projection_in_range(
    input: &ProjectionInput,
    rate_field: &str,
) -> FinCalcResult<()> {
    let periodic = input.compounding.periodic_rate(input.annual_rate);
    require_representable(rate_field, input.base_value, periodic, input.periods)?;
    if let Some(deflator) = input.deflator_rate {
        let periodic = input.compounding.periodic_rate(deflator);
        require_representable("deflator_rate", Decimal::ONE, periodic, input.periods)?;
    }
    Ok(())
}

/// Validate and run a projection, summarising the endpoint.
pub fn run_projection(input: &ProjectionInput) -> FinCalcResult<ComputationOutput<ProjectionOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();
    validate_projection_input(input)?;
    debug!(
        "projecting {} over {} {:?} periods at {}",
        input.base_value, input.periods, input.compounding, input.annual_rate
    );

    require_projection_in_range(input, "annual_rate")?;

    if input.annual_rate > dec!(0.5) {
        warnings.push(format!(
            "Annual rate of {}% is unusually high",
            (input.annual_rate * dec!(100)).round_dp(2)
        ));
    }

    let series = project_input(input);
    let last = series.last().cloned().unwrap_or(ProjectionPoint {
        period: 0,
        nominal_value: input.base_value,
        real_value: None,
    });

    let total_growth = last.nominal_value - input.base_value;
    let total_growth_pct =
        total_growth
            .checked_div(input.base_value)
            .ok_or_else(|| FinCalcError::InvalidInput {
                field: "base_value".into(),
                reason: "Total growth relative to the base exceeds the representable range".into(),
            })?;
    let years = Decimal::from(input.periods) / Decimal::from(input.compounding.periods_per_year());
    let growth_rate = cagr(input.base_value, last.nominal_value, years);

    let output = ProjectionOutput {
        final_nominal_value: last.nominal_value,
        final_real_value: last.real_value,
        total_growth,
        total_growth_pct,
        cagr: growth_rate,
        series,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Compound Growth Projection",
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
    fn test_zero_periods_is_single_point() {
        let series = project(dec!(1000), dec!(0.03), 0);
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].nominal_value, dec!(1000));
    }

    #[test]
    fn test_project_endpoint() {
        let series = project(dec!(1000), dec!(0.10), 2);
        assert_eq!(series[2].nominal_value, dec!(1210));
        assert_eq!(series[2].period, 2);
    }

    #[test]
    fn test_deflator_matching_rate_keeps_real_value_flat() {
        let series = project_with_deflator(dec!(500), dec!(0.04), dec!(0.04), 5);
        for point in &series {
            let real = point.real_value.unwrap();
            assert!((real - dec!(500)).abs() < dec!(0.0000001));
        }
    }

    #[test]
    fn test_monthly_compounding_uses_twelfth_of_rate() {
        let input = ProjectionInput {
            base_value: dec!(1000),
            annual_rate: dec!(0.12),
            periods: 12,
            compounding: CompoundingUnit::Month,
            deflator_rate: None,
        };
        let series = project_input(&input);
        assert_eq!(series.len(), 13);
        // 1000 * 1.01^12 = 1126.825...
        assert!((series[12].nominal_value - dec!(1126.83)).abs() < dec!(0.01));
    }

    #[test]
    fn test_cagr_round_trip() {
        let growth = cagr(dec!(100), dec!(121), dec!(2)).unwrap();
        assert!((growth - dec!(0.10)).abs() < dec!(0.000001));
        assert!(cagr(Decimal::ZERO, dec!(121), dec!(2)).is_none());
        assert!(cagr(dec!(100), dec!(121), Decimal::ZERO).is_none());
    }

    #[test]
    fn test_purchasing_power() {
        assert_eq!(purchasing_power(dec!(121), dec!(0.10), 2), dec!(100));
    }

    #[test]
    fn test_run_projection_rejects_bad_input() {
        let mut input = ProjectionInput {
            base_value: Decimal::ZERO,
            annual_rate: dec!(0.03),
            periods: 10,
            compounding: CompoundingUnit::Year,
            deflator_rate: None,
        };
        assert!(run_projection(&input).is_err());
        input.base_value = dec!(100);
        input.periods = MAX_PERIODS + 1;
        assert!(run_projection(&input).is_err());
        input.periods = 10;
        input.annual_rate = dec!(-1);
        assert!(run_projection(&input).is_err());
    }

    #[test]
    fn test_run_projection_summary() {
        let input = ProjectionInput {
            base_value: dec!(1000),
            annual_rate: dec!(0.10),
            periods: 2,
            compounding: CompoundingUnit::Year,
            deflator_rate: Some(dec!(0.10)),
        };
        let out = run_projection(&input).unwrap();
        assert_eq!(out.result.final_nominal_value, dec!(1210));
        assert_eq!(out.result.final_real_value, Some(dec!(1000)));
        assert_eq!(out.result.total_growth, dec!(210));
        assert_eq!(out.result.total_growth_pct, dec!(0.21));
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_run_projection_rejects_unrepresentable_growth() {
        let mut input = ProjectionInput {
            base_value: dec!(0.5),
            annual_rate: dec!(1000),
            periods: 100,
            compounding: CompoundingUnit::Year,
            deflator_rate: None,
        };
        let err = run_projection(&input).unwrap_err();
        assert!(matches!(err, FinCalcError::InvalidInput { ref field, .. } if field == "annual_rate"));

        // 0.5 × 1001^5 ≈ 5.02e14 still fits
        input.periods = 5;
        let out = run_projection(&input).unwrap();
        assert!(out.result.final_nominal_value > dec!(500000000000000));
        assert!(out.result.total_growth_pct > Decimal::ZERO);
    }

    #[test]
    fn test_run_projection_rejects_unrepresentable_deflator() {
        let input = ProjectionInput {
            base_value: dec!(100),
            annual_rate: dec!(0.03),
            periods: 100,
            compounding: CompoundingUnit::Year,
            deflator_rate: Some(dec!(1000)),
        };
        let err = run_projection(&input).unwrap_err();
        assert!(matches!(err, FinCalcError::InvalidInput { ref field, .. } if field == "deflator_rate"));
    }
}
