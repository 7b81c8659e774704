//! Vehicle ownership cost outlook: what the same car and the same driving
//! will cost in future years under fixed price-inflation assumptions.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::assumptions::PolicyAssumptions;
use crate::error::FinCalcError;
use crate::math::grow;
use crate::projection::require_representable;
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::FinCalcResult;

pub const MAX_VEHICLE_YEARS: u32 = 50;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleCostInput {
    pub vehicle_price: Money,
    #[serde(default)]
    pub annual_fuel_cost: Money,
    pub years: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleCostYear {
    pub year: u32,
    pub vehicle_price: Money,
    pub annual_fuel_cost: Money,
    /// Fuel bought in years 0..year.
    pub cumulative_fuel_cost: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleCostOutput {
    pub years: Vec<VehicleCostYear>,
    pub replacement_price_increase: Money,
    pub total_fuel_cost: Money,
}

pub fn project_vehicle_costs(
    input: &VehicleCostInput,
    assumptions: &PolicyAssumptions,
) -> Vec<VehicleCostYear> {
    let mut cumulative = Decimal::ZERO;
    (0..=input.years)
        .map(|year| {
            let fuel = grow(input.annual_fuel_cost, assumptions.fuel_price_inflation, year);
            let row = VehicleCostYear {
                year,
                vehicle_price: grow(input.vehicle_price, assumptions.vehicle_price_inflation, year),
                annual_fuel_cost: fuel,
                cumulative_fuel_cost: cumulative,
            };
            cumulative = cumulative.saturating_add(fuel);
            row
        })
        .collect()
}

pub fn calculate_vehicle_costs(
    input: &VehicleCostInput,
    assumptions: &PolicyAssumptions,
) -> FinCalcResult<ComputationOutput<VehicleCostOutput>> {
    let start = Instant::now();

    if input.vehicle_price <= Decimal::ZERO {
        return Err(FinCalcError::InvalidInput {
            field: "vehicle_price".into(),
            reason: "Vehicle price must be greater than zero".into(),
        });
    }
    if input.annual_fuel_cost < Decimal::ZERO {
        return Err(FinCalcError::InvalidInput {
            field: "annual_fuel_cost".into(),
            reason: "Fuel cost must not be negative".into(),
        });
    }
    if input.years == 0 || input.years > MAX_VEHICLE_YEARS {
        return Err(FinCalcError::InvalidInput {
            field: "years".into(),
            reason: format!("Years must be between 1 and {MAX_VEHICLE_YEARS}"),
        });
    }

    require_representable(
        "vehicle_price",
        input.vehicle_price,
        assumptions.vehicle_price_inflation,
        input.years,
    )?;
    require_representable(
        "annual_fuel_cost",
        input.annual_fuel_cost,
        assumptions.fuel_price_inflation,
        input.years,
    )?;

    let years = project_vehicle_costs(input, assumptions);
    let (replacement_price_increase, total_fuel_cost) = years
        .last()
        .map(|last| (last.vehicle_price - input.vehicle_price, last.cumulative_fuel_cost))
        .unwrap_or((Decimal::ZERO, Decimal::ZERO));

    let output = VehicleCostOutput {
        years,
        replacement_price_increase,
        total_fuel_cost,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Fixed-Rate Vehicle and Fuel Price Inflation",
        &serde_json::json!({
            "vehicle_price_inflation": assumptions.vehicle_price_inflation.to_string(),
            "fuel_price_inflation": assumptions.fuel_price_inflation.to_string(),
        }),
        Vec::new(),
        elapsed,
        output,
    ))
}
