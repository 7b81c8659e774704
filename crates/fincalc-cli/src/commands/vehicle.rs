use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use fincalc_core::vehicle::{self, VehicleCostInput};

use crate::input;
use crate::Context;

/// Arguments for the vehicle cost outlook
#[derive(Args)]
pub struct VehicleArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,

    /// Today's price of the vehicle
    #[arg(long)]
    pub price: Option<Decimal>,

    /// Today's annual fuel spend
    #[arg(long, default_value = "0")]
    pub fuel: Decimal,

    #[arg(long, default_value = "10")]
    pub years: u32,
}

pub fn run_vehicle(args: VehicleArgs, ctx: &Context) -> Result<Value, Box<dyn std::error::Error>> {
    let veh_input = match input::read_input::<VehicleCostInput>(args.input.as_deref())? {
        Some(i) => i,
        None => VehicleCostInput {
            vehicle_price: args.price.ok_or("--price is required (or provide --input)")?,
            annual_fuel_cost: args.fuel,
            years: args.years,
        },
    };

    let result = vehicle::calculate_vehicle_costs(&veh_input, &ctx.assumptions)?;
    Ok(serde_json::to_value(result)?)
}
