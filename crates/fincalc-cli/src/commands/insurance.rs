use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use fincalc_core::insurance::{self, InsuranceInput};
use fincalc_core::Currency;

use crate::input;
use crate::Context;

/// Arguments for premium inflation
#[derive(Args)]
pub struct InsuranceArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,

    /// Current annual premium
    #[arg(long)]
    pub premium: Option<Decimal>,

    #[arg(long, default_value = "USD")]
    pub currency: Currency,

    /// Projection horizon in years
    #[arg(long, default_value = "20")]
    pub years: u32,

    /// Override medical inflation from the tables
    #[arg(long, allow_hyphen_values = true)]
    pub medical_inflation: Option<Decimal>,

    /// Override general inflation from the tables
    #[arg(long, allow_hyphen_values = true)]
    pub general_inflation: Option<Decimal>,
}

pub fn run_insurance(args: InsuranceArgs, ctx: &Context) -> Result<Value, Box<dyn std::error::Error>> {
    let ins_input = match input::read_input::<InsuranceInput>(args.input.as_deref())? {
        Some(i) => i,
        None => InsuranceInput {
            annual_premium: args.premium.ok_or("--premium is required (or provide --input)")?,
            currency: args.currency,
            years: args.years,
            medical_inflation: args.medical_inflation,
            general_inflation: args.general_inflation,
        },
    };

    let result = insurance::calculate_insurance_inflation(&ins_input, &ctx.tables)?;
    Ok(serde_json::to_value(result)?)
}
