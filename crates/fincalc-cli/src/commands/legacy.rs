use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use fincalc_core::legacy::{self, LegacyInput};
use fincalc_core::tables::Strategy;
use fincalc_core::Currency;

use crate::input;
use crate::Context;

/// Arguments for multi-generation wealth planning
#[derive(Args)]
pub struct LegacyArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,

    /// Wealth handed to the first generation
    #[arg(long)]
    pub wealth: Option<Decimal>,

    /// Currency used for reference rate lookups
    #[arg(long, default_value = "USD")]
    pub currency: Currency,

    /// Investment strategy: conservative, balanced, aggressive
    #[arg(long, default_value = "balanced")]
    pub strategy: Strategy,

    /// Number of generations to project
    #[arg(long, default_value = "3")]
    pub generations: u32,

    /// Override the portfolio return from the tables
    #[arg(long, allow_hyphen_values = true)]
    pub portfolio_return: Option<Decimal>,

    /// Override general inflation from the tables
    #[arg(long, allow_hyphen_values = true)]
    pub inflation: Option<Decimal>,

    /// Override the healthcare inflation multiplier
    #[arg(long)]
    pub healthcare_multiplier: Option<Decimal>,
}

pub fn run_legacy(args: LegacyArgs, ctx: &Context) -> Result<Value, Box<dyn std::error::Error>> {
    let mut legacy_input = match input::read_input::<LegacyInput>(args.input.as_deref())? {
        Some(i) => i,
        None => LegacyInput {
            initial_wealth: args.wealth.ok_or("--wealth is required (or provide --input)")?,
            currency: args.currency,
            strategy: args.strategy,
            generation_count: args.generations,
            portfolio_return: args.portfolio_return,
            general_inflation: args.inflation,
            healthcare_inflation_multiplier: args.healthcare_multiplier,
            assumptions: None,
        },
    };
    legacy_input.fill_assumptions(ctx.assumptions.legacy);

    let result = legacy::plan_legacy(&legacy_input, &ctx.tables)?;
    Ok(serde_json::to_value(result)?)
}
