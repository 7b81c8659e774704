use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use fincalc_core::ppp::{self, PppInput};
use fincalc_core::Currency;

use crate::input;
use crate::Context;

/// Arguments for a purchasing power parity conversion
#[derive(Args)]
pub struct PppArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,

    /// Amount in the source currency
    #[arg(long)]
    pub amount: Option<Decimal>,

    /// Source currency code
    #[arg(long, default_value = "USD")]
    pub from: Currency,

    /// Destination currency code
    #[arg(long)]
    pub to: Option<Currency>,

    /// Years to project the equivalent forward
    #[arg(long, default_value = "0")]
    pub years: u32,
}

pub fn run_ppp(args: PppArgs, ctx: &Context) -> Result<Value, Box<dyn std::error::Error>> {
    let ppp_input = match input::read_input::<PppInput>(args.input.as_deref())? {
        Some(i) => i,
        None => PppInput {
            amount: args.amount.ok_or("--amount is required (or provide --input)")?,
            from_currency: args.from,
            to_currency: args.to.ok_or("--to is required (or provide --input)")?,
            years: args.years,
            from_factor: None,
            to_factor: None,
        },
    };

    let result = ppp::calculate_ppp(&ppp_input, &ctx.tables)?;
    Ok(serde_json::to_value(result)?)
}
