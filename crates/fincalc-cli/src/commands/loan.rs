use clap::Args;
use log::info;
use rust_decimal::Decimal;
use serde_json::Value;

use fincalc_core::loan::{self, AffordabilityInput, AmortizationInput, LoanInput};
use fincalc_core::tables::CreditTier;

use crate::input;
use crate::Context;

/// Arguments for plain amortization
#[derive(Args)]
pub struct AmortizeArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,

    /// Amount borrowed
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate (e.g. 0.06 for 6%)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Term in months
    #[arg(long)]
    pub term: Option<u32>,
}

/// Arguments for auto loan pricing
#[derive(Args)]
pub struct AutoLoanArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,

    /// Vehicle price before tax
    #[arg(long)]
    pub price: Option<Decimal>,

    #[arg(long, default_value = "0")]
    pub down_payment: Decimal,

    #[arg(long, default_value = "0")]
    pub trade_in_value: Decimal,

    /// Balance still owed on the trade-in
    #[arg(long, default_value = "0")]
    pub amount_owed: Decimal,

    /// Annual interest rate; looked up from --credit-tier when omitted
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Credit tier for the reference rate: excellent, good, fair, poor
    #[arg(long, default_value = "good")]
    pub credit_tier: CreditTier,

    /// Term in months
    #[arg(long, default_value = "60")]
    pub term: u32,

    /// Sales tax rate (e.g. 0.07 for 7%)
    #[arg(long, default_value = "0")]
    pub sales_tax_rate: Decimal,

    /// Title, registration and dealer fees
    #[arg(long, default_value = "0")]
    pub fees: Decimal,
}

/// Arguments for affordability
#[derive(Args)]
pub struct AffordArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,

    /// Monthly payment budget
    #[arg(long)]
    pub payment: Option<Decimal>,

    /// Annual interest rate; looked up from --credit-tier when omitted
    #[arg(long)]
    pub rate: Option<Decimal>,

    #[arg(long, default_value = "good")]
    pub credit_tier: CreditTier,

    #[arg(long, default_value = "60")]
    pub term: u32,

    #[arg(long, default_value = "0")]
    pub down_payment: Decimal,

    #[arg(long, default_value = "0")]
    pub sales_tax_rate: Decimal,
}

fn resolve_rate(
    rate: Option<Decimal>,
    tier: CreditTier,
    ctx: &Context,
) -> Result<Decimal, Box<dyn std::error::Error>> {
    match rate {
        Some(r) => Ok(r),
        None => {
            let r = ctx.tables.auto_loan_rate(tier)?;
            info!("using {tier} reference rate {r}");
            Ok(r)
        }
    }
}

pub fn run_amortize(args: AmortizeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let amort_input = match input::read_input::<AmortizationInput>(args.input.as_deref())? {
        Some(i) => i,
        None => AmortizationInput {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            annual_rate: args.rate.ok_or("--rate is required (or provide --input)")?,
            term_months: args.term.ok_or("--term is required (or provide --input)")?,
        },
    };

    let result = loan::amortize_loan(&amort_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_auto_loan(args: AutoLoanArgs, ctx: &Context) -> Result<Value, Box<dyn std::error::Error>> {
    let loan_input = match input::read_input::<LoanInput>(args.input.as_deref())? {
        Some(i) => i,
        None => LoanInput {
            principal: args.price.ok_or("--price is required (or provide --input)")?,
            down_payment: args.down_payment,
            trade_in_value: args.trade_in_value,
            amount_owed: args.amount_owed,
            annual_rate: resolve_rate(args.rate, args.credit_tier, ctx)?,
            term_months: args.term,
            sales_tax_rate: args.sales_tax_rate,
            other_fees: args.fees,
        },
    };

    let result = loan::calculate_auto_loan(&loan_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_afford(args: AffordArgs, ctx: &Context) -> Result<Value, Box<dyn std::error::Error>> {
    let afford_input = match input::read_input::<AffordabilityInput>(args.input.as_deref())? {
        Some(i) => i,
        None => AffordabilityInput {
            monthly_payment: args.payment.ok_or("--payment is required (or provide --input)")?,
            annual_rate: resolve_rate(args.rate, args.credit_tier, ctx)?,
            term_months: args.term,
            down_payment: args.down_payment,
            trade_in_value: Decimal::ZERO,
            amount_owed: Decimal::ZERO,
            sales_tax_rate: args.sales_tax_rate,
            other_fees: Decimal::ZERO,
        },
    };

    let result = loan::calculate_affordability(&afford_input)?;
    Ok(serde_json::to_value(result)?)
}
