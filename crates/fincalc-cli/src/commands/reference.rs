use clap::Args;
use serde_json::{json, Value};

use fincalc_core::content::{resolve_content, JsonContentSource};
use fincalc_core::tables::Strategy;
use fincalc_core::Currency;

use crate::Context;

/// Arguments for the reference tables view
#[derive(Args)]
pub struct TablesArgs {
    /// Show the resolved rates for one currency instead of the whole tables
    #[arg(long)]
    pub currency: Option<Currency>,
}

/// Arguments for content resolution
#[derive(Args)]
pub struct ContentArgs {
    /// Calculator slug (e.g. auto_loan)
    #[arg(long)]
    pub slug: String,

    /// Directory of `{id}.json` content overrides
    #[arg(long, default_value = "content")]
    pub content_dir: String,
}

pub fn run_tables(args: TablesArgs, ctx: &Context) -> Result<Value, Box<dyn std::error::Error>> {
    let tables = &ctx.tables;
    match args.currency {
        None => Ok(serde_json::to_value(tables)?),
        Some(c) => Ok(json!({
            "currency": c,
            "as_of": tables.as_of,
            "general_inflation": tables.general_inflation(&c)?,
            "medical_inflation": tables.medical_inflation(&c)?,
            "healthcare_multiplier": tables.healthcare_multiplier(&c)?,
            "ppp_factor": tables.ppp_factor(&c)?,
            "portfolio_return_conservative": tables.portfolio_return(&c, Strategy::Conservative)?,
            "portfolio_return_balanced": tables.portfolio_return(&c, Strategy::Balanced)?,
            "portfolio_return_aggressive": tables.portfolio_return(&c, Strategy::Aggressive)?,
        })),
    }
}

pub fn run_content(args: ContentArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let source = JsonContentSource::new(&args.content_dir);
    let record = resolve_content(&source, &args.slug);
    Ok(serde_json::to_value(record)?)
}
