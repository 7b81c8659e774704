use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use fincalc_core::projection::{self, ProjectionInput};
use fincalc_core::scenarios::{self, ScenarioComparisonInput, ScenarioDelta};
use fincalc_core::CompoundingUnit;

use crate::input;
use crate::Context;

/// Arguments for a compound growth projection
#[derive(Args)]
pub struct ProjectArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,

    /// Starting value
    #[arg(long)]
    pub base: Option<Decimal>,

    /// Annual growth rate (e.g. 0.07 for 7%)
    #[arg(long, allow_hyphen_values = true)]
    pub rate: Option<Decimal>,

    /// Number of compounding periods
    #[arg(long)]
    pub periods: Option<u32>,

    /// Compound monthly instead of annually
    #[arg(long)]
    pub monthly: bool,

    /// Annual inflation rate used to report real values
    #[arg(long, allow_hyphen_values = true)]
    pub inflation: Option<Decimal>,
}

/// Arguments for a scenario comparison
#[derive(Args)]
pub struct ScenariosArgs {
    #[command(flatten)]
    pub base: ProjectArgs,

    /// Comma-separated rate deltas (e.g. "-0.02,0,0.02"); defaults to the standard spread
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub deltas: Option<Vec<Decimal>>,

    /// Spread for the standard conservative/current/aggressive set
    #[arg(long)]
    pub spread: Option<Decimal>,
}

fn projection_from_flags(args: &ProjectArgs) -> Result<ProjectionInput, Box<dyn std::error::Error>> {
    Ok(ProjectionInput {
        base_value: args.base.ok_or("--base is required (or provide --input)")?,
        annual_rate: args.rate.ok_or("--rate is required (or provide --input)")?,
        periods: args.periods.ok_or("--periods is required (or provide --input)")?,
        compounding: if args.monthly {
            CompoundingUnit::Month
        } else {
            CompoundingUnit::Year
        },
        deflator_rate: args.inflation,
    })
}

pub fn run_project(args: ProjectArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let proj_input = match input::read_input::<ProjectionInput>(args.input.as_deref())? {
        Some(i) => i,
        None => projection_from_flags(&args)?,
    };

    let result = projection::run_projection(&proj_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_scenarios(args: ScenariosArgs, ctx: &Context) -> Result<Value, Box<dyn std::error::Error>> {
    let mut comparison = match input::read_input::<ScenarioComparisonInput>(args.base.input.as_deref())? {
        Some(i) => i,
        None => ScenarioComparisonInput {
            base: projection_from_flags(&args.base)?,
            scenarios: args
                .deltas
                .unwrap_or_default()
                .into_iter()
                .map(|d| ScenarioDelta::new(scenarios::delta_label(d), d))
                .collect(),
            spread: args.spread,
        },
    };
    comparison.fill_spread(ctx.assumptions.scenario_spread);

    let result = scenarios::run_scenario_comparison(&comparison)?;
    Ok(serde_json::to_value(result)?)
}
