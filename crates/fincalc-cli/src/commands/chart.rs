use clap::{Args, ValueEnum};
use serde_json::Value;

use fincalc_core::legacy::{self, LegacyInput};
use fincalc_core::loan::{self, AmortizationInput};
use fincalc_core::projection::{self, ProjectionInput};
use fincalc_core::scenarios::{self, ScenarioComparisonInput};
use fincalc_core::series::{overlay_series, to_chart_series, ChartRow};

use crate::input;
use crate::Context;

#[derive(Debug, Clone, ValueEnum)]
pub enum ChartKind {
    Projection,
    Legacy,
    Schedule,
    Scenarios,
}

/// Arguments for chart series output
#[derive(Args)]
pub struct ChartArgs {
    /// What the input JSON describes
    #[arg(long)]
    pub kind: ChartKind,

    /// Path to JSON input file (the same shape the matching calculator takes)
    #[arg(long)]
    pub input: Option<String>,

    /// X-axis field; defaults per kind
    #[arg(long)]
    pub x: Option<String>,

    /// Comma-separated Y fields; for scenarios only the first is used
    #[arg(long, value_delimiter = ',')]
    pub y: Option<Vec<String>>,
}

fn fields<'a>(args: &'a ChartArgs, x: &'a str, y: &'a [&'a str]) -> (&'a str, Vec<&'a str>) {
    let x_field = args.x.as_deref().unwrap_or(x);
    let y_fields = match &args.y {
        Some(ys) if !ys.is_empty() => ys.iter().map(String::as_str).collect(),
        _ => y.to_vec(),
    };
    (x_field, y_fields)
}

fn required<T: serde::de::DeserializeOwned>(
    path: Option<&str>,
) -> Result<T, Box<dyn std::error::Error>> {
    input::read_input::<T>(path)?.ok_or_else(|| "chart requires --input or JSON on stdin".into())
}

pub fn run_chart(args: ChartArgs, ctx: &Context) -> Result<Value, Box<dyn std::error::Error>> {
    let path = args.input.as_deref();
    let rows: Vec<ChartRow> = match args.kind {
        ChartKind::Projection => {
            let out = projection::run_projection(&required::<ProjectionInput>(path)?)?;
            let (x, y) = fields(&args, "period", &["nominal_value", "real_value"]);
            to_chart_series(&out.result.series, x, &y)
        }
        ChartKind::Legacy => {
            let mut plan = required::<LegacyInput>(path)?;
            plan.fill_assumptions(ctx.assumptions.legacy);
            let out = legacy::plan_legacy(&plan, &ctx.tables)?;
            let (x, y) = fields(
                &args,
                "years_elapsed",
                &["nominal_value", "inflation_adjusted_value", "real_value_retained"],
            );
            to_chart_series(&out.result.steps, x, &y)
        }
        ChartKind::Schedule => {
            let out = loan::amortize_loan(&required::<AmortizationInput>(path)?)?;
            let (x, y) = fields(&args, "month", &["principal", "interest", "remaining_balance"]);
            to_chart_series(&out.result.schedule, x, &y)
        }
        ChartKind::Scenarios => {
            let mut comparison = required::<ScenarioComparisonInput>(path)?;
            comparison.fill_spread(ctx.assumptions.scenario_spread);
            let out = scenarios::run_scenario_comparison(&comparison)?;
            let (x, y) = fields(&args, "period", &["nominal_value"]);
            let y_field = y.first().copied().unwrap_or("nominal_value");
            overlay_series(&out.result.series, x, y_field)
        }
    };

    Ok(serde_json::to_value(rows)?)
}
