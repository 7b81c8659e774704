mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::Path;
use std::process;

use fincalc_core::assumptions::PolicyAssumptions;
use fincalc_core::tables::RateTables;

use commands::chart::ChartArgs;
use commands::insurance::InsuranceArgs;
use commands::legacy::LegacyArgs;
use commands::loan::{AffordArgs, AmortizeArgs, AutoLoanArgs};
use commands::ppp::PppArgs;
use commands::projection::{ProjectArgs, ScenariosArgs};
use commands::reference::{ContentArgs, TablesArgs};
use commands::vehicle::VehicleArgs;

/// Personal-finance projections with decimal precision
#[derive(Parser)]
#[command(
    name = "fincalc",
    version,
    about = "Personal-finance projections with decimal precision",
    long_about = "A CLI for loan amortization, compound growth, inflation-adjusted \
                  scenario comparison and multi-generation wealth planning. Rates are \
                  decimals (0.06 for 6%)."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Reference rate tables JSON (built-in tables when omitted or unreadable)
    #[arg(long, global = true)]
    tables: Option<String>,

    /// Policy assumptions JSON (built-in constants when omitted or unreadable)
    #[arg(long, global = true)]
    assumptions: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fixed-payment amortization of a principal
    Amortize(AmortizeArgs),
    /// Price an auto loan with tax, fees, down payment and trade-in
    AutoLoan(AutoLoanArgs),
    /// Largest purchase price a monthly budget supports
    Afford(AffordArgs),
    /// Compound growth projection with optional inflation deflator
    Project(ProjectArgs),
    /// Compare rate scenarios over the same horizon
    Scenarios(ScenariosArgs),
    /// Multi-generation wealth erosion
    Legacy(LegacyArgs),
    /// Purchasing power parity conversion
    Ppp(PppArgs),
    /// Insurance premium growth under medical inflation
    Insurance(InsuranceArgs),
    /// Vehicle price and fuel cost outlook
    Vehicle(VehicleArgs),
    /// Emit chart rows for a projection, legacy plan, schedule or scenario set
    Chart(ChartArgs),
    /// Show the reference rate tables in use
    Tables(TablesArgs),
    /// Resolve calculator content with default fallback
    Content(ContentArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

/// Reference data shared by the table-backed commands.
pub struct Context {
    pub tables: RateTables,
    pub assumptions: PolicyAssumptions,
}

impl Context {
    fn load(tables: Option<&str>, assumptions: Option<&str>) -> Self {
        Self {
            tables: tables
                .map(|p| RateTables::load_or_default(Path::new(p)))
                .unwrap_or_default(),
            assumptions: assumptions
                .map(|p| PolicyAssumptions::load_or_default(Path::new(p)))
                .unwrap_or_default(),
        }
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let ctx = Context::load(cli.tables.as_deref(), cli.assumptions.as_deref());

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Amortize(args) => commands::loan::run_amortize(args),
        Commands::AutoLoan(args) => commands::loan::run_auto_loan(args, &ctx),
        Commands::Afford(args) => commands::loan::run_afford(args, &ctx),
        Commands::Project(args) => commands::projection::run_project(args),
        Commands::Scenarios(args) => commands::projection::run_scenarios(args, &ctx),
        Commands::Legacy(args) => commands::legacy::run_legacy(args, &ctx),
        Commands::Ppp(args) => commands::ppp::run_ppp(args, &ctx),
        Commands::Insurance(args) => commands::insurance::run_insurance(args, &ctx),
        Commands::Vehicle(args) => commands::vehicle::run_vehicle(args, &ctx),
        Commands::Chart(args) => commands::chart::run_chart(args, &ctx),
        Commands::Tables(args) => commands::reference::run_tables(args, &ctx),
        Commands::Content(args) => commands::reference::run_content(args),
        Commands::Version => {
            println!("fincalc {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
