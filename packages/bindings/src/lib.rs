use napi::Result as NapiResult;
use napi_derive::napi;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use fincalc_core::assumptions::PolicyAssumptions;
use fincalc_core::series::{overlay_series, to_chart_series, ChartRow};
use fincalc_core::tables::RateTables;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Remove an optional embedded section (e.g. `tables`) from a request.
fn take_section(request: &mut Value, key: &str) -> Option<Value> {
    request.as_object_mut().and_then(|m| m.remove(key))
}

/// Embedded tables go through the same validation as a tables file.
fn tables_from(section: Option<Value>) -> NapiResult<RateTables> {
    match section {
        Some(v) => RateTables::from_json_str(&v.to_string()).map_err(to_napi_error),
        None => Ok(RateTables::default()),
    }
}

/// Parse a request carrying optional embedded reference tables.
fn parse_with_tables<T: DeserializeOwned>(input_json: &str) -> NapiResult<(T, RateTables)> {
    let mut request: Value = serde_json::from_str(input_json).map_err(to_napi_error)?;
    let tables = tables_from(take_section(&mut request, "tables"))?;
    let input = serde_json::from_value(request).map_err(to_napi_error)?;
    Ok((input, tables))
}

/// Requested axis fields, or the per-kind defaults.
fn axis_fields(x: &Option<String>, y: &[String], default_x: &str, default_y: &[&str]) -> (String, Vec<String>) {
    let x = x.clone().unwrap_or_else(|| default_x.to_string());
    let y = if y.is_empty() {
        default_y.iter().map(|s| s.to_string()).collect()
    } else {
        y.to_vec()
    };
    (x, y)
}

// ---------------------------------------------------------------------------
// Loans
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_auto_loan(input_json: String) -> NapiResult<String> {
    let input: fincalc_core::loan::LoanInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = fincalc_core::loan::calculate_auto_loan(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn amortize_loan(input_json: String) -> NapiResult<String> {
    let input: fincalc_core::loan::AmortizationInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = fincalc_core::loan::amortize_loan(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn calculate_affordability(input_json: String) -> NapiResult<String> {
    let input: fincalc_core::loan::AffordabilityInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = fincalc_core::loan::calculate_affordability(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Projections
// ---------------------------------------------------------------------------

#[napi]
pub fn run_projection(input_json: String) -> NapiResult<String> {
    let input: fincalc_core::projection::ProjectionInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = fincalc_core::projection::run_projection(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn compare_scenarios(input_json: String) -> NapiResult<String> {
    let input: fincalc_core::scenarios::ScenarioComparisonInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        fincalc_core::scenarios::run_scenario_comparison(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn plan_legacy(input_json: String) -> NapiResult<String> {
    let (input, tables): (fincalc_core::legacy::LegacyInput, _) = parse_with_tables(&input_json)?;
    let output = fincalc_core::legacy::plan_legacy(&input, &tables).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Inflation and parity
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_ppp(input_json: String) -> NapiResult<String> {
    let (input, tables): (fincalc_core::ppp::PppInput, _) = parse_with_tables(&input_json)?;
    let output = fincalc_core::ppp::calculate_ppp(&input, &tables).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn calculate_insurance_inflation(input_json: String) -> NapiResult<String> {
    let (input, tables): (fincalc_core::insurance::InsuranceInput, _) =
        parse_with_tables(&input_json)?;
    let output = fincalc_core::insurance::calculate_insurance_inflation(&input, &tables)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn project_vehicle_costs(input_json: String) -> NapiResult<String> {
    let mut request: Value = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let assumptions = match take_section(&mut request, "assumptions") {
        Some(v) => PolicyAssumptions::from_json_str(&v.to_string()).map_err(to_napi_error)?,
        None => PolicyAssumptions::default(),
    };
    let input: fincalc_core::vehicle::VehicleCostInput =
        serde_json::from_value(request).map_err(to_napi_error)?;
    let output = fincalc_core::vehicle::calculate_vehicle_costs(&input, &assumptions)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Charts
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(rename_all = "lowercase")]
enum ChartKind {
    Projection,
    Legacy,
    Schedule,
    Scenarios,
}

#[derive(Deserialize)]
struct ChartRequest {
    kind: ChartKind,
    input: Value,
    #[serde(default)]
    x: Option<String>,
    #[serde(default)]
    y: Vec<String>,
    #[serde(default)]
    tables: Option<Value>,
}

#[napi]
pub fn chart_series(input_json: String) -> NapiResult<String> {
    let request: ChartRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let input = request.input;

    let rows: Vec<ChartRow> = match request.kind {
        ChartKind::Projection => {
            let input = serde_json::from_value(input).map_err(to_napi_error)?;
            let out = fincalc_core::projection::run_projection(&input).map_err(to_napi_error)?;
            let (x, y) = axis_fields(&request.x, &request.y, "period", &["nominal_value", "real_value"]);
            let y: Vec<&str> = y.iter().map(String::as_str).collect();
            to_chart_series(&out.result.series, &x, &y)
        }
        ChartKind::Legacy => {
            let tables = tables_from(request.tables)?;
            let input = serde_json::from_value(input).map_err(to_napi_error)?;
            let out = fincalc_core::legacy::plan_legacy(&input, &tables).map_err(to_napi_error)?;
            let (x, y) = axis_fields(
                &request.x,
                &request.y,
                "years_elapsed",
                &["nominal_value", "inflation_adjusted_value", "real_value_retained"],
            );
            let y: Vec<&str> = y.iter().map(String::as_str).collect();
            to_chart_series(&out.result.steps, &x, &y)
        }
        ChartKind::Schedule => {
            let input = serde_json::from_value(input).map_err(to_napi_error)?;
            let out = fincalc_core::loan::amortize_loan(&input).map_err(to_napi_error)?;
            let (x, y) = axis_fields(
                &request.x,
                &request.y,
                "month",
                &["principal", "interest", "remaining_balance"],
            );
            let y: Vec<&str> = y.iter().map(String::as_str).collect();
            to_chart_series(&out.result.schedule, &x, &y)
        }
        ChartKind::Scenarios => {
            let input = serde_json::from_value(input).map_err(to_napi_error)?;
            let out = fincalc_core::scenarios::run_scenario_comparison(&input)
                .map_err(to_napi_error)?;
            let (x, y) = axis_fields(&request.x, &request.y, "period", &["nominal_value"]);
            let y_field = y.first().map(String::as_str).unwrap_or("nominal_value");
            overlay_series(&out.result.series, &x, y_field)
        }
    };

    serde_json::to_string(&rows).map_err(to_napi_error)
}
