//! Scenario comparison: the same projection under shifted growth rates,
//! returned as parallel series for overlay charting.

use log::debug;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::time::Instant;

use crate::assumptions::DEFAULT_SCENARIO_SPREAD;
use crate::error::FinCalcError;
use crate::projection::{
    project_input, require_projection_in_range, validate_projection_input, ProjectionInput,
    ProjectionPoint,
};
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::FinCalcResult;

/// Scenario label → projection series. Every series has `periods + 1` points.
pub type ScenarioSeries = BTreeMap<String, Vec<ProjectionPoint>>;

/// A named shift applied to the base annual rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioDelta {
    pub label: String,
    pub rate_delta: Rate,
}

impl ScenarioDelta {
    pub fn new(label: impl Into<String>, rate_delta: Rate) -> Self {
        Self {
            label: label.into(),
            rate_delta,
        }
    }

    /// Conservative / current / aggressive around the base rate.
    pub fn standard(spread: Rate) -> Vec<Self> {
        vec![
            Self::new("conservative", -spread),
            Self::new("current", Decimal::ZERO),
            Self::new("aggressive", spread),
        ]
    }
}

/// Input for `run_scenario_comparison`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioComparisonInput {
    pub base: ProjectionInput,
    /// Explicit scenarios; the standard three are used when empty.
    #[serde(default)]
    pub scenarios: Vec<ScenarioDelta>,
    /// Spread for the standard scenarios.
    #[serde(default)]
    pub spread: Option<Rate>,
}

impl ScenarioComparisonInput {
    /// Supply a spread for the standard scenarios when the request names neither.
    pub fn fill_spread(&mut self, fallback: Rate) {
        if self.scenarios.is_empty() && self.spread.is_none() {
            self.spread = Some(fallback);
        }
    }
}

/// Endpoint summary for one scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioSummary {
    pub label: String,
    pub rate_delta: Rate,
    pub annual_rate: Rate,
    pub final_nominal_value: Money,
    pub final_real_value: Option<Money>,
    /// Final nominal value minus the reference scenario's.
    pub difference_from_reference: Money,
}

/// Output of `run_scenario_comparison`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioComparisonOutput {
    pub reference_label: String,
    pub scenarios: Vec<ScenarioSummary>,
    pub series: ScenarioSeries,
}

/// Label derived from a bare rate delta, e.g. `+2.00%`.
pub fn delta_label(rate_delta: Rate) -> String {
    let pct = (rate_delta * dec!(100)).round_dp(2);
    let sign = if pct < Decimal::ZERO { "-" } else { "+" };
    format!("{sign}{:.2}%", pct.abs())
}

/// Run the base projection once per delta over the same horizon.
pub fn compare_scenarios(base: &ProjectionInput, deltas: &[ScenarioDelta]) -> ScenarioSeries {
    deltas
        .iter()
        .map(|d| {
            let shifted = ProjectionInput {
                annual_rate: base.annual_rate.saturating_add(d.rate_delta),
                ..base.clone()
            };
            (d.label.clone(), project_input(&shifted))
        })
        .collect()
}

/// `compare_scenarios` with labels derived from the deltas themselves.
pub fn compare_rate_deltas(base: &ProjectionInput, deltas: &[Rate]) -> ScenarioSeries {
    let labelled: Vec<ScenarioDelta> = deltas
        .iter()
        .map(|d| ScenarioDelta::new(delta_label(*d), *d))
        .collect();
    compare_scenarios(base, &labelled)
}

/// Validate and compare scenarios, summarising each endpoint against a reference.
///
/// The reference is the zero-delta scenario when present, otherwise the first.
pub fn run_scenario_comparison(
    input: &ScenarioComparisonInput,
) -> FinCalcResult<ComputationOutput<ScenarioComparisonOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_projection_input(&input.base)?;

    let deltas = if input.scenarios.is_empty() {
        let spread = input.spread.unwrap_or(DEFAULT_SCENARIO_SPREAD);
        if spread < Decimal::ZERO {
            return Err(FinCalcError::InvalidInput {
                field: "spread".into(),
                reason: "Spread cannot be negative".into(),
            });
        }
        ScenarioDelta::standard(spread)
    } else {
        if input.spread.is_some() {
            warnings.push("spread is ignored when explicit scenarios are given".into());
        }
        input.scenarios.clone()
    };

    let mut seen = HashSet::new();
    for d in &deltas {
        if d.label.trim().is_empty() {
            return Err(FinCalcError::InvalidInput {
                field: "scenarios.label".into(),
                reason: "Scenario labels cannot be empty".into(),
            });
        }
        if !seen.insert(d.label.as_str()) {
            return Err(FinCalcError::InvalidInput {
                field: "scenarios.label".into(),
                reason: format!("Duplicate scenario label '{}'", d.label),
            });
        }
        let field = format!("scenario:{} rate_delta", d.label);
        let shifted_rate = input.base.annual_rate.saturating_add(d.rate_delta);
        if shifted_rate <= dec!(-1) {
            return Err(FinCalcError::InvalidInput {
                field,
                reason: "Shifted rate must be greater than -100%".into(),
            });
        }
        let shifted = ProjectionInput {
            annual_rate: shifted_rate,
            ..input.base.clone()
        };
        require_projection_in_range(&shifted, &field)?;
    }
    debug!("comparing {} scenarios over {} periods", deltas.len(), input.base.periods);

    let series = compare_scenarios(&input.base, &deltas);

    let reference = deltas
        .iter()
        .find(|d| d.rate_delta.is_zero())
        .or_else(|| deltas.first())
        .map(|d| d.label.clone())
        .unwrap_or_default();
    let final_point = |label: &str| series.get(label).and_then(|s| s.last()).cloned();
    let reference_final = final_point(&reference)
        .map(|p| p.nominal_value)
        .unwrap_or(Decimal::ZERO);

    let scenarios = deltas
        .iter()
        .filter_map(|d| {
            final_point(&d.label).map(|last| ScenarioSummary {
                label: d.label.clone(),
                rate_delta: d.rate_delta,
                annual_rate: input.base.annual_rate.saturating_add(d.rate_delta),
                final_nominal_value: last.nominal_value,
                final_real_value: last.real_value,
                difference_from_reference: last.nominal_value - reference_final,
            })
        })
        .collect();

    let output = ScenarioComparisonOutput {
        reference_label: reference,
        scenarios,
        series,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Rate-Shifted Scenario Comparison",
        input,
        warnings,
        elapsed,
        output,
    ))
}
