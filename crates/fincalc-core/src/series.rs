//! Chart series materializer.
//!
//! Flattens typed calculator output into the generic row format the charting
//! layer consumes. No business logic lives here.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::projection::ProjectionPoint;
use crate::scenarios::ScenarioSeries;

/// One chart row: field name → value.
pub type ChartRow = BTreeMap<String, f64>;

/// Named numeric fields a chart can plot.
pub trait ChartFields {
    fn chart_value(&self, field: &str) -> Option<Decimal>;
}

impl ChartFields for ProjectionPoint {
    fn chart_value(&self, field: &str) -> Option<Decimal> {
        match field {
            "period" => Some(Decimal::from(self.period)),
            "nominal_value" => Some(self.nominal_value),
            "real_value" => self.real_value,
            _ => None,
        }
    }
}

#[cfg(feature = "legacy")]
impl ChartFields for crate::legacy::GenerationStep {
    fn chart_value(&self, field: &str) -> Option<Decimal> {
        match field {
            "generation_index" => Some(Decimal::from(self.generation_index)),
            "years_elapsed" => Some(Decimal::from(self.years_elapsed)),
            "nominal_value" => Some(self.nominal_value),
            "inflation_adjusted_value" => Some(self.inflation_adjusted_value),
            "inflation_loss" => Some(self.inflation_loss),
            "healthcare_loss" => Some(self.healthcare_loss),
            "real_value_retained" => Some(self.real_value_retained),
            "purchasing_power_retained_pct" => Some(self.purchasing_power_retained_pct),
            _ => None,
        }
    }
}

#[cfg(feature = "loans")]
impl ChartFields for crate::loan::AmortizationRow {
    fn chart_value(&self, field: &str) -> Option<Decimal> {
        match field {
            "month" => Some(Decimal::from(self.month)),
            "payment" => Some(self.payment),
            "principal" => Some(self.principal),
            "interest" => Some(self.interest),
            "remaining_balance" => Some(self.remaining_balance),
            _ => None,
        }
    }
}

fn to_f64(value: Decimal) -> Option<f64> {
    value.to_f64()
}

/// Flatten `points` into rows holding `x_field` and each of `y_fields`.
///
/// Fields a point does not carry are left out of its row rather than zero-filled.
pub fn to_chart_series<T: ChartFields>(points: &[T], x_field: &str, y_fields: &[&str]) -> Vec<ChartRow> {
    points
        .iter()
        .map(|point| {
            std::iter::once(x_field)
                .chain(y_fields.iter().copied())
                .filter_map(|field| {
                    point
                        .chart_value(field)
                        .and_then(to_f64)
                        .map(|v| (field.to_string(), v))
                })
                .collect()
        })
        .collect()
}

/// Overlay scenario series on a shared X axis: one row per point index,
/// one column per scenario label.
pub fn overlay_series(series: &ScenarioSeries, x_field: &str, y_field: &str) -> Vec<ChartRow> {
    let len = series.values().map(Vec::len).max().unwrap_or(0);
    (0..len)
        .map(|i| {
            let mut row = ChartRow::new();
            for (label, points) in series {
                if let Some(point) = points.get(i) {
                    if !row.contains_key(x_field) {
                        if let Some(x) = point.chart_value(x_field).and_then(to_f64) {
                            row.insert(x_field.to_string(), x);
                        }
                    }
                    if let Some(y) = point.chart_value(y_field).and_then(to_f64) {
                        row.insert(label.clone(), y);
                    }
                }
            }
            row
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::{project, project_with_deflator, ProjectionInput};
    use crate::scenarios::{compare_scenarios, ScenarioDelta};
    use crate::types::CompoundingUnit;
    use rust_decimal_macros::dec;

    #[test]
    fn test_rows_carry_requested_fields() {
        let points = project_with_deflator(dec!(100), dec!(0.10), dec!(0.05), 2);
        let rows = to_chart_series(&points, "period", &["nominal_value", "real_value"]);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2]["period"], 2.0);
        assert!((rows[2]["nominal_value"] - 121.0).abs() < 1e-9);
        assert!(rows[2].contains_key("real_value"));
    }

    #[test]
    fn test_absent_fields_are_omitted() {
        let points = project(dec!(100), dec!(0.10), 1);
        let rows = to_chart_series(&points, "period", &["real_value", "bogus"]);
        assert_eq!(rows[0].len(), 1);
        assert!(rows[0].contains_key("period"));
    }

    #[test]
    fn test_overlay_has_one_column_per_scenario() {
        let base = ProjectionInput {
            base_value: dec!(1000),
            annual_rate: dec!(0.04),
            periods: 5,
            compounding: CompoundingUnit::Year,
            deflator_rate: None,
        };
        let series = compare_scenarios(&base, &ScenarioDelta::standard(dec!(0.02)));
        let rows = overlay_series(&series, "period", "nominal_value");
        assert_eq!(rows.len(), 6);
        for row in &rows {
            assert_eq!(row.len(), 4);
            assert!(row["conservative"] <= row["aggressive"]);
        }
    }
}
