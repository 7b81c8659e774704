//! Purchasing power parity conversion.
//!
//! Factors are local currency units per international dollar, so the ratio
//! between two factors converts an amount into the sum that buys the same
//! basket in the other economy.

use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::FinCalcError;
use crate::projection::{project_with_deflator, require_representable, ProjectionPoint, MAX_PERIODS};
use crate::tables::RateTables;
use crate::types::{with_metadata, ComputationOutput, Currency, Money, Rate};
use crate::FinCalcResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PppInput {
    pub amount: Money,
    pub from_currency: Currency,
    pub to_currency: Currency,
    /// Years to project the equivalent forward; 0 for a spot conversion.
    #[serde(default)]
    pub years: u32,
    #[serde(default)]
    pub from_factor: Option<Decimal>,
    #[serde(default)]
    pub to_factor: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PppOutput {
    pub from_factor: Decimal,
    pub to_factor: Decimal,
    pub ppp_ratio: Decimal,
    pub equivalent_amount: Money,
    pub from_inflation: Rate,
    pub to_inflation: Rate,
    /// Nominal: destination cost of the basket, grown at destination inflation.
    /// Real: the same figure deflated by source inflation (relative-PPP drift).
    pub projection: Vec<ProjectionPoint>,
}

/// Destination units equivalent to one source unit. None for a zero source factor.
pub fn ppp_ratio(from_factor: Decimal, to_factor: Decimal) -> Option<Decimal> {
    to_factor.checked_div(from_factor)
}

/// Convert `amount` between economies at PPP.
pub fn convert_ppp(amount: Money, from_factor: Decimal, to_factor: Decimal) -> Option<Money> {
    ppp_ratio(from_factor, to_factor).and_then(|r| amount.checked_mul(r))
}

/// Resolve PPP factors and inflation, convert, and project the equivalent forward.
pub fn calculate_ppp(input: &PppInput, tables: &RateTables) -> FinCalcResult<ComputationOutput<PppOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.amount < Decimal::ZERO {
        return Err(FinCalcError::InvalidInput {
            field: "amount".into(),
            reason: "Amount must not be negative".into(),
        });
    }
    if input.years > MAX_PERIODS {
        return Err(FinCalcError::InvalidInput {
            field: "years".into(),
            reason: format!("At most {MAX_PERIODS} years are supported"),
        });
    }

    let from_factor = match input.from_factor {
        Some(f) => f,
        None => tables.ppp_factor(&input.from_currency)?,
    };
    let to_factor = match input.to_factor {
        Some(f) => f,
        None => tables.ppp_factor(&input.to_currency)?,
    };
    for (field, factor) in [("from_factor", from_factor), ("to_factor", to_factor)] {
        if factor <= Decimal::ZERO {
            return Err(FinCalcError::InvalidInput {
                field: field.into(),
                reason: "PPP factor must be greater than zero".into(),
            });
        }
    }

    let ratio = ppp_ratio(from_factor, to_factor).ok_or_else(|| FinCalcError::InvalidInput {
        field: "from_factor".into(),
        reason: "PPP factor must be greater than zero".into(),
    })?;
    let equivalent_amount = convert_ppp(input.amount, from_factor, to_factor).ok_or_else(|| {
        FinCalcError::InvalidInput {
            field: "amount".into(),
            reason: "Converted amount is out of range".into(),
        }
    })?;

    let from_inflation = tables.general_inflation(&input.from_currency)?;
    let to_inflation = tables.general_inflation(&input.to_currency)?;
    require_representable("years", equivalent_amount, to_inflation, input.years)?;
    require_representable("years", Decimal::ONE, from_inflation, input.years)?;
    if input.from_currency == input.to_currency {
        warnings.push("Source and destination currencies are identical".into());
    }
    debug!(
        "ppp {} {} -> {} at ratio {}",
        input.amount, input.from_currency, input.to_currency, ratio
    );

    let projection = project_with_deflator(equivalent_amount, to_inflation, from_inflation, input.years);

    let output = PppOutput {
        from_factor,
        to_factor,
        ppp_ratio: ratio,
        equivalent_amount,
        from_inflation,
        to_inflation,
        projection,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Purchasing Power Parity Conversion",
        input,
        warnings,
        elapsed,
        output,
    ))
}
