//! Fixed-rate loan amortization and auto-loan pricing.
//!
//! The pure calculators trust their input. The validated entry points bound
//! rates and terms so the annuity math stays inside the Decimal range.

use log::debug;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::FinCalcError;
use crate::math::compound;
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::FinCalcResult;

/// Longest loan term accepted by the validated entry points.
pub const MAX_TERM_MONTHS: u32 = 600;

/// Highest APR accepted by the validated entry points.
pub const MAX_ANNUAL_RATE: Rate = dec!(1);

const MONTHS_PER_YEAR: Decimal = dec!(12);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Fixed payment and totals for a fully amortizing loan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanPayment {
    pub monthly_payment: Money,
    pub total_interest: Money,
    /// Sum of all payments (principal + interest).
    pub total_cost: Money,
}

/// A single month of an amortization schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationRow {
    pub month: u32,
    pub payment: Money,
    pub principal: Money,
    pub interest: Money,
    pub remaining_balance: Money,
}

/// Purchase being financed, as entered on the auto loan form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanInput {
    /// Purchase price before tax and fees.
    pub principal: Money,
    #[serde(default)]
    pub down_payment: Money,
    #[serde(default)]
    pub trade_in_value: Money,
    /// Outstanding balance on the trade-in vehicle.
    #[serde(default)]
    pub amount_owed: Money,
    pub annual_rate: Rate,
    pub term_months: u32,
    #[serde(default)]
    pub sales_tax_rate: Rate,
    #[serde(default)]
    pub other_fees: Money,
}

/// Derived loan figures. Recomputed wholesale from a `LoanInput`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanResult {
    pub loan_amount: Money,
    pub sales_tax: Money,
    pub monthly_payment: Money,
    pub total_principal: Money,
    pub total_interest: Money,
    pub total_cost: Money,
    pub upfront_cash: Money,
}

/// Output of `calculate_auto_loan`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoLoanOutput {
    pub loan: LoanResult,
    pub schedule: Vec<AmortizationRow>,
}

/// How much car a monthly budget buys.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffordabilityInput {
    pub monthly_payment: Money,
    pub annual_rate: Rate,
    pub term_months: u32,
    #[serde(default)]
    pub down_payment: Money,
    #[serde(default)]
    pub trade_in_value: Money,
    #[serde(default)]
    pub amount_owed: Money,
    #[serde(default)]
    pub sales_tax_rate: Rate,
    #[serde(default)]
    pub other_fees: Money,
}

/// Output of `calculate_affordability`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffordabilityOutput {
    pub max_loan_amount: Money,
    pub max_purchase_price: Money,
    pub total_interest: Money,
}

/// Plain amortization request: no taxes, fees or trade-in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationInput {
    pub principal: Money,
    pub annual_rate: Rate,
    pub term_months: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationOutput {
    pub payment: LoanPayment,
    pub schedule: Vec<AmortizationRow>,
}

// ---------------------------------------------------------------------------
// Pure calculators
// ---------------------------------------------------------------------------

/// Fixed monthly payment for `principal` at `annual_rate` over `term_months`.
///
/// A zero rate is an explicit straight-line branch, since the annuity formula
/// divides by zero there. A zero term yields a zero payment.
pub fn amortize(principal: Money, annual_rate: Rate, term_months: u32) -> LoanPayment {
    if term_months == 0 {
        return LoanPayment {
            monthly_payment: Decimal::ZERO,
            total_interest: Decimal::ZERO,
            total_cost: Decimal::ZERO,
        };
    }

    let n = Decimal::from(term_months);
    let r = annual_rate / MONTHS_PER_YEAR;

    if r.is_zero() {
        return LoanPayment {
            monthly_payment: principal / n,
            total_interest: Decimal::ZERO,
            total_cost: principal,
        };
    }

    // P·r / (1 − (1+r)^−n): a saturated factor drives the discount to zero,
    // leaving the interest-only limit P·r.
    let discount = Decimal::ONE
        .checked_div(compound(r, term_months))
        .unwrap_or(Decimal::MAX);
    let annuity = Decimal::ONE.saturating_sub(discount);
    let monthly_payment = principal
        .saturating_mul(r)
        .checked_div(annuity)
        .unwrap_or(principal / n);
    let total_cost = monthly_payment.saturating_mul(n);

    LoanPayment {
        monthly_payment,
        total_interest: total_cost.saturating_sub(principal),
        total_cost,
    }
}

/// Month-by-month interest/principal split. The final row absorbs any
/// residual so the balance closes at exactly zero.
pub fn amortization_schedule(
    principal: Money,
    annual_rate: Rate,
    term_months: u32,
) -> Vec<AmortizationRow> {
    if principal <= Decimal::ZERO || term_months == 0 {
        return Vec::new();
    }

    let payment = amortize(principal, annual_rate, term_months).monthly_payment;
    let r = annual_rate / MONTHS_PER_YEAR;
    let mut balance = principal;
    let mut rows = Vec::with_capacity(term_months as usize);

    for month in 1..=term_months {
        let interest = balance.saturating_mul(r);
        let (row_payment, principal_part) = if month == term_months {
            (balance.saturating_add(interest), balance)
        } else {
            (payment, payment.saturating_sub(interest))
        };
        balance = balance.saturating_sub(principal_part);

        rows.push(AmortizationRow {
            month,
            payment: row_payment,
            principal: principal_part,
            interest,
            remaining_balance: balance,
        });
    }

    rows
}

/// Price an auto loan from the full purchase snapshot.
///
/// A negative loan amount means cash and trade-in already cover the purchase:
/// there is nothing to amortize.
pub fn price_loan(input: &LoanInput) -> LoanResult {
    let sales_tax = input.principal * input.sales_tax_rate;
    let net_trade_in = input.trade_in_value - input.amount_owed;
    let loan_amount =
        input.principal + sales_tax + input.other_fees - input.down_payment - net_trade_in;

    let payment = if loan_amount > Decimal::ZERO {
        amortize(loan_amount, input.annual_rate, input.term_months)
    } else {
        amortize(Decimal::ZERO, Decimal::ZERO, input.term_months)
    };

    let upfront_cash = if loan_amount >= Decimal::ZERO {
        input.down_payment
    } else {
        (input.down_payment + loan_amount).max(Decimal::ZERO)
    };

    LoanResult {
        loan_amount,
        sales_tax,
        monthly_payment: payment.monthly_payment,
        total_principal: loan_amount.max(Decimal::ZERO),
        total_interest: payment.total_interest,
        total_cost: upfront_cash + payment.total_cost + net_trade_in.max(Decimal::ZERO),
        upfront_cash,
    }
}

/// Largest principal a fixed monthly payment can service (present value of the payments).
pub fn affordable_principal(monthly_payment: Money, annual_rate: Rate, term_months: u32) -> Money {
    if term_months == 0 {
        return Decimal::ZERO;
    }
    let n = Decimal::from(term_months);
    let r = annual_rate / MONTHS_PER_YEAR;
    if r.is_zero() {
        return monthly_payment * n;
    }

    let discount = Decimal::ONE
        .checked_div(compound(r, term_months))
        .unwrap_or(Decimal::MAX);
    monthly_payment
        .saturating_mul(Decimal::ONE.saturating_sub(discount))
        .checked_div(r)
        .unwrap_or(monthly_payment * n)
}

// ---------------------------------------------------------------------------
// Validated entry points
// ---------------------------------------------------------------------------

fn require_non_negative(value: Decimal, field: &str) -> FinCalcResult<()> {
    if value < Decimal::ZERO {
        return Err(FinCalcError::InvalidInput {
            field: field.into(),
            reason: "Must not be negative".into(),
        });
    }
    Ok(())
}

fn validate_terms(annual_rate: Rate, term_months: u32, sales_tax_rate: Rate) -> FinCalcResult<()> {
    require_non_negative(annual_rate, "annual_rate")?;
    if annual_rate > MAX_ANNUAL_RATE {
        return Err(FinCalcError::InvalidInput {
            field: "annual_rate".into(),
            reason: format!("APR above {}% is not supported", MAX_ANNUAL_RATE * dec!(100)),
        });
    }
    if term_months == 0 || term_months > MAX_TERM_MONTHS {
        return Err(FinCalcError::InvalidInput {
            field: "term_months".into(),
            reason: format!("Term must be between 1 and {MAX_TERM_MONTHS} months"),
        });
    }
    if sales_tax_rate < Decimal::ZERO || sales_tax_rate >= Decimal::ONE {
        return Err(FinCalcError::InvalidInput {
            field: "sales_tax_rate".into(),
            reason: "Sales tax rate must be in [0, 1)".into(),
        });
    }
    Ok(())
}

/// Validate an auto loan snapshot, price it, and build its schedule.
pub fn calculate_auto_loan(input: &LoanInput) -> FinCalcResult<ComputationOutput<AutoLoanOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    require_non_negative(input.principal, "principal")?;
    require_non_negative(input.down_payment, "down_payment")?;
    require_non_negative(input.trade_in_value, "trade_in_value")?;
    require_non_negative(input.amount_owed, "amount_owed")?;
    require_non_negative(input.other_fees, "other_fees")?;
    validate_terms(input.annual_rate, input.term_months, input.sales_tax_rate)?;
    debug!(
        "pricing auto loan: price {} over {} months at {}",
        input.principal, input.term_months, input.annual_rate
    );

    let loan = price_loan(input);

    if loan.loan_amount < Decimal::ZERO {
        warnings.push(
            "Down payment and trade-in exceed the purchase cost; no financing required".into(),
        );
    }
    if input.amount_owed > input.trade_in_value {
        warnings.push(format!(
            "Negative trade-in equity of {} is rolled into the loan",
            input.amount_owed - input.trade_in_value
        ));
    }
    if input.term_months > 84 {
        warnings.push("Terms beyond 84 months typically carry higher rates".into());
    }

    let schedule = amortization_schedule(loan.total_principal, input.annual_rate, input.term_months);
    let output = AutoLoanOutput { loan, schedule };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Fixed-Rate Auto Loan Amortization",
        input,
        warnings,
        elapsed,
        output,
    ))
}

/// Validate a bare principal/rate/term triple and amortize it.
pub fn amortize_loan(
    input: &AmortizationInput,
) -> FinCalcResult<ComputationOutput<AmortizationOutput>> {
    let start = Instant::now();

    if input.principal <= Decimal::ZERO {
        return Err(FinCalcError::InvalidInput {
            field: "principal".into(),
            reason: "Principal must be greater than zero".into(),
        });
    }
    validate_terms(input.annual_rate, input.term_months, Decimal::ZERO)?;

    let output = AmortizationOutput {
        payment: amortize(input.principal, input.annual_rate, input.term_months),
        schedule: amortization_schedule(input.principal, input.annual_rate, input.term_months),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Level-Payment Annuity Amortization",
        input,
        Vec::new(),
        elapsed,
        output,
    ))
}

/// Validate a monthly budget and back out the purchase price it supports.
pub fn calculate_affordability(
    input: &AffordabilityInput,
) -> FinCalcResult<ComputationOutput<AffordabilityOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    require_non_negative(input.monthly_payment, "monthly_payment")?;
    require_non_negative(input.down_payment, "down_payment")?;
    require_non_negative(input.trade_in_value, "trade_in_value")?;
    require_non_negative(input.amount_owed, "amount_owed")?;
    require_non_negative(input.other_fees, "other_fees")?;
    validate_terms(input.annual_rate, input.term_months, input.sales_tax_rate)?;

    let max_loan_amount = affordable_principal(input.monthly_payment, input.annual_rate, input.term_months);
    let net_trade_in = input.trade_in_value - input.amount_owed;
    // price × (1 + tax) + fees = loan + down + trade-in equity
    let funds = max_loan_amount + input.down_payment + net_trade_in - input.other_fees;
    let max_purchase_price = (funds / (Decimal::ONE + input.sales_tax_rate)).max(Decimal::ZERO);
    if funds <= Decimal::ZERO {
        warnings.push("Budget does not cover fees and negative trade-in equity".into());
    }

    let total_interest =
        input.monthly_payment * Decimal::from(input.term_months) - max_loan_amount;

    let output = AffordabilityOutput {
        max_loan_amount,
        max_purchase_price,
        total_interest,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Present Value of Level Monthly Payments",
        input,
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn car_purchase() -> LoanInput {
        LoanInput {
            principal: dec!(30000),
            down_payment: dec!(3000),
            trade_in_value: dec!(5000),
            amount_owed: dec!(2000),
            annual_rate: dec!(0.06),
            term_months: 60,
            sales_tax_rate: dec!(0.07),
            other_fees: dec!(500),
        }
    }

    #[test]
    fn test_amortize_loan_rejects_zero_principal() {
        let input = AmortizationInput {
            principal: Decimal::ZERO,
            annual_rate: dec!(0.05),
            term_months: 36,
        };
        assert!(amortize_loan(&input).is_err());
    }

    #[test]
    fn test_amortize_loan_schedule_matches_payment() {
        let out = amortize_loan(&AmortizationInput {
            principal: dec!(10000),
            annual_rate: dec!(0.05),
            term_months: 36,
        })
        .unwrap();
        assert_eq!(out.result.schedule.len(), 36);
        assert_eq!(out.result.schedule[0].payment, out.result.payment.monthly_payment);
    }

    #[test]
    fn test_amortize_reference_payment() {
        let p = amortize(dec!(30000), dec!(0.06), 60);
        assert!(
            (p.monthly_payment - dec!(579.98)).abs() < dec!(0.01),
            "Expected ~579.98, got {}",
            p.monthly_payment
        );
        assert_eq!(p.total_interest, p.monthly_payment * dec!(60) - dec!(30000));
    }

    #[test]
    fn test_amortize_zero_rate_is_straight_line() {
        let p = amortize(dec!(12000), Decimal::ZERO, 48);
        assert_eq!(p.monthly_payment, dec!(250));
        assert_eq!(p.total_interest, Decimal::ZERO);
        assert_eq!(p.total_cost, dec!(12000));
    }

    #[test]
    fn test_amortize_zero_term_is_zero_payment() {
        let p = amortize(dec!(12000), dec!(0.05), 0);
        assert_eq!(p.monthly_payment, Decimal::ZERO);
    }

    #[test]
    fn test_price_loan_amount() {
        let result = price_loan(&car_purchase());
        // 30000 + 2100 tax + 500 fees - 3000 down - 3000 net trade-in
        assert_eq!(result.sales_tax, dec!(2100));
        assert_eq!(result.loan_amount, dec!(26600));
        assert_eq!(result.total_principal, dec!(26600));
        assert_eq!(result.upfront_cash, dec!(3000));
        let expected_cost = dec!(3000) + result.monthly_payment * dec!(60) + dec!(3000);
        assert_eq!(result.total_cost, expected_cost);
    }

    #[test]
    fn test_price_loan_prepayment_has_no_interest() {
        let mut input = car_purchase();
        input.down_payment = dec!(40000);
        let result = price_loan(&input);
        assert!(result.loan_amount < Decimal::ZERO);
        assert_eq!(result.monthly_payment, Decimal::ZERO);
        assert_eq!(result.total_interest, Decimal::ZERO);
        assert_eq!(result.total_principal, Decimal::ZERO);
        // Only the purchase cost net of trade-in is needed: 32600 - 3000
        assert_eq!(result.upfront_cash, dec!(29600));
    }

    #[test]
    fn test_schedule_closes_at_zero() {
        let rows = amortization_schedule(dec!(10000), dec!(0.05), 36);
        assert_eq!(rows.len(), 36);
        assert_eq!(rows.last().unwrap().remaining_balance, Decimal::ZERO);
        let principal_paid: Decimal = rows.iter().map(|r| r.principal).sum();
        assert!((principal_paid - dec!(10000)).abs() < dec!(0.000001));
        // Interest share shrinks as the balance amortizes
        assert!(rows[0].interest > rows[35].interest);
    }

    #[test]
    fn test_amortize_saturated_factor_approaches_interest_only() {
        // 200% APR over 50 years overflows the compound factor
        let p = amortize(dec!(30000), dec!(2.0), 600);
        assert!(
            (p.monthly_payment - dec!(5000)).abs() < dec!(0.01),
            "Expected ~5000, got {}",
            p.monthly_payment
        );
        assert!(p.total_interest > Decimal::ZERO);
    }

    #[test]
    fn test_schedule_at_max_rate_and_term_closes_at_zero() {
        let rows = amortization_schedule(dec!(30000), MAX_ANNUAL_RATE, MAX_TERM_MONTHS);
        assert_eq!(rows.len(), MAX_TERM_MONTHS as usize);
        assert_eq!(rows.last().unwrap().remaining_balance, Decimal::ZERO);
        assert!(rows.iter().all(|r| r.principal >= Decimal::ZERO));
    }

    #[test]
    fn test_amortize_loan_rejects_rate_above_max() {
        let err = amortize_loan(&AmortizationInput {
            principal: dec!(30000),
            annual_rate: dec!(2.0),
            term_months: 600,
        })
        .unwrap_err();
        assert!(matches!(err, FinCalcError::InvalidInput { ref field, .. } if field == "annual_rate"));

        let out = amortize_loan(&AmortizationInput {
            principal: dec!(30000),
            annual_rate: MAX_ANNUAL_RATE,
            term_months: MAX_TERM_MONTHS,
        })
        .unwrap();
        assert_eq!(out.result.schedule.len(), 600);
    }

    #[test]
    fn test_affordable_principal_inverts_amortize() {
        let p = amortize(dec!(25000), dec!(0.069), 72);
        let back = affordable_principal(p.monthly_payment, dec!(0.069), 72);
        assert!((back - dec!(25000)).abs() < dec!(0.0001));
        assert_eq!(affordable_principal(dec!(500), Decimal::ZERO, 10), dec!(5000));
    }

    #[test]
    fn test_calculate_auto_loan_validation() {
        let mut input = car_purchase();
        input.term_months = 0;
        assert!(calculate_auto_loan(&input).is_err());
        let mut input = car_purchase();
        input.principal = dec!(-1);
        assert!(calculate_auto_loan(&input).is_err());
        let mut input = car_purchase();
        input.sales_tax_rate = dec!(1.5);
        assert!(calculate_auto_loan(&input).is_err());
    }

    #[test]
    fn test_calculate_auto_loan_warns_on_negative_equity() {
        let mut input = car_purchase();
        input.amount_owed = dec!(8000);
        let out = calculate_auto_loan(&input).unwrap();
        assert!(out.warnings.iter().any(|w| w.contains("Negative trade-in equity")));
        assert_eq!(out.result.schedule.len(), 60);
    }

    #[test]
    fn test_affordability_price_includes_tax() {
        let input = AffordabilityInput {
            monthly_payment: dec!(500),
            annual_rate: Decimal::ZERO,
            term_months: 60,
            down_payment: dec!(2000),
            trade_in_value: Decimal::ZERO,
            amount_owed: Decimal::ZERO,
            sales_tax_rate: dec!(0.0),
            other_fees: Decimal::ZERO,
        };
        let out = calculate_affordability(&input).unwrap();
        assert_eq!(out.result.max_loan_amount, dec!(30000));
        assert_eq!(out.result.max_purchase_price, dec!(32000));
        assert_eq!(out.result.total_interest, Decimal::ZERO);
    }
}
