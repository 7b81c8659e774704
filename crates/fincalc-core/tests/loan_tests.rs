use fincalc_core::loan::{
    amortization_schedule, amortize, affordable_principal, calculate_affordability,
    calculate_auto_loan, AffordabilityInput, LoanInput,
};
use fincalc_core::FinCalcError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn assert_close(actual: Decimal, expected: Decimal, tol: Decimal) {
    assert!(
        (actual - expected).abs() <= tol,
        "expected {expected}, got {actual} (tolerance {tol})"
    );
}

fn sample_purchase() -> LoanInput {
    LoanInput {
        principal: dec!(35_000),
        down_payment: dec!(5_000),
        trade_in_value: dec!(8_000),
        amount_owed: dec!(3_000),
        annual_rate: dec!(0.069),
        term_months: 60,
        sales_tax_rate: dec!(0.07),
        other_fees: dec!(500),
    }
}

// ===========================================================================
// Amortization
// ===========================================================================

#[test]
fn test_reference_payment() {
    let p = amortize(dec!(30_000), dec!(0.06), 60);
    assert_close(p.monthly_payment, dec!(579.98), dec!(0.01));
    assert_close(p.total_interest, dec!(4_799.06), dec!(0.05));
}

#[test]
fn test_zero_rate_is_straight_line() {
    let p = amortize(dec!(12_000), Decimal::ZERO, 48);
    assert_eq!(p.monthly_payment, dec!(250));
    assert_eq!(p.total_interest, Decimal::ZERO);
    assert_eq!(p.total_cost, dec!(12_000));
}

#[test]
fn test_higher_rate_costs_more() {
    let low = amortize(dec!(20_000), dec!(0.04), 60);
    let high = amortize(dec!(20_000), dec!(0.09), 60);
    assert!(high.monthly_payment > low.monthly_payment);
    assert!(high.total_interest > low.total_interest);
}

#[test]
fn test_longer_term_lowers_payment_raises_interest() {
    let short = amortize(dec!(20_000), dec!(0.06), 36);
    let long = amortize(dec!(20_000), dec!(0.06), 72);
    assert!(long.monthly_payment < short.monthly_payment);
    assert!(long.total_interest > short.total_interest);
}

#[test]
fn test_schedule_closes_at_zero() {
    let rows = amortization_schedule(dec!(25_000), dec!(0.055), 60);
    assert_eq!(rows.len(), 60);
    assert_eq!(rows.last().unwrap().remaining_balance, Decimal::ZERO);
    let principal: Decimal = rows.iter().map(|r| r.principal).sum();
    assert_close(principal, dec!(25_000), dec!(0.000001));
    // interest share falls as the balance amortizes
    assert!(rows[0].interest > rows[59].interest);
}

#[test]
fn test_affordable_principal_inverts_payment() {
    let payment = amortize(dec!(18_500), dec!(0.075), 72).monthly_payment;
    assert_close(affordable_principal(payment, dec!(0.075), 72), dec!(18_500), dec!(0.01));
}

// ===========================================================================
// Auto loan pricing
// ===========================================================================

#[test]
fn test_auto_loan_pricing() {
    let out = calculate_auto_loan(&sample_purchase()).unwrap();
    let loan = &out.result.loan;
    // 35000 + 2450 tax + 500 fees - 5000 down - 5000 equity
    assert_eq!(loan.sales_tax, dec!(2450));
    assert_eq!(loan.loan_amount, dec!(27_950));
    assert_eq!(loan.upfront_cash, dec!(5_000));
    assert_eq!(out.result.schedule.len(), 60);
    assert!(loan.total_cost > loan.loan_amount + loan.upfront_cash);
    assert!(out.warnings.is_empty());
}

#[test]
fn test_negative_equity_warns() {
    let input = LoanInput {
        trade_in_value: dec!(4_000),
        amount_owed: dec!(9_000),
        ..sample_purchase()
    };
    let out = calculate_auto_loan(&input).unwrap();
    assert!(out.warnings.iter().any(|w| w.contains("Negative trade-in equity")));
    assert_eq!(out.result.loan.loan_amount, dec!(37_950));
}

#[test]
fn test_overfunded_purchase_needs_no_loan() {
    let input = LoanInput {
        principal: dec!(10_000),
        down_payment: dec!(15_000),
        trade_in_value: Decimal::ZERO,
        amount_owed: Decimal::ZERO,
        sales_tax_rate: Decimal::ZERO,
        other_fees: Decimal::ZERO,
        ..sample_purchase()
    };
    let out = calculate_auto_loan(&input).unwrap();
    assert!(out.result.loan.loan_amount < Decimal::ZERO);
    assert_eq!(out.result.loan.monthly_payment, Decimal::ZERO);
    assert_eq!(out.result.loan.upfront_cash, dec!(10_000));
    assert!(out.result.schedule.is_empty());
}

#[test]
fn test_invalid_term_rejected() {
    let input = LoanInput {
        term_months: 0,
        ..sample_purchase()
    };
    match calculate_auto_loan(&input).unwrap_err() {
        FinCalcError::InvalidInput { field, .. } => assert_eq!(field, "term_months"),
        other => panic!("Expected InvalidInput, got {other:?}"),
    }
}

#[test]
fn test_affordability_round_trips_to_price() {
    let out = calculate_affordability(&AffordabilityInput {
        monthly_payment: dec!(500),
        annual_rate: dec!(0.06),
        term_months: 60,
        down_payment: dec!(2_000),
        trade_in_value: Decimal::ZERO,
        amount_owed: Decimal::ZERO,
        sales_tax_rate: Decimal::ZERO,
        other_fees: Decimal::ZERO,
    })
    .unwrap();
    assert_close(out.result.max_loan_amount, dec!(25_862.78), dec!(0.05));
    assert_close(
        out.result.max_purchase_price,
        out.result.max_loan_amount + dec!(2_000),
        dec!(0.000001),
    );
}
