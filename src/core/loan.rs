use super::error::{CalcError, ensure_horizon};
use super::rates::{compound_growth_m1, percent_to_fraction};
use super::types::{AmortizationRow, LoanInput, LoanResult};

/// Remaining balances below this fraction of the principal (or below this
/// absolute amount for principals under 1) are reported as fully repaid.
pub const BALANCE_TOLERANCE: f64 = 1e-6;

/// Fixed monthly installment (EMI) for a fully amortizing loan, with totals
/// and, on request, the month-by-month amortization schedule.
pub fn compute_loan(input: &LoanInput, include_schedule: bool) -> Result<LoanResult, CalcError> {
    if input.total_tenure_months == 0 {
        return Err(CalcError::invalid(
            "total_tenure_months",
            "must be at least one month",
        ));
    }

    let periods = input.total_tenure_months;
    if include_schedule {
        ensure_horizon(u64::from(periods))?;
    }
    let monthly_rate = percent_to_fraction(input.annual_interest_rate) / 12.0;
    let emi = installment(input.principal, monthly_rate, periods);
    let total_payment = emi * f64::from(periods);
    let total_interest = total_payment - input.principal;

    let schedule =
        include_schedule.then(|| amortization_schedule(input.principal, monthly_rate, emi, periods));

    tracing::debug!(
        principal = input.principal,
        monthly_rate,
        periods,
        emi,
        total_interest,
        "loan computed"
    );

    Ok(LoanResult {
        emi,
        total_payment,
        total_interest,
        schedule,
    })
}

fn installment(principal: f64, monthly_rate: f64, periods: u32) -> f64 {
    if monthly_rate == 0.0 {
        return principal / f64::from(periods);
    }
    // P * r * (1+r)^n / ((1+r)^n - 1), with (1+r)^n - 1 taken from expm1.
    let growth_m1 = compound_growth_m1(monthly_rate, f64::from(periods));
    principal * monthly_rate * (1.0 + growth_m1) / growth_m1
}

fn amortization_schedule(
    principal: f64,
    monthly_rate: f64,
    emi: f64,
    periods: u32,
) -> Vec<AmortizationRow> {
    let mut rows = Vec::with_capacity(periods as usize);
    let paid_off_below = BALANCE_TOLERANCE * principal.max(1.0);
    let mut balance = principal;
    for month in 1..=periods {
        let interest_portion = balance * monthly_rate;
        let principal_portion = emi - interest_portion;
        balance -= principal_portion;
        rows.push(AmortizationRow {
            month,
            principal_portion,
            interest_portion,
            remaining_balance: if balance < paid_off_below {
                0.0
            } else {
                balance
            },
        });
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn loan(principal: f64, annual_interest_rate: f64, total_tenure_months: u32) -> LoanInput {
        LoanInput {
            principal,
            annual_interest_rate,
            total_tenure_months,
        }
    }

    #[test]
    fn zero_rate_loan_splits_principal_evenly() {
        let result = compute_loan(&loan(20_000.0, 0.0, 60), true).expect("valid loan");
        assert_approx(result.emi, 20_000.0 / 60.0);
        assert_approx(result.total_payment, 20_000.0);
        assert_approx(result.total_interest, 0.0);
        let schedule = result.schedule.expect("schedule requested");
        assert!(schedule.iter().all(|row| row.interest_portion == 0.0));
        assert_eq!(schedule.last().map(|row| row.remaining_balance), Some(0.0));
    }

    #[test]
    fn standard_loan_matches_annuity_formula() {
        // r = 0.075 / 12 = 0.00625, n = 60: EMI 400.75897191, interest 4045.53831475.
        let result = compute_loan(&loan(20_000.0, 7.5, 60), false).expect("valid loan");
        assert_approx(result.emi, 400.758_971_912_470_7);
        assert_approx(result.total_payment, 24_045.538_314_748_24);
        assert_approx(result.total_interest, 4_045.538_314_748_24);
        assert!(result.schedule.is_none());
    }

    #[test]
    fn schedule_repays_principal_exactly() {
        let result = compute_loan(&loan(20_000.0, 7.5, 60), true).expect("valid loan");
        let schedule = result.schedule.expect("schedule requested");
        assert_eq!(schedule.len(), 60);
        assert_eq!(schedule[0].month, 1);
        assert_approx(schedule[0].interest_portion, 125.0);
        assert_approx(schedule[0].principal_portion, 400.758_971_912_470_7 - 125.0);

        let last = schedule.last().expect("non-empty schedule");
        assert_eq!(last.month, 60);
        assert_approx(last.remaining_balance, 0.0);

        let principal_paid: f64 = schedule.iter().map(|row| row.principal_portion).sum();
        assert_approx(principal_paid, 20_000.0);
        let interest_paid: f64 = schedule.iter().map(|row| row.interest_portion).sum();
        assert_approx(interest_paid, result.total_interest);
    }

    #[test]
    fn years_and_months_tenure_combine() {
        let input = LoanInput::from_years_months(20_000.0, 7.5, 5, 6);
        assert_eq!(input.total_tenure_months, 66);
        let result = compute_loan(&input, true).expect("valid loan");
        assert_eq!(result.schedule.map(|rows| rows.len()), Some(66));
    }

    #[test]
    fn zero_tenure_is_rejected() {
        let err = compute_loan(&loan(20_000.0, 7.5, 0), true).expect_err("must reject");
        assert!(matches!(
            err,
            CalcError::InvalidInput {
                field: "total_tenure_months",
                ..
            }
        ));
    }

    #[test]
    fn tiny_rate_long_tenure_stays_close_to_zero_rate_installment() {
        let result = compute_loan(&loan(300_000.0, 1e-9, 360), false).expect("valid loan");
        assert!((result.emi - 300_000.0 / 360.0).abs() < 1e-6);
        assert!(result.total_interest >= 0.0);
        assert!(result.total_interest < 1e-3);
    }

    #[test]
    fn large_loan_schedule_ends_fully_repaid() {
        let result = compute_loan(&loan(123_456_789.0, 19.9, 372), true).expect("valid loan");
        let schedule = result.schedule.expect("schedule requested");
        assert_eq!(schedule.last().map(|row| row.remaining_balance), Some(0.0));
    }

    #[test]
    fn schedule_beyond_projection_limit_is_rejected() {
        let input = loan(20_000.0, 7.5, u32::MAX);
        let err = compute_loan(&input, true).expect_err("too long");
        assert!(matches!(
            err,
            CalcError::HorizonTooLong { limit, .. } if limit == crate::core::MAX_PROJECTION_MONTHS
        ));
        // Without a schedule nothing is allocated, so the totals are still available.
        assert!(compute_loan(&input, false).is_ok());
    }

    #[test]
    fn loan_is_bit_identical_across_calls() {
        let input = loan(145_000.0, 6.1, 240);
        assert_eq!(compute_loan(&input, true), compute_loan(&input, true));
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(48))]

        #[test]
        fn prop_schedule_balance_is_non_increasing_and_ends_at_zero(
            principal in 1.0f64..1_000_000_000.0,
            rate in 0.0f64..20.0,
            months in 1u32..=372,
        ) {
            let result = compute_loan(&loan(principal, rate, months), true).expect("valid loan");
            let schedule = result.schedule.expect("schedule requested");
            prop_assert!(schedule.len() == months as usize);
            let mut previous = principal;
            for row in &schedule {
                prop_assert!(row.remaining_balance >= 0.0);
                prop_assert!(row.remaining_balance <= previous);
                previous = row.remaining_balance;
            }
            prop_assert_eq!(previous, 0.0);
            let tolerance = 1e-9 * principal.max(1.0);
            let principal_paid: f64 = schedule.iter().map(|row| row.principal_portion).sum();
            prop_assert!((principal_paid - principal).abs() <= tolerance * 10.0);
            prop_assert!(result.total_interest >= -tolerance);
        }
    }
}
