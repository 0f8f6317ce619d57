use super::error::{CalcError, ensure_horizon};
use super::rates::{percent_to_fraction, real_rate};
use super::types::{GoalStatus, SavingsGoalInput, SavingsPoint, SavingsProjection};

/// Solves for the number of months of fixed saving needed to reach a goal,
/// growing savings at the inflation-adjusted interest rate.
///
/// A goal already covered by current savings short-circuits to
/// [`GoalStatus::AlreadyMet`] before any other input is checked.
pub fn solve_savings_goal(input: &SavingsGoalInput) -> Result<SavingsProjection, CalcError> {
    ensure_finite("goal_amount", input.goal_amount)?;
    ensure_finite("current_savings", input.current_savings)?;

    let remaining = input.goal_amount - input.current_savings;
    if remaining <= 0.0 {
        tracing::debug!(
            goal = input.goal_amount,
            current = input.current_savings,
            "savings goal already met"
        );
        return Ok(build_projection(input, GoalStatus::AlreadyMet, 0, 0.0));
    }

    validate_rates_and_savings(input)?;

    let monthly_rate = real_rate(
        percent_to_fraction(input.annual_interest_rate),
        percent_to_fraction(input.annual_inflation_rate),
    ) / 12.0;

    let raw_months = if monthly_rate == 0.0 {
        remaining / input.monthly_savings
    } else {
        let annuity_term = monthly_rate * remaining / input.monthly_savings;
        if annuity_term <= -1.0 {
            return Err(CalcError::GoalUnreachable);
        }
        annuity_term.ln_1p() / monthly_rate.ln_1p()
    };

    // Float-to-int casts saturate, so an infinite month count still trips the guard.
    let months = ensure_horizon(raw_months.ceil().max(1.0) as u64)?;

    let projection = build_projection(input, GoalStatus::Projected, months, monthly_rate);
    tracing::debug!(
        months,
        monthly_rate,
        final_amount = projection.final_amount,
        "savings goal solved"
    );
    Ok(projection)
}

fn build_projection(
    input: &SavingsGoalInput,
    status: GoalStatus,
    months: u32,
    monthly_rate: f64,
) -> SavingsProjection {
    let series = project_savings(
        input.current_savings,
        input.monthly_savings,
        monthly_rate,
        months,
    );
    let final_amount = series
        .last()
        .map(|point| point.amount)
        .unwrap_or(input.current_savings);

    SavingsProjection {
        status,
        months_to_goal: months,
        years: months / 12,
        remainder_months: months % 12,
        monthly_real_rate: monthly_rate,
        final_amount,
        series,
    }
}

/// Month-by-month balance from month 0 through `months` inclusive.
fn project_savings(start: f64, deposit: f64, monthly_rate: f64, months: u32) -> Vec<SavingsPoint> {
    let mut series = Vec::with_capacity(months as usize + 1);
    let mut amount = start;
    for month in 0..=months {
        series.push(SavingsPoint { month, amount });
        amount = amount * (1.0 + monthly_rate) + deposit;
    }
    series
}

fn validate_rates_and_savings(input: &SavingsGoalInput) -> Result<(), CalcError> {
    if !(input.monthly_savings.is_finite() && input.monthly_savings > 0.0) {
        return Err(CalcError::invalid(
            "monthly_savings",
            "must be a positive amount",
        ));
    }
    ensure_finite("annual_interest_rate", input.annual_interest_rate)?;
    ensure_finite("annual_inflation_rate", input.annual_inflation_rate)?;
    if input.annual_inflation_rate <= -100.0 {
        return Err(CalcError::invalid(
            "annual_inflation_rate",
            "must be greater than -100%",
        ));
    }
    Ok(())
}

fn ensure_finite(field: &'static str, value: f64) -> Result<(), CalcError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(CalcError::invalid(field, "must be a finite number"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MAX_PROJECTION_MONTHS;
    use proptest::prelude::{prop_assert, prop_assert_eq, prop_assume, proptest};

    fn assert_close(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() <= tol,
            "expected {expected}, got {actual}, tolerance {tol}"
        );
    }

    fn goal(
        goal_amount: f64,
        monthly_savings: f64,
        current_savings: f64,
        annual_interest_rate: f64,
        annual_inflation_rate: f64,
    ) -> SavingsGoalInput {
        SavingsGoalInput {
            goal_amount,
            monthly_savings,
            current_savings,
            annual_interest_rate,
            annual_inflation_rate,
        }
    }

    #[test]
    fn zero_rate_goal_takes_exact_number_of_months() {
        let result = solve_savings_goal(&goal(10_000.0, 500.0, 0.0, 0.0, 0.0)).expect("solvable");
        assert_eq!(result.status, GoalStatus::Projected);
        assert_eq!(result.months_to_goal, 20);
        assert_eq!(result.years, 1);
        assert_eq!(result.remainder_months, 8);
        assert_eq!(result.series.len(), 21);
        assert_eq!(result.series[0].amount, 0.0);
        assert_close(result.final_amount, 10_000.0, 1e-9);
    }

    #[test]
    fn fractional_months_round_up() {
        let result = solve_savings_goal(&goal(1_000.0, 300.0, 0.0, 0.0, 0.0)).expect("solvable");
        assert_eq!(result.months_to_goal, 4);
    }

    #[test]
    fn tiny_remaining_amount_still_takes_one_month() {
        let result = solve_savings_goal(&goal(100.0, 500.0, 99.99, 5.0, 0.0)).expect("solvable");
        assert_eq!(result.months_to_goal, 1);
        assert_eq!(result.series.len(), 2);
    }

    #[test]
    fn real_interest_matches_closed_form() {
        // Real annual rate 1.035 / 1.02 - 1, monthly 0.0012254902; closed form gives 19.77 months.
        let result = solve_savings_goal(&goal(10_000.0, 500.0, 0.0, 3.5, 2.0)).expect("solvable");
        assert_close(result.monthly_real_rate, 0.001_225_490_196, 1e-12);
        assert_eq!(result.months_to_goal, 20);
        assert_close(result.final_amount, 10_117.282_085_658, 1e-6);
    }

    #[test]
    fn already_met_goal_reports_zero_months() {
        let result = solve_savings_goal(&goal(5_000.0, 200.0, 5_000.0, 3.5, 2.0)).expect("met");
        assert!(result.is_already_met());
        assert_eq!(result.months_to_goal, 0);
        assert_eq!(
            result.series,
            vec![SavingsPoint {
                month: 0,
                amount: 5_000.0
            }]
        );
    }

    #[test]
    fn non_positive_monthly_savings_is_rejected() {
        for savings in [0.0, -25.0, f64::NAN] {
            let err = solve_savings_goal(&goal(10_000.0, savings, 0.0, 3.5, 2.0))
                .expect_err("must reject");
            assert!(matches!(
                err,
                CalcError::InvalidInput {
                    field: "monthly_savings",
                    ..
                }
            ));
        }
    }

    #[test]
    fn inflation_eroding_savings_faster_than_deposits_is_unreachable() {
        // Monthly real rate is about -0.0417; 1,000,000 left at 10/month never converges.
        let err = solve_savings_goal(&goal(1_000_000.0, 10.0, 0.0, 0.0, 100.0))
            .expect_err("unreachable");
        assert_eq!(err, CalcError::GoalUnreachable);
    }

    #[test]
    fn absurd_horizon_is_rejected_before_allocating() {
        let err = solve_savings_goal(&goal(1e12, 1.0, 0.0, 0.0, 0.0)).expect_err("too long");
        assert!(matches!(
            err,
            CalcError::HorizonTooLong { limit, .. } if limit == MAX_PROJECTION_MONTHS
        ));
    }

    #[test]
    fn solver_is_bit_identical_across_calls() {
        let input = goal(25_000.0, 650.0, 1_200.0, 4.2, 2.7);
        assert_eq!(solve_savings_goal(&input), solve_savings_goal(&input));
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_covered_goal_is_met_regardless_of_other_inputs(
            goal_amount in 1.0f64..100_000.0,
            surplus in 0.0f64..50_000.0,
            monthly_savings in -1_000.0f64..1_000.0,
            interest in 0.0f64..20.0,
            inflation in 0.0f64..10.0,
        ) {
            let input = goal(goal_amount, monthly_savings, goal_amount + surplus, interest, inflation);
            let result = solve_savings_goal(&input).expect("already met never fails");
            prop_assert!(result.is_already_met());
            prop_assert_eq!(result.months_to_goal, 0);
        }

        #[test]
        fn prop_non_negative_real_rate_reaches_goal_by_last_month(
            goal_amount in 100.0f64..200_000.0,
            monthly_savings in 50.0f64..5_000.0,
            current_fraction in 0.0f64..0.9,
            inflation in 0.0f64..10.0,
            spread in 0.0f64..10.0,
        ) {
            let current = goal_amount * current_fraction;
            let input = goal(goal_amount, monthly_savings, current, inflation + spread, inflation);
            let result = solve_savings_goal(&input).expect("reachable");
            prop_assume!(result.status == GoalStatus::Projected);
            prop_assert!(result.months_to_goal >= 1);
            prop_assert_eq!(result.series.len(), result.months_to_goal as usize + 1);
            for (index, point) in result.series.iter().enumerate() {
                prop_assert_eq!(point.month as usize, index);
            }
            let tolerance = 1e-9 * goal_amount;
            prop_assert!(result.final_amount + tolerance >= goal_amount);
        }
    }
}
