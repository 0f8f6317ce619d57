//! Plain-text summary report covering whichever calculators were run.

use std::fmt::Write;

use chrono::NaiveDate;

use crate::core::{
    BudgetInput, BudgetResult, CalcError, InvestmentInput, InvestmentProjection, LoanInput,
    LoanResult, SavingsGoalInput, SavingsProjection, compute_loan, simulate_investment,
    solve_savings_goal, summarize_budget,
};

#[derive(Debug, Clone)]
pub struct SavingsSection {
    pub input: SavingsGoalInput,
    pub projection: SavingsProjection,
}

#[derive(Debug, Clone)]
pub struct LoanSection {
    pub input: LoanInput,
    pub result: LoanResult,
}

#[derive(Debug, Clone)]
pub struct InvestmentSection {
    pub input: InvestmentInput,
    pub projection: InvestmentProjection,
}

#[derive(Debug, Clone, Default)]
pub struct ReportSections {
    pub budget: Option<BudgetResult>,
    pub savings: Option<SavingsSection>,
    pub loan: Option<LoanSection>,
    pub investment: Option<InvestmentSection>,
}

impl ReportSections {
    /// Runs every calculator that has inputs. The first failure aborts the report.
    pub fn compute(
        budget: Option<&BudgetInput>,
        savings: Option<&SavingsGoalInput>,
        loan: Option<&LoanInput>,
        investment: Option<&InvestmentInput>,
    ) -> Result<Self, CalcError> {
        let savings = savings
            .map(|input| {
                solve_savings_goal(input).map(|projection| SavingsSection {
                    input: *input,
                    projection,
                })
            })
            .transpose()?;
        let loan = loan
            .map(|input| {
                compute_loan(input, false).map(|result| LoanSection {
                    input: *input,
                    result,
                })
            })
            .transpose()?;
        let investment = investment
            .map(|input| {
                simulate_investment(input).map(|projection| InvestmentSection {
                    input: *input,
                    projection,
                })
            })
            .transpose()?;

        Ok(Self {
            budget: budget.map(summarize_budget),
            savings,
            loan,
            investment,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.budget.is_none()
            && self.savings.is_none()
            && self.loan.is_none()
            && self.investment.is_none()
    }
}

pub fn render_report(sections: &ReportSections, generated_on: NaiveDate) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_report(&mut out, sections, generated_on);
    out
}

fn write_report(
    out: &mut String,
    sections: &ReportSections,
    generated_on: NaiveDate,
) -> std::fmt::Result {
    writeln!(out, "Personal Finance Planner Report")?;
    writeln!(out, "Generated on {}", generated_on.format("%Y-%m-%d"))?;

    if let Some(budget) = &sections.budget {
        writeln!(out)?;
        writeln!(out, "===== Budget Summary =====")?;
        writeln!(out, "Income: {}", format_currency(budget.income))?;
        writeln!(out, "Expenses: {}", format_currency(budget.total_expenses))?;
        writeln!(out, "Balance: {}", format_currency(budget.balance))?;
    }

    if let Some(savings) = &sections.savings {
        writeln!(out)?;
        writeln!(out, "===== Savings Goals =====")?;
        writeln!(out, "Goal Amount: {}", format_currency(savings.input.goal_amount))?;
        writeln!(
            out,
            "Monthly Savings: {}",
            format_currency(savings.input.monthly_savings)
        )?;
        let projection = &savings.projection;
        if projection.is_already_met() {
            writeln!(out, "Time to Goal: already reached")?;
        } else {
            writeln!(
                out,
                "Time to Goal: {} years and {} months ({} months total)",
                projection.years, projection.remainder_months, projection.months_to_goal
            )?;
            writeln!(
                out,
                "Projected Savings (today's dollars): {}",
                format_currency(projection.final_amount)
            )?;
        }
    }

    if let Some(loan) = &sections.loan {
        writeln!(out)?;
        writeln!(out, "===== Loan Information =====")?;
        writeln!(out, "Loan Amount: {}", format_currency(loan.input.principal))?;
        writeln!(out, "EMI: {}", format_currency(loan.result.emi))?;
        writeln!(
            out,
            "Total Interest: {}",
            format_currency(loan.result.total_interest)
        )?;
        writeln!(
            out,
            "Total Payment: {}",
            format_currency(loan.result.total_payment)
        )?;
    }

    if let Some(investment) = &sections.investment {
        let summary = &investment.projection.summary;
        writeln!(out)?;
        writeln!(out, "===== Investment Projection =====")?;
        writeln!(
            out,
            "Initial Investment: {}",
            format_currency(investment.input.initial_investment)
        )?;
        writeln!(
            out,
            "Projected Value (after {} years): {}",
            investment.input.years,
            format_currency(summary.final_nominal)
        )?;
        writeln!(
            out,
            "Inflation-Adjusted Value: {}",
            format_currency(summary.final_real)
        )?;
        writeln!(
            out,
            "Total Contributions: {}",
            format_currency(summary.total_contributions)
        )?;
    }

    Ok(())
}

/// Formats an amount as dollars with thousands separators: `-$1,234.56`.
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return format!("${value}");
    }

    let cents = (value.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (index, digit) in whole.chars().enumerate() {
        if index > 0 && (whole.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}${grouped}.{:02}", cents % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 14).expect("valid date")
    }

    #[test]
    fn currency_uses_thousands_separators_and_cents() {
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(5.0), "$5.00");
        assert_eq!(format_currency(999.999), "$1,000.00");
        assert_eq!(format_currency(1_234.5), "$1,234.50");
        assert_eq!(format_currency(1_234_567.891), "$1,234,567.89");
        assert_eq!(format_currency(-250.5), "-$250.50");
        assert_eq!(format_currency(-0.001), "$0.00");
    }

    #[test]
    fn empty_report_has_only_header() {
        let report = render_report(&ReportSections::default(), report_date());
        assert_eq!(
            report,
            "Personal Finance Planner Report\nGenerated on 2026-03-14\n"
        );
    }

    #[test]
    fn full_report_lists_every_section() {
        let mut budget = BudgetInput::new(3_000.0);
        budget.set_expense("Utilities", 150.0);
        let savings = SavingsGoalInput {
            goal_amount: 10_000.0,
            monthly_savings: 500.0,
            current_savings: 0.0,
            annual_interest_rate: 0.0,
            annual_inflation_rate: 0.0,
        };
        let loan = LoanInput::from_years_months(20_000.0, 7.5, 5, 0);
        let investment = InvestmentInput {
            initial_investment: 1_000.0,
            monthly_contribution: 100.0,
            years: 10,
            annual_return: 7.0,
            annual_inflation: 2.5,
        };

        let sections = ReportSections::compute(
            Some(&budget),
            Some(&savings),
            Some(&loan),
            Some(&investment),
        )
        .expect("valid inputs");
        assert!(!sections.is_empty());
        let report = render_report(&sections, report_date());

        for expected in [
            "===== Budget Summary =====",
            "Balance: $2,850.00",
            "===== Savings Goals =====",
            "Time to Goal: 1 years and 8 months (20 months total)",
            "===== Loan Information =====",
            "EMI: $400.76",
            "Total Interest: $4,045.54",
            "===== Investment Projection =====",
            "Projected Value (after 10 years): $19,072.32",
            "Total Contributions: $13,000.00",
        ] {
            assert!(report.contains(expected), "missing {expected:?} in:\n{report}");
        }
    }

    #[test]
    fn failing_calculator_aborts_report() {
        let loan = LoanInput::from_years_months(20_000.0, 7.5, 0, 0);
        let err = ReportSections::compute(None, None, Some(&loan), None).expect_err("zero tenure");
        assert!(matches!(err, CalcError::InvalidInput { .. }));
    }
}
