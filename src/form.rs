//! Default values and input limits shared by the HTTP and command-line front ends.
//!
//! The calculators accept any number; these checks keep user input inside the
//! ranges the planner form offers.

use crate::core::{BudgetInput, InvestmentInput, LoanInput, SavingsGoalInput};

pub const DEFAULT_INCOME: f64 = 3_000.0;

pub const DEFAULT_GOAL_AMOUNT: f64 = 10_000.0;
pub const DEFAULT_MONTHLY_SAVINGS: f64 = 500.0;
pub const DEFAULT_CURRENT_SAVINGS: f64 = 0.0;
pub const DEFAULT_SAVINGS_INTEREST_RATE: f64 = 3.5;
pub const DEFAULT_SAVINGS_INFLATION_RATE: f64 = 2.0;

pub const DEFAULT_LOAN_PRINCIPAL: f64 = 20_000.0;
pub const DEFAULT_LOAN_YEARS: u32 = 5;
pub const DEFAULT_LOAN_EXTRA_MONTHS: u32 = 0;
pub const DEFAULT_LOAN_RATE: f64 = 7.5;

pub const DEFAULT_INITIAL_INVESTMENT: f64 = 1_000.0;
pub const DEFAULT_MONTHLY_CONTRIBUTION: f64 = 100.0;
pub const DEFAULT_INVESTMENT_YEARS: u32 = 10;
pub const DEFAULT_ANNUAL_RETURN: f64 = 7.0;
pub const DEFAULT_ANNUAL_INFLATION: f64 = 2.5;

pub const MAX_INTEREST_RATE: f64 = 20.0;
pub const MAX_INFLATION_RATE: f64 = 10.0;
pub const MAX_LOAN_YEARS: u32 = 30;
pub const MAX_INVESTMENT_YEARS: u32 = 50;

pub fn default_savings() -> SavingsGoalInput {
    SavingsGoalInput {
        goal_amount: DEFAULT_GOAL_AMOUNT,
        monthly_savings: DEFAULT_MONTHLY_SAVINGS,
        current_savings: DEFAULT_CURRENT_SAVINGS,
        annual_interest_rate: DEFAULT_SAVINGS_INTEREST_RATE,
        annual_inflation_rate: DEFAULT_SAVINGS_INFLATION_RATE,
    }
}

pub fn default_loan() -> LoanInput {
    LoanInput::from_years_months(
        DEFAULT_LOAN_PRINCIPAL,
        DEFAULT_LOAN_RATE,
        DEFAULT_LOAN_YEARS,
        DEFAULT_LOAN_EXTRA_MONTHS,
    )
}

pub fn default_investment() -> InvestmentInput {
    InvestmentInput {
        initial_investment: DEFAULT_INITIAL_INVESTMENT,
        monthly_contribution: DEFAULT_MONTHLY_CONTRIBUTION,
        years: DEFAULT_INVESTMENT_YEARS,
        annual_return: DEFAULT_ANNUAL_RETURN,
        annual_inflation: DEFAULT_ANNUAL_INFLATION,
    }
}

pub fn validate_budget(input: &BudgetInput) -> Result<(), String> {
    check_min("income", input.income, 0.0)?;
    for (category, amount) in &input.expenses {
        if category.trim().is_empty() {
            return Err("expense category names must not be empty".to_string());
        }
        if !amount.is_finite() || *amount < 0.0 {
            return Err(format!("expense '{category}' must be >= 0"));
        }
    }
    Ok(())
}

pub fn validate_savings(input: &SavingsGoalInput) -> Result<(), String> {
    check_min("goalAmount", input.goal_amount, 1.0)?;
    check_min("monthlySavings", input.monthly_savings, 1.0)?;
    check_min("currentSavings", input.current_savings, 0.0)?;
    check_range("interestRate", input.annual_interest_rate, 0.0, MAX_INTEREST_RATE)?;
    check_range(
        "inflationRate",
        input.annual_inflation_rate,
        0.0,
        MAX_INFLATION_RATE,
    )
}

/// Checks loan terms as entered: whole years plus 0-11 extra months.
pub fn validate_loan_terms(
    principal: f64,
    annual_interest_rate: f64,
    years: u32,
    extra_months: u32,
) -> Result<(), String> {
    check_min("principal", principal, 1.0)?;
    check_range("interestRate", annual_interest_rate, 0.0, MAX_INTEREST_RATE)?;
    if !(1..=MAX_LOAN_YEARS).contains(&years) {
        return Err(format!("tenureYears must be between 1 and {MAX_LOAN_YEARS}"));
    }
    if extra_months > 11 {
        return Err("tenureMonths must be between 0 and 11".to_string());
    }
    Ok(())
}

pub fn validate_investment(input: &InvestmentInput) -> Result<(), String> {
    check_min("initialInvestment", input.initial_investment, 0.0)?;
    check_min("monthlyContribution", input.monthly_contribution, 0.0)?;
    if !(1..=MAX_INVESTMENT_YEARS).contains(&input.years) {
        return Err(format!(
            "years must be between 1 and {MAX_INVESTMENT_YEARS}"
        ));
    }
    check_range("annualReturn", input.annual_return, 0.0, MAX_INTEREST_RATE)?;
    check_range(
        "annualInflation",
        input.annual_inflation,
        0.0,
        MAX_INFLATION_RATE,
    )
}

fn check_min(name: &str, value: f64, min: f64) -> Result<(), String> {
    if !value.is_finite() || value < min {
        return Err(format!("{name} must be >= {min}"));
    }
    Ok(())
}

fn check_range(name: &str, value: f64, min: f64, max: f64) -> Result<(), String> {
    if !value.is_finite() || !(min..=max).contains(&value) {
        return Err(format!("{name} must be between {min} and {max}"));
    }
    Ok(())
}
