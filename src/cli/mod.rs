use std::fmt::Write as _;
use std::net::IpAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use thiserror::Error;

use crate::config::{DEFAULT_PORT, ServerConfig};
use crate::core::{
    BudgetInput, BudgetResult, CalcError, InvestmentInput, InvestmentProjection, LoanInput,
    LoanResult, SavingsGoalInput, SavingsProjection, compute_loan, simulate_investment,
    solve_savings_goal, summarize_budget,
};
use crate::form;
use crate::report::{ReportSections, format_currency, render_report};

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    InvalidInput(String),
    #[error(transparent)]
    Calc(#[from] CalcError),
    #[error("failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Parser, Debug)]
#[command(
    name = "fincalc",
    version,
    about = "Personal finance planner: budget balance, savings goal, loan EMI and investment growth"
)]
pub struct Cli {
    /// Print results as JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the HTTP API and web page
    Serve(ServeArgs),
    /// Total monthly expenses and remaining balance
    Budget(BudgetArgs),
    /// Months of saving needed to reach a goal
    Savings(SavingsArgs),
    /// Monthly installment and amortization of a loan
    Loan(LoanArgs),
    /// Nominal and inflation-adjusted growth of an investment plan
    Invest(InvestArgs),
    /// Plain-text report covering all four calculators
    Report(ReportArgs),
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    #[arg(long, env = "FINCALC_HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,
    #[arg(long, env = "FINCALC_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,
}

#[derive(Args, Debug)]
pub struct BudgetArgs {
    #[arg(long, default_value_t = form::DEFAULT_INCOME)]
    pub income: f64,
    /// Expense category and monthly amount, repeatable
    #[arg(long = "expense", value_name = "NAME=AMOUNT", value_parser = parse_expense)]
    pub expenses: Vec<(String, f64)>,
}

#[derive(Args, Debug)]
pub struct SavingsArgs {
    #[arg(long, default_value_t = form::DEFAULT_GOAL_AMOUNT)]
    pub goal: f64,
    #[arg(long, default_value_t = form::DEFAULT_MONTHLY_SAVINGS)]
    pub monthly: f64,
    #[arg(long, default_value_t = form::DEFAULT_CURRENT_SAVINGS)]
    pub current: f64,
    /// Annual interest rate in percent
    #[arg(long, default_value_t = form::DEFAULT_SAVINGS_INTEREST_RATE)]
    pub interest_rate: f64,
    /// Annual inflation rate in percent
    #[arg(long, default_value_t = form::DEFAULT_SAVINGS_INFLATION_RATE)]
    pub inflation_rate: f64,
}

#[derive(Args, Debug)]
pub struct LoanArgs {
    #[arg(long, default_value_t = form::DEFAULT_LOAN_PRINCIPAL)]
    pub principal: f64,
    #[arg(long, default_value_t = form::DEFAULT_LOAN_YEARS)]
    pub years: u32,
    /// Extra months on top of whole years (0-11)
    #[arg(long, default_value_t = form::DEFAULT_LOAN_EXTRA_MONTHS)]
    pub months: u32,
    /// Annual interest rate in percent
    #[arg(long, default_value_t = form::DEFAULT_LOAN_RATE)]
    pub rate: f64,
    /// Include the month-by-month amortization schedule
    #[arg(long)]
    pub schedule: bool,
}

#[derive(Args, Debug)]
pub struct InvestArgs {
    #[arg(long, default_value_t = form::DEFAULT_INITIAL_INVESTMENT)]
    pub initial: f64,
    #[arg(long, default_value_t = form::DEFAULT_MONTHLY_CONTRIBUTION)]
    pub monthly: f64,
    #[arg(long, default_value_t = form::DEFAULT_INVESTMENT_YEARS)]
    pub years: u32,
    /// Expected annual return in percent
    #[arg(long = "return", default_value_t = form::DEFAULT_ANNUAL_RETURN)]
    pub annual_return: f64,
    /// Expected annual inflation in percent
    #[arg(long, default_value_t = form::DEFAULT_ANNUAL_INFLATION)]
    pub inflation: f64,
}

#[derive(Args, Debug)]
pub struct ReportArgs {
    #[command(flatten)]
    pub budget: BudgetArgs,
    #[arg(long, default_value_t = form::DEFAULT_GOAL_AMOUNT)]
    pub goal: f64,
    #[arg(long, default_value_t = form::DEFAULT_MONTHLY_SAVINGS)]
    pub monthly_savings: f64,
    #[arg(long, default_value_t = form::DEFAULT_LOAN_PRINCIPAL)]
    pub loan_principal: f64,
    #[arg(long, default_value_t = form::DEFAULT_LOAN_YEARS)]
    pub loan_years: u32,
    #[arg(long, default_value_t = form::DEFAULT_LOAN_RATE)]
    pub loan_rate: f64,
    #[arg(long, default_value_t = form::DEFAULT_INITIAL_INVESTMENT)]
    pub initial_investment: f64,
    #[arg(long, default_value_t = form::DEFAULT_MONTHLY_CONTRIBUTION)]
    pub monthly_contribution: f64,
    #[arg(long, default_value_t = form::DEFAULT_INVESTMENT_YEARS)]
    pub investment_years: u32,
    /// Write the report to a file instead of stdout
    #[arg(long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

fn parse_expense(raw: &str) -> Result<(String, f64), String> {
    let (name, amount) = raw
        .rsplit_once('=')
        .ok_or_else(|| format!("expected NAME=AMOUNT, got '{raw}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing category name in '{raw}'"));
    }
    let amount = amount
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid amount in '{raw}': {e}"))?;
    Ok((name.to_string(), amount))
}

pub async fn run(cli: Cli) -> Result<(), CliError> {
    let json = cli.json;
    match cli.command {
        Command::Serve(args) => {
            crate::api::run_http_server(ServerConfig::new(args.host, args.port)).await?;
        }
        Command::Budget(args) => {
            let result = summarize_budget(&budget_input(&args)?);
            emit(json, &result, write_budget)?;
        }
        Command::Savings(args) => {
            let projection = solve_savings_goal(&savings_input(&args)?)?;
            emit(json, &projection, write_savings)?;
        }
        Command::Loan(args) => {
            let input = loan_input(&args)?;
            let result = compute_loan(&input, args.schedule)?;
            emit(json, &result, write_loan)?;
        }
        Command::Invest(args) => {
            let projection = simulate_investment(&investment_input(&args)?)?;
            emit(json, &projection, write_investment)?;
        }
        Command::Report(args) => {
            let text = report_text(&args)?;
            match &args.output {
                Some(path) => {
                    std::fs::write(path, &text)?;
                    tracing::info!(path = %path.display(), "report written");
                }
                None => print!("{text}"),
            }
        }
    }
    Ok(())
}

type TextWriter<T> = fn(&mut String, &T) -> std::fmt::Result;

fn emit<T: Serialize>(json: bool, value: &T, write: TextWriter<T>) -> Result<(), CliError> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        print!("{}", render_text(value, write));
    }
    Ok(())
}

fn render_text<T>(value: &T, write: TextWriter<T>) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write(&mut out, value);
    out
}

fn budget_input(args: &BudgetArgs) -> Result<BudgetInput, CliError> {
    let mut input = if args.expenses.is_empty() {
        BudgetInput::with_default_categories(args.income)
    } else {
        BudgetInput::new(args.income)
    };
    for (name, amount) in &args.expenses {
        input.set_expense(name.clone(), *amount);
    }
    form::validate_budget(&input).map_err(CliError::InvalidInput)?;
    Ok(input)
}

fn savings_input(args: &SavingsArgs) -> Result<SavingsGoalInput, CliError> {
    let input = SavingsGoalInput {
        goal_amount: args.goal,
        monthly_savings: args.monthly,
        current_savings: args.current,
        annual_interest_rate: args.interest_rate,
        annual_inflation_rate: args.inflation_rate,
    };
    form::validate_savings(&input).map_err(CliError::InvalidInput)?;
    Ok(input)
}

fn loan_input(args: &LoanArgs) -> Result<LoanInput, CliError> {
    form::validate_loan_terms(args.principal, args.rate, args.years, args.months)
        .map_err(CliError::InvalidInput)?;
    Ok(LoanInput::from_years_months(
        args.principal,
        args.rate,
        args.years,
        args.months,
    ))
}

fn investment_input(args: &InvestArgs) -> Result<InvestmentInput, CliError> {
    let input = InvestmentInput {
        initial_investment: args.initial,
        monthly_contribution: args.monthly,
        years: args.years,
        annual_return: args.annual_return,
        annual_inflation: args.inflation,
    };
    form::validate_investment(&input).map_err(CliError::InvalidInput)?;
    Ok(input)
}

fn report_text(args: &ReportArgs) -> Result<String, CliError> {
    let budget = budget_input(&args.budget)?;
    let savings = savings_input(&SavingsArgs {
        goal: args.goal,
        monthly: args.monthly_savings,
        current: form::DEFAULT_CURRENT_SAVINGS,
        interest_rate: form::DEFAULT_SAVINGS_INTEREST_RATE,
        inflation_rate: form::DEFAULT_SAVINGS_INFLATION_RATE,
    })?;
    let loan = loan_input(&LoanArgs {
        principal: args.loan_principal,
        years: args.loan_years,
        months: 0,
        rate: args.loan_rate,
        schedule: false,
    })?;
    let investment = investment_input(&InvestArgs {
        initial: args.initial_investment,
        monthly: args.monthly_contribution,
        years: args.investment_years,
        annual_return: form::DEFAULT_ANNUAL_RETURN,
        inflation: form::DEFAULT_ANNUAL_INFLATION,
    })?;

    let sections = ReportSections::compute(
        Some(&budget),
        Some(&savings),
        Some(&loan),
        Some(&investment),
    )?;
    Ok(render_report(&sections, chrono::Local::now().date_naive()))
}

fn write_budget(out: &mut String, result: &BudgetResult) -> std::fmt::Result {
    writeln!(out, "Total Income: {}", format_currency(result.income))?;
    writeln!(
        out,
        "Total Expenses: {}",
        format_currency(result.total_expenses)
    )?;
    writeln!(
        out,
        "Remaining Balance: {}",
        format_currency(result.balance)
    )?;

    let distribution = result.distribution();
    if distribution.is_empty() {
        return writeln!(out, "No expenses entered yet!");
    }
    writeln!(out, "\nExpense Distribution:")?;
    for share in distribution {
        writeln!(
            out,
            "  {:<28} {:>14} {:>6.1}%",
            share.category,
            format_currency(share.amount),
            share.percent_of_total
        )?;
    }
    Ok(())
}

fn write_savings(out: &mut String, projection: &SavingsProjection) -> std::fmt::Result {
    if projection.is_already_met() {
        return writeln!(out, "You've already reached your savings goal!");
    }
    writeln!(
        out,
        "Time to reach goal: {} years and {} months (~{} months total)",
        projection.years, projection.remainder_months, projection.months_to_goal
    )?;
    writeln!(
        out,
        "Projected savings after {} months: {} (in today's dollars)",
        projection.months_to_goal,
        format_currency(projection.final_amount)
    )
}

fn write_loan(out: &mut String, result: &LoanResult) -> std::fmt::Result {
    writeln!(out, "Monthly Payment (EMI): {}", format_currency(result.emi))?;
    writeln!(
        out,
        "Total Interest: {}",
        format_currency(result.total_interest)
    )?;
    writeln!(
        out,
        "Total Payment: {}",
        format_currency(result.total_payment)
    )?;
    if let Some(schedule) = &result.schedule {
        writeln!(
            out,
            "\n{:>5} {:>14} {:>14} {:>16}",
            "Month", "Principal", "Interest", "Balance"
        )?;
        for row in schedule {
            writeln!(
                out,
                "{:>5} {:>14} {:>14} {:>16}",
                row.month,
                format_currency(row.principal_portion),
                format_currency(row.interest_portion),
                format_currency(row.remaining_balance)
            )?;
        }
    }
    Ok(())
}

fn write_investment(out: &mut String, projection: &InvestmentProjection) -> std::fmt::Result {
    let summary = &projection.summary;
    let years = projection.series.len().saturating_sub(1) / 12;
    writeln!(out, "After {years} years, your investment could grow to:")?;
    writeln!(
        out,
        "  Nominal Value: {}",
        format_currency(summary.final_nominal)
    )?;
    writeln!(
        out,
        "  Inflation-Adjusted Value: {}",
        format_currency(summary.final_real)
    )?;
    writeln!(
        out,
        "Total contributions: {}",
        format_currency(summary.total_contributions)
    )?;
    writeln!(
        out,
        "Nominal growth: {}",
        format_currency(summary.nominal_growth)
    )?;
    writeln!(
        out,
        "Real growth (after inflation): {}",
        format_currency(summary.real_growth)
    )
}
