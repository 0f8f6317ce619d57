mod budget;
mod error;
mod investment;
mod loan;
pub mod rates;
mod savings;
mod types;

pub use budget::summarize_budget;
pub use error::{CalcError, MAX_PROJECTION_MONTHS};
pub use investment::simulate_investment;
pub use loan::{BALANCE_TOLERANCE, compute_loan};
pub use savings::solve_savings_goal;
pub use types::{
    AmortizationRow, BudgetInput, BudgetResult, DEFAULT_EXPENSE_CATEGORIES, ExpenseShare,
    GoalStatus, InvestmentInput, InvestmentPoint, InvestmentProjection, InvestmentSummary,
    LoanInput, LoanResult, SavingsGoalInput, SavingsPoint, SavingsProjection,
};
