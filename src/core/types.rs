use std::collections::BTreeMap;

use serde::Serialize;

/// Expense categories offered by the budget form, in display order.
pub const DEFAULT_EXPENSE_CATEGORIES: [&str; 9] = [
    "Housing (Rent/Mortgage)",
    "Utilities",
    "Food/Groceries",
    "Transportation",
    "Entertainment",
    "Healthcare",
    "Debt Payments",
    "Savings",
    "Other",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetInput {
    pub income: f64,
    pub expenses: BTreeMap<String, f64>,
}

impl BudgetInput {
    pub fn new(income: f64) -> Self {
        Self {
            income,
            expenses: BTreeMap::new(),
        }
    }

    /// Budget with every default category present at zero.
    pub fn with_default_categories(income: f64) -> Self {
        let expenses = DEFAULT_EXPENSE_CATEGORIES
            .iter()
            .map(|name| (name.to_string(), 0.0))
            .collect();
        Self { income, expenses }
    }

    /// Sets (or replaces) the amount for one category.
    pub fn set_expense(&mut self, category: impl Into<String>, amount: f64) -> &mut Self {
        self.expenses.insert(category.into(), amount);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetResult {
    pub income: f64,
    pub total_expenses: f64,
    pub balance: f64,
    pub expenses: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseShare {
    pub category: String,
    pub amount: f64,
    pub percent_of_total: f64,
}

/// Rates are percentages: 3.5 means 3.5 % a year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsGoalInput {
    pub goal_amount: f64,
    pub monthly_savings: f64,
    pub current_savings: f64,
    pub annual_interest_rate: f64,
    pub annual_inflation_rate: f64,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum GoalStatus {
    AlreadyMet,
    Projected,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsPoint {
    pub month: u32,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsProjection {
    pub status: GoalStatus,
    pub months_to_goal: u32,
    pub years: u32,
    pub remainder_months: u32,
    pub monthly_real_rate: f64,
    pub final_amount: f64,
    pub series: Vec<SavingsPoint>,
}

impl SavingsProjection {
    pub fn is_already_met(&self) -> bool {
        self.status == GoalStatus::AlreadyMet
    }
}

/// `annual_interest_rate` is a percentage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanInput {
    pub principal: f64,
    pub annual_interest_rate: f64,
    pub total_tenure_months: u32,
}

impl LoanInput {
    /// Tenure given as whole years plus extra months, the way loan forms ask for it.
    pub fn from_years_months(
        principal: f64,
        annual_interest_rate: f64,
        years: u32,
        months: u32,
    ) -> Self {
        Self {
            principal,
            annual_interest_rate,
            total_tenure_months: years.saturating_mul(12).saturating_add(months),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AmortizationRow {
    pub month: u32,
    pub principal_portion: f64,
    pub interest_portion: f64,
    pub remaining_balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanResult {
    pub emi: f64,
    pub total_payment: f64,
    pub total_interest: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Vec<AmortizationRow>>,
}

/// `annual_return` and `annual_inflation` are percentages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentInput {
    pub initial_investment: f64,
    pub monthly_contribution: f64,
    pub years: u32,
    pub annual_return: f64,
    pub annual_inflation: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentPoint {
    pub month: u32,
    pub nominal_value: f64,
    pub real_value: f64,
    pub cumulative_contributions: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentSummary {
    pub final_nominal: f64,
    pub final_real: f64,
    pub total_contributions: f64,
    pub nominal_growth: f64,
    pub real_growth: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentProjection {
    pub summary: InvestmentSummary,
    pub series: Vec<InvestmentPoint>,
}
