use super::types::{BudgetInput, BudgetResult, ExpenseShare};

/// Totals the expense categories and derives the remaining balance.
///
/// Never fails: negative amounts are summed as given.
pub fn summarize_budget(input: &BudgetInput) -> BudgetResult {
    let total_expenses: f64 = input.expenses.values().sum();
    let balance = input.income - total_expenses;

    tracing::debug!(
        income = input.income,
        total_expenses,
        balance,
        categories = input.expenses.len(),
        "budget summarized"
    );

    BudgetResult {
        income: input.income,
        total_expenses,
        balance,
        expenses: input.expenses.clone(),
    }
}

impl BudgetResult {
    pub fn is_deficit(&self) -> bool {
        self.balance < 0.0
    }

    /// Categories with spending, each with its share of total expenses.
    ///
    /// Zero-valued categories are left out; an empty vector means nothing
    /// has been spent.
    pub fn distribution(&self) -> Vec<ExpenseShare> {
        let spent: Vec<(&String, f64)> = self
            .expenses
            .iter()
            .filter(|(_, amount)| **amount > 0.0)
            .map(|(name, amount)| (name, *amount))
            .collect();
        let spent_total: f64 = spent.iter().map(|(_, amount)| amount).sum();

        spent
            .into_iter()
            .map(|(name, amount)| ExpenseShare {
                category: name.clone(),
                amount,
                percent_of_total: if spent_total > 0.0 {
                    amount / spent_total * 100.0
                } else {
                    0.0
                },
            })
            .collect()
    }
}
