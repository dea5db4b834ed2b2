use rust_decimal::Decimal;

/// Totals shown on the finance screen and by `weddingtui summary`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct FinancialSummary {
    /// Exact sum of every recorded expense.
    pub(crate) total_spent: Decimal,
    pub(crate) expense_count: usize,
    /// Overall wedding budget, if one has been set.
    pub(crate) budget: Option<Decimal>,
}

impl FinancialSummary {
    /// What is left of the budget. Negative when overspent.
    pub(crate) fn balance(&self) -> Option<Decimal> {
        self.budget.map(|b| b - self.total_spent)
    }

    pub(crate) fn is_over_budget(&self) -> bool {
        self.balance().is_some_and(|b| b < Decimal::ZERO)
    }
}
