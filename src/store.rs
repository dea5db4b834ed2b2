use rust_decimal::Decimal;

use crate::error::Result;
use crate::models::{
    Expense, NewExpense, NewQuote, NewTask, Quote, QuoteStatus, Task, TaskQuery, TaskUpdate,
};

/// Persistence backend for tasks, quotes and expenses.
///
/// Inputs arrive already validated. The store assigns identifiers and
/// timestamps, enforces that quotes reference an existing task, and removes a
/// task's quotes together with the task. Every call reads current state;
/// implementations must not cache results between calls. A failed mutation
/// leaves no partial changes behind.
pub(crate) trait RecordStore {
    fn insert_task(&mut self, task: &NewTask) -> Result<Task>;

    fn get_task(&self, id: i64) -> Result<Option<Task>>;

    fn list_tasks(&self, query: &TaskQuery) -> Result<Vec<Task>>;

    /// Fails with `NotFound` when no task has `id`.
    fn update_task(&mut self, id: i64, update: &TaskUpdate) -> Result<Task>;

    /// Deletes the task and its quotes. Returns how many quotes went with it.
    fn delete_task(&mut self, id: i64) -> Result<usize>;

    fn insert_quote(&mut self, quote: &NewQuote) -> Result<Quote>;

    /// Quotes for one task, cheapest first. `NotFound` if the task does not exist.
    fn list_quotes_for_task(&self, task_id: i64) -> Result<Vec<Quote>>;

    fn set_quote_status(&mut self, id: i64, status: QuoteStatus) -> Result<Quote>;

    fn insert_expense(&mut self, expense: &NewExpense) -> Result<Expense>;

    /// Newest first.
    fn list_expenses(&self) -> Result<Vec<Expense>>;

    fn count_expenses(&self) -> Result<usize>;

    /// Exact sum of all expense amounts, zero when there are none.
    fn sum_expenses(&self) -> Result<Decimal>;

    fn budget_total(&self) -> Result<Option<Decimal>>;

    /// `None` clears the budget.
    fn set_budget_total(&mut self, amount: Option<Decimal>) -> Result<()>;
}
