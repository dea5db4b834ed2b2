//! User actions: raw form input in, validated records out.

use rust_decimal::Decimal;
use tracing::{debug, error, info, warn};

use crate::currency::parse_brl;
use crate::error::{Error, Result};
use crate::models::*;
use crate::store::RecordStore;

/// Raw values from the task form. `estimate` is the text as typed (`"1.500,00"`).
#[derive(Debug, Clone, Default)]
pub(crate) struct TaskForm {
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) priority: i64,
    pub(crate) estimate: String,
}

impl TaskForm {
    pub(crate) fn new(name: &str, description: &str, priority: i64) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            priority,
            estimate: String::new(),
        }
    }

    pub(crate) fn with_estimate(mut self, estimate: &str) -> Self {
        self.estimate = estimate.to_string();
        self
    }
}

/// Runs one store operation per user action. The store is handed in at
/// construction; nothing is cached between calls.
pub(crate) struct Planner<S> {
    store: S,
}

impl<S: RecordStore> Planner<S> {
    pub(crate) fn new(store: S) -> Self {
        Self { store }
    }

    // ── Tasks ─────────────────────────────────────────────────

    pub(crate) fn create_task(&mut self, form: &TaskForm) -> Result<Task> {
        let result = parse_brl(&form.estimate)
            .and_then(|estimate| {
                NewTask::new(&form.name, &form.description, form.priority, estimate)
            })
            .and_then(|task| self.store.insert_task(&task));
        let task = report("create task", result)?;
        info!(task_id = task.id, name = %task.name, priority = task.priority, "task created");
        Ok(task)
    }

    pub(crate) fn list_tasks(&self, query: &TaskQuery) -> Result<Vec<Task>> {
        report("list tasks", self.store.list_tasks(query))
    }

    pub(crate) fn get_task(&self, id: i64) -> Result<Task> {
        let result = self
            .store
            .get_task(id)
            .and_then(|task| task.ok_or_else(|| Error::task_not_found(id)));
        report("get task", result)
    }

    pub(crate) fn update_task(&mut self, id: i64, form: &TaskForm, status: TaskStatus) -> Result<Task> {
        let result = parse_brl(&form.estimate)
            .and_then(|estimate| {
                TaskUpdate::new(&form.name, &form.description, form.priority, status, estimate)
            })
            .and_then(|update| self.store.update_task(id, &update));
        let task = report("update task", result)?;
        info!(task_id = id, status = %task.status, "task updated");
        Ok(task)
    }

    pub(crate) fn set_task_status(&mut self, id: i64, status: TaskStatus) -> Result<Task> {
        let result = self
            .store
            .get_task(id)
            .and_then(|task| task.ok_or_else(|| Error::task_not_found(id)))
            .and_then(|task| {
                let update = TaskUpdate::from_task(&task).with_status(status);
                self.store.update_task(id, &update)
            });
        let task = report("set task status", result)?;
        info!(task_id = id, status = %task.status, "task status changed");
        Ok(task)
    }

    /// Deletes a task together with its quotes. Returns how many quotes were removed.
    pub(crate) fn delete_task(&mut self, id: i64) -> Result<usize> {
        let removed = report("delete task", self.store.delete_task(id))?;
        info!(task_id = id, quotes_removed = removed, "task deleted");
        Ok(removed)
    }

    // ── Quotes ────────────────────────────────────────────────

    pub(crate) fn create_quote(
        &mut self,
        task_id: i64,
        vendor: &str,
        description: &str,
        amount: &str,
    ) -> Result<Quote> {
        let result = parse_brl(amount)
            .and_then(|amount| NewQuote::new(task_id, vendor, description, amount))
            .and_then(|quote| self.store.insert_quote(&quote));
        let quote = report("create quote", result)?;
        info!(quote_id = quote.id, task_id, vendor = %quote.vendor, amount = %quote.amount, "quote created");
        Ok(quote)
    }

    pub(crate) fn list_quotes_for_task(&self, task_id: i64) -> Result<Vec<Quote>> {
        let quotes = report("list quotes", self.store.list_quotes_for_task(task_id))?;
        debug!(task_id, count = quotes.len(), "listed quotes");
        Ok(quotes)
    }

    pub(crate) fn set_quote_status(&mut self, id: i64, status: QuoteStatus) -> Result<Quote> {
        let quote = report("set quote status", self.store.set_quote_status(id, status))?;
        info!(quote_id = id, status = %quote.status, "quote status changed");
        Ok(quote)
    }

    // ── Expenses ──────────────────────────────────────────────

    pub(crate) fn create_expense(&mut self, description: &str, amount: &str) -> Result<Expense> {
        let result = parse_brl(amount)
            .and_then(|amount| NewExpense::new(description, amount))
            .and_then(|expense| self.store.insert_expense(&expense));
        let expense = report("create expense", result)?;
        info!(expense_id = expense.id, amount = %expense.amount, "expense recorded");
        Ok(expense)
    }

    pub(crate) fn list_expenses(&self) -> Result<Vec<Expense>> {
        report("list expenses", self.store.list_expenses())
    }

    pub(crate) fn sum_expenses(&self) -> Result<Decimal> {
        report("sum expenses", self.store.sum_expenses())
    }

    // ── Budget ────────────────────────────────────────────────

    pub(crate) fn set_budget(&mut self, amount: &str) -> Result<Decimal> {
        let result = parse_brl(amount)
            .and_then(|amount| ensure_non_negative("Budget", amount))
            .and_then(|amount| self.store.set_budget_total(Some(amount)).map(|()| amount));
        let budget = report("set budget", result)?;
        info!(budget = %budget, "wedding budget set");
        Ok(budget)
    }

    pub(crate) fn clear_budget(&mut self) -> Result<()> {
        report("clear budget", self.store.set_budget_total(None))?;
        info!("wedding budget cleared");
        Ok(())
    }

    pub(crate) fn financial_summary(&self) -> Result<FinancialSummary> {
        report("financial summary", self.read_summary())
    }

    fn read_summary(&self) -> Result<FinancialSummary> {
        Ok(FinancialSummary {
            total_spent: self.store.sum_expenses()?,
            expense_count: self.store.count_expenses()?,
            budget: self.store.budget_total()?,
        })
    }
}

/// Log a failed action at a level matching its cause and pass the result through.
fn report<T>(action: &'static str, result: Result<T>) -> Result<T> {
    if let Err(e) = &result {
        match e {
            Error::Store(_) => error!(action, error = %e, "store failure"),
            _ => warn!(action, error = %e, "request rejected"),
        }
    }
    result
}
