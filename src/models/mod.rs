mod expense;
mod quote;
mod summary;
mod task;

use rust_decimal::Decimal;

use crate::error::{Error, Result};

pub(crate) use expense::{Expense, NewExpense};
pub(crate) use quote::{NewQuote, Quote, QuoteStatus};
pub(crate) use summary::FinancialSummary;
pub(crate) use task::{
    NewTask, Task, TaskOrder, TaskQuery, TaskStatus, TaskUpdate, FIELD_SEPARATOR, MAX_PRIORITY,
    MIN_PRIORITY,
};

/// Trimmed, non-empty text or a validation error naming `field`.
pub(crate) fn required_text(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn ensure_non_negative(field: &str, amount: Decimal) -> Result<Decimal> {
    if amount < Decimal::ZERO {
        return Err(Error::validation(format!("{field} cannot be negative")));
    }
    Ok(amount)
}
