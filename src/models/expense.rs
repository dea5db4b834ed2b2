use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::{ensure_non_negative, required_text};
use crate::error::Result;

#[derive(Debug, Clone)]
pub(crate) struct Expense {
    pub(crate) id: i64,
    pub(crate) description: String,
    pub(crate) amount: Decimal,
    pub(crate) created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub(crate) struct NewExpense {
    description: String,
    amount: Decimal,
}

impl NewExpense {
    pub(crate) fn new(description: &str, amount: Decimal) -> Result<Self> {
        Ok(Self {
            description: required_text("Description", description)?,
            amount: ensure_non_negative("Amount", amount)?,
        })
    }

    pub(crate) fn description(&self) -> &str {
        &self.description
    }

    pub(crate) fn amount(&self) -> Decimal {
        self.amount
    }
}
