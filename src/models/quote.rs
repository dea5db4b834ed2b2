use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::{ensure_non_negative, required_text};
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum QuoteStatus {
    UnderReview,
    Approved,
    Rejected,
}

impl QuoteStatus {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::UnderReview => "UnderReview",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
        }
    }

    pub(crate) fn label(&self) -> &'static str {
        match self {
            Self::UnderReview => "Under Review",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
        }
    }

    pub(crate) fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "underreview" | "under review" | "under-review" | "review" | "em análise"
            | "em analise" => Some(Self::UnderReview),
            "approved" | "approve" | "aprovado" => Some(Self::Approved),
            "rejected" | "reject" | "rejeitado" => Some(Self::Rejected),
            _ => None,
        }
    }

    pub(crate) fn all() -> &'static [QuoteStatus] {
        &[Self::UnderReview, Self::Approved, Self::Rejected]
    }
}

impl std::fmt::Display for QuoteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Quote {
    pub(crate) id: i64,
    pub(crate) task_id: i64,
    pub(crate) vendor: String,
    pub(crate) description: String,
    pub(crate) amount: Decimal,
    pub(crate) status: QuoteStatus,
    pub(crate) created_at: DateTime<Utc>,
}

/// A validated vendor quote. Whether `task_id` exists is checked by the store.
#[derive(Debug, Clone)]
pub(crate) struct NewQuote {
    task_id: i64,
    vendor: String,
    description: String,
    amount: Decimal,
}

impl NewQuote {
    pub(crate) fn new(task_id: i64, vendor: &str, description: &str, amount: Decimal) -> Result<Self> {
        Ok(Self {
            task_id,
            vendor: required_text("Vendor", vendor)?,
            description: description.trim().to_string(),
            amount: ensure_non_negative("Amount", amount)?,
        })
    }

    pub(crate) fn task_id(&self) -> i64 {
        self.task_id
    }

    pub(crate) fn vendor(&self) -> &str {
        &self.vendor
    }

    pub(crate) fn description(&self) -> &str {
        &self.description
    }

    pub(crate) fn amount(&self) -> Decimal {
        self.amount
    }

    pub(crate) fn status(&self) -> QuoteStatus {
        QuoteStatus::UnderReview
    }
}
