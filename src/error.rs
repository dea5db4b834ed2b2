/// Failures surfaced by the planner and the record store.
///
/// Every variant is recoverable: the display layer shows the message and lets
/// the user retry with corrected input.
#[derive(Debug, thiserror::Error)]
pub(crate) enum Error {
    #[error("Invalid amount format: '{raw}' (use numbers like 1.500,00)")]
    InvalidAmountFormat { raw: String },
    #[error("{0}")]
    Validation(String),
    #[error("{entity} #{id} not found")]
    NotFound { entity: &'static str, id: i64 },
    #[error("Store error: {0}")]
    Store(#[from] rusqlite::Error),
}

impl Error {
    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub(crate) fn task_not_found(id: i64) -> Self {
        Self::NotFound { entity: "Task", id }
    }

    pub(crate) fn quote_not_found(id: i64) -> Self {
        Self::NotFound { entity: "Quote", id }
    }
}

pub(crate) type Result<T, E = Error> = std::result::Result<T, E>;
