use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::SecondsFormat;

use crate::models::Expense;

const HEADER: [&str; 3] = ["description", "amount", "created_at"];

/// Write expenses as CSV with a header row. Amounts are plain decimals
/// (`1500.00`) at their stored precision so spreadsheets read them as numbers.
pub(crate) fn write_expenses<W: io::Write>(out: W, expenses: &[Expense]) -> Result<usize> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(HEADER)?;
    for expense in expenses {
        let amount = expense.amount.to_string();
        let created_at = expense.created_at.to_rfc3339_opts(SecondsFormat::Secs, true);
        writer.write_record([expense.description.as_str(), &amount, &created_at])?;
    }
    writer.flush()?;
    Ok(expenses.len())
}

pub(crate) fn export_expenses(path: &Path, expenses: &[Expense]) -> Result<usize> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    let count = write_expenses(file, expenses)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), count, "expenses exported");
    Ok(count)
}

/// Expand a leading `~/` to `$HOME`.
pub(crate) fn expand_home(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}

/// `$HOME/weddingtui-expenses.csv`
pub(crate) fn default_export_path() -> String {
    expand_home("~/weddingtui-expenses.csv")
}

#[cfg(test)]
#[path = "export_tests.rs"]
mod export_tests;
