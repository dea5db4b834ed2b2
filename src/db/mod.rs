mod columns;
mod schema;

use anyhow::Context;
use chrono::{SubsecRound, Utc};
use rusqlite::{params, Connection, Row};
use rust_decimal::Decimal;
use std::path::Path;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::models::*;
use crate::store::RecordStore;
use columns::{decimal_at, timestamp_at, timestamp_text};

const TASK_COLUMNS: &str = "id, name, description, priority, status, estimate, created_at";
const QUOTE_COLUMNS: &str = "id, task_id, vendor, description, amount, status, created_at";
const EXPENSE_COLUMNS: &str = "id, description, amount, created_at";

pub(crate) struct Database {
    conn: Connection,
}

impl Database {
    pub(crate) fn open(path: &Path) -> anyhow::Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .context("Failed to set database pragmas")?;
        let mut db = Self { conn };
        db.migrate().context("Database migration failed")?;
        info!(path = %path.display(), "database ready");
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        let mut db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Bring the schema up to date. Safe to run on every start: the base
    /// schema is created only if missing and migrations are additive.
    fn migrate(&mut self) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute_batch(schema::SCHEMA_V1)?;
        tx.execute(
            "INSERT INTO schema_version (version)
             SELECT 1 WHERE NOT EXISTS (SELECT 1 FROM schema_version)",
            [],
        )?;

        let current: i32 =
            tx.query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })?;

        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                tx.execute_batch(sql)?;
                debug!(from_version, "applied migration");
            }
        }

        if current < schema::CURRENT_VERSION {
            tx.execute(
                "UPDATE schema_version SET version = ?1",
                params![schema::CURRENT_VERSION],
            )?;
            info!(
                from = current,
                to = schema::CURRENT_VERSION,
                "schema upgraded"
            );
        }

        tx.commit()?;
        Ok(())
    }

    fn task_exists(&self, id: i64) -> Result<bool> {
        Ok(self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM tasks WHERE id = ?1)",
            params![id],
            |row| row.get(0),
        )?)
    }

    fn get_quote(&self, id: i64) -> Result<Option<Quote>> {
        let result = self.conn.query_row(
            &format!("SELECT {QUOTE_COLUMNS} FROM quotes WHERE id = ?1"),
            params![id],
            quote_from_row,
        );
        match result {
            Ok(q) => Ok(Some(q)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

impl RecordStore for Database {
    // ── Tasks ─────────────────────────────────────────────────

    fn insert_task(&mut self, task: &NewTask) -> Result<Task> {
        let created_at = Utc::now().trunc_subsecs(6);
        self.conn.execute(
            "INSERT INTO tasks (name, description, priority, status, estimate, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                task.name(),
                task.description(),
                task.priority(),
                task.status(),
                task.estimate().to_string(),
                timestamp_text(&created_at),
            ],
        )?;
        Ok(Task {
            id: self.conn.last_insert_rowid(),
            name: task.name().to_string(),
            description: task.description().to_string(),
            priority: task.priority(),
            status: task.status(),
            estimate: task.estimate(),
            created_at,
        })
    }

    fn get_task(&self, id: i64) -> Result<Option<Task>> {
        let result = self.conn.query_row(
            &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"),
            params![id],
            task_from_row,
        );
        match result {
            Ok(t) => Ok(Some(t)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn list_tasks(&self, query: &TaskQuery) -> Result<Vec<Task>> {
        let mut sql = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE 1=1");
        let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

        if let Some(status) = query.status {
            sql.push_str(&format!(" AND status = ?{}", param_values.len() + 1));
            param_values.push(Box::new(status));
        }

        sql.push_str(match query.order {
            TaskOrder::Newest => " ORDER BY created_at DESC, id DESC",
            TaskOrder::Priority => " ORDER BY priority DESC, created_at DESC, id DESC",
        });

        let params_ref: Vec<&dyn rusqlite::types::ToSql> =
            param_values.iter().map(|p| p.as_ref()).collect();

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_ref.as_slice(), task_from_row)?;
        let tasks = rows.collect::<std::result::Result<Vec<_>, _>>()?;
        debug!(count = tasks.len(), order = %query.order, "listed tasks");
        Ok(tasks)
    }

    fn update_task(&mut self, id: i64, update: &TaskUpdate) -> Result<Task> {
        let changed = self.conn.execute(
            "UPDATE tasks SET name = ?1, description = ?2, priority = ?3, status = ?4, estimate = ?5
             WHERE id = ?6",
            params![
                update.name(),
                update.description(),
                update.priority(),
                update.status(),
                update.estimate().to_string(),
                id,
            ],
        )?;
        if changed == 0 {
            return Err(Error::task_not_found(id));
        }
        self.get_task(id)?.ok_or_else(|| Error::task_not_found(id))
    }

    fn delete_task(&mut self, id: i64) -> Result<usize> {
        let tx = self.conn.transaction()?;
        // Children first so the foreign key never sees an orphan.
        let quotes_removed = tx.execute("DELETE FROM quotes WHERE task_id = ?1", params![id])?;
        let tasks_removed = tx.execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
        if tasks_removed == 0 {
            // Dropping the transaction rolls it back.
            return Err(Error::task_not_found(id));
        }
        tx.commit()?;
        Ok(quotes_removed)
    }

    // ── Quotes ────────────────────────────────────────────────

    fn insert_quote(&mut self, quote: &NewQuote) -> Result<Quote> {
        let created_at = Utc::now().trunc_subsecs(6);
        let tx = self.conn.transaction()?;
        let task_exists: bool = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM tasks WHERE id = ?1)",
            params![quote.task_id()],
            |row| row.get(0),
        )?;
        if !task_exists {
            return Err(Error::task_not_found(quote.task_id()));
        }
        tx.execute(
            "INSERT INTO quotes (task_id, vendor, description, amount, status, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                quote.task_id(),
                quote.vendor(),
                quote.description(),
                quote.amount().to_string(),
                quote.status(),
                timestamp_text(&created_at),
            ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        Ok(Quote {
            id,
            task_id: quote.task_id(),
            vendor: quote.vendor().to_string(),
            description: quote.description().to_string(),
            amount: quote.amount(),
            status: quote.status(),
            created_at,
        })
    }

    fn list_quotes_for_task(&self, task_id: i64) -> Result<Vec<Quote>> {
        if !self.task_exists(task_id)? {
            return Err(Error::task_not_found(task_id));
        }
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {QUOTE_COLUMNS} FROM quotes WHERE task_id = ?1"
        ))?;
        let rows = stmt.query_map(params![task_id], quote_from_row)?;
        let mut quotes = rows.collect::<std::result::Result<Vec<_>, _>>()?;
        // Amounts are text in SQLite, so order them as decimals here.
        quotes.sort_by(|a, b| a.amount.cmp(&b.amount).then(a.id.cmp(&b.id)));
        Ok(quotes)
    }

    fn set_quote_status(&mut self, id: i64, status: QuoteStatus) -> Result<Quote> {
        let changed = self.conn.execute(
            "UPDATE quotes SET status = ?1 WHERE id = ?2",
            params![status, id],
        )?;
        if changed == 0 {
            return Err(Error::quote_not_found(id));
        }
        self.get_quote(id)?.ok_or_else(|| Error::quote_not_found(id))
    }

    // ── Expenses ──────────────────────────────────────────────

    fn insert_expense(&mut self, expense: &NewExpense) -> Result<Expense> {
        let created_at = Utc::now().trunc_subsecs(6);
        self.conn.execute(
            "INSERT INTO expenses (description, amount, created_at) VALUES (?1, ?2, ?3)",
            params![
                expense.description(),
                expense.amount().to_string(),
                timestamp_text(&created_at),
            ],
        )?;
        Ok(Expense {
            id: self.conn.last_insert_rowid(),
            description: expense.description().to_string(),
            amount: expense.amount(),
            created_at,
        })
    }

    fn list_expenses(&self) -> Result<Vec<Expense>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {EXPENSE_COLUMNS} FROM expenses ORDER BY created_at DESC, id DESC"
        ))?;
        let rows = stmt.query_map([], expense_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    fn count_expenses(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM expenses", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    fn sum_expenses(&self) -> Result<Decimal> {
        // SQLite's SUM would go through REAL; add the decimals ourselves.
        let mut stmt = self.conn.prepare("SELECT amount FROM expenses")?;
        let rows = stmt.query_map([], |row| decimal_at(row, 0))?;
        let mut total = Decimal::ZERO;
        for amount in rows {
            total += amount?;
        }
        Ok(total)
    }

    // ── Settings ──────────────────────────────────────────────

    fn budget_total(&self) -> Result<Option<Decimal>> {
        let result = self.conn.query_row(
            "SELECT value FROM settings WHERE key = ?1",
            params![schema::BUDGET_TOTAL_KEY],
            |row| decimal_at(row, 0),
        );
        match result {
            Ok(amount) => Ok(Some(amount)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_budget_total(&mut self, amount: Option<Decimal>) -> Result<()> {
        match amount {
            Some(amount) => {
                self.conn.execute(
                    "INSERT INTO settings (key, value) VALUES (?1, ?2)
                     ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                    params![schema::BUDGET_TOTAL_KEY, amount.to_string()],
                )?;
            }
            None => {
                self.conn.execute(
                    "DELETE FROM settings WHERE key = ?1",
                    params![schema::BUDGET_TOTAL_KEY],
                )?;
            }
        }
        Ok(())
    }
}

// ── Row mappers ───────────────────────────────────────────────

fn task_from_row(row: &Row<'_>) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        priority: row.get(3)?,
        status: row.get(4)?,
        estimate: decimal_at(row, 5)?,
        created_at: timestamp_at(row, 6)?,
    })
}

fn quote_from_row(row: &Row<'_>) -> rusqlite::Result<Quote> {
    Ok(Quote {
        id: row.get(0)?,
        task_id: row.get(1)?,
        vendor: row.get(2)?,
        description: row.get(3)?,
        amount: decimal_at(row, 4)?,
        status: row.get(5)?,
        created_at: timestamp_at(row, 6)?,
    })
}

fn expense_from_row(row: &Row<'_>) -> rusqlite::Result<Expense> {
    Ok(Expense {
        id: row.get(0)?,
        description: row.get(1)?,
        amount: decimal_at(row, 2)?,
        created_at: timestamp_at(row, 3)?,
    })
}

#[cfg(test)]
mod tests;
