#![allow(clippy::unwrap_used)]

use super::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn new_task(name: &str, priority: i64) -> NewTask {
    NewTask::new(name, &format!("{name} details"), priority, Decimal::ZERO).unwrap()
}

fn add_task(db: &mut Database, name: &str, priority: i64) -> Task {
    db.insert_task(&new_task(name, priority)).unwrap()
}

fn add_quote(db: &mut Database, task_id: i64, vendor: &str, amount: Decimal) -> Quote {
    let quote = NewQuote::new(task_id, vendor, "", amount).unwrap();
    db.insert_quote(&quote).unwrap()
}

fn add_expense(db: &mut Database, description: &str, amount: Decimal) -> Expense {
    let expense = NewExpense::new(description, amount).unwrap();
    db.insert_expense(&expense).unwrap()
}

// ── Tasks ─────────────────────────────────────────────────────

#[test]
fn test_task_insert_defaults() {
    let mut db = Database::open_in_memory().unwrap();
    let task = db
        .insert_task(&NewTask::new("Venue", "Book venue", 5, dec!(12000.00)).unwrap())
        .unwrap();
    assert!(task.id > 0);
    assert_eq!(task.status, TaskStatus::Pending);
    assert_eq!(task.estimate, dec!(12000.00));

    let fetched = db.get_task(task.id).unwrap().unwrap();
    assert_eq!(fetched.name, "Venue");
    assert_eq!(fetched.description, "Book venue");
    assert_eq!(fetched.priority, 5);
    assert_eq!(fetched.status, TaskStatus::Pending);
    assert_eq!(fetched.created_at, task.created_at);
}

#[test]
fn test_task_ids_unique() {
    let mut db = Database::open_in_memory().unwrap();
    let a = add_task(&mut db, "Venue", 5);
    let b = add_task(&mut db, "Cake", 2);
    assert_ne!(a.id, b.id);
}

#[test]
fn test_task_by_id_not_found() {
    let db = Database::open_in_memory().unwrap();
    assert!(db.get_task(99999).unwrap().is_none());
}

#[test]
fn test_tasks_newest_first() {
    let mut db = Database::open_in_memory().unwrap();
    let first = add_task(&mut db, "Venue", 5);
    let second = add_task(&mut db, "Cake", 2);
    let third = add_task(&mut db, "Music", 4);

    let tasks = db.list_tasks(&TaskQuery::default()).unwrap();
    let ids: Vec<i64> = tasks.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![third.id, second.id, first.id]);
}

#[test]
fn test_tasks_by_priority() {
    let mut db = Database::open_in_memory().unwrap();
    add_task(&mut db, "Cake", 2);
    add_task(&mut db, "Venue", 5);
    add_task(&mut db, "Music", 4);
    add_task(&mut db, "Favors", 2);

    let query = TaskQuery {
        status: None,
        order: TaskOrder::Priority,
    };
    let names: Vec<String> = db
        .list_tasks(&query)
        .unwrap()
        .into_iter()
        .map(|t| t.name)
        .collect();
    // Equal priorities fall back to newest first
    assert_eq!(names, vec!["Venue", "Music", "Favors", "Cake"]);
}

#[test]
fn test_tasks_empty() {
    let db = Database::open_in_memory().unwrap();
    assert!(db.list_tasks(&TaskQuery::default()).unwrap().is_empty());
}

#[test]
fn test_tasks_status_filter() {
    let mut db = Database::open_in_memory().unwrap();
    let venue = add_task(&mut db, "Venue", 5);
    add_task(&mut db, "Cake", 2);

    let update = TaskUpdate::from_task(&venue).with_status(TaskStatus::Done);
    db.update_task(venue.id, &update).unwrap();

    let done = db
        .list_tasks(&TaskQuery::with_status(TaskStatus::Done))
        .unwrap();
    assert_eq!(done.len(), 1);
    assert_eq!(done[0].name, "Venue");

    let pending = db
        .list_tasks(&TaskQuery::with_status(TaskStatus::Pending))
        .unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].name, "Cake");

    let in_progress = db
        .list_tasks(&TaskQuery::with_status(TaskStatus::InProgress))
        .unwrap();
    assert!(in_progress.is_empty());
}

#[test]
fn test_task_update() {
    let mut db = Database::open_in_memory().unwrap();
    let task = add_task(&mut db, "Flowers", 3);

    let update = TaskUpdate::new(
        "Flowers & decor",
        "Roses and centerpieces",
        4,
        TaskStatus::InProgress,
        dec!(2500.00),
    )
    .unwrap();
    let updated = db.update_task(task.id, &update).unwrap();

    assert_eq!(updated.id, task.id);
    assert_eq!(updated.name, "Flowers & decor");
    assert_eq!(updated.description, "Roses and centerpieces");
    assert_eq!(updated.priority, 4);
    assert_eq!(updated.status, TaskStatus::InProgress);
    assert_eq!(updated.estimate, dec!(2500.00));
    assert_eq!(updated.created_at, task.created_at);
}

#[test]
fn test_task_update_not_found() {
    let mut db = Database::open_in_memory().unwrap();
    let update = TaskUpdate::new("X", "Y", 1, TaskStatus::Done, Decimal::ZERO).unwrap();
    assert!(matches!(
        db.update_task(42, &update),
        Err(Error::NotFound { entity: "Task", id: 42 })
    ));
}

// ── Cascade delete ────────────────────────────────────────────

#[test]
fn test_delete_task_cascades_quotes() {
    let mut db = Database::open_in_memory().unwrap();
    let task = add_task(&mut db, "Venue", 5);
    let other = add_task(&mut db, "Cake", 2);
    add_quote(&mut db, task.id, "Acme Hall", dec!(5000.00));
    add_quote(&mut db, task.id, "Grand Palace", dec!(7000.00));
    add_quote(&mut db, other.id, "Sweet Co", dec!(800.00));

    let removed = db.delete_task(task.id).unwrap();
    assert_eq!(removed, 2);

    assert!(db.get_task(task.id).unwrap().is_none());
    assert!(matches!(
        db.list_quotes_for_task(task.id),
        Err(Error::NotFound { .. })
    ));
    let orphaned: i64 = db
        .conn
        .query_row(
            "SELECT COUNT(*) FROM quotes WHERE task_id = ?1",
            params![task.id],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(orphaned, 0);

    // Other tasks keep their quotes
    assert_eq!(db.list_quotes_for_task(other.id).unwrap().len(), 1);
}

#[test]
fn test_delete_task_without_quotes() {
    let mut db = Database::open_in_memory().unwrap();
    let task = add_task(&mut db, "Favors", 1);
    assert_eq!(db.delete_task(task.id).unwrap(), 0);
    assert!(db.list_tasks(&TaskQuery::default()).unwrap().is_empty());
}

#[test]
fn test_delete_task_not_found() {
    let mut db = Database::open_in_memory().unwrap();
    add_task(&mut db, "Venue", 5);
    assert!(matches!(
        db.delete_task(77),
        Err(Error::NotFound { entity: "Task", id: 77 })
    ));
    assert_eq!(db.list_tasks(&TaskQuery::default()).unwrap().len(), 1);
}

#[test]
fn test_foreign_key_blocks_direct_parent_delete() {
    let mut db = Database::open_in_memory().unwrap();
    let task = add_task(&mut db, "Venue", 5);
    add_quote(&mut db, task.id, "Acme Hall", dec!(5000));

    let result = db
        .conn
        .execute("DELETE FROM tasks WHERE id = ?1", params![task.id]);
    assert!(result.is_err());
}

// ── Quotes ────────────────────────────────────────────────────

#[test]
fn test_quote_insert_defaults() {
    let mut db = Database::open_in_memory().unwrap();
    let task = add_task(&mut db, "Venue", 5);
    let quote = db
        .insert_quote(&NewQuote::new(task.id, "Acme Hall", "Saturday night", dec!(5000.00)).unwrap())
        .unwrap();

    assert_eq!(quote.task_id, task.id);
    assert_eq!(quote.status, QuoteStatus::UnderReview);

    let quotes = db.list_quotes_for_task(task.id).unwrap();
    assert_eq!(quotes.len(), 1);
    assert_eq!(quotes[0].vendor, "Acme Hall");
    assert_eq!(quotes[0].description, "Saturday night");
    assert_eq!(quotes[0].amount, dec!(5000.00));
    assert_eq!(quotes[0].status, QuoteStatus::UnderReview);
}

#[test]
fn test_quote_for_missing_task() {
    let mut db = Database::open_in_memory().unwrap();
    let quote = NewQuote::new(404, "Acme Hall", "", dec!(10)).unwrap();
    assert!(matches!(
        db.insert_quote(&quote),
        Err(Error::NotFound { entity: "Task", id: 404 })
    ));
    let count: i64 = db
        .conn
        .query_row("SELECT COUNT(*) FROM quotes", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 0);
}

#[test]
fn test_quotes_cheapest_first() {
    let mut db = Database::open_in_memory().unwrap();
    let task = add_task(&mut db, "Photographer", 4);
    // Text ordering would put 10000 before 9000
    add_quote(&mut db, task.id, "Studio A", dec!(10000.00));
    add_quote(&mut db, task.id, "Studio B", dec!(9000.00));
    add_quote(&mut db, task.id, "Studio C", dec!(950.50));

    let vendors: Vec<String> = db
        .list_quotes_for_task(task.id)
        .unwrap()
        .into_iter()
        .map(|q| q.vendor)
        .collect();
    assert_eq!(vendors, vec!["Studio C", "Studio B", "Studio A"]);
}

#[test]
fn test_quotes_equal_amounts_by_id() {
    let mut db = Database::open_in_memory().unwrap();
    let task = add_task(&mut db, "Photographer", 4);
    let a = add_quote(&mut db, task.id, "Studio A", dec!(3000));
    let b = add_quote(&mut db, task.id, "Studio B", dec!(3000.00));

    let ids: Vec<i64> = db
        .list_quotes_for_task(task.id)
        .unwrap()
        .iter()
        .map(|q| q.id)
        .collect();
    assert_eq!(ids, vec![a.id, b.id]);
}

#[test]
fn test_quotes_for_task_without_quotes() {
    let mut db = Database::open_in_memory().unwrap();
    let task = add_task(&mut db, "Dress", 5);
    assert!(db.list_quotes_for_task(task.id).unwrap().is_empty());
}

#[test]
fn test_set_quote_status() {
    let mut db = Database::open_in_memory().unwrap();
    let task = add_task(&mut db, "Venue", 5);
    let quote = add_quote(&mut db, task.id, "Acme Hall", dec!(5000));

    let approved = db.set_quote_status(quote.id, QuoteStatus::Approved).unwrap();
    assert_eq!(approved.status, QuoteStatus::Approved);
    assert_eq!(approved.amount, dec!(5000));

    let quotes = db.list_quotes_for_task(task.id).unwrap();
    assert_eq!(quotes[0].status, QuoteStatus::Approved);
}

#[test]
fn test_set_quote_status_not_found() {
    let mut db = Database::open_in_memory().unwrap();
    assert!(matches!(
        db.set_quote_status(5, QuoteStatus::Rejected),
        Err(Error::NotFound { entity: "Quote", id: 5 })
    ));
}

// ── Expenses ──────────────────────────────────────────────────

#[test]
fn test_expense_crud() {
    let mut db = Database::open_in_memory().unwrap();
    let expense = add_expense(&mut db, "Invitations", dec!(250.50));
    assert!(expense.id > 0);

    let all = db.list_expenses().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].description, "Invitations");
    assert_eq!(all[0].amount, dec!(250.50));
    assert_eq!(all[0].created_at, expense.created_at);
}

#[test]
fn test_expenses_newest_first() {
    let mut db = Database::open_in_memory().unwrap();
    let a = add_expense(&mut db, "Deposit", dec!(100));
    let b = add_expense(&mut db, "Rings", dec!(2000));
    let c = add_expense(&mut db, "Cake tasting", dec!(80));

    let ids: Vec<i64> = db.list_expenses().unwrap().iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![c.id, b.id, a.id]);
}

#[test]
fn test_sum_expenses_exact() {
    let mut db = Database::open_in_memory().unwrap();
    add_expense(&mut db, "Deposit", dec!(100.00));
    add_expense(&mut db, "Invitations", dec!(250.50));
    assert_eq!(db.sum_expenses().unwrap(), dec!(350.50));
}

#[test]
fn test_sum_expenses_no_float_drift() {
    let mut db = Database::open_in_memory().unwrap();
    for _ in 0..10 {
        add_expense(&mut db, "Candy", dec!(0.10));
    }
    add_expense(&mut db, "Extra", dec!(0.20));
    assert_eq!(db.sum_expenses().unwrap(), dec!(1.20));
}

#[test]
fn test_sum_expenses_empty() {
    let db = Database::open_in_memory().unwrap();
    assert_eq!(db.sum_expenses().unwrap(), Decimal::ZERO);
    assert_eq!(db.count_expenses().unwrap(), 0);
}

#[test]
fn test_count_expenses() {
    let mut db = Database::open_in_memory().unwrap();
    add_expense(&mut db, "Deposit", dec!(100));
    add_expense(&mut db, "Rings", dec!(2000));
    assert_eq!(db.count_expenses().unwrap(), 2);
}

#[test]
fn test_decimal_precision_preserved() {
    let mut db = Database::open_in_memory().unwrap();
    add_expense(&mut db, "Precise", dec!(1234.5678));
    let fetched = db.list_expenses().unwrap();
    assert_eq!(fetched[0].amount, dec!(1234.5678));
    assert_eq!(fetched[0].amount.to_string(), "1234.5678");
}

#[test]
fn test_large_amounts() {
    let mut db = Database::open_in_memory().unwrap();
    add_expense(&mut db, "Destination wedding", dec!(350000.00));
    add_expense(&mut db, "Honeymoon", dec!(99999999.99));
    assert_eq!(db.sum_expenses().unwrap(), dec!(100349999.99));
}

#[test]
fn test_corrupt_amount_is_store_error() {
    let mut db = Database::open_in_memory().unwrap();
    add_expense(&mut db, "Deposit", dec!(100));
    db.conn
        .execute("UPDATE expenses SET amount = 'lots'", [])
        .unwrap();
    assert!(matches!(db.sum_expenses(), Err(Error::Store(_))));
    assert!(matches!(db.list_expenses(), Err(Error::Store(_))));
}

// ── Settings ──────────────────────────────────────────────────

#[test]
fn test_budget_total_unset() {
    let db = Database::open_in_memory().unwrap();
    assert_eq!(db.budget_total().unwrap(), None);
}

#[test]
fn test_budget_total_set_replace_clear() {
    let mut db = Database::open_in_memory().unwrap();
    db.set_budget_total(Some(dec!(50000.00))).unwrap();
    assert_eq!(db.budget_total().unwrap(), Some(dec!(50000.00)));

    db.set_budget_total(Some(dec!(65000.00))).unwrap();
    assert_eq!(db.budget_total().unwrap(), Some(dec!(65000.00)));

    db.set_budget_total(None).unwrap();
    assert_eq!(db.budget_total().unwrap(), None);
}

// ── Schema migration ──────────────────────────────────────────

#[test]
fn test_schema_version_set() {
    let db = Database::open_in_memory().unwrap();
    let version: i32 = db
        .conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get(0)
        })
        .unwrap();
    assert_eq!(version, schema::CURRENT_VERSION);
}

#[test]
fn test_double_migrate_idempotent() {
    let mut db = Database::open_in_memory().unwrap();
    let task = add_task(&mut db, "Venue", 5);
    db.migrate().unwrap();

    let rows: i64 = db
        .conn
        .query_row("SELECT COUNT(*) FROM schema_version", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
    assert!(db.get_task(task.id).unwrap().is_some());
}

#[test]
fn test_migrates_v1_database() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(schema::SCHEMA_V1).unwrap();
    conn.execute("INSERT INTO schema_version (version) VALUES (1)", [])
        .unwrap();
    conn.execute(
        "INSERT INTO expenses (description, amount, created_at)
         VALUES ('Deposit', '100.00', '2024-05-01T12:00:00.000000Z')",
        [],
    )
    .unwrap();

    let mut db = Database { conn };
    db.migrate().unwrap();

    let version: i32 = db
        .conn
        .query_row("SELECT version FROM schema_version", [], |row| row.get(0))
        .unwrap();
    assert_eq!(version, schema::CURRENT_VERSION);
    assert_eq!(db.sum_expenses().unwrap(), dec!(100.00));
    db.set_budget_total(Some(dec!(1000))).unwrap();
}

#[test]
fn test_reopen_file_keeps_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wedding.db");

    let task_id = {
        let mut db = Database::open(&path).unwrap();
        let task = add_task(&mut db, "Venue", 5);
        add_quote(&mut db, task.id, "Acme Hall", dec!(5000.00));
        add_expense(&mut db, "Deposit", dec!(1500.00));
        task.id
    };

    let db = Database::open(&path).unwrap();
    assert!(db.get_task(task_id).unwrap().is_some());
    assert_eq!(db.list_quotes_for_task(task_id).unwrap().len(), 1);
    assert_eq!(db.sum_expenses().unwrap(), dec!(1500.00));
}
