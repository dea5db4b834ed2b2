#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;

use super::*;
use crate::db::Database;
use crate::models::TaskOrder;
use crate::planner::Planner;

fn setup() -> (App, WeddingPlanner) {
    let planner = Planner::new(Database::open_in_memory().unwrap());
    let mut app = App::new();
    app.refresh_all(&planner).unwrap();
    (app, planner)
}

fn run(input: &str, app: &mut App, planner: &mut WeddingPlanner) {
    handle_command(input, app, planner).unwrap();
}

#[test]
fn test_unknown_command_suggests() {
    let (mut app, mut planner) = setup();
    run("tsk", &mut app, &mut planner);
    assert_eq!(
        app.status_message,
        "Unknown command: :tsk. Did you mean :task?"
    );
}

#[test]
fn test_levenshtein() {
    assert_eq!(levenshtein("", ""), 0);
    assert_eq!(levenshtein("budget", "budget"), 0);
    assert_eq!(levenshtein("quote", "quit"), 2);
    assert_eq!(levenshtein("abc", ""), 3);
}

#[test]
fn test_parse_task_form() {
    let form = parse_task_form("Venue | Book venue | 5 | 12.000,00").unwrap();
    assert_eq!(form.name, "Venue");
    assert_eq!(form.description, "Book venue");
    assert_eq!(form.priority, 5);
    assert_eq!(form.estimate, "12.000,00");

    let form = parse_task_form("Cake|Tasting|2").unwrap();
    assert_eq!(form.estimate, "");

    assert!(parse_task_form("Cake | Tasting").is_err());
    assert!(parse_task_form("Cake | Tasting | high").is_err());
}

#[test]
fn test_add_task_selects_it() {
    let (mut app, mut planner) = setup();
    run("task Cake | Tasting | 2", &mut app, &mut planner);
    run("task Venue | Book venue | 5 | 12.000,00", &mut app, &mut planner);

    assert_eq!(app.tasks.len(), 2);
    assert_eq!(app.selected_task().unwrap().name, "Venue");
    assert_eq!(app.selected_task().unwrap().estimate, dec!(12000.00));
    assert_eq!(app.status_message, "Added task: Venue");
}

#[test]
fn test_add_task_validation_shown() {
    let (mut app, mut planner) = setup();
    run("task Flowers | desc | 6", &mut app, &mut planner);
    assert_eq!(
        app.status_message,
        "Error: Priority must be between 1 and 5 (got 6)"
    );
    assert!(app.tasks.is_empty());
    assert!(app.running);
}

#[test]
fn test_quote_flow() {
    let (mut app, mut planner) = setup();
    run("task Venue | Book venue | 5", &mut app, &mut planner);
    run("quote Grand Palace | 7.500,00", &mut app, &mut planner);
    run("quote Acme Hall | 5000,00 | Saturday", &mut app, &mut planner);

    assert_eq!(app.screen, Screen::Quotes);
    assert_eq!(app.quote_task.as_ref().unwrap().name, "Venue");
    let vendors: Vec<&str> = app.quotes.iter().map(|q| q.vendor.as_str()).collect();
    assert_eq!(vendors, ["Acme Hall", "Grand Palace"]);
    assert_eq!(app.quotes[0].status, QuoteStatus::UnderReview);

    run("approve", &mut app, &mut planner);
    assert_eq!(app.quotes[0].status, QuoteStatus::Approved);
    assert_eq!(app.status_message, "Acme Hall: Approved");
}

#[test]
fn test_quote_without_task() {
    let (mut app, mut planner) = setup();
    run("quote Acme Hall | 100,00", &mut app, &mut planner);
    assert_eq!(app.status_message, "Select a task first");
}

#[test]
fn test_quote_bad_amount_keeps_screen() {
    let (mut app, mut planner) = setup();
    run("task Venue | Book venue | 5", &mut app, &mut planner);
    run("quote Acme Hall | 1,500.00", &mut app, &mut planner);
    assert!(app
        .status_message
        .starts_with("Error: Invalid amount format: '1,500.00'"));
    assert_eq!(app.screen, Screen::Tasks);
}

#[test]
fn test_approve_needs_quotes_screen() {
    let (mut app, mut planner) = setup();
    run("approve", &mut app, &mut planner);
    assert_eq!(app.status_message, "Open the Quotes screen to change a quote");
}

#[test]
fn test_delete_task_confirmed() {
    let (mut app, mut planner) = setup();
    run("task Venue | Book venue | 5", &mut app, &mut planner);
    run("quote Acme Hall | 5.000,00", &mut app, &mut planner);
    run("quote Grand Palace | 7.500,00", &mut app, &mut planner);

    run("delete-task", &mut app, &mut planner);
    assert_eq!(app.input_mode, InputMode::Confirm);
    assert_eq!(app.confirm_message, "Delete 'Venue' and its quotes?");

    run_pending_action(&mut app, &mut planner).unwrap();
    assert!(app.tasks.is_empty());
    assert!(app.quotes.is_empty());
    assert!(app.quote_task.is_none());
    assert_eq!(app.screen, Screen::Tasks);
    assert_eq!(app.status_message, "Deleted: Venue (and 2 quotes)");
}

#[test]
fn test_delete_task_nothing_selected() {
    let (mut app, mut planner) = setup();
    run("delete-task", &mut app, &mut planner);
    assert_eq!(app.input_mode, InputMode::Normal);
    assert!(app.pending_action.is_none());
}

#[test]
fn test_status_command() {
    let (mut app, mut planner) = setup();
    run("task Dress | Fittings | 4", &mut app, &mut planner);
    run("status em andamento", &mut app, &mut planner);
    assert_eq!(app.tasks[0].status, TaskStatus::InProgress);

    run("status someday", &mut app, &mut planner);
    assert!(app.status_message.starts_with("Usage: :status"));
    assert_eq!(app.tasks[0].status, TaskStatus::InProgress);
}

#[test]
fn test_filter_and_sort() {
    let (mut app, mut planner) = setup();
    run("task Cake | Tasting | 2", &mut app, &mut planner);
    run("task Venue | Book venue | 5", &mut app, &mut planner);
    run("task Music | Band | 3", &mut app, &mut planner);
    run("status done", &mut app, &mut planner);

    run("filter done", &mut app, &mut planner);
    assert_eq!(app.tasks.len(), 1);
    assert_eq!(app.tasks[0].name, "Music");

    run("filter", &mut app, &mut planner);
    assert_eq!(app.tasks.len(), 3);

    run("sort", &mut app, &mut planner);
    assert_eq!(app.task_query.order, TaskOrder::Priority);
    let names: Vec<&str> = app.tasks.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, ["Venue", "Music", "Cake"]);
}

#[test]
fn test_edit_round_trip_keeps_status() {
    let (mut app, mut planner) = setup();
    run("task Cake | Tasting | 2 | 1.200,00", &mut app, &mut planner);
    run("status done", &mut app, &mut planner);

    run("edit", &mut app, &mut planner);
    assert_eq!(app.input_mode, InputMode::Editing);
    assert_eq!(app.command_input, "Cake | Tasting | 2 | 1.200,00");

    submit_task_edit("Cake | Three tiers | 3 | 1.500,00", &mut app, &mut planner).unwrap();
    let task = &app.tasks[0];
    assert_eq!(task.description, "Three tiers");
    assert_eq!(task.priority, 3);
    assert_eq!(task.estimate, dec!(1500.00));
    assert_eq!(task.status, TaskStatus::Done);
    assert!(app.editing_task.is_none());
}

#[test]
fn test_edit_unchanged_keeps_exact_estimate() {
    let (mut app, mut planner) = setup();
    run("task Venue | Book venue | 5 | 10,005", &mut app, &mut planner);
    assert_eq!(app.tasks[0].estimate, dec!(10.005));

    run("edit", &mut app, &mut planner);
    assert_eq!(app.command_input, "Venue | Book venue | 5 | 10,005");

    let text = app.command_input.clone();
    submit_task_edit(&text, &mut app, &mut planner).unwrap();
    assert_eq!(app.tasks[0].estimate, dec!(10.005));
    assert_eq!(app.tasks[0].estimate.scale(), 3);
}

#[test]
fn test_task_text_with_separator_never_stored() {
    // The CLI hands names through whole, so the separator can reach the planner.
    let (mut app, mut planner) = setup();
    let form = TaskForm::new("Venue", "Hall | garden", 3);
    let err = planner.create_task(&form).unwrap_err();
    assert_eq!(err.to_string(), "Description cannot contain '|'");

    app.refresh_tasks(&planner).unwrap();
    assert!(app.tasks.is_empty());
}

#[test]
fn test_expense_and_budget() {
    let (mut app, mut planner) = setup();
    run("expense Deposit | 100,00", &mut app, &mut planner);
    run("expense Invitations | 250,50", &mut app, &mut planner);
    assert_eq!(app.screen, Screen::Finance);
    assert_eq!(app.expenses.len(), 2);
    assert_eq!(app.summary.total_spent, dec!(350.50));

    run("budget 300", &mut app, &mut planner);
    assert_eq!(app.status_message, "Budget set: R$ 300,00");
    assert!(app.summary.is_over_budget());

    run("budget clear", &mut app, &mut planner);
    assert_eq!(app.summary.budget, None);
}

#[test]
fn test_expense_usage() {
    let (mut app, mut planner) = setup();
    run("expense Deposit", &mut app, &mut planner);
    assert_eq!(app.status_message, "Usage: :expense <description> | <amount>");
    assert!(app.expenses.is_empty());
}

#[test]
fn test_export_command_writes_file() {
    let (mut app, mut planner) = setup();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gastos.csv");
    run("expense Rings | 2.000,00", &mut app, &mut planner);
    run(&format!("export {}", path.display()), &mut app, &mut planner);

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("description,amount,created_at\n"));
    assert!(text.contains("Rings,2000.00,"));
    assert!(app.status_message.starts_with("Exported 1 expenses"));
}

#[test]
fn test_quit() {
    let (mut app, mut planner) = setup();
    run("q", &mut app, &mut planner);
    assert!(!app.running);
}
