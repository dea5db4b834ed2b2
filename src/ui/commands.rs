use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use tracing::warn;

use super::app::{App, InputMode, PendingAction, Screen, WeddingPlanner};
use crate::currency::{format_brl, format_brl_exact};
use crate::export;
use crate::models::{QuoteStatus, TaskStatus, FIELD_SEPARATOR, MAX_PRIORITY, MIN_PRIORITY};
use crate::planner::TaskForm;

pub(crate) struct Command {
    pub(crate) description: &'static str,
    pub(crate) run: fn(&str, &mut App, &mut WeddingPlanner) -> anyhow::Result<()>,
}

macro_rules! register_command {
    ($name:expr, $desc:expr, $func:expr, $registry:expr) => {{
        $registry.insert(
            $name,
            Command {
                description: $desc,
                run: $func,
            },
        );
    }};
}

pub(crate) static COMMANDS: LazyLock<HashMap<&str, Command>> = LazyLock::new(|| {
    let mut r: HashMap<&str, Command> = HashMap::new();

    register_command!("q", "Quit WeddingTUI", cmd_quit, r);
    register_command!("quit", "Quit WeddingTUI", cmd_quit, r);
    register_command!("t", "Go to Tasks", cmd_tasks, r);
    register_command!("tasks", "Go to Tasks", cmd_tasks, r);
    register_command!("quotes", "Show quotes for the selected task", cmd_quotes, r);
    register_command!("f", "Go to Finance", cmd_finance, r);
    register_command!("finance", "Go to Finance", cmd_finance, r);
    register_command!("help", "Show available commands", cmd_help, r);
    register_command!("h", "Show available commands", cmd_help, r);
    register_command!(
        "task",
        "Add task (e.g. :task Venue | Book venue | 5 | 12.000,00)",
        cmd_task,
        r
    );
    register_command!("edit", "Edit the selected task", cmd_edit, r);
    register_command!(
        "status",
        "Set task status (e.g. :status done)",
        cmd_status,
        r
    );
    register_command!(
        "delete-task",
        "Delete the selected task and its quotes",
        cmd_delete_task,
        r
    );
    register_command!(
        "quote",
        "Add quote to selected task (e.g. :quote Acme Hall | 5.000,00 | Saturday)",
        cmd_quote,
        r
    );
    register_command!(
        "mark",
        "Set selected quote status (e.g. :mark approved)",
        cmd_mark,
        r
    );
    register_command!("approve", "Approve the selected quote", cmd_approve, r);
    register_command!("reject", "Reject the selected quote", cmd_reject, r);
    register_command!("review", "Put the selected quote back under review", cmd_review, r);
    register_command!(
        "expense",
        "Record expense (e.g. :expense Deposit | 1.500,00)",
        cmd_expense,
        r
    );
    register_command!(
        "budget",
        "Set total budget (e.g. :budget 40.000,00, :budget clear)",
        cmd_budget,
        r
    );
    register_command!(
        "filter",
        "Filter tasks by status (e.g. :filter pending, :filter to clear)",
        cmd_filter,
        r
    );
    register_command!("sort", "Toggle task order (newest / priority)", cmd_sort, r);
    register_command!(
        "export",
        "Export expenses to CSV (e.g. :export ~/gastos.csv)",
        cmd_export,
        r
    );

    r
});

/// Run one `:` command. Failures become status messages; only the caller's
/// terminal errors can end the session.
pub(crate) fn handle_command(
    input: &str,
    app: &mut App,
    planner: &mut WeddingPlanner,
) -> anyhow::Result<()> {
    let trimmed = input.trim();
    let mut parts = trimmed.splitn(2, ' ');
    let cmd_name = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    if let Some(cmd) = COMMANDS.get(cmd_name) {
        if let Err(e) = (cmd.run)(args, app, planner) {
            warn!(command = cmd_name, error = %e, "command failed");
            app.set_status(format!("Error: {e}"));
        }
    } else {
        // Try fuzzy match
        let suggestion = find_closest(cmd_name);
        app.set_status(format!(
            "Unknown command: :{cmd_name}. Did you mean :{suggestion}?"
        ));
    }

    Ok(())
}

fn find_closest(input: &str) -> String {
    COMMANDS
        .keys()
        .filter(|k| k.len() > 1) // skip single-letter aliases for suggestions
        .min_by_key(|k| (levenshtein(input, k), **k))
        .unwrap_or(&"help")
        .to_string()
}

fn levenshtein(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Split `a | b | c` into trimmed fields.
pub(crate) fn split_fields(args: &str) -> Vec<&str> {
    args.split(FIELD_SEPARATOR).map(str::trim).collect()
}

/// Build a task form from `name | description | priority [| estimate]`.
pub(crate) fn parse_task_form(args: &str) -> Result<TaskForm, String> {
    let fields = split_fields(args);
    let [name, description, priority, rest @ ..] = fields.as_slice() else {
        return Err(format!(
            "Usage: :task <name> | <description> | <priority {MIN_PRIORITY}-{MAX_PRIORITY}> [| <estimate>]"
        ));
    };
    let priority: i64 = priority.parse().map_err(|_| {
        format!("Priority must be a number from {MIN_PRIORITY} to {MAX_PRIORITY} (got '{priority}')")
    })?;
    let estimate = rest.first().copied().unwrap_or("");
    Ok(TaskForm::new(name, description, priority).with_estimate(estimate))
}

/// The text the edit prompt starts with for a task.
pub(crate) fn task_form_text(task: &crate::models::Task) -> String {
    format!(
        "{} | {} | {} | {}",
        task.name,
        task.description,
        task.priority,
        format_brl_exact(task.estimate)
    )
}

/// Apply the edit prompt to the task being edited. The task keeps its status.
pub(crate) fn submit_task_edit(
    input: &str,
    app: &mut App,
    planner: &mut WeddingPlanner,
) -> anyhow::Result<()> {
    let Some(id) = app.editing_task.take() else {
        return Ok(());
    };
    let form = match parse_task_form(input) {
        Ok(form) => form,
        Err(msg) => {
            app.set_status(msg);
            return Ok(());
        }
    };
    let status = planner.get_task(id)?.status;
    let task = planner.update_task(id, &form, status)?;
    app.refresh_tasks(planner)?;
    app.refresh_quotes(planner)?;
    app.set_status(format!("Updated: {}", task.name));
    Ok(())
}

/// Carry out the action the user just confirmed with `y`.
pub(crate) fn run_pending_action(app: &mut App, planner: &mut WeddingPlanner) -> anyhow::Result<()> {
    let Some(action) = app.pending_action.take() else {
        return Ok(());
    };
    match action {
        PendingAction::DeleteTask { id, name } => {
            let removed = planner.delete_task(id)?;
            app.refresh_tasks(planner)?;
            app.refresh_quotes(planner)?;
            if app.screen == Screen::Quotes && app.quote_task.is_none() {
                app.screen = Screen::Tasks;
            }
            app.set_status(match removed {
                0 => format!("Deleted: {name}"),
                1 => format!("Deleted: {name} (and 1 quote)"),
                n => format!("Deleted: {name} (and {n} quotes)"),
            });
        }
    }
    Ok(())
}

// ── Command implementations ──────────────────────────────────

fn cmd_quit(_args: &str, app: &mut App, _planner: &mut WeddingPlanner) -> anyhow::Result<()> {
    app.running = false;
    Ok(())
}

fn cmd_tasks(_args: &str, app: &mut App, planner: &mut WeddingPlanner) -> anyhow::Result<()> {
    app.screen = Screen::Tasks;
    app.refresh_tasks(planner)?;
    Ok(())
}

fn cmd_quotes(_args: &str, app: &mut App, planner: &mut WeddingPlanner) -> anyhow::Result<()> {
    if app.screen == Screen::Tasks || app.quote_task.is_none() {
        app.open_quotes(planner)?;
    } else {
        app.screen = Screen::Quotes;
        app.refresh_quotes(planner)?;
    }
    Ok(())
}

fn cmd_finance(_args: &str, app: &mut App, planner: &mut WeddingPlanner) -> anyhow::Result<()> {
    app.screen = Screen::Finance;
    app.refresh_finance(planner)?;
    Ok(())
}

fn cmd_help(_args: &str, app: &mut App, _planner: &mut WeddingPlanner) -> anyhow::Result<()> {
    app.show_help = true;
    Ok(())
}

fn cmd_task(args: &str, app: &mut App, planner: &mut WeddingPlanner) -> anyhow::Result<()> {
    let form = match parse_task_form(args) {
        Ok(form) => form,
        Err(msg) => {
            app.set_status(msg);
            return Ok(());
        }
    };
    let task = planner.create_task(&form)?;
    app.screen = Screen::Tasks;
    app.refresh_tasks(planner)?;
    if let Some(pos) = app.tasks.iter().position(|t| t.id == task.id) {
        app.task_index = pos;
    }
    app.set_status(format!("Added task: {}", task.name));
    Ok(())
}

fn cmd_edit(_args: &str, app: &mut App, _planner: &mut WeddingPlanner) -> anyhow::Result<()> {
    let Some((id, text)) = app.selected_task().map(|t| (t.id, task_form_text(t))) else {
        app.set_status("No task selected");
        return Ok(());
    };
    app.editing_task = Some(id);
    app.command_input = text;
    app.input_mode = InputMode::Editing;
    Ok(())
}

fn cmd_status(args: &str, app: &mut App, planner: &mut WeddingPlanner) -> anyhow::Result<()> {
    let Some(status) = TaskStatus::parse(args) else {
        let names: Vec<&str> = TaskStatus::all().iter().map(|s| s.label()).collect();
        app.set_status(format!("Usage: :status <status>. Statuses: {}", names.join(", ")));
        return Ok(());
    };
    let Some(id) = app.selected_task().map(|t| t.id) else {
        app.set_status("No task selected");
        return Ok(());
    };
    let task = planner.set_task_status(id, status)?;
    app.refresh_tasks(planner)?;
    app.refresh_quotes(planner)?;
    app.set_status(format!("{}: {}", task.name, task.status));
    Ok(())
}

fn cmd_delete_task(_args: &str, app: &mut App, _planner: &mut WeddingPlanner) -> anyhow::Result<()> {
    let task = match app.screen {
        Screen::Quotes => app.quote_task.as_ref(),
        _ => app.selected_task(),
    };
    let Some(task) = task else {
        app.set_status("No task selected");
        return Ok(());
    };
    let (id, name) = (task.id, task.name.clone());
    app.confirm_message = format!("Delete '{name}' and its quotes?");
    app.pending_action = Some(PendingAction::DeleteTask { id, name });
    app.input_mode = InputMode::Confirm;
    Ok(())
}

fn cmd_quote(args: &str, app: &mut App, planner: &mut WeddingPlanner) -> anyhow::Result<()> {
    let fields = split_fields(args);
    let [vendor, amount, rest @ ..] = fields.as_slice() else {
        app.set_status("Usage: :quote <vendor> | <amount> [| <description>]");
        return Ok(());
    };
    let task = match app.screen {
        Screen::Quotes => app.quote_task.clone(),
        _ => app.selected_task().cloned(),
    };
    let Some(task) = task else {
        app.set_status("Select a task first");
        return Ok(());
    };
    let description = rest.first().copied().unwrap_or("");
    let quote = planner.create_quote(task.id, vendor, description, amount)?;
    app.quote_task = Some(task);
    app.screen = Screen::Quotes;
    app.refresh_quotes(planner)?;
    app.set_status(format!(
        "Added quote: {} {}",
        quote.vendor,
        format_brl(quote.amount)
    ));
    Ok(())
}

fn set_selected_quote_status(
    app: &mut App,
    planner: &mut WeddingPlanner,
    status: QuoteStatus,
) -> anyhow::Result<()> {
    if app.screen != Screen::Quotes {
        app.set_status("Open the Quotes screen to change a quote");
        return Ok(());
    }
    let Some(id) = app.selected_quote().map(|q| q.id) else {
        app.set_status("No quote selected");
        return Ok(());
    };
    let quote = planner.set_quote_status(id, status)?;
    app.refresh_quotes(planner)?;
    app.set_status(format!("{}: {}", quote.vendor, quote.status));
    Ok(())
}

fn cmd_mark(args: &str, app: &mut App, planner: &mut WeddingPlanner) -> anyhow::Result<()> {
    let Some(status) = QuoteStatus::parse(args) else {
        let names: Vec<&str> = QuoteStatus::all().iter().map(|s| s.label()).collect();
        app.set_status(format!("Usage: :mark <status>. Statuses: {}", names.join(", ")));
        return Ok(());
    };
    set_selected_quote_status(app, planner, status)
}

fn cmd_approve(_args: &str, app: &mut App, planner: &mut WeddingPlanner) -> anyhow::Result<()> {
    set_selected_quote_status(app, planner, QuoteStatus::Approved)
}

fn cmd_reject(_args: &str, app: &mut App, planner: &mut WeddingPlanner) -> anyhow::Result<()> {
    set_selected_quote_status(app, planner, QuoteStatus::Rejected)
}

fn cmd_review(_args: &str, app: &mut App, planner: &mut WeddingPlanner) -> anyhow::Result<()> {
    set_selected_quote_status(app, planner, QuoteStatus::UnderReview)
}

fn cmd_expense(args: &str, app: &mut App, planner: &mut WeddingPlanner) -> anyhow::Result<()> {
    let fields = split_fields(args);
    let [description, amount] = fields.as_slice() else {
        app.set_status("Usage: :expense <description> | <amount>");
        return Ok(());
    };
    let expense = planner.create_expense(description, amount)?;
    app.screen = Screen::Finance;
    app.expense_index = 0;
    app.expense_scroll = 0;
    app.refresh_finance(planner)?;
    app.set_status(format!(
        "Recorded: {} {}",
        expense.description,
        format_brl(expense.amount)
    ));
    Ok(())
}

fn cmd_budget(args: &str, app: &mut App, planner: &mut WeddingPlanner) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status("Usage: :budget <amount> or :budget clear");
        return Ok(());
    }
    if args.eq_ignore_ascii_case("clear") {
        planner.clear_budget()?;
        app.set_status("Budget cleared");
    } else {
        let budget = planner.set_budget(args)?;
        app.set_status(format!("Budget set: {}", format_brl(budget)));
    }
    app.screen = Screen::Finance;
    app.refresh_finance(planner)?;
    Ok(())
}

fn cmd_filter(args: &str, app: &mut App, planner: &mut WeddingPlanner) -> anyhow::Result<()> {
    if args.is_empty() || args.eq_ignore_ascii_case("all") {
        app.task_query.status = None;
        app.set_status("Filter cleared - showing all tasks");
    } else if let Some(status) = TaskStatus::parse(args) {
        app.task_query.status = Some(status);
        app.set_status(format!("Showing {status} tasks"));
    } else {
        app.set_status(format!("Unknown status: {args}"));
        return Ok(());
    }
    app.screen = Screen::Tasks;
    app.task_index = 0;
    app.task_scroll = 0;
    app.refresh_tasks(planner)?;
    Ok(())
}

fn cmd_sort(_args: &str, app: &mut App, planner: &mut WeddingPlanner) -> anyhow::Result<()> {
    app.task_query.order = app.task_query.order.toggle();
    app.screen = Screen::Tasks;
    app.refresh_tasks(planner)?;
    app.set_status(format!("Sorted by {}", app.task_query.order));
    Ok(())
}

fn cmd_export(args: &str, app: &mut App, planner: &mut WeddingPlanner) -> anyhow::Result<()> {
    let path = if args.is_empty() {
        export::default_export_path()
    } else {
        export::expand_home(args)
    };

    let expenses = planner.list_expenses()?;
    let count = export::export_expenses(Path::new(&path), &expenses)?;
    if count == 0 {
        app.set_status(format!("No expenses yet; wrote header to {path}"));
    } else {
        app.set_status(format!("Exported {count} expenses to {path}"));
    }
    Ok(())
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod commands_tests;
