use anyhow::{Context, Result};
use std::path::Path;

use crate::currency::format_brl;
use crate::export;
use crate::models::{TaskOrder, TaskQuery, TaskStatus, MAX_PRIORITY, MIN_PRIORITY};
use crate::planner::TaskForm;
use crate::ui::app::WeddingPlanner;
use crate::ui::util::{format_timestamp, truncate};

pub(crate) fn as_cli(args: &[String], planner: &mut WeddingPlanner) -> Result<()> {
    match args[1].as_str() {
        "tasks" | "t" => cli_tasks(&args[2..], planner),
        "add-task" => cli_add_task(&args[2..], planner),
        "delete-task" => cli_delete_task(&args[2..], planner),
        "quotes" => cli_quotes(&args[2..], planner),
        "add-quote" => cli_add_quote(&args[2..], planner),
        "expenses" => cli_expenses(planner),
        "add-expense" => cli_add_expense(&args[2..], planner),
        "summary" | "s" => cli_summary(planner),
        "budget" => cli_budget(&args[2..], planner),
        "export" => cli_export(&args[2..], planner),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("weddingtui {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("WeddingTUI - local-only wedding planner");
    println!();
    println!("Usage: weddingtui [command]");
    println!();
    println!("Commands:");
    println!("  (none)                                  Launch interactive TUI");
    println!("  tasks                                   List tasks (newest first)");
    println!("    --status <status>                     Only tasks with this status");
    println!("    --by-priority                         Highest priority first");
    println!("  add-task <name> <desc> <1-5> [estimate] Add a task");
    println!("  delete-task <id>                        Delete a task and its quotes");
    println!("  quotes <task-id>                        List a task's quotes, cheapest first");
    println!("  add-quote <task-id> <vendor> <amount> [desc]  Add a vendor quote");
    println!("  expenses                                List expenses");
    println!("  add-expense <description> <amount>      Record an expense");
    println!("  summary                                 Print spending against budget");
    println!("  budget [amount|clear]                   Show, set or clear the total budget");
    println!("  export [path]                           Export expenses to CSV");
    println!("  --help, -h                              Show this help");
    println!("  --version, -V                           Show version");
    println!();
    println!("Amounts use Brazilian format: 1.500,00 or \"R$ 1.500,00\"");
}

fn parse_id(arg: Option<&String>, usage: &str) -> Result<i64> {
    let raw = arg.ok_or_else(|| anyhow::anyhow!("Usage: weddingtui {usage}"))?;
    raw.parse()
        .with_context(|| format!("Invalid id '{raw}' (usage: weddingtui {usage})"))
}

fn cli_tasks(args: &[String], planner: &mut WeddingPlanner) -> Result<()> {
    let mut query = match args.windows(2).find(|w| w[0] == "--status") {
        Some(w) => TaskQuery::with_status(
            TaskStatus::parse(&w[1]).ok_or_else(|| anyhow::anyhow!("Unknown status: {}", w[1]))?,
        ),
        None => TaskQuery::default(),
    };
    if args.iter().any(|a| a == "--by-priority") {
        query.order = TaskOrder::Priority;
    }

    let tasks = planner.list_tasks(&query)?;
    if tasks.is_empty() {
        println!("No tasks");
        return Ok(());
    }

    println!(
        "{:<4} {:<3} {:<24} {:<12} {:>16}  Created",
        "ID", "Pri", "Name", "Status", "Estimate"
    );
    println!("{}", "─".repeat(80));
    for task in &tasks {
        println!(
            "{:<4} {:<3} {:<24} {:<12} {:>16}  {}",
            task.id,
            task.priority,
            truncate(&task.name, 24),
            task.status.label(),
            format_brl(task.estimate),
            format_timestamp(task.created_at),
        );
    }
    Ok(())
}

fn cli_add_task(args: &[String], planner: &mut WeddingPlanner) -> Result<()> {
    let [name, description, priority, rest @ ..] = args else {
        anyhow::bail!(
            "Usage: weddingtui add-task <name> <description> <priority {MIN_PRIORITY}-{MAX_PRIORITY}> [estimate]"
        );
    };
    let priority: i64 = priority.parse().with_context(|| {
        format!("Priority must be a number from {MIN_PRIORITY} to {MAX_PRIORITY} (got '{priority}')")
    })?;
    let estimate = rest.first().map_or("", String::as_str);

    let form = TaskForm::new(name, description, priority).with_estimate(estimate);
    let task = planner.create_task(&form)?;
    println!("Added task #{}: {}", task.id, task.name);
    Ok(())
}

fn cli_delete_task(args: &[String], planner: &mut WeddingPlanner) -> Result<()> {
    let id = parse_id(args.first(), "delete-task <id>")?;
    let removed = planner.delete_task(id)?;
    println!("Deleted task #{id} ({removed} quotes removed)");
    Ok(())
}

fn cli_quotes(args: &[String], planner: &mut WeddingPlanner) -> Result<()> {
    let task_id = parse_id(args.first(), "quotes <task-id>")?;
    let task = planner.get_task(task_id)?;
    let quotes = planner.list_quotes_for_task(task_id)?;

    println!("Quotes for #{}: {}", task.id, task.name);
    if quotes.is_empty() {
        println!("No quotes");
        return Ok(());
    }

    println!(
        "{:<4} {:<24} {:>16}  {:<13} Description",
        "ID", "Vendor", "Amount", "Status"
    );
    println!("{}", "─".repeat(80));
    for quote in &quotes {
        println!(
            "{:<4} {:<24} {:>16}  {:<13} {}",
            quote.id,
            truncate(&quote.vendor, 24),
            format_brl(quote.amount),
            quote.status.label(),
            quote.description,
        );
    }
    Ok(())
}

fn cli_add_quote(args: &[String], planner: &mut WeddingPlanner) -> Result<()> {
    let [task_id, vendor, amount, rest @ ..] = args else {
        anyhow::bail!("Usage: weddingtui add-quote <task-id> <vendor> <amount> [description]");
    };
    let task_id: i64 = task_id
        .parse()
        .with_context(|| format!("Invalid task id '{task_id}'"))?;
    let description = rest.first().map_or("", String::as_str);

    let quote = planner.create_quote(task_id, vendor, description, amount)?;
    println!(
        "Added quote #{} from {}: {}",
        quote.id,
        quote.vendor,
        format_brl(quote.amount)
    );
    Ok(())
}

fn cli_expenses(planner: &mut WeddingPlanner) -> Result<()> {
    let expenses = planner.list_expenses()?;
    if expenses.is_empty() {
        println!("No expenses");
        return Ok(());
    }

    println!("{:<4} {:<17} {:<32} {:>16}", "ID", "Date", "Description", "Amount");
    println!("{}", "─".repeat(72));
    for expense in &expenses {
        println!(
            "{:<4} {:<17} {:<32} {:>16}",
            expense.id,
            format_timestamp(expense.created_at),
            truncate(&expense.description, 32),
            format_brl(expense.amount),
        );
    }
    println!("{}", "─".repeat(72));
    println!("{:<55} {:>16}", "Total", format_brl(planner.sum_expenses()?));
    Ok(())
}

fn cli_add_expense(args: &[String], planner: &mut WeddingPlanner) -> Result<()> {
    let [description, amount] = args else {
        anyhow::bail!("Usage: weddingtui add-expense <description> <amount>");
    };
    let expense = planner.create_expense(description, amount)?;
    println!(
        "Recorded expense #{}: {} {}",
        expense.id,
        expense.description,
        format_brl(expense.amount)
    );
    Ok(())
}

fn cli_summary(planner: &mut WeddingPlanner) -> Result<()> {
    let summary = planner.financial_summary()?;

    println!("WeddingTUI - Finances");
    println!("{}", "─".repeat(40));
    match summary.budget {
        Some(budget) => println!("  Budget:     {}", format_brl(budget)),
        None => println!("  Budget:     (not set)"),
    }
    println!("  Spent:      {}", format_brl(summary.total_spent));
    if let Some(balance) = summary.balance() {
        println!("  Balance:    {}", format_brl(balance));
    }
    println!("  Expenses:   {}", summary.expense_count);
    if summary.is_over_budget() {
        println!();
        println!("Over budget!");
    }
    Ok(())
}

fn cli_budget(args: &[String], planner: &mut WeddingPlanner) -> Result<()> {
    match args.first().map(String::as_str) {
        None => {
            let summary = planner.financial_summary()?;
            match summary.budget {
                Some(budget) => println!("Budget: {}", format_brl(budget)),
                None => println!("No budget set"),
            }
        }
        Some("clear") => {
            planner.clear_budget()?;
            println!("Budget cleared");
        }
        Some(amount) => {
            let budget = planner.set_budget(amount)?;
            println!("Budget set: {}", format_brl(budget));
        }
    }
    Ok(())
}

fn cli_export(args: &[String], planner: &mut WeddingPlanner) -> Result<()> {
    let output_path = args
        .first()
        .filter(|a| !a.starts_with('-'))
        .map(|a| export::expand_home(a))
        .unwrap_or_else(export::default_export_path);

    let expenses = planner.list_expenses()?;
    let count = export::export_expenses(Path::new(&output_path), &expenses)?;
    if count == 0 {
        println!("No expenses yet; wrote an empty export to {output_path}");
    } else {
        println!("Exported {count} expenses to {output_path}");
    }
    Ok(())
}
