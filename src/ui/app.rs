use anyhow::Result;

use crate::db::Database;
use crate::error::Error;
use crate::models::*;
use crate::planner::Planner;

/// The planner as the TUI and CLI drive it.
pub(crate) type WeddingPlanner = Planner<Database>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Tasks,
    Quotes,
    Finance,
}

impl Screen {
    pub(crate) fn all() -> &'static [Screen] {
        &[Self::Tasks, Self::Quotes, Self::Finance]
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Tasks => write!(f, "Tasks"),
            Self::Quotes => write!(f, "Quotes"),
            Self::Finance => write!(f, "Finance"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Normal,
    Command,
    Editing,
    Confirm,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Command => write!(f, "COMMAND"),
            Self::Editing => write!(f, "EDIT"),
            Self::Confirm => write!(f, "CONFIRM"),
        }
    }
}

/// Pending action that requires user confirmation.
#[derive(Debug, Clone)]
pub(crate) enum PendingAction {
    DeleteTask { id: i64, name: String },
}

pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) screen: Screen,
    pub(crate) input_mode: InputMode,
    pub(crate) command_input: String,
    pub(crate) status_message: String,
    pub(crate) show_help: bool,

    // Tasks
    pub(crate) tasks: Vec<Task>,
    pub(crate) task_index: usize,
    pub(crate) task_scroll: usize,
    pub(crate) task_query: TaskQuery,
    /// Task being edited in `InputMode::Editing`.
    pub(crate) editing_task: Option<i64>,

    // Quotes (for one task)
    pub(crate) quote_task: Option<Task>,
    pub(crate) quotes: Vec<Quote>,
    pub(crate) quote_index: usize,
    pub(crate) quote_scroll: usize,

    // Finance
    pub(crate) expenses: Vec<Expense>,
    pub(crate) expense_index: usize,
    pub(crate) expense_scroll: usize,
    pub(crate) summary: FinancialSummary,

    // Confirmation
    pub(crate) pending_action: Option<PendingAction>,
    pub(crate) confirm_message: String,

    // Layout (updated each render frame)
    pub(crate) visible_rows: usize,
}

impl App {
    pub(crate) fn new() -> Self {
        Self {
            running: true,
            screen: Screen::Tasks,
            input_mode: InputMode::Normal,
            command_input: String::new(),
            status_message: String::new(),
            show_help: false,

            tasks: Vec::new(),
            task_index: 0,
            task_scroll: 0,
            task_query: TaskQuery::default(),
            editing_task: None,

            quote_task: None,
            quotes: Vec::new(),
            quote_index: 0,
            quote_scroll: 0,

            expenses: Vec::new(),
            expense_index: 0,
            expense_scroll: 0,
            summary: FinancialSummary::default(),

            pending_action: None,
            confirm_message: String::new(),

            visible_rows: 20,
        }
    }

    pub(crate) fn refresh_tasks(&mut self, planner: &WeddingPlanner) -> Result<()> {
        self.tasks = planner.list_tasks(&self.task_query)?;
        clamp_cursor(&mut self.task_index, &mut self.task_scroll, self.tasks.len());
        Ok(())
    }

    /// Re-read the quotes of the task on the Quotes screen. A task that has
    /// been deleted since is dropped from view.
    pub(crate) fn refresh_quotes(&mut self, planner: &WeddingPlanner) -> Result<()> {
        let Some(task_id) = self.quote_task.as_ref().map(|t| t.id) else {
            self.quotes.clear();
            return Ok(());
        };
        match planner.list_quotes_for_task(task_id) {
            Ok(quotes) => {
                self.quote_task = Some(planner.get_task(task_id)?);
                self.quotes = quotes;
            }
            Err(Error::NotFound { .. }) => {
                self.quote_task = None;
                self.quotes.clear();
            }
            Err(e) => return Err(e.into()),
        }
        clamp_cursor(&mut self.quote_index, &mut self.quote_scroll, self.quotes.len());
        Ok(())
    }

    pub(crate) fn refresh_finance(&mut self, planner: &WeddingPlanner) -> Result<()> {
        self.expenses = planner.list_expenses()?;
        self.summary = planner.financial_summary()?;
        clamp_cursor(
            &mut self.expense_index,
            &mut self.expense_scroll,
            self.expenses.len(),
        );
        Ok(())
    }

    pub(crate) fn refresh_all(&mut self, planner: &WeddingPlanner) -> Result<()> {
        self.refresh_tasks(planner)?;
        self.refresh_quotes(planner)?;
        self.refresh_finance(planner)?;
        Ok(())
    }

    pub(crate) fn selected_task(&self) -> Option<&Task> {
        self.tasks.get(self.task_index)
    }

    pub(crate) fn selected_quote(&self) -> Option<&Quote> {
        self.quotes.get(self.quote_index)
    }

    /// Show the quotes of the task under the cursor.
    pub(crate) fn open_quotes(&mut self, planner: &WeddingPlanner) -> Result<()> {
        let Some(task) = self.selected_task().cloned() else {
            self.set_status("No task selected");
            return Ok(());
        };
        if self.quote_task.as_ref().map(|t| t.id) != Some(task.id) {
            self.quote_index = 0;
            self.quote_scroll = 0;
        }
        self.set_status(format!("Quotes for: {}", task.name));
        self.quote_task = Some(task);
        self.screen = Screen::Quotes;
        self.refresh_quotes(planner)
    }

    /// Rows available to a table body (borders and header excluded).
    pub(crate) fn table_page(&self) -> usize {
        self.visible_rows.saturating_sub(3).max(1)
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }
}

/// Keep a cursor inside a list that may have shrunk.
fn clamp_cursor(index: &mut usize, scroll: &mut usize, len: usize) {
    if *index >= len {
        *index = len.saturating_sub(1);
    }
    if *scroll > *index {
        *scroll = *index;
    }
}
