use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use tracing::{info, warn};

use crate::ui::app::{App, InputMode, Screen, WeddingPlanner};
use crate::ui::commands;
use crate::ui::util::{scroll_down, scroll_to_bottom, scroll_to_top, scroll_up};

pub(crate) fn as_tui(planner: &mut WeddingPlanner) -> Result<()> {
    let mut app = App::new();
    app.refresh_all(planner)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    info!("tui started");

    let result = run_app(&mut terminal, &mut app, planner);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        eprintln!("Error: {e:?}");
    }
    info!("tui stopped");

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    planner: &mut WeddingPlanner,
) -> Result<()> {
    while app.running {
        terminal.draw(|f| {
            let content_height = f.area().height.saturating_sub(3) as usize;
            app.visible_rows = content_height.max(1);
            crate::ui::render::render(f, app);
        })?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if app.show_help {
                app.show_help = false;
                continue;
            }
            let handled = match app.input_mode {
                InputMode::Normal => handle_normal_input(key, app, planner),
                InputMode::Command => handle_command_input(key, app, planner),
                InputMode::Editing => handle_editing_input(key, app, planner),
                InputMode::Confirm => handle_confirm_input(key, app, planner),
            };
            // Planner failures are reported, never fatal.
            if let Err(e) = handled {
                warn!(error = %e, "action failed");
                app.input_mode = InputMode::Normal;
                app.set_status(format!("Error: {e}"));
            }
        }
    }
    Ok(())
}

// ── Input handlers ───────────────────────────────────────────

fn handle_normal_input(
    key: event::KeyEvent,
    app: &mut App,
    planner: &mut WeddingPlanner,
) -> Result<()> {
    match key.code {
        KeyCode::Char(':') => {
            app.input_mode = InputMode::Command;
            app.command_input.clear();
        }
        KeyCode::Char('q') | KeyCode::Char('c')
            if key.modifiers.contains(KeyModifiers::CONTROL) =>
        {
            app.running = false;
        }
        KeyCode::Char('j') | KeyCode::Down => handle_move_down(app),
        KeyCode::Char('k') | KeyCode::Up => handle_move_up(app),
        KeyCode::Char('1') => switch_screen(app, planner, Screen::Tasks)?,
        KeyCode::Char('2') => switch_screen(app, planner, Screen::Quotes)?,
        KeyCode::Char('3') => switch_screen(app, planner, Screen::Finance)?,
        KeyCode::Tab => {
            let screens = Screen::all();
            let idx = screens.iter().position(|s| *s == app.screen).unwrap_or(0);
            let next = (idx + 1) % screens.len();
            switch_screen(app, planner, screens[next])?;
        }
        KeyCode::BackTab => {
            let screens = Screen::all();
            let idx = screens.iter().position(|s| *s == app.screen).unwrap_or(0);
            let prev = if idx == 0 { screens.len() - 1 } else { idx - 1 };
            switch_screen(app, planner, screens[prev])?;
        }
        KeyCode::Enter if app.screen == Screen::Tasks => app.open_quotes(planner)?,
        KeyCode::Esc if app.screen == Screen::Quotes => {
            switch_screen(app, planner, Screen::Tasks)?;
        }
        KeyCode::Esc => app.set_status(""),
        KeyCode::Char('g') => handle_goto_top(app),
        KeyCode::Char('G') => handle_goto_bottom(app),
        KeyCode::Char('?') => {
            app.show_help = true;
        }
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            let half_page = app.visible_rows / 2;
            for _ in 0..half_page {
                handle_move_down(app);
            }
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            let half_page = app.visible_rows / 2;
            for _ in 0..half_page {
                handle_move_up(app);
            }
        }
        KeyCode::Char('e') if app.screen == Screen::Tasks => {
            commands::handle_command("edit", app, planner)?;
        }
        KeyCode::Char('s') if app.screen == Screen::Tasks => {
            commands::handle_command("sort", app, planner)?;
        }
        KeyCode::Char('D') if matches!(app.screen, Screen::Tasks | Screen::Quotes) => {
            commands::handle_command("delete-task", app, planner)?;
        }
        KeyCode::Char('a') if app.screen == Screen::Quotes => {
            commands::handle_command("approve", app, planner)?;
        }
        KeyCode::Char('r') if app.screen == Screen::Quotes => {
            commands::handle_command("reject", app, planner)?;
        }
        KeyCode::Char('u') if app.screen == Screen::Quotes => {
            commands::handle_command("review", app, planner)?;
        }
        _ => {}
    }
    Ok(())
}

fn handle_command_input(
    key: event::KeyEvent,
    app: &mut App,
    planner: &mut WeddingPlanner,
) -> Result<()> {
    match key.code {
        KeyCode::Enter => {
            let input = app.command_input.clone();
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
            commands::handle_command(&input, app, planner)?;
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
        }
        KeyCode::Backspace => {
            app.command_input.pop();
            if app.command_input.is_empty() {
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.command_input.clear();
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Char('w') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            let trimmed = app.command_input.trim_end();
            if let Some(pos) = trimmed.rfind(' ') {
                app.command_input.truncate(pos + 1);
            } else {
                app.command_input.clear();
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char(c) => {
            app.command_input.push(c);
        }
        _ => {}
    }
    Ok(())
}

fn handle_editing_input(
    key: event::KeyEvent,
    app: &mut App,
    planner: &mut WeddingPlanner,
) -> Result<()> {
    match key.code {
        KeyCode::Enter => {
            let input = std::mem::take(&mut app.command_input);
            app.input_mode = InputMode::Normal;
            commands::submit_task_edit(&input, app, planner)?;
        }
        KeyCode::Esc => {
            app.command_input.clear();
            app.editing_task = None;
            app.input_mode = InputMode::Normal;
            app.set_status("Edit cancelled");
        }
        KeyCode::Backspace => {
            app.command_input.pop();
        }
        KeyCode::Char(c) => {
            app.command_input.push(c);
        }
        _ => {}
    }
    Ok(())
}

fn handle_confirm_input(
    key: event::KeyEvent,
    app: &mut App,
    planner: &mut WeddingPlanner,
) -> Result<()> {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            app.input_mode = InputMode::Normal;
            app.confirm_message.clear();
            commands::run_pending_action(app, planner)?;
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            app.pending_action = None;
            app.input_mode = InputMode::Normal;
            app.confirm_message.clear();
            app.set_status("Cancelled");
        }
        _ => {}
    }
    Ok(())
}

// ── Navigation helpers ───────────────────────────────────────

fn switch_screen(app: &mut App, planner: &mut WeddingPlanner, screen: Screen) -> Result<()> {
    app.screen = screen;
    match screen {
        Screen::Tasks => app.refresh_tasks(planner)?,
        Screen::Quotes => app.refresh_quotes(planner)?,
        Screen::Finance => app.refresh_finance(planner)?,
    }
    app.set_status(format!("{screen}"));
    Ok(())
}

fn handle_move_down(app: &mut App) {
    let page = app.table_page();
    match app.screen {
        Screen::Tasks => scroll_down(
            &mut app.task_index,
            &mut app.task_scroll,
            app.tasks.len(),
            page,
        ),
        Screen::Quotes => scroll_down(
            &mut app.quote_index,
            &mut app.quote_scroll,
            app.quotes.len(),
            page,
        ),
        Screen::Finance => scroll_down(
            &mut app.expense_index,
            &mut app.expense_scroll,
            app.expenses.len(),
            page,
        ),
    }
}

fn handle_move_up(app: &mut App) {
    match app.screen {
        Screen::Tasks => scroll_up(&mut app.task_index, &mut app.task_scroll),
        Screen::Quotes => scroll_up(&mut app.quote_index, &mut app.quote_scroll),
        Screen::Finance => scroll_up(&mut app.expense_index, &mut app.expense_scroll),
    }
}

fn handle_goto_top(app: &mut App) {
    match app.screen {
        Screen::Tasks => scroll_to_top(&mut app.task_index, &mut app.task_scroll),
        Screen::Quotes => scroll_to_top(&mut app.quote_index, &mut app.quote_scroll),
        Screen::Finance => scroll_to_top(&mut app.expense_index, &mut app.expense_scroll),
    }
}

fn handle_goto_bottom(app: &mut App) {
    let page = app.table_page();
    match app.screen {
        Screen::Tasks => scroll_to_bottom(
            &mut app.task_index,
            &mut app.task_scroll,
            app.tasks.len(),
            page,
        ),
        Screen::Quotes => scroll_to_bottom(
            &mut app.quote_index,
            &mut app.quote_scroll,
            app.quotes.len(),
            page,
        ),
        Screen::Finance => scroll_to_bottom(
            &mut app.expense_index,
            &mut app.expense_scroll,
            app.expenses.len(),
            page,
        ),
    }
}
