use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::app::{AppMode, DashboardApp};

pub fn handle_event(app: &mut DashboardApp, event: Event) {
    if let Event::Key(key) = event {
        if key.kind == KeyEventKind::Press {
            handle_key(app, key);
        }
    }
}

fn handle_key(app: &mut DashboardApp, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers == KeyModifiers::CONTROL {
        app.should_quit = true;
        return;
    }
    app.notice = None;
    match app.mode {
        AppMode::Browse => handle_browse_key(app, key),
        AppMode::AddItem => handle_add_key(app, key),
        AppMode::Chat => handle_chat_key(app, key),
    }
}

fn handle_browse_key(app: &mut DashboardApp, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Up | KeyCode::Char('k') => app.select_up(),
        KeyCode::Down | KeyCode::Char('j') => app.select_down(),
        KeyCode::Char('+') | KeyCode::Char('=') => app.adjust_quantity(1),
        KeyCode::Char('-') => app.adjust_quantity(-1),
        KeyCode::Char('a') => app.start_add(),
        KeyCode::Char('d') | KeyCode::Delete => app.delete_selected(),
        KeyCode::Char('s') => app.commit(),
        KeyCode::Char('r') => app.reload(),
        KeyCode::Tab => app.toggle_chat(),
        _ => {}
    }
}

fn handle_add_key(app: &mut DashboardApp, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.cancel_input(),
        KeyCode::Enter => app.submit_add(),
        KeyCode::Backspace => app.input_backspace(),
        KeyCode::Char(c) => app.input_char(c),
        _ => {}
    }
}

fn handle_chat_key(app: &mut DashboardApp, key: KeyEvent) {
    match (key.code, key.modifiers) {
        (KeyCode::Esc, _) | (KeyCode::Tab, _) => app.toggle_chat(),
        (KeyCode::Enter, _) => app.send_chat(),
        (KeyCode::Up, KeyModifiers::CONTROL) => app.scroll_up(),
        (KeyCode::Down, KeyModifiers::CONTROL) => app.scroll_down(),
        (KeyCode::Backspace, _) => app.input_backspace(),
        (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => app.input_char(c),
        _ => {}
    }
}
