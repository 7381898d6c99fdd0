use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
};

use super::app::{AppMode, DashboardApp, Speaker};
use crate::commands::truncate;

pub fn render(frame: &mut Frame, app: &DashboardApp) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Length(3), // Stats
            Constraint::Min(1),    // Items and chat
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    render_stats(frame, app, chunks[1]);

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[2]);
    render_items(frame, app, panes[0]);
    render_chat(frame, app, panes[1]);

    render_status_bar(frame, app, chunks[3]);

    if app.mode == AppMode::AddItem {
        render_add_popup(frame, app);
    }
}

fn render_header(frame: &mut Frame, app: &DashboardApp, area: Rect) {
    let dirty = if app.dirty { "  [unsaved]" } else { "" };
    let title = format!("inv dashboard - {}{}", app.session.gateway().base_url(), dirty);
    let header =
        Paragraph::new(title).style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
    frame.render_widget(header, area);
}

fn render_stats(frame: &mut Frame, app: &DashboardApp, area: Rect) {
    let stats = &app.stats;
    let mut spans = vec![
        Span::styled("Items ", Style::default().fg(Color::DarkGray)),
        Span::raw(stats.total_items.to_string()),
        Span::styled("  Units ", Style::default().fg(Color::DarkGray)),
        Span::raw(stats.total_quantity.to_string()),
    ];
    for (category, totals) in &stats.categories {
        spans.push(Span::styled(
            format!("  {category} "),
            Style::default().fg(Color::DarkGray),
        ));
        spans.push(Span::raw(totals.quantity.to_string()));
    }

    let paragraph = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).title("Stats"));
    frame.render_widget(paragraph, area);
}

fn render_items(frame: &mut Frame, app: &DashboardApp, area: Rect) {
    let header = Row::new(["Name", "Qty", "Category", "Added"])
        .style(Style::default().add_modifier(Modifier::BOLD));

    let rows = app.items.iter().map(|item| {
        Row::new([
            Cell::from(truncate(&item.name, 28)),
            Cell::from(item.quantity.to_string()),
            Cell::from(truncate(item.category_label(), 18)),
            Cell::from(item.date_added.format("%Y-%m-%d").to_string()),
        ])
    });

    let border = if app.mode == AppMode::Browse {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    };
    let table = Table::new(
        rows,
        [
            Constraint::Min(12),
            Constraint::Length(5),
            Constraint::Length(18),
            Constraint::Length(10),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title("Inventory"),
    )
    .row_highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .highlight_symbol("> ");

    let mut state = TableState::default();
    if !app.items.is_empty() {
        state.select(Some(app.selected));
    }
    frame.render_stateful_widget(table, area, &mut state);
}

fn render_chat(frame: &mut Frame, app: &DashboardApp, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(3)])
        .split(area);

    let mut lines: Vec<Line> = Vec::new();
    for (speaker, text) in &app.chat {
        let (label, style) = match speaker {
            Speaker::User => ("You", Style::default().fg(Color::Green)),
            Speaker::Assistant => ("Assistant", Style::default().fg(Color::Blue)),
        };
        lines.push(Line::from(Span::styled(
            format!("{label}:"),
            style.add_modifier(Modifier::BOLD),
        )));
        for line in text.lines() {
            lines.push(Line::from(format!("  {line}")));
        }
        lines.push(Line::from(""));
    }

    // Keep the newest message in view unless scrolled back.
    let visible_height = chunks[0].height.saturating_sub(2) as usize;
    let scroll = lines
        .len()
        .saturating_sub(visible_height)
        .saturating_sub(app.chat_scroll as usize);

    let border = if app.mode == AppMode::Chat {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    };
    let messages = Paragraph::new(Text::from(lines))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title("Assistant"),
        )
        .wrap(Wrap { trim: false })
        .scroll((scroll as u16, 0));
    frame.render_widget(messages, chunks[0]);

    if app.mode == AppMode::Chat {
        render_input(frame, &app.input, "Ask about your inventory...", chunks[1]);
    } else {
        let hint = Paragraph::new("Tab to chat")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(hint, chunks[1]);
    }
}

fn render_input(frame: &mut Frame, input: &str, placeholder: &str, area: Rect) {
    let (text, style) = if input.is_empty() {
        (placeholder, Style::default().fg(Color::DarkGray))
    } else {
        (input, Style::default())
    };
    let paragraph = Paragraph::new(text)
        .style(style)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(paragraph, area);

    let cursor_x = area.x + 1 + input.chars().count() as u16;
    frame.set_cursor_position((cursor_x, area.y + 1));
}

fn render_status_bar(frame: &mut Frame, app: &DashboardApp, area: Rect) {
    let line = if app.pending > 0 {
        Line::from(Span::styled(
            "Working...",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::ITALIC),
        ))
    } else if let Some(notice) = &app.notice {
        let color = if notice.is_error { Color::Red } else { Color::Green };
        Line::from(Span::styled(notice.text.as_str(), Style::default().fg(color)))
    } else {
        let keys = match app.mode {
            AppMode::Browse => {
                "↑/↓: Select  +/-: Qty  a: Add  d: Delete  s: Save  r: Reload  Tab: Chat  Esc: Quit"
            }
            AppMode::AddItem => "Enter: Add  Esc: Cancel",
            AppMode::Chat => "Enter: Send  Ctrl+↑/↓: Scroll  Tab/Esc: Back",
        };
        Line::from(Span::styled(keys, Style::default().fg(Color::DarkGray)))
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn render_add_popup(frame: &mut Frame, app: &DashboardApp) {
    let area = centered_rect(50, 30, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default().borders(Borders::ALL).title("Add item");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(3)])
        .split(inner);
    let help = Paragraph::new("Name; description and category are looked up")
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, chunks[0]);
    render_input(frame, &app.input, "Item name", chunks[1]);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
