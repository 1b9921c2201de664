//! Terminal rendering of the server picker screen

use ratatui::{prelude::*, widgets::*};

use crate::constants::{APP_NAME, APP_VERSION};
use crate::messages::ui_events::{InputMode, Panel};
use crate::messages::RenderState;
use crate::models::LoadStatus;

pub fn draw_ui(f: &mut Frame, state: &RenderState) {
    let area = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title
            Constraint::Length(3), // Source URL
            Constraint::Min(3),    // Server list
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    draw_title(f, chunks[0]);
    draw_source(f, state, chunks[1]);
    draw_servers(f, state, chunks[2]);
    draw_status_bar(f, state, chunks[3]);

    if state.show_help {
        draw_help_popup(f, area);
    }

    if state.show_reset_confirm {
        draw_reset_popup(f, area);
    }
}

fn draw_title(f: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled(
            format!(" {} ", APP_NAME),
            Style::default().fg(Color::Black).bg(Color::Cyan).bold(),
        ),
        Span::styled(format!(" v{} ", APP_VERSION), Style::default().fg(Color::DarkGray)),
    ]);
    f.render_widget(Paragraph::new(title), area);
}

/// Border style shared by focusable blocks
fn border_style(focused: bool, editing: bool) -> Style {
    if focused && editing {
        Style::default().fg(Color::Yellow)
    } else if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    }
}

fn draw_source(f: &mut Frame, state: &RenderState, area: Rect) {
    let is_focused = state.active_panel == Panel::Source;
    let editing = is_focused && state.input_mode == InputMode::Editing;

    let mut title = vec![Span::raw(" Server List Source ")];
    if !state.source_valid {
        title.push(Span::styled("(invalid URL) ", Style::default().fg(Color::Red).bold()));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(is_focused, editing))
        .title(Line::from(title));

    f.render_widget(Paragraph::new(state.source_url.as_str()).block(block), area);

    if editing {
        let column = state.source_url[..state.cursor_position.min(state.source_url.len())]
            .chars()
            .count() as u16;
        let max_x = area.x + area.width.saturating_sub(2);
        let cursor_x = (area.x + column + 1).min(max_x);
        f.set_cursor_position(Position::new(cursor_x, area.y + 1));
    }
}

fn draw_servers(f: &mut Frame, state: &RenderState, area: Rect) {
    let is_focused = state.active_panel == Panel::Servers;
    let status_color = match state.load_status {
        LoadStatus::Failed(_) => Color::Red,
        LoadStatus::Loading => Color::Yellow,
        _ => Color::DarkGray,
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(is_focused, false))
        .title(" Anisette Servers ")
        .title_bottom(
            Line::from(Span::styled(
                format!(" {} ", state.load_status.label()),
                Style::default().fg(status_color),
            ))
            .right_aligned(),
        );

    if state.servers.is_empty() {
        let content = match &state.load_status {
            LoadStatus::Loading => "Loading servers...",
            LoadStatus::Failed(_) => "Could not load the server list. Press 'r' to retry.",
            _ => "No servers. Press 'r' to refresh.",
        };
        let paragraph = Paragraph::new(content)
            .style(Style::default().fg(Color::DarkGray))
            .block(block)
            .wrap(Wrap { trim: false });
        f.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = state
        .servers
        .iter()
        .enumerate()
        .map(|(i, server)| {
            let marker = if state.is_selected(i) {
                Span::styled("✓ ", Style::default().fg(Color::Green).bold())
            } else {
                Span::raw("  ")
            };
            ListItem::new(vec![
                Line::from(vec![marker, Span::styled(server.name.clone(), Style::default().bold())]),
                Line::from(Span::styled(
                    format!("  {}", server.address),
                    Style::default().fg(Color::DarkGray),
                )),
            ])
        })
        .collect();

    let highlight_style = if is_focused {
        Style::default().fg(Color::Yellow).bold()
    } else {
        Style::default()
    };

    let list = List::new(items).block(block).highlight_style(highlight_style);

    let mut list_state = ListState::default();
    list_state.select(Some(state.highlighted));
    f.render_stateful_widget(list, area, &mut list_state);
}

fn draw_status_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    if let Some(notice) = &state.notice {
        let bar = Paragraph::new(format!(" {} ", notice)).style(Style::default().fg(Color::Red));
        f.render_widget(bar, area);
        return;
    }

    let status = if state.input_mode == InputMode::Editing {
        " ESC/Enter:done | arrows:move | every edit refreshes "
    } else {
        " Tab:panel | Enter:select | r:refresh | x:reset adi.pb | ?:help | q:back "
    };

    let bar = Paragraph::new(status).style(Style::default().fg(Color::DarkGray));
    f.render_widget(bar, area);
}

fn draw_help_popup(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);

    let help_text = r#"
 ANISETTE PICKER - Keyboard Shortcuts

 SERVERS
   ↑ / ↓ (k / j)      Move highlight
   Enter / Space      Select server

 SOURCE
   Tab / Shift+Tab    Switch panels
   e / Enter          Edit source URL
   Esc                Stop editing

 ACTIONS
   r                  Refresh servers
   Ctrl+X             Cancel refresh
   x                  Reset adi.pb
   q / Esc / b        Back

 Press any key to close...
"#;

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .style(Style::default().bg(Color::Black));

    let help = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(help, popup_area);
}

fn draw_reset_popup(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(50, 25, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .title(" Reset adi.pb ")
        .style(Style::default().bg(Color::Black));

    let text = "Delete the stored provisioning data and close?\n\n y: reset    n/Esc: cancel";
    let popup = Paragraph::new(text).block(block).wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(popup, popup_area);
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
