//! Chat panel: header, transcript and message input.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Padding, Paragraph, Wrap},
};

use tlapal_engine::{App, InputMode, Role, TYPING_TEXT};
use tlapal_types::sanitize_terminal_text;

use crate::theme::{Glyphs, Palette, spinner_frame, styles};
use crate::{field_block, scroll_to_cursor};

const PLACEHOLDER: &str = "Haz una pregunta técnica...";
const MAX_INPUT_LINES: usize = 6;

pub(crate) fn draw_chat(
    frame: &mut Frame,
    app: &App,
    area: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    let draft_lines = app
        .chat()
        .draft()
        .text()
        .split('\n')
        .count()
        .clamp(1, MAX_INPUT_LINES) as u16;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),               // Header
            Constraint::Min(1),                  // Messages
            Constraint::Length(draft_lines + 2), // Input
        ])
        .split(area);

    draw_header(frame, chunks[0], palette, glyphs);
    draw_messages(frame, app, chunks[1], palette, glyphs);
    draw_input(frame, app, chunks[2], palette);
}

fn draw_header(frame: &mut Frame, area: Rect, palette: &Palette, glyphs: &Glyphs) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.border))
        .style(Style::default().bg(palette.bg_panel))
        .padding(Padding::horizontal(1));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let title = Paragraph::new(Line::from(vec![
        Span::styled("MOSTRADOR DIGITAL", styles::title(palette)),
        Span::styled(
            "  Atención en Línea",
            Style::default().fg(palette.text_muted),
        ),
    ]));
    frame.render_widget(title, inner);

    let badge = Paragraph::new(Line::from(Span::styled(
        format!("{} Activo", glyphs.status_ready),
        Style::default()
            .fg(palette.primary_light)
            .add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Right);
    frame.render_widget(badge, inner);
}

fn message_lines(app: &App, palette: &Palette, glyphs: &Glyphs) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    for (idx, message) in app.chat().transcript().messages().iter().enumerate() {
        if idx > 0 {
            lines.push(Line::from(""));
        }

        let (icon, name, name_style, text_style) = match message.role() {
            Role::User => (
                glyphs.user,
                "Tú",
                styles::user_name(palette),
                Style::default().fg(palette.text_primary),
            ),
            Role::Assistant => (
                glyphs.assistant,
                "TlapalIA",
                styles::assistant_name(palette),
                Style::default().fg(palette.text_secondary),
            ),
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{icon} "), name_style),
            Span::styled(name, name_style),
        ]));

        let content = sanitize_terminal_text(message.text());
        for text_line in content.lines() {
            lines.push(Line::from(Span::styled(format!("  {text_line}"), text_style)));
        }
    }

    if app.chat().is_waiting() {
        let spinner = spinner_frame(app.tick_count(), app.ui_options());
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("{spinner} {TYPING_TEXT}"),
            Style::default()
                .fg(palette.text_muted)
                .add_modifier(Modifier::ITALIC),
        )));
    }

    lines
}

fn draw_messages(frame: &mut Frame, app: &App, area: Rect, palette: &Palette, glyphs: &Glyphs) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.border))
        .padding(Padding::horizontal(1));
    let inner = block.inner(area);

    let paragraph = Paragraph::new(message_lines(app, palette, glyphs)).wrap(Wrap { trim: false });

    // Pin to the newest message.
    let total = paragraph.line_count(inner.width.max(1));
    let scroll = total.saturating_sub(inner.height as usize);
    let scroll = u16::try_from(scroll).unwrap_or(u16::MAX);

    frame.render_widget(paragraph.block(block).scroll((scroll, 0)), area);
}

fn draw_input(frame: &mut Frame, app: &App, area: Rect, palette: &Palette) {
    let draft = app.chat().draft();
    let editing = app.input_mode() == InputMode::Insert;
    let title = Line::from(Span::styled(" Mensaje ", styles::title(palette)));
    let block = field_block(title, editing, palette);
    let inner = block.inner(area);

    let text = draft.text();
    if text.is_empty() {
        let placeholder = Paragraph::new(Line::from(Span::styled(
            PLACEHOLDER,
            Style::default().fg(palette.text_muted),
        )))
        .block(block);
        frame.render_widget(placeholder, area);
        if editing {
            frame.set_cursor_position((inner.x, inner.y));
        }
        return;
    }

    let cursor_byte = draft.byte_index();
    let before_cursor = &text[..cursor_byte];
    let cursor_line = before_cursor.matches('\n').count();
    let cursor_line_start = before_cursor.rfind('\n').map_or(0, |i| i + 1);

    let raw_lines: Vec<&str> = text.split('\n').collect();
    let visible = (inner.height as usize).max(1);
    let start = (cursor_line + 1).saturating_sub(visible);
    let end = (start + visible).min(raw_lines.len());
    let text_style = Style::default().fg(palette.text_primary);

    let mut cursor_pos = None;
    let mut lines = Vec::with_capacity(end - start);
    for (row, line) in raw_lines[start..end].iter().enumerate() {
        if start + row == cursor_line {
            let (shown, column) =
                scroll_to_cursor(line, cursor_byte - cursor_line_start, inner.width as usize);
            cursor_pos = Some((
                inner.x.saturating_add(column),
                inner.y.saturating_add(row as u16),
            ));
            lines.push(Line::from(Span::styled(shown, text_style)));
        } else {
            lines.push(Line::from(Span::styled((*line).to_string(), text_style)));
        }
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);

    if editing && let Some(position) = cursor_pos {
        frame.set_cursor_position(position);
    }
}
