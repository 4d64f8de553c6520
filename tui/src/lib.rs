//! TUI rendering for TlapalIA using ratatui.

mod chat;
mod forms;
mod input;
mod theme;

pub use input::{InputPump, handle_events};
pub use theme::{Glyphs, Palette, glyphs, palette, spinner_frame, styles};

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Padding, Paragraph},
};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use tlapal_engine::{App, InputMode, TYPING_TEXT, Tab, VERSION_LABEL};

const SIDEBAR_WIDTH: u16 = 30;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let options = app.ui_options();
    let palette = palette(options);
    let glyphs = glyphs(options);
    // Clear with background color
    let bg_block = Block::default().style(Style::default().bg(palette.bg_dark));
    frame.render_widget(bg_block, frame.area());

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Min(1),    // Sidebar + panel
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(1)])
        .split(rows[0]);

    draw_sidebar(frame, app, columns[0], &palette, &glyphs);
    match app.tab() {
        Tab::Chat => chat::draw_chat(frame, app, columns[1], &palette, &glyphs),
        Tab::Calculators => forms::draw_calculators(frame, app, columns[1], &palette, &glyphs),
        Tab::Settings => forms::draw_settings(frame, app, columns[1], &palette, &glyphs),
    }
    draw_status_bar(frame, app, rows[1], &palette, &glyphs);
}

fn draw_sidebar(frame: &mut Frame, app: &App, area: Rect, palette: &Palette, glyphs: &Glyphs) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.border))
        .style(Style::default().bg(palette.bg_panel))
        .padding(Padding::horizontal(1));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(2)])
        .split(inner);

    let mut lines = vec![
        Line::from(Span::styled("TlapalIA", styles::title(palette))),
        Line::from(Span::styled(
            "LOS PINOS",
            Style::default()
                .fg(palette.primary_light)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    for tab in Tab::ALL {
        let number = tab.index() + 1;
        let line = if tab == app.tab() {
            Span::styled(
                format!("{} {number} {}", glyphs.selected, tab.label()),
                styles::nav_active(palette),
            )
        } else {
            Span::styled(
                format!("  {number} {}", tab.label()),
                styles::nav_inactive(palette),
            )
        };
        lines.push(Line::from(line));
    }
    frame.render_widget(Paragraph::new(lines), parts[0]);

    let credential = if app.session().credential().is_empty() {
        Span::styled(
            format!("{} Sin clave API", glyphs.status_missing),
            Style::default().fg(palette.error),
        )
    } else {
        Span::styled(
            format!("{} Clave lista", glyphs.status_ready),
            Style::default().fg(palette.primary_light),
        )
    };
    let footer = Paragraph::new(vec![
        Line::from(credential),
        Line::from(Span::styled(
            VERSION_LABEL,
            Style::default().fg(palette.text_muted),
        )),
    ]);
    frame.render_widget(footer, parts[1]);
}

fn key_hints(app: &App) -> &'static [(&'static str, &'static str)] {
    match (app.input_mode(), app.tab()) {
        (InputMode::Normal, Tab::Chat) => &[
            ("i", "escribir"),
            ("1-3", "panel"),
            ("Tab", "siguiente"),
            ("q", "salir"),
        ],
        (InputMode::Normal, Tab::Calculators) => &[
            ("c/p", "calculadora"),
            ("j/k", "campo"),
            ("i", "editar"),
            ("1-3", "panel"),
            ("q", "salir"),
        ],
        (InputMode::Normal, Tab::Settings) => {
            &[("i", "editar clave"), ("1-3", "panel"), ("q", "salir")]
        }
        (InputMode::Insert, Tab::Chat) => &[
            ("Enter", "enviar"),
            ("Shift+Enter", "nueva línea"),
            ("Esc", "volver"),
        ],
        (InputMode::Insert, Tab::Calculators) => {
            &[("Tab", "siguiente campo"), ("Esc", "volver")]
        }
        (InputMode::Insert, Tab::Settings) => &[
            ("Enter", "guardar"),
            ("Ctrl+V", "pegar"),
            ("Ctrl+U", "borrar"),
            ("Esc", "cancelar"),
        ],
    }
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect, palette: &Palette, glyphs: &Glyphs) {
    let (mode_text, mode_style) = match app.input_mode() {
        InputMode::Normal => (" NAVEGAR ", styles::mode_normal(palette)),
        InputMode::Insert => (" EDITAR ", styles::mode_insert(palette)),
    };

    let mut spans = vec![Span::styled(mode_text, mode_style), Span::raw(" ")];
    for (idx, (key, action)) in key_hints(app).iter().enumerate() {
        if idx > 0 {
            spans.push(Span::styled("  ", styles::key_hint(palette)));
        }
        spans.push(Span::styled(*key, styles::key_highlight(palette)));
        spans.push(Span::styled(format!(" {action}"), styles::key_hint(palette)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);

    // The chat panel has its own indicator.
    if app.chat().is_waiting() && app.tab() != Tab::Chat {
        let spinner = spinner_frame(app.tick_count(), app.ui_options());
        let pending = Paragraph::new(Line::from(vec![
            Span::styled(
                format!("{} ", glyphs.assistant),
                styles::assistant_name(palette),
            ),
            Span::styled(
                format!("{spinner} {TYPING_TEXT} "),
                Style::default().fg(palette.primary_light),
            ),
        ]))
        .alignment(Alignment::Right);
        frame.render_widget(pending, area);
    }
}

/// Rounded block used by every input field.
pub(crate) fn field_block<'a>(title: Line<'a>, focused: bool, palette: &Palette) -> Block<'a> {
    let border_style = if focused {
        styles::field_focused(palette)
    } else {
        Style::default().fg(palette.border)
    };
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border_style)
        .title_top(title)
        .padding(Padding::horizontal(1))
}

/// Visible part of a single line and the cursor column inside it.
///
/// The text is scrolled horizontally so the cursor stays within `width`
/// columns. `cursor_byte` must sit on a grapheme boundary.
pub(crate) fn scroll_to_cursor(line: &str, cursor_byte: usize, width: usize) -> (String, u16) {
    let cursor_display_pos = line[..cursor_byte].width();
    if width == 0 || cursor_display_pos < width {
        return (line.to_string(), cursor_display_pos as u16);
    }

    let scroll_target = cursor_display_pos - width + 1;
    let mut byte_offset = line.len();
    let mut skipped_width = 0;
    for (idx, grapheme) in line.grapheme_indices(true) {
        if skipped_width >= scroll_target {
            byte_offset = idx;
            break;
        }
        skipped_width += grapheme.width();
    }
    (
        line[byte_offset..].to_string(),
        cursor_display_pos.saturating_sub(skipped_width) as u16,
    )
}
