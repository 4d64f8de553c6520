//! Calculator and settings panels.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Padding, Paragraph},
};

use tlapal_engine::{App, CalculatorMode, InputMode, format_liters, format_m3};

use crate::theme::{Glyphs, Palette, styles};
use crate::{field_block, scroll_to_cursor};

const NUMBER_PLACEHOLDER: &str = "0.0";
const KEY_PLACEHOLDER: &str = "Pega tu clave aqui...";
const FIELD_HEIGHT: u16 = 3;
const RESULT_HEIGHT: u16 = 5;

fn panel_block(palette: &Palette) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.border))
        .padding(Padding::horizontal(2))
}

fn heading(title: &'static str, subtitle: &'static str, palette: &Palette) -> Paragraph<'static> {
    Paragraph::new(vec![
        Line::from(Span::styled(title, styles::title(palette))),
        Line::from(Span::styled(
            subtitle,
            Style::default().fg(palette.text_muted),
        )),
    ])
}

fn field_title(label: &str, focused: bool, palette: &Palette, glyphs: &Glyphs) -> Line<'static> {
    if focused {
        Line::from(Span::styled(
            format!(" {} {label} ", glyphs.selected),
            styles::field_focused(palette).add_modifier(Modifier::BOLD),
        ))
    } else {
        Line::from(Span::styled(
            format!(" {label} "),
            Style::default().fg(palette.text_muted),
        ))
    }
}

/// Contents of a one-line text field.
struct TextField<'a> {
    text: &'a str,
    cursor_byte: usize,
    placeholder: &'a str,
    editing: bool,
}

/// Draw a one-line text field. Returns the cursor position while editing.
fn draw_text_field(
    frame: &mut Frame,
    area: Rect,
    block: Block<'_>,
    field: &TextField<'_>,
    palette: &Palette,
) -> Option<(u16, u16)> {
    let inner = block.inner(area);

    let (line, column) = if field.text.is_empty() {
        (
            Line::from(Span::styled(
                field.placeholder.to_string(),
                Style::default().fg(palette.text_muted),
            )),
            0,
        )
    } else {
        let (shown, column) =
            scroll_to_cursor(field.text, field.cursor_byte, inner.width as usize);
        (
            Line::from(Span::styled(
                shown,
                Style::default()
                    .fg(palette.text_primary)
                    .add_modifier(Modifier::BOLD),
            )),
            column,
        )
    };
    frame.render_widget(Paragraph::new(line).block(block), area);

    field
        .editing
        .then(|| (inner.x.saturating_add(column), inner.y))
}

// ----------------------------------------------------------------------------
// Calculators
// ----------------------------------------------------------------------------

pub(crate) fn draw_calculators(
    frame: &mut Frame,
    app: &App,
    area: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    let block = panel_block(palette);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let calculators = app.calculators();
    let fields = calculators.mode().fields();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),                                 // Heading
            Constraint::Length(3),                                 // Mode buttons
            Constraint::Length(FIELD_HEIGHT * fields.len() as u16), // Fields
            Constraint::Length(RESULT_HEIGHT),                     // Result
            Constraint::Min(0),
        ])
        .split(inner);

    frame.render_widget(
        heading(
            "HERRAMIENTAS PRO",
            "Cálculos exactos para evitar desperdicio.",
            palette,
        ),
        chunks[0],
    );
    draw_mode_buttons(frame, calculators.mode(), chunks[1], palette);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(FIELD_HEIGHT); fields.len()])
        .split(chunks[2]);

    let editing = app.input_mode() == InputMode::Insert;
    let ascii = app.ui_options().ascii_only;
    let mut cursor = None;
    for (field, row) in fields.iter().zip(rows.iter()) {
        let focused = calculators.focused_field() == *field;
        let title = field_title(field.label(), focused, palette, glyphs);
        let block = field_block(title, focused, palette);

        match calculators.draft(*field) {
            Some(draft) => {
                let position = draw_text_field(
                    frame,
                    *row,
                    block,
                    &TextField {
                        text: draft.text(),
                        cursor_byte: draft.byte_index(),
                        placeholder: NUMBER_PLACEHOLDER,
                        editing: editing && focused,
                    },
                    palette,
                );
                cursor = cursor.or(position);
            }
            None => {
                let label = calculators.paint().coats.label();
                let shown = if ascii {
                    format!("< {label} >")
                } else {
                    format!("‹ {label} ›")
                };
                let selector = Paragraph::new(Line::from(Span::styled(
                    shown,
                    Style::default()
                        .fg(palette.text_primary)
                        .add_modifier(Modifier::BOLD),
                )))
                .block(block);
                frame.render_widget(selector, *row);
            }
        }
    }

    match calculators.mode() {
        CalculatorMode::Concrete => draw_concrete_result(frame, app, chunks[3], palette),
        CalculatorMode::Paint => draw_paint_result(frame, app, chunks[3], palette),
    }

    if let Some(position) = cursor {
        frame.set_cursor_position(position);
    }
}

fn draw_mode_buttons(frame: &mut Frame, active: CalculatorMode, area: Rect, palette: &Palette) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    for (mode, key, column) in [
        (CalculatorMode::Concrete, "c", columns[0]),
        (CalculatorMode::Paint, "p", columns[1]),
    ] {
        let selected = mode == active;
        let (border, label_style) = if selected {
            (
                Style::default().fg(palette.primary),
                styles::nav_active(palette),
            )
        } else {
            (
                Style::default().fg(palette.border),
                styles::nav_inactive(palette),
            )
        };
        let button = Paragraph::new(Line::from(vec![
            Span::styled(format!("[{key}] "), styles::key_hint(palette)),
            Span::styled(format!(" {} ", mode.label()), label_style),
        ]))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(border),
        );
        frame.render_widget(button, column);
    }
}

fn result_block(palette: &Palette) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Thick)
        .border_style(Style::default().fg(palette.primary))
        .style(Style::default().bg(palette.bg_panel))
}

fn result_label(text: &'static str, palette: &Palette) -> Line<'static> {
    Line::from(Span::styled(
        text,
        Style::default()
            .fg(palette.text_muted)
            .add_modifier(Modifier::BOLD),
    ))
}

fn draw_concrete_result(frame: &mut Frame, app: &App, area: Rect, palette: &Palette) {
    let estimate = app.calculators().concrete_estimate();
    let unit = if app.ui_options().ascii_only { "m3" } else { "m³" };

    let result = Paragraph::new(vec![
        result_label("VOLUMEN NECESARIO", palette),
        Line::from(vec![
            Span::styled(format_m3(estimate.total_m3), styles::result_value(palette)),
            Span::styled(
                format!(" {unit}"),
                Style::default()
                    .fg(palette.primary_light)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(Span::styled(
            format!("sin desperdicio: {} {unit}", format_m3(estimate.volume_m3)),
            Style::default().fg(palette.text_muted),
        )),
    ])
    .alignment(Alignment::Center)
    .block(result_block(palette));
    frame.render_widget(result, area);
}

fn draw_paint_result(frame: &mut Frame, app: &App, area: Rect, palette: &Palette) {
    let estimate = app.calculators().paint_estimate();
    let block = result_block(palette);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(inner);

    for (label, value, column) in [
        ("LITROS", format_liters(estimate.liters), columns[0]),
        ("CUBETAS (19 L)", format_liters(estimate.containers), columns[1]),
    ] {
        let cell = Paragraph::new(vec![
            result_label(label, palette),
            Line::from(Span::styled(value, styles::result_value(palette))),
        ])
        .alignment(Alignment::Center);
        frame.render_widget(cell, column);
    }
}

// ----------------------------------------------------------------------------
// Settings
// ----------------------------------------------------------------------------

fn masked(count: usize, glyphs: &Glyphs) -> String {
    std::iter::repeat_n(glyphs.mask, count).collect()
}

pub(crate) fn draw_settings(
    frame: &mut Frame,
    app: &App,
    area: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    let block = panel_block(palette);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),            // Heading
            Constraint::Length(FIELD_HEIGHT), // Key field
            Constraint::Length(1),            // Notice
            Constraint::Length(1),            // Storage note
            Constraint::Length(1),            // Warning
            Constraint::Min(0),
        ])
        .split(inner);

    frame.render_widget(
        heading(
            "SEGURIDAD",
            "La clave autoriza las consultas al asistente.",
            palette,
        ),
        chunks[0],
    );

    let editing = app.input_mode() == InputMode::Insert;
    let title = field_title("Gemini API Key", editing, palette, glyphs);
    let block = field_block(title, editing, palette);

    // Editing shows the draft; otherwise the stored key, both masked.
    let (text, cursor_byte) = if editing {
        let draft = app.settings().draft();
        (
            masked(draft.grapheme_count(), glyphs),
            draft.cursor() * glyphs.mask.len_utf8(),
        )
    } else {
        let text = masked(app.session().credential().char_len(), glyphs);
        let len = text.len();
        (text, len)
    };
    let cursor = draw_text_field(
        frame,
        chunks[1],
        block,
        &TextField {
            text: &text,
            cursor_byte,
            placeholder: KEY_PLACEHOLDER,
            editing,
        },
        palette,
    );

    if let Some(notice) = app.settings().notice() {
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                notice.message(),
                Style::default().fg(palette.primary_light),
            ))),
            chunks[2],
        );
    }

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            "Esta clave solo vive en memoria mientras la app está abierta.",
            Style::default()
                .fg(palette.text_muted)
                .add_modifier(Modifier::ITALIC),
        ))),
        chunks[3],
    );
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            format!("{} NO COMPARTIR TU CLAVE API", glyphs.warning),
            Style::default()
                .fg(palette.error)
                .add_modifier(Modifier::BOLD),
        ))),
        chunks[4],
    );

    if let Some(position) = cursor {
        frame.set_cursor_position(position);
    }
}
