//! Field rendering utilities for forms

use crate::state::{FieldKind, FieldSpec, FieldValue};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Rows taken by one field box
pub const FIELD_HEIGHT: u16 = 3;

/// Rows taken by a multiline field box
pub const MULTILINE_FIELD_HEIGHT: u16 = 5;

pub fn field_height(spec: &FieldSpec) -> u16 {
    if spec.is_multiline {
        MULTILINE_FIELD_HEIGHT
    } else {
        FIELD_HEIGHT
    }
}

/// Draw one schema field with its value and, if any, its error
pub fn draw_field(
    frame: &mut Frame,
    area: Rect,
    spec: &FieldSpec,
    value: Option<&FieldValue>,
    error: Option<&str>,
    is_active: bool,
    option_cursor: usize,
) {
    let border_style = match (is_active, error.is_some()) {
        (_, true) => Style::default().fg(Color::Red),
        (true, false) => Style::default().fg(Color::Cyan),
        (false, false) => Style::default().fg(Color::DarkGray),
    };

    let label = if spec.is_required() {
        format!(" {} * ", spec.label)
    } else {
        format!(" {} ", spec.label)
    };

    let mut block = Block::default()
        .title(label)
        .borders(Borders::ALL)
        .border_style(border_style);
    if let Some(message) = error {
        block = block.title_bottom(Line::from(Span::styled(
            format!(" {message} "),
            Style::default().fg(Color::Red),
        )));
    }

    let content = match &spec.kind {
        FieldKind::SingleChoice(options) | FieldKind::MultiChoice(options) => {
            choice_line(options, value, is_active, option_cursor)
        }
        FieldKind::Boolean => {
            let checked = value.is_some_and(FieldValue::as_bool);
            Line::from(Span::styled(
                if checked { "[x] yes" } else { "[ ] no" },
                text_style(is_active),
            ))
        }
        _ => return draw_text(frame, area, spec, value, is_active, block),
    };

    frame.render_widget(Paragraph::new(content).block(block), area);
}

fn text_style(is_active: bool) -> Style {
    if is_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    }
}

fn draw_text(
    frame: &mut Frame,
    area: Rect,
    spec: &FieldSpec,
    value: Option<&FieldValue>,
    is_active: bool,
    block: Block,
) {
    let text = value.map(FieldValue::display_value).unwrap_or_default();
    let display = if text.is_empty() && !is_active {
        "(empty)".to_string()
    } else {
        text
    };
    let cursor = if is_active { "▌" } else { "" };
    let style = if display == "(empty)" {
        Style::default().fg(Color::DarkGray)
    } else {
        text_style(is_active)
    };

    let paragraph = if spec.is_multiline {
        let mut lines: Vec<Line> = display
            .split('\n')
            .map(|l| Line::from(Span::styled(l.to_string(), style)))
            .collect();
        if let Some(last) = lines.last_mut() {
            last.spans
                .push(Span::styled(cursor, Style::default().fg(Color::Cyan)));
        }
        Paragraph::new(lines)
    } else {
        Paragraph::new(Line::from(vec![
            Span::styled(display, style),
            Span::styled(cursor, Style::default().fg(Color::Cyan)),
        ]))
    };

    frame.render_widget(paragraph.wrap(Wrap { trim: false }).block(block), area);
}

/// Options laid out in a row, selected ones marked, cursor highlighted
fn choice_line<'a>(
    options: &'a [String],
    value: Option<&FieldValue>,
    is_active: bool,
    option_cursor: usize,
) -> Line<'a> {
    let mut spans = Vec::with_capacity(options.len() * 2);
    for (idx, option) in options.iter().enumerate() {
        let selected = match value {
            Some(FieldValue::Choice(Some(choice))) => choice == option,
            Some(FieldValue::Multi(set)) => set.contains(option),
            _ => false,
        };
        let marker = if selected { "◉ " } else { "○ " };

        let mut style = if selected {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::Gray)
        };
        if is_active && idx == option_cursor {
            style = style.add_modifier(Modifier::REVERSED);
        }

        spans.push(Span::styled(format!("{marker}{option}"), style));
        spans.push(Span::raw("  "));
    }
    Line::from(spans)
}

/// First field index to draw so that `active` stays visible.
///
/// `heights` are the row counts of every field; `capacity` is the rows
/// available.
pub fn scroll_start(heights: &[u16], active: usize, capacity: u16) -> usize {
    let active = active.min(heights.len().saturating_sub(1));
    let mut start = 0;
    while start < active {
        let used: u16 = heights[start..=active].iter().sum();
        if used <= capacity {
            break;
        }
        start += 1;
    }
    start
}
