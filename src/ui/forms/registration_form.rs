//! Registration form rendering (dormitory and course)

use super::field_renderer::{draw_field, field_height, scroll_start};
use crate::state::{FormPage, SubmissionStatus};
use crate::ui::components::{render_button, BUTTON_HEIGHT};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Draw a registration form with its submit button and status line
pub fn draw_form(frame: &mut Frame, area: Rect, page: &FormPage) {
    let schema = page.engine.schema();

    let block = Block::default()
        .title(format!(" {} ", schema.title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),                // Fields
            Constraint::Length(BUTTON_HEIGHT), // Submit
            Constraint::Length(1),             // Status
        ])
        .split(inner);

    draw_fields(frame, chunks[0], page);
    draw_submit_button(frame, chunks[1], page);
    draw_status_line(frame, chunks[2], page.engine.status());
}

fn draw_fields(frame: &mut Frame, area: Rect, page: &FormPage) {
    let fields = page.engine.schema().fields();
    let heights: Vec<u16> = fields.iter().map(field_height).collect();
    let start = scroll_start(&heights, page.active_field_index, area.height);

    let mut y = area.y;
    let bottom = area.y + area.height;
    for (idx, spec) in fields.iter().enumerate().skip(start) {
        let height = heights[idx];
        if y + height > bottom {
            break;
        }
        let field_area = Rect {
            x: area.x,
            y,
            width: area.width,
            height,
        };
        draw_field(
            frame,
            field_area,
            spec,
            page.engine.value(&spec.key),
            page.engine.error(&spec.key),
            page.active_field_index == idx,
            page.option_cursor,
        );
        y += height;
    }
}

fn draw_submit_button(frame: &mut Frame, area: Rect, page: &FormPage) {
    let button_area = Rect {
        width: area.width.min(24),
        ..area
    };
    let submitting = page.engine.is_submitting();
    let label = if submitting { "Submitting..." } else { "Register" };
    render_button(
        frame,
        button_area,
        label,
        page.is_submit_row_active(),
        !submitting,
        Color::Green,
    );
}

fn draw_status_line(frame: &mut Frame, area: Rect, status: &SubmissionStatus) {
    let style = match status {
        SubmissionStatus::Succeeded(_) => Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
        SubmissionStatus::Failed(_) => Style::default().fg(Color::Red),
        SubmissionStatus::Submitting => Style::default().fg(Color::Yellow),
        SubmissionStatus::Idle => Style::default(),
    };

    if let Some(message) = status.message() {
        let line = Line::from(Span::styled(message.to_string(), style));
        frame.render_widget(Paragraph::new(line), area);
    }
}
