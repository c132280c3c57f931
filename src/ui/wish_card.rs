//! Birthday wish card rendering

use crate::state::{WishCard, WishField, WishPhase};
use crate::ui::components::{render_button, BUTTON_HEIGHT};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

const ACCENT: Color = Color::Rgb(216, 27, 96);

/// Draw the wish card, composing or revealed
pub fn draw(frame: &mut Frame, area: Rect, card: &WishCard) {
    let width = area.width.min(60);
    let card_area = Rect {
        x: area.x + (area.width - width) / 2,
        width,
        ..area
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ACCENT));
    let inner = block.inner(card_area);
    frame.render_widget(block, card_area);

    match card.phase {
        WishPhase::Compose => draw_compose(frame, inner, card),
        WishPhase::Revealed => draw_revealed(frame, inner, card),
    }
}

fn input_box<'a>(label: &'a str, value: &'a str, is_active: bool) -> Paragraph<'a> {
    let border = if is_active { ACCENT } else { Color::DarkGray };
    let cursor = if is_active { "▌" } else { "" };
    Paragraph::new(Line::from(vec![
        Span::raw(value),
        Span::styled(cursor, Style::default().fg(ACCENT)),
    ]))
    .wrap(Wrap { trim: false })
    .block(
        Block::default()
            .title(format!(" {label} "))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border)),
    )
}

fn draw_compose(frame: &mut Frame, area: Rect, card: &WishCard) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),             // Heading
            Constraint::Length(3),             // Name
            Constraint::Length(5),             // Memory
            Constraint::Length(BUTTON_HEIGHT), // Show
            Constraint::Min(0),
        ])
        .margin(1)
        .split(area);

    let heading = Paragraph::new(Line::from(Span::styled(
        "Birthday Wish 💖",
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center);
    frame.render_widget(heading, chunks[0]);

    frame.render_widget(
        input_box(
            "Your Love's Name",
            &card.name,
            card.active_field == WishField::Name,
        ),
        chunks[1],
    );
    frame.render_widget(
        input_box(
            "A Special Memory or Reason You Love Them",
            &card.memory,
            card.active_field == WishField::Memory,
        ),
        chunks[2],
    );

    render_button(
        frame,
        chunks[3],
        "Show Birthday Wish 🎂 (Enter)",
        card.can_reveal(),
        card.can_reveal(),
        ACCENT,
    );
}

fn draw_revealed(frame: &mut Frame, area: Rect, card: &WishCard) {
    let body = Style::default();
    let lines = vec![
        Line::from(Span::styled(
            "Happy Birthday 🎉",
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        )),
        Line::raw(""),
        Line::from(Span::styled(
            format!("{} 💕", card.greeting()),
            body.add_modifier(Modifier::BOLD),
        )),
        Line::raw(""),
        Line::from(Span::styled(
            "Today is not just your birthday, it is the day the world became more beautiful because you were born.",
            body,
        )),
        Line::raw(""),
        Line::from(Span::styled(
            card.memory_line(),
            body.add_modifier(Modifier::ITALIC),
        )),
        Line::raw(""),
        Line::from(Span::styled(
            "May your life be filled with endless smiles, deep love, and all the dreams your heart holds. 💖",
            body,
        )),
        Line::raw(""),
        Line::from(Span::styled("Forever yours 💘", Style::default().fg(ACCENT))),
        Line::raw(""),
        Line::from(Span::styled(
            "e: edit message  Esc: menu",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    // Lines appear top to bottom as the reveal progresses
    let visible = ((lines.len() as f32) * card.reveal_progress).ceil() as usize;
    let lines: Vec<Line> = lines.into_iter().take(visible.max(1)).collect();

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area.inner(Margin::new(1, 1)));
}
