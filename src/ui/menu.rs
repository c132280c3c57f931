//! Start menu listing the available pages

use crate::app::App;
use crate::state::View;
use crate::ui::components::{render_button, BUTTON_HEIGHT};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders},
    Frame,
};

/// Draw the menu
pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(" Registration Desk ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut constraints = vec![Constraint::Min(0)];
    constraints.extend(View::MENU.iter().map(|_| Constraint::Length(BUTTON_HEIGHT)));
    constraints.push(Constraint::Min(0));

    let width = inner.width.min(40);
    let column = Rect {
        x: inner.x + (inner.width - width) / 2,
        width,
        ..inner
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(column);

    for (idx, view) in View::MENU.iter().enumerate() {
        render_button(
            frame,
            chunks[idx + 1],
            view.label(),
            app.state.menu_index == idx,
            true,
            Color::Cyan,
        );
    }
}
