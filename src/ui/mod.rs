//! UI module for rendering the TUI

mod components;
mod forms;
mod layout;
mod menu;
mod wish_card;

use crate::app::App;
use crate::state::View;
use ratatui::Frame;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let (main_area, status_area) = layout::create_layout(frame.area());

    match app.state.current_view {
        View::Menu => menu::draw(frame, main_area, app),
        View::Dormitory => forms::draw_form(frame, main_area, &app.state.dormitory),
        View::Course => forms::draw_form(frame, main_area, &app.state.course),
        View::WishCard => wish_card::draw(frame, main_area, &app.state.wish_card),
    }

    layout::draw_status_bar(frame, status_area, app);
}
