//! Application state module

mod app_state;
pub mod forms;
mod wish_card;

pub use app_state::*;
pub use forms::*;
pub use wish_card::*;
