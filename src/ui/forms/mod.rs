//! Form rendering module
//!
//! - `field_renderer`: one field box per schema field kind
//! - `registration_form`: a full registration form with submit and status

mod field_renderer;
mod registration_form;

pub use registration_form::draw_form;
