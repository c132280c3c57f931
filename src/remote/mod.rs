//! Registration endpoint client

mod client;
mod traits;

pub use client::{extract_error_message, HttpRegistrationClient};
pub use traits::RegistrationClient;

#[cfg(test)]
pub use traits::MockRegistrationClient;
