//! formdesk - schema-driven registration forms
//!
//! The core is [`FormEngine`](state::FormEngine): it owns the values of one
//! form, validates them against a [`FormSchema`](state::FormSchema) rule
//! table, and submits them to a [`RegistrationClient`](remote::RegistrationClient)
//! with at most one submission in flight. The terminal front end in [`app`]
//! and [`ui`] is one consumer of it.

pub mod app;
pub mod config;
pub mod error;
pub mod remote;
pub mod state;
pub mod ui;
