//! Form domain layer
//!
//! Schema-driven form handling shared by every registration page: field
//! descriptors and rules, the value/error/status containers, the engine that
//! ties them together, and the concrete schemas.

mod engine;
mod field;
mod form_state;
pub mod presets;
mod schema;

pub use engine::{
    FormEngine, PendingSubmission, SubmitStart, GENERIC_FAILURE_MESSAGE, INVALID_FORM_MESSAGE,
};
pub use field::{FieldKind, FieldSpec, FieldValue, Rule};
pub use form_state::{ErrorState, FormValues, SubmissionStatus, SubmitOutcome};
pub use schema::{parse_date, FormSchema, DATE_FORMAT};
