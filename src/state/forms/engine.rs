//! Schema-driven form engine: values, validation and submission

use super::field::{FieldKind, FieldValue};
use super::form_state::{ErrorState, FormValues, SubmissionStatus, SubmitOutcome};
use super::schema::FormSchema;
use crate::error::{FormError, SubmitError};
use crate::remote::RegistrationClient;
use serde_json::{Map, Value};
use uuid::Uuid;

/// Shown when local validation blocks a submit
pub const INVALID_FORM_MESSAGE: &str = "Please fix the highlighted fields and try again.";

/// Shown when the endpoint fails without saying why
pub const GENERIC_FAILURE_MESSAGE: &str = "Registration failed. Please try again.";

/// A submission that passed validation and is waiting on the remote call
#[derive(Debug, Clone)]
pub struct PendingSubmission {
    /// Correlates log lines of one attempt
    pub id: Uuid,
    pub endpoint: String,
    pub payload: Value,
}

/// Result of `FormEngine::begin_submit`
#[derive(Debug, Clone)]
pub enum SubmitStart {
    /// The engine is now Submitting; send this payload
    Ready(PendingSubmission),
    /// Nothing to send; the outcome says why
    Skipped(SubmitOutcome),
}

/// Owns the values, errors and submission status of one form
#[derive(Debug, Clone)]
pub struct FormEngine {
    schema: FormSchema,
    values: FormValues,
    errors: ErrorState,
    status: SubmissionStatus,
    in_flight: Option<Uuid>,
}

impl FormEngine {
    pub fn new(schema: FormSchema) -> Self {
        let values = schema.default_values();
        Self {
            schema,
            values,
            errors: ErrorState::default(),
            status: SubmissionStatus::Idle,
            in_flight: None,
        }
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn value(&self, key: &str) -> Option<&FieldValue> {
        self.values.get(key)
    }

    pub fn errors(&self) -> &ErrorState {
        &self.errors
    }

    pub fn error(&self, key: &str) -> Option<&str> {
        self.errors.get(key)
    }

    pub fn status(&self) -> &SubmissionStatus {
        &self.status
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Replace the value of one field.
    ///
    /// Clears that field's error only; other errors stay until the next
    /// validation pass.
    pub fn set_field(&mut self, key: &str, value: FieldValue) -> Result<(), FormError> {
        let spec = self
            .schema
            .field(key)
            .ok_or_else(|| FormError::UnknownField(key.to_string()))?;

        if !spec.kind.accepts(&value) {
            return Err(FormError::KindMismatch {
                key: key.to_string(),
                expected: spec.kind.label(),
            });
        }

        let undeclared = match (&spec.kind, &value) {
            (FieldKind::SingleChoice(options), FieldValue::Choice(Some(option))) => {
                (!options.contains(option)).then_some(option)
            }
            (FieldKind::MultiChoice(options), FieldValue::Multi(selected)) => {
                selected.iter().find(|option| !options.contains(option))
            }
            _ => None,
        };
        if let Some(option) = undeclared {
            return Err(FormError::UnknownOption {
                key: key.to_string(),
                option: option.clone(),
            });
        }

        self.values.set(key, value);
        self.touched(key);
        Ok(())
    }

    /// Add `option` to a multi-choice field, or remove it if already selected
    pub fn toggle_multi_choice(&mut self, key: &str, option: &str) -> Result<(), FormError> {
        let spec = self
            .schema
            .field(key)
            .ok_or_else(|| FormError::UnknownField(key.to_string()))?;

        let FieldKind::MultiChoice(options) = &spec.kind else {
            return Err(FormError::NotMultiChoice(key.to_string()));
        };
        if !options.iter().any(|o| o == option) {
            return Err(FormError::UnknownOption {
                key: key.to_string(),
                option: option.to_string(),
            });
        }

        if let Some(FieldValue::Multi(selected)) = self.values.get_mut(key) {
            if !selected.remove(option) {
                selected.insert(option.to_string());
            }
        }
        self.touched(key);
        Ok(())
    }

    fn touched(&mut self, key: &str) {
        self.errors.clear_field(key);
        if self.status.is_settled() {
            self.status = SubmissionStatus::Idle;
        }
    }

    /// Re-run every rule; returns true when no field fails
    pub fn validate(&mut self) -> bool {
        self.errors = self.schema.evaluate(&self.values);
        tracing::debug!(
            form = %self.schema.title,
            failing = self.errors.len(),
            "validated form"
        );
        self.errors.is_empty()
    }

    /// JSON body for the endpoint: every field plus the schema constants
    pub fn payload(&self) -> Value {
        let mut body = Map::new();
        for field in self.schema.fields() {
            if let Some(value) = self.values.get(&field.key) {
                body.insert(field.key.clone(), value.to_json());
            }
        }
        for (key, value) in &self.schema.constants {
            body.insert(key.clone(), value.clone());
        }
        Value::Object(body)
    }

    /// Put every field back to its default and forget errors and status
    pub fn reset(&mut self) {
        self.values = self.schema.default_values();
        self.errors = ErrorState::default();
        self.status = SubmissionStatus::Idle;
    }

    /// Validate and move to Submitting, handing back what to send.
    ///
    /// Refuses while another submission is in flight.
    pub fn begin_submit(&mut self) -> SubmitStart {
        if let Some(id) = self.in_flight {
            tracing::warn!(%id, form = %self.schema.title, "submit ignored, already in flight");
            return SubmitStart::Skipped(SubmitOutcome::AlreadyInFlight);
        }

        if !self.validate() {
            self.status = SubmissionStatus::Failed(INVALID_FORM_MESSAGE.to_string());
            return SubmitStart::Skipped(SubmitOutcome::Invalid);
        }

        let id = Uuid::new_v4();
        self.in_flight = Some(id);
        self.status = SubmissionStatus::Submitting;
        tracing::info!(%id, form = %self.schema.title, endpoint = %self.schema.endpoint, "submitting");

        SubmitStart::Ready(PendingSubmission {
            id,
            endpoint: self.schema.endpoint.clone(),
            payload: self.payload(),
        })
    }

    /// Record the result of the remote call started by `begin_submit`
    pub fn finish_submit(&mut self, result: Result<(), SubmitError>) -> SubmitOutcome {
        let id = self.in_flight.take();

        match result {
            Ok(()) => {
                tracing::info!(?id, form = %self.schema.title, "registration created");
                self.values = self.schema.default_values();
                self.errors = ErrorState::default();
                self.status = SubmissionStatus::Succeeded(self.schema.success_message.clone());
                SubmitOutcome::Succeeded
            }
            Err(err) => {
                tracing::warn!(?id, form = %self.schema.title, error = %err, "registration failed");
                let message = err
                    .server_message()
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or(GENERIC_FAILURE_MESSAGE);
                self.status = SubmissionStatus::Failed(message.to_string());
                SubmitOutcome::Failed
            }
        }
    }

    /// Validate, send, and record the outcome in one call
    pub async fn submit(&mut self, client: &dyn RegistrationClient) -> SubmitOutcome {
        match self.begin_submit() {
            SubmitStart::Skipped(outcome) => outcome,
            SubmitStart::Ready(pending) => {
                let result = client.register(&pending.endpoint, &pending.payload).await;
                self.finish_submit(result)
            }
        }
    }
}
