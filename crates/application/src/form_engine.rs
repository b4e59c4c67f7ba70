use std::collections::BTreeMap;

use gatehouse_core::{AppError, AppResult};
use gatehouse_domain::{FieldDescriptor, FieldMatrix, FieldValue, FieldValues};
use tracing::debug;

const REQUIRED_MESSAGE: &str = "this field is required";
const INVALID_FORMAT_MESSAGE: &str = "invalid format";

/// Visible validation state of one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validity {
    /// Not yet validated, or reset by focus.
    Default,
    /// The last validation failed.
    Error,
    /// The last validation passed.
    Success,
}

/// Runtime state of one form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldState {
    value: FieldValue,
    touched: bool,
    validity: Validity,
    message: Option<String>,
}

impl FieldState {
    fn new(value: FieldValue) -> Self {
        Self {
            value,
            touched: false,
            validity: Validity::Default,
            message: None,
        }
    }

    /// Returns the current value.
    #[must_use]
    pub fn value(&self) -> &FieldValue {
        &self.value
    }

    /// Returns whether the field was blurred or focused.
    #[must_use]
    pub fn is_touched(&self) -> bool {
        self.touched
    }

    /// Returns the visible validity.
    #[must_use]
    pub fn validity(&self) -> Validity {
        self.validity
    }

    /// Returns the visible validation message.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

/// Drives a field matrix through input, blur, focus and submit.
#[derive(Debug, Clone)]
pub struct FormEngine {
    matrix: FieldMatrix,
    states: BTreeMap<String, FieldState>,
    submit_ready: bool,
}

impl FormEngine {
    /// Mounts a form, seeding every field with its initial value.
    #[must_use]
    pub fn new(matrix: FieldMatrix) -> Self {
        let states = matrix
            .fields()
            .map(|field| (field.key().to_owned(), FieldState::new(field.initial_value())))
            .collect();

        let mut engine = Self {
            matrix,
            states,
            submit_ready: false,
        };
        engine.submit_ready = engine.compute_readiness();
        engine
    }

    /// Returns the field matrix.
    #[must_use]
    pub fn matrix(&self) -> &FieldMatrix {
        &self.matrix
    }

    /// Returns the state of one field.
    #[must_use]
    pub fn field_state(&self, key: &str) -> Option<&FieldState> {
        self.states.get(key)
    }

    /// Returns the cached submit readiness.
    #[must_use]
    pub fn is_submit_ready(&self) -> bool {
        self.submit_ready
    }

    /// Returns the flattened `{key: value}` map.
    #[must_use]
    pub fn values(&self) -> FieldValues {
        self.states
            .iter()
            .map(|(key, state)| (key.clone(), state.value.clone()))
            .collect()
    }

    /// Updates a value without touching validity.
    pub fn on_input(&mut self, key: &str, value: FieldValue) -> AppResult<()> {
        self.state_mut(key)?.value = value;
        Ok(())
    }

    /// Updates a value, validates that field and recomputes readiness.
    pub fn on_blur(&mut self, key: &str, value: FieldValue) -> AppResult<()> {
        let field = self.descriptor(key)?.clone();
        let state = self.state_mut(key)?;
        state.value = value;
        state.touched = true;
        let (validity, message) = evaluate(&field, &state.value);
        state.validity = validity;
        state.message = message;

        debug!(key, ?validity, "form field validated");
        self.submit_ready = self.compute_readiness();
        Ok(())
    }

    /// Resets a field's validity so the actor can retype.
    pub fn on_focus(&mut self, key: &str) -> AppResult<()> {
        let state = self.state_mut(key)?;
        state.touched = true;
        state.validity = Validity::Default;
        state.message = None;
        Ok(())
    }

    /// Attempts a submit.
    ///
    /// Touched fields are revalidated first. When the form is not ready the
    /// handler is not called and `None` is returned; the form never resets
    /// itself.
    pub fn submit<R, F>(&mut self, handler: F) -> Option<R>
    where
        F: FnOnce(FieldValues) -> R,
    {
        let Self { matrix, states, .. } = self;
        for field in matrix.fields() {
            if let Some(state) = states.get_mut(field.key())
                && state.touched
            {
                let (validity, message) = evaluate(field, &state.value);
                state.validity = validity;
                state.message = message;
            }
        }

        self.submit_ready = self.compute_readiness();
        if !self.submit_ready {
            debug!("form submit rejected until required fields validate");
            return None;
        }

        Some(handler(self.values()))
    }

    fn compute_readiness(&self) -> bool {
        self.matrix
            .fields()
            .filter(|field| field.is_required())
            .all(|field| {
                self.states.get(field.key()).is_some_and(|state| {
                    evaluate(field, &state.value).0 == Validity::Success
                })
            })
    }

    fn descriptor(&self, key: &str) -> AppResult<&FieldDescriptor> {
        self.matrix
            .field(key)
            .ok_or_else(|| AppError::Validation(format!("unknown form field '{key}'")))
    }

    fn state_mut(&mut self, key: &str) -> AppResult<&mut FieldState> {
        self.states
            .get_mut(key)
            .ok_or_else(|| AppError::Validation(format!("unknown form field '{key}'")))
    }
}

fn evaluate(field: &FieldDescriptor, value: &FieldValue) -> (Validity, Option<String>) {
    if field.is_required() && value.is_blank() {
        return (Validity::Error, Some(REQUIRED_MESSAGE.to_owned()));
    }

    if let (Some(pattern), Some(text)) = (field.pattern(), value.as_text())
        && !pattern.matches(text.trim())
    {
        let message = pattern.message().unwrap_or(INVALID_FORMAT_MESSAGE);
        return (Validity::Error, Some(message.to_owned()));
    }

    (Validity::Success, None)
}

#[cfg(test)]
mod tests;
