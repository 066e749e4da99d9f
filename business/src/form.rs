//! Form model shared by every modal form.
//!
//! A [`FormInstance`] owns the field values, the declared rules, and the
//! per-field error lists shown under each input. Rules run field by field in
//! declaration order: the required rule first, then each custom validator.
//! The first failing rule of a field is the one reported for it.

use std::collections::BTreeMap;
use std::sync::Arc;

use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use ustr::Ustr;

use crate::messages::{MessageKey, MessageProvider};

pub type FormValues = BTreeMap<Ustr, String>;

/// Field-level error as reported by the API or applied to a form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub name: String,
    #[serde(default)]
    pub errors: Vec<String>,
}

impl FieldError {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            errors: vec![message.into()],
        }
    }

    pub fn first_message(&self) -> Option<&str> {
        self.errors.first().map(String::as_str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationKind {
    Required,
    WeakPassword,
    Mismatch,
    Invalid,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: Ustr,
    pub kind: ValidationKind,
    pub message: String,
}

impl From<&ValidationError> for FieldError {
    fn from(err: &ValidationError) -> Self {
        Self::new(err.field.as_str(), err.message.clone())
    }
}

/// What a custom validator sees.
pub struct ValidatorCtx<'a> {
    pub field: Ustr,
    pub value: &'a str,
    /// Every field value, for cross-field checks.
    pub values: &'a FormValues,
    pub messages: &'a dyn MessageProvider,
}

impl ValidatorCtx<'_> {
    pub fn reject(&self, kind: ValidationKind, key: MessageKey) -> ValidationError {
        ValidationError {
            field: self.field,
            kind,
            message: self.messages.message(key).into_owned(),
        }
    }

    pub fn value_of(&self, field: &str) -> &str {
        self.values
            .get(&Ustr::from(field))
            .map(String::as_str)
            .unwrap_or_default()
    }
}

pub type Validator = fn(&ValidatorCtx<'_>) -> Result<(), ValidationError>;

#[derive(Debug, Clone, Copy)]
pub struct RequiredRule {
    /// Treat whitespace-only input as missing.
    pub whitespace: bool,
    pub message: MessageKey,
}

#[derive(Clone)]
pub struct FieldSpec {
    pub name: Ustr,
    pub required: Option<RequiredRule>,
    pub validators: Vec<Validator>,
}

impl FieldSpec {
    pub fn new(name: &str) -> Self {
        Self {
            name: Ustr::from(name),
            required: None,
            validators: Vec::new(),
        }
    }

    pub fn required(mut self, message: MessageKey, whitespace: bool) -> Self {
        self.required = Some(RequiredRule {
            whitespace,
            message,
        });
        self
    }

    pub fn validator(mut self, validator: Validator) -> Self {
        self.validators.push(validator);
        self
    }

    fn check(
        &self,
        values: &FormValues,
        messages: &dyn MessageProvider,
    ) -> Result<(), ValidationError> {
        let value = values.get(&self.name).map(String::as_str).unwrap_or_default();
        let ctx = ValidatorCtx {
            field: self.name,
            value,
            values,
            messages,
        };

        if let Some(rule) = self.required {
            let missing = if rule.whitespace {
                value.trim().is_empty()
            } else {
                value.is_empty()
            };
            if missing {
                return Err(ctx.reject(ValidationKind::Required, rule.message));
            }
        }

        self.validators.iter().try_for_each(|validator| validator(&ctx))
    }
}

#[derive(Clone)]
pub struct FormInstance {
    fields: Vec<FieldSpec>,
    values: FormValues,
    errors: BTreeMap<Ustr, Vec<String>>,
    messages: Arc<dyn MessageProvider>,
}

impl std::fmt::Debug for FormInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormInstance")
            .field("fields", &self.fields.iter().map(|f| f.name).collect::<Vec<_>>())
            .field("errors", &self.errors)
            .finish_non_exhaustive()
    }
}

impl FormInstance {
    pub fn new(fields: Vec<FieldSpec>, messages: Arc<dyn MessageProvider>) -> Self {
        let values = fields.iter().map(|f| (f.name, String::new())).collect();
        Self {
            fields,
            values,
            errors: BTreeMap::new(),
            messages,
        }
    }

    pub fn value(&self, name: &str) -> &str {
        self.values
            .get(&Ustr::from(name))
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// Editable handle for a text input. Editing does not clear errors; call
    /// [`Self::touch`] when the input reports a change.
    pub fn value_mut(&mut self, name: &str) -> &mut String {
        self.values.entry(Ustr::from(name)).or_default()
    }

    /// Drop the errors of a field the user just edited.
    pub fn touch(&mut self, name: &str) {
        self.errors.remove(&Ustr::from(name));
    }

    pub fn set_value(&mut self, name: &str, value: impl Into<String>) {
        *self.value_mut(name) = value.into();
        self.touch(name);
    }

    pub fn set_values<'a>(&mut self, values: impl IntoIterator<Item = (&'a str, String)>) {
        for (name, value) in values {
            self.set_value(name, value);
        }
    }

    pub fn get_fields_value(&self) -> FormValues {
        self.values.clone()
    }

    /// Run every rule; on success returns the current values.
    pub fn validate_fields(&mut self) -> Result<FormValues, Vec<ValidationError>> {
        self.errors.clear();
        let failures: Vec<ValidationError> = self
            .fields
            .iter()
            .filter_map(|field| field.check(&self.values, self.messages.as_ref()).err())
            .collect();

        if failures.is_empty() {
            return Ok(self.values.clone());
        }
        for failure in &failures {
            self.errors
                .entry(failure.field)
                .or_default()
                .push(failure.message.clone());
        }
        Err(failures)
    }

    /// Apply externally produced errors; values are left untouched.
    pub fn set_fields(&mut self, errors: &[FieldError]) {
        for error in errors {
            let name = Ustr::from(&error.name);
            if !self.fields.iter().any(|f| f.name == name) {
                warn!("error for unknown field {name} dropped");
                continue;
            }
            self.errors.insert(name, error.errors.clone());
        }
    }

    pub fn reset_fields(&mut self) {
        for value in self.values.values_mut() {
            value.clear();
        }
        self.errors.clear();
    }

    pub fn errors(&self, name: &str) -> &[String] {
        self.errors
            .get(&Ustr::from(name))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn has_errors(&self) -> bool {
        self.errors.values().any(|errors| !errors.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::EnglishMessages;

    fn must_be_digits(ctx: &ValidatorCtx<'_>) -> Result<(), ValidationError> {
        if ctx.value.chars().all(|c| c.is_ascii_digit()) {
            Ok(())
        } else {
            Err(ctx.reject(ValidationKind::Invalid, MessageKey::PathRequired))
        }
    }

    fn form() -> FormInstance {
        FormInstance::new(
            vec![
                FieldSpec::new("name").required(MessageKey::UsernameRequired, true),
                FieldSpec::new("code")
                    .required(MessageKey::PasswordRequired, false)
                    .validator(must_be_digits),
            ],
            Arc::new(EnglishMessages),
        )
    }

    #[test]
    fn whitespace_only_value_fails_required() {
        let mut form = form();
        form.set_value("name", "   ");
        form.set_value("code", "12");

        let errors = form.validate_fields().expect_err("blank name");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, Ustr::from("name"));
        assert_eq!(errors[0].kind, ValidationKind::Required);
        assert_eq!(form.errors("name"), ["Please input your username"]);
    }

    #[test]
    fn required_failure_skips_custom_validators() {
        let mut form = form();
        form.set_value("name", "root");

        let errors = form.validate_fields().expect_err("missing code");
        assert_eq!(errors[0].kind, ValidationKind::Required);
    }

    #[test]
    fn errors_are_reported_in_declared_field_order() {
        let mut form = form();
        form.set_value("code", "x1");

        let errors = form.validate_fields().expect_err("both invalid");
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, ["name", "code"]);
        assert_eq!(errors[1].kind, ValidationKind::Invalid);
    }

    #[test]
    fn valid_form_returns_values() {
        let mut form = form();
        form.set_values([("name", "root".to_owned()), ("code", "42".to_owned())]);

        let values = form.validate_fields().expect("valid");
        assert_eq!(values.get(&Ustr::from("code")).map(String::as_str), Some("42"));
        assert!(!form.has_errors());
    }

    #[test]
    fn set_fields_applies_known_fields_only() {
        let mut form = form();
        form.set_fields(&[
            FieldError::new("code", "already used"),
            FieldError::new("unknown", "ignored"),
        ]);

        assert_eq!(form.errors("code"), ["already used"]);
        assert!(form.errors("unknown").is_empty());
    }

    #[test]
    fn editing_a_field_clears_its_errors_and_reset_clears_all() {
        let mut form = form();
        let _ = form.validate_fields();
        assert!(form.has_errors());

        form.set_value("name", "root");
        assert!(form.errors("name").is_empty());
        assert!(!form.errors("code").is_empty());

        form.reset_fields();
        assert!(!form.has_errors());
        assert_eq!(form.value("name"), "");
    }
}
