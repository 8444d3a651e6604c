//! Lead capture: raw form input, validation, and the payload sent to the
//! leads endpoint.

use crate::config::{CopyText, FieldKind, FormSchema};
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// Values typed into the lead form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeadInput {
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Schema-declared extra fields, by key
    pub fields: BTreeMap<String, String>,
}

impl LeadInput {
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = phone.into();
        self
    }

    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }
}

/// Body of `POST <leads>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeadPayload {
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(rename = "type")]
    pub form_type: String,
    pub brand: String,
    #[serde(flatten)]
    pub extras: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationError {
    #[error("name and email are required")]
    MissingContact,
    #[error("{label} is required")]
    MissingField { key: String, label: String },
    #[error("{value:?} is not a valid choice for {label}")]
    InvalidChoice {
        key: String,
        label: String,
        value: String,
    },
}

impl ValidationError {
    /// Text shown to the visitor under the form
    #[must_use]
    pub fn prompt(&self, copy: &CopyText) -> String {
        match self {
            ValidationError::MissingContact => copy.validation_prompt.clone(),
            other => other.to_string(),
        }
    }
}

/// Check form input against its schema and build the lead payload.
///
/// Every declared extra field is present in the payload (empty when left
/// blank); values for undeclared keys are dropped.
///
/// # Errors
///
/// `MissingContact` when name or email is blank, otherwise the first
/// required field left empty or select value outside its options.
pub fn validate(
    input: &LeadInput,
    form_type: &str,
    schema: &FormSchema,
    brand: &str,
) -> Result<LeadPayload, ValidationError> {
    let name = input.name.trim();
    let email = input.email.trim();
    if name.is_empty() || email.is_empty() {
        return Err(ValidationError::MissingContact);
    }

    let mut extras = BTreeMap::new();
    for field in &schema.fields {
        let value = input
            .fields
            .get(&field.key)
            .map(|v| v.trim())
            .unwrap_or_default();

        if value.is_empty() {
            if field.required {
                return Err(ValidationError::MissingField {
                    key: field.key.clone(),
                    label: field.placeholder.clone(),
                });
            }
        } else if field.kind == FieldKind::Select
            && !field.options.iter().any(|option| option.value == value)
        {
            return Err(ValidationError::InvalidChoice {
                key: field.key.clone(),
                label: field.placeholder.clone(),
                value: value.to_string(),
            });
        }

        extras.insert(field.key.clone(), value.to_string());
    }

    Ok(LeadPayload {
        name: name.to_string(),
        email: email.to_string(),
        phone: input.phone.trim().to_string(),
        form_type: form_type.to_string(),
        brand: brand.to_string(),
        extras,
    })
}
