//! Input values read from the page at invocation time, plus the small set
//! of normalisation rules features apply before building a request.

use std::collections::HashMap;

use crate::{error::InputError, page::Page, registry::InputField};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    values: HashMap<&'static str, String>,
}

impl FormValues {
    /// Snapshot of `fields`. A field missing from the page falls back to its
    /// declared default, or to an empty string.
    pub fn read(page: &dyn Page, fields: &[InputField]) -> Self {
        let values = fields
            .iter()
            .map(|field| {
                let value = page
                    .value(field.id)
                    .or_else(|| field.default.map(str::to_string))
                    .unwrap_or_default();
                (field.id, value)
            })
            .collect();
        Self { values }
    }

    pub fn raw(&self, id: &str) -> &str {
        self.values.get(id).map(String::as_str).unwrap_or_default()
    }

    pub fn required_text(&self, id: &str, message: &str) -> Result<String, InputError> {
        let value = self.raw(id).trim();
        if value.is_empty() {
            return Err(InputError::new(message));
        }
        Ok(value.to_string())
    }

    pub fn code_upper(&self, id: &str) -> String {
        self.raw(id).trim().to_uppercase()
    }

    pub fn code_lower(&self, id: &str) -> String {
        self.raw(id).trim().to_lowercase()
    }

    /// A finite number strictly greater than zero.
    pub fn positive_amount(&self, id: &str, message: &str) -> Result<f64, InputError> {
        self.raw(id)
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|amount| amount.is_finite() && *amount > 0.0)
            .ok_or_else(|| InputError::new(message))
    }
}

/// Display form of a number: integral values print without a fraction.
pub fn format_number(value: f64) -> String {
    format!("{value}")
}
