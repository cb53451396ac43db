use std::collections::BTreeMap;

use serde::Serialize;

use scribe_types::api::PrimaryKey;

use crate::error::ApiError;

pub const REQUIRED: &str = "This field is required.";
pub const BLANK: &str = "This field may not be blank.";

/// Per-field validation messages, serialized as `{"field": ["message", ...]}`.
#[derive(Debug, Default, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<&'static str, Vec<String>>);

impl FieldErrors {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn messages(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    /// Validate a text field. Returns the trimmed value when it is present and
    /// not blank; records an error when it is blank, or absent and `required`.
    pub fn text(&mut self, field: &'static str, value: Option<String>, required: bool) -> Option<String> {
        match value {
            None => {
                if required {
                    self.add(field, REQUIRED);
                }
                None
            }
            Some(v) if v.trim().is_empty() => {
                self.add(field, BLANK);
                None
            }
            Some(v) => Some(v.trim().to_string()),
        }
    }

    /// Validate a related-record id. Numeric strings are accepted; any other
    /// non-integer value records an incorrect-type error.
    pub fn primary_key(&mut self, field: &'static str, value: Option<PrimaryKey>, required: bool) -> Option<i64> {
        match value {
            None => {
                if required {
                    self.add(field, REQUIRED);
                }
                None
            }
            Some(PrimaryKey::Id(id)) => Some(id),
            Some(PrimaryKey::Text(text)) => match text.trim().parse() {
                Ok(id) => Some(id),
                Err(_) => {
                    self.add(field, "Incorrect type. Expected pk value, received str.");
                    None
                }
            },
            Some(PrimaryKey::Other(_)) => {
                self.add(field, "Incorrect type. Expected pk value.");
                None
            }
        }
    }

    pub fn finish<T>(self, value: T) -> Result<T, ApiError> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(ApiError::Validation(self))
        }
    }
}

/// Resource ids come from the path as text; anything that is not an integer
/// cannot name a record.
pub fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse().map_err(|_| ApiError::NotFound)
}
