use std::str::FromStr;

use serde_yaml::{Mapping, Value};

use super::LoadError;

pub(crate) trait GetYamlValue {
    fn required(&self, field: &'static str, context: &str) -> Result<&Value, LoadError>;

    fn required_string(&self, field: &'static str, context: &str) -> Result<String, LoadError>;

    fn optional_string(&self, field: &'static str, context: &str)
        -> Result<Option<String>, LoadError>;

    fn parse_required<T: FromStr>(
        &self,
        field: &'static str,
        context: &str,
        expected: &'static str,
    ) -> Result<T, LoadError>;
}

impl GetYamlValue for Mapping {
    /// Returns the value of a field, or an error if it is missing or null.
    fn required(&self, field: &'static str, context: &str) -> Result<&Value, LoadError> {
        match self.get(field) {
            Some(Value::Null) | None => Err(LoadError::MissingField {
                context: context.to_owned(),
                field,
            }),
            Some(v) => Ok(v),
        }
    }

    /// Returns a required scalar field rendered as a string.
    fn required_string(&self, field: &'static str, context: &str) -> Result<String, LoadError> {
        let value = self.required(field, context)?;
        scalar_string(value).ok_or_else(|| LoadError::InvalidField {
            context: context.to_owned(),
            field: field.to_owned(),
            expected: "a scalar",
        })
    }

    fn optional_string(
        &self,
        field: &'static str,
        context: &str,
    ) -> Result<Option<String>, LoadError> {
        match self.get(field) {
            Some(Value::Null) | None => Ok(None),
            Some(_) => self.required_string(field, context).map(Some),
        }
    }

    /// Parse a required scalar field to the type `T`.
    fn parse_required<T: FromStr>(
        &self,
        field: &'static str,
        context: &str,
        expected: &'static str,
    ) -> Result<T, LoadError> {
        self.required_string(field, context)?
            .trim()
            .parse()
            .map_err(|_| LoadError::InvalidField {
                context: context.to_owned(),
                field: field.to_owned(),
                expected,
            })
    }
}

/// Render a scalar node as a string, the way it was written in the document.
///
/// Returns `None` for null, sequences and mappings.
pub(crate) fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => scalar_string(&tagged.value),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

/// Read a scalar node as a non-negative integer.
pub(crate) fn scalar_u64(value: &Value) -> Option<u64> {
    scalar_string(value)?.trim().parse().ok()
}
