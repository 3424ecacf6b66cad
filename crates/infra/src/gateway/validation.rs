//! Rendering of gateway failure bodies
//!
//! A rejected submission usually carries a validation envelope
//! `{"message": .., "modelState": {"<field>": ["<error>", ..]}}`. The field map
//! is read in response order, so the rendered message lists fields the way
//! the gateway reported them.

use std::fmt;
use std::fmt::Write as _;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

/// Summary used when the envelope carries no message of its own.
const DEFAULT_VALIDATION_MESSAGE: &str = "The request is invalid.";

/// Field name → error messages, in response order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FieldErrors(Vec<(String, Vec<String>)>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(field, errors)| (field.as_str(), errors.as_slice()))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl<'de> Deserialize<'de> for FieldErrors {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct OrderedVisitor;

        impl<'de> Visitor<'de> for OrderedVisitor {
            type Value = FieldErrors;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of field names to error messages")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut fields = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((field, errors)) = map.next_entry::<String, Option<OneOrMany>>()? {
                    let errors = match errors {
                        Some(OneOrMany::One(error)) => vec![error],
                        Some(OneOrMany::Many(errors)) => errors,
                        None => Vec::new(),
                    };
                    fields.push((field, errors));
                }
                Ok(FieldErrors(fields))
            }
        }

        deserializer.deserialize_map(OrderedVisitor)
    }
}

/// Structured validation error returned on a rejected submission.
#[derive(Debug, Deserialize)]
pub struct ValidationEnvelope {
    #[serde(default, alias = "Message")]
    pub message: Option<String>,
    #[serde(
        default,
        rename = "modelState",
        alias = "ModelState",
        alias = "fieldErrors",
        alias = "FieldErrors"
    )]
    pub field_errors: Option<FieldErrors>,
}

impl ValidationEnvelope {
    /// Parse a body as a validation envelope carrying at least one field.
    pub fn parse(body: &str) -> Option<Self> {
        let envelope: Self = serde_json::from_str(body).ok()?;
        match &envelope.field_errors {
            Some(fields) if !fields.is_empty() => Some(envelope),
            _ => None,
        }
    }

    /// Multi-line message: summary, `Details:`, then every field and each of
    /// its errors.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let message = self.message.as_deref().unwrap_or(DEFAULT_VALIDATION_MESSAGE);
        let _ = writeln!(out, "Validation Failed: {message}");
        out.push_str("Details:\n");
        if let Some(fields) = &self.field_errors {
            for (field, errors) in fields.iter() {
                let _ = writeln!(out, "  - Field: {field}");
                for error in errors {
                    let _ = writeln!(out, "    Error: {error}");
                }
            }
        }
        out
    }
}

/// Failure message for a non-2xx submission response.
pub fn render_failure(status: u16, body: &str) -> String {
    match ValidationEnvelope::parse(body) {
        Some(envelope) => envelope.render(),
        None => format!("API Error ({status}): {body}"),
    }
}
