//! Allow-listed product input.
//!
//! Request bodies are untrusted maps. [`ProductParams::permit`] copies the
//! permitted keys out of the `product` envelope and drops everything else,
//! so no other attribute can ever be assigned from user input.

use serde_json::{Map, Value};
use thiserror::Error;

/// Envelope key the attributes are nested under.
pub const ENVELOPE_KEY: &str = "product";

/// The only keys read from input.
pub const PERMITTED_KEYS: [&str; 3] = ["name", "description", "featured_image"];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParamsError {
    #[error("param is missing or the value is empty: {0}")]
    Missing(&'static str),
}

/// Submitted product attributes. `None` means "not submitted".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductParams {
    pub name: Option<String>,
    pub description: Option<String>,
    pub featured_image: Option<String>,
}

impl ProductParams {
    /// Extract the permitted attributes from a request body.
    ///
    /// The body must be an object with an object under `product`.
    pub fn permit(body: &Value) -> Result<Self, ParamsError> {
        let envelope = body
            .get(ENVELOPE_KEY)
            .and_then(Value::as_object)
            .ok_or(ParamsError::Missing(ENVELOPE_KEY))?;

        Ok(Self {
            name: permitted_scalar(envelope, "name"),
            description: permitted_scalar(envelope, "description"),
            featured_image: permitted_scalar(envelope, "featured_image"),
        })
    }

    /// Keys present in the envelope that were not permitted.
    pub fn unpermitted_keys(body: &Value) -> Vec<String> {
        body.get(ENVELOPE_KEY)
            .and_then(Value::as_object)
            .map(|envelope| {
                envelope
                    .keys()
                    .filter(|k| !PERMITTED_KEYS.contains(&k.as_str()))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }
}

// Non-scalar values are dropped as if unsubmitted.
fn permitted_scalar(envelope: &Map<String, Value>, key: &str) -> Option<String> {
    match envelope.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some(String::new()),
        Value::Array(_) | Value::Object(_) => None,
    }
}
