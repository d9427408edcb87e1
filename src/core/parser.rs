//! Response parser: turns the model's raw reply into an `ExtractionResult`.
//!
//! The reply must be exactly one JSON object (surrounding whitespace is
//! fine). Prose around the object, truncated output, arrays and scalars are
//! rejected. Field-level tolerance is documented on `ExtractionResult`.

use serde_json::Value;
use thiserror::Error;

use crate::domain::ExtractionResult;

/// The reply could not be read as an extraction object
#[derive(Debug, Error)]
#[error("model reply is not a valid extraction object: {reason}")]
pub struct MalformedResponse {
    /// Why parsing failed
    pub reason: String,

    /// The reply as received, for diagnostics
    pub raw: String,
}

impl MalformedResponse {
    fn new(reason: impl Into<String>, raw: &str) -> Self {
        Self {
            reason: reason.into(),
            raw: raw.to_string(),
        }
    }
}

/// Parse a raw model reply
pub fn parse(raw: &str) -> Result<ExtractionResult, MalformedResponse> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| MalformedResponse::new(e.to_string(), raw))?;

    if !value.is_object() {
        return Err(MalformedResponse::new("expected a JSON object", raw));
    }

    serde_json::from_value(value).map_err(|e| MalformedResponse::new(e.to_string(), raw))
}
