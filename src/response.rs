//! The GraphQL response envelope, kept as raw JSON values.
//!
//! The toolkit deliberately stops short of typed records: `data` is a
//! plain JSON map that callers (or an external data-model layer)
//! interpret.

use serde::{Deserialize, Serialize};

use crate::ClientError;

/// A location within the query text attached to a server error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphQlErrorLocation {
    /// Line number, 1-based.
    pub line: u32,
    /// Column number, 1-based.
    pub column: u32,
}

/// One segment of a response path attached to a server error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    /// A field name.
    Key(String),
    /// A list index.
    Index(u64),
}

/// One server-reported error, per the GraphQL over-HTTP convention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQlError {
    /// Human-readable message.
    pub message: String,
    /// Locations within the query text, when provided.
    #[serde(default)]
    pub locations: Vec<GraphQlErrorLocation>,
    /// Path into the response data where the failure occurred.
    #[serde(default)]
    pub path: Vec<PathSegment>,
    /// Free-form extension metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<serde_json::Value>,
}

/// The parsed response envelope.
///
/// At least one of `data`/`errors` is non-empty (the executor rejects
/// envelopes with neither); both present means partial success.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryEnvelope {
    /// Response data, keyed by root output keys.
    #[serde(default)]
    pub data: Option<serde_json::Map<String, serde_json::Value>>,
    /// Server-reported errors, in server order.
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
    /// Free-form extension metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<serde_json::Value>,
}

impl QueryEnvelope {
    /// Whether the envelope carries data and no errors.
    pub fn is_total_success(&self) -> bool {
        self.data.is_some() && self.errors.is_empty()
    }

    /// Consume the envelope, requiring total success.
    ///
    /// A partial success (data alongside errors) fails here: callers of
    /// this path asked for all-or-nothing semantics.
    pub fn into_data(self) -> Result<serde_json::Map<String, serde_json::Value>, ClientError> {
        if !self.errors.is_empty() {
            return Err(ClientError::GraphQl {
                errors: self.errors,
            });
        }
        self.data.ok_or_else(|| ClientError::MalformedResponse {
            message: "envelope carried neither data nor errors".to_string(),
        })
    }
}
