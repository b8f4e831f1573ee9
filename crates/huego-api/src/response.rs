// CLIP v2 response envelope
//
// Every bridge response has the shape `{ "data": ..., "errors": [...] }`.
// The envelope is kept intact so callers decide whether a non-empty error
// list is fatal for their use case.

use bytes::Bytes;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::Error;

/// One element of the bridge's reported error list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub description: String,
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(default)]
    data: serde_json::Value,
    #[serde(default)]
    errors: Vec<ApiError>,
}

/// A decoded bridge response.
#[derive(Debug, Clone)]
pub struct Response {
    data: serde_json::Value,
    errors: Vec<ApiError>,
    raw: Bytes,
}

impl Response {
    /// Decode a raw body into the envelope.
    pub fn from_body(raw: Bytes) -> Result<Self, Error> {
        let envelope: Envelope =
            serde_json::from_slice(&raw).map_err(|e| deserialization_error(&e, &raw))?;
        Ok(Self {
            data: envelope.data,
            errors: envelope.errors,
            raw,
        })
    }

    /// Decode the `data` payload into `T`.
    ///
    /// The error list is not consulted; use [`check_errors`](Self::check_errors)
    /// first if bridge-reported errors should fail the call.
    pub fn into_data<T: DeserializeOwned>(self) -> Result<T, Error> {
        let Self { data, raw, .. } = self;
        T::deserialize(data).map_err(|e| deserialization_error(&e, &raw))
    }

    /// The raw `data` payload.
    pub fn data(&self) -> &serde_json::Value {
        &self.data
    }

    /// Errors reported by the bridge alongside the payload.
    pub fn errors(&self) -> &[ApiError] {
        &self.errors
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// The full response body as received.
    pub fn raw(&self) -> &Bytes {
        &self.raw
    }

    /// Turn a non-empty error list into [`Error::Bridge`].
    pub fn check_errors(self) -> Result<Self, Error> {
        if self.errors.is_empty() {
            return Ok(self);
        }
        Err(Error::Bridge {
            descriptions: self.errors.into_iter().map(|e| e.description).collect(),
        })
    }
}

fn deserialization_error(err: &serde_json::Error, raw: &[u8]) -> Error {
    let body = String::from_utf8_lossy(raw).into_owned();
    let preview: String = body.chars().take(200).collect();
    Error::Deserialization {
        message: format!("{err} (body preview: {preview:?})"),
        body,
    }
}
