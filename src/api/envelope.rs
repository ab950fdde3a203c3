//! Response envelope normalization
//!
//! The backend is inconsistent about wrapping: list endpoints return either
//! a bare array, `{"result": [...]}`, or `{"data": [...]}`; detail
//! endpoints a bare object or `{"result": {...}}`. This adapter normalizes
//! all of them at the client boundary so no caller carries its own
//! fallback chain.

use serde::de::DeserializeOwned;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Envelope<T> {
    Result { result: T },
    Data { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    pub fn into_inner(self) -> T {
        match self {
            Envelope::Result { result } => result,
            Envelope::Data { data } => data,
            Envelope::Bare(value) => value,
        }
    }
}

/// Decode a response body, unwrapping whichever envelope the server used
pub fn decode<T: DeserializeOwned>(body: &str) -> Result<T, serde_json::Error> {
    serde_json::from_str::<Envelope<T>>(body).map(Envelope::into_inner)
}
