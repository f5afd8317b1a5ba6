use thiserror::Error;

/// Errors raised by [`GeocodingClient`](crate::GeocodingClient).
///
/// A non-`OK` provider status is not an error: it is returned as data on
/// [`GeocodeResponse`](crate::GeocodeResponse).
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// The requested output format is not one of `json` or `xml`.
    #[error("'{0}' is not a valid format")]
    InvalidFormat(String),

    /// The HTTP client could not be built, the request could not be sent, or
    /// its body could not be read.
    #[error("geocoding request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The body was not JSON, or lacked `status` / `results`. The body is
    /// kept so `xml` payloads stay reachable.
    #[error("malformed geocoding response: {source}")]
    MalformedResponse {
        raw: String,
        #[source]
        source: serde_json::Error,
    },
}

impl GeocodeError {
    /// Response body that failed to decode, if this error carries one.
    pub fn raw_body(&self) -> Option<&str> {
        match self {
            GeocodeError::MalformedResponse { raw, .. } => Some(raw.as_str()),
            _ => None,
        }
    }
}

pub type Result<T, E = GeocodeError> = std::result::Result<T, E>;
