use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{GeocodeError, Result};

/// Response encoding requested from the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Xml,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Xml => "xml",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for OutputFormat {
    type Error = GeocodeError;

    // Case-sensitive: the provider only serves lowercase paths.
    fn try_from(value: &str) -> Result<Self> {
        match value {
            "json" => Ok(OutputFormat::Json),
            "xml" => Ok(OutputFormat::Xml),
            _ => Err(GeocodeError::InvalidFormat(value.to_string())),
        }
    }
}

/// Provider status codes. Unrecognised codes are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Ok,
    ZeroResults,
    OverQueryLimit,
    RequestDenied,
    InvalidRequest,
    UnknownError,
    Other(String),
}

impl Status {
    pub fn as_str(&self) -> &str {
        match self {
            Status::Ok => "OK",
            Status::ZeroResults => "ZERO_RESULTS",
            Status::OverQueryLimit => "OVER_QUERY_LIMIT",
            Status::RequestDenied => "REQUEST_DENIED",
            Status::InvalidRequest => "INVALID_REQUEST",
            Status::UnknownError => "UNKNOWN_ERROR",
            Status::Other(s) => s,
        }
    }
}

impl From<&str> for Status {
    fn from(value: &str) -> Self {
        match value {
            "OK" => Status::Ok,
            "ZERO_RESULTS" => Status::ZeroResults,
            "OVER_QUERY_LIMIT" => Status::OverQueryLimit,
            "REQUEST_DENIED" => Status::RequestDenied,
            "INVALID_REQUEST" => Status::InvalidRequest,
            "UNKNOWN_ERROR" => Status::UnknownError,
            other => Status::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inputs for a single geocoding call.
#[derive(Debug, Clone)]
pub struct GeocodeRequest {
    pub address: String,
    pub region: Option<String>,
    /// Validated when the request is issued, not here.
    pub output_format: String,
}

impl GeocodeRequest {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            region: None,
            output_format: OutputFormat::Json.as_str().to_string(),
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_output_format(mut self, format: impl Into<String>) -> Self {
        self.output_format = format.into();
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub location: LatLng,
}

/// One candidate match returned by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResult {
    pub geometry: Geometry,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatted_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<String>,
}

impl GeocodeResult {
    pub fn lat_lng(&self) -> LatLng {
        self.geometry.location
    }
}

#[derive(Debug, Deserialize)]
struct Envelope {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    results: Vec<GeocodeResult>,
}

/// Outcome of one geocoding call. Each call produces a fresh value; nothing
/// carries over from earlier responses.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeResponse {
    raw: String,
    status: String,
    error_message: Option<String>,
    results: Vec<GeocodeResult>,
}

impl GeocodeResponse {
    /// Decode a JSON body. `status` and `results` are required; on failure
    /// the body travels back inside the error.
    pub fn from_body(raw: String) -> Result<Self> {
        let envelope: Envelope = match serde_json::from_str(&raw) {
            Ok(envelope) => envelope,
            Err(source) => return Err(GeocodeError::MalformedResponse { raw, source }),
        };

        Ok(Self {
            raw,
            status: envelope.status,
            error_message: envelope.error_message,
            results: envelope.results,
        })
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn status_code(&self) -> Status {
        Status::from(self.status.as_str())
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn results(&self) -> &[GeocodeResult] {
        &self.results
    }

    pub fn into_raw(self) -> String {
        self.raw
    }

    pub fn is_ok(&self) -> bool {
        self.status_code() == Status::Ok
    }

    pub fn has_multiple_results(&self) -> bool {
        self.is_ok() && self.results.len() > 1
    }

    /// Coordinates of every result in provider order, or `None` when the
    /// status is anything but `OK`.
    pub fn lat_lng(&self) -> Option<Vec<LatLng>> {
        if !self.is_ok() {
            return None;
        }

        Some(self.results.iter().map(GeocodeResult::lat_lng).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_RESULTS: &str = r#"{
        "status": "OK",
        "results": [
            {
                "formatted_address": "Springfield, IL, USA",
                "place_id": "abc",
                "types": ["locality", "political"],
                "geometry": {"location": {"lat": 39.78, "lng": -89.65}, "location_type": "APPROXIMATE"}
            },
            {"geometry": {"location": {"lat": 42.1, "lng": -72.59}}}
        ]
    }"#;

    #[test]
    fn output_format_roundtrip() {
        for format in [OutputFormat::Json, OutputFormat::Xml] {
            let parsed = OutputFormat::try_from(format.as_str()).expect("roundtrip should succeed");
            assert_eq!(format, parsed);
        }
    }

    #[test]
    fn unknown_output_format_error() {
        for bad in ["csv", "JSON", "", "json "] {
            let err = OutputFormat::try_from(bad).unwrap_err();
            assert!(matches!(err, GeocodeError::InvalidFormat(ref f) if f == bad));
        }
    }

    #[test]
    fn status_keeps_unknown_codes() {
        assert_eq!(Status::from("ZERO_RESULTS"), Status::ZeroResults);
        let other = Status::from("NEW_THING");
        assert_eq!(other, Status::Other("NEW_THING".into()));
        assert_eq!(other.as_str(), "NEW_THING");
    }

    #[test]
    fn request_defaults_to_json_without_region() {
        let req = GeocodeRequest::new("Berlin");
        assert_eq!(req.output_format, "json");
        assert!(req.region.is_none());

        let req = req.with_region("de").with_output_format("xml");
        assert_eq!(req.region.as_deref(), Some("de"));
        assert_eq!(req.output_format, "xml");
    }

    #[test]
    fn decodes_results_and_optional_fields() {
        let resp = GeocodeResponse::from_body(TWO_RESULTS.to_string()).expect("valid body");

        assert_eq!(resp.status(), "OK");
        assert!(resp.error_message().is_none());
        assert_eq!(resp.results().len(), 2);
        assert_eq!(resp.results()[0].formatted_address.as_deref(), Some("Springfield, IL, USA"));
        assert_eq!(resp.results()[0].types, vec!["locality", "political"]);
        assert!(resp.results()[1].place_id.is_none());
        assert!(resp.has_multiple_results());
        assert_eq!(resp.raw(), TWO_RESULTS);
    }

    #[test]
    fn lat_lng_in_provider_order() {
        let resp = GeocodeResponse::from_body(TWO_RESULTS.to_string()).unwrap();
        let coords = resp.lat_lng().expect("status is OK");

        assert_eq!(
            coords,
            vec![LatLng { lat: 39.78, lng: -89.65 }, LatLng { lat: 42.1, lng: -72.59 }]
        );
    }

    #[test]
    fn error_message_is_surfaced_as_data() {
        let body = r#"{"status":"REQUEST_DENIED","error_message":"The provided API key is invalid.","results":[]}"#;
        let resp = GeocodeResponse::from_body(body.to_string()).unwrap();

        assert_eq!(resp.status_code(), Status::RequestDenied);
        assert_eq!(resp.error_message(), Some("The provided API key is invalid."));
        assert!(!resp.is_ok());
        assert!(resp.lat_lng().is_none());
        assert!(!resp.has_multiple_results());
    }

    #[test]
    fn multiple_results_requires_ok_status() {
        let body = r#"{"status":"UNKNOWN_ERROR","results":[
            {"geometry":{"location":{"lat":1.0,"lng":2.0}}},
            {"geometry":{"location":{"lat":3.0,"lng":4.0}}}
        ]}"#;
        let resp = GeocodeResponse::from_body(body.to_string()).unwrap();
        assert!(!resp.has_multiple_results());
    }

    #[test]
    fn missing_status_or_results_is_malformed() {
        for body in [r#"{"results":[]}"#, r#"{"status":"OK"}"#, "<GeocodeResponse/>", ""] {
            let err = GeocodeResponse::from_body(body.to_string()).unwrap_err();
            assert!(matches!(err, GeocodeError::MalformedResponse { .. }), "body: {body}");
            assert_eq!(err.raw_body(), Some(body));
        }
    }
}
