use tracing::{debug, warn};

use crate::{
    error::Result,
    model::{GeocodeRequest, GeocodeResponse, LatLng, OutputFormat},
    transport::{HttpTransport, Transport},
};

pub const API_URL: &str = "https://maps.google.com/maps/api/geocode";

/// Client for the geocoding web service.
///
/// Every call returns its own [`GeocodeResponse`]; the client keeps no
/// response state between calls.
#[derive(Debug)]
pub struct GeocodingClient {
    api_key: String,
    base_url: String,
    transport: Box<dyn Transport>,
}

impl GeocodingClient {
    /// An empty `api_key` sends unauthenticated requests.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Ok(Self::with_transport(api_key, HttpTransport::new()?))
    }

    pub fn with_transport(api_key: impl Into<String>, transport: impl Transport + 'static) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: API_URL.to_string(),
            transport: Box::new(transport),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn set_api_key(&mut self, api_key: impl Into<String>) {
        self.api_key = api_key.into();
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the request URL, validating the output format.
    pub fn request_url(&self, request: &GeocodeRequest) -> Result<String> {
        let format = OutputFormat::try_from(request.output_format.as_str())?;

        let mut url = format!(
            "{}/{}?address={}",
            self.base_url,
            format,
            urlencoding::encode(&request.address)
        );

        if let Some(region) = request.region.as_deref().filter(|r| !r.is_empty()) {
            url.push_str("&region=");
            url.push_str(region);
        }

        if !self.api_key.is_empty() {
            url.push_str("&key=");
            url.push_str(&self.api_key);
        }

        Ok(url)
    }

    /// Perform one blocking lookup.
    ///
    /// Fails with `InvalidFormat` before touching the network if the output
    /// format is not `json` or `xml`. A body that does not decode as JSON,
    /// which includes every `xml` reply, comes back as `MalformedResponse`
    /// carrying the raw body.
    pub fn geocode(&self, request: &GeocodeRequest) -> Result<GeocodeResponse> {
        let url = self.request_url(request)?;

        debug!(
            address = %request.address,
            region = request.region.as_deref().unwrap_or_default(),
            format = %request.output_format,
            authenticated = !self.api_key.is_empty(),
            "sending geocode request"
        );

        let body = self.transport.get(&url)?;
        let response = GeocodeResponse::from_body(body)?;

        debug!(
            status = response.status(),
            results = response.results().len(),
            "geocode response decoded"
        );
        if let Some(message) = response.error_message() {
            warn!(status = response.status(), error_message = message, "provider reported an error");
        }

        Ok(response)
    }

    /// Coordinates for `address`, or `None` if the provider status is not `OK`.
    pub fn lat_lng(&self, address: &str) -> Result<Option<Vec<LatLng>>> {
        let response = self.geocode(&GeocodeRequest::new(address))?;
        Ok(response.lat_lng())
    }

    /// `true` iff the provider answers `OK` for `address`. An empty region is
    /// the same as none.
    pub fn is_address_valid(&self, address: &str, region: &str) -> Result<bool> {
        let mut request = GeocodeRequest::new(address);
        if !region.is_empty() {
            request = request.with_region(region);
        }

        Ok(self.geocode(&request)?.is_ok())
    }
}
