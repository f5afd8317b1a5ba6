use reqwest::blocking::Client;
use std::fmt::Debug;
use tracing::debug;

use crate::error::Result;

/// Blocking GET that returns the response body as text.
pub trait Transport: Send + Sync + Debug {
    fn get(&self, url: &str) -> Result<String>;
}

/// Default transport backed by `reqwest`'s blocking client.
///
/// The blocking client ships with a 30 second total timeout; it is switched
/// off here and no retry is attempted. Non-2xx responses are not errors: the
/// provider reports failures in the body.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        let http = Client::builder().timeout(None).build()?;
        Ok(Self { http })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> Result<String> {
        let res = self.http.get(url).send()?;

        let status = res.status();
        if !status.is_success() {
            debug!(%status, "provider answered with non-success HTTP status");
        }

        Ok(res.text()?)
    }
}
