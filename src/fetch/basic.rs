use std::time::Duration;

use anyhow::{Context, Result};

use super::client::HttpClient;

/// [`HttpClient`] backed by `reqwest`'s blocking client.
///
/// Requests never time out; monthly files run to hundreds of megabytes.
pub struct BasicClient(reqwest::blocking::Client);

impl BasicClient {
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(None::<Duration>)
            .build()?;
        Ok(Self(client))
    }
}

impl HttpClient for BasicClient {
    fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let resp = self
            .0
            .get(url)
            .send()
            .with_context(|| format!("GET {url}"))?
            .error_for_status()?;
        Ok(resp.bytes()?.to_vec())
    }
}
