use anyhow::Result;

/// Blocking transport for downloading a remote file in full.
pub trait HttpClient {
    fn get_bytes(&self, url: &str) -> Result<Vec<u8>>;
}
