use std::time::Duration;

use reqwest::Client;
use siren_core::error::{Result, SirenError};

/// Single-shot reader for text blobs behind the object-storage media
/// endpoint. Retries are left to the event source's redelivery.
#[derive(Debug, Clone)]
pub struct BlobClient {
    endpoint: String,
    client: Client,
}

impl BlobClient {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SirenError::Storage(format!("failed to build blob client: {e}")))?;
        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub async fn fetch_text(&self, bucket: &str, name: &str) -> Result<String> {
        let url = format!("{}/{bucket}/{name}", self.endpoint);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SirenError::Storage(format!("GET {url} failed: {e}")))?;
        if !resp.status().is_success() {
            return Err(SirenError::Storage(format!(
                "GET {url} returned {}",
                resp.status()
            )));
        }
        resp.text()
            .await
            .map_err(|e| SirenError::Storage(format!("reading {url} body failed: {e}")))
    }
}
