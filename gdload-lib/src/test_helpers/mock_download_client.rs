use crate::download_client::DownloadClient;
use crate::error::DownloadError;
use reqwest::Url;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

/// Serves bundles from memory, keyed by the last URL segment.
/// Unknown names fail with a 404 status.
#[derive(Default)]
pub struct MockDownloadClient {
    bundles: HashMap<String, Vec<u8>>,
    delays: HashMap<String, Duration>,
}

impl MockDownloadClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bundle(mut self, name: &str, bytes: &[u8]) -> Self {
        self.bundles.insert(name.to_string(), bytes.to_vec());
        self
    }

    pub fn with_delay(mut self, name: &str, delay: Duration) -> Self {
        self.delays.insert(name.to_string(), delay);
        self
    }
}

impl DownloadClient for MockDownloadClient {
    async fn download(&self, url: &Url, output_path: &Path) -> Result<u64, DownloadError> {
        let name = url.path().rsplit('/').next().unwrap_or_default();

        if let Some(delay) = self.delays.get(name) {
            tokio::time::sleep(*delay).await;
        }

        let Some(bytes) = self.bundles.get(name) else {
            return Err(DownloadError::Status {
                url: url.to_string(),
                status: reqwest::StatusCode::NOT_FOUND,
            });
        };

        tokio::fs::write(output_path, bytes)
            .await
            .map_err(|e| DownloadError::filesystem(output_path, e))?;
        Ok(bytes.len() as u64)
    }
}
