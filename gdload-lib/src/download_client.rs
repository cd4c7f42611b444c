use crate::config::Config;
use crate::error::DownloadError;
use crate::logging::progress_bar_style;
use futures_util::StreamExt;
use reqwest::{Client, Url};
use std::path::Path;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tracing::instrument;
use tracing_indicatif::span_ext::IndicatifSpanExt;

pub trait DownloadClient: Send + Sync {
    /// Streams `url` into `output_path`, replacing any existing file.
    /// Returns the number of bytes written.
    fn download(
        &self,
        url: &Url,
        output_path: &Path,
    ) -> impl Future<Output = Result<u64, DownloadError>> + Send;
}

pub struct HttpDownloadClient {
    client: Client,
}

impl HttpDownloadClient {
    pub fn new(config: &Config) -> Result<Self, DownloadError> {
        let client = build_client(
            concat!("gdload/", env!("CARGO_PKG_VERSION")),
            config.connect_timeout,
        )?;
        Ok(Self { client })
    }
}

fn build_client(
    user_agent: &str,
    connect_timeout: Option<Duration>,
) -> Result<Client, DownloadError> {
    let mut builder = Client::builder().user_agent(user_agent);
    if let Some(timeout) = connect_timeout {
        builder = builder.connect_timeout(timeout);
    }
    builder.build().map_err(DownloadError::Client)
}

impl DownloadClient for HttpDownloadClient {
    #[instrument(skip_all)]
    async fn download(&self, url: &Url, path: &Path) -> Result<u64, DownloadError> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| url.to_string());

        let current_span = tracing::Span::current();
        if let Ok(style) = progress_bar_style() {
            current_span.pb_set_style(&style);
        }
        current_span.pb_set_message(&format!("Downloading {name}..."));
        current_span.pb_set_finish_message(&format!("Downloading {name}... Complete!"));

        let connection_error = |source| DownloadError::Connection {
            url: url.to_string(),
            source,
        };

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(connection_error)?;

        if !response.status().is_success() {
            return Err(DownloadError::Status {
                url: url.to_string(),
                status: response.status(),
            });
        }

        if let Some(length) = response.content_length() {
            current_span.pb_set_length(length);
        }

        if tokio::fs::try_exists(path).await.unwrap_or(false) {
            tracing::debug!("Replacing existing bundle at {}", path.display());
        } else {
            tracing::debug!("Creating bundle at {}", path.display());
        }

        // Truncates an existing file, so no bytes of a previous bundle survive
        let mut file = tokio::fs::File::create(path)
            .await
            .map_err(|e| DownloadError::filesystem(path, e))?;
        let mut downloaded = 0u64;
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| {
                tracing::warn!(
                    "Transfer interrupted, partial bundle left at {}",
                    path.display()
                );
                connection_error(e)
            })?;
            file.write_all(&chunk)
                .await
                .map_err(|e| DownloadError::filesystem(path, e))?;
            downloaded += chunk.len() as u64;

            current_span.pb_set_position(downloaded);
        }

        file.flush()
            .await
            .map_err(|e| DownloadError::filesystem(path, e))?;
        Ok(downloaded)
    }
}
