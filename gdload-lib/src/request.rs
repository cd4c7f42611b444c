use crate::error::DownloadError;
use reqwest::Url;
use std::path::{Path, PathBuf};

/// A single user-triggered load: where the bundle comes from, where it lands
/// and the checksum to hand to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub source_url: Url,
    pub destination_path: PathBuf,
    /// Opaque, passed through to the engine without being checked.
    pub checksum: String,
}

impl DownloadRequest {
    pub fn new(url: &str, bundle_dir: &Path, checksum: &str) -> Result<Self, DownloadError> {
        let source_url = parse_bundle_url(url)?;
        let file_name = bundle_file_name(&source_url)?;

        if !bundle_dir.is_absolute() {
            return Err(DownloadError::filesystem(
                bundle_dir,
                std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "bundle directory must be an absolute path",
                ),
            ));
        }

        Ok(Self {
            source_url,
            destination_path: bundle_dir.join(file_name),
            checksum: checksum.to_string(),
        })
    }
}

pub fn parse_bundle_url(url: &str) -> Result<Url, DownloadError> {
    let parsed = Url::parse(url.trim()).map_err(|e| DownloadError::invalid_url(url, e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(DownloadError::invalid_url(
            url,
            format!("unsupported scheme '{scheme}'"),
        )),
    }
}

/// Everything after the last `/` of the URL path.
///
/// URLs without a usable final segment (`http://host/`, `http://host/dir/`)
/// are rejected rather than producing an empty or directory-like file name.
pub fn bundle_file_name(url: &Url) -> Result<String, DownloadError> {
    let name = url.path().rsplit('/').next().unwrap_or_default();

    if name.is_empty() || name == "." || name == ".." {
        return Err(DownloadError::invalid_url(
            url.as_str(),
            "URL does not end with a file name",
        ));
    }

    Ok(name.to_string())
}
