//! Artefact download.
//!
//! Provides a trait-based abstraction so that tests can replace HTTP with
//! mocks. `file://` URLs are copied from the local filesystem, which lets
//! mirrors and local builds go through the same verification path.

use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

/// Network timeout for artefact downloads.
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Scheme prefix of local file URLs.
const FILE_SCHEME: &str = "file://";

/// Trait for downloading release artefacts.
///
/// # Examples
///
/// ```
/// use iedit_installer::artefact::download::HttpDownloader;
///
/// let downloader = HttpDownloader;
/// // Use downloader.download(url, dest) in production
/// ```
#[cfg_attr(test, mockall::automock)]
pub trait ArtefactDownloader {
    /// Download `url` into the file at `dest`.
    ///
    /// # Errors
    ///
    /// Returns an error if the download fails, the asset is not found or
    /// the file cannot be written.
    fn download(&self, url: &str, dest: &Path) -> Result<(), DownloadError>;
}

/// Errors arising from artefact download operations.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// HTTP request failed.
    #[error("download failed for {url}: {reason}")]
    HttpError {
        /// The URL that was requested.
        url: String,
        /// A human-readable description of the failure.
        reason: String,
    },

    /// The requested artefact was not found (HTTP 404 or missing file).
    #[error("artefact not found: {url}")]
    NotFound {
        /// The URL that could not be found.
        url: String,
    },

    /// I/O error writing the downloaded file.
    #[error("I/O error writing download: {0}")]
    Io(#[from] std::io::Error),
}

/// Downloader using `ureq` for `http(s)` URLs.
pub struct HttpDownloader;

impl ArtefactDownloader for HttpDownloader {
    fn download(&self, url: &str, dest: &Path) -> Result<(), DownloadError> {
        match url.strip_prefix(FILE_SCHEME) {
            Some(local) => copy_local(url, Path::new(local), dest),
            None => download_to_file(url, dest),
        }
    }
}

fn copy_local(url: &str, source: &Path, dest: &Path) -> Result<(), DownloadError> {
    if !source.is_file() {
        return Err(DownloadError::NotFound {
            url: url.to_owned(),
        });
    }
    log::debug!("copying {} to {}", source.display(), dest.display());
    std::fs::copy(source, dest)?;
    Ok(())
}

/// Download a URL and write the body to a file.
fn download_to_file(url: &str, dest: &Path) -> Result<(), DownloadError> {
    log::debug!("GET {url}");
    let response = http_agent()
        .get(url)
        .call()
        .map_err(|e| map_ureq_error(url, &e))?;
    let mut file = std::fs::File::create(dest)?;
    std::io::copy(&mut response.into_body().as_reader(), &mut file).map_err(DownloadError::Io)?;
    Ok(())
}

/// Shared `ureq` agent with request timeout configuration.
fn http_agent() -> &'static ureq::Agent {
    static AGENT: OnceLock<ureq::Agent> = OnceLock::new();
    AGENT.get_or_init(|| {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(DOWNLOAD_TIMEOUT))
            .build();
        ureq::Agent::new_with_config(config)
    })
}

/// Map a ureq error to a [`DownloadError`].
fn map_ureq_error(url: &str, err: &ureq::Error) -> DownloadError {
    match err {
        ureq::Error::StatusCode(404) => DownloadError::NotFound {
            url: url.to_owned(),
        },
        other => DownloadError::HttpError {
            url: url.to_owned(),
            reason: other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_ureq_error_maps_404_to_not_found() {
        let err = ureq::Error::StatusCode(404);
        let mapped = map_ureq_error("https://example.test/iedit-linux", &err);
        assert!(matches!(mapped, DownloadError::NotFound { .. }));
    }

    #[test]
    fn map_ureq_error_maps_other_status_to_http_error() {
        let err = ureq::Error::StatusCode(500);
        let mapped = map_ureq_error("https://example.test/iedit-linux", &err);
        assert!(matches!(mapped, DownloadError::HttpError { .. }));
    }

    #[test]
    fn file_urls_are_copied() {
        let dir = tempfile::tempdir().expect("temp dir");
        let source = dir.path().join("iedit-linux");
        std::fs::write(&source, b"binary").expect("write source");
        let dest = dir.path().join("download");

        let url = format!("file://{}", source.display());
        HttpDownloader.download(&url, &dest).expect("copy");
        assert_eq!(std::fs::read(&dest).expect("read"), b"binary");
    }

    #[test]
    fn missing_file_urls_are_not_found() {
        let dir = tempfile::tempdir().expect("temp dir");
        let url = format!("file://{}", dir.path().join("absent").display());
        let result = HttpDownloader.download(&url, &dir.path().join("dest"));
        assert!(matches!(result, Err(DownloadError::NotFound { .. })));
    }
}
