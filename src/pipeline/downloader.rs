use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::blocking::Client;
use tracing::{debug, info, warn};

use crate::config::pipeline::DownloadConfig;
use crate::error::{PipelineError, Result};

const RETRY_BASE_DELAY: Duration = Duration::from_secs(1);
const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

// Fragments that identify certificate / handshake failures in the error source chain.
const TLS_MARKERS: &[&str] = &["certificate", "tls", "ssl", "handshake"];

/// Network retrieval of raw document bytes.
pub trait Fetcher: Send + Sync {
    fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// HTTPS fetcher. Certificates are verified against the bundled webpki roots (rustls).
pub struct HttpFetcher {
    client: Client,
    max_size: u64,
    max_attempts: usize,
    retry_base_delay: Duration,
}

impl HttpFetcher {
    pub fn new(config: &DownloadConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .use_rustls_tls()
            .build()
            .map_err(|e| PipelineError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(HttpFetcher {
            client,
            max_size: config.max_size_bytes,
            max_attempts: config.max_attempts,
            retry_base_delay: RETRY_BASE_DELAY,
        })
    }

    /// Overrides the first backoff delay (1s by default).
    pub fn with_retry_base_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }

    fn fetch_once(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| classify_reqwest_error(url, &e))?;

        let response = response
            .error_for_status()
            .map_err(|e| classify_reqwest_error(url, &e))?;

        if let Some(content_length) = response.content_length() {
            if content_length > self.max_size {
                return Err(too_large(url, content_length));
            }
        }

        let bytes = response.bytes().map_err(|e| classify_reqwest_error(url, &e))?;
        if bytes.len() as u64 > self.max_size {
            return Err(too_large(url, bytes.len() as u64));
        }

        Ok(bytes.to_vec())
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        fetch_with_retry(url, self.max_attempts, self.retry_base_delay, || {
            self.fetch_once(url)
        })
    }
}

/// Runs `fetch_once` up to `max_attempts` times, backing off between attempts
/// (see [`backoff_delay`]). TLS verification failures are returned immediately.
pub fn fetch_with_retry<F>(
    url: &str,
    max_attempts: usize,
    base_delay: Duration,
    mut fetch_once: F,
) -> Result<Vec<u8>>
where
    F: FnMut() -> Result<Vec<u8>>,
{
    let mut attempt = 1;
    loop {
        match fetch_once() {
            Ok(bytes) => {
                debug!(url, bytes = bytes.len(), attempt, "Fetched document");
                return Ok(bytes);
            }
            Err(e @ PipelineError::TlsVerificationError { .. }) => return Err(e),
            Err(e) if attempt < max_attempts => {
                let delay = backoff_delay(base_delay, attempt);
                warn!(
                    url,
                    attempt,
                    max_attempts,
                    error = %e,
                    "Download attempt failed, retrying in {:?}",
                    delay
                );
                std::thread::sleep(delay);
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Delay after failed attempt `attempt` (1-based): `base`, `2 * base`, `4 * base`, ...
/// never more than 30s.
pub fn backoff_delay(base: Duration, attempt: usize) -> Duration {
    let factor = u32::try_from(attempt.saturating_sub(1))
        .ok()
        .and_then(|shift| 1u32.checked_shl(shift))
        .unwrap_or(u32::MAX);
    base.checked_mul(factor)
        .map_or(MAX_RETRY_DELAY, |delay| delay.min(MAX_RETRY_DELAY))
}

fn too_large(url: &str, size: u64) -> PipelineError {
    PipelineError::TransportError {
        url: url.to_string(),
        reason: format!("document too large: {} bytes", size),
    }
}

/// Maps a reqwest failure onto the transport taxonomy. reqwest's own message already
/// carries its causes, so only the TLS check walks the source chain.
fn classify_reqwest_error(url: &str, err: &reqwest::Error) -> PipelineError {
    let reason = err.to_string();
    if is_tls_failure(err) {
        PipelineError::TlsVerificationError {
            url: url.to_string(),
            reason,
        }
    } else {
        PipelineError::TransportError {
            url: url.to_string(),
            reason,
        }
    }
}

// Only the sources are inspected; the top-level message embeds the URL.
fn is_tls_failure(err: &(dyn std::error::Error + 'static)) -> bool {
    let mut source = err.source();
    while let Some(e) = source {
        if mentions_tls(&e.to_string()) {
            return true;
        }
        source = e.source();
    }
    false
}

fn mentions_tls(message: &str) -> bool {
    let message = message.to_lowercase();
    TLS_MARKERS.iter().any(|marker| message.contains(marker))
}

/// Deterministic temp path for a document. Path separators in the name become `_`.
pub fn temp_path_for(temp_dir: &Path, name: &str) -> PathBuf {
    let safe_name: String = name
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect();
    temp_dir.join(format!("temp_{}.pdf", safe_name))
}

/// Fetches `url` and writes the body to `path`.
pub fn download_to(fetcher: &dyn Fetcher, url: &str, path: &Path) -> Result<()> {
    let bytes = fetcher.fetch(url)?;
    fs::write(path, &bytes)?;
    info!("Downloaded {} successfully.", url);
    Ok(())
}
