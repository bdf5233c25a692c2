use anyhow::{Result, anyhow, bail};
use bytes::Bytes;
use geomosaic_core::config::ServiceConfig;
use std::time::Duration;
use tokio::time::sleep;

/// An HTTP client that retries transient failures with exponential backoff.
///
/// Connection errors, timeouts, body read errors and unsuccessful status codes are retried up
/// to `max_retries` times, waiting 1 s, 2 s, 4 s, … in between. A 404 is never retried.
#[derive(Debug, Clone)]
pub struct RetryingClient {
	client: reqwest::Client,
	max_retries: u32,
	backoff: Duration,
}

fn is_retryable_error(err: &reqwest::Error) -> bool {
	err.is_connect() || err.is_timeout() || err.is_body()
}

impl RetryingClient {
	pub fn new(config: &ServiceConfig) -> Result<RetryingClient> {
		let client = reqwest::Client::builder()
			.tcp_keepalive(Duration::from_secs(600))
			.timeout(Duration::from_secs(config.timeout_seconds))
			.user_agent(config.user_agent.as_str())
			.use_rustls_tls()
			.build()?;
		Ok(RetryingClient {
			client,
			max_retries: config.max_retries,
			backoff: Duration::from_secs(1),
		})
	}

	/// Replaces the base delay between attempts.
	#[must_use]
	pub fn with_backoff(mut self, backoff: Duration) -> Self {
		self.backoff = backoff;
		self
	}

	/// Fetches `url` and returns the body. `name` identifies the request in log messages,
	/// so credentials in the query string never reach the log.
	pub async fn get(&self, url: &str, name: &str) -> Result<Bytes> {
		let max_retries = self.max_retries;

		for attempt in 0..=max_retries {
			if attempt > 0 {
				let backoff = self.backoff * (1 << (attempt - 1).min(16));
				log::warn!("retry attempt {attempt}/{max_retries} fetching {name}, waiting {backoff:?}");
				sleep(backoff).await;
			}

			let response = match self.client.get(url).send().await {
				Ok(r) => r,
				Err(e) if is_retryable_error(&e) && attempt < max_retries => {
					log::warn!("retryable error fetching {name}: {}", e.without_url());
					continue;
				}
				Err(e) => bail!("failed to fetch {name}: {}", e.without_url()),
			};

			let status = response.status();
			if status == reqwest::StatusCode::NOT_FOUND {
				bail!("{name} not found (HTTP 404)");
			}

			if !status.is_success() {
				if attempt < max_retries {
					log::warn!("HTTP {status} fetching {name}, retrying");
					continue;
				}
				bail!("failed to fetch {name}: HTTP {status}");
			}

			match response.bytes().await {
				Ok(bytes) => return Ok(bytes),
				Err(e) if is_retryable_error(&e) && attempt < max_retries => {
					log::warn!("retryable error reading body of {name}: {}", e.without_url());
				}
				Err(e) => bail!("failed to read body of {name}: {}", e.without_url()),
			}
		}

		Err(anyhow!("failed to fetch {name} after {max_retries} retries"))
	}
}
