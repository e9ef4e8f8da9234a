use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use rand::Rng;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT_LANGUAGE, USER_AGENT};

use crate::error::PipelineError;

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const BROWSER_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

/// Explicit retry configuration for the fetcher (no library defaults).
#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub backoff_base: Duration,
    pub backoff_max: Duration,
    pub retryable_statuses: Vec<u16>,
    pub timeout: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            backoff_base: Duration::from_millis(500),
            backoff_max: Duration::from_secs(30),
            retryable_statuses: vec![429, 500, 502, 503, 504],
            timeout: Duration::from_secs(10),
        }
    }
}

impl RetryConfig {
    fn is_retryable(&self, status: StatusCode) -> bool {
        self.retryable_statuses.contains(&status.as_u16())
    }

    fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let delay_ms = self.backoff_base.as_millis() as u64 * (1u64 << attempt.min(16));
        Duration::from_millis(delay_ms).min(self.backoff_max)
    }
}

/// Source of raw page documents. The production implementation talks HTTP;
/// tests substitute canned documents keyed by url.
pub trait PageSource {
    fn fetch_page(&self, url: &str) -> Result<String, PipelineError>;
}

/// Blocking HTTP fetcher with bounded retries and a politeness delay
/// before every outbound request.
pub struct HttpFetcher {
    client: Client,
    retry: RetryConfig,
    delay_min: Duration,
    delay_max: Duration,
}

impl HttpFetcher {
    pub fn new(retry: RetryConfig, delay_min: Duration, delay_max: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(retry.timeout)
            .build()
            .context("failed to build http client")?;
        Ok(Self {
            client,
            retry,
            delay_min,
            delay_max,
        })
    }

    fn politeness_pause(&self) {
        let min = self.delay_min.as_millis() as u64;
        let max = self.delay_max.as_millis() as u64;
        if max == 0 {
            return;
        }
        let wait_ms = if max > min {
            rand::thread_rng().gen_range(min..=max)
        } else {
            min
        };
        thread::sleep(Duration::from_millis(wait_ms));
    }

    fn exhausted(url: &str, detail: String) -> PipelineError {
        PipelineError::FetchExhausted {
            url: url.to_string(),
            detail,
        }
    }
}

impl PageSource for HttpFetcher {
    fn fetch_page(&self, url: &str) -> Result<String, PipelineError> {
        let mut last_detail = String::from("no attempts made");

        for attempt in 0..self.retry.max_attempts {
            self.politeness_pause();

            let sent = self
                .client
                .get(url)
                .header(USER_AGENT, BROWSER_USER_AGENT)
                .header(ACCEPT_LANGUAGE, BROWSER_ACCEPT_LANGUAGE)
                .send();

            match sent {
                Ok(resp) => {
                    let status = resp.status();
                    if status.is_success() {
                        return resp
                            .text()
                            .map_err(|err| Self::exhausted(url, format!("body read: {err}")));
                    }
                    if !self.retry.is_retryable(status) {
                        return Err(Self::exhausted(url, format!("http {status}")));
                    }
                    last_detail = format!("http {status}");
                }
                Err(err) => {
                    last_detail = err.to_string();
                }
            }

            if attempt + 1 < self.retry.max_attempts {
                thread::sleep(self.retry.delay_for_attempt(attempt));
            }
        }

        Err(Self::exhausted(url, last_detail))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_then_caps() {
        let retry = RetryConfig {
            backoff_base: Duration::from_millis(100),
            backoff_max: Duration::from_secs(1),
            ..RetryConfig::default()
        };
        assert_eq!(retry.delay_for_attempt(0), Duration::from_millis(100));
        assert_eq!(retry.delay_for_attempt(1), Duration::from_millis(200));
        assert_eq!(retry.delay_for_attempt(2), Duration::from_millis(400));
        assert_eq!(retry.delay_for_attempt(10), Duration::from_secs(1));
    }

    #[test]
    fn retryable_statuses_match_server_side_classes() {
        let retry = RetryConfig::default();
        assert!(retry.is_retryable(StatusCode::TOO_MANY_REQUESTS));
        assert!(retry.is_retryable(StatusCode::BAD_GATEWAY));
        assert!(!retry.is_retryable(StatusCode::NOT_FOUND));
    }
}
