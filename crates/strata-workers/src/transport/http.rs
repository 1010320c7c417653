//! Blocking HTTP transport: `POST {url}/api/worker/execute` with
//! `{type, payload, priority}`. URLs are used round-robin; failed attempts
//! retry on the next URL after a doubling backoff.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use tracing::{debug, warn};

use strata_core::config::WorkerConfig;
use strata_core::errors::{StrataError, StrataResult, WorkerError};
use strata_core::models::WorkerRequest;
use strata_core::traits::IWorkerTransport;

const EXECUTE_PATH: &str = "/api/worker/execute";

pub struct HttpWorkerTransport {
    urls: Vec<String>,
    cursor: AtomicUsize,
    client: reqwest::blocking::Client,
    timeout: Duration,
    max_retries: u32,
    backoff: Duration,
}

impl HttpWorkerTransport {
    pub fn new(config: &WorkerConfig) -> StrataResult<Self> {
        let timeout = Duration::from_secs(config.timeout_secs.max(1));
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| WorkerError::Transport {
                reason: format!("http client: {e}"),
            })?;
        Ok(Self {
            urls: config
                .urls
                .iter()
                .map(|u| u.trim_end_matches('/').to_string())
                .filter(|u| !u.is_empty())
                .collect(),
            cursor: AtomicUsize::new(0),
            client,
            timeout,
            max_retries: config.max_retries,
            backoff: Duration::from_millis(config.backoff_ms),
        })
    }

    fn next_url(&self) -> Option<&str> {
        if self.urls.is_empty() {
            return None;
        }
        let i = self.cursor.fetch_add(1, Ordering::Relaxed) % self.urls.len();
        Some(&self.urls[i])
    }

    fn attempt(&self, base: &str, request: &WorkerRequest) -> StrataResult<serde_json::Value> {
        let url = format!("{base}{EXECUTE_PATH}");
        let response = self.client.post(&url).json(request).send().map_err(|e| {
            if e.is_timeout() {
                WorkerError::Timeout {
                    url: url.clone(),
                    timeout_ms: self.timeout.as_millis() as u64,
                }
            } else {
                WorkerError::Transport {
                    reason: format!("{url}: {e}"),
                }
            }
        })?;

        let status = response.status();
        let body = response.text().map_err(|e| WorkerError::Transport {
            reason: format!("{url}: reading body: {e}"),
        })?;
        if !status.is_success() {
            return Err(WorkerError::Rejected {
                status: status.as_u16(),
                body: body.chars().take(4000).collect(),
            }
            .into());
        }
        Ok(serde_json::from_str(&body).unwrap_or_else(|_| {
            serde_json::json!({ "raw": body.chars().take(4000).collect::<String>() })
        }))
    }
}

impl IWorkerTransport for HttpWorkerTransport {
    fn execute(&self, request: &WorkerRequest) -> StrataResult<serde_json::Value> {
        let mut backoff = self.backoff;
        let mut last_err: Option<StrataError> = None;

        for attempt in 0..=self.max_retries {
            let Some(base) = self.next_url() else {
                break;
            };
            match self.attempt(base, request) {
                Ok(value) => {
                    debug!(
                        url = base,
                        attempt,
                        job_type = %request.job_type,
                        "worker accepted job"
                    );
                    return Ok(value);
                }
                Err(StrataError::WorkerError(WorkerError::Rejected { status, body })) => {
                    return Err(WorkerError::Rejected { status, body }.into());
                }
                Err(e) => {
                    warn!(url = base, attempt, error = %e, "worker attempt failed");
                    last_err = Some(e);
                    if attempt < self.max_retries {
                        thread::sleep(backoff);
                        backoff *= 2;
                    }
                }
            }
        }

        Err(last_err.unwrap_or_else(|| {
            WorkerError::Unavailable {
                reason: "no worker URLs".to_string(),
            }
            .into()
        }))
    }

    fn worker_count(&self) -> usize {
        self.urls.len()
    }

    fn name(&self) -> &str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_rotate() {
        let transport = HttpWorkerTransport::new(&WorkerConfig {
            urls: vec!["http://a/".to_string(), "http://b".to_string()],
            ..WorkerConfig::default()
        })
        .unwrap();
        assert_eq!(transport.worker_count(), 2);
        assert_eq!(transport.next_url(), Some("http://a"));
        assert_eq!(transport.next_url(), Some("http://b"));
        assert_eq!(transport.next_url(), Some("http://a"));
    }

    #[test]
    fn unreachable_worker_reports_a_worker_failure() {
        let transport = HttpWorkerTransport::new(&WorkerConfig {
            urls: vec!["http://127.0.0.1:9".to_string()],
            timeout_secs: 1,
            max_retries: 0,
            backoff_ms: 1,
        })
        .unwrap();
        let err = transport
            .execute(&WorkerRequest {
                job_type: "memory_maintenance".to_string(),
                payload: serde_json::json!({}),
                priority: 4,
            })
            .unwrap_err();
        assert!(err.is_worker_failure());
    }
}
