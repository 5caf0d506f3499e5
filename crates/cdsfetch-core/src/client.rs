//! Blocking retrieval client for the CDS API.
//!
//! Uses the curl crate (libcurl) for the submit → poll → download flow: a
//! request is POSTed to its dataset endpoint, the resulting task is polled
//! until it completes, and the result file is streamed to the target path
//! (temp file first, renamed on success). Transient failures on any of the
//! three calls go through the retry policy; a failed task does not.

use anyhow::{anyhow, bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::config::CdsConfig;
use crate::retry::{run_with_retry, RetryPolicy, TransferError};

/// Task states the API reports while a request works through the queue.
const STATE_COMPLETED: &str = "completed";
const STATE_FAILED: &str = "failed";

/// Reply to a request submission or a task status poll.
#[derive(Debug, Clone, Deserialize)]
struct TaskReply {
    state: String,
    #[serde(default)]
    request_id: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    reason: Option<String>,
}

impl TaskReply {
    fn failure_detail(&self) -> String {
        match (&self.message, &self.reason) {
            (Some(m), Some(r)) => format!("{m}: {r}"),
            (Some(m), None) => m.clone(),
            (None, Some(r)) => r.clone(),
            (None, None) => "no detail given".to_string(),
        }
    }
}

/// Client for one configured CDS endpoint.
#[derive(Debug)]
pub struct CdsClient {
    base: Url,
    credentials: Option<(String, String)>,
    poll_interval: Duration,
    policy: RetryPolicy,
}

impl CdsClient {
    pub fn new(config: &CdsConfig) -> Result<Self> {
        let base = Url::parse(&config.url).context("invalid CDS API url")?;
        let credentials = match &config.key {
            Some(key) => {
                let (uid, secret) = key
                    .split_once(':')
                    .context("API key must be in `uid:key` form")?;
                Some((uid.to_string(), secret.to_string()))
            }
            None => None,
        };
        Ok(Self {
            base,
            credentials,
            poll_interval: Duration::from_secs(config.poll_interval_secs.max(1)),
            policy: RetryPolicy::from_config(config.retry.as_ref()),
        })
    }

    /// Submits a request, waits for the task to complete, and downloads the
    /// result to `target`. Blocks for the whole round trip.
    pub fn retrieve(
        &self,
        dataset: &str,
        body: &serde_json::Value,
        target: &Path,
    ) -> Result<PathBuf> {
        let submit_url = self.endpoint(&format!("resources/{dataset}"))?;
        let payload = serde_json::to_vec(body).context("serializing request body")?;

        tracing::info!("submitting request for dataset {dataset}");
        tracing::debug!("request body: {body}");
        let mut reply = run_with_retry(&self.policy, || self.api_call(&submit_url, Some(&payload)))
            .with_context(|| format!("submitting request for dataset {dataset}"))?;

        loop {
            match reply.state.as_str() {
                STATE_COMPLETED => break,
                STATE_FAILED => bail!("CDS task failed: {}", reply.failure_detail()),
                state => {
                    let id = reply
                        .request_id
                        .clone()
                        .context("task reply carries no request_id")?;
                    tracing::debug!("task {id} is {state}, polling again shortly");
                    std::thread::sleep(self.poll_interval);
                    let poll_url = self.endpoint(&format!("tasks/{id}"))?;
                    reply = run_with_retry(&self.policy, || self.api_call(&poll_url, None))
                        .context("polling task status")?;
                }
            }
        }

        let location = reply
            .location
            .context("completed task carries no result location")?;
        let result_url = self
            .base
            .join(&location)
            .context("invalid result location")?;

        tracing::info!("downloading result to {}", target.display());
        let written = run_with_retry(&self.policy, || self.download(&result_url, target))
            .with_context(|| format!("downloading result to {}", target.display()))?;
        tracing::info!("wrote {written} bytes to {}", target.display());

        Ok(target.to_path_buf())
    }

    /// Resolves an API path against the configured base, keeping any base
    /// path component (e.g. `/api`).
    fn endpoint(&self, path: &str) -> Result<Url> {
        let mut url = self.base.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| anyhow!("CDS url cannot be a base"))?;
            segments.pop_if_empty();
            for part in path.split('/') {
                segments.push(part);
            }
        }
        Ok(url)
    }

    fn apply_auth(&self, easy: &mut curl::easy::Easy) -> Result<(), TransferError> {
        if let Some((uid, secret)) = &self.credentials {
            easy.username(uid)?;
            easy.password(secret)?;
        }
        Ok(())
    }

    /// One JSON API call: POST when a payload is given, GET otherwise.
    fn api_call(&self, url: &Url, payload: Option<&[u8]>) -> Result<TaskReply, TransferError> {
        let mut response = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(url.as_str())?;
        easy.follow_location(true)?;
        easy.connect_timeout(Duration::from_secs(15))?;
        easy.timeout(Duration::from_secs(60))?;
        self.apply_auth(&mut easy)?;

        let mut list = curl::easy::List::new();
        list.append("Content-Type: application/json")?;
        easy.http_headers(list)?;

        if let Some(body) = payload {
            easy.post(true)?;
            easy.post_fields_copy(body)?;
        }

        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                response.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let code = easy.response_code()?;
        if !(200..300).contains(&code) {
            return Err(TransferError::Http(code));
        }

        serde_json::from_slice(&response).map_err(TransferError::Payload)
    }

    /// Streams a result file to `target` via a `.part` temp file.
    fn download(&self, url: &Url, target: &Path) -> Result<u64, TransferError> {
        if let Some(parent) = target.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let part_path = part_path(target);
        let mut file = fs::File::create(&part_path)?;
        let mut write_error: Option<std::io::Error> = None;

        let mut easy = curl::easy::Easy::new();
        easy.url(url.as_str())?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        easy.connect_timeout(Duration::from_secs(30))?;
        easy.low_speed_limit(1024)?;
        easy.low_speed_time(Duration::from_secs(60))?;
        self.apply_auth(&mut easy)?;

        let perform_result = {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| match file.write_all(data) {
                Ok(()) => Ok(data.len()),
                Err(e) => {
                    write_error = Some(e);
                    Ok(0) // abort transfer
                }
            })?;
            transfer.perform()
        };

        // A local write failure surfaces as a curl write error; report the
        // storage cause instead so it is not classified as retryable.
        if let Some(e) = write_error.take() {
            return Err(TransferError::Storage(e));
        }
        perform_result?;

        let code = easy.response_code()?;
        if !(200..300).contains(&code) {
            return Err(TransferError::Http(code));
        }

        file.flush()?;
        drop(file);
        let written = fs::metadata(&part_path)?.len();
        fs::rename(&part_path, target)?;
        Ok(written)
    }
}

fn part_path(target: &Path) -> PathBuf {
    let mut name = target.as_os_str().to_os_string();
    name.push(".part");
    PathBuf::from(name)
}
