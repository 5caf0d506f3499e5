//! Retry and backoff policy for CDS transfers.
//!
//! Encapsulates error classification (timeouts, throttling, connection
//! failures) and exponential backoff decisions so the retrieval client can
//! apply one consistent policy to request submission, task polling, and the
//! final result download.

mod classify;
mod error;
mod policy;
mod run;

pub use classify::{classify, classify_curl_error, classify_http_status};
pub use error::TransferError;
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
pub use run::run_with_retry;
