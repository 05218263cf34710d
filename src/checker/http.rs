// src/checker/http.rs
// =============================================================================
// This module checks if remote URLs are alive by making HTTP requests.
//
// Key functionality:
// - The LinkStatus / DeadReason types every checker reports with
// - The concurrent strategy: one request per link, all in flight at once
// - VerifyStrategy: picks the concurrent or the sequential checker
//
// Rules shared by both strategies:
// - Exactly HTTP 200 is alive; any other final status is dead
// - Transport failures (refused, timed out, TLS, ...) are dead too
// - Redirects are followed, at most 5 of them
// - Certificates are NOT validated. Documentation routinely links to
//   staging hosts and self-signed endpoints; we want to know whether they
//   answer, not whether their certificate chain is in order.
//
// Only the sequential strategy retries (see retry.rs). The concurrent one
// reports the first answer it gets.
//
// Rust concepts:
// - async/await: For concurrent network I/O
// - FuturesUnordered: Drive many futures at once, collect as they finish
// - Enums with data: DeadReason::Status(404)
// =============================================================================

use super::links::LinkRecord;
use super::sequential;
use anyhow::{Context, Result};
use futures::future;
use futures::stream::{FuturesUnordered, StreamExt};
use reqwest::header::HeaderMap;
use reqwest::{Client, Method};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;
use url::Url;

use crate::config::ConfigError;

/// Per-request timeout of the concurrent strategy.
pub const CONCURRENT_TIMEOUT: Duration = Duration::from_secs(10);

/// Pause after all concurrent requests settled, before the client (and its
/// TLS connections) is torn down.
pub const SETTLE_PAUSE: Duration = Duration::from_millis(250);

pub const MAX_REDIRECTS: usize = 5;

// Represents the status of a link after checking
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum LinkStatus {
    /// Existing file, or HTTP 200
    Alive,
    /// Missing file, non-200 status, or transport failure
    Dead(DeadReason),
    /// The link has no target
    Empty,
    /// The link matched an exclude pattern
    Ignored,
    /// No request could be made for the link (e.g. an unparseable URL)
    Error(String),
}

impl LinkStatus {
    /// The status code, transport failure or error message, if any.
    pub fn reason(&self) -> Option<String> {
        match self {
            LinkStatus::Dead(reason) => Some(reason.to_string()),
            LinkStatus::Error(message) => Some(message.clone()),
            _ => None,
        }
    }

    /// The marker printed in front of a problem in the report.
    pub fn symbol(&self) -> &'static str {
        match self {
            LinkStatus::Alive => "✓",
            LinkStatus::Dead(_) => "✖",
            LinkStatus::Empty => "-",
            LinkStatus::Ignored => "/",
            LinkStatus::Error(_) => "⚠",
        }
    }
}

/// Why a link is dead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeadReason {
    /// The server answered with something other than 200
    Status(u16),
    /// The request failed before a status arrived
    Transport(String),
    /// A local target that does not exist
    NotFound,
}

impl fmt::Display for DeadReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeadReason::Status(code) => write!(f, "{code}"),
            DeadReason::Transport(description) => f.write_str(description),
            DeadReason::NotFound => f.write_str("not found"),
        }
    }
}

impl Serialize for DeadReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A remote link that did not come back alive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFailure {
    pub link: LinkRecord,
    /// Either `Dead` or `Error`
    pub status: LinkStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMethod {
    Get,
    Head,
}

impl FromStr for RequestMethod {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "get" => Ok(RequestMethod::Get),
            "head" => Ok(RequestMethod::Head),
            _ => Err(ConfigError::UnknownMethod(s.to_string())),
        }
    }
}

impl From<RequestMethod> for Method {
    fn from(method: RequestMethod) -> Self {
        match method {
            RequestMethod::Get => Method::GET,
            RequestMethod::Head => Method::HEAD,
        }
    }
}

/// How remote links are verified. Both variants agree on what alive and
/// dead mean; only the sequential one has a retry step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerifyStrategy {
    /// All requests in flight together on the async runtime
    #[default]
    Concurrent,
    /// One blocking request at a time, in extraction order
    Sequential,
}

impl VerifyStrategy {
    /// The method used when the caller did not pick one. Many servers
    /// reject HEAD from scripts, so the concurrent checker (which never
    /// retries) defaults to GET.
    pub fn default_method(self) -> RequestMethod {
        match self {
            VerifyStrategy::Concurrent => RequestMethod::Get,
            VerifyStrategy::Sequential => RequestMethod::Head,
        }
    }

    // Verifies remote links and returns the ones that are not alive
    //
    // Parameters:
    //   links: remote links, owned; each one is requested exactly once
    //   method: request method, or None for the strategy default
    //   headers: headers sent with every request (user agent etc.)
    //
    // Returns: failures only. Err is reserved for setup problems such as
    // an HTTP client that cannot be built.
    pub async fn verify(
        self,
        links: Vec<LinkRecord>,
        method: Option<RequestMethod>,
        headers: &HeaderMap,
    ) -> Result<Vec<RemoteFailure>> {
        let method = method.unwrap_or_else(|| self.default_method());

        match self {
            VerifyStrategy::Concurrent => verify_concurrently(links, method, headers).await,
            VerifyStrategy::Sequential => {
                let headers = headers.clone();
                // The blocking client must not run on an async worker thread
                tokio::task::spawn_blocking(move || {
                    sequential::verify_sequentially(links, method, &headers)
                })
                .await
                .context("sequential link checker panicked")?
            }
        }
    }
}

// Checks all links concurrently
//
// Every link gets its own request future; FuturesUnordered polls them all
// at once and yields results in completion order. Results are gathered
// here, on the calling task, so nothing else ever touches them.
pub async fn verify_concurrently(
    links: Vec<LinkRecord>,
    method: RequestMethod,
    headers: &HeaderMap,
) -> Result<Vec<RemoteFailure>> {
    // One client per run; dropped (closing its connection pool) on return
    let client = Client::builder()
        .default_headers(headers.clone())
        .timeout(CONCURRENT_TIMEOUT)
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
        .danger_accept_invalid_certs(true)
        .build()
        .context("failed to create HTTP client")?;

    let failures: Vec<RemoteFailure> = links
        .into_iter()
        .map(|link| check_remote_link(&client, link, method))
        .collect::<FuturesUnordered<_>>()
        .filter_map(future::ready)
        .collect()
        .await;

    tokio::time::sleep(SETTLE_PAUSE).await;

    Ok(failures)
}

async fn check_remote_link(
    client: &Client,
    link: LinkRecord,
    method: RequestMethod,
) -> Option<RemoteFailure> {
    let url = match parse_remote_url(&link) {
        Ok(url) => url,
        Err(failure) => return Some(failure),
    };

    match client.request(method.into(), url).send().await {
        Ok(response) => classify_status(link, response.status().as_u16()),
        Err(e) => Some(transport_failure(link, &e)),
    }
}

/// Parses the link text into a URL; a link that does not parse cannot be
/// requested and becomes an `Error` outcome.
pub(super) fn parse_remote_url(link: &LinkRecord) -> Result<Url, RemoteFailure> {
    Url::parse(&link.url).map_err(|e| RemoteFailure {
        link: link.clone(),
        status: LinkStatus::Error(format!("invalid URL: {e}")),
    })
}

/// 200 is alive (None); anything else is a dead link.
pub(super) fn classify_status(link: LinkRecord, code: u16) -> Option<RemoteFailure> {
    if code == 200 {
        info!("OK: {:80}", link.url);
        None
    } else {
        info!("NOT FOUND: {:80} ({code})", link.url);
        Some(RemoteFailure {
            link,
            status: LinkStatus::Dead(DeadReason::Status(code)),
        })
    }
}

pub(super) fn transport_failure(link: LinkRecord, error: &reqwest::Error) -> RemoteFailure {
    let status = if error.is_builder() {
        LinkStatus::Error(error.to_string())
    } else {
        LinkStatus::Dead(DeadReason::Transport(describe_error(error)))
    };
    info!("FAILED: {:80} ({status:?})", link.url);
    RemoteFailure { link, status }
}

// Turns a reqwest error into a short, human readable description
fn describe_error(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        "request timed out".to_string()
    } else if error.is_redirect() {
        "too many redirects".to_string()
    } else if error.is_connect() {
        format!("connection failed: {}", root_cause(error))
    } else {
        error.to_string()
    }
}

fn root_cause(error: &(dyn std::error::Error + 'static)) -> String {
    let mut current = error;
    while let Some(source) = current.source() {
        current = source;
    }
    current.to_string()
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why FuturesUnordered instead of spawning tasks?
//    - All request futures run on the current task, so they can borrow
//      the client instead of cloning it into each task
//    - Results come back as each request finishes, not in input order
//
// 2. What is future::ready?
//    - filter_map on a stream expects a future returning Option<T>
//    - future::ready wraps a plain value in an already-completed future
//
// 3. Why spawn_blocking for the sequential strategy?
//    - reqwest::blocking runs its own small runtime internally
//    - Blocking inside an async task would stall the executor (and
//      reqwest panics if you try), so it runs on tokio's blocking pool
// -----------------------------------------------------------------------------
