// src/checker/retry.rs
// =============================================================================
// The fallback probe used by the sequential checker.
//
// Plenty of servers refuse HEAD, answer scripts with 400/404/405/503, or
// simply drop the connection, while serving a perfectly good page to a GET.
// When the first probe gives an ambiguous answer, or fails in transport, we
// make exactly one streaming GET and peek at the start
// of the body: at most 80 lines. If any line carries more than 10 bytes of
// content, the server clearly has something there and the link is alive.
//
// The status of the fallback response is not consulted. A failed fallback
// confirms the original verdict.
// =============================================================================

use reqwest::blocking::Client;
use std::io::{BufRead, BufReader, Read};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Statuses that may mean "blocked" as much as "broken".
pub const AMBIGUOUS_STATUS_CODES: [u16; 4] = [400, 404, 405, 503];

pub const FALLBACK_TIMEOUT: Duration = Duration::from_secs(3);

/// How many lines of the body we look at.
pub const MAX_PREFIX_LINES: usize = 80;

/// A line must be longer than this to count as content.
pub const MIN_CONTENT_BYTES: usize = 10;

// Upper bound on bytes read, for bodies without line breaks
const MAX_PREFIX_BYTES: u64 = 64 * 1024;

pub fn is_ambiguous(code: u16) -> bool {
    AMBIGUOUS_STATUS_CODES.contains(&code)
}

/// Transport failures that get the fallback GET: refused, reset or dropped
/// connections and timeouts. A URL reqwest cannot build a request for, or a
/// redirect loop, will not get better with a second method.
pub fn is_retryable_error(e: &reqwest::Error) -> bool {
    !(e.is_builder() || e.is_redirect())
}

/// Makes the fallback GET; true means the link should count as alive.
pub fn fallback_get(client: &Client, url: &Url) -> bool {
    debug!("Retrying {url} with a streaming GET");

    match client.get(url.clone()).timeout(FALLBACK_TIMEOUT).send() {
        Ok(response) => has_content(response.take(MAX_PREFIX_BYTES)),
        Err(e) => {
            debug!("Fallback GET for {url} failed: {e}");
            false
        }
    }
}

/// Reads at most `MAX_PREFIX_LINES` lines and reports whether any of them
/// has more than `MIN_CONTENT_BYTES` bytes once whitespace is trimmed.
pub fn has_content<R: Read>(body: R) -> bool {
    let mut reader = BufReader::new(body);
    let mut line = Vec::new();

    for _ in 0..MAX_PREFIX_LINES {
        line.clear();
        match reader.read_until(b'\n', &mut line) {
            Ok(0) | Err(_) => return false,
            Ok(_) => {}
        }
        if String::from_utf8_lossy(&line).trim().len() > MIN_CONTENT_BYTES {
            return true;
        }
    }

    false
}
