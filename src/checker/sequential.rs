// src/checker/sequential.rs
// =============================================================================
// The sequential (blocking) remote checker.
//
// One request at a time, in the order the links were extracted, with a
// short timeout. It is more forgiving than the concurrent checker: an
// ambiguous status (400, 404, 405, 503) or a transport failure (refused,
// dropped or timed-out connection) gets a second chance through the fallback GET in
// retry.rs. That retry is the one place the two strategies may disagree.
// =============================================================================

use super::http::{
    classify_status, parse_remote_url, transport_failure, DeadReason, LinkStatus, RemoteFailure,
    RequestMethod, MAX_REDIRECTS,
};
use super::links::LinkRecord;
use super::retry::{fallback_get, is_ambiguous, is_retryable_error};
use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::header::HeaderMap;
use std::time::Duration;
use tracing::info;

/// Per-request timeout of the sequential strategy.
pub const SEQUENTIAL_TIMEOUT: Duration = Duration::from_secs(3);

pub fn verify_sequentially(
    links: Vec<LinkRecord>,
    method: RequestMethod,
    headers: &HeaderMap,
) -> Result<Vec<RemoteFailure>> {
    let client = Client::builder()
        .default_headers(headers.clone())
        .timeout(SEQUENTIAL_TIMEOUT)
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
        .danger_accept_invalid_certs(true)
        .build()
        .context("failed to create HTTP client")?;

    Ok(links
        .into_iter()
        .filter_map(|link| check_remote_link(&client, link, method))
        .collect())
}

fn check_remote_link(
    client: &Client,
    link: LinkRecord,
    method: RequestMethod,
) -> Option<RemoteFailure> {
    let url = match parse_remote_url(&link) {
        Ok(url) => url,
        Err(failure) => return Some(failure),
    };

    match client.request(method.into(), url.clone()).send() {
        Ok(response) => {
            let code = response.status().as_u16();
            drop(response);

            if !is_ambiguous(code) {
                return classify_status(link, code);
            }
            if fallback_get(client, &url) {
                info!("OK: {:80} (after retry, first answer {code})", link.url);
                return None;
            }
            info!("NOT FOUND: {:80} ({code})", link.url);
            Some(RemoteFailure {
                link,
                status: LinkStatus::Dead(DeadReason::Status(code)),
            })
        }
        Err(e) if is_retryable_error(&e) => {
            if fallback_get(client, &url) {
                info!("OK: {:80} (after retry)", link.url);
                None
            } else {
                Some(transport_failure(link, &e))
            }
        }
        Err(e) => Some(transport_failure(link, &e)),
    }
}

#[cfg(test)]
mod tests {
    use super::super::http::VerifyStrategy;
    use super::super::test_server::{Route, TestServer};
    use super::*;
    use std::collections::BTreeMap;
    use std::path::PathBuf;
    use std::time::Duration;

    fn link(url: String) -> LinkRecord {
        LinkRecord {
            url,
            source_document: PathBuf::from("docs/index.md"),
            base_path: PathBuf::from("docs"),
        }
    }

    fn headers() -> HeaderMap {
        crate::config::build_headers(&[]).unwrap()
    }

    fn by_url(failures: Vec<RemoteFailure>) -> BTreeMap<String, LinkStatus> {
        failures
            .into_iter()
            .map(|f| (f.link.url, f.status))
            .collect()
    }

    #[test]
    fn test_preserves_extraction_order() {
        let server = TestServer::start(vec![
            Route::any("/b", 500, ""),
            Route::any("/a", 410, ""),
        ]);
        let links = vec![link(server.url("/b")), link(server.url("/a"))];

        let failures = verify_sequentially(links, RequestMethod::Head, &headers()).unwrap();
        let urls: Vec<_> = failures.iter().map(|f| f.link.url.clone()).collect();
        assert_eq!(urls, vec![server.url("/b"), server.url("/a")]);

        let paths: Vec<_> = server.requests().into_iter().map(|r| r.path).collect();
        assert_eq!(paths, vec!["/b", "/a"]);
    }

    #[test]
    fn test_404_with_empty_fallback_body_stays_dead() {
        let server = TestServer::start(vec![Route::any("/404", 404, "")]);

        let failures =
            verify_sequentially(vec![link(server.url("/404"))], RequestMethod::Head, &headers())
                .unwrap();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].status, LinkStatus::Dead(DeadReason::Status(404)));
        assert_eq!(failures[0].status.reason().as_deref(), Some("404"));

        let methods: Vec<_> = server.requests().into_iter().map(|r| r.method).collect();
        assert_eq!(methods, vec!["HEAD", "GET"]);
    }

    #[test]
    fn test_head_rejected_but_get_serves_content_is_alive() {
        let server = TestServer::start(vec![
            Route::new("HEAD", "/page", 405, ""),
            Route::new("GET", "/page", 200, "<html><body>Real page</body></html>"),
        ]);

        let failures =
            verify_sequentially(vec![link(server.url("/page"))], RequestMethod::Head, &headers())
                .unwrap();
        assert!(failures.is_empty());
    }

    #[test]
    fn test_busy_server_with_content_is_alive() {
        let server = TestServer::start(vec![
            Route::new("HEAD", "/busy", 503, ""),
            Route::new("GET", "/busy", 503, "<html><body>Try the page anyway</body></html>"),
            Route::new("HEAD", "/bad", 400, ""),
            Route::new("GET", "/bad", 400, "oops"),
        ]);
        let links = vec![link(server.url("/busy")), link(server.url("/bad"))];

        let failures = verify_sequentially(links, RequestMethod::Head, &headers()).unwrap();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].link.url, server.url("/bad"));
        assert_eq!(failures[0].status, LinkStatus::Dead(DeadReason::Status(400)));
    }

    #[test]
    fn test_dropped_head_connection_is_retried_with_get() {
        let server = TestServer::start(vec![
            Route::hang_up("HEAD", "/guarded"),
            Route::new("GET", "/guarded", 200, "<html><body>Served to browsers</body></html>"),
        ]);

        let failures =
            verify_sequentially(vec![link(server.url("/guarded"))], RequestMethod::Head, &headers())
                .unwrap();
        assert!(failures.is_empty());

        let methods: Vec<_> = server.requests().into_iter().map(|r| r.method).collect();
        assert_eq!(methods, vec!["HEAD", "GET"]);
    }

    #[test]
    fn test_dropped_connections_stay_dead() {
        let server = TestServer::start(vec![Route::hang_up("*", "/gone")]);

        let failures =
            verify_sequentially(vec![link(server.url("/gone"))], RequestMethod::Head, &headers())
                .unwrap();
        assert_eq!(failures.len(), 1);
        assert!(matches!(
            failures[0].status,
            LinkStatus::Dead(DeadReason::Transport(_))
        ));
    }

    #[test]
    fn test_slow_head_is_retried_with_get() {
        let server = TestServer::start(vec![
            Route::new("HEAD", "/slow", 200, "").delayed(SEQUENTIAL_TIMEOUT + Duration::from_secs(1)),
            Route::new("GET", "/slow", 200, "<html><body>Eventually fine</body></html>"),
        ]);

        let failures =
            verify_sequentially(vec![link(server.url("/slow"))], RequestMethod::Head, &headers())
                .unwrap();
        assert!(failures.is_empty());

        let methods: Vec<_> = server.requests().into_iter().map(|r| r.method).collect();
        assert_eq!(methods, vec!["HEAD", "GET"]);
    }

    #[test]
    fn test_unambiguous_failure_is_not_retried() {
        let server = TestServer::start(vec![Route::any("/error", 500, "<html>server error</html>")]);

        let failures =
            verify_sequentially(vec![link(server.url("/error"))], RequestMethod::Head, &headers())
                .unwrap();
        assert_eq!(failures[0].status, LinkStatus::Dead(DeadReason::Status(500)));
        assert_eq!(server.requests().len(), 1);
    }

    #[test]
    fn test_refused_connection_is_dead_after_retry() {
        let url = TestServer::unused_url("/x");
        let failures = verify_sequentially(vec![link(url)], RequestMethod::Head, &headers()).unwrap();
        assert_eq!(failures.len(), 1);
        assert!(matches!(
            failures[0].status,
            LinkStatus::Dead(DeadReason::Transport(_))
        ));
    }

    // Both strategies must agree on every link, except where the fallback
    // GET rescues a link for the sequential checker.
    #[tokio::test]
    async fn test_strategies_agree_except_for_retry() {
        let server = TestServer::start(vec![
            Route::any("/ok", 200, "<html><body>fine page</body></html>"),
            Route::any("/gone", 410, ""),
            Route::any("/error", 500, ""),
            Route::any("/missing", 404, ""),
            Route::new("HEAD", "/blocked", 405, ""),
            Route::new("GET", "/blocked", 200, "<html><body>served to browsers</body></html>"),
        ]);
        let urls: Vec<String> = ["/ok", "/gone", "/error", "/missing", "/blocked"]
            .iter()
            .map(|p| server.url(p))
            .collect();
        let links: Vec<LinkRecord> = urls.iter().cloned().map(link).collect();

        let concurrent = by_url(
            VerifyStrategy::Concurrent
                .verify(links.clone(), Some(RequestMethod::Head), &headers())
                .await
                .unwrap(),
        );
        let sequential = by_url(
            VerifyStrategy::Sequential
                .verify(links, Some(RequestMethod::Head), &headers())
                .await
                .unwrap(),
        );

        let blocked = server.url("/blocked");
        assert_eq!(
            concurrent.get(&blocked),
            Some(&LinkStatus::Dead(DeadReason::Status(405)))
        );
        assert_eq!(sequential.get(&blocked), None);

        let without_blocked = |m: &BTreeMap<String, LinkStatus>| {
            m.iter()
                .filter(|(url, _)| **url != blocked)
                .map(|(u, s)| (u.clone(), s.clone()))
                .collect::<Vec<_>>()
        };
        assert_eq!(without_blocked(&concurrent), without_blocked(&sequential));
        assert!(!concurrent.contains_key(&urls[0]));
        assert_eq!(concurrent.len(), 4);
    }
}
