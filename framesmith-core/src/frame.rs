// Loading a preview URL and reporting back like an embedded frame would

use crate::error::{Result, SessionError};
use reqwest::Client;
use reqwest::header::{CONTENT_SECURITY_POLICY, CONTENT_TYPE, HeaderMap, X_FRAME_OPTIONS};
use serde::Serialize;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use url::Url;

/// How long the loading indicator stays up after a load action.
pub const LOADING_DELAY: Duration = Duration::from_millis(1000);

pub const DEFAULT_FRAME_TIMEOUT_SECS: u64 = 10;

/// Events delivered to a session while a load is in flight.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameEvent {
    /// The cosmetic loading delay ran out.
    LoadingElapsed,
    Loaded(FrameReport),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameReport {
    pub url: String,
    pub status_code: u16,
    pub content_type: Option<String>,
    pub x_frame_options: Option<String>,
    pub frame_ancestors: Option<String>,
    pub response_time: Duration,
}

impl FrameReport {
    /// Why a browser would refuse to show this page inside a frame on
    /// another origin, if the response headers say so.
    pub fn embedding_blocked(&self) -> Option<String> {
        if let Some(ref xfo) = self.x_frame_options {
            let value = xfo.trim().to_lowercase();
            if value == "deny" || value == "sameorigin" {
                return Some(format!("X-Frame-Options: {}", xfo.trim()));
            }
        }

        if let Some(ref ancestors) = self.frame_ancestors {
            let sources: Vec<&str> = ancestors.split_whitespace().skip(1).collect();
            if sources.is_empty() || sources == ["'none'"] || sources == ["'self'"] {
                return Some(format!("Content-Security-Policy: {}", ancestors));
            }
        }

        None
    }
}

fn header_string(headers: &HeaderMap, name: reqwest::header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// The `frame-ancestors` directive of a Content-Security-Policy value.
pub fn frame_ancestors_directive(csp: &str) -> Option<String> {
    csp.split(';')
        .map(str::trim)
        .find(|directive| {
            directive
                .split_whitespace()
                .next()
                .is_some_and(|name| name.eq_ignore_ascii_case("frame-ancestors"))
        })
        .map(str::to_string)
}

#[derive(Clone)]
pub struct FrameLoader {
    client: Client,
}

impl FrameLoader {
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_FRAME_TIMEOUT_SECS)
    }

    pub fn with_timeout(timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .user_agent("Framesmith/0.1 (https://github.com/trapdoorsec/framesmith)")
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.div_ceil(2)))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(|e| SessionError::HttpClient(e.to_string()))?;

        Ok(Self { client })
    }

    /// Fetch `url` and turn the response into a load or error event.
    ///
    /// Transport failures and error statuses both count as a failed load.
    pub async fn load(&self, url: &Url) -> FrameEvent {
        info!("Loading preview frame: {}", url);
        let start = Instant::now();

        let response = match self.client.get(url.as_str()).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("Frame load failed for {}: {}", url, e);
                return FrameEvent::Failed(e.to_string());
            }
        };

        let status = response.status();
        let headers = response.headers();
        let report = FrameReport {
            url: response.url().to_string(),
            status_code: status.as_u16(),
            content_type: header_string(headers, CONTENT_TYPE),
            x_frame_options: header_string(headers, X_FRAME_OPTIONS),
            frame_ancestors: header_string(headers, CONTENT_SECURITY_POLICY)
                .as_deref()
                .and_then(frame_ancestors_directive),
            response_time: start.elapsed(),
        };
        debug!("Frame response: {:?}", report);

        if status.is_success() || status.is_redirection() {
            FrameEvent::Loaded(report)
        } else {
            warn!("Frame load for {} returned HTTP {}", url, status);
            FrameEvent::Failed(format!("HTTP {}", status))
        }
    }
}

/// Clear the loading indicator after [`LOADING_DELAY`]. Fire and forget.
pub fn spawn_loading_delay(tx: UnboundedSender<FrameEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(LOADING_DELAY).await;
        let _ = tx.send(FrameEvent::LoadingElapsed);
    })
}

/// Load `url` in the background and deliver the result on `tx`.
pub fn spawn_frame_load(
    loader: FrameLoader,
    url: Url,
    tx: UnboundedSender<FrameEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let event = loader.load(&url).await;
        let _ = tx.send(event);
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    fn report(xfo: Option<&str>, ancestors: Option<&str>) -> FrameReport {
        FrameReport {
            url: "https://example.com/".to_string(),
            status_code: 200,
            content_type: None,
            x_frame_options: xfo.map(String::from),
            frame_ancestors: ancestors.map(String::from),
            response_time: Duration::from_millis(1),
        }
    }

    #[test]
    fn test_embedding_blocked_by_headers() {
        assert!(report(Some("DENY"), None).embedding_blocked().is_some());
        assert!(report(Some("sameorigin"), None).embedding_blocked().is_some());
        assert!(
            report(None, Some("frame-ancestors 'none'"))
                .embedding_blocked()
                .is_some()
        );
        assert!(
            report(None, Some("frame-ancestors https://partner.example"))
                .embedding_blocked()
                .is_none()
        );
        assert!(report(None, None).embedding_blocked().is_none());
    }

    #[test]
    fn test_frame_ancestors_directive() {
        assert_eq!(
            frame_ancestors_directive("default-src 'self'; frame-ancestors 'none'; img-src *"),
            Some("frame-ancestors 'none'".to_string())
        );
        assert_eq!(frame_ancestors_directive("default-src 'self'"), None);
    }

    #[tokio::test]
    async fn test_load_success_reports_headers() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/widget"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("x-frame-options", "SAMEORIGIN")
                    .set_body_raw("<html><body>widget</body></html>", "text/html"),
            )
            .mount(&mock_server)
            .await;

        let loader = FrameLoader::with_timeout(5).unwrap();
        let url = Url::parse(&format!("{}/widget", mock_server.uri())).unwrap();

        match loader.load(&url).await {
            FrameEvent::Loaded(report) => {
                assert_eq!(report.status_code, 200);
                assert_eq!(report.content_type.as_deref(), Some("text/html"));
                assert_eq!(report.x_frame_options.as_deref(), Some("SAMEORIGIN"));
                assert!(report.embedding_blocked().is_some());
            }
            other => panic!("expected a loaded frame, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_load_error_status_fails() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let loader = FrameLoader::with_timeout(5).unwrap();
        let url = Url::parse(&format!("{}/missing", mock_server.uri())).unwrap();

        assert!(matches!(loader.load(&url).await, FrameEvent::Failed(msg) if msg.contains("404")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_loading_delay_fires_once() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        spawn_loading_delay(tx);

        tokio::time::advance(LOADING_DELAY + Duration::from_millis(10)).await;
        assert_eq!(rx.recv().await, Some(FrameEvent::LoadingElapsed));
        assert_eq!(rx.recv().await, None);
    }
}
