//! News-flow gateway client.
//!
//! The gateway speaks JSON over POST. Each request names the feed
//! (`subnavNick = web_news`), a page size and, after the first page, the
//! `pageCallback` cursor handed back by the previous response.
//!
//! # Architecture
//!
//! - [`FeedSource`]: the seam the paging loop talks to, one page per call
//! - [`HttpFeedClient`]: the `reqwest` implementation used in production
//! - [`decode_page`]: pure body decoding, shared by every implementation

use crate::error::FetchError;
use crate::models::{FeedEnvelope, FeedPage, PageCursor};
use crate::utils::truncate_for_log;
use chrono::Utc;
use reqwest::header::{self, HeaderMap, HeaderValue};
use serde::Serialize;
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};
use url::Url;

/// Default gateway endpoint for the news flow.
pub const DEFAULT_ENDPOINT: &str = "https://gateway.36kr.com/api/mis/nav/ifm/subNav/flow";

/// Site origin used for article links and the `Origin`/`Referer` headers.
pub const SITE_ORIGIN: &str = "https://36kr.com";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/134.0.0.0 Safari/537.36";

const PARTNER_ID: &str = "web";
const SUBNAV_TYPE: u32 = 1;
const SUBNAV_NICK: &str = "web_news";
const SITE_ID: u32 = 1;
const PLATFORM_ID: u32 = 2;

/// Parameters for one page request.
#[derive(Debug, Clone)]
pub struct PageRequest {
    pub page_size: u32,
    /// `None` for the first page.
    pub cursor: Option<PageCursor>,
}

/// Anything that can hand back one page of the feed.
pub trait FeedSource {
    /// Fetch a single page.
    async fn fetch_page(&self, request: &PageRequest) -> Result<FeedPage, FetchError>;
}

#[derive(Debug, Serialize)]
struct FlowRequest<'a> {
    partner_id: &'a str,
    timestamp: i64,
    param: FlowParam<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FlowParam<'a> {
    subnav_type: u32,
    subnav_nick: &'a str,
    page_size: u32,
    /// 0 for the first page, 1 for every page after it.
    page_event: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    page_callback: Option<&'a str>,
    site_id: u32,
    platform_id: u32,
}

/// Build the JSON body for a page request.
fn request_body(request: &PageRequest, timestamp: i64) -> FlowRequest<'_> {
    let page_callback = request.cursor.as_ref().map(PageCursor::as_str);
    FlowRequest {
        partner_id: PARTNER_ID,
        timestamp,
        param: FlowParam {
            subnav_type: SUBNAV_TYPE,
            subnav_nick: SUBNAV_NICK,
            page_size: request.page_size,
            page_event: u8::from(page_callback.is_some()),
            page_callback,
            site_id: SITE_ID,
            platform_id: PLATFORM_ID,
        },
    }
}

/// Decode a response body into a [`FeedPage`].
///
/// # Errors
///
/// - [`FetchError::Api`] when `code` is present and non-zero
/// - [`FetchError::Malformed`] when the body is not JSON, `code`, `data` or
///   `data.itemList` is missing, or an item lacks its publish time
pub fn decode_page(body: &str) -> Result<FeedPage, FetchError> {
    let envelope: FeedEnvelope = serde_json::from_str(body).map_err(|e| {
        FetchError::Malformed(format!("{e} (body: {})", truncate_for_log(body, 200)))
    })?;

    match envelope.code {
        Some(0) => {}
        Some(code) => {
            return Err(FetchError::Api {
                code,
                message: envelope.msg.unwrap_or_default(),
            });
        }
        None => return Err(FetchError::Malformed("missing `code`".into())),
    }

    let data = envelope
        .data
        .ok_or_else(|| FetchError::Malformed("missing `data`".into()))?;
    let items = data
        .item_list
        .ok_or_else(|| FetchError::Malformed("missing `data.itemList`".into()))?;
    let next_cursor = data
        .page_callback
        .filter(|cursor| !cursor.is_empty())
        .map(PageCursor);

    Ok(FeedPage { items, next_cursor })
}

/// [`FeedSource`] backed by the live gateway.
pub struct HttpFeedClient {
    client: reqwest::Client,
    endpoint: Url,
}

impl fmt::Debug for HttpFeedClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpFeedClient")
            .field("endpoint", &self.endpoint.as_str())
            .finish()
    }
}

impl HttpFeedClient {
    /// Create a client for `endpoint` with a per-request `timeout`.
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(header::ORIGIN, HeaderValue::from_static(SITE_ORIGIN));
        headers.insert(header::REFERER, HeaderValue::from_static("https://36kr.com/"));

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self { client, endpoint })
    }
}

impl FeedSource for HttpFeedClient {
    #[instrument(level = "debug", skip_all, fields(cursor = request.cursor.is_some()))]
    async fn fetch_page(&self, request: &PageRequest) -> Result<FeedPage, FetchError> {
        let t0 = Instant::now();
        let body = request_body(request, Utc::now().timestamp_millis());

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "Gateway returned non-success status");
            return Err(FetchError::Status(status.as_u16()));
        }

        let text = response.text().await?;
        debug!(
            bytes = text.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Received page body"
        );
        decode_page(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_first_page_body_has_no_cursor() {
        let request = PageRequest {
            page_size: 100,
            cursor: None,
        };
        let body = serde_json::to_value(request_body(&request, 1_700_000_000_000)).unwrap();

        assert_eq!(
            body,
            json!({
                "partner_id": "web",
                "timestamp": 1_700_000_000_000i64,
                "param": {
                    "subnavType": 1,
                    "subnavNick": "web_news",
                    "pageSize": 100,
                    "pageEvent": 0,
                    "siteId": 1,
                    "platformId": 2
                }
            })
        );
    }

    #[test]
    fn test_next_page_body_carries_cursor() {
        let request = PageRequest {
            page_size: 30,
            cursor: Some(PageCursor("eyJmaXJzdElkIjo".into())),
        };
        let body = serde_json::to_value(request_body(&request, 5)).unwrap();

        assert_eq!(body["param"]["pageEvent"], 1);
        assert_eq!(body["param"]["pageCallback"], "eyJmaXJzdElkIjo");
        assert_eq!(body["param"]["pageSize"], 30);
    }

    #[test]
    fn test_decode_page_success() {
        let body = r#"{
            "code": 0,
            "data": {
                "itemList": [
                    {"route": "detail_article?itemId=1", "templateMaterial": {"publishTime": 10}},
                    {"templateMaterial": {"publishTime": 20, "navName": "汽车"}}
                ],
                "pageCallback": "next-token",
                "hasNextPage": 1
            }
        }"#;

        let page = decode_page(body).unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[1].category(), "汽车");
        assert_eq!(page.next_cursor, Some(PageCursor("next-token".into())));
    }

    #[test]
    fn test_decode_page_empty_or_missing_cursor_means_exhausted() {
        let empty = r#"{"code": 0, "data": {"itemList": [], "pageCallback": ""}}"#;
        assert_eq!(decode_page(empty).unwrap().next_cursor, None);

        let missing = r#"{"code": 0, "data": {"itemList": []}}"#;
        assert_eq!(decode_page(missing).unwrap().next_cursor, None);
    }

    #[test]
    fn test_decode_page_tolerates_odd_display_fields() {
        let body = r#"{
            "code": 0,
            "data": {
                "itemList": [
                    {"templateMaterial": {"publishTime": 10, "navName": 3}},
                    {"templateMaterial": {"publishTime": 20, "widgetImage": {"w": 1}}}
                ],
                "pageCallback": "next"
            }
        }"#;

        let page = decode_page(body).unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].category(), "3");
        assert_eq!(page.next_cursor, Some(PageCursor("next".into())));
    }

    #[test]
    fn test_decode_page_non_zero_code() {
        let body = r#"{"code": 40001, "msg": "param error"}"#;
        match decode_page(body) {
            Err(FetchError::Api { code, message }) => {
                assert_eq!(code, 40001);
                assert_eq!(message, "param error");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_page_missing_fields() {
        for body in [
            r#"{"code": 0}"#,
            r#"{"code": 0, "data": {"pageCallback": "x"}}"#,
            r#"{"data": {"itemList": []}}"#,
            r#"<html>502 Bad Gateway</html>"#,
            r#"{"code": 0, "data": {"itemList": [{"templateMaterial": {}}]}}"#,
        ] {
            assert!(
                matches!(decode_page(body), Err(FetchError::Malformed(_))),
                "expected Malformed for {body}"
            );
        }
    }
}
