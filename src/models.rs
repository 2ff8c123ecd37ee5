//! Data models for feed items and the saved digest.
//!
//! This module defines the structures that flow through the pipeline:
//! - [`RawItem`] / [`TemplateMaterial`]: items as returned by the news-flow gateway
//! - [`PageCursor`] / [`FeedPage`]: one decoded page and its continuation token
//! - [`SimplifiedRecord`] / [`ResultDocument`]: the projected output written to disk
//!
//! Wire structures keep the gateway's camelCase names through serde renames.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Label used for items that carry no `navName`.
pub const UNCATEGORIZED: &str = "未分类";

/// One entry of the gateway's `itemList`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawItem {
    /// The nested payload holding everything we display.
    pub template_material: TemplateMaterial,
    /// App route such as `detail_article?itemId=3012345678901`.
    #[serde(default, deserialize_with = "lenient_text")]
    pub route: Option<String>,
}

impl RawItem {
    /// Publish time in epoch milliseconds.
    pub fn publish_time(&self) -> i64 {
        self.template_material.publish_time
    }

    /// The route string, empty when absent.
    pub fn route(&self) -> &str {
        self.route.as_deref().unwrap_or("")
    }

    /// Category label, falling back to [`UNCATEGORIZED`].
    pub fn category(&self) -> &str {
        match self.template_material.nav_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => UNCATEGORIZED,
        }
    }
}

/// Read a display-only text field without failing on odd shapes.
///
/// Strings pass through, numbers and booleans are rendered as text, and
/// null, arrays or objects become `None`.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    })
}

/// The `templateMaterial` object of a feed item.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateMaterial {
    pub publish_time: i64,
    #[serde(default, deserialize_with = "lenient_text")]
    pub nav_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub widget_title: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub theme_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub author_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub widget_image: Option<String>,
    /// Numeric on most items, occasionally a string.
    #[serde(default)]
    pub item_id: Option<Value>,
}

impl TemplateMaterial {
    /// The material's own `itemId` rendered as text, if it holds a usable value.
    pub fn item_id(&self) -> Option<String> {
        match self.item_id.as_ref()? {
            Value::Number(n) => Some(n.to_string()),
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            _ => None,
        }
    }
}

/// Opaque continuation token (`pageCallback`) for the next page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCursor(pub String);

impl PageCursor {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One decoded page of the feed.
#[derive(Debug, Clone, Default)]
pub struct FeedPage {
    pub items: Vec<RawItem>,
    /// `None` once the feed is exhausted.
    pub next_cursor: Option<PageCursor>,
}

/// Response envelope: `{"code": 0, "msg": "...", "data": {...}}`.
#[derive(Debug, Deserialize)]
pub struct FeedEnvelope {
    pub code: Option<i64>,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub data: Option<FeedData>,
}

/// The `data` object of a successful response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedData {
    #[serde(default)]
    pub item_list: Option<Vec<RawItem>>,
    #[serde(default)]
    pub page_callback: Option<String>,
}

/// A feed item reduced to the fields we keep.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SimplifiedRecord {
    pub title: String,
    pub summary: String,
    pub category: String,
    pub theme: String,
    #[serde(rename = "publishTime")]
    pub publish_time: i64,
    pub author: String,
    pub image: String,
    pub url: String,
}

/// The document saved for one target day.
///
/// `news` is ordered newest first and `total == news.len()`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResultDocument {
    /// Target day in `YYYY-MM-DD` format.
    pub date: String,
    pub total: usize,
    pub categories: BTreeMap<String, usize>,
    pub news: Vec<SimplifiedRecord>,
}
