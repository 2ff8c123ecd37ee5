//! Projection of matched feed items into the saved document.
//!
//! Items are ordered newest first (stable for equal timestamps), tallied by
//! category, and reduced to [`SimplifiedRecord`]s with a canonical article
//! link.

use crate::api::SITE_ORIGIN;
use crate::models::{RawItem, ResultDocument, SimplifiedRecord};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

static ROUTE_ITEM_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"itemId=(\d+)").expect("valid itemId regex"));

/// Canonical article link for an item id.
fn article_url(item_id: &str) -> String {
    format!("{SITE_ORIGIN}/p/{item_id}")
}

/// `itemId=<digits>` inside the route.
fn url_from_route_item_id(item: &RawItem) -> Option<String> {
    ROUTE_ITEM_ID
        .captures(item.route())
        .map(|caps| article_url(&caps[1]))
}

/// The material's own `itemId`.
fn url_from_material_item_id(item: &RawItem) -> Option<String> {
    item.template_material.item_id().map(|id| article_url(&id))
}

/// The raw route appended to the site origin.
fn url_from_raw_route(item: &RawItem) -> Option<String> {
    let route = item.route();
    (!route.is_empty()).then(|| format!("{SITE_ORIGIN}/{route}"))
}

/// Derive the article URL for `item`.
///
/// Sources are tried in order and the first hit wins: the route's
/// `itemId=<digits>`, then `templateMaterial.itemId`, then the raw route.
/// Returns an empty string when none apply.
pub fn extract_url(item: &RawItem) -> String {
    const EXTRACTORS: [fn(&RawItem) -> Option<String>; 3] = [
        url_from_route_item_id,
        url_from_material_item_id,
        url_from_raw_route,
    ];
    EXTRACTORS
        .iter()
        .find_map(|extract| extract(item))
        .unwrap_or_default()
}

/// Reduce a feed item to the saved record shape.
pub fn simplify(item: &RawItem) -> SimplifiedRecord {
    let material = &item.template_material;
    let text = |field: &Option<String>| field.clone().unwrap_or_default();
    SimplifiedRecord {
        title: text(&material.widget_title),
        summary: text(&material.summary),
        category: item.category().to_string(),
        theme: text(&material.theme_name),
        publish_time: material.publish_time,
        author: text(&material.author_name),
        image: text(&material.widget_image),
        url: extract_url(item),
    }
}

/// Count items per category label.
pub fn tally_categories<'a>(items: impl IntoIterator<Item = &'a RawItem>) -> BTreeMap<String, usize> {
    let mut categories = BTreeMap::new();
    for item in items {
        *categories.entry(item.category().to_string()).or_insert(0) += 1;
    }
    categories
}

/// Build the result document for `date` from the in-window items.
pub fn project(mut matched: Vec<RawItem>, date: &str) -> ResultDocument {
    matched.sort_by(|a, b| b.publish_time().cmp(&a.publish_time()));

    let categories = tally_categories(&matched);
    let news: Vec<SimplifiedRecord> = matched.iter().map(simplify).collect();

    ResultDocument {
        date: date.to_string(),
        total: news.len(),
        categories,
        news,
    }
}
