//! Tab projection over a campaign config tree.
//!
//! The editor shows one tab per well-known top-level key of the config
//! tree, in a fixed canonical order, followed by two synthesized
//! pseudo-tabs and then any keys the tree carries that the console does
//! not know about. The projection is a pure function of the tree; it
//! touches no persistence and creates nothing.
//!
//! Pseudo-tabs:
//! - `image` projects the reserved `images` subtree, materialized with an
//!   empty default shape when the tree lacks it.
//! - `app-details` projects fields of the [`App`](crate::app::apps::App)
//!   record itself and is not backed by the tree at all.
//!
//! A literal `images` or `appDetails` key in the tree is excluded from the
//! generic projection so the pseudo-tab is never duplicated.

use once_cell::sync::Lazy;
use serde_json::{json, Value};
use std::collections::HashMap;

use crate::app::config_tree::humanize_key;

/// Left-to-right order of the well-known campaign tabs. Keys present in a
/// config tree but not listed here are appended after the pseudo-tabs in
/// the order the tree carries them.
pub const CANONICAL_TAB_ORDER: [&str; 6] = [
    "page1_referralPromote",
    "page2_referralStatus",
    "sharing",
    "faq",
    "notifications",
    "terms",
];

/// Reserved top-level key projected by the `image` pseudo-tab.
pub const IMAGES_KEY: &str = "images";

/// Tree keys shadowed by pseudo-tabs and excluded from generic projection.
const SHADOWED_KEYS: [&str; 2] = ["images", "appDetails"];

/// Titles that do not come out of the humanization transform.
static TAB_TITLES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("page1_referralPromote", "Referral Promote"),
        ("page2_referralStatus", "Referral Status"),
        ("app-details", "App Details"),
        ("image", "Image"),
        ("faq", "FAQ"),
    ])
});

/// One selectable tab in the editor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Tab {
    /// Backed by a top-level key of the config tree.
    Config(String),
    /// The reserved image subtree, synthesized when absent.
    Image,
    /// App record fields, not part of the config tree.
    AppDetails,
}

impl Tab {
    /// Stable identifier used for pending-operation flags and window ids.
    pub fn key(&self) -> &str {
        match self {
            Tab::Config(key) => key,
            Tab::Image => "image",
            Tab::AppDetails => "app-details",
        }
    }

    /// Whether the tab edits a subtree of the config tree (as opposed to
    /// the app record).
    pub fn edits_tree(&self) -> bool {
        !matches!(self, Tab::AppDetails)
    }

    /// Top-level tree key this tab reads and writes, if any.
    pub fn tree_key(&self) -> Option<&str> {
        match self {
            Tab::Config(key) => Some(key),
            Tab::Image => Some(IMAGES_KEY),
            Tab::AppDetails => None,
        }
    }
}

/// Project the ordered tab list for a config tree: canonical keys that are
/// present, then the two pseudo-tabs, then unknown keys in tree order.
/// The pseudo-tabs are always present regardless of tree contents.
pub fn project_tabs(tree: &Value) -> Vec<Tab> {
    let empty = serde_json::Map::new();
    let map = tree.as_object().unwrap_or(&empty);

    let mut tabs: Vec<Tab> = CANONICAL_TAB_ORDER
        .iter()
        .filter(|key| map.contains_key(**key))
        .map(|key| Tab::Config(key.to_string()))
        .collect();

    tabs.push(Tab::Image);
    tabs.push(Tab::AppDetails);

    for key in map.keys() {
        if CANONICAL_TAB_ORDER.contains(&key.as_str())
            || SHADOWED_KEYS.contains(&key.as_str())
        {
            continue;
        }
        tabs.push(Tab::Config(key.clone()));
    }

    tabs
}

/// Title shown on a tab: static lookup first, humanization fallback.
pub fn tab_title(tab: &Tab) -> String {
    if let Some(title) = TAB_TITLES.get(tab.key()) {
        return (*title).to_string();
    }
    humanize_key(tab.key())
}

/// Subtree shown by a tree-backed tab. The image pseudo-tab materializes
/// its default shape when the tree has no `images` key yet; other tabs
/// fall back to an empty mapping.
pub fn tab_subtree(tree: &Value, tab: &Tab) -> Value {
    let Some(key) = tab.tree_key() else {
        return Value::Null;
    };
    if let Some(subtree) = tree.get(key) {
        return subtree.clone();
    }
    if matches!(tab, Tab::Image) {
        default_image_shape()
    } else {
        json!({})
    }
}

/// Empty default shape for the reserved image subtree.
pub fn default_image_shape() -> Value {
    json!({
        "headerImageUrl": "",
        "shareImageUrl": "",
    })
}
