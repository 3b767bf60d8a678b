//! Configuration tree model for the referral campaign editor.
//!
//! A campaign configuration is an arbitrary nested JSON document
//! (`serde_json::Value`); no schema is enforced. This module supplies the
//! pieces the form editor is built on:
//!
//! - [`EditPath`], the dot-delimited address of a node inside the tree
//!   (`hero.title`, `slides.2.caption`)
//! - [`FieldValue`], a closed classification of JSON values into the
//!   widget kinds the editor renders, produced by [`classify`]
//! - [`apply_edit`], pure write-back of an edited node, returning a new
//!   tree and leaving the input untouched
//! - [`humanize_key`], the label transform shared by field labels and
//!   tab titles
//!
//! Property values keep their original JSON types throughout: numbers stay
//! numbers and booleans stay booleans across edit round-trips.

use serde_json::{Map, Value};

/// Key names that mark a string field as long-form text. Matched as
/// case-insensitive substrings of the field key.
const LONG_TEXT_KEY_HINTS: [&str; 5] = ["desc", "description", "message", "body", "text"];

/// Strings longer than this render as multi-line regardless of key name.
const LONG_TEXT_LENGTH: usize = 100;

/// Dot-delimited address of a node inside a config tree.
///
/// Segments are stored as raw strings and interpreted against the tree
/// while walking: a numeric segment indexes into an array node, anything
/// else keys into a mapping. `slides.2.caption` therefore addresses the
/// `caption` field of the third slide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct EditPath {
    segments: Vec<String>,
}

impl EditPath {
    /// The empty path, addressing the tree root itself.
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse a dot-delimited path string. Empty input yields the root path.
    pub fn parse(raw: &str) -> Self {
        if raw.is_empty() {
            return Self::root();
        }
        Self {
            segments: raw.split('.').map(|s| s.to_string()).collect(),
        }
    }

    /// Extend the path by a mapping key.
    pub fn child(&self, key: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(key.to_string());
        Self { segments }
    }

    /// Extend the path by an array index.
    pub fn index(&self, idx: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(idx.to_string());
        Self { segments }
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Final segment, used by the editor to derive field labels.
    pub fn leaf(&self) -> Option<&str> {
        self.segments.last().map(|s| s.as_str())
    }
}

impl std::fmt::Display for EditPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

/// Closed classification of a JSON value into the widget kind the form
/// editor renders. Produced by [`classify`]; the renderer is a total match
/// over these variants rather than ad hoc type checks.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Checkbox.
    Bool(bool),
    /// Numeric input.
    Number(f64),
    /// Single-line text input.
    Text(String),
    /// Multi-line text input, selected by key-name heuristic or length.
    LongText(String),
    /// Repeated sub-editor, one per element.
    Array(Vec<FieldValue>),
    /// Recursive section of labeled fields.
    Object(Vec<(String, FieldValue)>),
}

impl FieldValue {
    /// Empty default of the same kind, used when a path addresses a node
    /// that is absent from the tree.
    pub fn empty_like(&self) -> FieldValue {
        match self {
            FieldValue::Bool(_) => FieldValue::Bool(false),
            FieldValue::Number(_) => FieldValue::Number(0.0),
            FieldValue::Text(_) => FieldValue::Text(String::new()),
            FieldValue::LongText(_) => FieldValue::LongText(String::new()),
            FieldValue::Array(_) => FieldValue::Array(Vec::new()),
            FieldValue::Object(_) => FieldValue::Object(Vec::new()),
        }
    }

    /// Convert back to a JSON value for write-back. Whole numbers are
    /// written as integers so edit round-trips do not turn `3` into `3.0`.
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Bool(b) => Value::Bool(*b),
            FieldValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
                    Value::from(*n as i64)
                } else {
                    Value::from(*n)
                }
            }
            FieldValue::Text(s) | FieldValue::LongText(s) => Value::String(s.clone()),
            FieldValue::Array(items) => {
                Value::Array(items.iter().map(FieldValue::to_json).collect())
            }
            FieldValue::Object(fields) => {
                let mut map = Map::new();
                for (key, value) in fields {
                    map.insert(key.clone(), value.to_json());
                }
                Value::Object(map)
            }
        }
    }
}

/// Classify a JSON value by structure alone. The key under which the value
/// sits feeds the long-text heuristic; array elements inherit the key of
/// the array itself.
///
/// `null` classifies as empty single-line text so absent or cleared values
/// still get an editable widget.
pub fn classify(key: &str, value: &Value) -> FieldValue {
    match value {
        Value::Bool(b) => FieldValue::Bool(*b),
        Value::Number(n) => FieldValue::Number(n.as_f64().unwrap_or(0.0)),
        Value::String(s) => {
            if is_long_text(key, s) {
                FieldValue::LongText(s.clone())
            } else {
                FieldValue::Text(s.clone())
            }
        }
        Value::Array(items) => {
            FieldValue::Array(items.iter().map(|item| classify(key, item)).collect())
        }
        Value::Object(map) => FieldValue::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), classify(k, v)))
                .collect(),
        ),
        Value::Null => FieldValue::Text(String::new()),
    }
}

fn is_long_text(key: &str, value: &str) -> bool {
    let key_lower = key.to_lowercase();
    LONG_TEXT_KEY_HINTS
        .iter()
        .any(|hint| key_lower.contains(hint))
        || value.chars().count() > LONG_TEXT_LENGTH
}

/// Read the node addressed by `path`, or `None` if any segment is absent.
pub fn value_at<'a>(root: &'a Value, path: &EditPath) -> Option<&'a Value> {
    let mut node = root;
    for segment in path.segments() {
        node = match node {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(node)
}

/// Write `new_value` at `path`, returning a new tree. The input tree is
/// never mutated. Intermediate mappings are created where absent, and
/// array writes past the end pad with `null` up to the index.
pub fn apply_edit(root: &Value, path: &EditPath, new_value: Value) -> Value {
    if path.is_root() {
        return new_value;
    }
    let mut out = root.clone();
    let segments = path.segments();
    let mut node = &mut out;
    for segment in &segments[..segments.len() - 1] {
        node = slot(node, segment);
    }
    *slot(node, &segments[segments.len() - 1]) = new_value;
    out
}

/// Descend one segment, creating the container to descend into when the
/// tree does not already have one. A numeric segment against an array
/// indexes (padding with nulls); everything else resolves against a
/// mapping, replacing any scalar that is in the way.
fn slot<'a>(node: &'a mut Value, segment: &str) -> &'a mut Value {
    // A numeric segment only indexes when the node is already an array;
    // anything else resolves against a mapping. The array case is split
    // into its own branch so the interior reference it returns does not
    // force `node` to stay borrowed across the mapping fall-through (an
    // NLL limitation that an annotation alone cannot resolve).
    let array_idx = segment.parse::<usize>().ok().filter(|_| node.is_array());
    match array_idx {
        Some(idx) => match node {
            Value::Array(items) => {
                if idx >= items.len() {
                    items.resize(idx + 1, Value::Null);
                }
                &mut items[idx]
            }
            _ => unreachable!("node.is_array() checked when building array_idx"),
        },
        None => {
            if !node.is_object() {
                *node = Value::Object(Map::new());
            }
            match node {
                Value::Object(map) => map.entry(segment.to_string()).or_insert(Value::Null),
                _ => node,
            }
        }
    }
}

/// Structural deep-equality between two trees, the comparison behind the
/// "has unsaved changes" computation.
pub fn trees_equal(a: &Value, b: &Value) -> bool {
    a == b
}

/// Derive a display label from a JSON key: `_`/`-` become spaces, a space
/// is inserted at each lower/upper camel-case boundary, each word is
/// capitalized, then fixed suffix corrections are applied (`Id` → `ID`,
/// `Url` → `URL`, `Cta` → `CTA`, `Faq` → `FAQ`).
pub fn humanize_key(key: &str) -> String {
    let mut spaced = String::with_capacity(key.len() + 4);
    let mut prev: Option<char> = None;
    for ch in key.chars() {
        if ch == '_' || ch == '-' {
            spaced.push(' ');
            prev = Some(' ');
            continue;
        }
        if let Some(p) = prev {
            if p.is_lowercase() && ch.is_uppercase() {
                spaced.push(' ');
            }
        }
        spaced.push(ch);
        prev = Some(ch);
    }

    spaced
        .split_whitespace()
        .map(capitalize_word)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize_word(word: &str) -> String {
    let mut chars = word.chars();
    let capitalized = match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    };
    match capitalized.as_str() {
        "Id" => "ID".to_string(),
        "Url" => "URL".to_string(),
        "Cta" => "CTA".to_string(),
        "Faq" => "FAQ".to_string(),
        _ => capitalized,
    }
}
