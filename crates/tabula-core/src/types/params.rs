//! Untyped request-parameter trees.
//!
//! The engine consumes parameters that the host framework has already
//! parsed into a nested string-keyed mapping; it never touches raw HTTP.
//! [`RequestParams`] also knows how to re-absorb the flattened
//! `grid[f][table.column][fr]`-style pairs produced by
//! `state_as_parameter_pairs`, which is what makes the filter state
//! round-trippable through links and forms.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single request-parameter value: a scalar, a repeated (`name[]`)
/// value list, or a nested mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// A scalar string value.
    Str(String),
    /// An array of strings (multi-select filters).
    Seq(Vec<String>),
    /// A nested string-keyed mapping.
    Map(BTreeMap<String, ParamValue>),
}

impl ParamValue {
    /// The scalar value, if this is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The value list, if this is one.
    pub fn as_seq(&self) -> Option<&[String]> {
        match self {
            Self::Seq(v) => Some(v),
            _ => None,
        }
    }

    /// The nested mapping, if this is one.
    pub fn as_map(&self) -> Option<&BTreeMap<String, ParamValue>> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Fetch a sub-value by key from a nested mapping.
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.as_map().and_then(|m| m.get(key))
    }

    /// Whether the value carries no usable content: an empty or
    /// whitespace-only scalar, an empty list, or an empty mapping.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Str(s) => s.trim().is_empty(),
            Self::Seq(v) => v.is_empty(),
            Self::Map(m) => m.is_empty(),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(v: Vec<String>) -> Self {
        Self::Seq(v)
    }
}

/// The top-level request-parameter mapping.
///
/// Each grid reads its own subtree under its grid-name key, with sub-keys
/// `f` (filter status), `order`, `order_direction`, `page`, `pp`
/// (all-records page-size override), `export`, and `q` (saved-query id).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestParams(pub BTreeMap<String, ParamValue>);

impl RequestParams {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// The subtree for the named grid, if present.
    pub fn grid(&self, grid_name: &str) -> Option<&BTreeMap<String, ParamValue>> {
        self.0.get(grid_name).and_then(ParamValue::as_map)
    }

    /// Insert one flattened `name=value` pair, expanding bracketed key
    /// paths such as `g[f][orders.total][fr]` into the nested tree.
    /// A trailing `[]` appends to a value list.
    pub fn insert_pair(&mut self, name: &str, value: &str) {
        let (path, is_seq) = parse_bracket_path(name);
        if path.is_empty() {
            return;
        }
        let mut node = &mut self.0;
        for segment in &path[..path.len() - 1] {
            let entry = node
                .entry(segment.clone())
                .or_insert_with(|| ParamValue::Map(BTreeMap::new()));
            if !matches!(entry, ParamValue::Map(_)) {
                *entry = ParamValue::Map(BTreeMap::new());
            }
            let ParamValue::Map(m) = entry else { return };
            node = m;
        }
        let last = path[path.len() - 1].clone();
        if is_seq {
            match node.entry(last).or_insert_with(|| ParamValue::Seq(Vec::new())) {
                ParamValue::Seq(v) => v.push(value.to_string()),
                entry => *entry = ParamValue::Seq(vec![value.to_string()]),
            }
        } else {
            node.insert(last, ParamValue::Str(value.to_string()));
        }
    }

    /// Build a parameter set from flattened pairs (the inverse of
    /// `state_as_parameter_pairs`).
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut params = Self::new();
        for (name, value) in pairs {
            params.insert_pair(name, value);
        }
        params
    }
}

/// Split `g[f][a.b][fr]` into `["g", "f", "a.b", "fr"]`, reporting whether
/// the name ended in `[]`.
fn parse_bracket_path(name: &str) -> (Vec<String>, bool) {
    let mut path = Vec::new();
    let mut is_seq = false;
    let mut rest = name;
    if let Some(open) = rest.find('[') {
        path.push(rest[..open].to_string());
        rest = &rest[open..];
    } else {
        return (vec![rest.to_string()], false);
    }
    while let Some(open) = rest.find('[') {
        let Some(close) = rest[open..].find(']') else {
            break;
        };
        let segment = &rest[open + 1..open + close];
        if segment.is_empty() {
            is_seq = true;
        } else {
            path.push(segment.to_string());
        }
        rest = &rest[open + close + 1..];
    }
    (path, is_seq)
}
