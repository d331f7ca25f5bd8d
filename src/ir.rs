//! Input model: edges and the per-dataset configuration that rides along with them.

use crate::error::ConfigError;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::HashMap;

pub const DEFAULT_NODE_COLOR: &str = "black";
pub const DEFAULT_BORDER_COLOR: &str = "black";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Edge {
    pub from: String,
    pub to: String,
    #[serde(default, deserialize_with = "number_or_zero")]
    pub value: f64,
}

impl Edge {
    pub fn new(from: &str, to: &str, value: f64) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            value,
        }
    }
}

/// One chart dataset: the edge list in `data` plus optional layout and styling maps.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeDataset {
    #[serde(default)]
    pub data: serde_json::Value,
    #[serde(default, deserialize_with = "column_map")]
    pub column: HashMap<String, i64>,
    #[serde(default, deserialize_with = "priority_map")]
    pub priority: HashMap<String, f64>,
    #[serde(default, deserialize_with = "color_map")]
    pub node_colors: HashMap<String, String>,
    #[serde(default, deserialize_with = "string_or_none")]
    pub node_border: Option<String>,
    #[serde(default, deserialize_with = "string_or_none")]
    pub node_border_color: Option<String>,
}

// A null or mistyped entry is dropped; it never rejects the dataset.

fn number_or_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Value::deserialize(deserializer)?.as_f64().unwrap_or(0.0))
}

fn string_or_none<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(Some(s)),
        _ => Ok(None),
    }
}

fn entries<'de, D, T>(deserializer: D, convert: fn(&Value) -> Option<T>) -> Result<HashMap<String, T>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Object(raw) = Value::deserialize(deserializer)? else {
        return Ok(HashMap::new());
    };
    let mut map = HashMap::with_capacity(raw.len());
    for (label, value) in raw {
        match convert(&value) {
            Some(v) => {
                map.insert(label, v);
            }
            None if value.is_null() => {}
            None => tracing::debug!(%label, %value, "ignoring malformed entry"),
        }
    }
    Ok(map)
}

fn as_column(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
}

fn column_map<'de, D: Deserializer<'de>>(deserializer: D) -> Result<HashMap<String, i64>, D::Error> {
    entries(deserializer, as_column)
}

fn priority_map<'de, D: Deserializer<'de>>(deserializer: D) -> Result<HashMap<String, f64>, D::Error> {
    entries(deserializer, Value::as_f64)
}

fn color_map<'de, D: Deserializer<'de>>(deserializer: D) -> Result<HashMap<String, String>, D::Error> {
    entries(deserializer, |v| v.as_str().map(str::to_string))
}

/// Borrowed view of the maps the layout engine consults.
#[derive(Debug, Clone, Copy)]
pub struct Overrides<'a> {
    pub column: &'a HashMap<String, i64>,
    pub priority: &'a HashMap<String, f64>,
}

impl TreeDataset {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_edges(edges: &[Edge]) -> Self {
        let data = edges
            .iter()
            .map(|e| serde_json::json!({ "from": e.from, "to": e.to, "value": e.value }))
            .collect();
        Self {
            data: serde_json::Value::Array(data),
            ..Self::default()
        }
    }

    /// Decode `data` as an edge list. Anything but an array of edge objects is rejected.
    pub fn edges(&self) -> Result<Vec<Edge>, ConfigError> {
        match &self.data {
            serde_json::Value::Array(items) => items
                .iter()
                .map(|item| Edge::deserialize(item).map_err(ConfigError::from))
                .collect(),
            _ => Err(ConfigError::NotASequence),
        }
    }

    pub fn overrides(&self) -> Overrides<'_> {
        Overrides {
            column: &self.column,
            priority: &self.priority,
        }
    }

    pub fn node_color(&self, label: &str) -> &str {
        self.node_colors
            .get(label)
            .map(String::as_str)
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_NODE_COLOR)
    }

    pub fn border_width(&self) -> i64 {
        self.node_border.as_deref().map(parse_border_width).unwrap_or(0)
    }

    pub fn border_color(&self) -> &str {
        self.node_border_color
            .as_deref()
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_BORDER_COLOR)
    }
}

/// Parse a "Npx" border width. Leading integer digits are taken, like `parseInt`;
/// anything without the `px` suffix or without digits is zero.
pub fn parse_border_width(raw: &str) -> i64 {
    let Some(number) = raw.strip_suffix("px") else {
        return 0;
    };
    let number = number.trim_start();
    let (sign, digits) = match number.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, number.strip_prefix('+').unwrap_or(number)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().map(|n| sign * n).unwrap_or(0)
}
