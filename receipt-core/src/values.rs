//! Values collected for a template's placeholders.
//!
//! Every value is a string. File-typed fields hold a URL-like reference
//! instead of raw bytes: either a remote `http(s)://` URL or a self-contained
//! `data:` URL built from uploaded bytes with [`FormValues::insert_file`].

use std::collections::BTreeMap;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};

use crate::parser::ParsedTemplate;

/// Placeholder name → value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormValues {
    #[serde(deserialize_with = "deserialize_loose")]
    values: BTreeMap<String, String>,
}

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) -> Option<String> {
        self.values.insert(key.into(), value.into())
    }

    /// Store uploaded image bytes as a `data:` URL.
    pub fn insert_file<K: Into<String>>(&mut self, key: K, mime: &str, bytes: &[u8]) {
        self.values.insert(key.into(), data_url(mime, bytes));
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.values.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Fill in keys from `other` that this set has no value for.
    pub fn merge_missing(&mut self, other: &FormValues) {
        for (key, value) in other.iter() {
            self.values
                .entry(key.to_string())
                .or_insert_with(|| value.to_string());
        }
    }

    /// Required fields of `template` with no value or only whitespace.
    pub fn missing<'a>(&self, template: &'a ParsedTemplate) -> Vec<&'a str> {
        template
            .fields
            .iter()
            .filter(|field| field.required)
            .filter(|field| self.get(&field.key).is_none_or(|v| v.trim().is_empty()))
            .map(|field| field.key.as_str())
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormValues {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl From<BTreeMap<String, String>> for FormValues {
    fn from(values: BTreeMap<String, String>) -> Self {
        Self { values }
    }
}

impl IntoIterator for FormValues {
    type Item = (String, String);
    type IntoIter = std::collections::btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

/// Encode bytes as an RFC 2397 `data:` URL.
pub fn data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", BASE64.encode(bytes))
}

/// Whether a value looks like something an `<img src>` can point at.
pub fn is_file_reference(value: &str) -> bool {
    ["data:", "http://", "https://", "blob:"]
        .iter()
        .any(|scheme| value.starts_with(scheme))
}

// Numbers and booleans become their JSON text, null becomes "".
fn deserialize_loose<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = BTreeMap::<String, serde_json::Value>::deserialize(deserializer)?;

    Ok(raw
        .into_iter()
        .map(|(key, value)| {
            let value = match value {
                serde_json::Value::Null => String::new(),
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            (key, value)
        })
        .collect())
}
