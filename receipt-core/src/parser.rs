//! Placeholder discovery.
//!
//! Discovery is a plain text scan for `{{NAME}}` tokens. It never needs a
//! well-formed DOM, so fragments, truncated documents and non-HTML text are
//! all scanned the same way. Literal double-brace text that was never meant
//! as a placeholder is reported as a field too.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::classify::{FieldType, classify, label};
use crate::error::{ParseError, Result};

/// `{{`, one or more non-`}` characters, `}}`.
pub const PLACEHOLDER_PATTERN: &str = r"\{\{([^}]+)\}\}";

const IMAGE_SOURCE_PATTERN: &str =
    r#"(?is)<img\b[^>]*?\bsrc\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>]+))"#;

/// Metadata describing one placeholder's expected value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub key: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub placeholder: String,
    pub required: bool,
}

impl FieldDescriptor {
    pub fn from_name(name: &str) -> Self {
        let label = label(name);
        Self {
            key: name.to_string(),
            placeholder: format!("Enter {}", label.to_lowercase()),
            field_type: classify(name),
            label,
            required: true,
        }
    }
}

/// Everything discovered in a template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedTemplate {
    /// One descriptor per distinct placeholder, sorted by label.
    pub fields: Vec<FieldDescriptor>,
    /// Raw `src` values of `<img>` tags that embed a placeholder.
    pub image_sources: Vec<String>,
}

impl ParsedTemplate {
    pub fn field(&self, key: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.key == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|field| field.key.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

static PLACEHOLDER_REGEX: LazyLock<std::result::Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(PLACEHOLDER_PATTERN));

static IMAGE_SOURCE_REGEX: LazyLock<std::result::Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(IMAGE_SOURCE_PATTERN));

pub(crate) fn placeholder_regex() -> Result<&'static Regex> {
    compiled(&PLACEHOLDER_REGEX)
}

fn compiled(regex: &'static std::result::Result<Regex, regex::Error>) -> Result<&'static Regex> {
    regex
        .as_ref()
        .map_err(|e| ParseError::Pattern(e.to_string()).into())
}

/// Distinct placeholder names in order of first appearance.
pub fn placeholder_names(html: &str) -> Result<Vec<String>> {
    let regex = placeholder_regex()?;
    let mut names: Vec<String> = Vec::new();

    for captures in regex.captures_iter(html) {
        let name = &captures[1];
        if !names.iter().any(|seen| seen == name) {
            names.push(name.to_string());
        }
    }

    Ok(names)
}

/// Scan a template for placeholders and placeholder-bearing image sources.
pub fn parse(html: &str) -> Result<ParsedTemplate> {
    let mut fields: Vec<FieldDescriptor> = placeholder_names(html)?
        .iter()
        .map(|name| FieldDescriptor::from_name(name))
        .collect();
    fields.sort_by(|a, b| a.label.cmp(&b.label));

    let image_sources = image_sources(html)?;

    tracing::debug!(
        fields = fields.len(),
        image_sources = image_sources.len(),
        "Parsed template"
    );

    Ok(ParsedTemplate {
        fields,
        image_sources,
    })
}

/// Like [`parse`], for callers whose template may not exist at all.
pub fn parse_source(html: Option<&str>) -> Result<ParsedTemplate> {
    match html {
        Some(html) => parse(html),
        None => Err(ParseError::MissingInput.into()),
    }
}

fn image_sources(html: &str) -> Result<Vec<String>> {
    let regex = compiled(&IMAGE_SOURCE_REGEX)?;

    Ok(regex
        .captures_iter(html)
        .filter_map(|captures| {
            captures
                .get(1)
                .or_else(|| captures.get(2))
                .or_else(|| captures.get(3))
        })
        .map(|src| src.as_str())
        .filter(|src| src.contains("{{") && src.contains("}}"))
        .map(str::to_string)
        .collect())
}
