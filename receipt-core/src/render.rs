//! Placeholder substitution.
//!
//! Every supplied key's `{{key}}` token is replaced by its value, inserted as
//! literal text. A value may itself contain another supplied token, so the
//! substitution repeats until none is left, at most once per key. Whatever
//! placeholders remain afterwards (unsupplied names, self-referencing
//! values) render as empty text.

use regex::{NoExpand, Regex};

use crate::parser::placeholder_regex;
use crate::values::FormValues;

/// Substitute `values` into `template`.
///
/// Never fails. Keys with no matching placeholder are ignored, and
/// placeholders with no matching key render as empty text. The output never
/// contains `{{key}}` for a supplied key.
pub fn render(template: &str, values: &FormValues) -> String {
    let tokens: Vec<Token<'_>> = values
        .iter()
        .map(|(key, value)| Token::new(key, value))
        .collect();

    let mut rendered = template.to_string();
    for _ in 0..tokens.len().max(1) {
        for token in &tokens {
            rendered = token.substitute(&rendered);
        }
        if !tokens.iter().any(|token| rendered.contains(&token.literal)) {
            break;
        }
    }

    // Still present only when values reference each other in a cycle.
    // Every removal shortens the text, so this ends.
    while let Some(token) = tokens.iter().find(|token| rendered.contains(&token.literal)) {
        rendered = rendered.replace(&token.literal, "");
    }

    blank_leftovers(&rendered)
}

/// One supplied key, ready to substitute.
struct Token<'a> {
    literal: String,
    pattern: Option<Regex>,
    value: &'a str,
}

impl<'a> Token<'a> {
    fn new(key: &str, value: &'a str) -> Self {
        let literal = format!("{{{{{key}}}}}");
        let pattern = match Regex::new(&regex::escape(&literal)) {
            Ok(pattern) => Some(pattern),
            Err(e) => {
                tracing::warn!(key, error = %e, "Falling back to literal substitution");
                None
            }
        };

        Self {
            literal,
            pattern,
            value,
        }
    }

    fn substitute(&self, text: &str) -> String {
        match &self.pattern {
            Some(pattern) => pattern.replace_all(text, NoExpand(self.value)).into_owned(),
            None => text.replace(&self.literal, self.value),
        }
    }
}

fn blank_leftovers(rendered: &str) -> String {
    match placeholder_regex() {
        Ok(leftover) => leftover.replace_all(rendered, NoExpand("")).into_owned(),
        Err(e) => {
            tracing::warn!(error = %e, "Leaving unsupplied placeholders in place");
            rendered.to_string()
        }
    }
}
