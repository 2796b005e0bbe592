//! Plain-text alternative for HTML receipts.

use crate::MailerError;
use regex::Regex;

/// Derive a readable text body from an HTML document.
///
/// Block-level closing tags become line breaks, `<head>`/`<style>` content
/// is dropped, remaining tags are stripped and runs of blank lines collapse.
pub fn html_to_text(html: &str) -> Result<String, MailerError> {
    let without_head = Regex::new(r"(?is)<head\b.*?</head>|<style\b.*?</style>")
        .map_err(|e| MailerError::Builder(format!("Regex error: {e}")))?
        .replace_all(html, "");

    let text = without_head
        .replace("<br>", "\n")
        .replace("<br/>", "\n")
        .replace("<br />", "\n")
        .replace("</p>", "\n\n")
        .replace("</div>", "\n")
        .replace("</tr>", "\n")
        .replace("</td>", " ")
        .replace("</h1>", "\n\n")
        .replace("</h2>", "\n\n")
        .replace("</h3>", "\n\n");

    let text = Regex::new(r"<[^>]*>")
        .map_err(|e| MailerError::Builder(format!("Regex error: {e}")))?
        .replace_all(&text, "");

    let text = text
        .replace("&nbsp;", " ")
        .replace("&middot;", "·")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&");

    let text = Regex::new(r"[ \t]+")
        .map_err(|e| MailerError::Builder(format!("Regex error: {e}")))?
        .replace_all(&text, " ");

    let text = Regex::new(r"\n\s*\n")
        .map_err(|e| MailerError::Builder(format!("Regex error: {e}")))?
        .replace_all(&text, "\n\n");

    Ok(text
        .lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string())
}
