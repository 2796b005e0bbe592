//! Field type inference from placeholder names.
//!
//! Placeholder names carry no type information of their own, so the input
//! type shown to a user is guessed from the words the name contains.

use serde::{Deserialize, Serialize};

/// The kind of input a placeholder expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Email,
    Number,
    File,
    Date,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Email => "email",
            FieldType::Number => "number",
            FieldType::File => "file",
            FieldType::Date => "date",
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Checked in order, first hit wins.
const RULES: &[(&[&str], FieldType)] = &[
    (&["email"], FieldType::Email),
    (&["date"], FieldType::Date),
    (&["price", "amount", "total"], FieldType::Number),
    (&["logo", "image", "photo"], FieldType::File),
];

/// Infer the input type of a placeholder from its name.
///
/// Matching is a case-insensitive substring search, so `SELLER_EMAIL`,
/// `sellerEmail` and `EMAIL` all classify as [`FieldType::Email`]. Names
/// matching none of the rules are plain text.
pub fn classify(name: &str) -> FieldType {
    let lowered = name.to_lowercase();

    RULES
        .iter()
        .find(|(needles, _)| needles.iter().any(|needle| lowered.contains(needle)))
        .map(|(_, field_type)| *field_type)
        .unwrap_or(FieldType::Text)
}

/// Turn a placeholder name into a display label: `BUYER_NAME` becomes `Buyer Name`.
///
/// Empty segments produced by doubled or leading underscores are kept, so
/// the label still has one word slot per underscore-separated segment.
pub fn label(name: &str) -> String {
    name.split('_')
        .map(title_case)
        .collect::<Vec<_>>()
        .join(" ")
}

fn title_case(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_rules() {
        assert_eq!(classify("BUYER_EMAIL"), FieldType::Email);
        assert_eq!(classify("DATE_PAID"), FieldType::Date);
        assert_eq!(classify("TOTAL_AMOUNT"), FieldType::Number);
        assert_eq!(classify("SELLER_LOGO_URL"), FieldType::File);
        assert_eq!(classify("PRODUCT_NAME"), FieldType::Text);
    }

    #[test]
    fn test_classify_precedence() {
        // "email" beats "date", "date" beats "total"
        assert_eq!(classify("EMAIL_DATE"), FieldType::Email);
        assert_eq!(classify("UPDATED_TOTAL"), FieldType::Date);
        assert_eq!(classify("PRICE_IMAGE"), FieldType::Number);
    }

    #[test]
    fn test_classify_is_case_insensitive() {
        assert_eq!(classify("buyerEmail"), FieldType::Email);
        assert_eq!(classify("ProductPhoto"), FieldType::File);
        assert_eq!(classify(""), FieldType::Text);
    }

    #[test]
    fn test_label() {
        assert_eq!(label("ORDER_ID"), "Order Id");
        assert_eq!(label("BUYER_NAME"), "Buyer Name");
        assert_eq!(label("total"), "Total");
        assert_eq!(label("sELLER_logo"), "Seller Logo");
        assert_eq!(label("A__B"), "A  B");
    }

    #[test]
    fn test_field_type_serializes_lowercase() {
        let json = serde_json::to_string(&FieldType::Number).unwrap();
        assert_eq!(json, "\"number\"");
        assert_eq!(FieldType::File.to_string(), "file");
    }
}
