//! Best-effort recovery of field values from an already rendered receipt.
//!
//! Each [`Dialect`] is a fixed table of patterns written against the literal
//! wording of one known template. Nothing here tries to understand arbitrary
//! HTML: a pattern that does not match simply contributes no value, which is
//! preferable to guessing.

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::values::FormValues;

/// One recoverable field: the first capture group of `pattern` becomes `key`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub key: &'static str,
    pub pattern: &'static str,
}

const fn rule(key: &'static str, pattern: &'static str) -> Rule {
    Rule { key, pattern }
}

/// A pattern set tuned to one template's wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dialect {
    pub name: &'static str,
    pub rules: &'static [Rule],
}

const MAILTO: &str = r#"mailto:([^"'?>\s]+)"#;

static GENERIC: Dialect = Dialect {
    name: "generic",
    rules: &[
        rule("BUYER_NAME", r"Thanks for your order,\s*([^<!]+)"),
        rule("TOTAL_AMOUNT", r"\$(\d+(?:\.\d+)?)"),
        rule("ORDER_ID", r"#([A-Za-z0-9_-]+)\s*</"),
        rule("SELLER_EMAIL", MAILTO),
    ],
};

static BEACONS: Dialect = Dialect {
    name: "beacons",
    rules: &[
        rule("BUYER_NAME", r"Thanks for your order,\s*([^<!]+)"),
        rule("SELLER_NAME", r"Here is your receipt from ([^<]+?)\. Keep it"),
        rule("SELLER_LOGO_URL", r#"<img class="logo" src="([^"]*)""#),
        rule("ORDER_ID", r"Order</td>\s*<td[^>]*>#([^<]+)</td>"),
        rule("DATE_PAID", r"Date paid</td>\s*<td[^>]*>([^<]+)</td>"),
        rule("PAYMENT_METHOD", r"Payment method</td>\s*<td[^>]*>([^<]+)</td>"),
        rule("PRODUCT_IMAGE_URL", r#"<img class="thumb" src="([^"]*)""#),
        rule("PRODUCT_NAME", r#"<td>([^<]+)</td>\s*<td class="right">\$"#),
        rule(
            "PRODUCT_PRICE",
            r#"<td>[^<]+</td>\s*<td class="right">\$(\d+(?:\.\d+)?)</td>"#,
        ),
        rule("TOTAL_AMOUNT", r"Total</td>\s*<td[^>]*>\$(\d+(?:\.\d+)?)"),
        rule("BUYER_EMAIL", r"receipt was sent to ([^<\s]+?)\.</p>"),
        rule("SELLER_EMAIL", MAILTO),
    ],
};

static STANSTORE: Dialect = Dialect {
    name: "stanstore",
    rules: &[
        rule("BUYER_NAME", r"Hi ([^<]+?), your purchase is confirmed"),
        rule("PRODUCT_NAME", r"You just bought <strong>([^<]+)</strong>"),
        rule("CREATOR_NAME", r"</strong> from ([^<]+?)'s Stan Store"),
        rule("CREATOR_PHOTO_URL", r#"<div class="banner">\s*<img src="([^"]*)""#),
        rule("PRODUCT_IMAGE_URL", r#"<td width="110"><img src="([^"]*)""#),
        rule("ACCESS_LINK", r#"href="([^"]*)">Access your purchase"#),
        rule("ORDER_ID", r"Receipt #([^<\s]+)"),
        rule("PURCHASE_DATE", r"Purchase date</td>\s*<td[^>]*>([^<]+)</td>"),
        rule("TOTAL_AMOUNT", r"Amount paid</td>\s*<td[^>]*>\$(\d+(?:\.\d+)?)"),
        rule("BUYER_EMAIL", r"Billed to</td>\s*<td[^>]*>([^<]+)</td>"),
        rule("CREATOR_EMAIL", MAILTO),
    ],
};

static FANBASIS: Dialect = Dialect {
    name: "fanbasis",
    rules: &[
        rule("CREATOR_AVATAR_IMAGE", r#"<img class="avatar" src="([^"]*)""#),
        rule("CREATOR_NAME", r#"class="creator">([^<]+)</span>"#),
        rule("AMOUNT", r#"class="amount">\$(\d+(?:\.\d+)?)"#),
        rule("BUYER_NAME", r#"class="caption">([^<]+?), thank you for supporting"#),
        rule("PLAN_NAME", r"Plan</td>\s*<td[^>]*>([^<]+)</td>"),
        rule("BILLING_DATE", r"Billing date</td>\s*<td[^>]*>([^<]+)</td>"),
        rule("CARD_LAST4", r"Card ending in (\d{4})"),
        rule("TRANSACTION_ID", r"Transaction ID</td>\s*<td[^>]*>([^<]+)</td>"),
        rule("BUYER_EMAIL", r"Receipt sent to</td>\s*<td[^>]*>([^<]+)</td>"),
        rule("SUPPORT_EMAIL", MAILTO),
    ],
};

impl Dialect {
    /// The original order-confirmation table.
    pub fn generic() -> &'static Dialect {
        &GENERIC
    }

    /// The table written for a catalog template, or [`Dialect::generic`].
    pub fn for_platform(id: &str) -> &'static Dialect {
        match id {
            "beacons" => &BEACONS,
            "stanstore" => &STANSTORE,
            "fanbasis" => &FANBASIS,
            _ => &GENERIC,
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> {
        self.rules.iter().map(|rule| rule.key)
    }
}

/// Recover what the generic table can from `html`.
pub fn extract(html: &str) -> FormValues {
    extract_with(Dialect::generic(), html)
}

/// Built-in patterns, compiled once. Invalid ones are left out.
static BUILT_IN: LazyLock<HashMap<&'static str, Regex>> = LazyLock::new(|| {
    [&GENERIC, &BEACONS, &STANSTORE, &FANBASIS]
        .into_iter()
        .flat_map(|dialect| dialect.rules)
        .filter_map(|rule| Regex::new(rule.pattern).ok().map(|regex| (rule.pattern, regex)))
        .collect()
});

fn compiled(rule: &Rule) -> Result<Cow<'static, Regex>, regex::Error> {
    match BUILT_IN.get(rule.pattern) {
        Some(regex) => Ok(Cow::Borrowed(regex)),
        None => Regex::new(rule.pattern).map(Cow::Owned),
    }
}

/// Apply every rule of `dialect` to `html`, keeping the first match of each.
pub fn extract_with(dialect: &Dialect, html: &str) -> FormValues {
    let mut values = FormValues::new();

    for rule in dialect.rules {
        let regex = match compiled(rule) {
            Ok(regex) => regex,
            Err(e) => {
                tracing::warn!(dialect = dialect.name, key = rule.key, error = %e, "Skipping invalid extraction pattern");
                continue;
            }
        };

        let Some(captured) = regex
            .captures(html)
            .and_then(|captures| captures.get(1))
            .map(|m| m.as_str().trim())
        else {
            continue;
        };

        if !captured.is_empty() && !values.contains_key(rule.key) {
            values.insert(rule.key, captured);
        }
    }

    tracing::debug!(
        dialect = dialect.name,
        recovered = values.len(),
        rules = dialect.rules.len(),
        "Extracted values from rendered receipt"
    );

    values
}
