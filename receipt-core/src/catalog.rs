//! Built-in platform templates.
//!
//! The catalog is a read-only table compiled into the binary. Lookups by an
//! unknown id are not errors: [`get_template`] returns an empty string and
//! callers decide what "nothing to render" means for them.

use serde::Serialize;

use crate::error::{CatalogError, Result};

/// A hand-authored receipt template for one storefront platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlatformTemplate {
    pub id: &'static str,
    pub name: &'static str,
    /// Default email subject for receipts built from this template.
    pub subject: &'static str,
    #[serde(skip)]
    pub html: &'static str,
    /// Every placeholder name the document contains.
    #[serde(skip)]
    pub placeholders: &'static [&'static str],
}

const BEACONS: PlatformTemplate = PlatformTemplate {
    id: "beacons",
    name: "Beacons",
    subject: "Your Beacons receipt",
    html: include_str!("../templates/beacons.html"),
    placeholders: &[
        "BUYER_EMAIL",
        "BUYER_NAME",
        "DATE_PAID",
        "ORDER_ID",
        "PAYMENT_METHOD",
        "PRODUCT_IMAGE_URL",
        "PRODUCT_NAME",
        "PRODUCT_PRICE",
        "SELLER_EMAIL",
        "SELLER_LOGO_URL",
        "SELLER_NAME",
        "TOTAL_AMOUNT",
    ],
};

const STANSTORE: PlatformTemplate = PlatformTemplate {
    id: "stanstore",
    name: "Stan Store",
    subject: "Your purchase is confirmed",
    html: include_str!("../templates/stanstore.html"),
    placeholders: &[
        "ACCESS_LINK",
        "BUYER_EMAIL",
        "BUYER_NAME",
        "CREATOR_EMAIL",
        "CREATOR_NAME",
        "CREATOR_PHOTO_URL",
        "ORDER_ID",
        "PRODUCT_IMAGE_URL",
        "PRODUCT_NAME",
        "PURCHASE_DATE",
        "TOTAL_AMOUNT",
    ],
};

const FANBASIS: PlatformTemplate = PlatformTemplate {
    id: "fanbasis",
    name: "Fanbasis",
    subject: "Your Fanbasis payment receipt",
    html: include_str!("../templates/fanbasis.html"),
    placeholders: &[
        "AMOUNT",
        "BILLING_DATE",
        "BUYER_EMAIL",
        "BUYER_NAME",
        "CARD_LAST4",
        "CREATOR_AVATAR_IMAGE",
        "CREATOR_NAME",
        "PLAN_NAME",
        "SUPPORT_EMAIL",
        "TRANSACTION_ID",
    ],
};

const TEMPLATES: &[PlatformTemplate] = &[BEACONS, STANSTORE, FANBASIS];

pub struct Catalog;

impl Catalog {
    pub fn all() -> &'static [PlatformTemplate] {
        TEMPLATES
    }

    pub fn ids() -> impl Iterator<Item = &'static str> {
        TEMPLATES.iter().map(|template| template.id)
    }

    pub fn get(id: &str) -> Option<&'static PlatformTemplate> {
        TEMPLATES.iter().find(|template| template.id == id)
    }

    /// Like [`Catalog::get`], but an unknown id is an error.
    pub fn require(id: &str) -> Result<&'static PlatformTemplate> {
        Self::get(id).ok_or_else(|| CatalogError::UnknownTemplate(id.to_string()).into())
    }
}

/// The HTML for a built-in template, or `""` when `id` is unknown.
pub fn get_template(id: &str) -> &'static str {
    match Catalog::get(id) {
        Some(template) => template.html,
        None => {
            tracing::debug!(template.id = id, "Unknown catalog template");
            ""
        }
    }
}
