//! Placeholder engine for HTML email receipts
//!
//! A template is plain HTML containing `{{NAME}}` placeholders. This crate finds those
//! placeholders and describes them as typed form fields ([`parse`]), substitutes collected
//! values back in ([`render`]), ships a small catalog of platform receipts ([`Catalog`]) and
//! can recover approximate values from a receipt that was already rendered ([`extract`]).
//!
//! Everything here is synchronous string processing with no I/O. Sending a rendered receipt
//! and turning a photographed receipt into a template live in `receipt-mailer` and
//! `receipt-axum`.
//!
//! ```
//! use receipt_core::{FormValues, parse, render};
//!
//! let template = "Hi {{NAME}}, total {{TOTAL}}";
//! let parsed = parse(template).unwrap();
//! assert_eq!(parsed.fields.len(), 2);
//!
//! let values = FormValues::new().with("NAME", "Ana").with("TOTAL", "$5");
//! assert_eq!(render(template, &values), "Hi Ana, total $5");
//! ```
pub mod catalog;
pub mod classify;
pub mod draft;
pub mod error;
pub mod extract;
pub mod parser;
pub mod render;
pub mod values;

pub use catalog::{Catalog, PlatformTemplate, get_template};
pub use classify::{FieldType, classify, label};
pub use draft::{DRAFT_STORAGE_KEY, ReceiptDraft};
pub use error::{CatalogError, DraftError, Error, ParseError};
pub use extract::{Dialect, Rule, extract, extract_with};
pub use parser::{FieldDescriptor, ParsedTemplate, parse, parse_source, placeholder_names};
pub use render::render;
pub use values::{FormValues, data_url, is_file_reference};
