//! The JSON object handed from the editing step to the sending step.
//!
//! Field names are fixed (`html`, `subject`, `fromName`, `fromEmail`,
//! `platform`) so that drafts written by existing front-ends keep loading.

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, get_template};
use crate::error::{DraftError, Result};
use crate::render::render;
use crate::values::FormValues;

/// Storage key the draft is kept under between steps.
pub const DRAFT_STORAGE_KEY: &str = "receiptDraft";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptDraft {
    pub html: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
}

impl ReceiptDraft {
    pub fn new<S: Into<String>>(html: S) -> Self {
        Self {
            html: html.into(),
            ..Default::default()
        }
    }

    /// Render a catalog template and take its default subject.
    ///
    /// An unknown platform yields a draft with empty HTML, which
    /// [`ReceiptDraft::validate`] rejects.
    pub fn from_platform(platform: &str, values: &FormValues) -> Self {
        Self {
            html: render(get_template(platform), values),
            subject: Catalog::get(platform).map(|template| template.subject.to_string()),
            platform: Some(platform.to_string()),
            ..Default::default()
        }
    }

    pub fn subject<S: Into<String>>(mut self, subject: S) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn from_name<S: Into<String>>(mut self, name: S) -> Self {
        self.from_name = Some(name.into());
        self
    }

    pub fn from_email<S: Into<String>>(mut self, email: S) -> Self {
        self.from_email = Some(email.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.html.trim().is_empty() {
            return Err(DraftError::EmptyHtml.into());
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self).map_err(DraftError::from)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json).map_err(DraftError::from)?)
    }
}
