use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Draft error: {0}")]
    Draft(#[from] DraftError),
}

/// Raised when template scanning cannot proceed at all.
///
/// Callers surface this as "failed to parse template" and keep whatever
/// template and values they already had.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("No template source was provided")]
    MissingInput,

    #[error("Invalid scan pattern: {0}")]
    Pattern(String),
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Unknown template: {0}")]
    UnknownTemplate(String),
}

#[derive(Debug, Error)]
pub enum DraftError {
    #[error("Invalid draft: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Draft has no HTML")]
    EmptyHtml,
}

impl Error {
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Error::Parse(_))
    }

    pub fn is_unknown_template(&self) -> bool {
        matches!(self, Error::Catalog(CatalogError::UnknownTemplate(_)))
    }

    pub fn is_draft_error(&self) -> bool {
        matches!(self, Error::Draft(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
