use thiserror::Error;

/// A feed that cannot be turned into city series at all.
///
/// No partial result accompanies this error.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Feed has no weather-data root container")]
    MissingRoot,

    #[error("Feed contains no city entries")]
    MissingCities,

    #[error("City entry #{index} has no name")]
    MissingCityName { index: usize },

    #[error("City '{0}' appears more than once in the feed")]
    DuplicateCity(String),

    #[error("Failed to parse XML feed")]
    Xml(#[from] xmltree::ParseError),

    #[error("Failed to parse JSON feed")]
    Json(#[from] serde_json::Error),
}

impl FeedError {
    /// Stable, machine-readable tag for this error.
    pub fn kind(&self) -> &'static str {
        match self {
            FeedError::MissingRoot => "missing-root",
            FeedError::MissingCities => "missing-cities",
            FeedError::MissingCityName { .. } => "missing-city-name",
            FeedError::DuplicateCity(_) => "duplicate-city",
            FeedError::Xml(_) => "malformed-xml",
            FeedError::Json(_) => "malformed-json",
        }
    }
}

/// Why a single record was dropped while the rest of the feed was kept.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SkipReason {
    #[error("field '{0}' is missing")]
    MissingField(&'static str),

    #[error("field '{field}' is not numeric: {value:?}")]
    NotNumeric { field: &'static str, value: String },

    #[error("field '{0}' is not finite")]
    NonFinite(&'static str),

    #[error("record is not an object")]
    NotARecord,
}
