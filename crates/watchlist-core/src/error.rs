use thiserror::Error;
use watchlist_models::UnknownCategory;

/// Failures the watchlist core classifies for its callers
///
/// The surrounding service decides how each kind is presented; the core
/// only guarantees the classification and that nothing was mutated.
#[derive(Error, Debug)]
pub enum WatchlistError {
    #[error("Movie payload must include an imdbId")]
    MissingIdentifier,

    #[error("Invalid list type: {0}")]
    InvalidCategory(String),

    #[error("Identity not found: {0}")]
    IdentityNotFound(String),

    #[error("Stored collection is invalid: {0}")]
    InvalidCollection(String),

    #[error("Storage unavailable: {0}")]
    UpstreamUnavailable(String),
}

impl WatchlistError {
    /// Stable machine-readable name for the failure
    pub fn kind(&self) -> &'static str {
        match self {
            WatchlistError::MissingIdentifier => "missing_identifier",
            WatchlistError::InvalidCategory(_) => "invalid_category",
            WatchlistError::IdentityNotFound(_) => "identity_not_found",
            WatchlistError::InvalidCollection(_) => "invalid_collection",
            WatchlistError::UpstreamUnavailable(_) => "upstream_unavailable",
        }
    }

    /// Whether the caller sent something unacceptable, as opposed to a server-side fault
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            WatchlistError::MissingIdentifier
                | WatchlistError::InvalidCategory(_)
                | WatchlistError::IdentityNotFound(_)
        )
    }
}

impl From<UnknownCategory> for WatchlistError {
    fn from(err: UnknownCategory) -> Self {
        WatchlistError::InvalidCategory(err.0)
    }
}

impl From<std::io::Error> for WatchlistError {
    fn from(err: std::io::Error) -> Self {
        WatchlistError::UpstreamUnavailable(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, WatchlistError>;
