use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that abort a search.
///
/// Collaborator failures are not in this list: they degrade the result
/// (unranked brand, popularity fallback) instead of failing it.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("invalid search radius: {0}")]
    InvalidRadius(f64),

    #[error("invalid origin coordinate: ({latitude}, {longitude})")]
    InvalidOrigin { latitude: f64, longitude: f64 },

    #[error("failed to load catalog snapshot: {0}")]
    Snapshot(#[source] SourceError),

    #[error("failed to look up store: {0}")]
    Lookup(#[source] SourceError),
}

/// A failure reported by one of the search collaborators (catalog, brand
/// directory, ranking service).
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("{context}: {source}")]
    Backend {
        context: &'static str,
        #[source]
        source: BoxError,
    },

    #[error("{0} timed out after {1} ms")]
    Timeout(&'static str, u128),

    #[error("{0} is not configured")]
    Unconfigured(&'static str),
}

impl SourceError {
    /// Wrap any error from a backing store or client.
    pub fn backend<E>(context: &'static str, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Backend {
            context,
            source: Box::new(source),
        }
    }
}
