use thiserror::Error;

/// Errors surfaced to the caller of the views.
#[derive(Debug, Error)]
pub enum Error {
    /// A numerator or denominator name that is not in the metric catalogue.
    #[error("Unknown metric '{name}'")]
    UnknownMetric {
        /// The rejected name as given by the caller.
        name: String,
    },

    /// A scope name that is not one of the four realm types.
    #[error("Unknown realm '{name}'")]
    UnknownRealm {
        /// The rejected name as given by the caller.
        name: String,
    },

    #[error("A denominator was given without a numerator")]
    DenominatorWithoutNumerator,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
