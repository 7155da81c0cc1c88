use thiserror::Error;

// ---------------------------------------------------------------------------
// Error taxonomy
// ---------------------------------------------------------------------------

/// Load-time failure. Fatal to the session: no partial dataset is served.
#[derive(Debug, Error)]
pub enum MalformedInput {
    #[error("missing required column '{0}'")]
    MissingColumn(String),

    #[error("unrecognized column '{0}'")]
    UnknownColumn(String),

    #[error("row {row}: '{value}' in column '{column}' is not a valid date")]
    BadDate {
        row: usize,
        column: String,
        value: String,
    },

    #[error("row {row}: '{value}' in column '{column}' is not numeric")]
    BadNumber {
        row: usize,
        column: String,
        value: String,
    },

    #[error("could not detect a date format from '{0}'")]
    UnknownDateFormat(String),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Apply-time failure. Recoverable: the engine rejects the spec and the
/// caller keeps its previous valid view.
#[derive(Debug, Error, PartialEq)]
pub enum InvalidFilter {
    #[error("age range: min {min} > max {max}")]
    AgeRange { min: u32, max: u32 },

    #[error("salary range: min {min} > max {max}")]
    SalaryRange { min: f64, max: f64 },
}
