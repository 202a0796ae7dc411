use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CalendarError {
    #[error("No birthday configured. Set \"birthday\" (YYYY-MM-DD) in the settings file.")]
    MissingBirthday,

    #[error("Invalid birthday {0:?}; expected YYYY-MM-DD")]
    InvalidBirthday(String),

    #[error("Invalid max age {0}; expected 1-150 years")]
    InvalidMaxAge(i64),

    #[error("Invalid daily note format {format:?}: {reason}")]
    InvalidDateFormat { format: String, reason: String },

    #[error("Period #{index} is invalid: {reason}")]
    InvalidPeriod { index: usize, reason: String },

    #[error("Date range starting at {0} exceeds the supported calendar")]
    RangeOverflow(String),
}
