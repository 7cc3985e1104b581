/// Errors raised while turning a raw spend export into a seed document.
#[derive(Debug, thiserror::Error)]
pub enum AnalyticsError {
    /// The CSV could not be read or a row did not match the expected header.
    #[error("Analytics: CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Analytics: IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Analytics: JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A `date` cell that none of the accepted formats could parse.
    #[error("Analytics: invalid date '{value}' on data row {row}")]
    InvalidDate { row: usize, value: String },

    /// The export contained a header but no data rows.
    #[error("Analytics: no data rows in input")]
    Empty,
}

/// Convenience `Result` alias for analytics operations.
pub type Result<T> = std::result::Result<T, AnalyticsError>;
