/// Errors raised while fetching dashboard data.
///
/// # Examples
///
/// ```rust
/// use pulse_dashboard::error::ClientError;
///
/// let err = ClientError::Status { endpoint: "summary".to_string(), status: 500 };
/// assert!(err.to_string().contains("summary"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Transport failure or an undecodable body.
    #[error("Dashboard: HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("Dashboard: {endpoint} returned status {status}")]
    Status { endpoint: String, status: u16 },
}

pub type Result<T> = std::result::Result<T, ClientError>;
