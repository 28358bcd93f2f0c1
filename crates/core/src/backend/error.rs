use std::fmt;

/// Non-success HTTP status from the options backend.
#[derive(Debug, Clone)]
pub struct BackendHttpError {
    pub endpoint: &'static str,
    pub status: u16,
    pub body: String,
}

impl fmt::Display for BackendHttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "backend HTTP {} from {}: {}",
            self.status,
            self.endpoint,
            self.body.trim()
        )
    }
}

impl std::error::Error for BackendHttpError {}
