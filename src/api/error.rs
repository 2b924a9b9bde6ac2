//! Gateway errors

use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("not authorized (status {0})")]
    Unauthorized(u16),

    #[error("request rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("session ended before the response arrived")]
    Cancelled,
}

impl ApiError {
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            401 | 403 => ApiError::Unauthorized(status),
            _ => ApiError::Rejected { status, message },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert!(matches!(ApiError::from_status(401, String::new()), ApiError::Unauthorized(401)));
        assert!(matches!(ApiError::from_status(403, String::new()), ApiError::Unauthorized(403)));
        match ApiError::from_status(422, "name taken".to_string()) {
            ApiError::Rejected { status, message } => {
                assert_eq!(status, 422);
                assert_eq!(message, "name taken");
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
