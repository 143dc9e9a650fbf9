//! User-facing classification of failed requests.

use crate::FetchError;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What kind of failure the user should be told about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorClass {
    /// 401: the session is missing or expired.
    SignInRequired,
    /// 400, or a request we could not even encode.
    BadRequest,
    /// Any other status, or an unreadable success body.
    Server,
    /// No response was received.
    Network,
}

impl ErrorClass {
    /// Classify a failed request.
    pub fn of(error: &FetchError) -> Self {
        match error {
            FetchError::Status { status, .. } if *status == StatusCode::UNAUTHORIZED.as_u16() => {
                ErrorClass::SignInRequired
            }
            FetchError::Status { status, .. } if *status == StatusCode::BAD_REQUEST.as_u16() => {
                ErrorClass::BadRequest
            }
            FetchError::Status { .. } | FetchError::Decode { .. } => ErrorClass::Server,
            FetchError::Encode(_) => ErrorClass::BadRequest,
            FetchError::Connect(_) | FetchError::Timeout | FetchError::InvalidUrl(_) => {
                ErrorClass::Network
            }
        }
    }

    /// The message shown to the user.
    pub fn message(&self) -> &'static str {
        match self {
            ErrorClass::SignInRequired => "Please sign in to continue",
            ErrorClass::BadRequest => "Something went wrong, please try again",
            ErrorClass::Server => "Server error, please try again later",
            ErrorClass::Network => "Check your internet connection",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorClass::SignInRequired => "sign_in_required",
            ErrorClass::BadRequest => "bad_request",
            ErrorClass::Server => "server",
            ErrorClass::Network => "network",
        }
    }
}

impl From<&FetchError> for ErrorClass {
    fn from(error: &FetchError) -> Self {
        ErrorClass::of(error)
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(code: u16) -> FetchError {
        FetchError::Status {
            status: code,
            message: String::new(),
        }
    }

    #[test]
    fn test_status_classes() {
        assert_eq!(ErrorClass::of(&status(401)), ErrorClass::SignInRequired);
        assert_eq!(ErrorClass::of(&status(400)), ErrorClass::BadRequest);
        assert_eq!(ErrorClass::of(&status(404)), ErrorClass::Server);
        assert_eq!(ErrorClass::of(&status(500)), ErrorClass::Server);
    }

    #[test]
    fn test_unreadable_body_is_server_error() {
        let err = FetchError::Decode {
            status: 200,
            message: "expected value".to_string(),
        };
        assert_eq!(ErrorClass::of(&err), ErrorClass::Server);
    }

    #[test]
    fn test_no_response_is_network() {
        assert_eq!(ErrorClass::of(&FetchError::Timeout), ErrorClass::Network);
        assert_eq!(
            ErrorClass::of(&FetchError::Connect("refused".to_string())),
            ErrorClass::Network
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(ErrorClass::SignInRequired.message(), "Please sign in to continue");
        assert_eq!(
            ErrorClass::Network.to_string(),
            "Check your internet connection"
        );
    }
}
