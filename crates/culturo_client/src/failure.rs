//! Failure normalization: every transport or HTTP failure becomes one
//! human-readable message, chosen by a fixed precedence so UI copy stays
//! consistent no matter which layer failed.

/// A classified request failure, prior to normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiFailure {
    /// The request exceeded its deadline.
    Timeout,
    /// The server could not be reached at all.
    Network(String),
    /// The server answered with a non-success status.
    Status {
        code: u16,
        server_message: Option<String>,
    },
}

pub const TIMEOUT_MESSAGE: &str = "The request timed out. Please try again.";
pub const NETWORK_MESSAGE: &str = "Unable to reach the server. Check your connection and try again.";
pub const UNAUTHORIZED_MESSAGE: &str = "Your session has expired. Please sign in again.";
pub const NOT_FOUND_MESSAGE: &str = "The requested resource was not found.";
pub const RATE_LIMITED_MESSAGE: &str = "Too many requests. Please wait a moment and try again.";
pub const BAD_GATEWAY_MESSAGE: &str =
    "The service is having trouble reaching an upstream provider. Please try again.";
pub const UNAVAILABLE_MESSAGE: &str =
    "The service is temporarily unavailable. Please try again shortly.";
pub const SERVER_ERROR_MESSAGE: &str = "A server error occurred. Please try again later.";
pub const GENERIC_MESSAGE: &str = "Something went wrong. Please try again.";

/// Collapses a failure into UI copy. Precedence: timeout, then network,
/// then a recognized status code, then whatever message the server sent,
/// then the generic fallback.
pub fn normalize_failure(failure: &ApiFailure) -> String {
    match failure {
        ApiFailure::Timeout => TIMEOUT_MESSAGE.to_string(),
        ApiFailure::Network(_) => NETWORK_MESSAGE.to_string(),
        ApiFailure::Status {
            code,
            server_message,
        } => match code {
            401 => UNAUTHORIZED_MESSAGE.to_string(),
            404 => NOT_FOUND_MESSAGE.to_string(),
            429 => RATE_LIMITED_MESSAGE.to_string(),
            502 => BAD_GATEWAY_MESSAGE.to_string(),
            503 => UNAVAILABLE_MESSAGE.to_string(),
            _ => match server_message {
                Some(message) if !message.trim().is_empty() => message.clone(),
                _ if *code == 500 => SERVER_ERROR_MESSAGE.to_string(),
                _ => GENERIC_MESSAGE.to_string(),
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_wins_even_when_the_network_is_also_down() {
        // A timed-out request is classified as Timeout before the network
        // condition is ever consulted.
        assert_eq!(normalize_failure(&ApiFailure::Timeout), TIMEOUT_MESSAGE);
        assert_eq!(
            normalize_failure(&ApiFailure::Network("dns failure".into())),
            NETWORK_MESSAGE
        );
    }

    #[test]
    fn plain_500_gets_the_fixed_server_error_string() {
        let failure = ApiFailure::Status {
            code: 500,
            server_message: None,
        };
        assert_eq!(normalize_failure(&failure), SERVER_ERROR_MESSAGE);
    }

    #[test]
    fn a_500_with_a_server_message_keeps_it() {
        let failure = ApiFailure::Status {
            code: 500,
            server_message: Some("quota exhausted".into()),
        };
        assert_eq!(normalize_failure(&failure), "quota exhausted");
    }

    #[test]
    fn a_503_is_always_temporarily_unavailable() {
        let failure = ApiFailure::Status {
            code: 503,
            server_message: Some("try later".into()),
        };
        assert_eq!(normalize_failure(&failure), UNAVAILABLE_MESSAGE);
    }

    #[test]
    fn recognized_statuses_beat_the_server_message() {
        for (code, expected) in [
            (401, UNAUTHORIZED_MESSAGE),
            (404, NOT_FOUND_MESSAGE),
            (429, RATE_LIMITED_MESSAGE),
            (502, BAD_GATEWAY_MESSAGE),
        ] {
            let failure = ApiFailure::Status {
                code,
                server_message: Some("ignored".into()),
            };
            assert_eq!(normalize_failure(&failure), expected);
        }
    }

    #[test]
    fn unknown_status_falls_back_to_server_message_then_generic() {
        let with_message = ApiFailure::Status {
            code: 418,
            server_message: Some("no coffee here".into()),
        };
        assert_eq!(normalize_failure(&with_message), "no coffee here");

        let without = ApiFailure::Status {
            code: 418,
            server_message: None,
        };
        assert_eq!(normalize_failure(&without), GENERIC_MESSAGE);

        let blank = ApiFailure::Status {
            code: 418,
            server_message: Some("   ".into()),
        };
        assert_eq!(normalize_failure(&blank), GENERIC_MESSAGE);
    }
}
