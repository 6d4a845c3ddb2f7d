use thiserror::Error;

/// Classified failure returned by the request dispatcher.
///
/// `SessionExpired` is the only variant with a destructive side effect:
/// by the time the caller sees it, the credential store has already been
/// torn down and the user must re-authenticate.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport-level failure to reach the server. Never retried.
    #[error("NetworkError: unable to connect to the server: {0}")]
    Network(String),

    /// The server answered 429. Surfaced immediately, never retried.
    #[error("Rate limit exceeded. Please wait {retry_after_secs} seconds before trying again.")]
    RateLimited { retry_after_secs: u64 },

    /// Expired access token and the refresh path is unavailable or failed.
    #[error("Session expired. Please log in again.")]
    SessionExpired,

    /// Any other non-success HTTP status, message sourced from the body.
    #[error("{0}")]
    Api(String),

    /// Client-side field check rejected the input before any request went out.
    #[error("{0}")]
    Validation(String),
}
