use thiserror::Error;

/// Errors surfaced by [`crate::NwsClient`].
///
/// Nothing is retried or recovered locally; every failure reaches the caller as-is.
#[derive(Debug, Error)]
pub enum NwsError {
    /// The client could not be built, most often because no user agent was given.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Non-2xx status, transport failure, or a body that did not decode.
    #[error("upstream request failed: {message}")]
    UpstreamRequestFailed {
        status: Option<u16>,
        body: Option<String>,
        message: String,
    },
}

impl NwsError {
    pub(crate) fn missing_user_agent() -> Self {
        NwsError::InvalidConfiguration(
            "a user agent is required to use the NWS API (e.g. \"my-weather-app, contact@example.com\")"
                .to_string(),
        )
    }

    /// HTTP status of the failed response, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            NwsError::UpstreamRequestFailed { status, .. } => *status,
            NwsError::InvalidConfiguration(_) => None,
        }
    }

    /// Raw response body of the failed response, if one was read.
    pub fn body(&self) -> Option<&str> {
        match self {
            NwsError::UpstreamRequestFailed { body, .. } => body.as_deref(),
            NwsError::InvalidConfiguration(_) => None,
        }
    }
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }

    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
