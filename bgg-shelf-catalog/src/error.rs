/// Errors that can occur while looking a game up in the catalog.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Could not create HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Catalog request for id {id} failed: {source}")]
    Http { id: String, source: reqwest::Error },

    #[error("Catalog is rate limiting requests (HTTP 429) at id {id}; increase the request delay")]
    RateLimited { id: String },

    #[error("Catalog returned HTTP {status} for id {id}")]
    Status { id: String, status: u16 },

    #[error("Malformed catalog response for id {id}: {reason}")]
    Malformed { id: String, reason: String },

    #[error("Catalog response for id {id} contains no item")]
    MissingItem { id: String },
}

impl FetchError {
    pub fn malformed(id: &str, reason: impl Into<String>) -> Self {
        Self::Malformed {
            id: id.to_string(),
            reason: reason.into(),
        }
    }

    /// Identifier of the lookup that failed, if the error belongs to one.
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Client(_) => None,
            Self::Http { id, .. }
            | Self::RateLimited { id }
            | Self::Status { id, .. }
            | Self::Malformed { id, .. }
            | Self::MissingItem { id } => Some(id),
        }
    }

    /// The message followed by every underlying cause, e.g. the refused
    /// connection or timeout behind a failed request.
    pub fn detailed(&self) -> String {
        error_chain(self)
    }
}

/// Format `err` and its `source()` chain as `top: cause: cause`.
///
/// Causes whose text is already part of the message so far are skipped, so
/// errors that embed their source in their own message are not repeated.
pub fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut cause = err.source();
    while let Some(e) = cause {
        let text = e.to_string();
        if !text.is_empty() && !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        cause = e.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("error sending request")]
    struct Outer(#[source] std::io::Error);

    #[derive(Debug, thiserror::Error)]
    #[error("lookup failed: {0}")]
    struct Wrapper(#[source] Outer);

    #[test]
    fn test_error_chain_appends_causes_once() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "Connection refused");
        let err = Wrapper(Outer(io));
        assert_eq!(err.to_string(), "lookup failed: error sending request");
        assert_eq!(
            error_chain(&err),
            "lookup failed: error sending request: Connection refused"
        );
    }

    #[test]
    fn test_detailed_without_source_is_display() {
        let err = FetchError::Status {
            id: "13".into(),
            status: 500,
        };
        assert_eq!(err.detailed(), err.to_string());
    }
}
