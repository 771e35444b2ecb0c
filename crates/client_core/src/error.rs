use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a backend call. Shown to users only as a generic message.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} responded with {status}{}", detail_suffix(.detail))]
    Status {
        url: String,
        status: StatusCode,
        detail: Option<String>,
    },
    #[error("unreadable response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl TransportError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Request { source, .. } | Self::Decode { source, .. } => source.status(),
        }
    }
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail
        .as_deref()
        .map(|detail| format!(": {detail}"))
        .unwrap_or_default()
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("a round submission is already in flight")]
    Busy,
    #[error(transparent)]
    Transport(#[from] TransportError),
}
