use shared::error::ApiError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid server url '{url}': {source}")]
    InvalidServerUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("failed to build http client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    #[error("transport failure calling {route}: {source}")]
    Transport {
        route: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{route} rejected the request: {error}")]
    Api {
        route: &'static str,
        error: ApiError,
    },
    #[error("unexpected status {status} from {route}")]
    UnexpectedStatus { route: &'static str, status: u16 },
}

impl ClientError {
    pub fn route(&self) -> Option<&'static str> {
        match self {
            Self::Transport { route, .. }
            | Self::Api { route, .. }
            | Self::UnexpectedStatus { route, .. } => Some(*route),
            Self::InvalidServerUrl { .. } | Self::ClientBuild(_) => None,
        }
    }
}
