use thiserror::Error;

#[derive(Debug, Error)]
pub enum NavigationError {
    #[error("invalid url {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    /// Transport failure; never retried automatically
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("unexpected response status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },
    #[error("too many redirects, last was to {0}")]
    TooManyRedirects(String),
    #[error("409 response without X-Inertia-Location")]
    MissingLocation,
    #[error("response from {0} carries no page object")]
    MissingPageData(String),
    #[error("invalid page object: {0}")]
    InvalidPage(#[from] serde_json::Error),
}
