use thiserror::Error;

/// Notice raised when an activation is made with an empty query field.
pub const EMPTY_QUERY_NOTICE: &str = "Please enter a brand drug name.";

/// Render-target text for a non-2xx reply from the search endpoint.
pub const HTTP_ERROR_TEXT: &str = "Error fetching drug information.";

/// Render-target text for transport, parse and render failures.
pub const GENERIC_ERROR_TEXT: &str = "An error occurred.";

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("{}", EMPTY_QUERY_NOTICE)]
    EmptyQuery,

    #[error("Search endpoint returned status {0}")]
    Http(u16),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Malformed response payload: {0}")]
    Parse(String),

    #[error("Render error: {0}")]
    Render(String),
}

/// Coarse classification that decides what the user sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Http,
    TransportOrParse,
}

impl SearchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SearchError::EmptyQuery => ErrorKind::Validation,
            SearchError::Http(_) => ErrorKind::Http,
            SearchError::Transport(_) | SearchError::Parse(_) | SearchError::Render(_) => {
                ErrorKind::TransportOrParse
            }
        }
    }
}

impl From<reqwest::Error> for SearchError {
    fn from(err: reqwest::Error) -> Self {
        SearchError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for SearchError {
    fn from(err: serde_json::Error) -> Self {
        SearchError::Parse(err.to_string())
    }
}

impl From<sailfish::RenderError> for SearchError {
    fn from(err: sailfish::RenderError) -> Self {
        SearchError::Render(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SearchError>;
