use super::forms::FormId;

/// Failure after local validation passed
///
/// None of these are shown to the user; they go to the diagnostic log and
/// the form keeps its values.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("response with status {status} is not valid JSON: {source}")]
    Decode {
        status: u16,
        #[source]
        source: serde_json::Error,
    },

    #[error("unexpected response shape for '{form}': {source}")]
    UnexpectedShape {
        form: FormId,
        #[source]
        source: serde_json::Error,
    },

    #[error("'{form}' fetch answered with status {status}: {message}")]
    FetchStatus {
        form: FormId,
        status: u16,
        message: String,
    },

    #[error("base URL '{0}' cannot carry a path")]
    InvalidBaseUrl(String),

    #[error("no handler registered for form '{0}'")]
    NoHandler(FormId),
}
