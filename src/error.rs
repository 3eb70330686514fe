//! Application-level error type returned by every fallible designer operation.
//!
//! `AppError` is serialized to `{ kind, message }` JSON payloads so a UI shell
//! can pattern-match on a stable `kind` string and show `message` in its
//! failure notice.

/// Top-level designer error.
///
/// Serialized with serde's adjacently-tagged representation:
/// `{ "kind": "<variant>", "message": <payload> }`
///
/// Every variant is terminal for the action that raised it only; the editor
/// state is left exactly as it was before the attempt.
#[derive(Debug, thiserror::Error, serde::Serialize)]
#[serde(tag = "kind", content = "message")]
pub enum AppError {
    /// The template store could not be reached, or its response could not be
    /// read.
    #[error("{0}")]
    Transport(String),

    /// The template store answered with a non-success status.
    #[error("store returned {status}: {message}")]
    Storage { status: u16, message: String },

    /// A requested component, template or library entry does not exist.
    #[error("{0}")]
    NotFound(String),

    /// User input was rejected before anything was changed or sent.
    #[error("{0}")]
    InvalidInput(String),

    /// A template archive or locally stored record could not be read.
    #[error("{0}")]
    TemplateLoad(String),

    /// A template archive or locally stored record could not be written.
    #[error("{0}")]
    TemplateSave(String),

    /// A logo image source could not be read or is not an image.
    #[error("{0}")]
    Image(String),

    /// The configuration file could not be read or parsed.
    #[error("{0}")]
    Config(String),

    /// A generic I/O error; the inner [`std::io::Error`] is converted to a
    /// string at the boundary so it remains serializable.
    #[error("{0}")]
    Io(String),
}

impl From<std::io::Error> for AppError {
    /// Convert an [`std::io::Error`] into an [`AppError::Io`].
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    /// Convert a [`reqwest::Error`] into an [`AppError::Transport`].
    ///
    /// A status error (from `error_for_status`) keeps its status code.
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => Self::Storage {
                status: status.as_u16(),
                message: e.to_string(),
            },
            None => Self::Transport(e.to_string()),
        }
    }
}
