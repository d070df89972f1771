use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::path::PathBuf;
use thiserror::Error;

/// Failures raised while assembling an email attachment. Nothing is retried:
/// the first failing step aborts the whole attachment.
#[derive(Debug, Error)]
pub enum AttachmentError {
    #[error("invalid term `{term}`: {reason}")]
    Parse { term: String, reason: String },
    #[error("no labels available for locale `{locale}`")]
    UnknownLocale { locale: String },
    #[error("locale `{locale}` has no label `{key}`")]
    MissingLabel { locale: String, key: &'static str },
    #[error("document fetch failed: {0:#}")]
    Fetch(#[source] anyhow::Error),
    #[error("failed to read document at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AttachmentError {
    /// True for the locale catalog failures (unknown locale, missing label).
    pub fn is_lookup(&self) -> bool {
        matches!(
            self,
            AttachmentError::UnknownLocale { .. } | AttachmentError::MissingLabel { .. }
        )
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Attachment(#[from] AttachmentError),
    #[error("not found")]
    NotFound,
    #[error("bad request: {0}")]
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Attachment(err) => match err {
                AttachmentError::Parse { .. }
                | AttachmentError::UnknownLocale { .. }
                | AttachmentError::MissingLabel { .. } => StatusCode::BAD_REQUEST,
                AttachmentError::Fetch(_) => StatusCode::BAD_GATEWAY,
                AttachmentError::Io { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            },
        };
        tracing::error!(?self);
        (status, self.to_string()).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
