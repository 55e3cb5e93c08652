use thiserror::Error;

use crate::application::repos::RepoError;
use crate::domain::error::DomainError;

/// Application-level failures surfaced to the embedding surface.
///
/// `NotFound` means neither the cache nor the relational store has the
/// record; cache-layer failures never appear here because they are
/// absorbed into fallbacks at the cache boundary.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("resource not found")]
    NotFound,
    #[error("validation failed: {message}")]
    Validation { message: String },
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}
