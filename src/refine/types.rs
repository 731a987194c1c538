// src/refine/types.rs
// Text Refinement Types and Error Definitions

use crate::orchestrator::retry::{mentions_quota, Retryable};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Steering for the rewrite: the dialect the script should be phrased in
/// and the content field it belongs to (documentary, ads, podcast, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefineOptions {
    pub dialect: String,
    pub field: String,
}

/// Refinement error types with rate-limit classification
#[derive(Debug, Error)]
pub enum RefineError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    TimeoutError,

    #[error("Authentication failed")]
    AuthenticationError,

    #[error("Rate limit exceeded")]
    RateLimitError,

    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("Empty refinement from provider")]
    EmptyText,

    #[error("All refinement providers failed")]
    AllProvidersFailed,
}

impl RefineError {
    pub fn is_rate_limited(&self) -> bool {
        match self {
            RefineError::RateLimitError => true,
            RefineError::ProviderError(message) => mentions_quota(message),
            _ => false,
        }
    }
}

impl Retryable for RefineError {
    fn is_rate_limited(&self) -> bool {
        RefineError::is_rate_limited(self)
    }
}
