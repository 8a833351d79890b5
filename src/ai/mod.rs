//! AI enhancement collaborator
//!
//! Invoked on explicit user action only, never by the history manager or
//! the auto-save coordinator. On success the caller is expected to route the
//! result through `Editor::record_history` before committing it, so AI
//! enhancements participate in undo/redo like any other edit.

pub mod client;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use client::HfTextEnhancer;

/// Error type for enhancement calls
#[derive(Debug, Clone, Error)]
pub enum AiError {
    #[error("nothing to enhance")]
    EmptyInput,
    #[error("network error: {0}")]
    Transport(String),
    #[error("timeout")]
    Timeout,
    #[error("http {status}: {body}")]
    Http { status: u16, body: String },
    #[error("rate limited")]
    RateLimited,
    #[error("invalid api token")]
    InvalidApiKey,
    #[error("bad response: {0}")]
    Serde(String),
}

/// What kind of text is being enhanced; selects prompt and parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EnhanceKind {
    Bio,
    Tagline,
    ProjectDescription,
    ExperienceSummary,
}

impl EnhanceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnhanceKind::Bio => "bio",
            EnhanceKind::Tagline => "tagline",
            EnhanceKind::ProjectDescription => "project-description",
            EnhanceKind::ExperienceSummary => "experience-summary",
        }
    }
}

/// Enhanced text plus metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enhancement {
    /// The rewritten text
    pub text: String,
    /// Model that produced it
    pub model: String,
    /// Served from the local TTL cache rather than the endpoint
    pub cached: bool,
}

/// Text enhancement collaborator boundary
#[async_trait]
pub trait TextEnhancer: Send + Sync {
    async fn enhance(&self, kind: EnhanceKind, text: &str) -> Result<Enhancement, AiError>;
}
