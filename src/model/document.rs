//! Portfolio document model
//!
//! The user-editable aggregate the editor operates on. Owned exclusively by
//! the authenticated user and mutated only through the editor session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a portfolio document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(pub Uuid);

impl DocumentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle status of a portfolio
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PortfolioStatus {
    #[default]
    Draft,
    Published,
}

impl PortfolioStatus {
    /// String representation for storage
    pub fn as_str(&self) -> &'static str {
        match self {
            PortfolioStatus::Draft => "draft",
            PortfolioStatus::Published => "published",
        }
    }

    /// Parse from string, defaulting to draft
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "published" => PortfolioStatus::Published,
            _ => PortfolioStatus::Draft,
        }
    }
}

/// Template the portfolio renders with
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Template {
    #[default]
    Minimal,
    Classic,
    Creative,
    Developer,
}

/// One work-experience entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub company: String,
    pub role: String,
    pub start: Option<String>,
    pub end: Option<String>,
    pub summary: String,
}

/// One education entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    pub institution: String,
    pub degree: String,
    pub start: Option<String>,
    pub end: Option<String>,
}

/// One project entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectEntry {
    pub name: String,
    pub description: String,
    pub url: Option<String>,
    pub repository_url: Option<String>,
    pub tags: Vec<String>,
}

/// One certification entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CertificationEntry {
    pub name: String,
    pub issuer: String,
    pub issued: Option<String>,
    pub credential_url: Option<String>,
}

/// Contact details block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
}

/// Social profile links block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SocialLinks {
    pub github: Option<String>,
    pub linkedin: Option<String>,
    pub twitter: Option<String>,
    pub website: Option<String>,
}

/// The user-editable portfolio aggregate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioDocument {
    /// Unique identifier
    pub id: DocumentId,
    /// Owning user
    pub owner_id: Uuid,
    /// Display name
    pub name: String,
    /// Professional title (e.g. "Senior Developer")
    pub title: String,
    /// Free-form biography
    pub bio: String,
    /// Short tagline shown under the name
    pub tagline: String,
    /// Avatar image URL
    pub avatar_url: Option<String>,
    /// Work experience, most recent first
    pub experience: Vec<ExperienceEntry>,
    /// Education history
    pub education: Vec<EducationEntry>,
    /// Showcased projects
    pub projects: Vec<ProjectEntry>,
    /// Skill labels
    pub skills: Vec<String>,
    /// Certifications
    pub certifications: Vec<CertificationEntry>,
    /// Contact details
    pub contact: ContactInfo,
    /// Social profile links
    pub social: SocialLinks,
    /// Render template
    pub template: Template,
    /// Free-form per-template customization data
    pub customization: serde_json::Value,
    /// Lifecycle status
    pub status: PortfolioStatus,
    /// When the document was created
    pub created_at: DateTime<Utc>,
    /// Last time the document was persisted
    pub updated_at: DateTime<Utc>,
}

impl PortfolioDocument {
    /// Create an empty draft owned by the given user
    pub fn new(owner_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: DocumentId::new(),
            owner_id,
            name: String::new(),
            title: String::new(),
            bio: String::new(),
            tagline: String::new(),
            avatar_url: None,
            experience: Vec::new(),
            education: Vec::new(),
            projects: Vec::new(),
            skills: Vec::new(),
            certifications: Vec::new(),
            contact: ContactInfo::default(),
            social: SocialLinks::default(),
            template: Template::default(),
            customization: serde_json::Value::Null,
            status: PortfolioStatus::Draft,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_published(&self) -> bool {
        self.status == PortfolioStatus::Published
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_document_is_draft() {
        let doc = PortfolioDocument::new(Uuid::new_v4());
        assert_eq!(doc.status, PortfolioStatus::Draft);
        assert!(!doc.is_published());
    }

    #[test]
    fn test_status_roundtrip() {
        assert_eq!(PortfolioStatus::parse("published"), PortfolioStatus::Published);
        assert_eq!(PortfolioStatus::parse("draft"), PortfolioStatus::Draft);
        assert_eq!(PortfolioStatus::parse("bogus"), PortfolioStatus::Draft);
        assert_eq!(PortfolioStatus::Published.as_str(), "published");
    }

    #[test]
    fn test_document_serde_roundtrip() {
        let mut doc = PortfolioDocument::new(Uuid::new_v4());
        doc.name = "Ada".to_string();
        doc.skills = vec!["Rust".to_string(), "SQL".to_string()];

        let json = serde_json::to_string(&doc).unwrap();
        let back: PortfolioDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(back, doc);
    }
}
