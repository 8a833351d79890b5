//! Partial document updates
//!
//! `DocumentPatch` is the shared currency of the editor core: history
//! snapshots store one, the auto-save coordinator accumulates one, and the
//! persistence collaborator receives one. Every top-level editable field is
//! optional; applying a patch overwrites present fields and preserves absent
//! ones (shallow merge-not-replace).

use serde::{Deserialize, Serialize};

use super::document::{
    CertificationEntry, ContactInfo, EducationEntry, ExperienceEntry, PortfolioDocument,
    PortfolioStatus, ProjectEntry, SocialLinks, Template,
};

/// Partial portfolio document: `None` means "field untouched"
///
/// `avatar_url` is doubly optional: the outer `Option` is patch presence,
/// the inner one the field's own nullability.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience: Option<Vec<ExperienceEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub education: Option<Vec<EducationEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projects: Option<Vec<ProjectEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certifications: Option<Vec<CertificationEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<ContactInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub social: Option<SocialLinks>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<Template>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customization: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PortfolioStatus>,
}

macro_rules! overlay_fields {
    ($self:ident, $other:expr, { $($field:ident),+ $(,)? }) => {
        $(
            if let Some(value) = $other.$field {
                $self.$field = Some(value);
            }
        )+
    };
}

macro_rules! apply_fields {
    ($self:ident, $doc:expr, { $($field:ident),+ $(,)? }) => {
        $(
            if let Some(value) = &$self.$field {
                $doc.$field = value.clone();
            }
        )+
    };
}

impl DocumentPatch {
    /// True when no field is present
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Capture a full snapshot of a document as a patch
    pub fn full(doc: &PortfolioDocument) -> Self {
        Self {
            name: Some(doc.name.clone()),
            title: Some(doc.title.clone()),
            bio: Some(doc.bio.clone()),
            tagline: Some(doc.tagline.clone()),
            avatar_url: Some(doc.avatar_url.clone()),
            experience: Some(doc.experience.clone()),
            education: Some(doc.education.clone()),
            projects: Some(doc.projects.clone()),
            skills: Some(doc.skills.clone()),
            certifications: Some(doc.certifications.clone()),
            contact: Some(doc.contact.clone()),
            social: Some(doc.social.clone()),
            template: Some(doc.template),
            customization: Some(doc.customization.clone()),
            status: Some(doc.status),
        }
    }

    /// Overlay `other` on top of `self`: fields present in `other` win,
    /// fields absent from `other` keep whatever `self` already accumulated.
    pub fn overlay(&mut self, other: DocumentPatch) {
        overlay_fields!(self, other, {
            name, title, bio, tagline, avatar_url,
            experience, education, projects, skills, certifications,
            contact, social, template, customization, status,
        });
    }

    /// Apply present fields to a document, preserving absent ones
    pub fn merge_into(&self, doc: &mut PortfolioDocument) {
        apply_fields!(self, doc, {
            name, title, bio, tagline, avatar_url,
            experience, education, projects, skills, certifications,
            contact, social, customization,
        });
        if let Some(template) = self.template {
            doc.template = template;
        }
        if let Some(status) = self.status {
            doc.status = status;
        }
    }
}

/// One typed edit to a single top-level field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldEdit {
    Name(String),
    Title(String),
    Bio(String),
    Tagline(String),
    AvatarUrl(Option<String>),
    Experience(Vec<ExperienceEntry>),
    Education(Vec<EducationEntry>),
    Projects(Vec<ProjectEntry>),
    Skills(Vec<String>),
    Certifications(Vec<CertificationEntry>),
    Contact(ContactInfo),
    Social(SocialLinks),
    Template(Template),
    Customization(serde_json::Value),
    Status(PortfolioStatus),
}

impl FieldEdit {
    /// Field name for diagnostics and history labels
    pub fn field_name(&self) -> &'static str {
        match self {
            FieldEdit::Name(_) => "name",
            FieldEdit::Title(_) => "title",
            FieldEdit::Bio(_) => "bio",
            FieldEdit::Tagline(_) => "tagline",
            FieldEdit::AvatarUrl(_) => "avatar_url",
            FieldEdit::Experience(_) => "experience",
            FieldEdit::Education(_) => "education",
            FieldEdit::Projects(_) => "projects",
            FieldEdit::Skills(_) => "skills",
            FieldEdit::Certifications(_) => "certifications",
            FieldEdit::Contact(_) => "contact",
            FieldEdit::Social(_) => "social",
            FieldEdit::Template(_) => "template",
            FieldEdit::Customization(_) => "customization",
            FieldEdit::Status(_) => "status",
        }
    }

    /// Convert into a one-field patch
    pub fn into_patch(self) -> DocumentPatch {
        let mut patch = DocumentPatch::default();
        match self {
            FieldEdit::Name(v) => patch.name = Some(v),
            FieldEdit::Title(v) => patch.title = Some(v),
            FieldEdit::Bio(v) => patch.bio = Some(v),
            FieldEdit::Tagline(v) => patch.tagline = Some(v),
            FieldEdit::AvatarUrl(v) => patch.avatar_url = Some(v),
            FieldEdit::Experience(v) => patch.experience = Some(v),
            FieldEdit::Education(v) => patch.education = Some(v),
            FieldEdit::Projects(v) => patch.projects = Some(v),
            FieldEdit::Skills(v) => patch.skills = Some(v),
            FieldEdit::Certifications(v) => patch.certifications = Some(v),
            FieldEdit::Contact(v) => patch.contact = Some(v),
            FieldEdit::Social(v) => patch.social = Some(v),
            FieldEdit::Template(v) => patch.template = Some(v),
            FieldEdit::Customization(v) => patch.customization = Some(v),
            FieldEdit::Status(v) => patch.status = Some(v),
        }
        patch
    }
}
