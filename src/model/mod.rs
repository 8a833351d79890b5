pub mod document;
pub mod patch;

pub use document::{
    CertificationEntry, ContactInfo, DocumentId, EducationEntry, ExperienceEntry,
    PortfolioDocument, PortfolioStatus, ProjectEntry, SocialLinks, Template,
};
pub use patch::{DocumentPatch, FieldEdit};
