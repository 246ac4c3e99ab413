pub mod document;
pub mod entities;
pub mod metrics;

pub use document::{Document, Entry, Item, Section, Style, Token};
pub use entities::{CertificationEntry, ContactDetails, ExperienceEntry, VerifiedProfile};
pub use metrics::{Category, Metric, Rating, ScoreBreakdown};
