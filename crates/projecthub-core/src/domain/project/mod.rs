//! Project domain module
//!
//! - **Entity**: `Project`, built from the store's `RawProjectRecord`
//! - **Urgency**: classification derived from the declared duration
//! - **Submission**: validation of new-project input

pub mod entity;
pub mod submission;
pub mod urgency;

pub use entity::{Category, Location, Project, RawDuration, RawProjectRecord, START_DATE_FORMAT};
pub use submission::ProjectSubmission;
pub use urgency::{Urgency, classify_urgency, parse_duration};
