//! Domain layer
//!
//! Pure types and functions: projects and their urgency, contributor
//! statistics, filter-to-query translation, identity and the remembered
//! session port.

pub mod contributors;
pub mod identity;
pub mod project;
pub mod query;
pub mod session;

pub use contributors::{ContributionStats, ContributorSummary, aggregate, mask};
pub use identity::{Identity, IdentityProvider, IdentitySubscription, LocalIdentityProvider};
pub use project::{
    Category, Location, Project, ProjectSubmission, RawDuration, RawProjectRecord, Urgency,
    classify_urgency,
};
pub use query::{FilterState, Predicate, QueryField, QuerySpec, build_query};
pub use session::{InMemorySessionCache, SessionCache};
