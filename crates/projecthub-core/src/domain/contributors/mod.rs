//! Contributor statistics and display masking

pub mod aggregate;
pub mod masking;

pub use aggregate::{ContributionStats, ContributorSummary, aggregate};
pub use masking::mask;
