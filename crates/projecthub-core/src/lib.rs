//! Projecthub Core Library
//!
//! This crate provides the core functionality for Projecthub, including:
//! - Project domain (urgency classification, submission validation)
//! - Contributor statistics and display masking
//! - Filter-to-query translation
//! - Directory controller (fetch orchestration, stale-response discard)
//! - Modal selection state with owner-only certificate access
//! - Deterministic certificate rendering (PNG)
//! - Store, identity and session-cache adapters

pub mod certificate;
pub mod config;
pub mod directory;
pub mod domain;
pub mod error;
pub mod selection;
pub mod storage;

pub use error::{Error, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::certificate::{CertificateArtifact, CertificateRequest, render};
    pub use crate::config::Config;
    pub use crate::directory::{DirectoryController, DirectoryState, DirectoryView, FetchOutcome};
    pub use crate::domain::{
        Category, FilterState, Identity, IdentityProvider, Location, Project, Urgency,
    };
    pub use crate::error::{Error, Result};
    pub use crate::selection::{Selection, SelectionController};
    pub use crate::storage::ProjectStore;
}
