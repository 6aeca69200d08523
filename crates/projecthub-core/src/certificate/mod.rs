//! Completion certificates
//!
//! Turns a recipient name and project title into an 800x600 PNG with a
//! suggested download name of `Certificate_<Name_With_Underscores>.png`.
//!
//! ```ignore
//! use projecthub_core::certificate::{CertificateRequest, render};
//!
//! let artifact = render(&CertificateRequest::new("Jane Doe", "Beach Cleanup"))?;
//! artifact.save_to(&output_dir)?;
//! ```

pub mod layout;
mod renderer;
mod text;
mod types;

pub use layout::{CANVAS_HEIGHT, CANVAS_WIDTH};
pub use renderer::render;
pub use types::{CertificateArtifact, CertificateRequest, suggested_filename};
