//! Project directory: fetch orchestration and the published view-model
//!
//! # Example
//!
//! ```ignore
//! use projecthub_core::directory::DirectoryController;
//! use projecthub_core::domain::{FilterState, Location};
//!
//! let controller = DirectoryController::new(store);
//! controller.bind_identity(provider.subscribe()).await?;
//! controller.set_filters(FilterState::default().with_location(Location::Virar)).await?;
//!
//! let view = controller.view();
//! println!("{} projects, {} creators", view.stats.total_projects, view.stats.unique_contributor_count);
//!
//! controller.teardown().await;
//! ```

pub mod controller;
pub mod view;

pub use controller::{DirectoryController, FetchOutcome};
pub use view::{DirectoryState, DirectoryView};
