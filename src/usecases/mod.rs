//! Use Cases Layer - Application Business Logic
//!
//! Orchestrates domain rules with the storage and clock ports.
//!
//! Use cases:
//! - `ListingStore`: listing lifecycle (submit, review, visibility)
//! - `AccessControlStore`: tier passwords and tier verification
//! - `SubmissionService`: rules + tier password checks before submit
//! - `AdminConsole`: secret-gated review and password management
//! - `DirectoryRefresher`: periodic rebuild of the public view
//! - `DirectoryServices`: the wired set handed to a front end

pub mod access_store;
pub mod admin;
pub mod listing_store;
pub mod refresher;
pub mod services;
pub mod submission;

pub use access_store::AccessControlStore;
pub use admin::{AdminConsole, AdminDashboard, AdminSession};
pub use listing_store::{ListingOverview, ListingStore};
pub use refresher::{DirectoryRefresher, DirectorySnapshot};
pub use services::DirectoryServices;
pub use submission::{SubmissionForm, SubmissionOutcome, SubmissionService};
