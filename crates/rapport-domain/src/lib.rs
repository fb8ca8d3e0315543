//! Rapport Domain Layer
//!
//! Core data model for the social relationship and engagement system. This crate
//! only depends on `uuid` and defines the value types, the pure metric functions,
//! and the trait interfaces that storage adapters implement.
//!
//! ## Key Concepts
//!
//! - **Account**: a user identity with follower/following sets and a profile-view log
//! - **ContentItem**: a post carrying like, dislike and view sets
//! - **Outcome**: the result of a mutation that either applied or was already in place
//! - **Metrics**: counts, percentages and recency labels derived on read
//!
//! ## Architecture
//!
//! - No I/O in this crate
//! - Storage is reached only through [`traits::IdentityDirectory`] and [`traits::ContentStore`]
//! - Derived values are computed on demand and never stored on the entities

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod account;
pub mod content;
pub mod id;
pub mod metrics;
pub mod outcome;
pub mod traits;

// Re-exports for convenience
pub use account::{Account, AccountChange, ViewerLog};
pub use content::{ContentItem, ReactionChange, ReactionKind};
pub use id::{AccountId, ContentId};
pub use metrics::{EngagementCounts, RecencyLabel};
pub use outcome::Outcome;
