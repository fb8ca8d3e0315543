//! Rapport Graph
//!
//! Relationship and engagement engine: follow edges, profile-view logs and
//! per-content reactions, plus the metrics derived from them.
//!
//! # Overview
//!
//! - **Relationship graph**: idempotent follow/unfollow with both sides written
//!   in one store call, duplicate-free profile-view logs, symmetry repair
//! - **Engagement ledger**: one reaction per kind per account, like/dislike
//!   exclusivity under the strict policy, counts and percentages on read
//! - **Entity locks**: every mutation holds the accounts or content item it
//!   touches, so idempotence holds under concurrent callers
//! - **Bounded retries**: store writes are retried `storage_attempts` times
//!   before surfacing [`GraphError::StorageFailure`]
//!
//! # Outcomes
//!
//! | Operation | Applied | Already in place | Errors |
//! |-----------|---------|------------------|--------|
//! | `follow` | `Success` | `AlreadyFollowing` | `NotFound`, `InvalidOperation`, `StorageFailure` |
//! | `unfollow` | `Success` | `NotFollowing` | `NotFound`, `InvalidOperation`, `StorageFailure` |
//! | `record_profile_view` | `Success` | `AlreadyViewed` | `NotFound`, `InvalidOperation`, `StorageFailure` |
//! | `react` | `Success` | `AlreadyReacted` | `NotFound`, `StorageFailure` |
//!
//! # Usage
//!
//! ```no_run
//! use rapport_domain::ReactionKind;
//! use rapport_graph::{GraphConfig, SocialService};
//! use rapport_store::SqliteStore;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = SqliteStore::new("rapport.db")?;
//! let service = SocialService::new(store, GraphConfig::default())?;
//!
//! # let (alice, bob) = (rapport_domain::AccountId::new(), rapport_domain::AccountId::new());
//! # let post = rapport_domain::ContentId::new();
//! let outcome = service.follow(alice, bob)?;
//! println!("follow: {}", outcome.tag());
//!
//! service.react(bob, post, ReactionKind::Like)?;
//! println!("{:?}", service.counts(post)?);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! ```toml
//! reaction_policy = "strict"   # or "legacy"
//! storage_attempts = 3
//! retry_backoff_ms = 25
//! ```

#![warn(missing_docs)]

mod config;
mod engagement;
mod error;
pub mod locks;
mod metrics;
mod relationship;
mod service;
mod shared;

pub use config::{GraphConfig, ReactionPolicy};
pub use engagement::{EngagementLedger, EngagementSummary};
pub use error::GraphError;
pub use metrics::{GraphMetrics, Operation};
pub use relationship::{RelationshipGraph, RelationshipSummary, RepairReport};
pub use service::SocialService;
pub use shared::now_millis;
