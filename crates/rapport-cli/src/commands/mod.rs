//! Command implementations.
//!
//! Each command returns its rendered output; `main` prints it.

pub mod account;
pub mod post;
pub mod react;
pub mod relation;
pub mod repair;
pub mod stats;

pub use self::account::execute_account;
pub use self::post::execute_post;
pub use self::react::execute_react;
pub use self::relation::{execute_follow, execute_unfollow, execute_view};
pub use self::repair::execute_repair;
pub use self::stats::execute_stats;
