//! Trait definitions for storage collaborators
//!
//! These traits define the boundary between the relationship/engagement core
//! and persistence. Implementations live in `rapport-store`.

use crate::{Account, AccountId, ContentId, ContentItem};

/// Resolves and persists accounts
///
/// Implemented by the infrastructure layer (rapport-store)
pub trait IdentityDirectory {
    /// Error type for directory operations
    type Error;

    /// Whether an account with this id exists
    fn exists(&self, id: AccountId) -> Result<bool, Self::Error>;

    /// Load an account by id
    fn load_account(&self, id: AccountId) -> Result<Option<Account>, Self::Error>;

    /// Persist the relationship changes recorded on one account
    ///
    /// Only [`Account::changes`] are written; edges and views the snapshot
    /// does not mention are left as stored.
    fn save_account(&mut self, account: &Account) -> Result<(), Self::Error>;

    /// Persist the changes of several accounts as one all-or-nothing write
    ///
    /// Either every account is stored or none is; callers rely on this to keep
    /// both sides of a follow edge consistent. Applying the same changes again
    /// leaves the store unchanged.
    fn save_accounts(&mut self, accounts: &[Account]) -> Result<(), Self::Error>;

    /// Every known account id, in ascending order
    fn account_ids(&self) -> Result<Vec<AccountId>, Self::Error>;
}

/// Loads and persists content items
///
/// Implemented by the infrastructure layer (rapport-store)
pub trait ContentStore {
    /// Error type for content operations
    type Error;

    /// Load a content item by id
    fn load_content(&self, id: ContentId) -> Result<Option<ContentItem>, Self::Error>;

    /// Persist the reaction changes recorded on a content item
    fn save_content(&mut self, content: &ContentItem) -> Result<(), Self::Error>;
}

/// Store errors that may clear up if the same write is attempted again
///
/// Busy or locked databases qualify; missing entities and constraint
/// violations do not.
pub trait RetryableError: std::fmt::Display {
    /// Whether retrying the failed call can succeed
    fn is_retryable(&self) -> bool;
}
