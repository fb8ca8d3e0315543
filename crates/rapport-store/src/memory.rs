//! In-memory document store

use crate::StoreError;
use rapport_domain::traits::{ContentStore, IdentityDirectory};
use rapport_domain::{Account, AccountId, ContentId, ContentItem};
use std::collections::{BTreeMap, HashMap};

/// In-process implementation of `IdentityDirectory` and `ContentStore`
///
/// Each account is kept as a whole document, the way a document database
/// would hold it. Unlike [`crate::SqliteStore`], the two sides of a follow
/// edge live in different documents, so a lone `save_account` can leave them
/// asymmetric. Saves replay the changes recorded on each entity onto the
/// stored document, all accounts of one `save_accounts` call or none.
#[derive(Debug, Default)]
pub struct MemoryStore {
    accounts: BTreeMap<AccountId, Account>,
    content: HashMap<ContentId, ContentItem>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new account
    pub fn insert_account(&mut self, mut account: Account) -> Result<(), StoreError> {
        if self.accounts.contains_key(&account.id) {
            return Err(StoreError::Duplicate(format!("account {}", account.id)));
        }
        account.clear_changes();
        self.accounts.insert(account.id, account);
        Ok(())
    }

    /// Register a new content item
    pub fn insert_content(&mut self, mut content: ContentItem) -> Result<(), StoreError> {
        if !self.accounts.contains_key(&content.author_id) {
            return Err(StoreError::NotFound(format!("author {}", content.author_id)));
        }
        if self.content.contains_key(&content.id) {
            return Err(StoreError::Duplicate(format!("content {}", content.id)));
        }
        content.clear_changes();
        self.content.insert(content.id, content);
        Ok(())
    }
}

impl IdentityDirectory for MemoryStore {
    type Error = StoreError;

    fn exists(&self, id: AccountId) -> Result<bool, Self::Error> {
        Ok(self.accounts.contains_key(&id))
    }

    fn load_account(&self, id: AccountId) -> Result<Option<Account>, Self::Error> {
        Ok(self.accounts.get(&id).cloned())
    }

    fn save_account(&mut self, account: &Account) -> Result<(), Self::Error> {
        self.save_accounts(std::slice::from_ref(account))
    }

    fn save_accounts(&mut self, accounts: &[Account]) -> Result<(), Self::Error> {
        // Validate everything before touching anything
        if let Some(missing) = accounts.iter().find(|a| !self.accounts.contains_key(&a.id)) {
            return Err(StoreError::NotFound(format!("account {}", missing.id)));
        }
        for account in accounts {
            if let Some(stored) = self.accounts.get_mut(&account.id) {
                stored.handle.clone_from(&account.handle);
                for change in account.changes() {
                    stored.apply(*change);
                }
            }
        }
        Ok(())
    }

    fn account_ids(&self) -> Result<Vec<AccountId>, Self::Error> {
        Ok(self.accounts.keys().copied().collect())
    }
}

impl ContentStore for MemoryStore {
    type Error = StoreError;

    fn load_content(&self, id: ContentId) -> Result<Option<ContentItem>, Self::Error> {
        Ok(self.content.get(&id).cloned())
    }

    fn save_content(&mut self, content: &ContentItem) -> Result<(), Self::Error> {
        match self.content.get_mut(&content.id) {
            Some(stored) => {
                stored.title.clone_from(&content.title);
                for change in content.changes() {
                    stored.apply(*change);
                }
                Ok(())
            }
            None => Err(StoreError::NotFound(format!("content {}", content.id))),
        }
    }
}
