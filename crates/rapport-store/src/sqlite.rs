//! SQLite-backed store

use crate::StoreError;
use rapport_domain::traits::{ContentStore, IdentityDirectory};
use rapport_domain::{
    Account, AccountChange, AccountId, ContentId, ContentItem, ReactionChange, ReactionKind,
    ViewerLog,
};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

/// How long a writer waits for another connection's lock before failing busy
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite-based implementation of `IdentityDirectory` and `ContentStore`
///
/// Relationship sub-fields are normalized: a follow edge is a single row in
/// `follows`, so an account's `followers` and another account's `following`
/// are read from the same row.
///
/// Saves write only the changes recorded on the entity, inside one
/// `IMMEDIATE` transaction, so several connections (or processes) can share
/// one database file without a stale snapshot deleting rows another
/// connection committed after the load.
///
/// # Thread Safety
///
/// SQLite connections are `Send` but not `Sync`. Share a store between threads
/// behind a mutex (the graph engine does this).
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) a store at the given database path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use rapport_store::SqliteStore;
    ///
    /// let store = SqliteStore::new("rapport.db").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path.as_ref())?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        let mut store = Self { conn };
        store.initialize_schema()?;
        tracing::debug!("Opened SQLite store at {}", path.as_ref().display());
        Ok(store)
    }

    /// Initialize the database schema
    fn initialize_schema(&mut self) -> Result<(), StoreError> {
        let schema = include_str!("schema.sql");
        self.conn.execute_batch(schema)?;
        Ok(())
    }

    /// Register a new account
    ///
    /// Account creation belongs to the registration flow, not to the
    /// relationship engine; this is the hook that flow calls.
    pub fn insert_account(&mut self, account: &Account) -> Result<(), StoreError> {
        let tx = self.conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        if account_exists(&tx, account.id)? {
            return Err(StoreError::Duplicate(format!("account {}", account.id)));
        }
        tx.execute(
            "INSERT INTO accounts (id, handle) VALUES (?1, ?2)",
            params![key(account.id.to_bytes()), &account.handle],
        )?;
        insert_relationships(&tx, account)?;
        tx.commit()?;
        Ok(())
    }

    /// Register a new content item
    pub fn insert_content(&mut self, content: &ContentItem) -> Result<(), StoreError> {
        let tx = self.conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        if !account_exists(&tx, content.author_id)? {
            return Err(StoreError::NotFound(format!("author {}", content.author_id)));
        }
        let exists = tx
            .query_row(
                "SELECT 1 FROM content_items WHERE id = ?1",
                params![key(content.id.to_bytes())],
                |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false);
        if exists {
            return Err(StoreError::Duplicate(format!("content {}", content.id)));
        }
        tx.execute(
            "INSERT INTO content_items (id, author_id, title, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                key(content.id.to_bytes()),
                key(content.author_id.to_bytes()),
                &content.title,
                content.created_at as i64,
            ],
        )?;
        for kind in ReactionKind::ALL {
            for actor in content.reactions(kind) {
                apply_reaction_change(&tx, content.id, ReactionChange::Added(*actor, kind))?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn query_account_ids(&self, sql: &str, id: AccountId) -> Result<Vec<AccountId>, StoreError> {
        let mut stmt = self.conn.prepare_cached(sql)?;
        let ids = stmt
            .query_map(params![key(id.to_bytes())], |row| account_id_at(row, 0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ids)
    }
}

impl IdentityDirectory for SqliteStore {
    type Error = StoreError;

    fn exists(&self, id: AccountId) -> Result<bool, Self::Error> {
        account_exists(&self.conn, id)
    }

    fn load_account(&self, id: AccountId) -> Result<Option<Account>, Self::Error> {
        let handle: Option<String> = self
            .conn
            .query_row(
                "SELECT handle FROM accounts WHERE id = ?1",
                params![key(id.to_bytes())],
                |row| row.get(0),
            )
            .optional()?;

        let Some(handle) = handle else {
            return Ok(None);
        };

        let followers: HashSet<AccountId> = self
            .query_account_ids("SELECT follower_id FROM follows WHERE followee_id = ?1", id)?
            .into_iter()
            .collect();
        let following: HashSet<AccountId> = self
            .query_account_ids("SELECT followee_id FROM follows WHERE follower_id = ?1", id)?
            .into_iter()
            .collect();
        let viewers: ViewerLog = self
            .query_account_ids(
                "SELECT viewer_id FROM profile_views WHERE owner_id = ?1 ORDER BY seq",
                id,
            )?
            .into_iter()
            .collect();

        Ok(Some(Account::from_parts(id, handle, followers, following, viewers)))
    }

    fn save_account(&mut self, account: &Account) -> Result<(), Self::Error> {
        self.save_accounts(std::slice::from_ref(account))
    }

    fn save_accounts(&mut self, accounts: &[Account]) -> Result<(), Self::Error> {
        let tx = self.conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        for account in accounts {
            let updated = tx.execute(
                "UPDATE accounts SET handle = ?2 WHERE id = ?1",
                params![key(account.id.to_bytes()), &account.handle],
            )?;
            if updated == 0 {
                // Dropping the transaction rolls back earlier accounts
                return Err(StoreError::NotFound(format!("account {}", account.id)));
            }
            for change in account.changes() {
                apply_account_change(&tx, account.id, *change)?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn account_ids(&self) -> Result<Vec<AccountId>, Self::Error> {
        let mut stmt = self.conn.prepare_cached("SELECT id FROM accounts ORDER BY id")?;
        let ids = stmt
            .query_map([], |row| account_id_at(row, 0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ids)
    }
}

impl ContentStore for SqliteStore {
    type Error = StoreError;

    fn load_content(&self, id: ContentId) -> Result<Option<ContentItem>, Self::Error> {
        let content = self
            .conn
            .query_row(
                "SELECT author_id, title, created_at FROM content_items WHERE id = ?1",
                params![key(id.to_bytes())],
                |row| {
                    Ok(ContentItem::new(
                        id,
                        account_id_at(row, 0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, i64>(2)? as u64,
                    ))
                },
            )
            .optional()?;

        let Some(mut content) = content else {
            return Ok(None);
        };

        let mut stmt = self
            .conn
            .prepare_cached("SELECT account_id, kind FROM reactions WHERE content_id = ?1")?;
        let reactions = stmt
            .query_map(params![key(id.to_bytes())], |row| {
                Ok((account_id_at(row, 0)?, reaction_kind_at(row, 1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        for (actor, kind) in reactions {
            content.add_reaction(actor, kind);
        }
        // Loaded rows are state, not changes to write back
        content.clear_changes();

        Ok(Some(content))
    }

    fn save_content(&mut self, content: &ContentItem) -> Result<(), Self::Error> {
        let tx = self.conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let updated = tx.execute(
            "UPDATE content_items SET title = ?2 WHERE id = ?1",
            params![key(content.id.to_bytes()), &content.title],
        )?;
        if updated == 0 {
            return Err(StoreError::NotFound(format!("content {}", content.id)));
        }
        for change in content.changes() {
            apply_reaction_change(&tx, content.id, *change)?;
        }
        tx.commit()?;
        Ok(())
    }
}

/// Storage key for an id
fn key(bytes: [u8; 16]) -> Vec<u8> {
    bytes.to_vec()
}

fn account_exists(conn: &Connection, id: AccountId) -> Result<bool, StoreError> {
    let exists = conn
        .query_row(
            "SELECT 1 FROM accounts WHERE id = ?1",
            params![key(id.to_bytes())],
            |_| Ok(true),
        )
        .optional()?
        .unwrap_or(false);
    Ok(exists)
}

/// Write every relationship of a freshly inserted account
fn insert_relationships(conn: &Connection, account: &Account) -> Result<(), StoreError> {
    for target in account.following() {
        apply_account_change(conn, account.id, AccountChange::Followed(*target))?;
    }
    for follower in account.followers() {
        apply_account_change(conn, account.id, AccountChange::FollowerAdded(*follower))?;
    }
    for viewer in account.viewers().as_slice() {
        apply_account_change(conn, account.id, AccountChange::Viewed(*viewer))?;
    }
    Ok(())
}

/// Write one relationship change of `owner` as a row insert or delete
///
/// Inserts ignore rows that already exist and deletes ignore rows that are
/// gone, so replaying a change is a no-op.
fn apply_account_change(
    conn: &Connection,
    owner: AccountId,
    change: AccountChange,
) -> Result<(), StoreError> {
    let id = key(owner.to_bytes());
    match change {
        AccountChange::Followed(target) => {
            conn.prepare_cached(
                "INSERT OR IGNORE INTO follows (follower_id, followee_id) VALUES (?1, ?2)",
            )?
            .execute(params![&id, key(target.to_bytes())])?;
        }
        AccountChange::Unfollowed(target) => {
            conn.prepare_cached("DELETE FROM follows WHERE follower_id = ?1 AND followee_id = ?2")?
                .execute(params![&id, key(target.to_bytes())])?;
        }
        AccountChange::FollowerAdded(follower) => {
            conn.prepare_cached(
                "INSERT OR IGNORE INTO follows (follower_id, followee_id) VALUES (?1, ?2)",
            )?
            .execute(params![key(follower.to_bytes()), &id])?;
        }
        AccountChange::FollowerRemoved(follower) => {
            conn.prepare_cached("DELETE FROM follows WHERE follower_id = ?1 AND followee_id = ?2")?
                .execute(params![key(follower.to_bytes()), &id])?;
        }
        AccountChange::Viewed(viewer) => {
            // First visit keeps its position; seq continues after the stored log
            conn.prepare_cached(
                "INSERT OR IGNORE INTO profile_views (owner_id, viewer_id, seq)
                 VALUES (?1, ?2, (SELECT COALESCE(MAX(seq) + 1, 0) FROM profile_views WHERE owner_id = ?1))",
            )?
            .execute(params![&id, key(viewer.to_bytes())])?;
        }
    }
    Ok(())
}

/// Write one reaction change of `content` as a row insert or delete
fn apply_reaction_change(
    conn: &Connection,
    content: ContentId,
    change: ReactionChange,
) -> Result<(), StoreError> {
    let id = key(content.to_bytes());
    match change {
        ReactionChange::Added(actor, kind) => {
            conn.prepare_cached(
                "INSERT OR IGNORE INTO reactions (content_id, account_id, kind) VALUES (?1, ?2, ?3)",
            )?
            .execute(params![&id, key(actor.to_bytes()), kind.as_str()])?;
        }
        ReactionChange::Removed(actor, kind) => {
            conn.prepare_cached(
                "DELETE FROM reactions WHERE content_id = ?1 AND account_id = ?2 AND kind = ?3",
            )?
            .execute(params![&id, key(actor.to_bytes()), kind.as_str()])?;
        }
    }
    Ok(())
}

fn account_id_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<AccountId> {
    let bytes: Vec<u8> = row.get(idx)?;
    AccountId::from_bytes(&bytes).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, Type::Blob, Box::new(StoreError::InvalidData(e)))
    })
}

fn reaction_kind_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<ReactionKind> {
    let kind: String = row.get(idx)?;
    kind.parse::<ReactionKind>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(StoreError::InvalidData(e)))
    })
}
