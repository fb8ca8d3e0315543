//! Account module - identities participating in the follow graph

use crate::AccountId;
use std::collections::HashSet;

/// Append-only log of accounts that viewed a profile
///
/// Keeps first-visit order for "who viewed me" listings and a hash index so
/// membership checks do not scan the log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewerLog {
    order: Vec<AccountId>,
    index: HashSet<AccountId>,
}

impl ViewerLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a viewer; returns `false` if already present
    pub fn record(&mut self, viewer: AccountId) -> bool {
        if !self.index.insert(viewer) {
            return false;
        }
        self.order.push(viewer);
        true
    }

    /// Whether `viewer` has already been logged
    pub fn contains(&self, viewer: &AccountId) -> bool {
        self.index.contains(viewer)
    }

    /// Viewers in first-visit order
    pub fn as_slice(&self) -> &[AccountId] {
        &self.order
    }

    /// Number of distinct viewers
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// True when nobody has viewed the profile
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl FromIterator<AccountId> for ViewerLog {
    fn from_iter<I: IntoIterator<Item = AccountId>>(iter: I) -> Self {
        let mut log = Self::new();
        for viewer in iter {
            log.record(viewer);
        }
        log
    }
}

/// A relationship mutation made to an [`Account`] since it was loaded
///
/// Stores persist these instead of the full sets, so a save never removes
/// rows written by someone else after the load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountChange {
    /// Outgoing edge to the account added
    Followed(AccountId),
    /// Outgoing edge to the account removed
    Unfollowed(AccountId),
    /// Incoming edge from the account added
    FollowerAdded(AccountId),
    /// Incoming edge from the account removed
    FollowerRemoved(AccountId),
    /// Profile view by the account logged
    Viewed(AccountId),
}

/// A user account with its relationship sub-fields
///
/// Accounts are created and deleted by collaborators outside the core. The
/// relationship engine only touches the follower/following sets and the
/// viewer log, through the methods below. Every effective mutation is also
/// appended to [`Account::changes`]; equality ignores that list.
#[derive(Debug, Clone)]
pub struct Account {
    /// Unique identifier
    pub id: AccountId,

    /// Display handle
    pub handle: String,

    followers: HashSet<AccountId>,
    following: HashSet<AccountId>,
    viewers: ViewerLog,
    changes: Vec<AccountChange>,
}

impl PartialEq for Account {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.handle == other.handle
            && self.followers == other.followers
            && self.following == other.following
            && self.viewers == other.viewers
    }
}

impl Eq for Account {}

impl Account {
    /// Create an account with no relationships
    pub fn new(id: AccountId, handle: impl Into<String>) -> Self {
        Self {
            id,
            handle: handle.into(),
            followers: HashSet::new(),
            following: HashSet::new(),
            viewers: ViewerLog::new(),
            changes: Vec::new(),
        }
    }

    /// Rebuild an account from persisted parts
    pub fn from_parts(
        id: AccountId,
        handle: String,
        followers: HashSet<AccountId>,
        following: HashSet<AccountId>,
        viewers: ViewerLog,
    ) -> Self {
        Self {
            id,
            handle,
            followers,
            following,
            viewers,
            changes: Vec::new(),
        }
    }

    /// Accounts following this one
    pub fn followers(&self) -> &HashSet<AccountId> {
        &self.followers
    }

    /// Accounts this one follows
    pub fn following(&self) -> &HashSet<AccountId> {
        &self.following
    }

    /// Profile-view log
    pub fn viewers(&self) -> &ViewerLog {
        &self.viewers
    }

    /// Whether this account follows `other`
    pub fn is_following(&self, other: &AccountId) -> bool {
        self.following.contains(other)
    }

    /// Whether `other` follows this account
    pub fn is_followed_by(&self, other: &AccountId) -> bool {
        self.followers.contains(other)
    }

    /// Add an outgoing edge; returns `false` if it already existed
    pub fn add_following(&mut self, target: AccountId) -> bool {
        self.record(AccountChange::Followed(target))
    }

    /// Add an incoming edge; returns `false` if it already existed
    pub fn add_follower(&mut self, follower: AccountId) -> bool {
        self.record(AccountChange::FollowerAdded(follower))
    }

    /// Remove an outgoing edge; returns `false` if it was absent
    pub fn remove_following(&mut self, target: &AccountId) -> bool {
        self.record(AccountChange::Unfollowed(*target))
    }

    /// Remove an incoming edge; returns `false` if it was absent
    pub fn remove_follower(&mut self, follower: &AccountId) -> bool {
        self.record(AccountChange::FollowerRemoved(*follower))
    }

    /// Log a profile view; returns `false` for a repeat visit
    pub fn record_viewer(&mut self, viewer: AccountId) -> bool {
        self.record(AccountChange::Viewed(viewer))
    }

    /// Mutations made since load (or since [`Account::clear_changes`]), in order
    pub fn changes(&self) -> &[AccountChange] {
        &self.changes
    }

    /// Forget recorded mutations, e.g. once they are persisted
    pub fn clear_changes(&mut self) {
        self.changes.clear();
    }

    /// Apply a change without recording it; returns `false` if it was a no-op
    pub fn apply(&mut self, change: AccountChange) -> bool {
        match change {
            AccountChange::Followed(target) => self.following.insert(target),
            AccountChange::Unfollowed(target) => self.following.remove(&target),
            AccountChange::FollowerAdded(follower) => self.followers.insert(follower),
            AccountChange::FollowerRemoved(follower) => self.followers.remove(&follower),
            AccountChange::Viewed(viewer) => self.viewers.record(viewer),
        }
    }

    fn record(&mut self, change: AccountChange) -> bool {
        let applied = self.apply(change);
        if applied {
            self.changes.push(change);
        }
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewer_log_keeps_first_visit_order() {
        let a = AccountId::from_value(3);
        let b = AccountId::from_value(1);
        let c = AccountId::from_value(2);

        let mut log = ViewerLog::new();
        assert!(log.record(a));
        assert!(log.record(b));
        assert!(!log.record(a));
        assert!(log.record(c));

        assert_eq!(log.as_slice(), &[a, b, c]);
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn test_viewer_log_from_iter_drops_duplicates() {
        let a = AccountId::from_value(1);
        let b = AccountId::from_value(2);

        let log: ViewerLog = vec![a, b, a, b].into_iter().collect();
        assert_eq!(log.as_slice(), &[a, b]);
    }

    #[test]
    fn test_edges_are_sets() {
        let mut account = Account::new(AccountId::from_value(1), "alice");
        let bob = AccountId::from_value(2);

        assert!(account.add_following(bob));
        assert!(!account.add_following(bob));
        assert_eq!(account.following().len(), 1);
        assert!(account.is_following(&bob));

        assert!(account.remove_following(&bob));
        assert!(!account.remove_following(&bob));
        assert!(account.following().is_empty());
    }

    #[test]
    fn test_only_effective_mutations_are_recorded() {
        let mut account = Account::new(AccountId::from_value(1), "alice");
        let bob = AccountId::from_value(2);
        let carol = AccountId::from_value(3);

        account.add_following(bob);
        account.add_following(bob);
        account.remove_follower(&carol);
        account.record_viewer(carol);
        account.record_viewer(carol);

        assert_eq!(
            account.changes(),
            &[AccountChange::Followed(bob), AccountChange::Viewed(carol)]
        );

        account.clear_changes();
        assert!(account.changes().is_empty());
        assert!(account.is_following(&bob));
    }

    #[test]
    fn test_equality_ignores_changes() {
        let bob = AccountId::from_value(2);
        let mut edited = Account::new(AccountId::from_value(1), "alice");
        edited.add_follower(bob);

        let mut followers = HashSet::new();
        followers.insert(bob);
        let loaded = Account::from_parts(
            AccountId::from_value(1),
            "alice".to_string(),
            followers,
            HashSet::new(),
            ViewerLog::new(),
        );

        assert!(loaded.changes().is_empty());
        assert_eq!(edited, loaded);
    }

    #[test]
    fn test_apply_replays_changes() {
        let bob = AccountId::from_value(2);
        let mut source = Account::new(AccountId::from_value(1), "alice");
        source.add_following(bob);
        source.remove_following(&bob);
        source.add_follower(bob);

        let mut replica = Account::new(AccountId::from_value(1), "alice");
        for change in source.changes() {
            replica.apply(*change);
        }
        assert_eq!(replica, source);
        assert!(replica.changes().is_empty());
    }
}
