//! Content module - posts and the reactions they collect

use crate::{AccountId, ContentId};
use std::collections::HashSet;

/// Kind of reaction an account can apply to a content item
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ReactionKind {
    /// Positive reaction
    Like,

    /// Negative reaction
    Dislike,

    /// The account has seen the item
    View,
}

impl ReactionKind {
    /// All kinds, in storage order
    pub const ALL: [ReactionKind; 3] = [ReactionKind::Like, ReactionKind::Dislike, ReactionKind::View];

    /// Get the kind name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ReactionKind::Like => "like",
            ReactionKind::Dislike => "dislike",
            ReactionKind::View => "view",
        }
    }

    /// Parse a kind from a string (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "like" => Some(ReactionKind::Like),
            "dislike" => Some(ReactionKind::Dislike),
            "view" => Some(ReactionKind::View),
            _ => None,
        }
    }

    /// The kind that cannot be held at the same time as this one
    pub fn opposite(&self) -> Option<Self> {
        match self {
            ReactionKind::Like => Some(ReactionKind::Dislike),
            ReactionKind::Dislike => Some(ReactionKind::Like),
            ReactionKind::View => None,
        }
    }
}

impl std::str::FromStr for ReactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid reaction kind: {}", s))
    }
}

impl std::fmt::Display for ReactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reaction added to or removed from a [`ContentItem`] since it was loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReactionChange {
    /// Reaction of the kind by the account inserted
    Added(AccountId, ReactionKind),
    /// Reaction of the kind by the account removed
    Removed(AccountId, ReactionKind),
}

/// A post receiving reactions
///
/// Each reaction set is keyed by account, so an account reacts at most once
/// per kind. Effective reaction edits are recorded in
/// [`ContentItem::changes`]; equality ignores them.
#[derive(Debug, Clone)]
pub struct ContentItem {
    /// Unique identifier
    pub id: ContentId,

    /// Author of the post
    pub author_id: AccountId,

    /// Post title
    pub title: String,

    /// Creation time (milliseconds since Unix epoch)
    pub created_at: u64,

    likes: HashSet<AccountId>,
    dislikes: HashSet<AccountId>,
    views: HashSet<AccountId>,
    changes: Vec<ReactionChange>,
}

impl PartialEq for ContentItem {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.author_id == other.author_id
            && self.title == other.title
            && self.created_at == other.created_at
            && self.likes == other.likes
            && self.dislikes == other.dislikes
            && self.views == other.views
    }
}

impl Eq for ContentItem {}

impl ContentItem {
    /// Create a content item with no reactions
    pub fn new(id: ContentId, author_id: AccountId, title: impl Into<String>, created_at: u64) -> Self {
        Self {
            id,
            author_id,
            title: title.into(),
            created_at,
            likes: HashSet::new(),
            dislikes: HashSet::new(),
            views: HashSet::new(),
            changes: Vec::new(),
        }
    }

    /// Set of accounts holding reactions of `kind`
    pub fn reactions(&self, kind: ReactionKind) -> &HashSet<AccountId> {
        match kind {
            ReactionKind::Like => &self.likes,
            ReactionKind::Dislike => &self.dislikes,
            ReactionKind::View => &self.views,
        }
    }

    fn reactions_mut(&mut self, kind: ReactionKind) -> &mut HashSet<AccountId> {
        match kind {
            ReactionKind::Like => &mut self.likes,
            ReactionKind::Dislike => &mut self.dislikes,
            ReactionKind::View => &mut self.views,
        }
    }

    /// Accounts that liked the item
    pub fn likes(&self) -> &HashSet<AccountId> {
        &self.likes
    }

    /// Accounts that disliked the item
    pub fn dislikes(&self) -> &HashSet<AccountId> {
        &self.dislikes
    }

    /// Accounts that viewed the item
    pub fn views(&self) -> &HashSet<AccountId> {
        &self.views
    }

    /// Whether `actor` holds a reaction of `kind`
    pub fn has_reacted(&self, actor: &AccountId, kind: ReactionKind) -> bool {
        self.reactions(kind).contains(actor)
    }

    /// Insert a reaction; returns `false` if it was already present
    pub fn add_reaction(&mut self, actor: AccountId, kind: ReactionKind) -> bool {
        self.record(ReactionChange::Added(actor, kind))
    }

    /// Remove a reaction; returns `false` if it was absent
    pub fn remove_reaction(&mut self, actor: &AccountId, kind: ReactionKind) -> bool {
        self.record(ReactionChange::Removed(*actor, kind))
    }

    /// Reaction edits made since load (or since [`ContentItem::clear_changes`]), in order
    pub fn changes(&self) -> &[ReactionChange] {
        &self.changes
    }

    /// Forget recorded reaction edits
    pub fn clear_changes(&mut self) {
        self.changes.clear();
    }

    /// Apply a change without recording it; returns `false` if it was a no-op
    pub fn apply(&mut self, change: ReactionChange) -> bool {
        match change {
            ReactionChange::Added(actor, kind) => self.reactions_mut(kind).insert(actor),
            ReactionChange::Removed(actor, kind) => self.reactions_mut(kind).remove(&actor),
        }
    }

    fn record(&mut self, change: ReactionChange) -> bool {
        let applied = self.apply(change);
        if applied {
            self.changes.push(change);
        }
        applied
    }
}
