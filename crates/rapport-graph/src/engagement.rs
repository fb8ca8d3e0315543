//! Engagement ledger: per-content reaction sets and the metrics read from them

use crate::locks::EntityKey;
use crate::metrics::Operation;
use crate::shared::Shared;
use crate::{GraphConfig, GraphError, ReactionPolicy};
use rapport_domain::metrics::{self, EngagementCounts, RecencyLabel};
use rapport_domain::traits::{ContentStore, IdentityDirectory, RetryableError};
use rapport_domain::{AccountId, ContentId, ContentItem, Outcome, ReactionKind};
use std::sync::Arc;

/// Everything a post view needs, computed in one read
#[derive(Debug, Clone, PartialEq)]
pub struct EngagementSummary {
    /// Reaction counts
    pub counts: EngagementCounts,
    /// Likes among likes + dislikes, in percent
    pub like_percentage: Option<f64>,
    /// Dislikes among likes + dislikes, in percent
    pub dislike_percentage: Option<f64>,
    /// Age of the post
    pub recency: RecencyLabel,
}

/// Maintains like/dislike/view sets on content items
pub struct EngagementLedger<S> {
    shared: Arc<Shared<S>>,
}

impl<S> EngagementLedger<S>
where
    S: IdentityDirectory + ContentStore,
    <S as IdentityDirectory>::Error: RetryableError,
    <S as ContentStore>::Error: RetryableError,
{
    /// Create a ledger over `store`
    pub fn new(store: S, config: GraphConfig) -> Result<Self, GraphError> {
        Ok(Self::from_shared(Arc::new(Shared::new(store, config)?)))
    }

    pub(crate) fn from_shared(shared: Arc<Shared<S>>) -> Self {
        Self { shared }
    }

    /// Record that `actor` reacted to `content` with `kind`
    ///
    /// Returns `AlreadyReacted` without writing if the reaction is already
    /// held. Under [`ReactionPolicy::Strict`] a like replaces an earlier
    /// dislike by the same account (and vice versa) in the same write.
    pub fn react(
        &self,
        actor: AccountId,
        content: ContentId,
        kind: ReactionKind,
    ) -> Result<Outcome, GraphError> {
        let result = self.react_locked(actor, content, kind);
        self.shared.record(Operation::React, &result);
        result
    }

    fn react_locked(
        &self,
        actor: AccountId,
        content: ContentId,
        kind: ReactionKind,
    ) -> Result<Outcome, GraphError> {
        let _scope = self.shared.locks.acquire(&[EntityKey::Content(content)]);

        let mut item = self.load(content)?;
        if !self.shared.read(|store| store.exists(actor))? {
            return Err(GraphError::NotFound(format!("account {}", actor)));
        }

        if item.has_reacted(&actor, kind) {
            return Ok(Outcome::AlreadyReacted);
        }

        if self.shared.config.reaction_policy == ReactionPolicy::Strict {
            if let Some(opposite) = kind.opposite() {
                if item.remove_reaction(&actor, opposite) {
                    tracing::debug!(actor = %actor, content = %content, from = %opposite, to = %kind, "Switching reaction");
                }
            }
        }

        item.add_reaction(actor, kind);
        self.shared
            .persist(Operation::React, |store| store.save_content(&item))?;

        tracing::info!(actor = %actor, content = %content, kind = %kind, "Reaction recorded");
        Ok(Outcome::Success(()))
    }

    /// Load a content item
    pub fn content(&self, id: ContentId) -> Result<ContentItem, GraphError> {
        self.load(id)
    }

    /// View, like and dislike counts
    pub fn counts(&self, content: ContentId) -> Result<EngagementCounts, GraphError> {
        Ok(metrics::counts(&self.load(content)?))
    }

    /// Likes among likes + dislikes, in percent (`None` when both are empty)
    pub fn like_percentage(&self, content: ContentId) -> Result<Option<f64>, GraphError> {
        Ok(metrics::like_percentage(&self.load(content)?))
    }

    /// Dislikes among likes + dislikes, in percent (`None` when both are empty)
    pub fn dislike_percentage(&self, content: ContentId) -> Result<Option<f64>, GraphError> {
        Ok(metrics::dislike_percentage(&self.load(content)?))
    }

    /// Age label of a content item as seen at `now` (ms since Unix epoch)
    pub fn content_recency(&self, content: ContentId, now: u64) -> Result<RecencyLabel, GraphError> {
        Ok(metrics::recency_label(self.load(content)?.created_at, now))
    }

    /// Counts, percentages and recency from a single load
    pub fn engagement(&self, content: ContentId, now: u64) -> Result<EngagementSummary, GraphError> {
        let item = self.load(content)?;
        Ok(EngagementSummary {
            counts: metrics::counts(&item),
            like_percentage: metrics::like_percentage(&item),
            dislike_percentage: metrics::dislike_percentage(&item),
            recency: metrics::recency_label(item.created_at, now),
        })
    }

    fn load(&self, id: ContentId) -> Result<ContentItem, GraphError> {
        self.shared
            .read(|store| store.load_content(id))?
            .ok_or_else(|| GraphError::NotFound(format!("content {}", id)))
    }
}
