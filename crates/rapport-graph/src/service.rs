//! Caller-facing surface over the graph and the ledger

use crate::engagement::{EngagementLedger, EngagementSummary};
use crate::metrics::GraphMetrics;
use crate::relationship::{RelationshipGraph, RelationshipSummary, RepairReport};
use crate::shared::Shared;
use crate::{GraphConfig, GraphError};
use rapport_domain::metrics::{self, EngagementCounts, RecencyLabel};
use rapport_domain::traits::{ContentStore, IdentityDirectory, RetryableError};
use rapport_domain::{Account, AccountId, ContentId, ContentItem, Outcome, ReactionKind};
use std::sync::Arc;

/// Relationship graph and engagement ledger over one shared store
///
/// This is the protocol-agnostic surface a transport layer maps onto its
/// routes. Every call returns a `Result`; "already done" conditions are
/// [`Outcome`] variants on the `Ok` side.
///
/// `SocialService` is `Sync` when the store is `Send`, so one instance can be
/// shared across request threads.
pub struct SocialService<S> {
    shared: Arc<Shared<S>>,
    graph: RelationshipGraph<S>,
    ledger: EngagementLedger<S>,
}

impl<S> SocialService<S>
where
    S: IdentityDirectory + ContentStore,
    <S as IdentityDirectory>::Error: RetryableError,
    <S as ContentStore>::Error: RetryableError,
{
    /// Create a service over `store`
    pub fn new(store: S, config: GraphConfig) -> Result<Self, GraphError> {
        let shared = Arc::new(Shared::new(store, config)?);
        Ok(Self {
            graph: RelationshipGraph::from_shared(Arc::clone(&shared)),
            ledger: EngagementLedger::from_shared(Arc::clone(&shared)),
            shared,
        })
    }

    /// The relationship graph
    pub fn graph(&self) -> &RelationshipGraph<S> {
        &self.graph
    }

    /// The engagement ledger
    pub fn ledger(&self) -> &EngagementLedger<S> {
        &self.ledger
    }

    /// Active configuration
    pub fn config(&self) -> &GraphConfig {
        &self.shared.config
    }

    /// Snapshot of the operation counters
    pub fn metrics(&self) -> GraphMetrics {
        self.shared.metrics().clone()
    }

    /// Run `f` with exclusive access to the store
    ///
    /// Entity locks are not taken; use this for collaborator flows such as
    /// registering accounts, not for relationship mutations.
    pub fn with_store<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        self.shared.with_store(f)
    }

    /// See [`RelationshipGraph::follow`]
    pub fn follow(&self, actor: AccountId, target: AccountId) -> Result<Outcome, GraphError> {
        self.graph.follow(actor, target)
    }

    /// See [`RelationshipGraph::unfollow`]
    pub fn unfollow(&self, actor: AccountId, target: AccountId) -> Result<Outcome, GraphError> {
        self.graph.unfollow(actor, target)
    }

    /// See [`RelationshipGraph::record_profile_view`]
    pub fn record_profile_view(
        &self,
        viewer: AccountId,
        owner: AccountId,
    ) -> Result<Outcome, GraphError> {
        self.graph.record_profile_view(viewer, owner)
    }

    /// See [`EngagementLedger::react`]
    pub fn react(
        &self,
        actor: AccountId,
        content: ContentId,
        kind: ReactionKind,
    ) -> Result<Outcome, GraphError> {
        self.ledger.react(actor, content, kind)
    }

    /// See [`EngagementLedger::counts`]
    pub fn counts(&self, content: ContentId) -> Result<EngagementCounts, GraphError> {
        self.ledger.counts(content)
    }

    /// See [`EngagementLedger::like_percentage`]
    pub fn like_percentage(&self, content: ContentId) -> Result<Option<f64>, GraphError> {
        self.ledger.like_percentage(content)
    }

    /// See [`EngagementLedger::dislike_percentage`]
    pub fn dislike_percentage(&self, content: ContentId) -> Result<Option<f64>, GraphError> {
        self.ledger.dislike_percentage(content)
    }

    /// Age label for a creation time as seen at `now` (both ms since Unix epoch)
    pub fn recency_label(&self, created_at: u64, now: u64) -> RecencyLabel {
        metrics::recency_label(created_at, now)
    }

    /// See [`EngagementLedger::engagement`]
    pub fn engagement(&self, content: ContentId, now: u64) -> Result<EngagementSummary, GraphError> {
        self.ledger.engagement(content, now)
    }

    /// See [`EngagementLedger::content`]
    pub fn content(&self, content: ContentId) -> Result<ContentItem, GraphError> {
        self.ledger.content(content)
    }

    /// See [`RelationshipGraph::account`]
    pub fn account(&self, id: AccountId) -> Result<Account, GraphError> {
        self.graph.account(id)
    }

    /// See [`RelationshipGraph::followers`]
    pub fn followers(&self, id: AccountId) -> Result<Vec<AccountId>, GraphError> {
        self.graph.followers(id)
    }

    /// See [`RelationshipGraph::following`]
    pub fn following(&self, id: AccountId) -> Result<Vec<AccountId>, GraphError> {
        self.graph.following(id)
    }

    /// See [`RelationshipGraph::profile_viewers`]
    pub fn profile_viewers(&self, id: AccountId) -> Result<Vec<AccountId>, GraphError> {
        self.graph.profile_viewers(id)
    }

    /// See [`RelationshipGraph::relationship_summary`]
    pub fn relationship_summary(&self, id: AccountId) -> Result<RelationshipSummary, GraphError> {
        self.graph.relationship_summary(id)
    }

    /// See [`RelationshipGraph::repair_symmetry`]
    pub fn repair_symmetry(&self) -> Result<RepairReport, GraphError> {
        self.graph.repair_symmetry()
    }
}
