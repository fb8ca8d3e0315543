//! Relationship graph: follow edges and profile-view logs

use crate::locks::EntityKey;
use crate::metrics::Operation;
use crate::shared::Shared;
use crate::{GraphConfig, GraphError};
use rapport_domain::traits::{IdentityDirectory, RetryableError};
use rapport_domain::{Account, AccountId, Outcome};
use std::sync::Arc;

/// Follower/following/viewer counts for one account
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationshipSummary {
    /// Accounts following this one
    pub follower_count: usize,
    /// Accounts this one follows
    pub following_count: usize,
    /// Distinct profile viewers
    pub viewer_count: usize,
}

/// Result of a [`RelationshipGraph::repair_symmetry`] pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RepairReport {
    /// Accounts examined
    pub accounts_scanned: usize,
    /// One-sided edges that were completed
    pub edges_repaired: usize,
    /// Edges pointing at accounts that no longer exist (left untouched)
    pub dangling_edges: usize,
}

/// Maintains the follow edge set and profile-viewer logs
///
/// Every mutation holds the entity locks of the accounts it touches, and a
/// follow writes both accounts through one `save_accounts` call, so
/// `B ∈ A.following ⟺ A ∈ B.followers` is never observed half-applied.
///
/// # Examples
///
/// ```
/// use rapport_domain::{Account, AccountId, Outcome};
/// use rapport_graph::{GraphConfig, RelationshipGraph};
/// use rapport_store::MemoryStore;
///
/// let (alice, bob) = (AccountId::new(), AccountId::new());
/// let mut store = MemoryStore::new();
/// store.insert_account(Account::new(alice, "alice")).unwrap();
/// store.insert_account(Account::new(bob, "bob")).unwrap();
///
/// let graph = RelationshipGraph::new(store, GraphConfig::default()).unwrap();
/// assert_eq!(graph.follow(alice, bob).unwrap(), Outcome::Success(()));
/// assert_eq!(graph.follow(alice, bob).unwrap(), Outcome::AlreadyFollowing);
/// ```
pub struct RelationshipGraph<S> {
    shared: Arc<Shared<S>>,
}

impl<S> RelationshipGraph<S>
where
    S: IdentityDirectory,
    S::Error: RetryableError,
{
    /// Create a graph over `store`
    pub fn new(store: S, config: GraphConfig) -> Result<Self, GraphError> {
        Ok(Self::from_shared(Arc::new(Shared::new(store, config)?)))
    }

    pub(crate) fn from_shared(shared: Arc<Shared<S>>) -> Self {
        Self { shared }
    }

    /// Make `actor` follow `target`
    ///
    /// Returns `AlreadyFollowing` without writing if the edge exists.
    pub fn follow(&self, actor: AccountId, target: AccountId) -> Result<Outcome, GraphError> {
        let result = self.follow_locked(actor, target);
        self.shared.record(Operation::Follow, &result);
        result
    }

    fn follow_locked(&self, actor: AccountId, target: AccountId) -> Result<Outcome, GraphError> {
        let _scope = self
            .shared
            .locks
            .acquire(&[EntityKey::Account(actor), EntityKey::Account(target)]);

        let mut follower = self.load(actor)?;
        let mut followee = self.load(target)?;

        if actor == target {
            return Err(GraphError::InvalidOperation(
                "an account cannot follow itself".to_string(),
            ));
        }

        if follower.is_following(&target) {
            if !followee.is_followed_by(&actor) {
                followee.add_follower(actor);
                self.shared
                    .persist(Operation::Follow, |store| store.save_account(&followee))?;
                self.shared.metrics().record_repairs(1);
                tracing::warn!(actor = %actor, target = %target, "Completed one-sided follow edge");
            }
            tracing::debug!(actor = %actor, target = %target, "Already following");
            return Ok(Outcome::AlreadyFollowing);
        }

        follower.add_following(target);
        followee.add_follower(actor);
        let pair = [follower, followee];
        self.shared
            .persist(Operation::Follow, |store| store.save_accounts(&pair))?;

        tracing::info!(actor = %actor, target = %target, "Follow edge created");
        Ok(Outcome::Success(()))
    }

    /// Remove the edge `actor → target`
    ///
    /// Returns `NotFollowing` without writing if neither side of the edge
    /// exists. A one-sided edge is removed as well.
    pub fn unfollow(&self, actor: AccountId, target: AccountId) -> Result<Outcome, GraphError> {
        let result = self.unfollow_locked(actor, target);
        self.shared.record(Operation::Unfollow, &result);
        result
    }

    fn unfollow_locked(&self, actor: AccountId, target: AccountId) -> Result<Outcome, GraphError> {
        let _scope = self
            .shared
            .locks
            .acquire(&[EntityKey::Account(actor), EntityKey::Account(target)]);

        let mut follower = self.load(actor)?;
        let mut followee = self.load(target)?;

        if actor == target {
            return Err(GraphError::InvalidOperation(
                "an account cannot unfollow itself".to_string(),
            ));
        }

        let removed_out = follower.remove_following(&target);
        let removed_in = followee.remove_follower(&actor);
        if !removed_out && !removed_in {
            return Ok(Outcome::NotFollowing);
        }

        let pair = [follower, followee];
        self.shared
            .persist(Operation::Unfollow, |store| store.save_accounts(&pair))?;

        tracing::info!(actor = %actor, target = %target, "Follow edge removed");
        Ok(Outcome::Success(()))
    }

    /// Log that `viewer` looked at `owner`'s profile
    ///
    /// Returns `AlreadyViewed` without writing on a repeat visit.
    pub fn record_profile_view(
        &self,
        viewer: AccountId,
        owner: AccountId,
    ) -> Result<Outcome, GraphError> {
        let result = self.record_profile_view_locked(viewer, owner);
        self.shared.record(Operation::ProfileView, &result);
        result
    }

    fn record_profile_view_locked(
        &self,
        viewer: AccountId,
        owner: AccountId,
    ) -> Result<Outcome, GraphError> {
        // Only the owner's log is written; the viewer just has to exist
        let _scope = self.shared.locks.acquire(&[EntityKey::Account(owner)]);

        let mut profile = self.load(owner)?;
        if !self.shared.read(|store| store.exists(viewer))? {
            return Err(not_found(viewer));
        }

        if viewer == owner {
            return Err(GraphError::InvalidOperation(
                "an account cannot view its own profile".to_string(),
            ));
        }

        if !profile.record_viewer(viewer) {
            return Ok(Outcome::AlreadyViewed);
        }

        self.shared
            .persist(Operation::ProfileView, |store| store.save_account(&profile))?;

        tracing::debug!(viewer = %viewer, owner = %owner, "Profile view recorded");
        Ok(Outcome::Success(()))
    }

    /// Load an account
    pub fn account(&self, id: AccountId) -> Result<Account, GraphError> {
        self.load(id)
    }

    /// Accounts following `id`, ascending
    pub fn followers(&self, id: AccountId) -> Result<Vec<AccountId>, GraphError> {
        Ok(sorted(self.load(id)?.followers().iter().copied()))
    }

    /// Accounts `id` follows, ascending
    pub fn following(&self, id: AccountId) -> Result<Vec<AccountId>, GraphError> {
        Ok(sorted(self.load(id)?.following().iter().copied()))
    }

    /// Accounts that viewed `id`'s profile, in first-visit order
    pub fn profile_viewers(&self, id: AccountId) -> Result<Vec<AccountId>, GraphError> {
        Ok(self.load(id)?.viewers().as_slice().to_vec())
    }

    /// Relationship counts for `id`
    pub fn relationship_summary(&self, id: AccountId) -> Result<RelationshipSummary, GraphError> {
        let account = self.load(id)?;
        Ok(RelationshipSummary {
            follower_count: account.followers().len(),
            following_count: account.following().len(),
            viewer_count: account.viewers().len(),
        })
    }

    /// Find follow edges recorded on only one side and complete them
    ///
    /// Edges pointing at accounts that no longer exist are counted and left
    /// alone.
    pub fn repair_symmetry(&self) -> Result<RepairReport, GraphError> {
        let mut report = RepairReport::default();
        let ids = self.shared.read(|store| store.account_ids())?;

        for id in ids {
            let Some(account) = self.shared.read(|store| store.load_account(id))? else {
                continue;
            };
            report.accounts_scanned += 1;

            let outgoing = sorted(account.following().iter().copied());
            let incoming = sorted(account.followers().iter().copied());
            for (follower, followee) in outgoing
                .into_iter()
                .map(|target| (id, target))
                .chain(incoming.into_iter().map(|source| (source, id)))
            {
                match self.repair_edge(follower, followee)? {
                    EdgeRepair::Consistent => {}
                    EdgeRepair::Repaired => report.edges_repaired += 1,
                    EdgeRepair::Dangling => report.dangling_edges += 1,
                }
            }
        }

        self.shared.metrics().record_repairs(report.edges_repaired);
        tracing::info!(
            accounts = report.accounts_scanned,
            repaired = report.edges_repaired,
            dangling = report.dangling_edges,
            "Symmetry repair finished"
        );
        Ok(report)
    }

    fn repair_edge(&self, actor: AccountId, target: AccountId) -> Result<EdgeRepair, GraphError> {
        let _scope = self
            .shared
            .locks
            .acquire(&[EntityKey::Account(actor), EntityKey::Account(target)]);

        let follower = self.shared.read(|store| store.load_account(actor))?;
        let followee = self.shared.read(|store| store.load_account(target))?;
        let (Some(mut follower), Some(mut followee)) = (follower, followee) else {
            tracing::warn!(actor = %actor, target = %target, "Edge references a missing account");
            return Ok(EdgeRepair::Dangling);
        };

        let out = follower.is_following(&target);
        let inc = followee.is_followed_by(&actor);
        if out == inc {
            return Ok(EdgeRepair::Consistent);
        }

        follower.add_following(target);
        followee.add_follower(actor);
        let pair = [follower, followee];
        self.shared
            .persist(Operation::Repair, |store| store.save_accounts(&pair))?;

        tracing::warn!(actor = %actor, target = %target, "Repaired one-sided follow edge");
        Ok(EdgeRepair::Repaired)
    }

    fn load(&self, id: AccountId) -> Result<Account, GraphError> {
        self.shared
            .read(|store| store.load_account(id))?
            .ok_or_else(|| not_found(id))
    }
}

enum EdgeRepair {
    Consistent,
    Repaired,
    Dangling,
}

fn not_found(id: AccountId) -> GraphError {
    GraphError::NotFound(format!("account {}", id))
}

fn sorted(ids: impl Iterator<Item = AccountId>) -> Vec<AccountId> {
    let mut ids: Vec<AccountId> = ids.collect();
    ids.sort();
    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use rapport_store::MemoryStore;

    fn graph_with(n: u128) -> (RelationshipGraph<MemoryStore>, Vec<AccountId>) {
        let mut store = MemoryStore::new();
        let ids: Vec<AccountId> = (1..=n).map(AccountId::from_value).collect();
        for (i, id) in ids.iter().enumerate() {
            store.insert_account(Account::new(*id, format!("user{}", i))).unwrap();
        }
        (RelationshipGraph::new(store, GraphConfig::default()).unwrap(), ids)
    }

    #[test]
    fn test_follow_is_idempotent() {
        let (graph, ids) = graph_with(2);
        let (a, b) = (ids[0], ids[1]);

        assert_eq!(graph.follow(a, b).unwrap(), Outcome::Success(()));
        assert_eq!(graph.follow(a, b).unwrap(), Outcome::AlreadyFollowing);

        assert_eq!(graph.following(a).unwrap(), vec![b]);
        assert_eq!(graph.followers(b).unwrap(), vec![a]);
        assert!(graph.followers(a).unwrap().is_empty());
    }

    #[test]
    fn test_follow_missing_accounts() {
        let (graph, ids) = graph_with(1);
        let ghost = AccountId::from_value(99);

        assert!(matches!(graph.follow(ids[0], ghost), Err(GraphError::NotFound(_))));
        assert!(matches!(graph.follow(ghost, ids[0]), Err(GraphError::NotFound(_))));
        assert!(graph.following(ids[0]).unwrap().is_empty());
    }

    #[test]
    fn test_self_follow_rejected() {
        let (graph, ids) = graph_with(1);

        let result = graph.follow(ids[0], ids[0]);
        assert!(matches!(result, Err(GraphError::InvalidOperation(_))));
        assert!(graph.following(ids[0]).unwrap().is_empty());
        assert!(graph.followers(ids[0]).unwrap().is_empty());
    }

    #[test]
    fn test_unfollow() {
        let (graph, ids) = graph_with(2);
        let (a, b) = (ids[0], ids[1]);

        assert_eq!(graph.unfollow(a, b).unwrap(), Outcome::NotFollowing);
        graph.follow(a, b).unwrap();
        assert_eq!(graph.unfollow(a, b).unwrap(), Outcome::Success(()));
        assert!(graph.following(a).unwrap().is_empty());
        assert!(graph.followers(b).unwrap().is_empty());
        assert!(matches!(graph.unfollow(a, a), Err(GraphError::InvalidOperation(_))));
    }

    #[test]
    fn test_profile_view_log() {
        let (graph, ids) = graph_with(3);
        let (owner, v1, v2) = (ids[0], ids[1], ids[2]);

        assert_eq!(graph.record_profile_view(v2, owner).unwrap(), Outcome::Success(()));
        assert_eq!(graph.record_profile_view(v1, owner).unwrap(), Outcome::Success(()));
        for _ in 0..3 {
            assert_eq!(graph.record_profile_view(v2, owner).unwrap(), Outcome::AlreadyViewed);
        }

        assert_eq!(graph.profile_viewers(owner).unwrap(), vec![v2, v1]);
    }

    #[test]
    fn test_self_view_rejected() {
        let (graph, ids) = graph_with(1);

        let result = graph.record_profile_view(ids[0], ids[0]);
        assert!(matches!(result, Err(GraphError::InvalidOperation(_))));
        assert!(graph.profile_viewers(ids[0]).unwrap().is_empty());
    }

    #[test]
    fn test_view_requires_both_accounts() {
        let (graph, ids) = graph_with(1);
        let ghost = AccountId::from_value(42);

        assert!(matches!(graph.record_profile_view(ghost, ids[0]), Err(GraphError::NotFound(_))));
        assert!(matches!(graph.record_profile_view(ids[0], ghost), Err(GraphError::NotFound(_))));
    }

    #[test]
    fn test_relationship_summary() {
        let (graph, ids) = graph_with(3);
        graph.follow(ids[1], ids[0]).unwrap();
        graph.follow(ids[2], ids[0]).unwrap();
        graph.follow(ids[0], ids[1]).unwrap();
        graph.record_profile_view(ids[2], ids[0]).unwrap();

        let summary = graph.relationship_summary(ids[0]).unwrap();
        assert_eq!(
            summary,
            RelationshipSummary { follower_count: 2, following_count: 1, viewer_count: 1 }
        );
    }

    #[test]
    fn test_follow_completes_one_sided_edge() {
        let (graph, ids) = graph_with(2);
        let (a, b) = (ids[0], ids[1]);

        graph.shared.with_store(|store| {
            let mut alice = store.load_account(a).unwrap().unwrap();
            alice.add_following(b);
            store.save_account(&alice).unwrap();
        });

        assert_eq!(graph.follow(a, b).unwrap(), Outcome::AlreadyFollowing);
        assert_eq!(graph.followers(b).unwrap(), vec![a]);
    }

    #[test]
    fn test_repair_symmetry() {
        let (graph, ids) = graph_with(3);
        let (a, b, c) = (ids[0], ids[1], ids[2]);
        graph.follow(a, c).unwrap();

        // b claims to follow a, and c lists b as a follower; neither has a partner
        graph.shared.with_store(|store| {
            let mut bob = store.load_account(b).unwrap().unwrap();
            bob.add_following(a);
            store.save_account(&bob).unwrap();

            let mut carol = store.load_account(c).unwrap().unwrap();
            carol.add_follower(b);
            store.save_account(&carol).unwrap();
        });

        let report = graph.repair_symmetry().unwrap();
        assert_eq!(report.accounts_scanned, 3);
        assert_eq!(report.edges_repaired, 2);
        assert_eq!(report.dangling_edges, 0);

        assert_eq!(graph.followers(a).unwrap(), vec![b]);
        assert_eq!(graph.following(b).unwrap(), vec![a, c]);

        let again = graph.repair_symmetry().unwrap();
        assert_eq!(again.edges_repaired, 0);
    }

    #[test]
    fn test_repair_reports_dangling_edges() {
        let (graph, ids) = graph_with(1);
        let ghost = AccountId::from_value(500);

        graph.shared.with_store(|store| {
            let mut alice = store.load_account(ids[0]).unwrap().unwrap();
            alice.add_following(ghost);
            store.save_account(&alice).unwrap();
        });

        let report = graph.repair_symmetry().unwrap();
        assert_eq!(report.dangling_edges, 1);
        assert_eq!(report.edges_repaired, 0);
    }

    #[test]
    fn test_metrics_track_outcomes() {
        let (graph, ids) = graph_with(2);
        graph.follow(ids[0], ids[1]).unwrap();
        graph.follow(ids[0], ids[1]).unwrap();
        let _ = graph.follow(ids[0], ids[0]);

        let metrics = graph.shared.metrics().clone();
        assert_eq!(metrics.applied[&Operation::Follow], 1);
        assert_eq!(metrics.noops[&Operation::Follow], 1);
        assert_eq!(metrics.failures[&Operation::Follow], 1);
    }
}
