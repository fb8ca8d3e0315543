//! Operation counters for the graph and ledger

use std::collections::BTreeMap;
use std::fmt;

/// Mutating operations tracked by [`GraphMetrics`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Operation {
    /// Follow an account
    Follow,
    /// Remove a follow edge
    Unfollow,
    /// Record a profile view
    ProfileView,
    /// React to a content item
    React,
    /// Read-repair of asymmetric edges
    Repair,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Follow => "follow",
            Operation::Unfollow => "unfollow",
            Operation::ProfileView => "profile_view",
            Operation::React => "react",
            Operation::Repair => "repair",
        };
        f.write_str(name)
    }
}

/// Counters collected while serving operations
///
/// Tracks applied mutations, no-ops ("already" outcomes), failures, storage
/// retries and repaired edges.
#[derive(Debug, Clone, Default)]
pub struct GraphMetrics {
    /// Mutations that changed state, per operation
    pub applied: BTreeMap<Operation, usize>,

    /// Requests whose end state already held, per operation
    pub noops: BTreeMap<Operation, usize>,

    /// Requests that returned an error, per operation
    pub failures: BTreeMap<Operation, usize>,

    /// Store writes that were retried
    pub storage_retries: usize,

    /// One-sided edges healed
    pub edges_repaired: usize,
}

impl GraphMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a mutation that changed state
    pub fn record_applied(&mut self, op: Operation) {
        *self.applied.entry(op).or_insert(0) += 1;
    }

    /// Record a request that found its end state already in place
    pub fn record_noop(&mut self, op: Operation) {
        *self.noops.entry(op).or_insert(0) += 1;
    }

    /// Record a failed request
    pub fn record_failure(&mut self, op: Operation) {
        *self.failures.entry(op).or_insert(0) += 1;
    }

    /// Record a retried store write
    pub fn record_retry(&mut self) {
        self.storage_retries += 1;
    }

    /// Record healed edges
    pub fn record_repairs(&mut self, count: usize) {
        self.edges_repaired += count;
    }

    /// Applied mutations across all operations
    pub fn total_applied(&self) -> usize {
        self.applied.values().sum()
    }

    /// No-ops across all operations
    pub fn total_noops(&self) -> usize {
        self.noops.values().sum()
    }

    /// Failures across all operations
    pub fn total_failures(&self) -> usize {
        self.failures.values().sum()
    }

    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Graph Metrics Summary".to_string(),
            "=====================".to_string(),
            format!("Applied: {}", self.total_applied()),
            format!("No-ops: {}", self.total_noops()),
            format!("Failures: {}", self.total_failures()),
            format!("Storage retries: {}", self.storage_retries),
            format!("Edges repaired: {}", self.edges_repaired),
        ];

        for (title, counts) in [
            ("Applied by operation:", &self.applied),
            ("No-ops by operation:", &self.noops),
            ("Failures by operation:", &self.failures),
        ] {
            if counts.is_empty() {
                continue;
            }
            lines.push(String::new());
            lines.push(title.to_string());
            for (op, count) in counts {
                lines.push(format!("  {}: {}", op, count));
            }
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = GraphMetrics::new();
        assert_eq!(metrics.total_applied(), 0);
        assert_eq!(metrics.total_noops(), 0);
        assert_eq!(metrics.total_failures(), 0);
    }

    #[test]
    fn test_record_and_totals() {
        let mut metrics = GraphMetrics::new();
        metrics.record_applied(Operation::Follow);
        metrics.record_applied(Operation::Follow);
        metrics.record_applied(Operation::React);
        metrics.record_noop(Operation::ProfileView);
        metrics.record_failure(Operation::Follow);
        metrics.record_retry();

        assert_eq!(metrics.applied[&Operation::Follow], 2);
        assert_eq!(metrics.total_applied(), 3);
        assert_eq!(metrics.total_noops(), 1);
        assert_eq!(metrics.total_failures(), 1);
        assert_eq!(metrics.storage_retries, 1);
    }

    #[test]
    fn test_summary() {
        let mut metrics = GraphMetrics::new();
        metrics.record_applied(Operation::Follow);
        metrics.record_noop(Operation::React);
        metrics.record_repairs(2);

        let summary = metrics.summary();
        assert!(summary.contains("Applied: 1"));
        assert!(summary.contains("follow: 1"));
        assert!(summary.contains("react: 1"));
        assert!(summary.contains("Edges repaired: 2"));
        assert!(!summary.contains("Failures by operation:"));
    }
}
