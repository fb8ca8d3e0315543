//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use rapport_domain::metrics::format_percentage;
use rapport_domain::{Account, AccountId, ContentItem, Outcome};
use rapport_graph::{EngagementSummary, RelationshipSummary, RepairReport};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format the outcome of a follow, unfollow, view or react command.
    pub fn format_outcome(&self, action: &str, outcome: &Outcome) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
                "action": action,
                "outcome": outcome.tag(),
            }))?),
            OutputFormat::Quiet => Ok(outcome.tag().to_string()),
            OutputFormat::Table => Ok(match outcome {
                Outcome::Success(()) => self.success(action),
                Outcome::AlreadyFollowing => self.info("Already following"),
                Outcome::AlreadyViewed => self.info("Profile view already recorded"),
                Outcome::AlreadyReacted => self.info("Reaction already recorded"),
                Outcome::NotFollowing => self.warning("Not following"),
            }),
        }
    }

    /// Format a newly registered account.
    pub fn format_account_created(&self, account: &Account) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
                "id": account.id.to_string(),
                "handle": account.handle,
            }))?),
            OutputFormat::Quiet => Ok(account.id.to_string()),
            OutputFormat::Table => Ok(self.success(&format!(
                "Account '{}' created: {}",
                account.handle, account.id
            ))),
        }
    }

    /// Format a newly published post.
    pub fn format_post_created(&self, post: &ContentItem) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
                "id": post.id.to_string(),
                "author_id": post.author_id.to_string(),
                "title": post.title,
                "created_at": post.created_at,
            }))?),
            OutputFormat::Quiet => Ok(post.id.to_string()),
            OutputFormat::Table => Ok(self.success(&format!("Post published: {}", post.id))),
        }
    }

    /// Format an account with its relationship lists.
    pub fn format_account(
        &self,
        account: &Account,
        summary: &RelationshipSummary,
    ) -> Result<String> {
        let followers = sorted(account.followers().iter().copied());
        let following = sorted(account.following().iter().copied());
        let viewers: Vec<String> = account.viewers().as_slice().iter().map(|id| id.to_string()).collect();

        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
                "id": account.id.to_string(),
                "handle": account.handle,
                "follower_count": summary.follower_count,
                "following_count": summary.following_count,
                "viewer_count": summary.viewer_count,
                "followers": followers,
                "following": following,
                "profile_viewers": viewers,
            }))?),
            OutputFormat::Quiet => Ok(account.id.to_string()),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Field", "Value"]);
                builder.push_record(["ID".to_string(), account.id.to_string()]);
                builder.push_record(["Handle".to_string(), account.handle.clone()]);
                builder.push_record(["Followers".to_string(), summary.follower_count.to_string()]);
                builder.push_record(["Following".to_string(), summary.following_count.to_string()]);
                builder.push_record(["Profile views".to_string(), summary.viewer_count.to_string()]);

                let mut out = self.table(builder);
                for (label, ids) in [
                    ("Followers", &followers),
                    ("Following", &following),
                    ("Profile viewers", &viewers),
                ] {
                    if !ids.is_empty() {
                        out.push_str(&format!("\n{}:\n  {}", label, ids.join("\n  ")));
                    }
                }
                Ok(out)
            }
        }
    }

    /// Format engagement statistics for a post.
    pub fn format_engagement(&self, post: &ContentItem, summary: &EngagementSummary) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
                "id": post.id.to_string(),
                "title": post.title,
                "view_count": summary.counts.view_count,
                "like_count": summary.counts.like_count,
                "dislike_count": summary.counts.dislike_count,
                "like_percentage": summary.like_percentage,
                "dislike_percentage": summary.dislike_percentage,
                "recency": summary.recency.to_string(),
            }))?),
            OutputFormat::Quiet => Ok(format!(
                "{} {} {}",
                summary.counts.view_count, summary.counts.like_count, summary.counts.dislike_count
            )),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Post", "Views", "Likes", "Dislikes", "Liked", "Disliked", "Posted"]);
                builder.push_record([
                    post.title.clone(),
                    summary.counts.view_count.to_string(),
                    summary.counts.like_count.to_string(),
                    summary.counts.dislike_count.to_string(),
                    format_percentage(summary.like_percentage),
                    format_percentage(summary.dislike_percentage),
                    summary.recency.to_string(),
                ]);
                Ok(self.table(builder))
            }
        }
    }

    /// Format the result of a symmetry repair pass.
    pub fn format_repair(&self, report: &RepairReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
                "accounts_scanned": report.accounts_scanned,
                "edges_repaired": report.edges_repaired,
                "dangling_edges": report.dangling_edges,
            }))?),
            OutputFormat::Quiet => Ok(report.edges_repaired.to_string()),
            OutputFormat::Table => {
                let mut out = self.success(&format!(
                    "Scanned {} account(s), repaired {} edge(s)",
                    report.accounts_scanned, report.edges_repaired
                ));
                if report.dangling_edges > 0 {
                    out.push('\n');
                    out.push_str(&self.warning(&format!(
                        "{} edge(s) point at missing accounts",
                        report.dangling_edges
                    )));
                }
                Ok(out)
            }
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn table(&self, builder: Builder) -> String {
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

fn sorted(ids: impl Iterator<Item = AccountId>) -> Vec<String> {
    let mut ids: Vec<AccountId> = ids.collect();
    ids.sort();
    ids.into_iter().map(|id| id.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rapport_domain::{ContentId, EngagementCounts, RecencyLabel};

    fn create_test_post() -> ContentItem {
        ContentItem::new(ContentId::from_value(7), AccountId::from_value(1), "hello", 0)
    }

    fn create_test_summary() -> EngagementSummary {
        EngagementSummary {
            counts: EngagementCounts { view_count: 4, like_count: 1, dislike_count: 2 },
            like_percentage: Some(100.0 / 3.0),
            dislike_percentage: Some(200.0 / 3.0),
            recency: RecencyLabel::Yesterday,
        }
    }

    #[test]
    fn test_outcome_formats() {
        let table = Formatter::new(OutputFormat::Table, false);
        assert_eq!(table.format_outcome("Followed", &Outcome::Success(())).unwrap(), "✓ Followed");
        assert_eq!(
            table.format_outcome("Followed", &Outcome::AlreadyFollowing).unwrap(),
            "ℹ Already following"
        );

        let quiet = Formatter::new(OutputFormat::Quiet, false);
        assert_eq!(quiet.format_outcome("Viewed", &Outcome::AlreadyViewed).unwrap(), "already_viewed");

        let json = Formatter::new(OutputFormat::Json, false);
        let output = json.format_outcome("Unfollowed", &Outcome::NotFollowing).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["outcome"], "not_following");
    }

    #[test]
    fn test_engagement_table() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter
            .format_engagement(&create_test_post(), &create_test_summary())
            .unwrap();
        assert!(output.contains("Dislikes"));
        assert!(output.contains("33.3%"));
        assert!(output.contains("Yesterday"));
    }

    #[test]
    fn test_engagement_json_undefined_percentages() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let summary = EngagementSummary {
            counts: EngagementCounts::default(),
            like_percentage: None,
            dislike_percentage: None,
            recency: RecencyLabel::Today,
        };
        let output = formatter.format_engagement(&create_test_post(), &summary).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert!(value["like_percentage"].is_null());
        assert_eq!(value["view_count"], 0);
    }

    #[test]
    fn test_account_table_lists_followers() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let mut account = Account::new(AccountId::from_value(1), "alice");
        account.add_follower(AccountId::from_value(2));
        let summary = RelationshipSummary { follower_count: 1, following_count: 0, viewer_count: 0 };

        let output = formatter.format_account(&account, &summary).unwrap();
        assert!(output.contains("alice"));
        assert!(output.contains("Followers:"));
        assert!(output.contains(&AccountId::from_value(2).to_string()));
    }

    #[test]
    fn test_repair_warns_on_dangling() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let report = RepairReport { accounts_scanned: 3, edges_repaired: 1, dangling_edges: 2 };
        let output = formatter.format_repair(&report).unwrap();
        assert!(output.contains("repaired 1 edge(s)"));
        assert!(output.contains("2 edge(s) point at missing accounts"));
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.error("boom"), "✗ boom");
    }
}
