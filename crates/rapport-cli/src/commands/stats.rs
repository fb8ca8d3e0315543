//! Stats command implementation.

use crate::cli::StatsArgs;
use crate::error::Result;
use crate::output::Formatter;
use crate::Service;
use rapport_graph::now_millis;

/// Execute the stats command.
pub fn execute_stats(args: StatsArgs, service: &Service, formatter: &Formatter) -> Result<String> {
    let post = service.content(args.content)?;
    let summary = service.engagement(args.content, now_millis())?;
    formatter.format_engagement(&post, &summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{account::add_account, post::add_post};
    use crate::config::OutputFormat;
    use crate::test_support::service;
    use rapport_domain::ReactionKind;

    #[test]
    fn test_stats_json() {
        let service = service();
        let author = add_account(&service, "author").unwrap().id;
        let fan = add_account(&service, "fan").unwrap().id;
        let critic = add_account(&service, "critic").unwrap().id;
        let post = add_post(&service, author, "hello", now_millis()).unwrap().id;
        service.react(fan, post, ReactionKind::Like).unwrap();
        service.react(critic, post, ReactionKind::Dislike).unwrap();

        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = execute_stats(StatsArgs { content: post }, &service, &formatter).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["like_count"], 1);
        assert_eq!(value["dislike_count"], 1);
        assert_eq!(value["like_percentage"], 50.0);
        assert_eq!(value["dislike_percentage"], 50.0);
        assert_eq!(value["recency"], "Today");
    }
}
