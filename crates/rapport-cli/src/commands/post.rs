//! Post command implementation.

use crate::cli::{PostAction, PostArgs};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::Service;
use rapport_domain::{AccountId, ContentId, ContentItem};
use rapport_graph::now_millis;

/// Execute the post command.
pub fn execute_post(args: PostArgs, service: &Service, formatter: &Formatter) -> Result<String> {
    match args.action {
        PostAction::Add { author, title } => {
            let post = add_post(service, author, &title, now_millis())?;
            formatter.format_post_created(&post)
        }
    }
}

/// Publish a post by `author` created at `created_at` (ms since Unix epoch).
pub fn add_post(service: &Service, author: AccountId, title: &str, created_at: u64) -> Result<ContentItem> {
    let title = title.trim();
    if title.is_empty() {
        return Err(CliError::InvalidInput("Title must not be empty".to_string()));
    }

    let post = ContentItem::new(ContentId::new(), author, title, created_at);
    service.with_store(|store| store.insert_content(&post))?;
    tracing::info!(content = %post.id, author = %author, "Post published");
    Ok(post)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::account::add_account;
    use crate::test_support::service;
    use rapport_store::StoreError;

    #[test]
    fn test_add_post() {
        let service = service();
        let author = add_account(&service, "alice").unwrap();
        let post = add_post(&service, author.id, "hello world", 42).unwrap();

        let stored = service.content(post.id).unwrap();
        assert_eq!(stored.title, "hello world");
        assert_eq!(stored.created_at, 42);
    }

    #[test]
    fn test_post_requires_author() {
        let result = add_post(&service(), AccountId::new(), "orphan", 0);
        assert!(matches!(result, Err(CliError::Store(StoreError::NotFound(_)))));
    }

    #[test]
    fn test_empty_title_rejected() {
        let service = service();
        let author = add_account(&service, "alice").unwrap();
        assert!(matches!(add_post(&service, author.id, "", 0), Err(CliError::InvalidInput(_))));
    }
}
