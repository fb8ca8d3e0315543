//! Account command implementation.

use crate::cli::{AccountAction, AccountArgs};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::Service;
use rapport_domain::{Account, AccountId};

/// Execute the account command.
pub fn execute_account(args: AccountArgs, service: &Service, formatter: &Formatter) -> Result<String> {
    match args.action {
        AccountAction::Add { handle } => {
            let account = add_account(service, &handle)?;
            formatter.format_account_created(&account)
        }
        AccountAction::Show { id } => {
            let account = service.account(id)?;
            let summary = service.relationship_summary(id)?;
            formatter.format_account(&account, &summary)
        }
    }
}

/// Register a new account under a fresh id.
pub fn add_account(service: &Service, handle: &str) -> Result<Account> {
    let handle = handle.trim();
    if handle.is_empty() {
        return Err(CliError::InvalidInput("Handle must not be empty".to_string()));
    }

    let account = Account::new(AccountId::new(), handle);
    service.with_store(|store| store.insert_account(&account))?;
    tracing::info!(account = %account.id, handle = %account.handle, "Account registered");
    Ok(account)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use crate::test_support::service;

    #[test]
    fn test_add_and_show() {
        let service = service();
        let account = add_account(&service, "  alice ").unwrap();
        assert_eq!(account.handle, "alice");

        let formatter = Formatter::new(OutputFormat::Table, false);
        let args = AccountArgs { action: AccountAction::Show { id: account.id } };
        let output = execute_account(args, &service, &formatter).unwrap();
        assert!(output.contains("alice"));
    }

    #[test]
    fn test_empty_handle_rejected() {
        let result = add_account(&service(), "   ");
        assert!(matches!(result, Err(CliError::InvalidInput(_))));
    }

    #[test]
    fn test_show_unknown_account() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let args = AccountArgs { action: AccountAction::Show { id: AccountId::new() } };
        let result = execute_account(args, &service(), &formatter);
        assert!(matches!(result, Err(CliError::Graph(rapport_graph::GraphError::NotFound(_)))));
    }
}
