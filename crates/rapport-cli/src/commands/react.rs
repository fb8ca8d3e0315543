//! React command implementation.

use crate::cli::ReactArgs;
use crate::error::Result;
use crate::output::Formatter;
use crate::Service;
use rapport_domain::ReactionKind;

/// Execute the react command.
pub fn execute_react(args: ReactArgs, service: &Service, formatter: &Formatter) -> Result<String> {
    let kind = ReactionKind::from(args.kind);
    let outcome = service.react(args.actor, args.content, kind)?;
    formatter.format_outcome(&format!("Reaction '{}' recorded", kind), &outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ReactionArg;
    use crate::commands::{account::add_account, post::add_post};
    use crate::config::OutputFormat;
    use crate::test_support::service;

    #[test]
    fn test_react_twice() {
        let service = service();
        let alice = add_account(&service, "alice").unwrap().id;
        let bob = add_account(&service, "bob").unwrap().id;
        let post = add_post(&service, alice, "hello", 0).unwrap().id;
        let formatter = Formatter::new(OutputFormat::Table, false);

        let react = || {
            execute_react(
                ReactArgs { actor: bob, content: post, kind: ReactionArg::Like },
                &service,
                &formatter,
            )
        };
        assert_eq!(react().unwrap(), "✓ Reaction 'like' recorded");
        assert_eq!(react().unwrap(), "ℹ Reaction already recorded");
    }
}
