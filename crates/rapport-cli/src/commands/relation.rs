//! Follow, unfollow and profile-view commands.

use crate::cli::{FollowArgs, ViewArgs};
use crate::error::Result;
use crate::output::Formatter;
use crate::Service;

/// Execute the follow command.
pub fn execute_follow(args: FollowArgs, service: &Service, formatter: &Formatter) -> Result<String> {
    let outcome = service.follow(args.actor, args.target)?;
    formatter.format_outcome("Followed", &outcome)
}

/// Execute the unfollow command.
pub fn execute_unfollow(args: FollowArgs, service: &Service, formatter: &Formatter) -> Result<String> {
    let outcome = service.unfollow(args.actor, args.target)?;
    formatter.format_outcome("Unfollowed", &outcome)
}

/// Execute the view command.
pub fn execute_view(args: ViewArgs, service: &Service, formatter: &Formatter) -> Result<String> {
    let outcome = service.record_profile_view(args.viewer, args.owner)?;
    formatter.format_outcome("Profile view recorded", &outcome)
}
