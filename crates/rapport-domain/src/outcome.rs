//! Outcome of an idempotent mutation

/// What a mutating operation did
///
/// The `Already*` variants are not failures: the requested end state already
/// held, so nothing was written. Hard failures travel in the error side of the
/// surrounding `Result`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T = ()> {
    /// The mutation was applied and persisted
    Success(T),

    /// The actor already follows the target
    AlreadyFollowing,

    /// The viewer is already in the profile's viewer log
    AlreadyViewed,

    /// The actor already holds this reaction on the content item
    AlreadyReacted,

    /// Unfollow requested but no edge exists
    NotFollowing,
}

impl<T> Outcome<T> {
    /// True if the operation changed state
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    /// True if the desired state already held
    pub fn is_noop(&self) -> bool {
        !self.is_success()
    }

    /// The payload of a successful mutation
    pub fn success(self) -> Option<T> {
        match self {
            Outcome::Success(value) => Some(value),
            _ => None,
        }
    }

    /// Short machine-readable tag
    pub fn tag(&self) -> &'static str {
        match self {
            Outcome::Success(_) => "success",
            Outcome::AlreadyFollowing => "already_following",
            Outcome::AlreadyViewed => "already_viewed",
            Outcome::AlreadyReacted => "already_reacted",
            Outcome::NotFollowing => "not_following",
        }
    }
}
