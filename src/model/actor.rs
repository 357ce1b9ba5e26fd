//! Actor types: simulated developers and their work in progress.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A simulated developer.
///
/// Every field is mutated only by the simulation engine that owns the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    pub id: u32,
    pub name: String,

    /// Avatar image reference, for display only.
    pub avatar: String,

    pub role: ActorRole,

    /// The branch the actor is working on. Free text, not tied to the timeline.
    pub current_branch: String,

    /// Commits on the current branch, oldest first. Cleared on reset.
    pub commits: Vec<ActorCommit>,

    pub pull_requests: Vec<PullRequest>,
}

impl Actor {
    pub fn open_pull_request(&self) -> Option<&PullRequest> {
        self.pull_requests
            .iter()
            .find(|pr| pr.status == PullRequestStatus::Open)
    }

    pub fn has_open_pull_request(&self) -> bool {
        self.open_pull_request().is_some()
    }

    /// Whether the actor may author a commit this tick.
    ///
    /// Actors sitting on `develop` never commit directly, and an open
    /// pull request blocks further work until it is resolved.
    pub fn can_author(&self) -> bool {
        self.current_branch != "develop" && !self.has_open_pull_request()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActorRole {
    /// Writes commits and opens pull requests.
    Author,

    /// Reviews and merges other actors' pull requests.
    Reviewer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorCommit {
    pub id: String,
    pub message: String,
    pub age: CommitAge,
}

/// How long ago a simulated commit was made.
///
/// Kept structured and formatted only for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "unit", content = "value", rename_all = "camelCase")]
pub enum CommitAge {
    JustNow,
    Minutes(u32),
    Hours(u32),
}

impl CommitAge {
    /// The age one tick later.
    ///
    /// "Just now" stays as it is. Minutes advance by one every tick and
    /// never roll over. Hours advance only when `bump_hour` is set, which
    /// the engine decides with a small random chance.
    #[must_use]
    pub fn advanced(self, bump_hour: bool) -> Self {
        match self {
            Self::JustNow => Self::JustNow,
            Self::Minutes(m) => Self::Minutes(m.saturating_add(1)),
            Self::Hours(h) if bump_hour => Self::Hours(h.saturating_add(1)),
            Self::Hours(h) => Self::Hours(h),
        }
    }
}

impl fmt::Display for CommitAge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::JustNow => f.write_str("Just now"),
            Self::Minutes(1) => f.write_str("1 minute ago"),
            Self::Minutes(m) => write!(f, "{m} minutes ago"),
            Self::Hours(1) => f.write_str("1 hour ago"),
            Self::Hours(h) => write!(f, "{h} hours ago"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    pub number: u32,
    pub title: String,
    pub status: PullRequestStatus,
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PullRequestStatus {
    Open,
    Merged,
    Closed,
}

impl fmt::Display for PullRequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Open => "open",
            Self::Merged => "merged",
            Self::Closed => "closed",
        })
    }
}
