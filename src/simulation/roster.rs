//! The default cast and the phrase tables they draw from.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::model::{Actor, ActorCommit, ActorRole, CommitAge};

/// Branches an author moves to after their pull request is merged.
pub const FEATURE_POOL: [&str; 5] = [
    "feature/search",
    "feature/notifications",
    "feature/settings",
    "feature/payments",
    "feature/comments",
];

const PROFILE_MESSAGES: [&str; 5] = [
    "Update profile avatar component",
    "Fix profile form validation",
    "Add bio field to profile",
    "Improve profile page responsiveness",
    "Add social links to profile",
];

const DASHBOARD_MESSAGES: [&str; 5] = [
    "Add chart component to dashboard",
    "Implement dashboard filters",
    "Fix layout on small screens",
    "Add stats widgets",
    "Optimize dashboard performance",
];

const GENERIC_MESSAGES: [&str; 5] = [
    "Update dependencies",
    "Fix typo in README",
    "Update documentation",
    "Minor refactoring",
    "Add unit tests",
];

/// Pick a commit message that fits the branch's topic.
pub fn commit_message<R: Rng>(branch: &str, rng: &mut R) -> &'static str {
    let table: &[&'static str] = if branch.contains("profile") {
        &PROFILE_MESSAGES
    } else if branch.contains("dashboard") {
        &DASHBOARD_MESSAGES
    } else {
        &GENERIC_MESSAGES
    };
    table.choose(rng).copied().unwrap_or("Minor refactoring")
}

pub fn next_feature_branch<R: Rng>(rng: &mut R) -> &'static str {
    FEATURE_POOL.choose(rng).copied().unwrap_or(FEATURE_POOL[0])
}

/// Alice and Bob mid-feature, Charlie reviewing from `develop`.
pub fn default_roster() -> Vec<Actor> {
    vec![
        Actor {
            id: 1,
            name: "Alice".into(),
            avatar: "https://images.pexels.com/photos/3586798/pexels-photo-3586798.jpeg".into(),
            role: ActorRole::Author,
            current_branch: "feature/profile".into(),
            commits: vec![ActorCommit {
                id: "3k4l5m6".into(),
                message: "Add user profile page".into(),
                age: CommitAge::Hours(2),
            }],
            pull_requests: vec![],
        },
        Actor {
            id: 2,
            name: "Bob".into(),
            avatar: "https://images.pexels.com/photos/2379005/pexels-photo-2379005.jpeg".into(),
            role: ActorRole::Author,
            current_branch: "feature/dashboard".into(),
            commits: vec![ActorCommit {
                id: "4n5o6p7".into(),
                message: "Create dashboard layout".into(),
                age: CommitAge::Hours(3),
            }],
            pull_requests: vec![],
        },
        Actor {
            id: 3,
            name: "Charlie".into(),
            avatar: "https://images.pexels.com/photos/614810/pexels-photo-614810.jpeg".into(),
            role: ActorRole::Reviewer,
            current_branch: "develop".into(),
            commits: vec![],
            pull_requests: vec![],
        },
    ]
}
