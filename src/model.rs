//! Core data model for flowtutor.
//!
//! Two independent families of types live here: the scripted timeline
//! (commits and branches derived from a tutorial step) and the simulated
//! developer roster (actors with their commits and pull requests).

mod actor;
mod theme;
mod timeline;

pub use actor::{Actor, ActorCommit, ActorRole, CommitAge, PullRequest, PullRequestStatus};
pub use theme::Theme;
pub use timeline::{Branch, BranchKind, Commit, Graph};
