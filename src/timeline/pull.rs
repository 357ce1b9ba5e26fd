//! The merge-versus-rebase comparison: the same feature work brought up to
//! date with `main` either by a merge commit or by replaying it on top.
//!
//! Positions here are rows, not a global sequence: the merge variant draws
//! `main` and `feature` side by side on shared rows.

use serde::Serialize;

use super::Script;
use crate::model::{BranchKind, Graph};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PullStrategy {
    /// `git pull`: a merge commit joins the two histories.
    Merge,
    /// `git pull --rebase`: local commits are replayed after the remote ones.
    Rebase,
}

impl PullStrategy {
    pub fn title(self) -> &'static str {
        match self {
            Self::Merge => "Git Pull (Merge)",
            Self::Rebase => "Git Pull --rebase",
        }
    }

    pub fn summary(self) -> &'static str {
        match self {
            Self::Merge => {
                "With regular `git pull`, a merge commit is created to combine the remote \
                 changes with your local changes."
            }
            Self::Rebase => {
                "With `git pull --rebase`, your local commits are replayed on top of the \
                 remote changes, creating a linear history without merge commits."
            }
        }
    }
}

/// Derive the comparison graph for `strategy`.
pub fn derive(strategy: PullStrategy) -> Graph {
    let mut g = Script::default();

    g.branch("main", BranchKind::Main, None, 0);
    g.commit("a1b2c3d", "Initial commit", "main", 0);
    g.commit("e4f5g6h", "Update docs", "main", 1);
    g.commit("i7j8k9l", "Fix bug", "main", 2);

    match strategy {
        PullStrategy::Merge => {
            g.branch("feature", BranchKind::Feature, Some("main"), 0);
            g.commit("m1n2o3p", "Start feature", "feature", 1);
            g.commit("q4r5s6t", "Add functionality", "feature", 2);
            g.commit("u7v8w9x", "Merge main into feature", "feature", 3);
        }
        PullStrategy::Rebase => {
            g.branch("feature", BranchKind::Feature, Some("main"), 2);
            g.commit("m1n2o3p", "Start feature", "feature", 3);
            g.commit("q4r5s6t", "Add functionality", "feature", 4);
        }
    }

    g.graph
}
