//! Timeline types: the commits and branches drawn for a tutorial step.

use serde::{Deserialize, Serialize};

/// A point in the scripted graph.
///
/// Not a content-addressed object: `id` is a display token and `position`
/// is the global sequence index shared by every branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Commit {
    pub id: String,
    pub message: String,

    /// Name of the owning branch.
    pub branch: String,

    /// Causal order and vertical coordinate. Unique within a graph.
    pub position: u32,
}

/// The role a branch plays in the workflow. Doubles as its color category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BranchKind {
    Main,
    Develop,
    Feature,
    Release,
    Hotfix,
}

impl BranchKind {
    /// Stroke and fill color used when drawing branches of this kind.
    pub fn color(self) -> &'static str {
        match self {
            Self::Main => "#2563eb",
            Self::Develop => "#7c3aed",
            Self::Feature => "#16a34a",
            Self::Release => "#d97706",
            Self::Hotfix => "#dc2626",
        }
    }
}

/// A named lineage in the scripted graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    /// Unique key and display label.
    pub name: String,

    pub kind: BranchKind,

    /// The branch this one forked from. `None` only for the root.
    pub based_on: Option<String>,

    /// Position of the parent commit the branch line originates at.
    pub start_position: u32,

    /// Position at which the branch was merged. `None` while still open.
    pub end_position: Option<u32>,
}

impl Branch {
    /// Whether the branch has been merged and terminated.
    pub fn is_closed(&self) -> bool {
        self.end_position.is_some()
    }

    /// Whether the branch lane is live at `position`.
    pub fn spans(&self, position: u32) -> bool {
        position >= self.start_position && self.end_position.is_none_or(|end| position <= end)
    }
}

/// A derived snapshot: every commit and branch visible at one step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Graph {
    pub commits: Vec<Commit>,
    pub branches: Vec<Branch>,
}

impl Graph {
    pub fn branch(&self, name: &str) -> Option<&Branch> {
        self.branches.iter().find(|b| b.name == name)
    }

    /// Lane index of a branch: its ordinal among all branches.
    pub fn lane(&self, name: &str) -> Option<usize> {
        self.branches.iter().position(|b| b.name == name)
    }

    pub fn commit_at(&self, position: u32) -> Option<&Commit> {
        self.commits.iter().find(|c| c.position == position)
    }

    /// The highest commit position, or 0 for an empty graph.
    pub fn last_position(&self) -> u32 {
        self.commits.iter().map(|c| c.position).max().unwrap_or(0)
    }

    /// Commits owned by `branch`, in graph order.
    pub fn commits_on<'a>(&'a self, branch: &'a str) -> impl Iterator<Item = &'a Commit> + 'a {
        self.commits.iter().filter(move |c| c.branch == branch)
    }
}
