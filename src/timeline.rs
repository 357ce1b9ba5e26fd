//! Timeline derivation: the scripted graph shown at each tutorial step.
//!
//! The graph is recomputed from scratch for every step. Later steps only
//! add commits and branches, or close a branch that an earlier step left
//! open, so stepping backward simply yields a smaller snapshot.

pub mod pull;
pub mod transcript;

use crate::model::{Branch, BranchKind, Commit, Graph};

/// A stage of the tutorial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Step {
    Introduction,
    MainAndDevelop,
    Feature,
    Release,
    Hotfix,
    Collaboration,
    Practice,
}

impl Step {
    pub const ALL: [Step; 7] = [
        Self::Introduction,
        Self::MainAndDevelop,
        Self::Feature,
        Self::Release,
        Self::Hotfix,
        Self::Collaboration,
        Self::Practice,
    ];

    /// Map any integer onto a step.
    ///
    /// Negative indices clamp to the first step; indices past the end clamp
    /// to the last, which carries the maximal graph.
    pub fn clamp(index: i64) -> Self {
        let last = Self::ALL.len() - 1;
        let index = usize::try_from(index.max(0)).unwrap_or(last).min(last);
        Self::ALL[index]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn slug(self) -> &'static str {
        match self {
            Self::Introduction => "intro",
            Self::MainAndDevelop => "main-develop",
            Self::Feature => "feature",
            Self::Release => "release",
            Self::Hotfix => "hotfix",
            Self::Collaboration => "collaboration",
            Self::Practice => "practice",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Introduction => "Introduction to Git Flow",
            Self::MainAndDevelop => "Main and Develop Branches",
            Self::Feature => "Feature Branches",
            Self::Release => "Release Branches",
            Self::Hotfix => "Hotfix Branches",
            Self::Collaboration => "Collaborative Workflow",
            Self::Practice => "Practice Scenarios",
        }
    }
}

/// Clamp an arbitrary index and derive its graph.
pub fn derive_index(index: i64) -> Graph {
    derive(Step::clamp(index))
}

/// Derive the commit and branch graph visible at `step`.
pub fn derive(step: Step) -> Graph {
    let mut g = Script::default();

    g.branch("main", BranchKind::Main, None, 0);
    g.commit("1a2b3c4", "Initial commit", "main", 0);

    if step >= Step::MainAndDevelop {
        g.branch("develop", BranchKind::Develop, Some("main"), 0);
        g.commit("2d3e4f5", "Setup development environment", "develop", 1);
    }

    if step >= Step::Feature {
        g.branch("feature/login", BranchKind::Feature, Some("develop"), 1);
        g.commit("3g4h5i6", "Add login form", "feature/login", 2);
        g.commit("4j5k6l7", "Implement authentication", "feature/login", 3);

        if step >= Step::Release {
            g.commit("5m6n7o8", "Merge feature/login into develop", "develop", 4);
            g.close("feature/login", 3);
        }
    }

    if step >= Step::Release {
        g.branch("release/1.0", BranchKind::Release, Some("develop"), 4);
        g.commit("6p7q8r9", "Version bump to 1.0", "release/1.0", 5);
        g.commit("7s8t9u0", "Fix release bugs", "release/1.0", 6);

        if step >= Step::Hotfix {
            g.commit("8v9w0x1", "Merge release/1.0 into main", "main", 7);
            g.commit("9y0z1a2", "Merge release/1.0 back into develop", "develop", 8);
            g.close("release/1.0", 6);
        }
    }

    if step >= Step::Hotfix {
        g.branch("hotfix/1.0.1", BranchKind::Hotfix, Some("main"), 7);
        g.commit("0b1c2d3", "Fix critical security issue", "hotfix/1.0.1", 9);

        if step >= Step::Collaboration {
            g.commit("1e2f3g4", "Merge hotfix/1.0.1 into main", "main", 10);
            g.commit("2h3i4j5", "Merge hotfix/1.0.1 back into develop", "develop", 11);
            g.close("hotfix/1.0.1", 9);
        }
    }

    if step >= Step::Collaboration {
        g.branch("feature/profile", BranchKind::Feature, Some("develop"), 11);
        g.branch("feature/dashboard", BranchKind::Feature, Some("develop"), 11);
        g.commit("3k4l5m6", "Add user profile page", "feature/profile", 12);
        g.commit("4n5o6p7", "Create dashboard layout", "feature/dashboard", 13);
        g.commit("5q6r7s8", "Implement profile settings", "feature/profile", 14);
        g.commit("6t7u8v9", "Add dashboard widgets", "feature/dashboard", 15);

        if step >= Step::Practice {
            g.commit("7w8x9y0", "Merge feature/profile into develop", "develop", 16);
            g.commit("8z9a0b1", "Merge feature/dashboard into develop", "develop", 17);
            g.close("feature/profile", 14);
            g.close("feature/dashboard", 15);

            g.branch("release/2.0", BranchKind::Release, Some("develop"), 17);
            g.commit("9c0d1e2", "Version bump to 2.0", "release/2.0", 18);
        }
    }

    g.graph
}

/// Accumulates the scripted graph in insertion order.
#[derive(Default)]
struct Script {
    graph: Graph,
}

impl Script {
    fn branch(&mut self, name: &str, kind: BranchKind, based_on: Option<&str>, start: u32) {
        self.graph.branches.push(Branch {
            name: name.to_string(),
            kind,
            based_on: based_on.map(String::from),
            start_position: start,
            end_position: None,
        });
    }

    fn commit(&mut self, id: &str, message: &str, branch: &str, position: u32) {
        self.graph.commits.push(Commit {
            id: id.to_string(),
            message: message.to_string(),
            branch: branch.to_string(),
            position,
        });
    }

    fn close(&mut self, name: &str, end: u32) {
        if let Some(branch) = self.graph.branches.iter_mut().find(|b| b.name == name) {
            branch.end_position = Some(end);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashSet;

    fn names(graph: &Graph) -> HashSet<&str> {
        graph.branches.iter().map(|b| b.name.as_str()).collect()
    }

    #[test]
    fn clamps_out_of_range_indices() {
        assert_eq!(Step::clamp(-5), Step::Introduction);
        assert_eq!(Step::clamp(0), Step::Introduction);
        assert_eq!(Step::clamp(3), Step::Release);
        assert_eq!(Step::clamp(6), Step::Practice);
        assert_eq!(Step::clamp(7), Step::Practice);
        assert_eq!(Step::clamp(i64::MAX), Step::Practice);
        assert_eq!(Step::clamp(i64::MIN), Step::Introduction);
    }

    #[test]
    fn indices_beyond_the_last_step_yield_the_maximal_graph() {
        assert_eq!(derive_index(42), derive(Step::Practice));
        assert_eq!(derive_index(-1), derive(Step::Introduction));
    }

    #[test]
    fn step_indices_match_order() {
        for (i, step) in Step::ALL.iter().enumerate() {
            assert_eq!(step.index(), i);
        }
    }

    #[test]
    fn step_zero_is_a_single_root_commit() {
        let g = derive(Step::Introduction);
        assert_eq!(g.commits.len(), 1);
        assert_eq!(g.commits[0].position, 0);
        assert_eq!(g.commits[0].branch, "main");
        assert_eq!(g.branches.len(), 1);
        assert!(g.branches[0].based_on.is_none());
        assert_eq!(g.branches[0].start_position, 0);
    }

    #[test]
    fn step_one_adds_develop_with_one_commit() {
        let before = derive(Step::Introduction);
        let g = derive(Step::MainAndDevelop);

        assert_eq!(g.commits[0], before.commits[0]);
        assert_eq!(g.branches.len(), 2);
        assert_eq!(g.commits.len(), 2);

        let develop = &g.branches[1];
        assert_eq!(develop.based_on.as_deref(), Some("main"));
        assert_eq!(develop.start_position, 0);

        let commit = &g.commits[1];
        assert_eq!(commit.branch, develop.name);
        assert_eq!(commit.position, 1);
    }

    #[test]
    fn accumulates_monotonically() {
        for pair in Step::ALL.windows(2) {
            let (earlier, later) = (derive(pair[0]), derive(pair[1]));

            assert!(
                names(&earlier).is_subset(&names(&later)),
                "{:?} dropped a branch",
                pair[1]
            );
            for commit in &earlier.commits {
                assert!(
                    later.commits.contains(commit),
                    "{:?} dropped or moved commit {}",
                    pair[1],
                    commit.id
                );
            }
            for branch in &earlier.branches {
                let next = later.branch(&branch.name).unwrap();
                assert_eq!(next.start_position, branch.start_position);
                if let Some(end) = branch.end_position {
                    assert_eq!(next.end_position, Some(end));
                }
            }
        }
    }

    #[test]
    fn positions_are_unique() {
        for step in Step::ALL {
            let g = derive(step);
            let positions: HashSet<u32> = g.commits.iter().map(|c| c.position).collect();
            assert_eq!(positions.len(), g.commits.len(), "{step:?}");
        }
    }

    #[test]
    fn references_resolve() {
        for step in Step::ALL {
            let g = derive(step);
            for commit in &g.commits {
                assert!(g.branch(&commit.branch).is_some(), "{step:?}: {}", commit.id);
            }

            let roots: Vec<&Branch> = g.branches.iter().filter(|b| b.based_on.is_none()).collect();
            assert_eq!(roots.len(), 1, "{step:?}");
            assert_eq!(roots[0].start_position, 0);

            for branch in &g.branches {
                if let Some(parent) = &branch.based_on {
                    assert!(g.branch(parent).is_some(), "{step:?}: {}", branch.name);
                    let fork = g.commit_at(branch.start_position).unwrap();
                    assert_eq!(&fork.branch, parent, "{step:?}: {}", branch.name);
                }
                if let Some(end) = branch.end_position {
                    assert!(end >= branch.start_position);
                }
            }
        }
    }

    #[test]
    fn merge_closes_feature_at_its_last_commit() {
        let open = derive(Step::Feature);
        assert!(open.branch("feature/login").unwrap().end_position.is_none());

        let merged = derive(Step::Release);
        let merge = merged
            .commits
            .iter()
            .find(|c| c.message == "Merge feature/login into develop")
            .unwrap();
        assert_eq!(merge.branch, "develop");

        let last_own = merged
            .commits_on("feature/login")
            .filter(|c| c.position < merge.position)
            .map(|c| c.position)
            .max()
            .unwrap();
        assert_eq!(
            merged.branch("feature/login").unwrap().end_position,
            Some(last_own)
        );
    }

    #[test]
    fn every_merge_commit_closes_its_source() {
        let g = derive(Step::Practice);
        for merge in g.commits.iter().filter(|c| c.message.starts_with("Merge ")) {
            let source = merge.message.split_whitespace().nth(1).unwrap();
            let branch = g.branch(source).unwrap();
            let last_own = g
                .commits_on(source)
                .filter(|c| c.position < merge.position)
                .map(|c| c.position)
                .max()
                .unwrap();
            assert_eq!(branch.end_position, Some(last_own), "{source}");
        }
    }

    #[test]
    fn final_step_leaves_only_long_lived_branches_and_release_open() {
        let g = derive(Step::Practice);
        let open: Vec<&str> = g
            .branches
            .iter()
            .filter(|b| !b.is_closed())
            .map(|b| b.name.as_str())
            .collect();
        assert_eq!(open, ["main", "develop", "release/2.0"]);
        assert_eq!(g.last_position(), 18);
    }
}
