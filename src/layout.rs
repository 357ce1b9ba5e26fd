//! Layout: place a derived graph on a 2-D canvas.
//!
//! Each branch gets a vertical lane in branch order; each commit sits on
//! its branch's lane at a row given by its position. Layout is a pure
//! function of the graph, so the same graph always lands on the same
//! coordinates.

use serde::Serialize;

use crate::model::{BranchKind, Graph};

pub const ORIGIN_X: i32 = 50;
pub const LANE_WIDTH: i32 = 80;
pub const ORIGIN_Y: i32 = 40;
pub const ROW_HEIGHT: i32 = 60;

/// Baseline of the branch name labels above the lanes.
pub const LABEL_Y: i32 = 20;

/// Room to the right of the last lane for commit labels.
const LABEL_MARGIN: i32 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn lane(lane: usize) -> i32 {
        to_i32(lane).saturating_mul(LANE_WIDTH).saturating_add(ORIGIN_X)
    }

    pub fn row(position: u32) -> i32 {
        to_i32(position).saturating_mul(ROW_HEIGHT).saturating_add(ORIGIN_Y)
    }

    fn at(lane: usize, position: u32) -> Self {
        Self {
            x: Self::lane(lane),
            y: Self::row(position),
        }
    }
}

/// A commit placed on the canvas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitNode {
    pub id: String,
    pub message: String,
    pub branch: String,
    pub kind: BranchKind,
    pub position: u32,
    pub at: Point,
}

/// The drawn lifetime of a branch.
///
/// The line runs from `fork` (on the parent's lane) across to
/// `lane_start`, then down the branch's own lane to `end`. For an open
/// branch `end` is a synthetic point below the last commit, and the stretch
/// after `tip` marks the branch as still active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BranchPath {
    pub name: String,
    pub kind: BranchKind,
    pub lane: usize,
    pub fork: Point,
    pub lane_start: Point,
    pub tip: Point,
    pub end: Point,
    pub closed: bool,
    pub label: Point,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Layout {
    pub width: i32,
    pub height: i32,
    pub paths: Vec<BranchPath>,
    pub nodes: Vec<CommitNode>,
}

/// Compute canvas coordinates for every commit and branch in `graph`.
///
/// Dangling references degrade instead of failing: a commit on an unknown
/// branch is left out, a branch whose start commit is missing is left out,
/// and a branch whose parent is unknown forks from lane 0.
pub fn layout(graph: &Graph) -> Layout {
    let last = graph.last_position();
    let open_end_y = Point::row(last).saturating_add(ROW_HEIGHT);

    let paths = graph
        .branches
        .iter()
        .enumerate()
        .filter_map(|(lane, branch)| {
            let start = graph.commit_at(branch.start_position)?;
            let parent_lane = branch
                .based_on
                .as_deref()
                .and_then(|parent| graph.lane(parent))
                .unwrap_or(0);

            let fork = Point::at(parent_lane, start.position);
            let x = Point::lane(lane);
            let lane_start = Point { x, y: fork.y };

            let tip = graph
                .commits_on(&branch.name)
                .map(|c| c.position)
                .max()
                .map_or(lane_start, |p| Point::at(lane, p));

            let closed_end = branch
                .end_position
                .and_then(|p| graph.commit_at(p))
                .map(|c| Point::at(lane, c.position));

            Some(BranchPath {
                name: branch.name.clone(),
                kind: branch.kind,
                lane,
                fork,
                lane_start,
                tip,
                end: closed_end.unwrap_or(Point { x, y: open_end_y }),
                closed: closed_end.is_some(),
                label: Point { x, y: LABEL_Y },
            })
        })
        .collect();

    let nodes = graph
        .commits
        .iter()
        .filter_map(|commit| {
            let lane = graph.lane(&commit.branch)?;
            Some(CommitNode {
                id: commit.id.clone(),
                message: commit.message.clone(),
                branch: commit.branch.clone(),
                kind: graph.branches[lane].kind,
                position: commit.position,
                at: Point::at(lane, commit.position),
            })
        })
        .collect();

    Layout {
        width: Point::lane(graph.branches.len()).saturating_add(LABEL_MARGIN),
        height: to_i32(last).saturating_mul(ROW_HEIGHT).saturating_add(100),
        paths,
        nodes,
    }
}

fn to_i32<T: TryInto<i32>>(n: T) -> i32 {
    n.try_into().unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::model::{Branch, Commit};
    use crate::timeline::{Step, derive};

    fn path<'a>(layout: &'a Layout, name: &str) -> &'a BranchPath {
        layout.paths.iter().find(|p| p.name == name).unwrap()
    }

    #[test]
    fn places_commits_on_branch_lanes() {
        let layout = layout(&derive(Step::Feature));
        let login = layout.nodes.iter().find(|n| n.id == "4j5k6l7").unwrap();
        assert_eq!(login.at, Point { x: 50 + 2 * 80, y: 40 + 3 * 60 });
        assert_eq!(login.kind, BranchKind::Feature);
    }

    #[test]
    fn fork_starts_on_parent_lane() {
        let layout = layout(&derive(Step::Feature));
        let login = path(&layout, "feature/login");
        assert_eq!(login.fork, Point { x: 130, y: 100 });
        assert_eq!(login.lane_start, Point { x: 210, y: 100 });
    }

    #[test]
    fn closed_branch_ends_at_its_end_commit() {
        let layout = layout(&derive(Step::Release));
        let login = path(&layout, "feature/login");
        assert!(login.closed);
        assert_eq!(login.end, Point { x: 210, y: 40 + 3 * 60 });
    }

    #[test]
    fn open_branch_extends_below_last_commit() {
        let graph = derive(Step::Feature);
        let layout = layout(&graph);
        let login = path(&layout, "feature/login");
        assert!(!login.closed);
        assert_eq!(login.tip.y, 40 + 3 * 60);
        assert_eq!(login.end.y, 40 + 3 * 60 + 60);
        assert_eq!(layout.height, 3 * 60 + 100);
        assert_eq!(layout.width, 50 + 3 * 80 + 300);
    }

    #[test]
    fn layout_is_deterministic() {
        for step in Step::ALL {
            let graph = derive(step);
            let a = serde_json::to_vec(&layout(&graph)).unwrap();
            let b = serde_json::to_vec(&layout(&graph)).unwrap();
            assert_eq!(a, b, "{step:?}");
        }
    }

    #[test]
    fn unknown_parent_falls_back_to_lane_zero() {
        let mut graph = derive(Step::Feature);
        graph.branches[2].based_on = Some("nowhere".into());

        let layout = layout(&graph);
        assert_eq!(path(&layout, "feature/login").fork.x, ORIGIN_X);
    }

    #[test]
    fn dangling_references_are_skipped() {
        let mut graph = derive(Step::MainAndDevelop);
        graph.commits.push(Commit {
            id: "deadbee".into(),
            message: "Orphan".into(),
            branch: "ghost".into(),
            position: 2,
        });
        graph.branches.push(Branch {
            name: "floating".into(),
            kind: BranchKind::Feature,
            based_on: Some("develop".into()),
            start_position: 99,
            end_position: None,
        });

        let layout = layout(&graph);
        assert!(layout.nodes.iter().all(|n| n.id != "deadbee"));
        assert!(layout.paths.iter().all(|p| p.name != "floating"));
        assert_eq!(layout.nodes.len(), 2);
    }

    #[test]
    fn huge_positions_saturate() {
        let mut graph = derive(Step::MainAndDevelop);
        graph.commits[1].position = u32::MAX;

        let layout = layout(&graph);
        let develop = path(&layout, "develop");
        assert_eq!(develop.tip.y, i32::MAX);
        assert_eq!(develop.end.y, i32::MAX);
        assert_eq!(layout.height, i32::MAX);
    }

    #[test]
    fn empty_graph_lays_out_empty() {
        let layout = layout(&Graph::default());
        assert!(layout.nodes.is_empty());
        assert!(layout.paths.is_empty());
        assert_eq!(layout.height, 100);
    }
}
