//! Actor simulation: simulated developers committing, opening pull
//! requests, and getting them merged.
//!
//! The engine is a plain state machine advanced one tick at a time. All
//! randomness flows through the injected [`Rng`], so a seeded generator
//! replays a run exactly. Wall-clock scheduling lives in [`scheduler`].

pub mod roster;
pub mod scheduler;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::model::{Actor, ActorCommit, ActorRole, CommitAge, PullRequest, PullRequestStatus};

/// Commits an actor needs on its branch before it may open a pull request.
pub const PULL_REQUEST_THRESHOLD: usize = 2;

/// Chance that an eligible actor opens a pull request after committing.
pub const PULL_REQUEST_CHANCE: f64 = 0.4;

/// Chance that a reviewer merges something on a mutation tick.
pub const REVIEW_CHANCE: f64 = 0.3;

/// Chance that an hour-old commit ages by another hour on a tick.
pub const HOUR_AGING_CHANCE: f64 = 0.1;

/// Default number of ticks between actor mutations.
pub const DEFAULT_MUTATE_EVERY: u64 = 10;

/// Branch every pull request targets.
const INTEGRATION_BRANCH: &str = "develop";

/// What changed during a tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum SimEvent {
    #[serde(rename_all = "camelCase")]
    Committed {
        actor: String,
        branch: String,
        commit_id: String,
        message: String,
    },

    #[serde(rename_all = "camelCase")]
    OpenedPullRequest {
        actor: String,
        number: u32,
        from: String,
        to: String,
    },

    #[serde(rename_all = "camelCase")]
    Merged {
        reviewer: String,
        author: String,
        number: u32,
        next_branch: String,
    },
}

/// The simulation state: roster, random source and counters.
pub struct Simulation<R> {
    actors: Vec<Actor>,
    rng: R,
    ticks: u64,
    mutate_every: u64,
    next_pull_request: u32,
}

impl<R: Rng> Simulation<R> {
    /// Creates a simulation over the given roster.
    ///
    /// `mutate_every` is clamped to at least 1.
    pub fn new(actors: Vec<Actor>, rng: R, mutate_every: u64) -> Self {
        Self {
            actors,
            rng,
            ticks: 0,
            mutate_every: mutate_every.max(1),
            next_pull_request: 1,
        }
    }

    /// Creates a simulation over the default three-developer roster.
    pub fn with_default_roster(rng: R, mutate_every: u64) -> Self {
        Self::new(roster::default_roster(), rng, mutate_every)
    }

    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    /// Ticks elapsed since the simulation began.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Advance the simulation by one tick.
    ///
    /// Every tick ages existing commits. Actor state changes only on ticks
    /// where the counter (before advancing) is a multiple of the mutation
    /// cadence, so the very first tick can already act.
    pub fn tick(&mut self) -> Vec<SimEvent> {
        let due = self.ticks % self.mutate_every == 0;
        self.ticks += 1;

        self.age_commits();

        let mut events = Vec::new();
        if due {
            self.author_step(&mut events);
            self.review_step(&mut events);
        }

        for event in &events {
            tracing::debug!(tick = self.ticks, ?event, "actor state changed");
        }
        events
    }

    fn age_commits(&mut self) {
        let rng = &mut self.rng;
        for commit in self.actors.iter_mut().flat_map(|a| a.commits.iter_mut()) {
            let bump_hour =
                matches!(commit.age, CommitAge::Hours(_)) && rng.gen_bool(HOUR_AGING_CHANCE);
            commit.age = commit.age.advanced(bump_hour);
        }
    }

    /// One randomly picked actor may commit and maybe open a pull request.
    ///
    /// The pick is uniform over the whole roster; an ineligible pick simply
    /// does nothing this round.
    fn author_step(&mut self, events: &mut Vec<SimEvent>) {
        if self.actors.is_empty() {
            return;
        }
        let index = self.rng.gen_range(0..self.actors.len());
        if !self.actors[index].can_author() {
            return;
        }

        let message = roster::commit_message(&self.actors[index].current_branch, &mut self.rng);
        let id = short_id(&mut self.rng, &self.actors[index]);

        let actor = &mut self.actors[index];
        actor.commits.push(ActorCommit {
            id: id.clone(),
            message: message.to_string(),
            age: CommitAge::JustNow,
        });
        events.push(SimEvent::Committed {
            actor: actor.name.clone(),
            branch: actor.current_branch.clone(),
            commit_id: id,
            message: message.to_string(),
        });

        if actor.commits.len() >= PULL_REQUEST_THRESHOLD && self.rng.gen_bool(PULL_REQUEST_CHANCE)
        {
            let number = self.next_pull_request;
            self.next_pull_request += 1;

            let actor = &mut self.actors[index];
            actor.pull_requests.push(PullRequest {
                number,
                title: format!("Merge {} into {INTEGRATION_BRANCH}", actor.current_branch),
                status: PullRequestStatus::Open,
                from: actor.current_branch.clone(),
                to: INTEGRATION_BRANCH.to_string(),
            });
            events.push(SimEvent::OpenedPullRequest {
                actor: actor.name.clone(),
                number,
                from: actor.current_branch.clone(),
                to: INTEGRATION_BRANCH.to_string(),
            });
        }
    }

    /// Each reviewer may merge one open pull request from the authors.
    ///
    /// Merging resets the author onto a fresh feature branch with no commits.
    fn review_step(&mut self, events: &mut Vec<SimEvent>) {
        let reviewers: Vec<usize> = (0..self.actors.len())
            .filter(|&i| self.actors[i].role == ActorRole::Reviewer)
            .collect();

        for reviewer in reviewers {
            if !self.rng.gen_bool(REVIEW_CHANCE) {
                continue;
            }

            let open: Vec<(usize, usize)> = self
                .actors
                .iter()
                .enumerate()
                .filter(|(_, a)| a.role != ActorRole::Reviewer)
                .flat_map(|(ai, a)| {
                    a.pull_requests
                        .iter()
                        .enumerate()
                        .filter(|(_, pr)| pr.status == PullRequestStatus::Open)
                        .map(move |(pi, _)| (ai, pi))
                })
                .collect();

            let Some(&(author, pr)) = open.choose(&mut self.rng) else {
                continue;
            };

            let next_branch = roster::next_feature_branch(&mut self.rng).to_string();
            let reviewer_name = self.actors[reviewer].name.clone();

            let actor = &mut self.actors[author];
            actor.pull_requests[pr].status = PullRequestStatus::Merged;
            actor.current_branch.clone_from(&next_branch);
            actor.commits.clear();

            events.push(SimEvent::Merged {
                reviewer: reviewer_name,
                author: actor.name.clone(),
                number: actor.pull_requests[pr].number,
                next_branch,
            });
        }
    }
}

/// A seven-hex-digit display id for the actor's next commit.
fn short_id<R: Rng>(rng: &mut R, actor: &Actor) -> String {
    let nonce: u64 = rng.r#gen();
    let mut hasher = Sha256::new();
    hasher.update(actor.name.as_bytes());
    hasher.update(actor.current_branch.as_bytes());
    hasher.update(actor.commits.len().to_le_bytes());
    hasher.update(nonce.to_le_bytes());
    let digest = hex::encode(hasher.finalize());
    digest[..7].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn seeded(seed: u64) -> Simulation<StdRng> {
        Simulation::with_default_roster(StdRng::seed_from_u64(seed), DEFAULT_MUTATE_EVERY)
    }

    fn open_count(actor: &Actor) -> usize {
        actor
            .pull_requests
            .iter()
            .filter(|pr| pr.status == PullRequestStatus::Open)
            .count()
    }

    #[test]
    fn same_seed_replays_identically() {
        let mut a = seeded(7);
        let mut b = seeded(7);
        for _ in 0..500 {
            assert_eq!(a.tick(), b.tick());
        }
        assert_eq!(a.actors(), b.actors());
    }

    #[test]
    fn mutations_only_on_cadence_ticks() {
        for seed in 0..20 {
            let mut sim = seeded(seed);
            for _ in 0..200 {
                let before = sim.ticks();
                let events = sim.tick();
                if before % DEFAULT_MUTATE_EVERY != 0 {
                    assert!(events.is_empty(), "seed {seed} mutated on tick {before}");
                }
            }
        }
    }

    #[test]
    fn at_most_one_open_pull_request_per_actor() {
        for seed in 0..50 {
            let mut sim = seeded(seed);
            for _ in 0..2_000 {
                sim.tick();
                for actor in sim.actors() {
                    assert!(open_count(actor) <= 1, "seed {seed}: {}", actor.name);
                }
            }
        }
    }

    #[test]
    fn reviewer_never_authors() {
        for seed in 0..20 {
            let mut sim = seeded(seed);
            for _ in 0..1_000 {
                for event in sim.tick() {
                    if let SimEvent::Committed { actor, .. } = event {
                        assert_ne!(actor, "Charlie");
                    }
                }
            }
            let charlie = sim.actors().iter().find(|a| a.name == "Charlie").unwrap();
            assert!(charlie.commits.is_empty());
            assert!(charlie.pull_requests.is_empty());
        }
    }

    #[test]
    fn merge_resets_author_onto_pool_branch() {
        let mut merges = 0;
        for seed in 0..20 {
            let mut sim = seeded(seed);
            for _ in 0..1_000 {
                for event in sim.tick() {
                    if let SimEvent::Merged {
                        author,
                        number,
                        next_branch,
                        ..
                    } = event
                    {
                        merges += 1;
                        assert!(roster::FEATURE_POOL.contains(&next_branch.as_str()));

                        let actor = sim.actors().iter().find(|a| a.name == author).unwrap();
                        assert!(actor.commits.is_empty());
                        assert_eq!(actor.current_branch, next_branch);
                        let pr = actor
                            .pull_requests
                            .iter()
                            .find(|pr| pr.number == number)
                            .unwrap();
                        assert_eq!(pr.status, PullRequestStatus::Merged);
                    }
                }
            }
        }
        assert!(merges > 0, "no merges across 20 seeded runs");
    }

    #[test]
    fn pull_requests_need_two_commits_and_target_develop() {
        let mut opened = 0;
        for seed in 0..20 {
            let mut sim = seeded(seed);
            for _ in 0..1_000 {
                // A reviewer may merge in the same tick, so check against
                // the state from before it.
                let before = sim.actors().to_vec();
                let events = sim.tick();
                for event in &events {
                    let SimEvent::OpenedPullRequest { actor, from, to, .. } = event else {
                        continue;
                    };
                    opened += 1;
                    assert_eq!(to, "develop");

                    let author = before.iter().find(|a| &a.name == actor).unwrap();
                    assert_eq!(&author.current_branch, from);
                    assert!(!author.has_open_pull_request());
                    assert!(events.iter().any(
                        |e| matches!(e, SimEvent::Committed { actor: a, .. } if a == actor)
                    ));
                    assert!(author.commits.len() + 1 >= PULL_REQUEST_THRESHOLD);
                }
            }
        }
        assert!(opened > 0);
    }

    #[test]
    fn pull_request_numbers_are_unique() {
        let mut sim = seeded(3);
        for _ in 0..5_000 {
            sim.tick();
        }
        let mut numbers: Vec<u32> = sim
            .actors()
            .iter()
            .flat_map(|a| a.pull_requests.iter().map(|pr| pr.number))
            .collect();
        let total = numbers.len();
        numbers.sort_unstable();
        numbers.dedup();
        assert_eq!(numbers.len(), total);
    }

    #[test]
    fn commit_ages_follow_their_unit() {
        // No reviewer, so nothing is ever merged away.
        let mut authors: Vec<Actor> = roster::default_roster()
            .into_iter()
            .filter(|a| a.role == ActorRole::Author)
            .collect();
        authors[0].commits.push(ActorCommit {
            id: "aaaaaaa".into(),
            message: "Minor refactoring".into(),
            age: CommitAge::Minutes(5),
        });
        let mut sim = Simulation::new(authors, StdRng::seed_from_u64(11), DEFAULT_MUTATE_EVERY);

        let fresh = loop {
            let events = sim.tick();
            if let Some(SimEvent::Committed { actor, commit_id, .. }) =
                events.into_iter().find(|e| matches!(e, SimEvent::Committed { .. }))
            {
                break (actor, commit_id);
            }
        };
        let elapsed = sim.ticks();
        for _ in 0..30 {
            sim.tick();
        }

        let age_of = |name: &str, id: &str| {
            sim.actors()
                .iter()
                .find(|a| a.name == name)
                .and_then(|a| a.commits.iter().find(|c| c.id == id))
                .map(|c| c.age)
        };
        assert_eq!(age_of(&fresh.0, &fresh.1), Some(CommitAge::JustNow));

        let minutes = u32::try_from(elapsed + 30 + 5).unwrap();
        assert_eq!(age_of("Alice", "aaaaaaa"), Some(CommitAge::Minutes(minutes)));

        match age_of("Bob", "4n5o6p7") {
            Some(CommitAge::Hours(h)) => assert!(h >= 3),
            other => panic!("hour-old commit changed unit: {other:?}"),
        }
    }

    #[test]
    fn zero_cadence_is_clamped() {
        let mut sim = Simulation::with_default_roster(StdRng::seed_from_u64(1), 0);
        sim.tick();
        assert_eq!(sim.ticks(), 1);
    }

    #[test]
    fn empty_roster_ticks_quietly() {
        let mut sim = Simulation::new(vec![], StdRng::seed_from_u64(1), 1);
        for _ in 0..10 {
            assert!(sim.tick().is_empty());
        }
    }
}
