//! Output formatting for CLI display.

use std::fmt::Write;

use crate::model::{Actor, PullRequestStatus};
use crate::simulation::SimEvent;
use crate::simulation::scheduler::Snapshot;
use crate::timeline::Step;
use crate::timeline::transcript::Exchange;

/// The tutorial outline, one numbered line per step.
pub(super) fn format_steps() -> String {
    Step::ALL
        .iter()
        .map(|s| format!("{}  {:<14} {}\n", s.index(), s.slug(), s.title()))
        .collect()
}

/// A terminal session: each command after a `$` prompt, output indented.
pub(super) fn format_transcript(exchanges: &[Exchange]) -> String {
    let mut out = String::new();
    for exchange in exchanges {
        let _ = writeln!(out, "$ {}", exchange.command);
        for line in exchange.output.lines() {
            let _ = writeln!(out, "  {line}");
        }
    }
    out
}

/// One line describing a simulation event.
pub(super) fn format_event(event: &SimEvent) -> String {
    match event {
        SimEvent::Committed {
            actor,
            branch,
            commit_id,
            message,
        } => format!("{actor} committed {commit_id} on {branch}: {message}"),
        SimEvent::OpenedPullRequest {
            actor,
            number,
            from,
            to,
        } => format!("{actor} opened PR #{number} ({from} → {to})"),
        SimEvent::Merged {
            reviewer,
            author,
            number,
            next_branch,
        } => format!("{reviewer} merged PR #{number} from {author}; {author} moves to {next_branch}"),
    }
}

/// A multi-line card summarizing an actor's branch, commits and pull requests.
pub(super) fn format_actor_card(actor: &Actor) -> String {
    let mut card = String::new();
    let _ = writeln!(card, "{} on {}", actor.name, actor.current_branch);

    card.push_str("  Recent commits:\n");
    if actor.commits.is_empty() {
        card.push_str("    (none)\n");
    }
    for commit in &actor.commits {
        let _ = writeln!(card, "    {}  {}  ({})", commit.id, commit.message, commit.age);
    }

    card.push_str("  Pull requests:\n");
    if actor.pull_requests.is_empty() {
        card.push_str("    (none)\n");
    }
    for pr in &actor.pull_requests {
        let marker = match pr.status {
            PullRequestStatus::Open => "●",
            PullRequestStatus::Merged => "✓",
            PullRequestStatus::Closed => "✗",
        };
        let _ = writeln!(
            card,
            "    {marker} #{} {} [{}] {} → {}",
            pr.number, pr.title, pr.status, pr.from, pr.to
        );
    }

    card
}

/// A compact status block: tick counter plus one line per actor.
pub(super) fn format_snapshot(snapshot: &Snapshot) -> String {
    let mut out = format!(
        "tick {}{}\n",
        snapshot.tick,
        if snapshot.paused { " (paused)" } else { "" }
    );
    for actor in &snapshot.actors {
        let open = actor
            .open_pull_request()
            .map_or(String::new(), |pr| format!(", PR #{} open", pr.number));
        let _ = writeln!(
            out,
            "  {} on {}: {} commit(s){open}",
            actor.name,
            actor.current_branch,
            actor.commits.len()
        );
    }
    out
}
