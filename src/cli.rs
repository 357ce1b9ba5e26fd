//! CLI interface for flowtutor.
//!
//! Each subcommand is non-interactive except `simulate`, which listens on
//! stdin for pause/speed controls while it runs.
//!
//! - `flowtutor steps` — the tutorial outline.
//! - `flowtutor timeline` — the branch graph at a step, as text, SVG or JSON.
//! - `flowtutor pull` — merge versus rebase, in the same formats.
//! - `flowtutor simulate` — the developer simulation.
//! - `flowtutor theme` — show or change the display theme.

mod format;

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use jiff::Timestamp;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::config::Config;
use crate::layout::layout;
use crate::model::{Actor, Graph, Theme};
use crate::render::{RenderOptions, render_svg, render_text};
use crate::simulation::Simulation;
use crate::simulation::scheduler::{Scheduler, Speed};
use crate::storage::Storage;
use crate::theme;
use crate::timeline::pull::PullStrategy;
use crate::timeline::{self, Step};

use format::{format_actor_card, format_event, format_snapshot, format_steps, format_transcript};

/// flowtutor — learn the git-flow branching model.
#[derive(Debug, Parser)]
#[command(name = "flowtutor", after_long_help = USAGE_HELP)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

const USAGE_HELP: &str = r"Walking through the tutorial:
  flowtutor steps
  flowtutor timeline --step 2
  flowtutor timeline --step 6 --format svg --branch develop --out flow.svg
  flowtutor pull --rebase

Watching the team:
  flowtutor simulate --speed fast --ticks 120
  flowtutor simulate --instant --seed 7 --ticks 500 --json";

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the tutorial steps.
    Steps,

    /// Show the branch graph at a tutorial step.
    ///
    /// Steps are numbered from 0. Out-of-range steps are clamped to the
    /// nearest valid one.
    Timeline {
        /// Tutorial step index.
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        step: i64,

        /// Output format.
        #[arg(long, value_enum, default_value_t = FormatArg::Text)]
        format: FormatArg,

        /// Branch to highlight in the SVG drawing.
        #[arg(long, default_value = "main")]
        branch: String,

        /// Theme for the SVG drawing. Defaults to the saved preference.
        #[arg(long, value_enum)]
        theme: Option<ThemeArg>,

        /// Write the output to this file instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Compare `git pull` with `git pull --rebase` on a small graph.
    Pull {
        /// Show the rebase variant instead of the merge.
        #[arg(long)]
        rebase: bool,

        /// Output format.
        #[arg(long, value_enum, default_value_t = FormatArg::Text)]
        format: FormatArg,

        /// Theme for the SVG drawing. Defaults to the saved preference.
        #[arg(long, value_enum)]
        theme: Option<ThemeArg>,

        /// Write the output to this file instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Run the developer simulation.
    ///
    /// In real time (the default), type `pause`, `resume`, `slow`, `normal`,
    /// `fast`, `status` or `quit` on stdin to steer it.
    Simulate {
        /// Simulation speed. Defaults to the configured speed.
        #[arg(long, value_enum)]
        speed: Option<SpeedArg>,

        /// Stop after this many ticks.
        #[arg(long, default_value_t = 60)]
        ticks: u64,

        /// Seed for a reproducible run. Defaults to the configured seed.
        #[arg(long)]
        seed: Option<u64>,

        /// Run every tick immediately instead of on the clock.
        #[arg(long)]
        instant: bool,

        /// Print a JSON report instead of events and actor cards.
        #[arg(long)]
        json: bool,
    },

    /// Show or change the display theme.
    Theme {
        #[command(subcommand)]
        command: Option<ThemeCommand>,
    },
}

#[derive(Debug, Subcommand)]
pub enum ThemeCommand {
    /// Print the current theme.
    Show,
    /// Switch between light and dark.
    Toggle,
    /// Set the theme explicitly.
    Set {
        #[arg(value_enum)]
        theme: ThemeArg,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    /// Lane diagram for the terminal.
    Text,
    /// SVG drawing.
    Svg,
    /// Graph and layout as JSON.
    Json,
}

/// CLI-facing speed, mapped to the domain `Speed`.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SpeedArg {
    /// Half speed.
    Slow,
    /// Normal speed.
    Normal,
    /// Double speed.
    Fast,
}

impl SpeedArg {
    fn to_domain(self) -> Speed {
        match self {
            Self::Slow => Speed::Slow,
            Self::Normal => Speed::Normal,
            Self::Fast => Speed::Fast,
        }
    }
}

/// CLI-facing theme, mapped to the domain `Theme`.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ThemeArg {
    Light,
    Dark,
}

impl ThemeArg {
    fn to_domain(self) -> Theme {
        match self {
            Self::Light => Theme::Light,
            Self::Dark => Theme::Dark,
        }
    }
}

/// Run the CLI, returning an error message on failure.
pub fn run(config: &Config, storage: &Storage) -> Result<(), String> {
    let cli = Cli::parse();

    match cli.command {
        Command::Steps => {
            print!("{}", format_steps());
            Ok(())
        }
        Command::Timeline {
            step,
            format,
            branch,
            theme,
            out,
        } => cmd_timeline(storage, step, format, &branch, theme, out),
        Command::Pull {
            rebase,
            format,
            theme,
            out,
        } => {
            let strategy = if rebase {
                PullStrategy::Rebase
            } else {
                PullStrategy::Merge
            };
            cmd_pull(storage, strategy, format, theme, out)
        }
        Command::Simulate {
            speed,
            ticks,
            seed,
            instant,
            json,
        } => {
            let options = SimulateOptions {
                speed: speed.map_or(config.speed, SpeedArg::to_domain),
                ticks,
                seed: seed.or(config.seed),
                instant,
                json,
            };
            cmd_simulate(config, &options)
        }
        Command::Theme { command } => cmd_theme(storage, command.unwrap_or(ThemeCommand::Show)),
    }
}

fn cmd_timeline(
    storage: &Storage,
    index: i64,
    format: FormatArg,
    branch: &str,
    theme: Option<ThemeArg>,
    out: Option<PathBuf>,
) -> Result<(), String> {
    let step = Step::clamp(index);
    if usize::try_from(index).ok() != Some(step.index()) {
        tracing::debug!(index, clamped = step.index(), "step out of range");
    }

    let graph = timeline::derive_index(index);
    let transcript = timeline::transcript::transcript(step);
    let view = GraphView {
        heading: format!("Step {}: {}", step.index(), step.title()),
        notes: format_transcript(transcript),
        highlight: branch,
        theme,
        meta: serde_json::json!({
            "step": step.index(),
            "title": step.title(),
            "transcript": transcript,
        }),
    };

    let output = render_view(storage, &graph, format, view)?;
    write_output(&output, out, &format!("Step {} ({})", step.index(), step.title()))
}

fn cmd_pull(
    storage: &Storage,
    strategy: PullStrategy,
    format: FormatArg,
    theme: Option<ThemeArg>,
    out: Option<PathBuf>,
) -> Result<(), String> {
    let graph = timeline::pull::derive(strategy);
    let view = GraphView {
        heading: strategy.title().to_string(),
        notes: format!("{}\n", strategy.summary()),
        highlight: "feature",
        theme,
        meta: serde_json::json!({
            "strategy": strategy,
            "title": strategy.title(),
            "summary": strategy.summary(),
        }),
    };

    let output = render_view(storage, &graph, format, view)?;
    write_output(&output, out, strategy.title())
}

/// How a derived graph is presented in each output format.
struct GraphView<'a> {
    heading: String,

    /// Text shown under the diagram in text output.
    notes: String,

    highlight: &'a str,
    theme: Option<ThemeArg>,

    /// Extra fields for JSON output; `graph` and `layout` are added to it.
    meta: serde_json::Value,
}

fn render_view(
    storage: &Storage,
    graph: &Graph,
    format: FormatArg,
    view: GraphView<'_>,
) -> Result<String, String> {
    let layout = layout(graph);

    match format {
        FormatArg::Text => {
            let mut text = format!("{}\n\n{}", view.heading, render_text(graph, &layout));
            if !view.notes.is_empty() {
                text.push('\n');
                text.push_str(&view.notes);
            }
            Ok(text)
        }
        FormatArg::Svg => {
            let theme = match view.theme {
                Some(t) => t.to_domain(),
                None => theme::resolve(storage).map_err(|e| format!("failed to read theme: {e}"))?,
            };
            if graph.branch(view.highlight).is_none() {
                tracing::debug!(branch = view.highlight, "highlighted branch is not in the graph");
            }
            let options = RenderOptions {
                theme,
                highlight: Some(view.highlight.to_string()),
            };
            Ok(render_svg(&layout, &options))
        }
        FormatArg::Json => {
            let mut json = view.meta;
            json["graph"] = serde_json::to_value(graph)
                .map_err(|e| format!("failed to serialize graph: {e}"))?;
            json["layout"] = serde_json::to_value(&layout)
                .map_err(|e| format!("failed to serialize layout: {e}"))?;
            let mut text = serde_json::to_string_pretty(&json)
                .map_err(|e| format!("failed to serialize output: {e}"))?;
            text.push('\n');
            Ok(text)
        }
    }
}

fn write_output(output: &str, out: Option<PathBuf>, label: &str) -> Result<(), String> {
    match out {
        Some(path) => {
            fs::write(&path, output)
                .map_err(|e| format!("failed to write {}: {e}", path.display()))?;
            eprintln!("{label} → {}", path.display());
        }
        None => print!("{output}"),
    }
    Ok(())
}

struct SimulateOptions {
    speed: Speed,
    ticks: u64,
    seed: Option<u64>,
    instant: bool,
    json: bool,
}

/// Final output of `simulate --json`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SimulationReport<'a> {
    started_at: Timestamp,
    finished_at: Timestamp,
    seed: Option<u64>,
    ticks: u64,
    actors: &'a [Actor],
}

fn cmd_simulate(config: &Config, options: &SimulateOptions) -> Result<(), String> {
    let rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let simulation = Simulation::with_default_roster(rng, config.mutate_every);
    let started_at = Timestamp::now();

    let simulation = if options.instant {
        run_instant(simulation, options)
    } else {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| format!("failed to start runtime: {e}"))?;
        let result = runtime.block_on(run_live(simulation, config.base_period(), options));
        // Stdin is read on a blocking thread that would otherwise hold shutdown.
        runtime.shutdown_background();
        result?
    };

    if options.json {
        let report = SimulationReport {
            started_at,
            finished_at: Timestamp::now(),
            seed: options.seed,
            ticks: simulation.ticks(),
            actors: simulation.actors(),
        };
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| format!("failed to serialize report: {e}"))?;
        println!("{json}");
    } else {
        println!();
        println!("After {} ticks:", simulation.ticks());
        for actor in simulation.actors() {
            println!();
            print!("{}", format_actor_card(actor));
        }
    }

    Ok(())
}

fn run_instant(
    mut simulation: Simulation<StdRng>,
    options: &SimulateOptions,
) -> Simulation<StdRng> {
    for _ in 0..options.ticks {
        let events = simulation.tick();
        if !options.json {
            for event in &events {
                println!("[tick {}] {}", simulation.ticks(), format_event(event));
            }
        }
    }
    simulation
}

/// A control typed on stdin during a live run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LiveControl {
    Pause,
    Resume,
    Speed(Speed),
    Status,
    Quit,
}

fn parse_control(line: &str) -> Option<LiveControl> {
    match line.trim().to_ascii_lowercase().as_str() {
        "p" | "pause" => Some(LiveControl::Pause),
        "r" | "resume" => Some(LiveControl::Resume),
        "slow" | "0.5" => Some(LiveControl::Speed(Speed::Slow)),
        "normal" | "1" => Some(LiveControl::Speed(Speed::Normal)),
        "fast" | "2" => Some(LiveControl::Speed(Speed::Fast)),
        "s" | "status" => Some(LiveControl::Status),
        "q" | "quit" => Some(LiveControl::Quit),
        _ => None,
    }
}

async fn run_live(
    simulation: Simulation<StdRng>,
    base: Duration,
    options: &SimulateOptions,
) -> Result<Simulation<StdRng>, String> {
    if options.ticks == 0 {
        return Ok(simulation);
    }

    let (scheduler, mut reports) = Scheduler::start(simulation, options.speed.period(base));
    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    eprintln!("Controls: pause, resume, slow, normal, fast, status, quit");

    loop {
        tokio::select! {
            report = reports.recv() => {
                let Some(report) = report else { break };
                if !options.json {
                    for event in &report.events {
                        println!("[tick {}] {}", report.tick, format_event(event));
                    }
                }
                if report.tick >= options.ticks {
                    break;
                }
            }
            line = stdin.next_line(), if stdin_open => match line {
                Ok(Some(line)) => {
                    let control = match parse_control(&line) {
                        Some(control) => control,
                        None => {
                            eprintln!("Unknown control '{}'", line.trim());
                            continue;
                        }
                    };
                    let sent = match control {
                        LiveControl::Pause => scheduler.pause(),
                        LiveControl::Resume => scheduler.resume(),
                        LiveControl::Speed(speed) => scheduler.set_speed(speed, base),
                        LiveControl::Status => {
                            let snapshot = scheduler.snapshot().await.map_err(|e| e.to_string())?;
                            eprint!("{}", format_snapshot(&snapshot));
                            continue;
                        }
                        LiveControl::Quit => break,
                    };
                    sent.map_err(|e| e.to_string())?;
                    eprintln!("→ {}", describe_control(control));
                }
                Ok(None) => stdin_open = false,
                Err(e) => {
                    tracing::warn!("stdin closed: {e}");
                    stdin_open = false;
                }
            },
        }
    }

    scheduler.stop().await.map_err(|e| e.to_string())
}

fn describe_control(control: LiveControl) -> String {
    match control {
        LiveControl::Pause => "paused".to_string(),
        LiveControl::Resume => "resumed".to_string(),
        LiveControl::Speed(speed) => format!("speed {}×", speed.multiplier()),
        LiveControl::Status => "status".to_string(),
        LiveControl::Quit => "quitting".to_string(),
    }
}

fn cmd_theme(storage: &Storage, command: ThemeCommand) -> Result<(), String> {
    let theme = match command {
        ThemeCommand::Show => theme::resolve(storage),
        ThemeCommand::Toggle => theme::toggle(storage),
        ThemeCommand::Set { theme } => {
            let theme = theme.to_domain();
            theme::set(storage, theme).map(|()| theme)
        }
    }
    .map_err(|e| format!("failed to update theme: {e}"))?;

    println!("{theme}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_negative_step() {
        let cli = Cli::try_parse_from(["flowtutor", "timeline", "--step", "-3"]).unwrap();
        assert!(matches!(cli.command, Command::Timeline { step: -3, .. }));
    }

    #[test]
    fn parses_pull_variants() {
        let cli = Cli::try_parse_from(["flowtutor", "pull", "--rebase", "--format", "json"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Pull {
                rebase: true,
                format: FormatArg::Json,
                ..
            }
        ));
    }

    #[test]
    fn timeline_text_includes_transcript() {
        let dir = tempfile::TempDir::new().unwrap();
        let storage = Storage::new(dir.path()).unwrap();
        let step = Step::MainAndDevelop;
        let view = GraphView {
            heading: step.title().to_string(),
            notes: format_transcript(timeline::transcript::transcript(step)),
            highlight: "develop",
            theme: None,
            meta: serde_json::json!({}),
        };

        let text = render_view(&storage, &timeline::derive(step), FormatArg::Text, view).unwrap();
        assert!(text.starts_with("Main and Develop Branches\n\n"));
        assert!(text.contains("$ git checkout -b develop\n  Switched to a new branch 'develop'\n"));
    }

    #[test]
    fn pull_json_carries_graph_and_layout() {
        let dir = tempfile::TempDir::new().unwrap();
        let storage = Storage::new(dir.path()).unwrap();
        let view = GraphView {
            heading: String::new(),
            notes: String::new(),
            highlight: "feature",
            theme: Some(ThemeArg::Dark),
            meta: serde_json::json!({ "strategy": PullStrategy::Rebase }),
        };

        let graph = timeline::pull::derive(PullStrategy::Rebase);
        let text = render_view(&storage, &graph, FormatArg::Json, view).unwrap();
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["strategy"], "rebase");
        assert_eq!(json["graph"]["commits"].as_array().unwrap().len(), 5);
        assert_eq!(json["layout"]["paths"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn parses_live_controls() {
        assert_eq!(parse_control(" Pause "), Some(LiveControl::Pause));
        assert_eq!(parse_control("r"), Some(LiveControl::Resume));
        assert_eq!(parse_control("fast"), Some(LiveControl::Speed(Speed::Fast)));
        assert_eq!(parse_control("0.5"), Some(LiveControl::Speed(Speed::Slow)));
        assert_eq!(parse_control("status"), Some(LiveControl::Status));
        assert_eq!(parse_control("q"), Some(LiveControl::Quit));
        assert_eq!(parse_control("dance"), None);
    }

    #[test]
    fn instant_run_advances_requested_ticks() {
        let options = SimulateOptions {
            speed: Speed::Normal,
            ticks: 25,
            seed: Some(1),
            instant: true,
            json: true,
        };
        let simulation = Simulation::with_default_roster(StdRng::seed_from_u64(1), 10);
        assert_eq!(run_instant(simulation, &options).ticks(), 25);
    }

    #[tokio::test(start_paused = true)]
    async fn live_run_with_zero_ticks_does_nothing() {
        let options = SimulateOptions {
            speed: Speed::Normal,
            ticks: 0,
            seed: Some(1),
            instant: false,
            json: true,
        };
        let simulation = Simulation::with_default_roster(StdRng::seed_from_u64(1), 10);
        let simulation = run_live(simulation, Duration::from_millis(1000), &options)
            .await
            .unwrap();
        assert_eq!(simulation.ticks(), 0);
    }
}
