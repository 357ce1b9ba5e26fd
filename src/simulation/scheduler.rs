//! Wall-clock scheduling for a [`Simulation`].
//!
//! A single tokio task owns the simulation and a single interval timer.
//! Every request from the outside (pause, resume, period change, snapshot,
//! stop) arrives as a message on one channel and is handled between ticks,
//! so no two timers ever run at once and actor state is never touched
//! concurrently.

use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};

use super::{SimEvent, Simulation};
use crate::model::Actor;

/// Errors that can occur while talking to a running scheduler.
#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    #[error("simulation task has already stopped")]
    Stopped,

    #[error("simulation task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub type Result<T> = core::result::Result<T, SchedulerError>;

/// Simulation speed multiplier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speed {
    /// Half speed.
    Slow,
    #[default]
    Normal,
    /// Double speed.
    Fast,
}

impl Speed {
    pub fn multiplier(self) -> f64 {
        match self {
            Self::Slow => 0.5,
            Self::Normal => 1.0,
            Self::Fast => 2.0,
        }
    }

    /// Tick period at this speed for a given base period.
    pub fn period(self, base: Duration) -> Duration {
        base.div_f64(self.multiplier())
    }
}

/// What one tick produced.
#[derive(Debug, Clone, Serialize)]
pub struct TickReport {
    /// Tick counter after this tick.
    pub tick: u64,
    pub events: Vec<SimEvent>,
}

/// A copy of the simulation state at a point in time.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub tick: u64,
    pub paused: bool,
    pub actors: Vec<Actor>,
}

enum Control {
    SetPeriod(Duration),
    Pause,
    Resume,
    Snapshot(oneshot::Sender<Snapshot>),
    Stop,
}

/// Handle to a running simulation task.
pub struct Scheduler<R> {
    control: mpsc::UnboundedSender<Control>,
    task: JoinHandle<Simulation<R>>,
}

impl<R: Rng + Send + 'static> Scheduler<R> {
    /// Move `simulation` into a new task ticking every `period`.
    ///
    /// The first tick fires one full period after start. Tick reports are
    /// delivered on the returned receiver; dropping it does not stop the
    /// simulation.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(
        simulation: Simulation<R>,
        period: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<TickReport>) {
        let (control, control_rx) = mpsc::unbounded_channel();
        let (reports, reports_rx) = mpsc::unbounded_channel();

        tracing::info!(?period, "starting simulation");
        let task = tokio::spawn(run(simulation, period, control_rx, reports));

        (Self { control, task }, reports_rx)
    }

    /// Replace the tick period. The pending tick is cancelled and the next
    /// one fires a full new period from now.
    pub fn set_period(&self, period: Duration) -> Result<()> {
        self.send(Control::SetPeriod(period))
    }

    pub fn set_speed(&self, speed: Speed, base: Duration) -> Result<()> {
        self.set_period(speed.period(base))
    }

    /// Stop emitting ticks until [`resume`](Self::resume).
    pub fn pause(&self) -> Result<()> {
        self.send(Control::Pause)
    }

    /// Restart ticking one period from now. Ticks missed while paused are
    /// not replayed.
    pub fn resume(&self) -> Result<()> {
        self.send(Control::Resume)
    }

    pub async fn snapshot(&self) -> Result<Snapshot> {
        let (tx, rx) = oneshot::channel();
        self.send(Control::Snapshot(tx))?;
        rx.await.map_err(|_| SchedulerError::Stopped)
    }

    /// Stop the task and take the simulation back.
    pub async fn stop(self) -> Result<Simulation<R>> {
        // A closed channel means the task is already winding down; the join
        // below still hands the simulation back.
        let _ = self.control.send(Control::Stop);
        let simulation = self.task.await?;
        tracing::info!(ticks = simulation.ticks(), "simulation stopped");
        Ok(simulation)
    }

    fn send(&self, message: Control) -> Result<()> {
        self.control
            .send(message)
            .map_err(|_| SchedulerError::Stopped)
    }
}

async fn run<R: Rng>(
    mut simulation: Simulation<R>,
    mut period: Duration,
    mut control: mpsc::UnboundedReceiver<Control>,
    reports: mpsc::UnboundedSender<TickReport>,
) -> Simulation<R> {
    let mut ticker = new_ticker(period);
    let mut paused = false;

    loop {
        tokio::select! {
            message = control.recv() => match message {
                Some(Control::SetPeriod(next)) => {
                    tracing::debug!(period = ?next, "changing tick period");
                    period = next;
                    ticker = new_ticker(period);
                }
                Some(Control::Pause) => {
                    tracing::debug!("pausing simulation");
                    paused = true;
                }
                Some(Control::Resume) => {
                    if paused {
                        tracing::debug!("resuming simulation");
                        paused = false;
                        ticker = new_ticker(period);
                    }
                }
                Some(Control::Snapshot(reply)) => {
                    let _ = reply.send(Snapshot {
                        tick: simulation.ticks(),
                        paused,
                        actors: simulation.actors().to_vec(),
                    });
                }
                Some(Control::Stop) | None => break,
            },
            _ = ticker.tick(), if !paused => {
                let events = simulation.tick();
                // Nobody listening is fine; the simulation keeps running.
                let _ = reports.send(TickReport {
                    tick: simulation.ticks(),
                    events,
                });
            }
        }
    }

    simulation
}

fn new_ticker(period: Duration) -> Interval {
    let period = period.max(Duration::from_millis(1));
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}
