//! Timer-driven fake training loop.
//!
//! The error values follow a decreasing trend plus noise; nothing is learned.
//! A real optimizer would replace [`synthetic_error`] wholesale.

use std::time::Duration;

use rand::Rng;

use crate::error::{Precondition, SessionError};
use crate::model::{ConfusionMatrix, ErrorSample};
use crate::session::{RunStatus, Session};
use crate::scheduler::TaskHandle;

pub const TICK_INTERVAL: Duration = Duration::from_millis(100);
pub const DEMO_ACCURACY: f64 = 0.92;
const ERROR_FLOOR: f64 = 0.01;
const NOISE: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Applied,
    /// The request made no sense in the current state and was dropped.
    Ignored,
}

/// Owns at most one tick schedule; the run itself lives in [`Session`].
#[derive(Debug, Default)]
pub struct Trainer {
    ticks: Option<TaskHandle>,
}

impl Trainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.ticks.is_some()
    }

    pub fn start(&mut self, session: &mut Session, now: Duration) -> Result<Transition, SessionError> {
        if session.topology.is_none() {
            return Err(session.refuse(Precondition::NoNetwork));
        }
        if session.dataset.is_none() {
            return Err(session.refuse(Precondition::NoDataset));
        }
        if self.is_running() {
            return Ok(Transition::Ignored);
        }

        let run = &mut session.run;
        run.status = RunStatus::Running;
        run.current_epoch = 0;
        run.epoch_limit = session.params.epochs.max(1);
        run.samples.clear();
        run.started_at = Some(now);
        run.elapsed_secs = 0;
        self.ticks = Some(TaskHandle::repeating(TICK_INTERVAL, now));

        tracing::info!(epochs = run.epoch_limit, "training started");
        session.log.success("Training started");
        session.activity.record("Training started");
        Ok(Transition::Applied)
    }

    pub fn stop(&mut self, session: &mut Session, now: Duration) -> Transition {
        if !self.is_running() {
            return Transition::Ignored;
        }
        self.halt(session, now);
        session.log.warning("Training stopped");
        session.activity.record("Training stopped");
        Transition::Applied
    }

    /// Fires every tick due at `now`, oldest first. Returns how many fired.
    ///
    /// Missed ticks are caught up rather than dropped: after a stalled frame
    /// the run advances one epoch per elapsed interval, so a run of `E`
    /// epochs always takes `E` intervals of clock time.
    pub fn poll<R: Rng + ?Sized>(&mut self, session: &mut Session, now: Duration, rng: &mut R) -> usize {
        let mut fired = 0;
        while let Some(ticks) = self.ticks.as_mut() {
            if !ticks.fire_due(now) {
                break;
            }
            self.tick(session, now, rng);
            fired += 1;
        }
        fired
    }

    /// Time until the next tick, if a run is active.
    pub fn next_tick_in(&self, now: Duration) -> Option<Duration> {
        self.ticks.as_ref().map(|t| t.remaining(now))
    }

    fn tick<R: Rng + ?Sized>(&mut self, session: &mut Session, now: Duration, rng: &mut R) {
        let run = &mut session.run;
        run.current_epoch += 1;
        let error = synthetic_error(run.current_epoch, run.epoch_limit, rng);
        run.samples.push(ErrorSample {
            epoch: run.current_epoch,
            error,
        });
        run.elapsed_secs = elapsed_secs(run.started_at, now);
        tracing::trace!(epoch = run.current_epoch, error, "tick");

        if run.current_epoch >= run.epoch_limit {
            self.halt(session, now);
            session.confusion = Some(ConfusionMatrix::demo());
            session.accuracy = Some(DEMO_ACCURACY);
            session.log.success("Training completed successfully");
            session.activity.record("Training completed");
        }
    }

    /// Cancels the schedule and records history. Both the explicit stop and
    /// the completion path go through here exactly once per run.
    fn halt(&mut self, session: &mut Session, now: Duration) {
        self.ticks = None;
        let run = &mut session.run;
        run.status = RunStatus::Stopped;
        run.elapsed_secs = elapsed_secs(run.started_at, now);
        tracing::info!(
            epoch = run.current_epoch,
            samples = run.samples.len(),
            "training halted"
        );
        if let Some(entry) = session.history_entry() {
            session.history.push(entry);
        }
    }
}

pub fn synthetic_error<R: Rng + ?Sized>(epoch: u32, limit: u32, rng: &mut R) -> f64 {
    let trend = 1.0 - f64::from(epoch) / f64::from(limit);
    (trend + rng.gen_range(0.0..NOISE)).max(ERROR_FLOOR)
}

fn elapsed_secs(started_at: Option<Duration>, now: Duration) -> u64 {
    started_at
        .map(|start| now.saturating_sub(start).as_secs())
        .unwrap_or(0)
}
