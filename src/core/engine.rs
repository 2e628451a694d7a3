use crate::domain::model::{RaceOutcome, RaceSummary};
use crate::domain::ports::Simulation;
use std::time::Duration;
use tokio::sync::watch;

pub const DEFAULT_MAX_LAPS: u64 = 1_000;

/// Cancels a running engine; cloneable so several tasks can share it.
#[derive(Debug, Clone)]
pub struct StopHandle {
    tx: watch::Sender<bool>,
}

impl StopHandle {
    pub fn stop(&self) {
        self.tx.send_replace(true);
    }
}

/// Checked by the engine once per lap.
#[derive(Debug, Clone)]
pub struct StopSignal {
    rx: watch::Receiver<bool>,
}

impl StopSignal {
    /// A signal that is never raised.
    pub fn never() -> Self {
        let (_tx, rx) = watch::channel(false);
        Self { rx }
    }

    pub fn is_stopped(&self) -> bool {
        *self.rx.borrow()
    }
}

pub fn stop_channel() -> (StopHandle, StopSignal) {
    let (tx, rx) = watch::channel(false);
    (StopHandle { tx }, StopSignal { rx })
}

/// Drives a simulation lap by lap on the tokio runtime, yielding between laps.
pub struct RaceEngine<S: Simulation> {
    simulation: S,
    max_laps: u64,
    lap_delay: Duration,
}

impl<S: Simulation> RaceEngine<S> {
    pub fn new(simulation: S) -> Self {
        Self {
            simulation,
            max_laps: DEFAULT_MAX_LAPS,
            lap_delay: Duration::ZERO,
        }
    }

    pub fn with_max_laps(mut self, max_laps: u64) -> Self {
        self.max_laps = max_laps;
        self
    }

    pub fn with_lap_delay(mut self, lap_delay: Duration) -> Self {
        self.lap_delay = lap_delay;
        self
    }

    pub fn simulation(&self) -> &S {
        &self.simulation
    }

    pub fn into_inner(self) -> S {
        self.simulation
    }

    pub async fn run(&mut self, stop: &StopSignal) -> RaceSummary {
        tracing::info!(
            "🏎️ Running race (max {} laps, {:?} between laps)",
            self.max_laps,
            self.lap_delay
        );

        loop {
            if self.simulation.is_complete() {
                tracing::info!("🏆 Race complete after {} lap(s)", self.simulation.laps());
                return self.simulation.summary(RaceOutcome::Completed);
            }
            if stop.is_stopped() {
                tracing::warn!("🛑 Race cancelled at lap {}", self.simulation.laps());
                return self.simulation.summary(RaceOutcome::Cancelled);
            }
            if self.simulation.laps() >= self.max_laps {
                tracing::warn!(
                    "⚠️ Lap limit {} reached before all vehicles finished",
                    self.max_laps
                );
                return self.simulation.summary(RaceOutcome::LapLimitReached);
            }

            let report = self.simulation.step_lap();
            for model in &report.finished {
                tracing::info!("🏁 {} finished on lap {}", model, report.lap);
            }

            if self.lap_delay.is_zero() {
                tokio::task::yield_now().await;
            } else {
                tokio::time::sleep(self.lap_delay).await;
            }
        }
    }
}
