use std::time::Duration;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

/// Periodic trigger for automatic ticks.
///
/// The owner awaits [`Ticker::tick`] and then runs one simulation tick
/// inline, so a tick can never start while the previous one is running.
/// Firings missed during a slow tick are skipped, not queued.
pub struct Ticker {
    interval: Option<Interval>,
    period: Duration,
}

impl Ticker {
    pub fn new(period: Duration) -> Self {
        Self {
            interval: None,
            period,
        }
    }

    pub fn is_running(&self) -> bool {
        self.interval.is_some()
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Begin firing every `period`, first firing one period from now
    pub fn start(&mut self) {
        let mut interval = interval_at(Instant::now() + self.period, self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        self.interval = Some(interval);
        tracing::info!("Ticker started ({} ms)", self.period.as_millis());
    }

    pub fn stop(&mut self) {
        if self.interval.take().is_some() {
            tracing::info!("Ticker stopped");
        }
    }

    /// Change the period; a running ticker restarts on the new schedule
    pub fn set_period(&mut self, period: Duration) {
        if period == self.period {
            return;
        }
        self.period = period;
        if self.is_running() {
            self.start();
        }
    }

    /// Resolve at the next firing. Never resolves while stopped.
    pub async fn tick(&mut self) {
        match self.interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
            }
            None => std::future::pending::<()>().await,
        }
    }
}
