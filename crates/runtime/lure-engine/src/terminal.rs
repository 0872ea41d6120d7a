//! Async terminal front
//!
//! Wraps the engine in a `tokio::sync::Mutex`. The lock is held across the
//! realism delay so concurrent submissions are processed in arrival order.
//! The delay and classification run on a spawned task that owns the guard,
//! so a caller that stops waiting still gets its command classified.

use std::ops::RangeInclusive;
use std::sync::Arc;
use std::time::Duration;

use lure_config::LureConfig;
use rand::Rng;
use tokio::sync::Mutex;
use tracing::warn;

use crate::engine::{CommandReport, DecoyEngine};
use crate::ui::DesktopUi;

pub struct DecoyTerminal<U: DesktopUi> {
    engine: Arc<Mutex<DecoyEngine<U>>>,
    delay_ms: RangeInclusive<u64>,
}

impl<U: DesktopUi + 'static> DecoyTerminal<U> {
    /// Delay range taken from the engine's config
    pub fn new(engine: DecoyEngine<U>) -> Self {
        let delay_ms = delay_range(engine.config());
        Self::with_delay(engine, delay_ms)
    }

    pub fn with_delay(engine: DecoyEngine<U>, delay_ms: RangeInclusive<u64>) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
            delay_ms,
        }
    }

    /// No delay; for tests and scripted replays
    pub fn immediate(engine: DecoyEngine<U>) -> Self {
        Self::with_delay(engine, 0..=0)
    }

    /// Record, wait a human-looking moment, then classify and respond
    pub async fn submit(&self, raw: &str) -> CommandReport {
        let mut engine = self.engine.clone().lock_owned().await;
        let Some(submission) = engine.begin(raw) else {
            return CommandReport::ignored();
        };

        let delay = self.pick_delay();
        let task = tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            engine.complete(submission)
        });

        match task.await {
            Ok(report) => report,
            Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
            Err(e) => {
                warn!(error = %e, "command task did not finish");
                CommandReport::ignored()
            }
        }
    }

    /// Run `f` with exclusive access to the engine
    pub async fn with_engine<R>(&self, f: impl FnOnce(&mut DecoyEngine<U>) -> R) -> R {
        let mut engine = self.engine.lock().await;
        f(&mut engine)
    }

    /// `None` while a detached submission still holds the engine
    pub fn into_inner(self) -> Option<DecoyEngine<U>> {
        Arc::try_unwrap(self.engine).ok().map(Mutex::into_inner)
    }

    fn pick_delay(&self) -> Duration {
        let (min, max) = (*self.delay_ms.start(), *self.delay_ms.end());
        if max == 0 || min > max {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::thread_rng().gen_range(min..=max))
    }
}

fn delay_range(config: &LureConfig) -> RangeInclusive<u64> {
    config.delay_min_ms..=config.delay_max_ms
}
