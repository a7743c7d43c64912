//! Drives a [`Session`] in real time.
//!
//! The controller owns the session together with its collaborators behind a
//! single async mutex, so a tick and a user action can never interleave. The
//! periodic tick is one tokio task; arming replaces any previous task, and
//! the task ends by itself once the session goes idle (break over, automatic
//! record).

use std::sync::Arc;
use std::time::Duration;

use tokio::{
    sync::Mutex,
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};
use tracing::{debug, error, info};

use crate::effects::Effect;
use crate::entry::{ClearOutcome, Entry, EntryLog, CLEAR_MESSAGE, CLEAR_TITLE};
use crate::error::Result;
use crate::sinks::{dispatch, Confirm, CueSink, DisplaySink};
use crate::timer::{Clock, Mode, MonotonicClock, Session, SessionSnapshot};

struct Inner<C: Clock> {
    session: Session<C>,
    log: Box<dyn EntryLog>,
    display: Box<dyn DisplaySink>,
    cues: Box<dyn CueSink>,
}

impl<C: Clock> Inner<C> {
    fn apply(&mut self, effects: &[Effect]) {
        dispatch(effects, self.display.as_mut(), self.cues.as_mut());
    }

    fn tick(&mut self) {
        let effects = self.session.tick();
        self.apply(&effects);
        if effects.contains(&Effect::TriggerAutoRecord) {
            // Nobody to hand an error to from inside the tick, and the
            // session has to stop either way.
            if let Err(e) = self.record() {
                error!("automatic record failed: {e}");
                let effects = self.session.cancel();
                self.apply(&effects);
            }
        }
    }

    /// Store the entry, then reset. A failed append leaves the session as it
    /// was so the user can retry.
    fn record(&mut self) -> Result<Entry> {
        let entry = self.session.finalize()?;
        self.log.append(&entry)?;
        info!(id = %entry.id, total = %entry.total_task_time, "entry stored");
        let effects = self.session.cancel();
        self.apply(&effects);
        Ok(entry)
    }
}

pub struct FocusController<C: Clock + 'static = MonotonicClock> {
    inner: Arc<Mutex<Inner<C>>>,
    ticker: Arc<Mutex<Option<JoinHandle<()>>>>,
    tick_period: Duration,
}

impl<C: Clock + 'static> Clone for FocusController<C> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            ticker: self.ticker.clone(),
            tick_period: self.tick_period,
        }
    }
}

impl<C: Clock + 'static> FocusController<C> {
    pub fn new(
        session: Session<C>,
        log: impl EntryLog + 'static,
        display: impl DisplaySink + 'static,
        cues: impl CueSink + 'static,
    ) -> Self {
        let tick_period = session.scale().tick_period();
        Self {
            inner: Arc::new(Mutex::new(Inner {
                session,
                log: Box::new(log),
                display: Box::new(display),
                cues: Box::new(cues),
            })),
            ticker: Arc::new(Mutex::new(None)),
            tick_period,
        }
    }

    pub fn tick_period(&self) -> Duration {
        self.tick_period
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.inner.lock().await.session.snapshot()
    }

    pub async fn mode(&self) -> Mode {
        self.inner.lock().await.session.mode()
    }

    pub async fn set_reference(&self, reference: impl Into<String>) {
        self.inner.lock().await.session.set_reference(reference);
    }

    pub async fn start(&self) -> SessionSnapshot {
        let snapshot = {
            let mut inner = self.inner.lock().await;
            let effects = inner.session.start();
            inner.apply(&effects);
            inner.session.snapshot()
        };
        self.spawn_ticker().await;
        snapshot
    }

    pub async fn pause(&self) -> SessionSnapshot {
        let (snapshot, on_break) = {
            let mut inner = self.inner.lock().await;
            let effects = inner.session.pause();
            inner.apply(&effects);
            (inner.session.snapshot(), inner.session.mode() == Mode::OnBreak)
        };
        if on_break {
            self.spawn_ticker().await;
        }
        snapshot
    }

    pub async fn cancel(&self) -> SessionSnapshot {
        self.cancel_ticker().await;
        let mut inner = self.inner.lock().await;
        let effects = inner.session.cancel();
        inner.apply(&effects);
        inner.session.snapshot()
    }

    /// Record the session and append it to the entry log.
    ///
    /// # Errors
    /// `InvalidRecord` when nothing has been tracked, or the entry log's own
    /// failure. Either way nothing changes and the tick keeps running.
    pub async fn record(&self) -> Result<Entry> {
        let mut inner = self.inner.lock().await;
        let entry = inner.record()?;
        self.cancel_ticker().await;
        Ok(entry)
    }

    pub async fn entries(&self) -> Result<Vec<Entry>> {
        self.inner.lock().await.log.all()
    }

    /// Same flow as [`crate::entry::clear_entries`], but the session keeps
    /// ticking while the question is open.
    pub async fn clear_entries<F: Confirm + ?Sized>(&self, confirm: &F) -> Result<ClearOutcome> {
        if self.inner.lock().await.log.is_empty()? {
            return Ok(ClearOutcome::AlreadyEmpty);
        }
        if !confirm.confirm(CLEAR_TITLE, CLEAR_MESSAGE).await {
            return Ok(ClearOutcome::Declined);
        }
        self.inner.lock().await.log.clear()?;
        info!("entry log cleared");
        Ok(ClearOutcome::Cleared)
    }

    /// Whether a tick task is alive.
    pub async fn is_ticking(&self) -> bool {
        self.ticker
            .lock()
            .await
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    async fn spawn_ticker(&self) {
        let mut ticker_guard = self.ticker.lock().await;
        if let Some(handle) = ticker_guard.take() {
            handle.abort();
        }

        let inner = self.inner.clone();
        let period = self.tick_period;

        let handle = tokio::spawn(async move {
            let mut interval = time::interval_at(time::Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;

                let mut guard = inner.lock().await;
                if guard.session.mode() == Mode::Idle {
                    break;
                }
                guard.tick();
                if guard.session.mode() == Mode::Idle {
                    debug!("session idle, ticker stopping");
                    break;
                }
            }
        });

        *ticker_guard = Some(handle);
    }

    async fn cancel_ticker(&self) {
        if let Some(handle) = self.ticker.lock().await.take() {
            handle.abort();
        }
    }
}
