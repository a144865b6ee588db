//! Session timer
//!
//! A once-per-second clock that renews the access token ahead of expiry and
//! ends the session when the countdown reaches zero, independent of any API
//! traffic. Each tick's outcome is published on a `watch` channel for display.

use chrono::{DateTime, Duration, Utc};
use log::{debug, info};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::navigator::LogoutReason;
use super::refresh::Refresher;
use super::store::{SessionRecord, SessionStore};
use super::token;

const TICK: std::time::Duration = std::time::Duration::from_secs(1);

/// Where the timer's state machine currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    /// Nothing has been evaluated yet
    NoSession,
    /// Not hydrated, or no tokens to watch
    Idle,
    /// Seconds left until the earliest token expiry
    CountingDown { remaining_secs: i64 },
    /// A proactive refresh is in flight
    Refreshing,
    /// The timer ended the session
    LoggedOut,
}

pub struct SessionTimer {
    store: Arc<SessionStore>,
    refresher: Arc<Refresher>,
    refresh_ahead: Duration,
    state: watch::Sender<TimerState>,
}

impl SessionTimer {
    pub fn new(store: Arc<SessionStore>, refresher: Arc<Refresher>, refresh_ahead_secs: u64) -> Self {
        let (state, _) = watch::channel(TimerState::NoSession);
        Self {
            store,
            refresher,
            refresh_ahead: Duration::seconds(refresh_ahead_secs as i64),
            state,
        }
    }

    pub fn state(&self) -> TimerState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<TimerState> {
        self.state.subscribe()
    }

    /// Evaluate the session once at `now`
    pub async fn tick(&self, now: DateTime<Utc>) -> TimerState {
        let next = self.evaluate(now).await;
        self.publish(next);
        next
    }

    async fn evaluate(&self, now: DateTime<Utc>) -> TimerState {
        if !self.store.is_hydrated() {
            return TimerState::Idle;
        }

        let record = self.store.snapshot().await;
        if !record.has_tokens() {
            // Stay logged out until a new session shows up
            return match self.state() {
                TimerState::LoggedOut => TimerState::LoggedOut,
                _ => TimerState::Idle,
            };
        }

        let remaining = remaining_secs(&record, now);
        if remaining <= 0 {
            info!("Session expired");
            self.refresher.end_session(LogoutReason::Expired).await;
            return TimerState::LoggedOut;
        }

        // Nothing to renew with; the countdown itself ends the session
        if record.refresh_token.is_none() {
            return TimerState::CountingDown {
                remaining_secs: remaining,
            };
        }

        if !token::is_expired(record.access_token.as_deref(), now + self.refresh_ahead) {
            return TimerState::CountingDown {
                remaining_secs: remaining,
            };
        }

        self.publish(TimerState::Refreshing);
        debug!("Access token expiring, refreshing proactively");
        match self.refresher.refresh().await {
            Ok(_) => {
                let renewed = self.store.snapshot().await;
                TimerState::CountingDown {
                    remaining_secs: remaining_secs(&renewed, now),
                }
            }
            // Already cleared and redirected by the refresher
            Err(_) => TimerState::LoggedOut,
        }
    }

    fn publish(&self, next: TimerState) {
        self.state.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
    }

    /// Tick every second until the returned handle is dropped.
    ///
    /// Ticking starts once the store is hydrated.
    pub fn spawn(self: &Arc<Self>) -> TimerHandle {
        let timer = Arc::clone(self);
        let task = tokio::spawn(async move {
            timer.store.hydration_gate().wait().await;
            let mut interval = tokio::time::interval(TICK);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                timer.tick(Utc::now()).await;
            }
        });

        TimerHandle {
            task,
            states: self.subscribe(),
        }
    }
}

/// Seconds until the earliest expiry across both tokens, zero if neither decodes
fn remaining_secs(record: &SessionRecord, now: DateTime<Utc>) -> i64 {
    [
        token::expiration_instant(record.access_token.as_deref()),
        token::expiration_instant(record.refresh_token.as_deref()),
    ]
    .into_iter()
    .flatten()
    .min()
    .map(|exp| (exp - now).num_seconds().max(0))
    .unwrap_or(0)
}

/// Running timer. Dropping it stops the ticks.
pub struct TimerHandle {
    task: JoinHandle<()>,
    states: watch::Receiver<TimerState>,
}

impl TimerHandle {
    pub fn states(&self) -> watch::Receiver<TimerState> {
        self.states.clone()
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Render a countdown as `MM:SS`
pub fn format_countdown(remaining_secs: i64) -> String {
    let secs = remaining_secs.max(0);
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Whether the countdown should be shown as a warning
pub fn is_warning(remaining_secs: i64, warning_secs: u64) -> bool {
    remaining_secs < warning_secs as i64
}
