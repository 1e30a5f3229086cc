//! Calendar engine: fetch, synthesize, aggregate.
//!
//! Each call is an independent read-compute-return pipeline. The three record
//! fetches run concurrently under a timeout; a fetch that fails or times out
//! contributes no events and a warning, never an error.

use std::future::Future;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::aggregate::{self, RecordSet};
use super::event::CalendarEvent;
use super::reschedule::{self, RescheduleTarget};
use super::stats::{self, CalendarStats};
use super::synth::{Links, SynthesisContext};
use super::window::DateWindow;
use crate::error::{ConfigError, Result};
use crate::events::CalendarNotice;
use crate::source::RecordSource;

const NOTICE_CAPACITY: usize = 64;

/// Largest accepted `stats_window_days` / `due_soon_days`.
pub const MAX_WINDOW_DAYS: i64 = 3_650;

/// Which timestamp a requested date window applies to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowPolicy {
    /// Push the window down to the store and filter on each record's own
    /// timestamp (booking `created_at`, deliverable/payment `due_date`).
    /// A booking created before the window whose projected deadline falls
    /// inside it is excluded.
    #[default]
    SourceTimestamp,
    /// Fetch everything and keep events whose derived `start_date` falls in
    /// the window.
    EventStart,
}

/// Engine tuning, stored under `[calendar]` in config.toml.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarConfig {
    /// Upper bound on each record fetch.
    #[serde(default = "default_fetch_timeout_ms")]
    pub fetch_timeout_ms: u64,
    /// Default stats window length from now.
    #[serde(default = "default_stats_window_days")]
    pub stats_window_days: i64,
    /// Horizon for the "due this week" count.
    #[serde(default = "default_due_soon_days")]
    pub due_soon_days: i64,
    #[serde(default)]
    pub window_policy: WindowPolicy,
    #[serde(default = "default_true")]
    pub include_payments: bool,
}

fn default_fetch_timeout_ms() -> u64 {
    5_000
}
fn default_stats_window_days() -> i64 {
    30
}
fn default_due_soon_days() -> i64 {
    7
}
fn default_true() -> bool {
    true
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_ms: default_fetch_timeout_ms(),
            stats_window_days: default_stats_window_days(),
            due_soon_days: default_due_soon_days(),
            window_policy: WindowPolicy::default(),
            include_payments: true,
        }
    }
}

impl CalendarConfig {
    pub fn fetch_timeout(&self) -> StdDuration {
        StdDuration::from_millis(self.fetch_timeout_ms)
    }

    /// Reject values the engine cannot work with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for a zero timeout or a day count
    /// outside `1..=MAX_WINDOW_DAYS`.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        check_days("calendar.stats_window_days", self.stats_window_days)?;
        check_days("calendar.due_soon_days", self.due_soon_days)?;
        if self.fetch_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "calendar.fetch_timeout_ms".into(),
                message: "must be greater than 0".into(),
            });
        }
        Ok(())
    }
}

fn check_days(key: &str, days: i64) -> std::result::Result<(), ConfigError> {
    if (1..=MAX_WINDOW_DAYS).contains(&days) {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            key: key.into(),
            message: format!("expected 1..={MAX_WINDOW_DAYS} days, got {days}"),
        })
    }
}

/// Derives calendar events from a [`RecordSource`].
pub struct CalendarEngine<S> {
    source: S,
    config: CalendarConfig,
    links: Links,
    notices: broadcast::Sender<CalendarNotice>,
}

impl<S: RecordSource> CalendarEngine<S> {
    pub fn new(source: S, config: CalendarConfig) -> Self {
        let (notices, _) = broadcast::channel(NOTICE_CAPACITY);
        Self {
            source,
            config,
            links: Links::relative(),
            notices,
        }
    }

    pub fn with_links(mut self, links: Links) -> Self {
        self.links = links;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn config(&self) -> &CalendarConfig {
        &self.config
    }

    /// Receive a notice after every successful source write.
    pub fn subscribe(&self) -> broadcast::Receiver<CalendarNotice> {
        self.notices.subscribe()
    }

    /// Events for `window`, synthesized as of the current time.
    pub async fn get_calendar_events(&self, window: DateWindow) -> Result<Vec<CalendarEvent>> {
        self.events_at(window, Utc::now()).await
    }

    /// Events for `window`, synthesized as of `now`.
    ///
    /// Identical records and `now` always produce identical output.
    pub async fn events_at(
        &self,
        window: DateWindow,
        now: DateTime<Utc>,
    ) -> Result<Vec<CalendarEvent>> {
        window.validate()?;

        let pushdown = match self.config.window_policy {
            WindowPolicy::SourceTimestamp => window,
            WindowPolicy::EventStart => DateWindow::unbounded(),
        };
        let records = self.fetch_records(&pushdown).await;
        let ctx = SynthesisContext::new(now, &self.links);
        let mut events = aggregate::synthesize_all(&records, &ctx);

        if self.config.window_policy == WindowPolicy::EventStart {
            events.retain(|e| window.contains(e.start_date));
        }

        tracing::debug!(
            bookings = records.bookings.len(),
            deliverables = records.deliverables.len(),
            payments = records.payments.len(),
            events = events.len(),
            "synthesized calendar events"
        );
        Ok(events)
    }

    /// Stats over `window`, defaulting to `[now, now + stats_window_days]`.
    ///
    /// If only an `end` before `now` is given, the window starts at `end`
    /// instead of `now`, so a past cut-off yields empty stats rather than an
    /// inverted-range error.
    pub async fn get_calendar_stats(&self, window: DateWindow) -> Result<CalendarStats> {
        self.stats_at(window, Utc::now()).await
    }

    pub async fn stats_at(&self, window: DateWindow, now: DateTime<Utc>) -> Result<CalendarStats> {
        let anchor = window.end.map_or(now, |end| end.min(now));
        let window = window.or(DateWindow::days_from(anchor, self.config.stats_window_days)?);
        let events = self.events_at(window, now).await?;
        Ok(stats::compute_stats(&events, now, self.config.due_soon_days))
    }

    /// Move a deliverable's due date and notify listeners.
    pub async fn update_deliverable_due_date(
        &self,
        deliverable_id: &str,
        due_date: DateTime<Utc>,
    ) -> Result<()> {
        let updated_at = Utc::now();
        self.source
            .update_deliverable_due_date(deliverable_id, due_date, updated_at)
            .await?;

        tracing::info!(deliverable_id, %due_date, "deliverable due date updated");
        // No receivers is fine: nothing is caching derived events.
        let _ = self.notices.send(CalendarNotice::DeliverableRescheduled {
            deliverable_id: deliverable_id.to_string(),
            due_date,
            at: updated_at,
        });
        Ok(())
    }

    /// Reschedule an event by id.
    ///
    /// Deliverable events move their deliverable's due date. All other kinds
    /// return `RescheduleError::Unsupported`. A supplied end date is checked
    /// against the start but not stored.
    pub async fn reschedule_event(
        &self,
        event_id: &str,
        new_start: DateTime<Utc>,
        new_end: Option<DateTime<Utc>>,
    ) -> Result<()> {
        match reschedule::plan_reschedule(event_id, new_start, new_end)? {
            RescheduleTarget::DeliverableDueDate {
                deliverable_id,
                due_date,
            } => {
                if new_end.is_some() {
                    tracing::debug!(event_id, "ignoring end date on deliverable reschedule");
                }
                self.update_deliverable_due_date(&deliverable_id, due_date)
                    .await
            }
        }
    }

    async fn fetch_records(&self, window: &DateWindow) -> RecordSet {
        let payments = async {
            if self.config.include_payments {
                self.fetch_or_empty("payments", self.source.fetch_payments(window))
                    .await
            } else {
                Vec::new()
            }
        };

        let (bookings, deliverables, payments) = tokio::join!(
            self.fetch_or_empty("bookings", self.source.fetch_bookings(window)),
            self.fetch_or_empty("deliverables", self.source.fetch_deliverables(window)),
            payments,
        );

        RecordSet {
            bookings,
            deliverables,
            payments,
        }
    }

    async fn fetch_or_empty<T, F>(&self, kind: &'static str, fetch: F) -> Vec<T>
    where
        F: Future<Output = Result<Vec<T>>>,
    {
        match tokio::time::timeout(self.config.fetch_timeout(), fetch).await {
            Ok(Ok(records)) => records,
            Ok(Err(e)) => {
                tracing::warn!(kind, error = %e, "record fetch failed, treating as empty");
                Vec::new()
            }
            Err(_) => {
                tracing::warn!(
                    kind,
                    timeout_ms = self.config.fetch_timeout_ms,
                    "record fetch timed out, treating as empty"
                );
                Vec::new()
            }
        }
    }
}
