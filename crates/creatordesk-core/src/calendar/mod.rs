//! Calendar event derivation and prioritization.
//!
//! Bookings, deliverables and payments have no event rows of their own.
//! This module projects them into a single time-ordered list of
//! [`CalendarEvent`]s whose status, priority and color are recomputed from
//! record state and the current time on every read.

pub mod aggregate;
pub mod engine;
pub mod event;
pub mod mapping;
pub mod reschedule;
pub mod stats;
pub mod synth;
pub mod window;

pub use aggregate::{synthesize_all, RecordSet};
pub use engine::{CalendarConfig, CalendarEngine, WindowPolicy};
pub use event::{CalendarEvent, EventPriority, EventRef, EventStatus, EventType};
pub use reschedule::{plan_reschedule, RescheduleTarget};
pub use stats::{compute_stats, CalendarStats};
pub use synth::{Links, SynthesisContext};
pub use window::DateWindow;
