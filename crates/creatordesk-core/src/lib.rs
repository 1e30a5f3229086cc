//! # creatordesk Core Library
//!
//! Business logic behind the creatordesk booking dashboard. The dashboard's
//! calendar is not backed by an events table: every deadline, approval and
//! payout date is derived from the booking store on read.
//!
//! ## Architecture
//!
//! - **Domain**: read-only booking, deliverable and payment records
//! - **Source**: the [`RecordSource`] seam the engine reads through, with
//!   in-memory and SQLite implementations
//! - **Calendar**: status mappers, event synthesis, aggregation, statistics
//!   and the rescheduling gate
//! - **Storage**: SQLite record store and TOML configuration
//!
//! ## Key Components
//!
//! - [`CalendarEngine`]: fetch, synthesize, aggregate
//! - [`SqliteStore`]: persistent record store
//! - [`Config`]: application configuration management

pub mod calendar;
pub mod domain;
pub mod error;
pub mod events;
pub mod source;
pub mod storage;

pub use calendar::{
    CalendarConfig, CalendarEngine, CalendarEvent, CalendarStats, DateWindow, EventPriority,
    EventRef, EventStatus, EventType, Links, WindowPolicy,
};
pub use domain::{
    Booking, BookingStatus, Campaign, Creator, Deliverable, DeliverableStatus, Payment,
    PaymentStatus,
};
pub use error::{ConfigError, CoreError, DatabaseError, RescheduleError, ValidationError};
pub use events::CalendarNotice;
pub use source::{MemorySource, RecordSource};
pub use storage::{Config, SqliteStore};
