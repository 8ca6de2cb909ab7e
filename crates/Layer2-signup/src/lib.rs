//! # rollcall-signup
//!
//! Role sign-up and waitlist coordination for ad hoc events.
//!
//! ## Features
//!
//! - Fixed per-role capacities supplied once at event creation
//! - FIFO waitlists with automatic promotion when a slot frees up
//! - Switching roles releases the previous assignment first
//! - Per-event locking; effects (render, notify) run after the lock is released
//! - Deterministic board rendering

pub mod action;
pub mod coordinator;
pub mod event;
pub mod notifier;
pub mod registry;
pub mod render;
pub mod role;
pub mod service;
pub mod state;

// Core model
pub use action::{Action, InboundAction};
pub use event::{Capacities, EventConfig, EventDetails, EventId, UserId};
pub use role::Role;
pub use state::{Assignment, RegistrationState, Roster, SlotStatus};

// Transitions
pub use coordinator::{Effect, Outcome, PromotionNotice, Release, Transition};

// Rendering
pub use render::{DisplayModel, RoleField};

// Sinks
pub use notifier::{LogNotifier, NoopSink, PromotionNotifier, RecordingSink, RenderSink};

// Hosting
pub use registry::{Applied, EventHandle, Registry};
pub use service::SignupService;
