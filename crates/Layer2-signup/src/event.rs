//! Event identity and immutable event configuration

use crate::role::Role;
use chrono::{DateTime, Utc};
use rollcall_foundation::{Error, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum channel name length accepted by the chat platform
const CHANNEL_NAME_MAX: usize = 100;

/// Opaque identifier of one event (the registration post)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EventId(pub String);

impl EventId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a new random EventId
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Caller-supplied user identity, trusted as-is
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Platform mention markup
    pub fn mention(&self) -> String {
        format!("<@{}>", self.0)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

// ============================================================================
// Capacities
// ============================================================================

/// Per-role slot counts, fixed at event creation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capacities {
    pub tank: u32,
    pub healer: u32,
    pub dps: u32,
}

impl Capacities {
    pub fn new(tank: u32, healer: u32, dps: u32) -> Self {
        Self { tank, healer, dps }
    }

    pub fn get(&self, role: Role) -> u32 {
        match role {
            Role::Tank => self.tank,
            Role::Healer => self.healer,
            Role::Dps => self.dps,
        }
    }

    pub fn total(&self) -> u32 {
        Role::ALL.iter().map(|r| self.get(*r)).sum()
    }

    /// Check every role against the setup bound
    pub fn validate(&self, max: u32) -> Result<()> {
        for role in Role::ALL {
            let value = self.get(role);
            if value > max {
                return Err(Error::invalid_capacity(role.as_str(), value, max));
            }
        }
        Ok(())
    }
}

// ============================================================================
// Event Details
// ============================================================================

/// Descriptive data collected by the setup flow. Only used for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDetails {
    pub activity: String,
    pub difficulty: String,
    /// Free text, e.g. "2025-08-01 21:00"
    pub meet_time: String,
    pub note: Option<String>,
    /// Display name of the user who opened the event
    pub opener: String,
    pub created_at: DateTime<Utc>,
}

impl EventDetails {
    pub fn new(
        activity: impl Into<String>,
        difficulty: impl Into<String>,
        meet_time: impl Into<String>,
        opener: impl Into<String>,
    ) -> Self {
        Self {
            activity: activity.into(),
            difficulty: difficulty.into(),
            meet_time: meet_time.into(),
            note: None,
            opener: opener.into(),
            created_at: Utc::now(),
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        let note = note.into();
        self.note = if note.trim().is_empty() {
            None
        } else {
            Some(note.trim().to_string())
        };
        self
    }

    /// Post title, e.g. "📣 Hard | Blood Hall sign-up"
    pub fn title(&self) -> String {
        format!("📣 {} | {} sign-up", self.difficulty, self.activity)
    }

    /// Channel name derived from the meeting date, difficulty and activity
    pub fn channel_name(&self) -> String {
        let date = self.meet_time.split_whitespace().next().unwrap_or_default();
        let name = format!("🟢{}-{}{}", date, self.difficulty, self.activity);
        name.chars().take(CHANNEL_NAME_MAX).collect()
    }
}

impl Default for EventDetails {
    fn default() -> Self {
        Self::new("Activity", "Normal", "", "")
    }
}

/// Everything supplied once at event creation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventConfig {
    pub capacities: Capacities,
    pub details: EventDetails,
}

impl EventConfig {
    pub fn new(capacities: Capacities) -> Self {
        Self {
            capacities,
            details: EventDetails::default(),
        }
    }

    pub fn with_details(mut self, details: EventDetails) -> Self {
        self.details = details;
        self
    }

    /// Summary line, e.g. "Tank 1 / Healer 1 / DPS 2"
    pub fn summary(&self) -> String {
        Role::ALL
            .iter()
            .map(|r| format!("{} {}", r.display_name(), self.capacities.get(*r)))
            .collect::<Vec<_>>()
            .join(" / ")
    }
}
