//! Sign-up board rendering
//!
//! A pure projection of [`RegistrationState`]: identical states always render
//! identically.

use crate::event::UserId;
use crate::role::Role;
use crate::state::RegistrationState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body text of a role with no accepted members
pub const EMPTY_PLACEHOLDER: &str = "(no sign-ups yet)";

/// Prefix of the waitlist line under a role
pub const WAITLIST_PREFIX: &str = "🔁 Waitlist: ";

/// Longest note shown on the board, in characters (embed field limit)
pub const NOTE_MAX_CHARS: usize = 1024;

/// One role column of the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleField {
    pub role: Role,
    pub accepted: Vec<UserId>,
    pub waitlist: Vec<UserId>,
    pub capacity: u32,
}

impl RoleField {
    /// e.g. "🛡️ Tank (1/2)"
    pub fn header(&self) -> String {
        format!(
            "{} {} ({}/{})",
            self.role.symbol(),
            self.role.display_name(),
            self.accepted.len(),
            self.capacity
        )
    }

    /// Accepted members one per line, then the waitlist line if non-empty
    pub fn body(&self) -> String {
        let mut body = if self.accepted.is_empty() {
            EMPTY_PLACEHOLDER.to_string()
        } else {
            self.accepted
                .iter()
                .map(UserId::mention)
                .collect::<Vec<_>>()
                .join("\n")
        };

        if !self.waitlist.is_empty() {
            let queued = self
                .waitlist
                .iter()
                .map(UserId::mention)
                .collect::<Vec<_>>()
                .join(", ");
            body.push('\n');
            body.push_str(WAITLIST_PREFIX);
            body.push_str(&queued);
        }
        body
    }
}

/// Everything the formatting glue needs to update the visible post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayModel {
    pub title: String,
    pub description: String,
    pub fields: Vec<RoleField>,
    pub note: Option<String>,
    pub footer: String,
    pub timestamp: DateTime<Utc>,
    /// Event revision this board was taken at. Zero for a board rendered outside the registry.
    #[serde(default)]
    pub revision: u64,
}

impl DisplayModel {
    pub fn field(&self, role: Role) -> Option<&RoleField> {
        self.fields.iter().find(|f| f.role == role)
    }

    /// Plain-text board
    pub fn to_text(&self) -> String {
        let mut out = format!("{}\n{}\n", self.title, self.description);
        for field in &self.fields {
            out.push('\n');
            out.push_str(&field.header());
            out.push('\n');
            out.push_str(&field.body());
            out.push('\n');
        }
        if let Some(note) = &self.note {
            out.push_str(&format!("\n📝 Note\n{}\n", note));
        }
        out.push_str(&format!("\n{}\n", self.footer));
        out
    }
}

/// Render the current state
pub fn render(state: &RegistrationState) -> DisplayModel {
    let config = state.config();
    let details = &config.details;

    let fields = Role::ALL
        .iter()
        .map(|&role| {
            let roster = state.roster(role);
            RoleField {
                role,
                accepted: roster.accepted.clone(),
                waitlist: roster.waitlist.iter().cloned().collect(),
                capacity: state.capacities().get(role),
            }
        })
        .collect();

    DisplayModel {
        title: details.title(),
        description: format!(
            "🕙 Meet: **{}**\n👥 Roles: **{}**",
            details.meet_time,
            config.summary()
        ),
        fields,
        note: details
            .note
            .as_ref()
            .map(|note| note.chars().take(NOTE_MAX_CHARS).collect()),
        footer: format!("Opened by {}", details.opener),
        timestamp: details.created_at,
        revision: 0,
    }
}
