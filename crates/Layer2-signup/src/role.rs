//! Role definitions

use rollcall_foundation::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A capacity-bounded assignment category within an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Tank,
    Healer,
    Dps,
}

impl Role {
    /// All roles in display order
    pub const ALL: [Role; 3] = [Role::Tank, Role::Healer, Role::Dps];

    /// Position in [`Role::ALL`]
    pub fn index(self) -> usize {
        match self {
            Role::Tank => 0,
            Role::Healer => 1,
            Role::Dps => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Tank => "tank",
            Role::Healer => "healer",
            Role::Dps => "dps",
        }
    }

    /// Get display name for the role
    pub fn display_name(&self) -> &'static str {
        match self {
            Role::Tank => "Tank",
            Role::Healer => "Healer",
            Role::Dps => "DPS",
        }
    }

    /// Get a symbol for the role (for the sign-up board)
    pub fn symbol(&self) -> &'static str {
        match self {
            Role::Tank => "🛡️",
            Role::Healer => "💊",
            Role::Dps => "🗡️",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tank" => Ok(Role::Tank),
            "healer" | "heal" => Ok(Role::Healer),
            "dps" => Ok(Role::Dps),
            other => Err(Error::InvalidAction(format!("unknown role '{}'", other))),
        }
    }
}
