//! Inbound actions from the chat-platform glue

use crate::event::{EventId, UserId};
use crate::role::Role;
use rollcall_foundation::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Button custom id that cancels a sign-up
pub const CANCEL_CUSTOM_ID: &str = "cancel-signup";

/// Prefix of the role buttons ("join-tank", "join-heal", "join-dps")
pub const JOIN_PREFIX: &str = "join-";

/// A mutation requested by one user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "role")]
pub enum Action {
    ClaimRole(Role),
    Cancel,
}

impl Action {
    /// Map a button custom id to an action
    pub fn from_custom_id(custom_id: &str) -> Result<Self> {
        if custom_id == CANCEL_CUSTOM_ID {
            return Ok(Action::Cancel);
        }
        match custom_id.strip_prefix(JOIN_PREFIX) {
            Some(role) => Ok(Action::ClaimRole(role.parse()?)),
            None => Err(Error::InvalidAction(format!(
                "unrecognized custom id '{}'",
                custom_id
            ))),
        }
    }

    /// The custom id of the button that triggers this action
    pub fn custom_id(&self) -> String {
        match self {
            Action::ClaimRole(role) => format!("{}{}", JOIN_PREFIX, role.as_str()),
            Action::Cancel => CANCEL_CUSTOM_ID.to_string(),
        }
    }
}

impl FromStr for Action {
    type Err = Error;

    /// Accepts button custom ids as well as `claim:<role>` and `cancel`
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("cancel") {
            return Ok(Action::Cancel);
        }
        if let Some(role) = s.strip_prefix("claim:") {
            return Ok(Action::ClaimRole(role.parse()?));
        }
        Action::from_custom_id(s)
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::ClaimRole(role) => write!(f, "claim {}", role.as_str()),
            Action::Cancel => write!(f, "cancel"),
        }
    }
}

/// `{eventId, userId, action}` as delivered by the dispatch layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundAction {
    pub event_id: EventId,
    pub user_id: UserId,
    pub action: Action,
}

impl InboundAction {
    pub fn new(event_id: EventId, user_id: UserId, action: Action) -> Self {
        Self {
            event_id,
            user_id,
            action,
        }
    }

    pub fn claim(event_id: EventId, user_id: UserId, role: Role) -> Self {
        Self::new(event_id, user_id, Action::ClaimRole(role))
    }

    pub fn cancel(event_id: EventId, user_id: UserId) -> Self {
        Self::new(event_id, user_id, Action::Cancel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_custom_id() {
        assert_eq!(
            Action::from_custom_id("join-tank").unwrap(),
            Action::ClaimRole(Role::Tank)
        );
        assert_eq!(
            Action::from_custom_id("join-heal").unwrap(),
            Action::ClaimRole(Role::Healer)
        );
        assert_eq!(
            Action::from_custom_id("cancel-signup").unwrap(),
            Action::Cancel
        );
    }

    #[test]
    fn test_malformed_custom_id() {
        assert!(matches!(
            Action::from_custom_id("join-bard"),
            Err(Error::InvalidAction(_))
        ));
        assert!(matches!(
            Action::from_custom_id("select-activity"),
            Err(Error::InvalidAction(_))
        ));
    }

    #[test]
    fn test_from_str_forms() {
        assert_eq!("claim:dps".parse::<Action>().unwrap(), Action::ClaimRole(Role::Dps));
        assert_eq!("CANCEL".parse::<Action>().unwrap(), Action::Cancel);
        assert_eq!("join-dps".parse::<Action>().unwrap(), Action::ClaimRole(Role::Dps));
    }

    #[test]
    fn test_custom_id_parses_back() {
        for action in [
            Action::ClaimRole(Role::Tank),
            Action::ClaimRole(Role::Healer),
            Action::Cancel,
        ] {
            assert_eq!(Action::from_custom_id(&action.custom_id()).unwrap(), action);
        }
    }
}
