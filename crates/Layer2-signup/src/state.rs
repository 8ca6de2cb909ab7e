//! Per-event registration state
//!
//! Accepted members and waitlists are ordered, duplicate-free sequences so that
//! rendering is deterministic and promotion is verifiably FIFO. The `index` is the
//! exact inverse of those sequences.

use crate::event::{Capacities, EventConfig, UserId};
use crate::role::Role;
use rollcall_foundation::ZeroCapacityPolicy;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};

/// Whether an assignment holds a slot or waits for one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotStatus {
    Accepted,
    Waitlisted,
}

/// A user's single current assignment within an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Assignment {
    pub role: Role,
    pub status: SlotStatus,
}

impl Assignment {
    pub fn accepted(role: Role) -> Self {
        Self {
            role,
            status: SlotStatus::Accepted,
        }
    }

    pub fn waitlisted(role: Role) -> Self {
        Self {
            role,
            status: SlotStatus::Waitlisted,
        }
    }

    pub fn is_accepted(&self) -> bool {
        self.status == SlotStatus::Accepted
    }
}

/// Accepted members and waitlist for one role
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    pub accepted: Vec<UserId>,
    pub waitlist: VecDeque<UserId>,
}

/// Registration state of one event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrationState {
    config: EventConfig,
    zero_capacity: ZeroCapacityPolicy,
    /// Indexed by [`Role::index`]
    rosters: [Roster; 3],
    index: HashMap<UserId, Assignment>,
}

impl RegistrationState {
    pub fn new(config: EventConfig, zero_capacity: ZeroCapacityPolicy) -> Self {
        Self {
            config,
            zero_capacity,
            rosters: Default::default(),
            index: HashMap::new(),
        }
    }

    pub fn config(&self) -> &EventConfig {
        &self.config
    }

    pub fn capacities(&self) -> &Capacities {
        &self.config.capacities
    }

    pub fn capacity(&self, role: Role) -> usize {
        self.config.capacities.get(role) as usize
    }

    pub fn zero_capacity_policy(&self) -> ZeroCapacityPolicy {
        self.zero_capacity
    }

    pub fn accepted(&self, role: Role) -> &[UserId] {
        &self.rosters[role.index()].accepted
    }

    pub fn waitlist(&self, role: Role) -> &VecDeque<UserId> {
        &self.rosters[role.index()].waitlist
    }

    pub fn roster(&self, role: Role) -> &Roster {
        &self.rosters[role.index()]
    }

    pub fn assignment(&self, user: &UserId) -> Option<Assignment> {
        self.index.get(user).copied()
    }

    pub fn has_vacancy(&self, role: Role) -> bool {
        self.accepted(role).len() < self.capacity(role)
    }

    /// Number of users holding any assignment
    pub fn member_count(&self) -> usize {
        self.index.len()
    }

    // ========================================================================
    // Primitive mutations (used by the coordinator only)
    // ========================================================================

    pub(crate) fn push_accepted(&mut self, role: Role, user: UserId) {
        debug_assert!(self.has_vacancy(role));
        self.index.insert(user.clone(), Assignment::accepted(role));
        self.rosters[role.index()].accepted.push(user);
    }

    /// Returns the 1-based waitlist position
    pub(crate) fn push_waitlisted(&mut self, role: Role, user: UserId) -> usize {
        self.index.insert(user.clone(), Assignment::waitlisted(role));
        let waitlist = &mut self.rosters[role.index()].waitlist;
        waitlist.push_back(user);
        waitlist.len()
    }

    /// Remove the user from wherever they are listed, returning the old assignment
    pub(crate) fn remove(&mut self, user: &UserId) -> Option<Assignment> {
        let assignment = self.index.remove(user)?;
        let roster = &mut self.rosters[assignment.role.index()];
        match assignment.status {
            SlotStatus::Accepted => roster.accepted.retain(|u| u != user),
            SlotStatus::Waitlisted => roster.waitlist.retain(|u| u != user),
        }
        Some(assignment)
    }

    /// Move the head of the role's waitlist into a free slot
    pub(crate) fn promote_front(&mut self, role: Role) -> Option<UserId> {
        if !self.has_vacancy(role) {
            return None;
        }
        let user = self.rosters[role.index()].waitlist.pop_front()?;
        self.index.insert(user.clone(), Assignment::accepted(role));
        self.rosters[role.index()].accepted.push(user.clone());
        Some(user)
    }

    // ========================================================================
    // Invariants
    // ========================================================================

    /// Check every structural invariant, returning a description of the first violation
    pub fn check_invariants(&self) -> Result<(), String> {
        let mut seen: HashMap<&UserId, Assignment> = HashMap::new();

        for role in Role::ALL {
            let roster = self.roster(role);
            if roster.accepted.len() > self.capacity(role) {
                return Err(format!(
                    "{} over capacity: {}/{}",
                    role,
                    roster.accepted.len(),
                    self.capacity(role)
                ));
            }

            let listed = roster
                .accepted
                .iter()
                .map(|u| (u, Assignment::accepted(role)))
                .chain(roster.waitlist.iter().map(|u| (u, Assignment::waitlisted(role))));
            for (user, assignment) in listed {
                if seen.insert(user, assignment).is_some() {
                    return Err(format!("{} listed more than once", user));
                }
            }
        }

        if seen.len() != self.index.len() {
            return Err(format!(
                "index has {} entries, sequences list {}",
                self.index.len(),
                seen.len()
            ));
        }
        for (user, assignment) in seen {
            if self.index.get(user) != Some(&assignment) {
                return Err(format!("index entry for {} does not match its listing", user));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> RegistrationState {
        RegistrationState::new(
            EventConfig::new(Capacities::new(1, 1, 2)),
            ZeroCapacityPolicy::Reject,
        )
    }

    #[test]
    fn test_new_state_is_empty() {
        let state = state();
        assert_eq!(state.member_count(), 0);
        assert!(state.has_vacancy(Role::Tank));
        assert!(state.check_invariants().is_ok());
    }

    #[test]
    fn test_remove_keeps_index_in_sync() {
        let mut state = state();
        state.push_accepted(Role::Dps, UserId::from("c"));
        state.push_waitlisted(Role::Tank, UserId::from("b"));

        assert_eq!(
            state.remove(&UserId::from("b")),
            Some(Assignment::waitlisted(Role::Tank))
        );
        assert!(state.waitlist(Role::Tank).is_empty());
        assert!(state.remove(&UserId::from("b")).is_none());
        assert!(state.check_invariants().is_ok());
    }

    #[test]
    fn test_promote_front_requires_vacancy() {
        let mut state = state();
        state.push_accepted(Role::Tank, UserId::from("a"));
        state.push_waitlisted(Role::Tank, UserId::from("b"));

        assert!(state.promote_front(Role::Tank).is_none());

        state.remove(&UserId::from("a"));
        assert_eq!(state.promote_front(Role::Tank), Some(UserId::from("b")));
        assert_eq!(state.accepted(Role::Tank), &[UserId::from("b")]);
        assert!(state.check_invariants().is_ok());
    }

    #[test]
    fn test_invariant_violation_detected() {
        let mut state = state();
        state.push_accepted(Role::Tank, UserId::from("a"));
        state.rosters[Role::Dps.index()].waitlist.push_back(UserId::from("a"));

        assert!(state.check_invariants().is_err());
    }
}
