//! Sign-up coordinator - the claim / switch / cancel transition logic
//!
//! Every function here is synchronous and touches only in-memory state. Callers
//! hold the per-event lock while applying and perform the returned effects after
//! releasing it.

use crate::action::Action;
use crate::event::UserId;
use crate::role::Role;
use crate::state::{Assignment, RegistrationState, SlotStatus};
use rollcall_foundation::{Error, Result, ZeroCapacityPolicy};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A waitlisted user moved into a freed slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromotionNotice {
    pub user_id: UserId,
    pub role: Role,
}

/// Side-effect requests produced by a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// State changed; the visible post should be re-rendered
    RenderUpdate,
    /// Best-effort direct notification to a promoted user
    Promotion(PromotionNotice),
}

/// What happened to a prior assignment during a switch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    pub previous: Assignment,
    pub promoted: Option<UserId>,
}

/// Result of applying one action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum Outcome {
    Accepted {
        role: Role,
        released: Option<Release>,
    },
    Waitlisted {
        role: Role,
        /// 1-based position in the waitlist
        position: usize,
        released: Option<Release>,
    },
    /// Already accepted into the requested role; nothing changed
    AlreadyAssigned { role: Role },
    /// Cancel without any assignment; nothing changed
    NotAssigned,
    Cancelled {
        previous: Assignment,
        promoted: Option<UserId>,
    },
}

impl Outcome {
    /// Whether the transition changed state
    pub fn is_mutation(&self) -> bool {
        !matches!(self, Outcome::AlreadyAssigned { .. } | Outcome::NotAssigned)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Outcome::Accepted { .. } => "Accepted",
            Outcome::Waitlisted { .. } => "Waitlisted",
            Outcome::AlreadyAssigned { .. } => "AlreadyAssigned",
            Outcome::NotAssigned => "NotAssigned",
            Outcome::Cancelled { .. } => "Cancelled",
        }
    }

    /// Short ephemeral reply for the acting user
    pub fn reply(&self) -> String {
        match self {
            Outcome::Accepted { role, .. } => format!("✅ You are signed up as **{}**!", role),
            Outcome::Waitlisted { role, position, .. } => format!(
                "⚠️ {} is full, you joined the waitlist (#{}).",
                role, position
            ),
            Outcome::AlreadyAssigned { role } => {
                format!("⚠️ You are already signed up as {}.", role)
            }
            Outcome::NotAssigned => "⚠️ You are not signed up for any role.".to_string(),
            Outcome::Cancelled { .. } => "✅ Your sign-up was cancelled.".to_string(),
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Outcome plus the side effects the caller must perform afterwards
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub outcome: Outcome,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn unchanged(outcome: Outcome) -> Self {
        Self {
            outcome,
            effects: Vec::new(),
        }
    }

    pub fn needs_render(&self) -> bool {
        self.effects.contains(&Effect::RenderUpdate)
    }

    pub fn promotions(&self) -> impl Iterator<Item = &PromotionNotice> {
        self.effects.iter().filter_map(|e| match e {
            Effect::Promotion(notice) => Some(notice),
            Effect::RenderUpdate => None,
        })
    }
}

// ============================================================================
// Transitions
// ============================================================================

/// Apply one action to the state
pub fn apply(state: &mut RegistrationState, user: &UserId, action: Action) -> Result<Transition> {
    match action {
        Action::ClaimRole(role) => claim_role(state, user, role),
        Action::Cancel => Ok(cancel(state, user)),
    }
}

/// Claim a slot in `role`, switching away from any prior assignment first
pub fn claim_role(state: &mut RegistrationState, user: &UserId, role: Role) -> Result<Transition> {
    if state.capacity(role) == 0 && state.zero_capacity_policy() == ZeroCapacityPolicy::Reject {
        return Err(Error::RoleClosed(role.as_str().to_string()));
    }

    let mut effects = Vec::new();
    let released = match state.assignment(user) {
        Some(current) if current == Assignment::accepted(role) => {
            return Ok(Transition::unchanged(Outcome::AlreadyAssigned { role }));
        }
        Some(_) => {
            let (previous, promoted) = release(state, user, &mut effects)
                .ok_or_else(|| Error::Internal(format!("{} vanished from index", user)))?;
            Some(Release { previous, promoted })
        }
        None => None,
    };

    let outcome = if state.has_vacancy(role) {
        state.push_accepted(role, user.clone());
        Outcome::Accepted { role, released }
    } else {
        let position = state.push_waitlisted(role, user.clone());
        Outcome::Waitlisted {
            role,
            position,
            released,
        }
    };

    debug!(user = %user, role = role.as_str(), outcome = %outcome, "Applied claim");
    effects.insert(0, Effect::RenderUpdate);
    Ok(Transition { outcome, effects })
}

/// Drop the user's assignment, promoting the head of the waitlist into a freed slot
pub fn cancel(state: &mut RegistrationState, user: &UserId) -> Transition {
    let mut effects = vec![Effect::RenderUpdate];
    match release(state, user, &mut effects) {
        Some((previous, promoted)) => {
            debug!(
                user = %user,
                role = previous.role.as_str(),
                promoted = ?promoted.as_ref().map(UserId::as_str),
                "Applied cancel"
            );
            Transition {
                outcome: Outcome::Cancelled { previous, promoted },
                effects,
            }
        }
        None => Transition::unchanged(Outcome::NotAssigned),
    }
}

/// Shared release procedure for cancel and switch
fn release(
    state: &mut RegistrationState,
    user: &UserId,
    effects: &mut Vec<Effect>,
) -> Option<(Assignment, Option<UserId>)> {
    let previous = state.remove(user)?;
    let promoted = match previous.status {
        SlotStatus::Accepted => state.promote_front(previous.role),
        SlotStatus::Waitlisted => None,
    };
    if let Some(promoted) = &promoted {
        effects.push(Effect::Promotion(PromotionNotice {
            user_id: promoted.clone(),
            role: previous.role,
        }));
    }
    Some((previous, promoted))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Capacities, EventConfig};

    fn state() -> RegistrationState {
        state_with(ZeroCapacityPolicy::Reject)
    }

    fn state_with(policy: ZeroCapacityPolicy) -> RegistrationState {
        RegistrationState::new(EventConfig::new(Capacities::new(1, 1, 2)), policy)
    }

    fn user(id: &str) -> UserId {
        UserId::from(id)
    }

    #[test]
    fn test_claim_then_waitlist() {
        let mut state = state();

        let t = claim_role(&mut state, &user("a"), Role::Tank).unwrap();
        assert!(matches!(t.outcome, Outcome::Accepted { role: Role::Tank, released: None }));
        assert!(t.needs_render());

        let t = claim_role(&mut state, &user("b"), Role::Tank).unwrap();
        assert!(matches!(t.outcome, Outcome::Waitlisted { position: 1, .. }));
        assert_eq!(state.waitlist(Role::Tank).iter().collect::<Vec<_>>(), vec![&user("b")]);
        assert!(state.check_invariants().is_ok());
    }

    #[test]
    fn test_reclaim_is_noop() {
        let mut state = state();
        claim_role(&mut state, &user("a"), Role::Tank).unwrap();
        let before = state.clone();

        let t = claim_role(&mut state, &user("a"), Role::Tank).unwrap();
        assert_eq!(t.outcome, Outcome::AlreadyAssigned { role: Role::Tank });
        assert!(t.effects.is_empty());
        assert_eq!(state, before);
    }

    #[test]
    fn test_cancel_promotes_front() {
        let mut state = state();
        claim_role(&mut state, &user("a"), Role::Tank).unwrap();
        claim_role(&mut state, &user("b"), Role::Tank).unwrap();
        claim_role(&mut state, &user("c"), Role::Tank).unwrap();

        let t = cancel(&mut state, &user("a"));
        assert_eq!(
            t.promotions().collect::<Vec<_>>(),
            vec![&PromotionNotice {
                user_id: user("b"),
                role: Role::Tank
            }]
        );
        assert_eq!(state.accepted(Role::Tank), &[user("b")]);
        assert_eq!(state.waitlist(Role::Tank).front(), Some(&user("c")));
        assert!(state.check_invariants().is_ok());
    }

    #[test]
    fn test_cancel_waitlisted_does_not_promote() {
        let mut state = state();
        claim_role(&mut state, &user("a"), Role::Tank).unwrap();
        claim_role(&mut state, &user("b"), Role::Tank).unwrap();

        let t = cancel(&mut state, &user("b"));
        assert!(matches!(
            t.outcome,
            Outcome::Cancelled { promoted: None, .. }
        ));
        assert_eq!(t.promotions().count(), 0);
        assert_eq!(state.accepted(Role::Tank), &[user("a")]);
    }

    #[test]
    fn test_cancel_unassigned() {
        let mut state = state();
        let t = cancel(&mut state, &user("nobody"));
        assert_eq!(t.outcome, Outcome::NotAssigned);
        assert!(!t.needs_render());
    }

    #[test]
    fn test_switch_releases_and_promotes() {
        let mut state = state();
        claim_role(&mut state, &user("f"), Role::Tank).unwrap();
        claim_role(&mut state, &user("g"), Role::Tank).unwrap();

        let t = claim_role(&mut state, &user("f"), Role::Healer).unwrap();
        match &t.outcome {
            Outcome::Accepted { role, released } => {
                assert_eq!(*role, Role::Healer);
                let released = released.as_ref().unwrap();
                assert_eq!(released.previous, Assignment::accepted(Role::Tank));
                assert_eq!(released.promoted, Some(user("g")));
            }
            other => panic!("unexpected outcome {:?}", other),
        }
        assert_eq!(t.promotions().count(), 1);
        assert_eq!(state.accepted(Role::Tank), &[user("g")]);
        assert_eq!(state.accepted(Role::Healer), &[user("f")]);
        assert!(state.check_invariants().is_ok());
    }

    #[test]
    fn test_waitlisted_reclaim_requeues_at_back() {
        let mut state = state();
        claim_role(&mut state, &user("a"), Role::Tank).unwrap();
        claim_role(&mut state, &user("b"), Role::Tank).unwrap();
        claim_role(&mut state, &user("c"), Role::Tank).unwrap();

        let t = claim_role(&mut state, &user("b"), Role::Tank).unwrap();
        assert!(matches!(t.outcome, Outcome::Waitlisted { position: 2, .. }));
        assert_eq!(
            state.waitlist(Role::Tank).iter().cloned().collect::<Vec<_>>(),
            vec![user("c"), user("b")]
        );
    }

    #[test]
    fn test_zero_capacity_rejected_without_release() {
        let mut state = RegistrationState::new(
            EventConfig::new(Capacities::new(1, 0, 2)),
            ZeroCapacityPolicy::Reject,
        );
        claim_role(&mut state, &user("a"), Role::Tank).unwrap();

        let err = claim_role(&mut state, &user("a"), Role::Healer).unwrap_err();
        assert!(matches!(err, Error::RoleClosed(_)));
        assert_eq!(state.assignment(&user("a")), Some(Assignment::accepted(Role::Tank)));
    }

    #[test]
    fn test_zero_capacity_waitlist_policy() {
        let mut state = RegistrationState::new(
            EventConfig::new(Capacities::new(1, 0, 2)),
            ZeroCapacityPolicy::Waitlist,
        );

        let t = claim_role(&mut state, &user("a"), Role::Healer).unwrap();
        assert!(matches!(t.outcome, Outcome::Waitlisted { role: Role::Healer, .. }));
        assert!(state.accepted(Role::Healer).is_empty());
        assert!(state.check_invariants().is_ok());
    }

    #[test]
    fn test_apply_dispatch() {
        let mut state = state_with(ZeroCapacityPolicy::Waitlist);
        let t = apply(&mut state, &user("c"), Action::ClaimRole(Role::Dps)).unwrap();
        assert!(t.outcome.is_mutation());

        let t = apply(&mut state, &user("c"), Action::Cancel).unwrap();
        assert!(matches!(t.outcome, Outcome::Cancelled { .. }));
        assert_eq!(t.outcome.reply(), "✅ Your sign-up was cancelled.");
    }
}
