//! Event registry - event id → per-event registration state
//!
//! The id map sits behind one `RwLock` and is only held long enough to look up or
//! insert an entry. Each event's state sits behind its own `Mutex`, so operations
//! on different events never contend. Neither lock is held across `.await`, and no
//! operation takes a second lock while holding the first.
//!
//! Every state change bumps the event's revision. Board pushes go through a separate
//! async gate per event that remembers the last pushed revision, so a slow push can
//! never land after a newer board.

use crate::action::Action;
use crate::coordinator::{self, Outcome, PromotionNotice};
use crate::event::{EventConfig, EventId, UserId};
use crate::render::{self, DisplayModel};
use crate::state::RegistrationState;
use parking_lot::{Mutex, RwLock};
use rollcall_foundation::{Error, Result, ZeroCapacityPolicy};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, info};

/// Result of one action, ready to be acted on outside the lock
#[derive(Debug, Clone)]
pub struct Applied {
    pub outcome: Outcome,
    /// Revision after the action. Unchanged for no-op outcomes.
    pub revision: u64,
    /// Snapshot taken inside the critical section, present when state changed
    pub display: Option<DisplayModel>,
    pub promotions: Vec<PromotionNotice>,
}

struct Slot {
    state: RegistrationState,
    revision: u64,
    closed: bool,
}

impl Slot {
    fn display(&self) -> DisplayModel {
        let mut display = render::render(&self.state);
        display.revision = self.revision;
        display
    }
}

/// One event's state and its exclusive lock
pub struct EventHandle {
    id: EventId,
    slot: Mutex<Slot>,
    /// Last revision handed to the render sink. Only taken outside `slot`.
    pushed: AsyncMutex<Option<u64>>,
}

impl EventHandle {
    fn new(id: EventId, state: RegistrationState) -> Self {
        Self {
            id,
            slot: Mutex::new(Slot {
                state,
                revision: 0,
                closed: false,
            }),
            pushed: AsyncMutex::new(None),
        }
    }

    pub fn id(&self) -> &EventId {
        &self.id
    }

    /// Apply an action under the event lock
    pub fn apply(&self, user: &UserId, action: Action) -> Result<Applied> {
        let mut slot = self.slot.lock();
        if slot.closed {
            return Err(Error::UnknownEvent(self.id.to_string()));
        }

        let transition = coordinator::apply(&mut slot.state, user, action)?;
        let display = if transition.needs_render() {
            slot.revision += 1;
            Some(slot.display())
        } else {
            None
        };
        let promotions = transition.promotions().cloned().collect();

        debug_assert!(slot.state.check_invariants().is_ok());
        Ok(Applied {
            outcome: transition.outcome,
            revision: slot.revision,
            display,
            promotions,
        })
    }

    /// Render the current state
    pub fn snapshot(&self) -> Result<DisplayModel> {
        let slot = self.slot.lock();
        if slot.closed {
            return Err(Error::UnknownEvent(self.id.to_string()));
        }
        Ok(slot.display())
    }

    pub fn revision(&self) -> u64 {
        self.slot.lock().revision
    }

    /// Run `push` for `display` unless a board at the same or a newer revision
    /// already went out. Pushes for one event never overlap.
    ///
    /// Returns false when the board was stale and skipped.
    pub async fn publish<F, Fut>(&self, display: &DisplayModel, push: F) -> bool
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = ()>,
    {
        let mut pushed = self.pushed.lock().await;
        if matches!(*pushed, Some(last) if last >= display.revision) {
            return false;
        }
        push().await;
        *pushed = Some(display.revision);
        true
    }

    /// Clone of the current state
    pub fn state(&self) -> RegistrationState {
        self.slot.lock().state.clone()
    }

    fn close(&self) -> RegistrationState {
        let mut slot = self.slot.lock();
        slot.closed = true;
        slot.state.clone()
    }
}

impl std::fmt::Debug for EventHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventHandle").field("id", &self.id).finish()
    }
}

/// Process-lifetime map of open events
#[derive(Debug, Default)]
pub struct Registry {
    events: RwLock<HashMap<EventId, Arc<EventHandle>>>,
    zero_capacity: ZeroCapacityPolicy,
}

impl Registry {
    pub fn new(zero_capacity: ZeroCapacityPolicy) -> Self {
        Self {
            events: RwLock::new(HashMap::new()),
            zero_capacity,
        }
    }

    /// Return the event's handle, creating it with `config` if absent.
    ///
    /// Concurrent first calls for one id create exactly one state; later calls
    /// ignore `config`. The flag is true for the call that created it.
    pub fn get_or_create(&self, event_id: &EventId, config: EventConfig) -> (Arc<EventHandle>, bool) {
        if let Some(handle) = self.events.read().get(event_id) {
            return (Arc::clone(handle), false);
        }

        let mut events = self.events.write();
        if let Some(handle) = events.get(event_id) {
            // Lost the creation race
            debug!(event_id = %event_id, "Event already open");
            return (Arc::clone(handle), false);
        }

        let state = RegistrationState::new(config, self.zero_capacity);
        let handle = Arc::new(EventHandle::new(event_id.clone(), state));
        events.insert(event_id.clone(), Arc::clone(&handle));
        info!(
            event_id = %event_id,
            zero_capacity = self.zero_capacity.as_str(),
            "Opened event"
        );
        (handle, true)
    }

    /// Look up an open event. Never creates state.
    pub fn get(&self, event_id: &EventId) -> Result<Arc<EventHandle>> {
        self.events
            .read()
            .get(event_id)
            .cloned()
            .ok_or_else(|| Error::UnknownEvent(event_id.to_string()))
    }

    /// Remove the event, returning its final state
    pub fn close(&self, event_id: &EventId) -> Result<RegistrationState> {
        let handle = self
            .events
            .write()
            .remove(event_id)
            .ok_or_else(|| Error::UnknownEvent(event_id.to_string()))?;
        let state = handle.close();
        info!(event_id = %event_id, members = state.member_count(), "Closed event");
        Ok(state)
    }

    pub fn contains(&self, event_id: &EventId) -> bool {
        self.events.read().contains_key(event_id)
    }

    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Open event ids, sorted
    pub fn event_ids(&self) -> Vec<EventId> {
        let mut ids: Vec<_> = self.events.read().keys().cloned().collect();
        ids.sort();
        ids
    }
}
