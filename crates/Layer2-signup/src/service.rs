//! Signup Service - hosts the registry and performs effects
//!
//! Flow per inbound action:
//! 1. Resolve the event (fails fast with `UnknownEvent`)
//! 2. Apply the action under the event lock
//! 3. Release the lock, then push the render snapshot and promotion notices
//!
//! Board pushes for one event are serialized and stale snapshots are dropped, so the
//! visible post always ends on the newest revision.

use crate::action::InboundAction;
use crate::coordinator::Outcome;
use crate::event::{EventConfig, EventId, UserId};
use crate::notifier::{LogNotifier, NoopSink, PromotionNotifier, RenderSink};
use crate::registry::{Applied, EventHandle, Registry};
use crate::render::{self, DisplayModel};
use crate::role::Role;
use rollcall_foundation::{Result, RollcallConfig};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Signup Service - entry point for the chat-platform glue
#[derive(Clone)]
pub struct SignupService {
    /// Open events
    registry: Arc<Registry>,

    /// Visible post updater
    render_sink: Arc<dyn RenderSink>,

    /// Direct promotion notices
    notifier: Arc<dyn PromotionNotifier>,

    /// Configuration
    config: Arc<RollcallConfig>,
}

impl SignupService {
    /// Create a new service
    pub fn new(
        config: RollcallConfig,
        render_sink: Arc<dyn RenderSink>,
        notifier: Arc<dyn PromotionNotifier>,
    ) -> Self {
        Self {
            registry: Arc::new(Registry::new(config.zero_capacity())),
            render_sink,
            notifier,
            config: Arc::new(config),
        }
    }

    /// Default configuration, no render sink, promotions logged
    pub fn with_defaults() -> Self {
        Self::new(
            RollcallConfig::new(),
            Arc::new(NoopSink),
            Arc::new(LogNotifier),
        )
    }

    pub fn registry(&self) -> Arc<Registry> {
        Arc::clone(&self.registry)
    }

    pub fn config(&self) -> &RollcallConfig {
        &self.config
    }

    // ========================================================================
    // Event lifecycle
    // ========================================================================

    /// Open an event with explicit capacities, returning the initial board
    pub async fn open_event(&self, event_id: &EventId, config: EventConfig) -> Result<DisplayModel> {
        config
            .capacities
            .validate(self.config.max_role_capacity())?;

        let (handle, created) = self.registry.get_or_create(event_id, config);
        let display = handle.snapshot()?;
        if created {
            self.push_render(&handle, &display).await;
        }
        Ok(display)
    }

    /// Close an event, returning the final board
    pub async fn close_event(&self, event_id: &EventId) -> Result<DisplayModel> {
        let state = self.registry.close(event_id)?;
        Ok(render::render(&state))
    }

    /// Current board of an open event
    pub fn snapshot(&self, event_id: &EventId) -> Result<DisplayModel> {
        self.registry.get(event_id)?.snapshot()
    }

    // ========================================================================
    // Actions
    // ========================================================================

    /// Apply one inbound action and perform its effects
    pub async fn handle(&self, inbound: &InboundAction) -> Result<Outcome> {
        let handle = self.registry.get(&inbound.event_id)?;
        // Lock is taken and released inside apply
        let applied = handle.apply(&inbound.user_id, inbound.action)?;

        debug!(
            event_id = %inbound.event_id,
            user = %inbound.user_id,
            action = %inbound.action,
            outcome = %applied.outcome,
            "Handled action"
        );

        self.perform_effects(&handle, &applied).await;
        Ok(applied.outcome)
    }

    pub async fn claim(&self, event_id: &EventId, user: &UserId, role: Role) -> Result<Outcome> {
        self.handle(&InboundAction::claim(event_id.clone(), user.clone(), role))
            .await
    }

    pub async fn cancel(&self, event_id: &EventId, user: &UserId) -> Result<Outcome> {
        self.handle(&InboundAction::cancel(event_id.clone(), user.clone()))
            .await
    }

    // ========================================================================
    // Effects (outside any lock)
    // ========================================================================

    async fn perform_effects(&self, handle: &EventHandle, applied: &Applied) {
        let event_id = handle.id();
        if let Some(display) = &applied.display {
            self.push_render(handle, display).await;
        }

        for notice in &applied.promotions {
            info!(
                event_id = %event_id,
                user = %notice.user_id,
                role = notice.role.as_str(),
                "Promoted from waitlist"
            );
            if !self.config.notify_promotions() {
                continue;
            }
            if let Err(e) = self.notifier.notify(event_id, notice).await {
                warn!(
                    event_id = %event_id,
                    user = %notice.user_id,
                    notifier = self.notifier.name(),
                    "Promotion notice failed: {}", e
                );
            }
        }
    }

    async fn push_render(&self, handle: &EventHandle, model: &DisplayModel) {
        let event_id = handle.id();
        let sink = &self.render_sink;
        let published = handle
            .publish(model, || async move {
                if let Err(e) = sink.push(event_id, model).await {
                    warn!(
                        event_id = %event_id,
                        sink = sink.name(),
                        revision = model.revision,
                        "Render push failed: {}", e
                    );
                }
            })
            .await;

        if !published {
            debug!(event_id = %event_id, revision = model.revision, "Skipped stale board");
        }
    }
}
