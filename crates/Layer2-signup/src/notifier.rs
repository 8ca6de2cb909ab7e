//! Outbound effect sinks
//!
//! Both sinks are best-effort: the transition that produced an effect has already
//! committed, so a failing sink is logged by the caller and never retried.

use crate::coordinator::PromotionNotice;
use crate::event::EventId;
use crate::render::DisplayModel;
use async_trait::async_trait;
use parking_lot::Mutex;
use rollcall_foundation::Result;
use tracing::info;

// ============================================================================
// Traits
// ============================================================================

/// Updates the event's visible post
#[async_trait]
pub trait RenderSink: Send + Sync {
    /// Sink name (for logging)
    fn name(&self) -> &str;

    async fn push(&self, event_id: &EventId, model: &DisplayModel) -> Result<()>;
}

/// Sends a direct notice to a promoted user
#[async_trait]
pub trait PromotionNotifier: Send + Sync {
    /// Notifier name (for logging)
    fn name(&self) -> &str;

    async fn notify(&self, event_id: &EventId, notice: &PromotionNotice) -> Result<()>;
}

// ============================================================================
// Built-in sinks
// ============================================================================

/// Drops everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

#[async_trait]
impl RenderSink for NoopSink {
    fn name(&self) -> &str {
        "noop"
    }

    async fn push(&self, _event_id: &EventId, _model: &DisplayModel) -> Result<()> {
        Ok(())
    }
}

#[async_trait]
impl PromotionNotifier for NoopSink {
    fn name(&self) -> &str {
        "noop"
    }

    async fn notify(&self, _event_id: &EventId, _notice: &PromotionNotice) -> Result<()> {
        Ok(())
    }
}

/// Writes promotion notices to the tracing log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl PromotionNotifier for LogNotifier {
    fn name(&self) -> &str {
        "log"
    }

    async fn notify(&self, event_id: &EventId, notice: &PromotionNotice) -> Result<()> {
        info!(
            event_id = %event_id,
            user = %notice.user_id,
            role = notice.role.as_str(),
            "✅ Promoted from the {} waitlist",
            notice.role
        );
        Ok(())
    }
}

/// Keeps every effect it receives, in order
#[derive(Debug, Default)]
pub struct RecordingSink {
    renders: Mutex<Vec<(EventId, DisplayModel)>>,
    notices: Mutex<Vec<(EventId, PromotionNotice)>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn renders(&self) -> Vec<(EventId, DisplayModel)> {
        self.renders.lock().clone()
    }

    pub fn notices(&self) -> Vec<(EventId, PromotionNotice)> {
        self.notices.lock().clone()
    }

    pub fn last_render(&self) -> Option<DisplayModel> {
        self.renders.lock().last().map(|(_, model)| model.clone())
    }

    pub fn render_count(&self) -> usize {
        self.renders.lock().len()
    }
}

#[async_trait]
impl RenderSink for RecordingSink {
    fn name(&self) -> &str {
        "recording"
    }

    async fn push(&self, event_id: &EventId, model: &DisplayModel) -> Result<()> {
        self.renders.lock().push((event_id.clone(), model.clone()));
        Ok(())
    }
}

#[async_trait]
impl PromotionNotifier for RecordingSink {
    fn name(&self) -> &str {
        "recording"
    }

    async fn notify(&self, event_id: &EventId, notice: &PromotionNotice) -> Result<()> {
        self.notices.lock().push((event_id.clone(), notice.clone()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::UserId;
    use crate::role::Role;

    #[tokio::test]
    async fn test_recording_sink_keeps_order() {
        let sink = RecordingSink::new();
        let event_id = EventId::new("evt-1");

        for user in ["b", "e"] {
            let notice = PromotionNotice {
                user_id: UserId::from(user),
                role: Role::Dps,
            };
            sink.notify(&event_id, &notice).await.unwrap();
        }

        let users: Vec<_> = sink
            .notices()
            .into_iter()
            .map(|(_, n)| n.user_id.0)
            .collect();
        assert_eq!(users, vec!["b", "e"]);
        assert_eq!(sink.render_count(), 0);
    }

    #[tokio::test]
    async fn test_log_notifier_never_fails() {
        let notice = PromotionNotice {
            user_id: UserId::from("b"),
            role: Role::Tank,
        };
        assert!(LogNotifier
            .notify(&EventId::new("evt-1"), &notice)
            .await
            .is_ok());
    }
}
