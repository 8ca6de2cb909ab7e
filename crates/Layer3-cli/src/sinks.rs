//! Terminal stand-ins for the chat platform's post editor and direct messages

use async_trait::async_trait;
use rollcall_foundation::{Error, Result};
use rollcall_signup::{DisplayModel, EventId, PromotionNotice, PromotionNotifier, RenderSink};
use std::io::Write;

/// Prints every board update
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutBoard {
    /// Print the display model as JSON instead of text
    pub json: bool,
}

#[async_trait]
impl RenderSink for StdoutBoard {
    fn name(&self) -> &str {
        "stdout"
    }

    async fn push(&self, event_id: &EventId, model: &DisplayModel) -> Result<()> {
        let rendered = if self.json {
            serde_json::to_string(&serde_json::json!({
                "eventId": event_id,
                "board": model,
            }))?
        } else {
            format!("┌─ board {} (rev {}) ─\n{}└─", event_id, model.revision, model.to_text())
        };

        // Closed stdout surfaces as a render error
        writeln!(std::io::stdout().lock(), "{}", rendered)
            .map_err(|e| Error::Render(format!("stdout: {}", e)))
    }
}

/// Prints the direct message a promoted user would receive
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutDirectMessage;

#[async_trait]
impl PromotionNotifier for StdoutDirectMessage {
    fn name(&self) -> &str {
        "stdout-dm"
    }

    async fn notify(&self, event_id: &EventId, notice: &PromotionNotice) -> Result<()> {
        println!(
            "📨 DM {}: ✅ You moved up from the {} waitlist to a confirmed slot in {}!",
            notice.user_id.mention(),
            notice.role,
            event_id
        );
        Ok(())
    }
}
