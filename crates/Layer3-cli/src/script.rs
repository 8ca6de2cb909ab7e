//! Scripted sign-up sessions (TOML)

use rollcall_foundation::{Error, Result};
use rollcall_signup::{
    Action, Capacities, EventConfig, EventDetails, EventId, InboundAction, Outcome, SignupService,
    UserId,
};
use serde::Deserialize;
use std::io::Write;
use std::path::Path;

/// Built-in reference session
pub const DEMO_SCRIPT: &str = include_str!("../scripts/demo.toml");

/// `[event]` table
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptEvent {
    pub id: Option<String>,
    pub activity: String,
    pub difficulty: String,
    #[serde(default)]
    pub meet_time: String,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub opener: String,
    #[serde(default)]
    pub tank: u32,
    #[serde(default)]
    pub healer: u32,
    #[serde(default)]
    pub dps: u32,
}

/// One `[[step]]` entry
#[derive(Debug, Clone, Deserialize)]
pub struct Step {
    pub user: String,
    /// Button custom id, `claim:<role>` or `cancel`
    pub action: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Script {
    pub event: ScriptEvent,
    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

impl Script {
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::parse(&content)
    }

    pub fn event_id(&self) -> EventId {
        match &self.event.id {
            Some(id) => EventId::new(id.clone()),
            None => EventId::generate(),
        }
    }

    pub fn event_config(&self) -> EventConfig {
        let e = &self.event;
        let mut details = EventDetails::new(&e.activity, &e.difficulty, &e.meet_time, &e.opener);
        if let Some(note) = &e.note {
            details = details.with_note(note.clone());
        }
        EventConfig::new(Capacities::new(e.tank, e.healer, e.dps)).with_details(details)
    }
}

/// Tally of one replay
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub applied: usize,
    pub unchanged: usize,
    pub rejected: usize,
}

/// Replay every step against a freshly opened event.
///
/// Rejected steps (bad custom ids, closed roles) are reported and skipped, the way
/// the chat glue answers the clicking user and moves on.
pub async fn run(service: &SignupService, script: &Script, out: &mut impl Write) -> Result<RunSummary> {
    let event_id = script.event_id();
    let config = script.event_config();
    writeln!(out, "# {} ({})", config.details.channel_name(), event_id)?;
    service.open_event(&event_id, config).await?;

    let mut summary = RunSummary::default();
    for (i, step) in script.steps.iter().enumerate() {
        let user = UserId::new(step.user.clone());
        let result = match step.action.parse::<Action>() {
            Ok(action) => {
                service
                    .handle(&InboundAction::new(event_id.clone(), user.clone(), action))
                    .await
            }
            Err(e) => Err(e),
        };

        match result {
            Ok(outcome) => {
                if outcome.is_mutation() {
                    summary.applied += 1;
                } else {
                    summary.unchanged += 1;
                }
                writeln!(out, "{:>3}. {} {} → {}", i + 1, user.mention(), step.action, describe(&outcome))?;
            }
            Err(e) if e.is_user_facing() => {
                summary.rejected += 1;
                writeln!(out, "{:>3}. {} {} → ❌ {}", i + 1, user.mention(), step.action, e)?;
            }
            Err(e) => return Err(e),
        }
    }

    let board = service.close_event(&event_id).await?;
    writeln!(out, "\n--- final board ---\n{}", board.to_text())?;
    Ok(summary)
}

fn describe(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Cancelled {
            promoted: Some(user),
            ..
        } => format!("{} (promoted {})", outcome.reply(), user.mention()),
        _ => outcome.reply(),
    }
}
