//! Owner-facing chat command handlers
//!
//! Handlers receive already-parsed events from the chat platform (the
//! gateway and menu construction live outside this crate) and produce
//! replies. Configuration, test and peek commands reply ephemerally (visible
//! to the invoking user only), as opposed to the public channel output of
//! automatic cycles.
//! Automatic cycles never report failures to chat; these handlers do, since
//! a human is waiting.
//!
//! The peek commands are strictly read-only: they compute and display a
//! would-be diff without committing anything, so running them never changes
//! what the automatic cycles will announce.

mod selection;

pub use selection::{OutOfOrderSelection, SelectionEvent, SelectionFlow};

use std::path::Path;

use crate::models::Feature;
use crate::monitor::GameMonitor;
use crate::notify::{deliver_paged, render, Notifier, PAGE_DELAY};
use crate::store::{GameState, StatusState};

/// Maximum peeked NEW items shown before summarizing
const PEEK_LIMIT: usize = 10;

/// A reply to the invoking user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandReply {
    pub text: String,
    /// Visible only to the invoking user
    pub ephemeral: bool,
}

impl CommandReply {
    /// User-only reply
    pub fn ephemeral(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ephemeral: true,
        }
    }
}

/// Identity of the command invoker, used for the owner gate
#[derive(Debug, Clone, Copy)]
pub struct CommandContext {
    pub user_id: u64,
    pub guild_id: u64,
    pub guild_owner_id: u64,
}

impl CommandContext {
    /// Whether the invoker owns the guild
    pub fn is_owner(&self) -> bool {
        self.user_id == self.guild_owner_id
    }
}

/// Owner gate shared by every configuration command
fn require_owner(ctx: &CommandContext) -> Result<(), CommandReply> {
    if ctx.is_owner() {
        Ok(())
    } else {
        Err(CommandReply::ephemeral(
            "❌ Only the server owner can use this command.",
        ))
    }
}

/// Advance a setup workflow by one selection event, persisting on commit.
///
/// Returns the next flow state plus the reply to show the owner. The
/// destination is written to the live state file the moment the flow
/// commits.
pub fn handle_setup_selection(
    ctx: &CommandContext,
    game_state_path: &Path,
    status_state_path: &Path,
    flow: SelectionFlow,
    event: SelectionEvent,
) -> (SelectionFlow, CommandReply) {
    if let Err(reply) = require_owner(ctx) {
        return (flow, reply);
    }

    let next = match flow.advance(event) {
        Ok(next) => next,
        Err(OutOfOrderSelection) => {
            return (
                flow,
                CommandReply::ephemeral("⚠ That selection is out of order. Start over with the setup command."),
            );
        }
    };

    let reply = match next {
        SelectionFlow::AwaitingFeature => {
            CommandReply::ephemeral("📌 Select which feature you want to configure:")
        }
        SelectionFlow::AwaitingDestination { feature } => CommandReply::ephemeral(format!(
            "📌 Now select the channel for **{} alerts**:",
            feature.label()
        )),
        SelectionFlow::Committed {
            feature,
            channel_id,
        } => {
            let persisted = match feature {
                Feature::Status => {
                    StatusState::commit_channel(status_state_path, ctx.guild_id, channel_id)
                }
                game_feature => {
                    GameState::commit_channel(game_state_path, game_feature, channel_id)
                }
            };
            match persisted {
                Ok(()) => CommandReply::ephemeral(format!(
                    "✅ Channel for **{}** set to <#{channel_id}>",
                    feature.label()
                )),
                Err(e) => {
                    tracing::error!(feature = %feature, error = %e, "failed to persist destination");
                    CommandReply::ephemeral("❌ Failed to save the channel configuration.")
                }
            }
        }
    };

    (next, reply)
}

/// Send a sample alert to every configured game destination
pub async fn test_alerts(
    ctx: &CommandContext,
    notifier: &Notifier,
    game_state_path: &Path,
) -> CommandReply {
    if let Err(reply) = require_owner(ctx) {
        return reply;
    }

    let state = GameState::load(game_state_path);
    let mut sent = Vec::new();

    for feature in Feature::game_features() {
        let Some(channel) = state.channel(feature) else {
            continue;
        };
        let payload = render::test_alert(feature);
        if notifier.notify(Some(channel), &payload, feature).await.is_delivered() {
            sent.push(feature.label());
        }
    }

    if sent.is_empty() {
        CommandReply::ephemeral("⚠ No channels configured. Run the setup command first.")
    } else {
        CommandReply::ephemeral(format!("✅ Test alerts sent for: {}", sent.join(", ")))
    }
}

/// Post the full game listing into the invoking channel, paginated
pub async fn list_games(monitor: &GameMonitor, invoking_channel: u64) -> CommandReply {
    let Some(items) = monitor.fetch_listing().await else {
        return CommandReply::ephemeral("❌ Failed to load game list.");
    };
    if items.is_empty() {
        return CommandReply::ephemeral("⚠ The game list is currently empty.");
    }

    let payloads = render::game_list_pages(&items);
    let page_count = payloads.len();
    match deliver_paged(
        monitor.notifier().api().as_ref(),
        invoking_channel,
        &payloads,
        PAGE_DELAY,
    )
    .await
    {
        Ok(_) => CommandReply::ephemeral(format!(
            "✅ Listed {} games across {page_count} page(s).",
            items.len()
        )),
        Err(e) => {
            tracing::error!(channel = invoking_channel, error = %e, "bulk listing failed");
            CommandReply::ephemeral("❌ Failed to post the game list.")
        }
    }
}

/// Show the games the next cycle would announce as NEW, without committing
pub async fn peek_new(monitor: &GameMonitor) -> CommandReply {
    let Some(items) = monitor.peek_new().await else {
        return CommandReply::ephemeral("❌ Failed to load game list.");
    };
    if items.is_empty() {
        return CommandReply::ephemeral("⚠ No newly added games found.");
    }

    let shown: Vec<String> = items
        .iter()
        .take(PEEK_LIMIT)
        .map(|i| format!("● **{}** — `{}`", i.display_name, i.meta("appid")))
        .collect();

    let mut text = shown.join("\n");
    if items.len() > PEEK_LIMIT {
        text.push_str(&format!(
            "\n✅ {} new games found — showing first {PEEK_LIMIT}.",
            items.len()
        ));
    }
    CommandReply::ephemeral(text)
}

/// Show the current fixes snapshot, without committing
pub async fn peek_fixes(monitor: &GameMonitor) -> CommandReply {
    let Some(items) = monitor.peek_fixes().await else {
        return CommandReply::ephemeral("❌ Failed to load fixes.");
    };
    if items.is_empty() {
        return CommandReply::ephemeral("⚠ No fixes found.");
    }

    let lines: Vec<String> = items
        .iter()
        .map(|i| {
            let size = i.meta("size");
            if size.is_empty() {
                format!("● **{}**", i.display_name)
            } else {
                format!("● **{}** — {size}", i.display_name)
            }
        })
        .collect();

    CommandReply::ephemeral(format!(
        "{}\n✅ {} fixes found.",
        lines.join("\n"),
        items.len()
    ))
}
