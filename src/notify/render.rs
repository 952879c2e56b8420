//! Feature-specific payload renderers
//!
//! Builders that turn diffed items and status reports into display payloads.
//! All free text goes through [`MessagePayload`], which bounds description
//! length to the platform limit.

use super::{pages, MessagePayload};
use crate::models::{Feature, Item, StatusReport};

/// Accent color for game alerts
pub const COLOR_BLURPLE: u32 = 0x5865F2;
/// Accent color for fix alerts
pub const COLOR_GREEN: u32 = 0x57F287;

/// Fixed footer attribution on every outbound message
pub const FOOTER: &str = "herald release monitor";

/// Alert for a new or updated game
pub fn game_alert(item: &Item, feature: Feature) -> MessagePayload {
    let kind = match feature {
        Feature::UpdatedGames => "UPDATED",
        _ => "NEW",
    };
    let description = format!(
        "📦 **Manifest for App ID:** `{}`\n• **Type:** {kind}",
        item.meta("appid"),
    );

    let mut payload = MessagePayload::new(format!("🎮 {}", item.display_name), description)
        .with_color(COLOR_BLURPLE)
        .with_footer(FOOTER);
    let image = item.meta("image");
    if !image.is_empty() {
        payload = payload.with_image(image);
    }
    payload
}

/// Alert for a fixed game: title plus download link and size
pub fn fix_alert(item: &Item) -> MessagePayload {
    let download = item.meta("download");
    let size = item.meta("size");

    let mut description = format!("📥 [Download ZIP]({download})");
    if !size.is_empty() {
        description.push_str(&format!("\n• Size: {size}"));
    }

    let mut payload = MessagePayload::new(format!("🛠️ {}", item.display_name), description)
        .with_color(COLOR_GREEN)
        .with_footer(FOOTER);
    if !download.is_empty() {
        payload = payload.with_link(download);
    }
    payload
}

/// Sample alert used by the owner test command
pub fn test_alert(feature: Feature) -> MessagePayload {
    let color = match feature {
        Feature::FixedGames => COLOR_GREEN,
        _ => COLOR_BLURPLE,
    };
    MessagePayload::new(
        format!("🎮 TEST {} ALERT", feature.label().to_uppercase()),
        "📦 **Manifest for App ID:** `123456`",
    )
    .with_color(color)
    .with_footer(FOOTER)
}

/// Live status panel with a countdown footer
pub fn status_panel(report: &StatusReport, banner_url: &str, remaining_secs: u64) -> MessagePayload {
    MessagePayload::new("🔔 Real-Time Service Status", report.render())
        .with_color(COLOR_BLURPLE)
        .with_image(banner_url)
        .with_footer(countdown_footer(remaining_secs))
}

/// Countdown footer text, `Next update in MM:SS`
pub fn countdown_footer(remaining_secs: u64) -> String {
    format!(
        "Next update in {:02}:{:02}",
        remaining_secs / 60,
        remaining_secs % 60
    )
}

/// Paginated bulk listing of the full game feed
pub fn game_list_pages(items: &[Item]) -> Vec<MessagePayload> {
    let lines: Vec<String> = items
        .iter()
        .map(|item| format!("● **{}** — `{}`", item.display_name, item.meta("appid")))
        .collect();

    let chunks = pages(&lines);
    let total_pages = chunks.len();

    chunks
        .into_iter()
        .enumerate()
        .map(|(idx, body)| {
            MessagePayload::new(
                format!(
                    "📃 Game List ({} total) — Page {}/{}",
                    items.len(),
                    idx + 1,
                    total_pages
                ),
                body,
            )
            .with_color(COLOR_BLURPLE)
            .with_footer(FOOTER)
        })
        .collect()
}
