//! Status-page monitor
//!
//! Posts a live status panel to every configured guild channel, then runs a
//! countdown sub-loop that edits the panel's footer once per tick for the
//! interval duration before refreshing the panel content in place. Losing
//! edit permission mid-countdown aborts only that countdown; the parent
//! cycle and scheduler keep running.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::error::NotifyError;
use crate::models::Feature;
use crate::notify::{render, ChatApi, Delivery, DiscordApi, MessageId, MessagePayload, Notifier};
use crate::source::{PageFetcher, StatusPageSource};
use crate::store::StatusState;

/// Scheduler for the status-page domain
pub struct StatusMonitor {
    source: StatusPageSource,
    notifier: Notifier,
    state_path: PathBuf,
    interval: Duration,
    banner_url: String,
    /// Countdown tick period; one second in production, shortened in tests
    countdown_tick: Duration,
}

impl StatusMonitor {
    /// Create a monitor over an explicit source and transport (test seam)
    pub fn new(
        source: StatusPageSource,
        notifier: Notifier,
        state_path: PathBuf,
        interval: Duration,
        banner_url: String,
    ) -> Self {
        Self {
            source,
            notifier,
            state_path,
            interval,
            banner_url,
            countdown_tick: Duration::from_secs(1),
        }
    }

    /// Create a monitor from configuration with the real page source and
    /// Discord transport
    pub fn from_config(config: &Config) -> crate::error::Result<Self> {
        let fetcher = PageFetcher::new(&config.http)?;
        let source = StatusPageSource::new(
            fetcher,
            config.status.page_url.clone(),
            &config.status.block_classes,
        )
        .map_err(crate::error::Error::config)?;
        let notifier = Notifier::new(Arc::new(DiscordApi::new(&config.chat)?));

        Ok(Self::new(
            source,
            notifier,
            config.status.state_path.clone(),
            config.status_interval(),
            config.status.banner_image_url.clone(),
        ))
    }

    /// Override the countdown tick period (tests only need milliseconds)
    pub fn with_countdown_tick(mut self, tick: Duration) -> Self {
        self.countdown_tick = tick;
        self
    }

    /// Delivery front-end (shared with the command surface)
    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Durable state file for this domain
    pub fn state_path(&self) -> &PathBuf {
        &self.state_path
    }

    /// Run the scheduler loop. The countdown sub-loop paces each cycle at
    /// roughly the interval; overlapping ticks are skipped, never stacked.
    pub async fn run(&self) {
        let mut timer = super::cycle_timer(self.interval);
        loop {
            timer.tick().await;
            self.run_cycle().await;
        }
    }

    /// One cycle: post a live panel to every configured destination
    pub async fn run_cycle(&self) {
        // Re-read destinations every cycle; a configuration command may
        // have changed them while the previous cycle was in flight.
        let state = StatusState::load(&self.state_path);
        if state.channels.is_empty() {
            return;
        }

        for (guild_id, channel_id) in &state.channels {
            self.post_panel(guild_id, *channel_id).await;
        }
    }

    /// Post one panel and drive its countdown to the next refresh
    async fn post_panel(&self, guild_id: &str, channel_id: u64) {
        let Some(report) = self.source.fetch_report().await else {
            tracing::debug!(domain = "status", guild = guild_id, "status page unavailable, skipping");
            return;
        };

        let remaining = self.interval.as_secs();
        let mut payload = render::status_panel(&report, &self.banner_url, remaining);

        let delivery = self
            .notifier
            .notify(Some(channel_id), &payload, Feature::Status)
            .await;
        let Delivery::Delivered(message_id) = delivery else {
            return;
        };

        if !self
            .countdown(channel_id, &message_id, &mut payload, remaining)
            .await
        {
            return;
        }

        // Countdown done: refresh the panel content in place.
        let Some(report) = self.source.fetch_report().await else {
            return;
        };
        payload.set_description(&report.render());
        payload.set_footer(&render::countdown_footer(remaining));
        if let Err(e) = self
            .notifier
            .api()
            .edit_message(channel_id, &message_id, &payload)
            .await
        {
            tracing::warn!(domain = "status", channel = channel_id, error = %e, "failed to refresh status panel");
        }
    }

    /// Edit the panel footer once per tick until the interval elapses.
    ///
    /// Returns false when the countdown aborted (edit permission lost or
    /// the message disappeared); only this countdown stops, the cycle and
    /// scheduler continue.
    async fn countdown(
        &self,
        channel_id: u64,
        message_id: &MessageId,
        payload: &mut MessagePayload,
        mut remaining: u64,
    ) -> bool {
        while remaining > 0 {
            payload.set_footer(&render::countdown_footer(remaining));
            match self
                .notifier
                .api()
                .edit_message(channel_id, message_id, payload)
                .await
            {
                Ok(()) => {}
                Err(NotifyError::Forbidden) => {
                    tracing::warn!(
                        domain = "status",
                        channel = channel_id,
                        "missing permission to edit status panel, stopping countdown"
                    );
                    return false;
                }
                Err(e) => {
                    tracing::warn!(domain = "status", channel = channel_id, error = %e, "status countdown edit failed, stopping countdown");
                    return false;
                }
            }
            tokio::time::sleep(self.countdown_tick).await;
            remaining -= 1;
        }
        true
    }
}
