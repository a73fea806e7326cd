//! Console log channel sender for development. Writes status lines to tracing output.

use async_trait::async_trait;
use ticketdesk_application::LogChannelSender;
use ticketdesk_core::{AppResult, TenantId};
use ticketdesk_domain::LogChannel;
use tracing::info;

/// Development log channel sender that logs status lines to the console.
#[derive(Clone, Default)]
pub struct ConsoleLogChannelSender;

impl ConsoleLogChannelSender {
    /// Creates a new console log channel sender.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl LogChannelSender for ConsoleLogChannelSender {
    async fn post_status_line(
        &self,
        tenant_id: TenantId,
        channel: &LogChannel,
        line: &str,
    ) -> AppResult<()> {
        info!(
            tenant_id = %tenant_id,
            channel_id = channel.id.as_str(),
            channel = channel.name.as_str(),
            "--- LOG CHANNEL (console) ---\n{}",
            line
        );

        Ok(())
    }
}
