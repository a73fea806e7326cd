use async_trait::async_trait;
use ticketdesk_core::{AppResult, TenantId};
use ticketdesk_domain::LogChannel;

/// Port for posting plain text into a tenant chat channel.
#[async_trait]
pub trait LogChannelSender: Send + Sync {
    /// Posts one status line.
    async fn post_status_line(
        &self,
        tenant_id: TenantId,
        channel: &LogChannel,
        line: &str,
    ) -> AppResult<()>;
}
