use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Lifecycle notification endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/notification-target.ts"
)]
pub struct NotificationTargetDto {
    pub enabled: bool,
    pub url: String,
    #[serde(default)]
    pub name: String,
}

/// Archive notification endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/archive-endpoint.ts"
)]
pub struct ArchiveEndpointDto {
    pub url: String,
    #[serde(default)]
    pub name: String,
    pub channel_id: Option<String>,
}

/// Fallback log channel.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/log-channel.ts"
)]
pub struct LogChannelDto {
    pub id: String,
    pub name: String,
}

/// Tenant webhook settings, used for both reads and writes.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/webhook-settings.ts"
)]
pub struct WebhookSettingsDto {
    pub lifecycle: Option<NotificationTargetDto>,
    #[serde(default)]
    pub archive_endpoints: Vec<ArchiveEndpointDto>,
    pub log_channel: Option<LogChannelDto>,
}
