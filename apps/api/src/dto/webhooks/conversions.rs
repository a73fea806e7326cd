use ticketdesk_domain::{ArchiveEndpoint, LogChannel, NotificationTarget, WebhookSettings};

use super::types::{ArchiveEndpointDto, LogChannelDto, NotificationTargetDto, WebhookSettingsDto};

impl From<WebhookSettings> for WebhookSettingsDto {
    fn from(value: WebhookSettings) -> Self {
        Self {
            lifecycle: value.lifecycle.map(|target| NotificationTargetDto {
                enabled: target.enabled,
                url: target.url,
                name: target.name,
            }),
            archive_endpoints: value
                .archive_endpoints
                .into_iter()
                .map(|endpoint| ArchiveEndpointDto {
                    url: endpoint.url,
                    name: endpoint.name,
                    channel_id: endpoint.channel_id,
                })
                .collect(),
            log_channel: value.log_channel.map(|channel| LogChannelDto {
                id: channel.id,
                name: channel.name,
            }),
        }
    }
}

impl From<WebhookSettingsDto> for WebhookSettings {
    fn from(value: WebhookSettingsDto) -> Self {
        Self {
            lifecycle: value.lifecycle.map(|target| NotificationTarget {
                enabled: target.enabled,
                url: target.url.trim().to_owned(),
                name: target.name,
            }),
            archive_endpoints: value
                .archive_endpoints
                .into_iter()
                .map(|endpoint| ArchiveEndpoint {
                    url: endpoint.url.trim().to_owned(),
                    name: endpoint.name,
                    channel_id: endpoint.channel_id,
                })
                .collect(),
            log_channel: value.log_channel.map(|channel| LogChannel {
                id: channel.id,
                name: channel.name,
            }),
        }
    }
}
