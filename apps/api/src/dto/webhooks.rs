mod conversions;
mod types;

pub use types::{ArchiveEndpointDto, LogChannelDto, NotificationTargetDto, WebhookSettingsDto};
