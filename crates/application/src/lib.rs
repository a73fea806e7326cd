//! Application services and ports.

#![forbid(unsafe_code)]

mod access_control_service;
mod access_ports;
mod archive_fanout_service;
mod notification_dispatcher;
mod notification_ports;
mod rate_limit_service;
mod staff_detection_service;
mod webhook_settings_service;

pub use access_control_service::{AccessControlService, POLICY_UPDATE_ATTEMPTS};
pub use access_ports::{AccessDecisionCache, AccessDecisionKey, PolicyRepository, VersionedPolicy};
pub use archive_fanout_service::{ArchiveFallbacks, ArchiveFanoutService, FanoutOutcome};
pub use notification_dispatcher::{
    DeliveryQueueItem, DispatchOutcome, DispatcherSettings, NotificationDispatcher,
};
pub use notification_ports::{
    DeliveryMode, DeliveryReceipt, LogChannelSender, WebhookDelivery, WebhookSettingsRepository,
};
pub use rate_limit_service::RateLimitService;
pub use staff_detection_service::StaffDetectionService;
pub use webhook_settings_service::WebhookSettingsService;
