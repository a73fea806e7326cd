use ticketdesk_application::{
    AccessControlService, ArchiveFanoutService, NotificationDispatcher, RateLimitService,
    StaffDetectionService, WebhookSettingsService,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub access_control_service: AccessControlService,
    pub staff_detection_service: StaffDetectionService,
    pub rate_limit_service: RateLimitService,
    pub webhook_settings_service: WebhookSettingsService,
    pub notification_dispatcher: NotificationDispatcher,
    pub archive_fanout_service: ArchiveFanoutService,
    pub dashboard_token: String,
}
