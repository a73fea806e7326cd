mod access;
mod common;
mod notifications;
mod policy;
mod rate_limit;
mod staff;
mod webhooks;

pub use access::{AccessCheckRequest, AccessCheckResponse};
pub use common::{ActorRequest, HealthResponse, RoleRequest, into_roles};
pub use notifications::{
    ArchiveRequest, ArchiveResponse, NotificationRequest, NotificationResponse,
    PendingUpdatesResponse,
};
pub use policy::{PolicyResponse, ReplacePolicyRequest};
pub use rate_limit::{RateLimitCheckResponse, RateLimitRequest, RateLimitResetResponse};
pub use staff::{
    AutoConfigureResponse, StaffRoleMatchResponse, StaffRolesRequest, StaffSuggestionsResponse,
};
pub use webhooks::{ArchiveEndpointDto, LogChannelDto, NotificationTargetDto, WebhookSettingsDto};
