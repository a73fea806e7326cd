use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{delete, get, post};
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{handlers, middleware};

pub fn build_router(app_state: AppState) -> Router {
    let tenant_routes = Router::new()
        .route(
            "/api/tenants/{tenant_id}/policy",
            get(handlers::policy::get_policy_handler)
                .put(handlers::policy::replace_policy_handler),
        )
        .route(
            "/api/tenants/{tenant_id}/access/{action}",
            post(handlers::access::check_access_handler),
        )
        .route(
            "/api/tenants/{tenant_id}/staff/scan",
            post(handlers::staff::scan_staff_roles_handler),
        )
        .route(
            "/api/tenants/{tenant_id}/staff/suggestions",
            post(handlers::staff::suggest_staff_roles_handler),
        )
        .route(
            "/api/tenants/{tenant_id}/staff/auto-configure",
            post(handlers::staff::auto_configure_staff_handler),
        )
        .route(
            "/api/tenants/{tenant_id}/rate-limit/check",
            post(handlers::rate_limit::check_rate_limit_handler),
        )
        .route(
            "/api/tenants/{tenant_id}/rate-limit/record",
            post(handlers::rate_limit::record_rate_limit_action_handler),
        )
        .route(
            "/api/tenants/{tenant_id}/rate-limit/actors/{actor_id}",
            delete(handlers::rate_limit::reset_rate_limit_handler),
        )
        .route(
            "/api/tenants/{tenant_id}/webhooks",
            get(handlers::webhooks::get_webhook_settings_handler)
                .put(handlers::webhooks::save_webhook_settings_handler),
        )
        .route(
            "/api/tenants/{tenant_id}/notifications",
            post(handlers::notifications::send_notification_handler),
        )
        .route(
            "/api/tenants/{tenant_id}/notifications/pending",
            get(handlers::notifications::pending_notifications_handler),
        )
        .route(
            "/api/tenants/{tenant_id}/archive",
            post(handlers::notifications::archive_ticket_handler),
        )
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_dashboard_token,
        ));

    Router::new()
        .route("/health", get(handlers::health::health_handler))
        .merge(tenant_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
