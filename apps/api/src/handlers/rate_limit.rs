use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use ticketdesk_core::TenantId;
use ticketdesk_domain::ActorId;

use crate::dto::{RateLimitCheckResponse, RateLimitRequest, RateLimitResetResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn check_rate_limit_handler(
    State(state): State<AppState>,
    Path(tenant_id): Path<String>,
    Json(payload): Json<RateLimitRequest>,
) -> ApiResult<Json<RateLimitCheckResponse>> {
    let tenant_id = TenantId::parse(tenant_id.as_str())?;
    let actor_id = ActorId::new(payload.actor_id)?;
    let settings = state
        .access_control_service
        .policy(tenant_id)
        .await?
        .policy
        .rate_limiting;

    let decision = state
        .rate_limit_service
        .check_limit(tenant_id, &actor_id, &settings)
        .await;

    Ok(Json(RateLimitCheckResponse::from(decision)))
}

pub async fn record_rate_limit_action_handler(
    State(state): State<AppState>,
    Path(tenant_id): Path<String>,
    Json(payload): Json<RateLimitRequest>,
) -> ApiResult<StatusCode> {
    let tenant_id = TenantId::parse(tenant_id.as_str())?;
    let actor_id = ActorId::new(payload.actor_id)?;
    state
        .rate_limit_service
        .record_action(tenant_id, &actor_id)
        .await;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn reset_rate_limit_handler(
    State(state): State<AppState>,
    Path((tenant_id, actor_id)): Path<(String, String)>,
) -> ApiResult<Json<RateLimitResetResponse>> {
    let tenant_id = TenantId::parse(tenant_id.as_str())?;
    let actor_id = ActorId::new(actor_id)?;
    let reset = state
        .rate_limit_service
        .reset_actor(tenant_id, &actor_id)
        .await;

    Ok(Json(RateLimitResetResponse { reset }))
}
