use axum::Json;
use axum::extract::{Path, State};
use ticketdesk_core::TenantId;

use crate::dto::{PolicyResponse, ReplacePolicyRequest};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn get_policy_handler(
    State(state): State<AppState>,
    Path(tenant_id): Path<String>,
) -> ApiResult<Json<PolicyResponse>> {
    let tenant_id = TenantId::parse(tenant_id.as_str())?;
    let policy = state.access_control_service.policy(tenant_id).await?;

    Ok(Json(PolicyResponse::from(policy)))
}

pub async fn replace_policy_handler(
    State(state): State<AppState>,
    Path(tenant_id): Path<String>,
    Json(payload): Json<ReplacePolicyRequest>,
) -> ApiResult<Json<PolicyResponse>> {
    let tenant_id = TenantId::parse(tenant_id.as_str())?;
    let policy = state
        .access_control_service
        .replace_policy(tenant_id, payload.policy, payload.expected_version)
        .await?;

    Ok(Json(PolicyResponse::from(policy)))
}
