use axum::Json;
use axum::extract::{Path, State};
use ticketdesk_core::TenantId;

use crate::dto::{
    AutoConfigureResponse, StaffRoleMatchResponse, StaffRolesRequest, StaffSuggestionsResponse,
    into_roles,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn scan_staff_roles_handler(
    State(state): State<AppState>,
    Path(tenant_id): Path<String>,
    Json(payload): Json<StaffRolesRequest>,
) -> ApiResult<Json<Vec<StaffRoleMatchResponse>>> {
    TenantId::parse(tenant_id.as_str())?;
    let roles = into_roles(payload.roles)?;

    let matches = state
        .staff_detection_service
        .scan(&roles)
        .into_iter()
        .map(StaffRoleMatchResponse::from)
        .collect();

    Ok(Json(matches))
}

pub async fn suggest_staff_roles_handler(
    State(state): State<AppState>,
    Path(tenant_id): Path<String>,
    Json(payload): Json<StaffRolesRequest>,
) -> ApiResult<Json<StaffSuggestionsResponse>> {
    let tenant_id = TenantId::parse(tenant_id.as_str())?;
    let roles = into_roles(payload.roles)?;
    let suggestions = state
        .staff_detection_service
        .suggest(tenant_id, &roles)
        .await?;

    Ok(Json(StaffSuggestionsResponse::from(suggestions)))
}

pub async fn auto_configure_staff_handler(
    State(state): State<AppState>,
    Path(tenant_id): Path<String>,
    Json(payload): Json<StaffRolesRequest>,
) -> ApiResult<Json<AutoConfigureResponse>> {
    let tenant_id = TenantId::parse(tenant_id.as_str())?;
    let roles = into_roles(payload.roles)?;
    let report = state
        .staff_detection_service
        .auto_configure(tenant_id, &roles)
        .await?;

    Ok(Json(AutoConfigureResponse::from(report)))
}
