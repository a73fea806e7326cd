use std::str::FromStr;

use axum::Json;
use axum::extract::{Path, State};
use ticketdesk_core::{AppError, AppResult, TenantId};
use ticketdesk_domain::{AccessQuery, RoleId, TicketAction};

use crate::dto::{AccessCheckRequest, AccessCheckResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn check_access_handler(
    State(state): State<AppState>,
    Path((tenant_id, action)): Path<(String, String)>,
    Json(payload): Json<AccessCheckRequest>,
) -> ApiResult<Json<AccessCheckResponse>> {
    let tenant_id = TenantId::parse(tenant_id.as_str())?;
    let action = TicketAction::from_str(action.as_str())?;
    let actor = payload.actor.into_actor()?;
    let target_tier = payload.target_tier.map(RoleId::new).transpose()?;

    let mut query = AccessQuery::new(action, &actor);
    if let Some(ticket) = &payload.ticket {
        query = query.with_ticket(ticket);
    }
    if let Some(category) = payload.category.as_deref() {
        query = query.with_category(category);
    }
    if let Some(target_tier) = &target_tier {
        query = query.with_target_tier(target_tier);
    }

    let allowed = state
        .access_control_service
        .authorize(tenant_id, &query)
        .await?;
    let is_staff = state
        .access_control_service
        .is_staff(tenant_id, &actor)
        .await?;

    let within_quota = match (payload.category.as_deref(), payload.open_tickets) {
        (Some(category), Some(open_tickets)) => Some(quota_allows(
            state
                .access_control_service
                .check_ticket_quota(tenant_id, category, open_tickets)
                .await,
        )?),
        _ => None,
    };

    Ok(Json(AccessCheckResponse {
        action: action.as_str().to_owned(),
        allowed,
        is_staff,
        within_quota,
    }))
}

fn quota_allows(result: AppResult<()>) -> AppResult<bool> {
    match result {
        Ok(()) => Ok(true),
        Err(AppError::Forbidden(_)) => Ok(false),
        Err(error) => Err(error),
    }
}
