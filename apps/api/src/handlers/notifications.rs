use axum::Json;
use axum::extract::{Path, State};
use ticketdesk_core::TenantId;
use tracing::info;

use crate::dto::{
    ArchiveRequest, ArchiveResponse, NotificationRequest, NotificationResponse,
    PendingUpdatesResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn send_notification_handler(
    State(state): State<AppState>,
    Path(tenant_id): Path<String>,
    Json(payload): Json<NotificationRequest>,
) -> ApiResult<Json<NotificationResponse>> {
    let tenant_id = TenantId::parse(tenant_id.as_str())?;
    let outcome = state
        .notification_dispatcher
        .send_or_update(tenant_id, &payload.ticket, payload.event)
        .await?;

    Ok(Json(NotificationResponse::from(outcome)))
}

pub async fn pending_notifications_handler(
    State(state): State<AppState>,
    Path(tenant_id): Path<String>,
) -> ApiResult<Json<PendingUpdatesResponse>> {
    let tenant_id = TenantId::parse(tenant_id.as_str())?;
    let pending = state
        .notification_dispatcher
        .pending_updates(tenant_id)
        .await;

    Ok(Json(PendingUpdatesResponse { pending }))
}

pub async fn archive_ticket_handler(
    State(state): State<AppState>,
    Path(tenant_id): Path<String>,
    Json(payload): Json<ArchiveRequest>,
) -> ApiResult<Json<ArchiveResponse>> {
    let tenant_id = TenantId::parse(tenant_id.as_str())?;
    let mut ticket = payload.ticket;
    let outcome = state
        .archive_fanout_service
        .fanout(tenant_id, &mut ticket, payload.reason.as_str())
        .await?;

    info!(
        tenant_id = %tenant_id,
        ticket_id = %ticket.id,
        webhook_sent = ticket.webhook_sent,
        "archive fanout finished"
    );

    Ok(Json(ArchiveResponse::from_outcome(outcome, ticket.webhook_sent)))
}
