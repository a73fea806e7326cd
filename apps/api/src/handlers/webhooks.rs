use axum::Json;
use axum::extract::{Path, State};
use ticketdesk_core::TenantId;
use ticketdesk_domain::WebhookSettings;

use crate::dto::WebhookSettingsDto;
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn get_webhook_settings_handler(
    State(state): State<AppState>,
    Path(tenant_id): Path<String>,
) -> ApiResult<Json<WebhookSettingsDto>> {
    let tenant_id = TenantId::parse(tenant_id.as_str())?;
    let settings = state.webhook_settings_service.settings(tenant_id).await?;

    Ok(Json(WebhookSettingsDto::from(settings)))
}

pub async fn save_webhook_settings_handler(
    State(state): State<AppState>,
    Path(tenant_id): Path<String>,
    Json(payload): Json<WebhookSettingsDto>,
) -> ApiResult<Json<WebhookSettingsDto>> {
    let tenant_id = TenantId::parse(tenant_id.as_str())?;
    let settings = state
        .webhook_settings_service
        .save_settings(tenant_id, WebhookSettings::from(payload))
        .await?;

    Ok(Json(WebhookSettingsDto::from(settings)))
}
