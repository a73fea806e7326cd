use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;
use subtle::ConstantTimeEq;
use ticketdesk_core::AppError;

use crate::error::ApiResult;
use crate::state::AppState;

const BEARER_PREFIX: &str = "Bearer ";

pub async fn require_dashboard_token(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    let presented = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .ok_or_else(|| AppError::Unauthorized("bearer token required".to_owned()))?;

    if !tokens_match(presented, state.dashboard_token.as_str()) {
        return Err(AppError::Unauthorized("invalid dashboard token".to_owned()).into());
    }

    Ok(next.run(request).await)
}

/// Compares tokens in constant time.
fn tokens_match(presented: &str, expected: &str) -> bool {
    presented.as_bytes().ct_eq(expected.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::tokens_match;

    #[test]
    fn tokens_must_match_exactly() {
        assert!(tokens_match("dashboard-token-0001", "dashboard-token-0001"));
        assert!(!tokens_match("dashboard-token-0002", "dashboard-token-0001"));
        assert!(!tokens_match("dashboard-token", "dashboard-token-0001"));
        assert!(!tokens_match("", "dashboard-token-0001"));
    }

    #[test]
    fn longer_token_sharing_prefix_is_rejected() {
        assert!(!tokens_match("dashboard-token-00012", "dashboard-token-0001"));
        assert!(!tokens_match("DASHBOARD-TOKEN-0001", "dashboard-token-0001"));
    }
}
