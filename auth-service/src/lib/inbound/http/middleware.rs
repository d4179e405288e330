use axum::extract::Request;
use axum::extract::State;
use axum::http::{self};
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;

use super::handlers::ApiError;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::user::models::User;
use crate::inbound::http::router::AppState;

/// Extension type to store the authenticated admin in request extensions
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

/// Middleware that resolves the bearer token to an admin and adds it to request extensions
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_token_from_header(&req)?.to_string();

    let user = state
        .auth_service
        .validate_token(&token)
        .await
        .map_err(|e| ApiError::from(e).into_response())?;

    req.extensions_mut().insert(AuthenticatedUser(user));

    Ok(next.run(req).await)
}

fn extract_token_from_header(req: &Request) -> Result<&str, Response> {
    let unauthorized = || ApiError::Unauthorized("unauthorized".to_string()).into_response();

    let auth_str = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or_else(|| {
            tracing::debug!("Missing Authorization header");
            unauthorized()
        })?
        .to_str()
        .map_err(|_| unauthorized())?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.is_empty() => Ok(token),
        _ => {
            tracing::debug!("Authorization header is not a bearer token");
            Err(unauthorized())
        }
    }
}
