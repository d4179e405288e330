use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::auth::models::LoginRequest;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::user::models::EmailAddress;
use crate::inbound::http::router::AppState;
use crate::user::errors::EmailError;

pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequestBody>, JsonRejection>,
) -> Result<ApiSuccess<LoginResponseData>, ApiError> {
    let Json(body) = body.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Unreadable login body");
        ApiError::UnprocessableEntity(rejection.body_text())
    })?;
    let request = body.try_into_request()?;

    let authentication = state.auth_service.login(request).await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        "login success",
        LoginResponseData {
            token: authentication.token,
            user: (&authentication.user).into(),
        },
    ))
}

/// HTTP request body for login (raw JSON)
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequestBody {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

#[derive(Debug, Clone, Error)]
enum ParseLoginRequestError {
    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),

    #[error("Password is required")]
    MissingPassword,
}

impl LoginRequestBody {
    fn try_into_request(self) -> Result<LoginRequest, ParseLoginRequestError> {
        let email = EmailAddress::new(self.email)?;
        if self.password.is_empty() {
            return Err(ParseLoginRequestError::MissingPassword);
        }
        Ok(LoginRequest::new(email.as_str(), self.password))
    }
}

impl From<ParseLoginRequestError> for ApiError {
    fn from(err: ParseLoginRequestError) -> Self {
        ApiError::UnprocessableEntity(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub token: String,
    pub user: UserData,
}
