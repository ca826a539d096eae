//! Authentication route handlers.
//!
//! Session-cookie auth: register and login put a [`CurrentUser`] into the
//! session, logout destroys it. `GET /api/user` reports the logged-in user.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::error::{AppError, Result};
use crate::middleware::{RequireAuth, clear_current_user, set_current_user};
use crate::models::{CurrentUser, User};
use crate::services::auth::Registration;
use crate::state::AppState;

/// Registration request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub email: String,
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zipcode: Option<String>,
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Put a user into the session.
async fn start_session(session: &Session, user: &User) -> Result<()> {
    let current = CurrentUser {
        id: user.id,
        username: user.username.clone(),
        email: user.email.clone(),
    };
    set_current_user(session, &current)
        .await
        .map_err(|e| AppError::Internal(format!("failed to persist session: {e}")))
}

/// Create an account and log the new user in.
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<User>)> {
    let user = state
        .auth()
        .register(Registration {
            username: request.username,
            password: request.password,
            email: request.email,
            name: request.name,
            address: request.address,
            city: request.city,
            state: request.state,
            zipcode: request.zipcode,
        })
        .await?;

    start_session(&session, &user).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Log in with username and password.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<LoginRequest>,
) -> Result<Json<User>> {
    let user = state
        .auth()
        .login(&request.username, &request.password)
        .await?;

    start_session(&session, &user).await?;
    Ok(Json(user))
}

/// Log out: drop the user and the rest of the session state.
pub async fn logout(session: Session) -> Result<StatusCode> {
    if let Err(e) = clear_current_user(&session).await {
        tracing::error!("Failed to clear session user: {e}");
    }

    // Also drops the guest cart reference
    if let Err(e) = session.flush().await {
        tracing::error!("Failed to flush session: {e}");
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Get the currently logged-in user.
pub async fn current_user(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
) -> Result<Json<User>> {
    let user = state
        .auth()
        .get_user(current.id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Not logged in".to_owned()))?;

    Ok(Json(user))
}
