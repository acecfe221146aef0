//! Session handlers: the access-code gate, logout and the current user.

use actix_web::{HttpResponse, web};
use std::sync::Arc;

use academy_core::domain::SessionUser;
use academy_core::ports::TokenService;
use academy_shared::ApiResponse;
use academy_shared::dto::{AuthResponse, LoginRequest, SessionResponse};

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

pub(crate) fn session_response(user: SessionUser) -> SessionResponse {
    SessionResponse {
        is_admin: user.is_admin(),
        role: user.role.as_str().to_string(),
        username: user.username,
        avatar_url: user.avatar_seed,
    }
}

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    token_service: web::Data<Arc<dyn TokenService>>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let (session_id, user) = state
        .portal
        .login(&req.username, &req.access_code, req.avatar_seed.as_deref())
        .await?;

    let token = match token_service.issue(session_id, &user.username, user.role) {
        Ok(token) => token,
        Err(e) => {
            state.portal.logout(session_id).await?;
            return Err(e.into());
        }
    };

    Ok(HttpResponse::Ok().json(AuthResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in: token_service.expiration_seconds().max(0) as u64,
        user: session_response(user),
    }))
}

/// POST /api/auth/logout
pub async fn logout(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    state.portal.logout(identity.session_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::done("Logged out")))
}

/// GET /api/auth/me
pub async fn me(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let user = state.portal.user(identity.session_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(session_response(user))))
}
