//! Community board handlers.

use actix_web::{HttpResponse, web};

use academy_core::domain::PostDraft;
use academy_core::listing::PostSort;
use academy_core::reconcile::{VoteDirection, vote_label};
use academy_shared::ApiResponse;
use academy_shared::dto::{BoardParams, VoteRequest, VoteResponse};

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/community?sort=best|most|least
pub async fn board(
    state: web::Data<AppState>,
    identity: Identity,
    params: web::Query<BoardParams>,
) -> AppResult<HttpResponse> {
    let sort = params
        .sort
        .as_deref()
        .map(PostSort::from_selector)
        .unwrap_or_default();
    let board = state.portal.board(identity.session_id, sort).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(board)))
}

/// POST /api/community
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<PostDraft>,
) -> AppResult<HttpResponse> {
    let post = state
        .portal
        .create_post(identity.session_id, body.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(post)))
}

/// PUT /api/community/{id}
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
    body: web::Json<PostDraft>,
) -> AppResult<HttpResponse> {
    state
        .portal
        .edit_post(identity.session_id, &path, body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::done("Post updated")))
}

/// DELETE /api/community/{id}
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    state.portal.delete_post(identity.session_id, &path).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::done("Post deleted")))
}

/// POST /api/community/{id}/vote
pub async fn vote(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
    body: web::Json<VoteRequest>,
) -> AppResult<HttpResponse> {
    let direction = VoteDirection::try_from(body.direction)?;
    let outcome = state
        .portal
        .vote(identity.session_id, &path, direction)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(VoteResponse {
        likes: outcome.likes,
        current_vote: outcome.vote.value(),
        vote_label: vote_label(outcome.likes),
    })))
}
