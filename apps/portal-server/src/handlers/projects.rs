//! Project catalog handlers.

use actix_web::{HttpResponse, web};

use academy_core::domain::ProjectDraft;
use academy_core::listing::ListQuery;
use academy_shared::ApiResponse;
use academy_shared::dto::{CommentRequest, LikeResponse, ProjectListParams};

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/projects?search&category&difficulty&sort
pub async fn list(
    state: web::Data<AppState>,
    identity: Identity,
    params: web::Query<ProjectListParams>,
) -> AppResult<HttpResponse> {
    let query = ListQuery::from_selectors(
        params.search.as_deref(),
        params.category.as_deref(),
        params.difficulty.as_deref(),
        params.sort.as_deref(),
    )?;
    let cards = state.portal.list(identity.session_id, &query).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(cards)))
}

/// POST /api/projects
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<ProjectDraft>,
) -> AppResult<HttpResponse> {
    let project = state
        .portal
        .create_project(identity.session_id, body.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(project)))
}

/// GET /api/projects/{id}
pub async fn open(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let detail = state.portal.open(identity.session_id, &path).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(detail)))
}

/// PUT /api/projects/{id}
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
    body: web::Json<ProjectDraft>,
) -> AppResult<HttpResponse> {
    let project = state
        .portal
        .edit_project(identity.session_id, &path, body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(project)))
}

/// DELETE /api/projects/{id}
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    state.portal.delete_project(identity.session_id, &path).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::done("Project deleted")))
}

/// POST /api/projects/{id}/like
pub async fn like(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let outcome = state.portal.toggle_like(identity.session_id, &path).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(LikeResponse {
        likes: outcome.likes,
        is_liked_by_user: outcome.liked,
    })))
}

/// POST /api/projects/{id}/comments
pub async fn comment(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
    body: web::Json<CommentRequest>,
) -> AppResult<HttpResponse> {
    let comment = state
        .portal
        .add_comment(identity.session_id, &path, &body.text)
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(comment)))
}

/// POST /api/projects/{id}/comments/{comment_id}/like
pub async fn like_comment(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(String, String)>,
) -> AppResult<HttpResponse> {
    let (project_id, comment_id) = path.into_inner();
    let view = state
        .portal
        .toggle_comment_like(identity.session_id, &project_id, &comment_id)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(view)))
}
