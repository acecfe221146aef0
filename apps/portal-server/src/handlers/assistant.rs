//! Explanation assistant handler.

use actix_web::{HttpResponse, web};

use academy_shared::ApiResponse;
use academy_shared::dto::{ExplainRequest, ExplainResponse};

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/assistant/explain
///
/// Always answers 200 once the request is valid; assistant failures come
/// back as an explanatory sentence.
pub async fn explain(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<ExplainRequest>,
) -> AppResult<HttpResponse> {
    let explanation = state
        .portal
        .explain(identity.session_id, &body.topic, &body.context)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(ExplainResponse { explanation })))
}
