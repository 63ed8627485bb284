use actix_web::{HttpResponse, web};
use chrono::Utc;
use uuid::Uuid;

use crate::AppState;
use crate::database::models::{ApprovalDecision, ResolutionInput};
use crate::error::AppError;
use crate::handlers::shared::{ApiResponse, optional_json};
use crate::services::Claims;

/// Remote check-ins waiting on the caller
pub async fn get_pending(
    claims: Claims,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let pending = state.approvals.list_pending(&claims.actor()).await?;
    let views: Vec<_> = pending
        .into_iter()
        .map(|r| state.attendance.view(r))
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success(views)))
}

async fn resolve(
    claims: Claims,
    state: web::Data<AppState>,
    record_id: Uuid,
    decision: ApprovalDecision,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let input: ResolutionInput = optional_json(&body)?;
    let notes = input.notes;

    let record = state
        .approvals
        .resolve(&claims.actor(), record_id, decision, notes, Utc::now())
        .await?;

    let message = match decision {
        ApprovalDecision::Approved => "Remote check-in approved",
        ApprovalDecision::Rejected => "Remote check-in rejected",
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
        state.attendance.view(record),
        message,
    )))
}

pub async fn approve(
    claims: Claims,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    resolve(
        claims,
        state,
        path.into_inner(),
        ApprovalDecision::Approved,
        body,
    )
    .await
}

pub async fn reject(
    claims: Claims,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    resolve(
        claims,
        state,
        path.into_inner(),
        ApprovalDecision::Rejected,
        body,
    )
    .await
}
