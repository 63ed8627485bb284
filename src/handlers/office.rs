use actix_web::{HttpResponse, web};
use chrono::Utc;

use crate::AppState;
use crate::database::models::OfficeLocation;
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::Claims;

pub async fn get_office_location(
    _claims: Claims,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let location = state.office.get();
    Ok(HttpResponse::Ok().json(ApiResponse::success(location.as_ref().clone())))
}

/// Admin only
pub async fn update_office_location(
    claims: Claims,
    state: web::Data<AppState>,
    input: web::Json<OfficeLocation>,
) -> Result<HttpResponse, AppError> {
    let snapshot = state
        .office
        .set(&claims.actor(), input.into_inner(), Utc::now())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
        snapshot,
        "Office location updated",
    )))
}
