use actix_web::{HttpResponse, web};
use chrono::{Duration, NaiveDate, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::AppState;
use crate::database::models::{AttendanceQuery, CheckInInput, CheckOutInput, Coordinates};
use crate::error::AppError;
use crate::handlers::shared::{ApiResponse, optional_json};
use crate::services::Claims;
use crate::services::summary::summarize;

const DEFAULT_HISTORY_DAYS: i64 = 30;

#[derive(Debug, Deserialize)]
pub struct OfficeCheckQuery {
    pub latitude: f64,
    pub longitude: f64,
}

/// Check in for today
pub async fn check_in(
    claims: Claims,
    state: web::Data<AppState>,
    input: web::Json<CheckInInput>,
) -> Result<HttpResponse, AppError> {
    let input = input.into_inner();
    let location = Coordinates::new(input.latitude, input.longitude)?;

    let record = state
        .attendance
        .check_in(
            claims.user_id(),
            location,
            input.is_remote,
            input.notes,
            Utc::now(),
        )
        .await?;

    let message = if record.is_pending_approval() {
        "Checked in remotely, awaiting manager approval"
    } else {
        "Checked in successfully"
    };

    Ok(HttpResponse::Created().json(ApiResponse::success_with_message(
        state.attendance.view(record),
        message,
    )))
}

/// Check out of a specific session, or of the caller's open one
pub async fn check_out(
    claims: Claims,
    state: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let input: CheckOutInput = optional_json(&body)?;

    let location = match (input.latitude, input.longitude) {
        (Some(lat), Some(lon)) => Some(Coordinates::new(lat, lon)?),
        (None, None) => None,
        _ => {
            return Err(AppError::BadRequest(
                "latitude and longitude must be sent together".to_string(),
            ));
        }
    };

    let now = Utc::now();
    let record = match input.record_id {
        Some(record_id) => {
            state
                .attendance
                .check_out(claims.user_id(), record_id, location, now)
                .await?
        }
        None => {
            state
                .attendance
                .check_out_open(claims.user_id(), location, now)
                .await?
        }
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
        state.attendance.view(record),
        "Checked out successfully",
    )))
}

/// The caller's session for the current office day
pub async fn get_today(
    claims: Claims,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let record = state
        .attendance
        .today(claims.user_id(), Utc::now())
        .await?
        .map(|r| state.attendance.view(r));

    Ok(HttpResponse::Ok().json(ApiResponse::success(record)))
}

pub async fn get_record(
    claims: Claims,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let record = state
        .attendance
        .get(&claims.actor(), path.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(state.attendance.view(record))))
}

/// Resolve the query's user and date window, defaulting to the caller and the
/// last 30 days. Future dates are clamped to today.
fn query_window(
    claims: &Claims,
    state: &AppState,
    query: &AttendanceQuery,
) -> Result<(Uuid, NaiveDate, NaiveDate), AppError> {
    let today = state.attendance.policy().work_date(Utc::now());
    let to = query.to.unwrap_or(today).min(today);
    let from = match query.from {
        Some(from) => from,
        None => to
            .checked_sub_signed(Duration::days(DEFAULT_HISTORY_DAYS))
            .ok_or_else(|| AppError::BadRequest(format!("Date {} is out of range", to)))?,
    };

    Ok((query.user_id.unwrap_or(claims.user_id()), from, to))
}

pub async fn get_history(
    claims: Claims,
    state: web::Data<AppState>,
    query: web::Query<AttendanceQuery>,
) -> Result<HttpResponse, AppError> {
    let (user_id, from, to) = query_window(&claims, &state, &query)?;

    let records = state
        .attendance
        .history(&claims.actor(), user_id, from, to)
        .await?;
    let views: Vec<_> = records
        .into_iter()
        .map(|r| state.attendance.view(r))
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success(views)))
}

pub async fn get_summary(
    claims: Claims,
    state: web::Data<AppState>,
    query: web::Query<AttendanceQuery>,
) -> Result<HttpResponse, AppError> {
    let (user_id, from, to) = query_window(&claims, &state, &query)?;

    let records = state
        .attendance
        .history(&claims.actor(), user_id, from, to)
        .await?;
    let summary = summarize(user_id, &records, from, to, state.attendance.policy());

    Ok(HttpResponse::Ok().json(ApiResponse::success(summary)))
}

/// Distance preview so a client can tell the worker where they stand
pub async fn office_check(
    _claims: Claims,
    state: web::Data<AppState>,
    query: web::Query<OfficeCheckQuery>,
) -> Result<HttpResponse, AppError> {
    let check = state
        .attendance
        .radius_policy()
        .is_within_office(query.latitude, query.longitude)?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(check)))
}
