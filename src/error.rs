use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use thiserror::Error;
use uuid::Uuid;

use crate::handlers::shared::ApiResponse;

/// Caller-visible failures of the attendance core. None of these are fatal and
/// none are retried internally.
#[derive(Error, Debug)]
pub enum AttendanceError {
    #[error("An open attendance session already exists for today")]
    AlreadyCheckedIn,

    #[error("Attendance record {0} is already checked out")]
    AlreadyCheckedOut(Uuid),

    #[error(
        "Location is {distance_meters:.0}m from the office, outside the allowed {allowed_radius_meters:.0}m"
    )]
    OutOfRange {
        distance_meters: f64,
        allowed_radius_meters: f64,
    },

    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    #[error("Invalid date range: {0}")]
    InvalidDateRange(String),

    #[error("Allowed radius must be between 10 and 5000 meters, got {0}")]
    InvalidRadius(f64),

    #[error("Check-out time must be after check-in time")]
    CheckOutBeforeCheckIn,

    #[error("{0}")]
    NotFound(String),

    #[error("Approval for attendance record {0} has already been resolved")]
    AlreadyResolved(Uuid),

    #[error("Not authorized: {0}")]
    Unauthorized(String),

    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

pub type AttendanceResult<T> = Result<T, AttendanceError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    DatabaseError(sqlx::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unprocessable: {0}")]
    Unprocessable(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();
        let error_message = self.to_string();

        if status_code.is_server_error() {
            log::error!(
                "Request failed with status {}: {}",
                status_code,
                error_message
            );
        } else {
            log::info!("Request rejected with status {}: {}", status_code, error_message);
        }

        HttpResponse::build(status_code).json(ApiResponse::<()>::error(&error_message))
    }
}

impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> Self {
        log::error!("Database error: {}", error);
        AppError::DatabaseError(error)
    }
}

impl AttendanceError {
    pub fn record_not_found(id: Uuid) -> Self {
        AttendanceError::NotFound(format!("Attendance record {} not found", id))
    }
}

impl From<AttendanceError> for AppError {
    fn from(error: AttendanceError) -> Self {
        let message = error.to_string();
        match error {
            AttendanceError::AlreadyCheckedIn
            | AttendanceError::AlreadyCheckedOut(_)
            | AttendanceError::AlreadyResolved(_) => AppError::Conflict(message),
            AttendanceError::OutOfRange { .. } => AppError::Unprocessable(message),
            AttendanceError::InvalidCoordinate(_)
            | AttendanceError::InvalidRadius(_)
            | AttendanceError::InvalidDateRange(_)
            | AttendanceError::CheckOutBeforeCheckIn => AppError::BadRequest(message),
            AttendanceError::NotFound(what) => AppError::NotFound(what),
            AttendanceError::Unauthorized(reason) => AppError::PermissionDenied(reason),
            AttendanceError::Storage(e) => AppError::from(e),
        }
    }
}
