use anyhow::{Context, Result, bail};
use chrono::{FixedOffset, NaiveTime};
use std::env;

use crate::database::models::OfficeLocation;
use crate::services::policy::AttendancePolicy;

const DEFAULT_JWT_SECRET: &str = "your-super-secret-jwt-key-change-this-in-production-12345";
const DEFAULT_OFFICE_LATITUDE: f64 = 47.916646;
const DEFAULT_OFFICE_LONGITUDE: f64 = 106.908877;
const DEFAULT_OFFICE_RADIUS_METERS: f64 = 3000.0;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expiration_days: i64,
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub client_base_url: String,

    // Office point used until an admin stores a different one
    pub office_latitude: f64,
    pub office_longitude: f64,
    pub office_radius_meters: f64,

    pub work_start_time: NaiveTime,
    pub half_day_threshold_hours: f64,
    pub utc_offset_minutes: i32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        Self::from_env_only()
    }

    /// Load configuration from environment variables only (without loading .env files)
    /// This is useful for testing where you want to control the environment directly
    pub fn from_env_only() -> Result<Self> {
        let work_start_raw = env::var("WORK_START_TIME").unwrap_or_else(|_| "09:00".to_string());
        let work_start_time = NaiveTime::parse_from_str(&work_start_raw, "%H:%M")
            .with_context(|| format!("WORK_START_TIME must be HH:MM, got {}", work_start_raw))?;

        let config = Config {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://localhost:5432/attendance".to_string()),
            jwt_secret: env::var("JWT_SECRET").unwrap_or_else(|_| DEFAULT_JWT_SECRET.to_string()),
            jwt_expiration_days: parse_or("JWT_EXPIRATION_DAYS", 30),
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_or("PORT", 8080),
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            client_base_url: env::var("CLIENT_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            office_latitude: parse_or("OFFICE_LATITUDE", DEFAULT_OFFICE_LATITUDE),
            office_longitude: parse_or("OFFICE_LONGITUDE", DEFAULT_OFFICE_LONGITUDE),
            office_radius_meters: parse_or("OFFICE_RADIUS_METERS", DEFAULT_OFFICE_RADIUS_METERS),
            work_start_time,
            half_day_threshold_hours: parse_or("HALF_DAY_THRESHOLD_HOURS", 4.0),
            utc_offset_minutes: parse_or("UTC_OFFSET_MINUTES", 480),
        };

        if config.is_production() && config.jwt_secret == DEFAULT_JWT_SECRET {
            bail!("JWT_SECRET must be set in production");
        }

        Ok(config)
    }

    /// Fixed configuration for tests; never reads the environment.
    pub fn test_config() -> Self {
        Config {
            database_url: "postgres://localhost:5432/attendance_test".to_string(),
            jwt_secret: "test-jwt-secret-key-that-is-long-enough".to_string(),
            jwt_expiration_days: 1,
            host: "127.0.0.1".to_string(),
            port: 0,
            environment: "test".to_string(),
            client_base_url: "http://localhost:3000".to_string(),
            office_latitude: DEFAULT_OFFICE_LATITUDE,
            office_longitude: DEFAULT_OFFICE_LONGITUDE,
            office_radius_meters: DEFAULT_OFFICE_RADIUS_METERS,
            work_start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default(),
            half_day_threshold_hours: 4.0,
            utc_offset_minutes: 0,
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Default log filter when `RUST_LOG` is unset.
    pub fn default_log_filter(&self) -> &'static str {
        if self.is_development() { "debug" } else { "info" }
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Office point the process starts with when nothing has been persisted yet.
    pub fn default_office_location(&self) -> OfficeLocation {
        OfficeLocation {
            latitude: self.office_latitude,
            longitude: self.office_longitude,
            allowed_radius_meters: self.office_radius_meters,
        }
    }

    pub fn attendance_policy(&self) -> Result<AttendancePolicy> {
        let offset = FixedOffset::east_opt(self.utc_offset_minutes * 60)
            .with_context(|| format!("UTC_OFFSET_MINUTES out of range: {}", self.utc_offset_minutes))?;

        Ok(AttendancePolicy {
            work_start_time: self.work_start_time,
            half_day_threshold_hours: self.half_day_threshold_hours,
            utc_offset: offset,
        })
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}
