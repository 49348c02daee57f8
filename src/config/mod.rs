use crate::core::{AppError, Result};
use std::env;
use std::path::PathBuf;

use chrono::NaiveTime;
use rust_decimal::Decimal;

pub mod database;
pub mod server;
pub mod statutory;

pub use database::DatabaseConfig;
pub use server::ServerConfig;
pub use statutory::StatutoryConfig;

use crate::modules::payroll::PayrollSettings;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub payroll: PayrollConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub log_level: String,
}

/// Payroll switches and statutory tables
#[derive(Debug, Clone)]
pub struct PayrollConfig {
    /// YAML override for the statutory tables
    pub rates_file: Option<PathBuf>,
    pub overtime_enabled: bool,
    pub statutory: StatutoryConfig,
}

impl PayrollConfig {
    pub fn from_env() -> Result<Self> {
        let rates_file = env::var("PAYROLL_RATES_FILE").ok().map(PathBuf::from);

        let mut statutory = match &rates_file {
            Some(path) => StatutoryConfig::from_file(path)?,
            None => StatutoryConfig::default(),
        };

        if let Ok(value) = env::var("PAYROLL_STANDARD_CHECK_IN") {
            statutory.attendance.standard_check_in = NaiveTime::parse_from_str(&value, "%H:%M")
                .map_err(|_| {
                    AppError::Configuration(format!(
                        "Invalid PAYROLL_STANDARD_CHECK_IN '{}', expected HH:MM",
                        value
                    ))
                })?;
        }

        if let Ok(value) = env::var("PAYROLL_LATE_PENALTY_PER_MINUTE") {
            statutory.attendance.late_penalty_per_minute =
                value.parse::<Decimal>().map_err(|_| {
                    AppError::Configuration("Invalid PAYROLL_LATE_PENALTY_PER_MINUTE".to_string())
                })?;
        }

        Ok(Self {
            rates_file,
            overtime_enabled: parse_flag("PAYROLL_OVERTIME_ENABLED")?,
            statutory,
        })
    }

    pub fn settings(&self) -> PayrollSettings {
        PayrollSettings {
            overtime_enabled: self.overtime_enabled,
            attendance: self.statutory.attendance.clone(),
        }
    }
}

fn parse_flag(name: &str) -> Result<bool> {
    match env::var(name) {
        Err(_) => Ok(false),
        Ok(value) => match value.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" | "" => Ok(false),
            _ => Err(AppError::Configuration(format!("Invalid {}: {}", name, value))),
        },
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = Config {
            app: AppConfig {
                env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
                log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            },
            database: DatabaseConfig::from_env()?,
            server: ServerConfig::from_env()?,
            payroll: PayrollConfig::from_env()?,
        };

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.database.pool_size > self.database.max_connections {
            return Err(AppError::Configuration(
                "DATABASE_POOL_SIZE cannot exceed DATABASE_MAX_CONNECTIONS".to_string(),
            ));
        }

        if self.server.workers == 0 {
            return Err(AppError::Configuration(
                "Server workers must be greater than 0".to_string(),
            ));
        }

        self.payroll.statutory.validate()
    }
}
