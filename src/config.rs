use crate::error::{AppError, Result};

pub const BASE_URL: &str = "https://jackpot-betslip.ke.sportpesa.com";

/// Fixed UTC+3 offset (East Africa Time) in milliseconds, applied to month
/// cursors so they land on the last local millisecond of the month.
pub const EAT_OFFSET_MS: i64 = 3 * 60 * 60 * 1000;

/// Attempts per URL before the request is recorded as failed.
pub const MAX_ATTEMPTS: u32 = 10;

/// Archive listings are capped at the first page. Months with more rounds
/// than this silently lose the tail (accepted limitation).
pub const ARCHIVE_PAGE_SIZE: u32 = 20;

/// Sleep range (seconds) between failed archive attempts and after each
/// archive listing completes.
pub const ARCHIVE_DELAY_RANGE: (f64, f64) = (3.0, 5.0);

/// Sleep range (seconds) after each jackpot's events are aggregated.
pub const JACKPOT_DELAY_RANGE: (f64, f64) = (3.0, 7.0);

#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub log_level: String,
    /// Inclusive scan range (START_YEAR..END_YEAR, START_MONTH..END_MONTH).
    pub start_year: i32,
    pub end_year: i32,
    pub start_month: u32,
    pub end_month: u32,
    /// Per-request timeout in seconds (HTTP_TIMEOUT_SECS).
    pub http_timeout_secs: u64,
    pub csv_path: String,
    pub failed_archive_path: String,
    pub failed_detail_path: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let cfg = Self {
            base_url: std::env::var("BASE_URL").unwrap_or_else(|_| BASE_URL.to_string()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            start_year: required_int("START_YEAR")?,
            end_year: required_int("END_YEAR")?,
            start_month: required_int("START_MONTH")?,
            end_month: required_int("END_MONTH")?,
            http_timeout_secs: std::env::var("HTTP_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse::<u64>()
                .unwrap_or(30),
            csv_path: std::env::var("CSV_PATH")
                .unwrap_or_else(|_| "historical_jackpots.csv".to_string()),
            failed_archive_path: std::env::var("FAILED_ARCHIVE_PATH")
                .unwrap_or_else(|_| "failed_timestamps.json".to_string()),
            failed_detail_path: std::env::var("FAILED_DETAIL_PATH")
                .unwrap_or_else(|_| "failed_jackpots.json".to_string()),
        };

        if !(1..=12).contains(&cfg.start_month) || !(1..=12).contains(&cfg.end_month) {
            return Err(AppError::Config(
                "START_MONTH and END_MONTH must be in 1..=12".to_string(),
            ));
        }
        if cfg.start_year > cfg.end_year {
            return Err(AppError::Config(
                "START_YEAR must not exceed END_YEAR".to_string(),
            ));
        }
        if cfg.start_year == cfg.end_year && cfg.start_month > cfg.end_month {
            return Err(AppError::Config(
                "START_MONTH must not exceed END_MONTH within a single year".to_string(),
            ));
        }

        Ok(cfg)
    }
}

fn required_int<T: std::str::FromStr>(name: &str) -> Result<T> {
    std::env::var(name)
        .map_err(|_| AppError::Config(format!("{name} must be set")))?
        .parse::<T>()
        .map_err(|_| AppError::Config(format!("{name} must be an integer")))
}
