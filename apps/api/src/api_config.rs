use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use ticketdesk_core::AppError;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_CHANNEL_DENYLIST: &str = "logs,ticket-logs,webhook-logs";

#[derive(Debug, Clone)]
pub struct WebhookClientConfig {
    pub username: Option<String>,
    pub timeout: Duration,
    pub max_attempts: u8,
    pub retry_delay_ms: u64,
}

#[derive(Debug, Clone)]
pub struct DispatchConfig {
    pub max_retries: u32,
    pub base_delay: Duration,
    pub item_delay: Duration,
    pub idle_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub database_url: Option<String>,
    pub dashboard_token: String,
    pub api_host: String,
    pub api_port: u16,
    pub webhook_client: WebhookClientConfig,
    pub dispatch: DispatchConfig,
    pub access_cache_ttl_seconds: u32,
    pub log_channel_denylist: Vec<String>,
    pub private_log_webhook_url: Option<String>,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let migrate_only = env::args().nth(1).as_deref() == Some("migrate");

        let database_url = optional_non_empty_env("DATABASE_URL");
        if migrate_only && database_url.is_none() {
            return Err(AppError::Validation(
                "DATABASE_URL is required to run migrations".to_owned(),
            ));
        }

        let dashboard_token = required_env("DASHBOARD_TOKEN")?;
        if dashboard_token.trim().len() < 16 {
            return Err(AppError::Validation(
                "DASHBOARD_TOKEN must be at least 16 characters".to_owned(),
            ));
        }

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let api_port = parse_env_or("API_PORT", 3001_u16)?;

        let webhook_client = WebhookClientConfig {
            username: optional_non_empty_env("WEBHOOK_USERNAME"),
            timeout: Duration::from_millis(parse_env_or("WEBHOOK_TIMEOUT_MS", 10_000_u64)?),
            max_attempts: parse_env_or("WEBHOOK_MAX_ATTEMPTS", 3_u8)?,
            retry_delay_ms: parse_env_or("WEBHOOK_RETRY_DELAY_MS", 1_000_u64)?,
        };
        if webhook_client.max_attempts == 0 {
            return Err(AppError::Validation(
                "WEBHOOK_MAX_ATTEMPTS must be greater than zero".to_owned(),
            ));
        }

        let dispatch = DispatchConfig {
            max_retries: parse_env_or("DISPATCH_MAX_RETRIES", 3_u32)?,
            base_delay: Duration::from_millis(parse_env_or("DISPATCH_BASE_DELAY_MS", 1_000_u64)?),
            item_delay: Duration::from_millis(parse_env_or("DISPATCH_ITEM_DELAY_MS", 1_000_u64)?),
            idle_timeout: Duration::from_secs(parse_env_or(
                "DISPATCH_IDLE_TIMEOUT_SECONDS",
                300_u64,
            )?),
        };

        let access_cache_ttl_seconds = parse_env_or("ACCESS_CACHE_TTL_SECONDS", 300_u32)?;
        let log_channel_denylist = parse_denylist(
            env::var("LOG_CHANNEL_DENYLIST")
                .unwrap_or_else(|_| DEFAULT_LOG_CHANNEL_DENYLIST.to_owned())
                .as_str(),
        );
        let private_log_webhook_url = optional_non_empty_env("PRIVATE_LOG_WEBHOOK_URL");

        Ok(Self {
            migrate_only,
            database_url,
            dashboard_token,
            api_host,
            api_port,
            webhook_client,
            dispatch,
            access_cache_ttl_seconds,
            log_channel_denylist,
            private_log_webhook_url,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_env(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}

fn optional_non_empty_env(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

fn parse_env_or<T>(name: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match optional_non_empty_env(name) {
        Some(value) => parse_value(name, value.as_str()),
        None => Ok(default),
    }
}

fn parse_value<T>(name: &str, value: &str) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse::<T>()
        .map_err(|error| AppError::Validation(format!("invalid {name} '{value}': {error}")))
}

fn parse_denylist(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|entry| entry.trim().to_lowercase())
        .filter(|entry| !entry.is_empty())
        .collect()
}
