use std::env;
use std::time::Duration;

/// Deployment environment, mirrored from the `ENVIRONMENT` variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
    Test,
}

impl Environment {
    pub fn parse(s: &str) -> Result<Self, String> {
        match s {
            "development" => Ok(Environment::Development),
            "production" => Ok(Environment::Production),
            "test" => Ok(Environment::Test),
            other => Err(format!(
                "ENVIRONMENT must be one of development|production|test, got '{}'",
                other
            )),
        }
    }
}

/// Bounded exponential backoff settings for the retry executor.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

/// Sliding-window admission settings for the in-process rate limiter.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    pub max_requests: usize,
    pub window: Duration,
}

/// Runtime configuration, loaded once at startup and immutable thereafter.
///
/// Env vars:
/// - GITHUB_TOKEN (or GH_TOKEN) [required]
/// - GITHUB_API_URL (default: https://api.github.com)
/// - GITHUB_API_VERSION (default: 2022-11-28)
/// - GITHUB_USER_AGENT (default: github-tools-mcp/<version>)
/// - GITHUB_HTTP_TIMEOUT_SECS (default: 30)
/// - ENVIRONMENT (development|production|test, default: development)
/// - LOG_LEVEL (error|warn|info|debug, default: info)
/// - RATE_LIMIT_MAX_REQUESTS (>= 1, default: 100)
/// - RATE_LIMIT_WINDOW_MS (>= 1000, default: 60000)
/// - MAX_RETRIES (0..=10, default: 3)
/// - RETRY_DELAY_MS (>= 100, default: 1000)
#[derive(Debug, Clone)]
pub struct Config {
    pub token: String,
    pub api_url: String,
    pub api_version: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    pub environment: Environment,
    pub log_level: String,
    pub retry: RetryPolicy,
    pub rate_limit: RateLimitConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let token = env::var("GITHUB_TOKEN")
            .or_else(|_| env::var("GH_TOKEN"))
            .map_err(|_| "Missing GITHUB_TOKEN or GH_TOKEN".to_string())?;
        if token.trim().is_empty() {
            return Err("GITHUB_TOKEN must not be empty".to_string());
        }

        let api_url =
            env::var("GITHUB_API_URL").unwrap_or_else(|_| "https://api.github.com".to_string());
        let api_version =
            env::var("GITHUB_API_VERSION").unwrap_or_else(|_| "2022-11-28".to_string());
        let user_agent = env::var("GITHUB_USER_AGENT")
            .unwrap_or_else(|_| format!("github-tools-mcp/{}", env!("CARGO_PKG_VERSION")));
        let timeout_secs = parse_var("GITHUB_HTTP_TIMEOUT_SECS", 30)?;

        let environment = match env::var("ENVIRONMENT") {
            Ok(s) => Environment::parse(&s)?,
            Err(_) => Environment::Development,
        };
        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        validate_log_level(&log_level)?;

        let max_retries = validate_max_retries(parse_var("MAX_RETRIES", 3)?)?;
        let retry_delay_ms = validate_retry_delay_ms(parse_var("RETRY_DELAY_MS", 1000)?)?;
        let rate_max = validate_rate_max_requests(parse_var("RATE_LIMIT_MAX_REQUESTS", 100)?)?;
        let rate_window_ms = validate_rate_window_ms(parse_var("RATE_LIMIT_WINDOW_MS", 60_000)?)?;

        Ok(Self {
            token,
            api_url,
            api_version,
            user_agent,
            timeout_secs,
            environment,
            log_level,
            retry: RetryPolicy {
                max_retries,
                base_delay: Duration::from_millis(retry_delay_ms),
            },
            rate_limit: RateLimitConfig {
                max_requests: rate_max,
                window: Duration::from_millis(rate_window_ms),
            },
        })
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T, String> {
    match env::var(name) {
        Ok(s) => s
            .parse::<T>()
            .map_err(|_| format!("{} must be a number, got '{}'", name, s)),
        Err(_) => Ok(default),
    }
}

fn validate_log_level(level: &str) -> Result<(), String> {
    match level {
        "error" | "warn" | "info" | "debug" => Ok(()),
        other => Err(format!(
            "LOG_LEVEL must be one of error|warn|info|debug, got '{}'",
            other
        )),
    }
}

fn validate_max_retries(n: u32) -> Result<u32, String> {
    if n > 10 {
        return Err(format!("MAX_RETRIES must be between 0 and 10, got {}", n));
    }
    Ok(n)
}

fn validate_retry_delay_ms(n: u64) -> Result<u64, String> {
    if n < 100 {
        return Err(format!("RETRY_DELAY_MS must be at least 100, got {}", n));
    }
    Ok(n)
}

fn validate_rate_max_requests(n: usize) -> Result<usize, String> {
    if n < 1 {
        return Err("RATE_LIMIT_MAX_REQUESTS must be at least 1".to_string());
    }
    Ok(n)
}

fn validate_rate_window_ms(n: u64) -> Result<u64, String> {
    if n < 1000 {
        return Err(format!(
            "RATE_LIMIT_WINDOW_MS must be at least 1000, got {}",
            n
        ));
    }
    Ok(n)
}
