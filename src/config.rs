use std::net::IpAddr;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: PathBuf,
    pub host: IpAddr,
    pub port: u16,
    pub max_body_size: usize,
    pub static_dir: String,
    pub cors_origins: Vec<String>,
    pub rate_limit: u32,
    pub rate_limit_window_secs: u64,
    pub log_level: String,
    pub clickup: Option<ClickUpConfig>,
    pub webhook: Option<WebhookConfig>,
}

/// Task-board lookup integration (ClickUp).
#[derive(Debug, Clone)]
pub struct ClickUpConfig {
    pub api_token: String,
    pub list_id: String,
    pub api_base: String,
    /// Only tasks whose status is in this set are offered as options.
    /// Empty means no filtering.
    pub status_filter: Vec<String>,
    pub cf_project_manager_id: Option<String>,
    pub cf_bsl2_checkbox_id: String,
    pub timeout_secs: u64,
}

/// Automation webhook integration (Power Automate flow).
#[derive(Debug, Clone)]
pub struct WebhookConfig {
    pub url: String,
    pub timeout_secs: u64,
    /// How long a request waits for delivery before letting it continue
    /// detached.
    pub wait_before_return_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let database_path =
            PathBuf::from(env_or("LABINTAKE_DATABASE", "reception_log.db"));

        let host: IpAddr = env_or("LABINTAKE_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid LABINTAKE_HOST: {e}"))?;

        let port: u16 = env_or("LABINTAKE_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid LABINTAKE_PORT: {e}"))?;

        let max_body_size: usize = env_or("LABINTAKE_MAX_BODY_SIZE", "1048576")
            .parse()
            .map_err(|e| format!("Invalid LABINTAKE_MAX_BODY_SIZE: {e}"))?;

        let static_dir = env_or("LABINTAKE_STATIC_DIR", "static");

        let cors_origins: Vec<String> = env_or("LABINTAKE_CORS_ORIGINS", "")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let rate_limit: u32 = env_or("LABINTAKE_RATE_LIMIT", "30")
            .parse()
            .map_err(|e| format!("Invalid LABINTAKE_RATE_LIMIT: {e}"))?;

        let rate_limit_window_secs: u64 = env_or("LABINTAKE_RATE_LIMIT_WINDOW_SECS", "60")
            .parse()
            .map_err(|e| format!("Invalid LABINTAKE_RATE_LIMIT_WINDOW_SECS: {e}"))?;

        let log_level = env_or("LABINTAKE_LOG_LEVEL", "info");

        let clickup = clickup_from_env()?;
        let webhook = webhook_from_env()?;

        Ok(Config {
            database_path,
            host,
            port,
            max_body_size,
            static_dir,
            cors_origins,
            rate_limit,
            rate_limit_window_secs,
            log_level,
            clickup,
            webhook,
        })
    }
}

fn clickup_from_env() -> Result<Option<ClickUpConfig>, String> {
    let api_token = std::env::var("CLICKUP_API_TOKEN")
        .ok()
        .filter(|s| !s.is_empty());
    let list_id = std::env::var("CLICKUP_LIST_ID")
        .ok()
        .filter(|s| !s.is_empty());

    let configured = api_token.is_some() && list_id.is_some();
    if !integration_enabled("CLICKUP_ENABLED", "ClickUp", configured)? {
        return Ok(None);
    }

    let status_filter: Vec<String> = env_or("CLICKUP_STATUS_FILTER_VALUES", "")
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    Ok(Some(ClickUpConfig {
        api_token: api_token.unwrap(),
        list_id: list_id.unwrap(),
        api_base: normalize_base(&env_or(
            "CLICKUP_API_BASE",
            "https://api.clickup.com/api/v2",
        )),
        status_filter,
        cf_project_manager_id: std::env::var("CLICKUP_CF_PROJECT_MANAGER_ID")
            .ok()
            .filter(|s| !s.is_empty()),
        cf_bsl2_checkbox_id: env_or(
            "CLICKUP_CF_BSL2_CHECKBOX_ID",
            "f394f3db-0812-4ecf-91d8-2ea9a608762e",
        ),
        timeout_secs: env_or("CLICKUP_TIMEOUT_S", "30")
            .parse()
            .map_err(|e| format!("Invalid CLICKUP_TIMEOUT_S: {e}"))?,
    }))
}

fn webhook_from_env() -> Result<Option<WebhookConfig>, String> {
    let url = std::env::var("POWER_AUTOMATE_WEBHOOK_URL")
        .ok()
        .filter(|s| !s.is_empty());

    if !integration_enabled("POWER_AUTOMATE_ENABLED", "Power Automate", url.is_some())? {
        return Ok(None);
    }

    Ok(Some(WebhookConfig {
        url: url.unwrap(),
        timeout_secs: env_or("PA_TIMEOUT_S", "30")
            .parse()
            .map_err(|e| format!("Invalid PA_TIMEOUT_S: {e}"))?,
        wait_before_return_secs: env_or("PA_WAIT_BEFORE_RETURN_S", "6")
            .parse()
            .map_err(|e| format!("Invalid PA_WAIT_BEFORE_RETURN_S: {e}"))?,
    }))
}

/// Tri-state enable flag: unset means "on when configured", an explicit "1"
/// makes missing variables a startup error, "0"/"false" turns the
/// integration off regardless.
fn integration_enabled(flag: &str, label: &str, configured: bool) -> Result<bool, String> {
    match std::env::var(flag) {
        Err(_) => Ok(configured),
        Ok(v) if matches!(v.trim(), "0" | "false" | "False" | "no") => Ok(false),
        Ok(_) => {
            if configured {
                Ok(true)
            } else {
                Err(format!(
                    "{flag} is set but {label} is not fully configured; refusing to start"
                ))
            }
        }
    }
}

/// Trim trailing slashes so path joins stay predictable.
fn normalize_base(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
