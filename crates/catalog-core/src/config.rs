use crate::app_config::{AppConfig, DiscoveryMode};
use crate::ConfigError;

pub(crate) const DEFAULT_BASE_URL: &str = "https://www.miumiu.com";
pub(crate) const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    // Empty values count as unset, so `SUPABASE_KEY=` in a `.env` disables upserts.
    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let or_default =
        |var: &str, default: &str| -> String { optional(var).unwrap_or_else(|| default.to_string()) };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let base_url = parse_base_url(&or_default("BASE_URL", DEFAULT_BASE_URL))?;
    let market = parse_path_segment("MARKET", &or_default("MARKET", "en"))?;
    let country = parse_path_segment("COUNTRY", &or_default("COUNTRY", "eu"))?;

    let supabase_url = optional("SUPABASE_URL").map(|u| u.trim_end_matches('/').to_string());
    let supabase_key = optional("SUPABASE_KEY");
    let supabase_table = or_default("SUPABASE_TABLE", "products");

    let dry_run = parse_flag(&or_default("DRY_RUN", "0"));
    // An unparseable LIMIT means no limit.
    let limit = optional("LIMIT")
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|n| *n > 0);
    let output_dir = PathBuf::from(or_default("OUTPUT_DIR", "output"));
    let log_level = or_default("LOG_LEVEL", "info");

    let scraper_request_timeout_secs = parse_u64("SCRAPER_REQUEST_TIMEOUT_SECS", "30")?;
    let scraper_user_agent = or_default("SCRAPER_USER_AGENT", DEFAULT_USER_AGENT);
    let scraper_request_delay_ms = parse_u64("SCRAPER_REQUEST_DELAY_MS", "1500")?;
    let scraper_max_pages = parse_usize("SCRAPER_MAX_PAGES", "200")?;
    if scraper_max_pages == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "SCRAPER_MAX_PAGES".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    let scraper_discovery = parse_discovery_mode(&or_default("SCRAPER_DISCOVERY", "categories"))?;

    Ok(AppConfig {
        base_url,
        market,
        country,
        supabase_url,
        supabase_key,
        supabase_table,
        dry_run,
        limit,
        output_dir,
        log_level,
        scraper_request_timeout_secs,
        scraper_user_agent,
        scraper_request_delay_ms,
        scraper_max_pages,
        scraper_discovery,
    })
}

/// Interpret a boolean-ish env value. `1`, `true`, and `yes` (any case) are true.
fn parse_flag(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes")
}

fn parse_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim_end_matches('/');
    let host = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"));
    match host {
        Some(h) if !h.is_empty() && !h.contains(char::is_whitespace) => Ok(trimmed.to_string()),
        _ => Err(ConfigError::InvalidEnvVar {
            var: "BASE_URL".to_string(),
            reason: format!("\"{raw}\" is not an http(s) URL"),
        }),
    }
}

fn parse_path_segment(var: &str, raw: &str) -> Result<String, ConfigError> {
    let segment = raw.trim_matches('/');
    if segment.is_empty() || segment.contains(['/', '?', '#']) {
        return Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: format!("\"{raw}\" is not a single path segment"),
        });
    }
    Ok(segment.to_string())
}

fn parse_discovery_mode(raw: &str) -> Result<DiscoveryMode, ConfigError> {
    match raw.to_ascii_lowercase().as_str() {
        "categories" => Ok(DiscoveryMode::Categories),
        "sitemap" => Ok(DiscoveryMode::Sitemap),
        "all" => Ok(DiscoveryMode::All),
        other => Err(ConfigError::InvalidEnvVar {
            var: "SCRAPER_DISCOVERY".to_string(),
            reason: format!("expected categories, sitemap, or all; got \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
