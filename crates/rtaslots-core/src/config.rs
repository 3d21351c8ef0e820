use std::path::PathBuf;

use crate::report::MergePolicy;
use crate::ConfigError;

/// Portal credentials, supplied once via the environment and read-only for
/// the lifetime of a run. Never logged in cleartext.
#[derive(Clone)]
pub struct Credentials {
    pub license_number: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("license_number", &"[redacted]")
            .field("password", &"[redacted]")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct CrawlConfig {
    pub credentials: Credentials,
    pub entry_url: String,
    pub webdriver_url: String,
    pub headless: bool,
    pub element_timeout_secs: u64,
    pub poll_interval_ms: u64,
    pub settle_min_ms: u64,
    pub settle_max_ms: u64,
    pub stop_threshold: u32,
    pub week_merge: MergePolicy,
    pub provision_attempts: u32,
    pub access_retries: u32,
    pub proxy_source_url: Option<String>,
    pub proxy_fetch_timeout_secs: u64,
    pub output_path: PathBuf,
    pub log_level: String,
}

/// Load crawl configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_config() -> Result<CrawlConfig, ConfigError> {
    dotenvy::dotenv().ok();
    build_config(|key| std::env::var(key))
}

/// Build crawl configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual
/// environment so it can be tested with a pure `HashMap` lookup.
fn build_config<F>(lookup: F) -> Result<CrawlConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        let raw = or_default(var, default);
        match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            other => Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!("expected a boolean, got \"{other}\""),
            }),
        }
    };

    let credentials = Credentials {
        license_number: require("LICENSE_NUMBER")?,
        password: require("PASSWORD")?,
    };

    let entry_url = or_default(
        "RTASLOTS_ENTRY_URL",
        "https://www.myrta.com/wps/portal/extvp/myrta/login/",
    );
    let webdriver_url = or_default("RTASLOTS_WEBDRIVER_URL", "http://localhost:9515");
    let headless = parse_bool("RTASLOTS_HEADLESS", "true")?;

    let element_timeout_secs = parse_u64("RTASLOTS_ELEMENT_TIMEOUT_SECS", "15")?;
    let poll_interval_ms = parse_u64("RTASLOTS_POLL_INTERVAL_MS", "500")?;

    let settle_min_ms = parse_u64("RTASLOTS_SETTLE_MIN_MS", "2000")?;
    let settle_max_ms = parse_u64("RTASLOTS_SETTLE_MAX_MS", "4000")?;
    if settle_min_ms > settle_max_ms {
        return Err(ConfigError::InvalidEnvVar {
            var: "RTASLOTS_SETTLE_MIN_MS".to_string(),
            reason: format!("minimum {settle_min_ms} exceeds maximum {settle_max_ms}"),
        });
    }

    let stop_threshold = parse_u32("RTASLOTS_STOP_THRESHOLD", "2")?;
    if stop_threshold == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "RTASLOTS_STOP_THRESHOLD".to_string(),
            reason: "threshold must be at least 1".to_string(),
        });
    }

    let week_merge = parse_merge_policy(&or_default("RTASLOTS_WEEK_MERGE", "overwrite"))?;

    let provision_attempts = parse_u32("RTASLOTS_PROVISION_ATTEMPTS", "3")?;
    if provision_attempts == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "RTASLOTS_PROVISION_ATTEMPTS".to_string(),
            reason: "at least one attempt is required".to_string(),
        });
    }
    let access_retries = parse_u32("RTASLOTS_ACCESS_RETRIES", "3")?;
    if access_retries == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "RTASLOTS_ACCESS_RETRIES".to_string(),
            reason: "at least one attempt is required".to_string(),
        });
    }

    let proxy_source_url = lookup("RTASLOTS_PROXY_SOURCE_URL").ok();
    let proxy_fetch_timeout_secs = parse_u64("RTASLOTS_PROXY_FETCH_TIMEOUT_SECS", "10")?;

    let output_path = PathBuf::from(or_default("RTASLOTS_OUTPUT_PATH", "docs/data.json"));
    let log_level = or_default("RTASLOTS_LOG_LEVEL", "info");

    Ok(CrawlConfig {
        credentials,
        entry_url,
        webdriver_url,
        headless,
        element_timeout_secs,
        poll_interval_ms,
        settle_min_ms,
        settle_max_ms,
        stop_threshold,
        week_merge,
        provision_attempts,
        access_retries,
        proxy_source_url,
        proxy_fetch_timeout_secs,
        output_path,
        log_level,
    })
}

fn parse_merge_policy(raw: &str) -> Result<MergePolicy, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "overwrite" => Ok(MergePolicy::Overwrite),
        "append" => Ok(MergePolicy::Append),
        other => Err(ConfigError::InvalidEnvVar {
            var: "RTASLOTS_WEEK_MERGE".to_string(),
            reason: format!("expected \"overwrite\" or \"append\", got \"{other}\""),
        }),
    }
}
