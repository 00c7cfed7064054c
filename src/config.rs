use std::time::Duration;
use tracing::Level;

/// Artificial waits standing in for network round-trips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delays {
    pub ratio_fetch: Duration,
    pub stock_fetch: Duration,
    pub refresh: Duration,
    pub apply_filters: Duration,
    pub upload_tick: Duration,
    pub export: Duration,
}

impl Default for Delays {
    fn default() -> Self {
        Delays {
            ratio_fetch: Duration::from_millis(800),
            stock_fetch: Duration::from_millis(1000),
            refresh: Duration::from_millis(800),
            apply_filters: Duration::from_millis(800),
            upload_tick: Duration::from_millis(300),
            export: Duration::from_millis(1500),
        }
    }
}

impl Delays {
    /// No waiting at all. Used by tests.
    pub fn none() -> Self {
        Delays {
            ratio_fetch: Duration::ZERO,
            stock_fetch: Duration::ZERO,
            refresh: Duration::ZERO,
            apply_filters: Duration::ZERO,
            upload_tick: Duration::ZERO,
            export: Duration::ZERO,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub frontend_url: String,
    pub bind_addr: String,
    pub prefs_db_path: String,
    pub sessions_db_path: String,
    pub report_share_base: String,
    pub alpha_vantage_api_key: Option<String>,
    pub delays: Delays,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            frontend_url: "http://localhost:5173".to_string(),
            bind_addr: "0.0.0.0:3000".to_string(),
            prefs_db_path: "prefs.sqlite".to_string(),
            sessions_db_path: "sessions.db".to_string(),
            report_share_base: "https://example.com/files".to_string(),
            alpha_vantage_api_key: None,
            delays: Delays::default(),
        }
    }
}

impl Config {
    /// Build the configuration from `.env` and the process environment.
    pub fn from_env() -> Self {
        // Initalize dotenv so we can read .env file
        dotenv::dotenv().ok();
        Self::from_lookup(|key| dotenv::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let string_or = |key: &str, default: String| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(default)
        };
        let millis_or = |key: &str, default: Duration| match lookup(key) {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(ms) => Duration::from_millis(ms),
                Err(_) => {
                    tracing::warn!("Ignoring malformed {}={:?}", key, raw);
                    default
                }
            },
            None => default,
        };

        let d = defaults.delays;
        Config {
            frontend_url: string_or("FRONTEND_URL", defaults.frontend_url)
                .trim_end_matches('/')
                .to_string(),
            bind_addr: string_or("BIND_ADDR", defaults.bind_addr),
            prefs_db_path: string_or("PREFS_DB_PATH", defaults.prefs_db_path),
            sessions_db_path: string_or("SESSIONS_DB_PATH", defaults.sessions_db_path),
            report_share_base: string_or("REPORT_SHARE_BASE", defaults.report_share_base)
                .trim_end_matches('/')
                .to_string(),
            alpha_vantage_api_key: lookup("ALPHA_VANTAGE_API_KEY")
                .filter(|v| !v.trim().is_empty()),
            delays: Delays {
                ratio_fetch: millis_or("RATIO_FETCH_DELAY_MS", d.ratio_fetch),
                stock_fetch: millis_or("STOCK_FETCH_DELAY_MS", d.stock_fetch),
                refresh: millis_or("REFRESH_DELAY_MS", d.refresh),
                apply_filters: millis_or("APPLY_DELAY_MS", d.apply_filters),
                upload_tick: millis_or("UPLOAD_TICK_MS", d.upload_tick),
                export: millis_or("EXPORT_DELAY_MS", d.export),
            },
        }
    }
}

/// Set the log level based on the first command line argument.
pub fn parse_log_level(arg: Option<&str>) -> Level {
    match arg {
        Some("debug") => Level::DEBUG,
        Some("warn") => Level::WARN,
        Some("error") => Level::ERROR,
        _ => Level::INFO,
    }
}
