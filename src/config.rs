//! Build-time Configuration
//!
//! The API base URL is fixed when the bundle is built:
//! `QUERYDESK_ENV` selects the mode, `QUERYDESK_API_URL` overrides the URL.

const DEV_API_URL: &str = "http://localhost:3000/api/v1";
const PROD_API_URL: &str = "/api/v1";

/// Default page size for `GET /public_groups`
pub const PUBLIC_GROUPS_PAGE: u32 = 20;

/// How long a finished save stays visible before the indicator resets (ms)
pub const REQUEST_STATE_RESET_MS: u32 = 1_500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Development,
    Production,
}

impl Mode {
    fn parse(env: Option<&str>) -> Self {
        match env {
            Some("development") => Mode::Development,
            Some(_) => Mode::Production,
            None if cfg!(debug_assertions) => Mode::Development,
            None => Mode::Production,
        }
    }

    pub fn current() -> Self {
        Self::parse(option_env!("QUERYDESK_ENV"))
    }

    pub fn log_level(&self) -> log::LevelFilter {
        match self {
            Mode::Development => log::LevelFilter::Debug,
            Mode::Production => log::LevelFilter::Info,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub mode: Mode,
    pub base_url: String,
}

impl ApiConfig {
    fn resolve(mode: Mode, url_override: Option<&str>) -> Self {
        let base_url = match url_override {
            Some(url) if !url.trim().is_empty() => url.trim().trim_end_matches('/').to_string(),
            _ => match mode {
                Mode::Development => DEV_API_URL.to_string(),
                Mode::Production => PROD_API_URL.to_string(),
            },
        };
        Self { mode, base_url }
    }

    pub fn from_env() -> Self {
        Self::resolve(Mode::current(), option_env!("QUERYDESK_API_URL"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parse() {
        assert_eq!(Mode::parse(Some("development")), Mode::Development);
        assert_eq!(Mode::parse(Some("production")), Mode::Production);
        assert_eq!(Mode::parse(Some("staging")), Mode::Production);
    }

    #[test]
    fn test_base_url_by_mode() {
        assert_eq!(ApiConfig::resolve(Mode::Development, None).base_url, DEV_API_URL);
        assert_eq!(ApiConfig::resolve(Mode::Production, None).base_url, PROD_API_URL);
    }

    #[test]
    fn test_override_wins_and_is_trimmed() {
        let cfg = ApiConfig::resolve(Mode::Production, Some("https://db.example.org/api/"));
        assert_eq!(cfg.base_url, "https://db.example.org/api");
        assert_eq!(cfg.mode, Mode::Production);

        let blank = ApiConfig::resolve(Mode::Development, Some("  "));
        assert_eq!(blank.base_url, DEV_API_URL);
    }
}
