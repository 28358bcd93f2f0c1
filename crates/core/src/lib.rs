pub mod backend;
pub mod dashboard;
pub mod domain;
pub mod metrics;
pub mod news;
pub mod time;

pub mod config {
    pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub api_base_url: String,
        pub request_timeout_secs: u64,
        pub sentry_dsn: Option<String>,
    }

    impl Default for Settings {
        fn default() -> Self {
            Self {
                api_base_url: DEFAULT_API_BASE_URL.to_string(),
                request_timeout_secs: DEFAULT_TIMEOUT_SECS,
                sentry_dsn: None,
            }
        }
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            let api_base_url = std::env::var("OPTDASH_API_BASE_URL")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

            let request_timeout_secs = match std::env::var("OPTDASH_TIMEOUT_SECS") {
                Ok(s) => {
                    let secs = s.trim().parse::<u64>().map_err(|e| {
                        anyhow::anyhow!("OPTDASH_TIMEOUT_SECS must be an integer ({e}): {s:?}")
                    })?;
                    anyhow::ensure!(secs > 0, "OPTDASH_TIMEOUT_SECS must be > 0");
                    secs
                }
                Err(_) => DEFAULT_TIMEOUT_SECS,
            };

            Ok(Self {
                api_base_url,
                request_timeout_secs,
                sentry_dsn: std::env::var("SENTRY_DSN")
                    .ok()
                    .filter(|s| !s.trim().is_empty()),
            })
        }

        pub fn with_api_base_url(mut self, api_base_url: Option<String>) -> Self {
            if let Some(url) = api_base_url.filter(|s| !s.trim().is_empty()) {
                self.api_base_url = url;
            }
            self
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn override_replaces_base_url_only_when_set() {
            let s = Settings::default().with_api_base_url(None);
            assert_eq!(s.api_base_url, DEFAULT_API_BASE_URL);

            let s = s.with_api_base_url(Some("  ".to_string()));
            assert_eq!(s.api_base_url, DEFAULT_API_BASE_URL);

            let s = s.with_api_base_url(Some("https://api.example.com".to_string()));
            assert_eq!(s.api_base_url, "https://api.example.com");
            assert_eq!(s.request_timeout_secs, DEFAULT_TIMEOUT_SECS);
        }
    }
}
