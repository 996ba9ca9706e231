use clap::Parser;
use std::time::Duration;

use crate::reports::DEFAULT_BASE_URL;
use crate::sports::Sport;

/// Elo sports-rating report viewer
#[derive(Parser, Debug, Clone)]
#[command(name = "elo-reports", version, about)]
pub struct Config {
    /// Dashboard listen address
    #[arg(long, env = "DASHBOARD_ADDR", default_value = "0.0.0.0:8080")]
    pub dashboard_addr: String,

    /// Base URL of the static report store
    #[arg(long, env = "REPORTS_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub reports_base_url: String,

    /// Timeout for a single report request, in seconds
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value = "10")]
    pub request_timeout_secs: u64,

    /// How often the home-page aggregate is re-swept (0 = only at start-up)
    #[arg(long, env = "SESSION_REFRESH_SECS", default_value = "900")]
    pub session_refresh_secs: u64,

    /// How long a page keeps data for the selected sport (0 = until the sport changes)
    #[arg(long, env = "PAGE_MAX_AGE_SECS", default_value = "300")]
    pub page_max_age_secs: u64,

    /// Sport preselected in the dashboard
    #[arg(long, env = "DEFAULT_SPORT", default_value = "COLLEGE_BASKETBALL")]
    pub default_sport: String,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        let url = url::Url::parse(&self.reports_base_url)
            .map_err(|e| anyhow::anyhow!("reports_base_url is not a valid URL: {}", e))?;
        if !matches!(url.scheme(), "http" | "https") {
            anyhow::bail!("reports_base_url must be http(s), got {}", url.scheme());
        }
        if self.request_timeout_secs == 0 {
            anyhow::bail!("request_timeout_secs must be positive");
        }
        self.default_sport()?;
        Ok(())
    }

    pub fn default_sport(&self) -> anyhow::Result<Sport> {
        Ok(self.default_sport.parse::<Sport>()?)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn session_refresh(&self) -> Option<Duration> {
        (self.session_refresh_secs > 0).then(|| Duration::from_secs(self.session_refresh_secs))
    }

    pub fn page_max_age(&self) -> Option<Duration> {
        (self.page_max_age_secs > 0).then(|| Duration::from_secs(self.page_max_age_secs))
    }
}
