use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use super::models::{EvaluationSet, EventsReport, SystemSettings, TeamRatingsReport};
use super::source::ReportSource;
use crate::error::{ReportError, Result};
use crate::sports::Sport;

pub const DEFAULT_BASE_URL: &str =
    "https://raw.githubusercontent.com/theedgepredictor/elo-rating/main/data/reports";

/// The report files published for every sport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    UpcomingEvents,
    PreviousEvents,
    SystemEvaluation,
    SystemSettings,
    TeamRatings,
}

impl ReportKind {
    pub fn file_stem(self) -> &'static str {
        match self {
            ReportKind::UpcomingEvents => "upcoming_event_ratings",
            ReportKind::PreviousEvents => "previous_event_ratings",
            ReportKind::SystemEvaluation => "system_evaluation",
            ReportKind::SystemSettings => "system_settings",
            ReportKind::TeamRatings => "team_ratings",
        }
    }
}

/// Client for the static JSON report store.
#[derive(Clone)]
pub struct ReportClient {
    http: Client,
    base_url: String,
}

impl ReportClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(ReportClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self, sport: Sport, kind: ReportKind) -> String {
        format!("{}/{}/{}.json", self.base_url, sport.path(), kind.file_stem())
    }

    async fn get<T: DeserializeOwned>(&self, sport: Sport, kind: ReportKind) -> Result<T> {
        let url = self.endpoint(sport, kind);
        debug!("Fetching report {}", url);

        let resp = self.http.get(&url).send().await?;
        if !resp.status().is_success() {
            return Err(ReportError::RequestFailed {
                status: resp.status(),
                url,
            });
        }

        let body = resp.bytes().await?;
        serde_json::from_slice(&body).map_err(|source| ReportError::Decode { url, source })
    }
}

#[async_trait]
impl ReportSource for ReportClient {
    fn name(&self) -> &str {
        "report-store"
    }

    async fn upcoming_events(&self, sport: Sport) -> Result<EventsReport> {
        self.get(sport, ReportKind::UpcomingEvents).await
    }

    async fn previous_events(&self, sport: Sport) -> Result<EventsReport> {
        self.get(sport, ReportKind::PreviousEvents).await
    }

    async fn evaluation(&self, sport: Sport) -> Result<EvaluationSet> {
        self.get(sport, ReportKind::SystemEvaluation).await
    }

    async fn settings(&self, sport: Sport) -> Result<SystemSettings> {
        self.get(sport, ReportKind::SystemSettings).await
    }

    async fn team_ratings(&self, sport: Sport) -> Result<TeamRatingsReport> {
        self.get(sport, ReportKind::TeamRatings).await
    }
}
