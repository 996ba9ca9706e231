//! In-memory report source for loader and session tests.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest::StatusCode;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use super::models::{
    EvaluationSet, Event, EventsReport, SystemSettings, TeamRating, TeamRatingsReport,
};
use super::source::ReportSource;
use crate::error::{ReportError, Result};
use crate::sports::Sport;

#[derive(Default)]
pub struct StaticSource {
    pub upcoming: HashMap<Sport, Vec<Event>>,
    pub previous: HashMap<Sport, Vec<Event>>,
    pub evaluations: HashMap<Sport, EvaluationSet>,
    pub settings: HashMap<Sport, SystemSettings>,
    pub ratings: HashMap<Sport, Vec<TeamRating>>,
    pub failing: HashSet<Sport>,
    /// Artificial latency per sport, for out-of-order completion tests.
    pub delays: HashMap<Sport, std::time::Duration>,
    pub calls: AtomicUsize,
}

impl StaticSource {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn hit(&self, sport: Sport) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delays.get(&sport) {
            tokio::time::sleep(*delay).await;
        }
        if self.failing.contains(&sport) {
            return Err(ReportError::RequestFailed {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                url: format!("test://{}", sport.path()),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ReportSource for StaticSource {
    fn name(&self) -> &str {
        "static"
    }

    async fn upcoming_events(&self, sport: Sport) -> Result<EventsReport> {
        self.hit(sport).await?;
        Ok(EventsReport {
            events: self.upcoming.get(&sport).cloned(),
            lastupdated: None,
        })
    }

    async fn previous_events(&self, sport: Sport) -> Result<EventsReport> {
        self.hit(sport).await?;
        Ok(EventsReport {
            events: self.previous.get(&sport).cloned(),
            lastupdated: None,
        })
    }

    async fn evaluation(&self, sport: Sport) -> Result<EvaluationSet> {
        self.hit(sport).await?;
        Ok(self.evaluations.get(&sport).cloned().unwrap_or_default())
    }

    async fn settings(&self, sport: Sport) -> Result<SystemSettings> {
        self.hit(sport).await?;
        self.settings
            .get(&sport)
            .cloned()
            .ok_or_else(|| ReportError::RequestFailed {
                status: StatusCode::NOT_FOUND,
                url: format!("test://{}/system_settings.json", sport.path()),
            })
    }

    async fn team_ratings(&self, sport: Sport) -> Result<TeamRatingsReport> {
        self.hit(sport).await?;
        Ok(TeamRatingsReport {
            teams: self.ratings.get(&sport).cloned(),
            lastupdated: None,
        })
    }
}

pub fn event_at(datetime: DateTime<Utc>, home: &str, away: &str) -> Event {
    Event {
        id: None,
        datetime: datetime.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
        home_team_name: home.to_string(),
        away_team_name: away.to_string(),
        elo_spread: Some(-3.5),
        home_elo_prob: Some(0.62),
        away_elo_prob: Some(0.38),
        home_elo_pre: Some(1550.0),
        away_elo_pre: Some(1500.0),
        elo_diff: Some(50.0),
        neutral_site: None,
        is_postseason: None,
        season: None,
        point_dif: None,
        result: None,
        home_team_score: None,
        away_team_score: None,
    }
}

pub fn hours_from_now(now: DateTime<Utc>, hours: i64) -> DateTime<Utc> {
    now + Duration::hours(hours)
}

pub fn settings_for(sport: Sport) -> SystemSettings {
    SystemSettings {
        system_name: format!("{} ELO System", sport.display_name().to_uppercase()),
        k: 20.0,
        hfa: 60.0,
        mean_elo: 1505.0,
        number_of_teams: 30,
        number_of_seasons: 8,
        lastupdated: None,
    }
}
