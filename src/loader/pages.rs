use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;
use tracing::info;

use super::events::{EventWindow, PastSummary};
use super::{LoadState, PageLoader};
use crate::reports::models::{EvaluationReport, EvaluationSet, Event, SystemSettings, TeamRating};
use crate::reports::ReportSource;
use crate::sports::Sport;

/// Upcoming or past event list for one sport.
pub struct EventsPage {
    window: EventWindow,
    loader: PageLoader<Vec<Event>>,
}

impl EventsPage {
    pub fn new(window: EventWindow, max_age: Option<Duration>) -> Self {
        let name = match window {
            EventWindow::Upcoming => "upcoming-events",
            EventWindow::Past => "past-events",
        };
        EventsPage {
            window,
            loader: PageLoader::new(name, max_age),
        }
    }

    pub async fn load(
        &self,
        source: &dyn ReportSource,
        sport: Sport,
        now: DateTime<Utc>,
    ) -> LoadState<Vec<Event>> {
        let window = self.window;
        self.loader
            .load(sport, || async move {
                let report = match window {
                    EventWindow::Upcoming => source.upcoming_events(sport).await?,
                    EventWindow::Past => source.previous_events(sport).await?,
                };
                let events = window.apply(report.events.unwrap_or_default(), now);
                info!("{}: {} {:?} events in window", sport, events.len(), window);
                Ok((!events.is_empty()).then_some(events))
            })
            .await
    }
}

/// Sport detail / team ratings page: engine settings plus the ratings table.
#[derive(Debug, Clone, Serialize)]
pub struct SportDetail {
    pub sport: Sport,
    pub name: &'static str,
    pub settings: LoadState<SystemSettings>,
    pub teams: LoadState<Vec<TeamRating>>,
}

pub struct SportPage {
    settings: PageLoader<SystemSettings>,
    ratings: PageLoader<Vec<TeamRating>>,
}

impl SportPage {
    pub fn new(max_age: Option<Duration>) -> Self {
        SportPage {
            settings: PageLoader::new("system-settings", max_age),
            ratings: PageLoader::new("team-ratings", max_age),
        }
    }

    pub async fn load(&self, source: &dyn ReportSource, sport: Sport) -> SportDetail {
        let settings = self
            .settings
            .load(sport, || async move { Ok(Some(source.settings(sport).await?)) });
        let teams = self.ratings.load(sport, || async move {
            let report = source.team_ratings(sport).await?;
            Ok(report.teams.filter(|t| !t.is_empty()))
        });
        let (settings, teams) = tokio::join!(settings, teams);
        SportDetail {
            sport,
            name: sport.display_name(),
            settings,
            teams,
        }
    }
}

/// Evaluation page: every season plus the latest / all-time headline rows.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationView {
    pub sport: Sport,
    pub latest_season: Option<i32>,
    pub latest: Option<EvaluationReport>,
    pub all_time: Option<EvaluationReport>,
    pub seasons: EvaluationSet,
}

impl EvaluationView {
    pub fn new(sport: Sport, seasons: EvaluationSet) -> Self {
        let (latest_season, latest) = match seasons.latest() {
            Some((season, report)) => (Some(season), Some(report.clone())),
            None => (None, None),
        };
        let all_time = seasons.all_time().cloned();
        EvaluationView {
            sport,
            latest_season,
            latest,
            all_time,
            seasons,
        }
    }
}

pub struct EvaluationPage {
    loader: PageLoader<EvaluationView>,
}

impl EvaluationPage {
    pub fn new(max_age: Option<Duration>) -> Self {
        EvaluationPage {
            loader: PageLoader::new("evaluation", max_age),
        }
    }

    pub async fn load(&self, source: &dyn ReportSource, sport: Sport) -> LoadState<EvaluationView> {
        self.loader
            .load(sport, || async move {
                let set = source.evaluation(sport).await?;
                if set.evaluations.is_empty() {
                    return Ok(None);
                }
                Ok(Some(EvaluationView::new(sport, set)))
            })
            .await
    }
}

/// Past events with the record of the Elo favourite over them.
#[derive(Debug, Clone, Serialize)]
pub struct PastEventsView {
    pub sport: Sport,
    pub summary: Option<PastSummary>,
    pub headline: Option<String>,
    pub events: LoadState<Vec<Event>>,
}

/// All page loaders, one slot each, shared by the dashboard.
pub struct Pages {
    pub upcoming: EventsPage,
    pub past: EventsPage,
    pub sport: SportPage,
    pub evaluation: EvaluationPage,
}

impl Pages {
    pub fn new(max_age: Option<Duration>) -> Self {
        Pages {
            upcoming: EventsPage::new(EventWindow::Upcoming, max_age),
            past: EventsPage::new(EventWindow::Past, max_age),
            sport: SportPage::new(max_age),
            evaluation: EvaluationPage::new(max_age),
        }
    }

    pub async fn past_events(
        &self,
        source: &dyn ReportSource,
        sport: Sport,
        now: DateTime<Utc>,
    ) -> PastEventsView {
        let events = self.past.load(source, sport, now).await;
        let summary = events.data().map(|e| PastSummary::from_events(e));
        let headline = summary.as_ref().map(PastSummary::headline);
        PastEventsView {
            sport,
            summary,
            headline,
            events,
        }
    }
}
