use async_trait::async_trait;

use super::models::{EvaluationSet, EventsReport, SystemSettings, TeamRatingsReport};
use crate::error::Result;
use crate::sports::Sport;

/// Anything that can serve the per-sport Elo reports.
#[async_trait]
pub trait ReportSource: Send + Sync {
    async fn upcoming_events(&self, sport: Sport) -> Result<EventsReport>;

    async fn previous_events(&self, sport: Sport) -> Result<EventsReport>;

    async fn evaluation(&self, sport: Sport) -> Result<EvaluationSet>;

    async fn settings(&self, sport: Sport) -> Result<SystemSettings>;

    async fn team_ratings(&self, sport: Sport) -> Result<TeamRatingsReport>;

    /// Human-readable name for logging.
    fn name(&self) -> &str;
}
