use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::sports::Sport;

/// Key of the all-seasons entry in an evaluation report.
pub const ALL_SEASONS_KEY: &str = "ALL";

/// A rated matchup from the upcoming or previous event reports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,
    /// ISO-8601 start time, UTC
    pub datetime: String,
    pub home_team_name: String,
    pub away_team_name: String,
    /// Predicted margin from the home team's perspective (negative = home favoured)
    pub elo_spread: Option<f64>,
    pub home_elo_prob: Option<f64>,
    pub away_elo_prob: Option<f64>,
    pub home_elo_pre: Option<f64>,
    pub away_elo_pre: Option<f64>,
    pub elo_diff: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neutral_site: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_postseason: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season: Option<i32>,
    /// Actual margin (away minus home); previous events only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub point_dif: Option<f64>,
    /// Whether the home team won; previous events only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_team_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub away_team_score: Option<f64>,
}

impl Event {
    /// Parsed start time, or `None` if the report carries a malformed timestamp.
    pub fn starts_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.datetime)
    }

    /// Whether the Elo favourite matched the final result.
    /// `None` until the event has a result and a home probability.
    pub fn prediction_correct(&self) -> Option<bool> {
        let result = self.result?;
        let home_prob = self.home_elo_prob?;
        Some(result == (home_prob > 0.5))
    }
}

/// An event tagged with the sport it was fetched for (home page aggregate).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SportEvent {
    pub sport: Sport,
    #[serde(flatten)]
    pub event: Event,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventsReport {
    /// The pipeline writes `null` when there is nothing in the window.
    #[serde(default)]
    pub events: Option<Vec<Event>>,
    #[serde(default)]
    pub lastupdated: Option<String>,
}

/// Current Elo rating for one team
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamRating {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,
    pub rank: u32,
    pub team_name: String,
    pub elo_rating: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season: Option<i32>,
    pub lastupdated: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TeamRatingsReport {
    #[serde(default)]
    pub teams: Option<Vec<TeamRating>>,
    #[serde(default)]
    pub lastupdated: Option<String>,
}

/// Elo engine configuration for a sport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemSettings {
    pub system_name: String,
    pub k: f64,
    /// Home-field advantage in Elo points
    pub hfa: f64,
    pub mean_elo: f64,
    pub number_of_teams: u32,
    pub number_of_seasons: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lastupdated: Option<String>,
}

/// Evaluation metrics for one season (or all seasons combined)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub system_records: Option<u64>,
    pub system_accuracy: Option<f64>,
    pub system_mae: Option<f64>,
    pub system_brier_score: Option<f64>,
    pub avg_number_of_games_played: Option<f64>,
    pub avg_points_per_game: Option<f64>,
    pub home_win_percentage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_precision: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_recall: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_f1: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_auc: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_log_loss: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_mse: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_r2: Option<f64>,
}

/// `system_evaluation.json`: season key ("2024", "ALL", ...) → metrics.
/// A season with no records is present with a `null` value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationSet {
    #[serde(default)]
    pub evaluations: BTreeMap<String, Option<EvaluationReport>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lastupdated: Option<String>,
}

impl EvaluationSet {
    /// The most recent season, by numeric key.
    pub fn latest(&self) -> Option<(i32, &EvaluationReport)> {
        self.evaluations
            .iter()
            .filter_map(|(key, report)| Some((key.parse::<i32>().ok()?, report.as_ref()?)))
            .max_by_key(|(season, _)| *season)
    }

    pub fn all_time(&self) -> Option<&EvaluationReport> {
        self.evaluations.get(ALL_SEASONS_KEY)?.as_ref()
    }
}

/// Parse the timestamp shapes the report pipeline emits: RFC 3339
/// (`2024-01-15T00:00:00.000Z`), naive ISO (`2024-01-15T12:34:56.789012`,
/// taken as UTC), or a bare date.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
