use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::reports::models::{Event, SportEvent};

/// Anything with a start time that an event window can filter on.
pub trait Scheduled {
    fn starts_at(&self) -> Option<DateTime<Utc>>;
    fn label(&self) -> String;
}

impl Scheduled for Event {
    fn starts_at(&self) -> Option<DateTime<Utc>> {
        Event::starts_at(self)
    }

    fn label(&self) -> String {
        format!("{} vs {} @ {}", self.home_team_name, self.away_team_name, self.datetime)
    }
}

impl Scheduled for SportEvent {
    fn starts_at(&self) -> Option<DateTime<Utc>> {
        self.event.starts_at()
    }

    fn label(&self) -> String {
        format!("{} {}", self.sport, self.event.label())
    }
}

/// Which side of "now" a page shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventWindow {
    /// Strictly after now, soonest first.
    Upcoming,
    /// Strictly before now, most recent first.
    Past,
}

impl EventWindow {
    pub fn includes<E: Scheduled>(self, event: &E, now: DateTime<Utc>) -> bool {
        match (self, event.starts_at()) {
            (EventWindow::Upcoming, Some(at)) => at > now,
            (EventWindow::Past, Some(at)) => at < now,
            (_, None) => {
                debug!("Dropping event with unparseable datetime: {}", event.label());
                false
            }
        }
    }

    /// Stable sort in this window's display order.
    pub fn sort<E: Scheduled>(self, events: &mut [E]) {
        match self {
            EventWindow::Upcoming => events.sort_by_key(|e| e.starts_at()),
            EventWindow::Past => events.sort_by(|a, b| b.starts_at().cmp(&a.starts_at())),
        }
    }

    /// Filter to this window, then sort.
    pub fn apply<E: Scheduled>(self, events: Vec<E>, now: DateTime<Utc>) -> Vec<E> {
        let mut kept: Vec<E> = events.into_iter().filter(|e| self.includes(e, now)).collect();
        self.sort(&mut kept);
        kept
    }
}

/// How the Elo favourite fared over a list of finished events.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PastSummary {
    pub games: usize,
    pub correct: usize,
    pub incorrect: usize,
    /// Percentage of correct picks (0–100)
    pub accuracy_pct: Option<f64>,
    /// Mean absolute error between the Elo spread and the actual margin
    pub mae: Option<f64>,
}

impl PastSummary {
    pub fn from_events(events: &[Event]) -> Self {
        let (correct, incorrect) = events
            .iter()
            .filter_map(Event::prediction_correct)
            .fold((0, 0), |(c, i), ok| if ok { (c + 1, i) } else { (c, i + 1) });

        let decided = correct + incorrect;
        let accuracy_pct = (decided > 0).then(|| correct as f64 / decided as f64 * 100.0);

        let errors: Vec<f64> = events
            .iter()
            .filter_map(|e| Some((e.elo_spread? - e.point_dif?).abs()))
            .collect();
        let mae = (!errors.is_empty()).then(|| errors.iter().sum::<f64>() / errors.len() as f64);

        PastSummary {
            games: events.len(),
            correct,
            incorrect,
            accuracy_pct,
            mae,
        }
    }

    /// One-line record in the form "went 7-3 (70.00%) ... MAE of 4.20".
    pub fn headline(&self) -> String {
        let pct = self
            .accuracy_pct
            .map(|p| format!("{:.2}", p))
            .unwrap_or_else(|| "N/A".to_string());
        let mae = self
            .mae
            .map(|m| format!("{:.2}", m))
            .unwrap_or_else(|| "N/A".to_string());
        format!(
            "The system went {}-{} ({}%) over the past {} games with a Mean Average Error (MAE) of {}",
            self.correct, self.incorrect, pct, self.games, mae
        )
    }
}
