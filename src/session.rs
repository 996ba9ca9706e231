//! Session-wide data shared by every page: upcoming events across all sports
//! and the evaluation summary of each sport.
//!
//! The sweep fetches every sport concurrently and records per-sport
//! failures, so one broken report never hides the others.

use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::error::{ReportError, Result};
use crate::loader::pages::EvaluationView;
use crate::loader::EventWindow;
use crate::reports::models::{EvaluationSet, SportEvent};
use crate::reports::ReportSource;
use crate::sports::Sport;

/// What one sport contributed to a sweep.
#[derive(Debug)]
pub struct SportSweep {
    pub sport: Sport,
    pub upcoming: Result<Vec<SportEvent>>,
    pub evaluation: Result<EvaluationSet>,
}

#[derive(Debug)]
pub struct SweepOutcome {
    pub started_at: DateTime<Utc>,
    /// One entry per swept sport, in the order requested.
    pub sports: Vec<SportSweep>,
}

impl SweepOutcome {
    /// Merge everything that succeeded; failures land in `errors`.
    pub fn into_snapshot(self) -> SessionSnapshot {
        let mut upcoming_events = Vec::new();
        let mut evaluations = BTreeMap::new();
        let mut errors: BTreeMap<Sport, String> = BTreeMap::new();

        for sweep in self.sports {
            match sweep.upcoming {
                Ok(events) => upcoming_events.extend(events),
                Err(e) => {
                    errors.insert(sweep.sport, format!("upcoming events: {}", e));
                }
            }
            match sweep.evaluation {
                Ok(set) => {
                    evaluations.insert(sweep.sport, EvaluationView::new(sweep.sport, set));
                }
                Err(e) => {
                    let msg = format!("evaluation: {}", e);
                    errors
                        .entry(sweep.sport)
                        .and_modify(|prev| {
                            prev.push_str("; ");
                            prev.push_str(&msg);
                        })
                        .or_insert(msg);
                }
            }
        }

        EventWindow::Upcoming.sort(&mut upcoming_events);

        let error = (!errors.is_empty()).then(|| {
            let failed: Vec<&str> = errors.keys().map(|s| s.key()).collect();
            format!("Some reports could not be loaded: {}", failed.join(", "))
        });

        SessionSnapshot {
            upcoming_events,
            evaluations,
            errors,
            error,
            refreshed_at: self.started_at,
        }
    }

    /// Publish nothing unless every sport succeeded; reports the first failure
    /// in sweep order.
    #[cfg(test)]
    pub fn into_all_or_nothing(self) -> std::result::Result<SessionSnapshot, (Sport, ReportError)> {
        let started_at = self.started_at;
        let mut complete = Vec::with_capacity(self.sports.len());
        for sweep in self.sports {
            let upcoming = sweep.upcoming.map_err(|e| (sweep.sport, e))?;
            let evaluation = sweep.evaluation.map_err(|e| (sweep.sport, e))?;
            complete.push(SportSweep {
                sport: sweep.sport,
                upcoming: Ok(upcoming),
                evaluation: Ok(evaluation),
            });
        }
        Ok(SweepOutcome {
            started_at,
            sports: complete,
        }
        .into_snapshot())
    }
}

/// Fetch upcoming events and evaluations for every sport in `sports`
/// concurrently. Upcoming events are tagged with their sport and limited to
/// those starting after `now`.
pub async fn sweep(source: &dyn ReportSource, sports: &[Sport], now: DateTime<Utc>) -> SweepOutcome {
    let per_sport = sports.iter().map(|&sport| async move {
        let (upcoming, evaluation) =
            tokio::join!(source.upcoming_events(sport), source.evaluation(sport));
        let upcoming = upcoming.map(|report| {
            let tagged: Vec<SportEvent> = report
                .events
                .unwrap_or_default()
                .into_iter()
                .map(|event| SportEvent { sport, event })
                .collect();
            EventWindow::Upcoming.apply(tagged, now)
        });
        SportSweep {
            sport,
            upcoming,
            evaluation,
        }
    });

    SweepOutcome {
        started_at: now,
        sports: join_all(per_sport).await,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub upcoming_events: Vec<SportEvent>,
    pub evaluations: BTreeMap<Sport, EvaluationView>,
    /// Per-sport failure messages from the last sweep
    pub errors: BTreeMap<Sport, String>,
    /// User-facing summary, set when any sport failed
    pub error: Option<String>,
    pub refreshed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum SessionState {
    Loading,
    Ready(SessionSnapshot),
}

/// Holder of the session data, built once at start-up and handed to every
/// consumer behind an `Arc`.
pub struct SessionData {
    sports: Vec<Sport>,
    state: RwLock<SessionState>,
}

impl SessionData {
    pub fn new(sports: Vec<Sport>) -> Self {
        SessionData {
            sports,
            state: RwLock::new(SessionState::Loading),
        }
    }

    pub async fn state(&self) -> SessionState {
        self.state.read().await.clone()
    }

    pub async fn snapshot(&self) -> Option<SessionSnapshot> {
        match &*self.state.read().await {
            SessionState::Ready(snapshot) => Some(snapshot.clone()),
            SessionState::Loading => None,
        }
    }

    /// Run one sweep and publish it as a whole.
    pub async fn refresh(&self, source: &dyn ReportSource) -> SessionSnapshot {
        let outcome = sweep(source, &self.sports, Utc::now()).await;
        let snapshot = outcome.into_snapshot();

        for (sport, msg) in &snapshot.errors {
            warn!("Session sweep: {} failed: {}", sport, msg);
        }
        info!(
            "Session refreshed from {}: {} upcoming events, {} evaluations, {} sport(s) failed",
            source.name(),
            snapshot.upcoming_events.len(),
            snapshot.evaluations.len(),
            snapshot.errors.len()
        );

        *self.state.write().await = SessionState::Ready(snapshot.clone());
        snapshot
    }
}

/// Sweep immediately, then every `every` if given.
pub fn spawn_refresh_loop(
    session: Arc<SessionData>,
    source: Arc<dyn ReportSource>,
    every: Option<Duration>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let Some(every) = every else {
            session.refresh(source.as_ref()).await;
            return;
        };
        let mut interval = tokio::time::interval(every);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            session.refresh(source.as_ref()).await;
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::testing::{event_at, hours_from_now, StaticSource};

    fn evaluation(records: u64) -> EvaluationSet {
        serde_json::from_value(serde_json::json!({
            "evaluations": {
                "2023": {"system_records": records - 1},
                "2024": {"system_records": records},
                "ALL": {"system_records": records * 10}
            }
        }))
        .unwrap()
    }

    fn two_sport_source(now: DateTime<Utc>) -> StaticSource {
        let mut source = StaticSource::default();
        source.upcoming.insert(
            Sport::Nba,
            vec![
                event_at(hours_from_now(now, 3), "A3", "x"),
                event_at(hours_from_now(now, 1), "A1", "x"),
                event_at(hours_from_now(now, -4), "A-past", "x"),
            ],
        );
        source
            .upcoming
            .insert(Sport::Nhl, vec![event_at(hours_from_now(now, 2), "B2", "x")]);
        source.evaluations.insert(Sport::Nba, evaluation(50));
        source.evaluations.insert(Sport::Nhl, evaluation(40));
        source
    }

    #[tokio::test]
    async fn test_sweep_merges_and_sorts_across_sports() {
        let now = Utc::now();
        let source = two_sport_source(now);

        let snapshot = sweep(&source, &[Sport::Nba, Sport::Nhl], now)
            .await
            .into_snapshot();

        let order: Vec<(Sport, &str)> = snapshot
            .upcoming_events
            .iter()
            .map(|e| (e.sport, e.event.home_team_name.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![(Sport::Nba, "A1"), (Sport::Nhl, "B2"), (Sport::Nba, "A3")]
        );
        assert!(snapshot.errors.is_empty());
        assert!(snapshot.error.is_none());
    }

    #[tokio::test]
    async fn test_aggregate_length_is_sum_of_contributions() {
        let now = Utc::now();
        let source = two_sport_source(now);

        let outcome = sweep(&source, &[Sport::Nba, Sport::Nhl], now).await;
        let per_sport: usize = outcome
            .sports
            .iter()
            .map(|s| s.upcoming.as_ref().map(Vec::len).unwrap_or(0))
            .sum();
        let snapshot = outcome.into_snapshot();
        assert_eq!(per_sport, 3);
        assert_eq!(snapshot.upcoming_events.len(), per_sport);
    }

    #[tokio::test]
    async fn test_evaluations_keyed_by_sport() {
        let now = Utc::now();
        let source = two_sport_source(now);
        let snapshot = sweep(&source, &[Sport::Nba, Sport::Nhl], now)
            .await
            .into_snapshot();

        let nba = &snapshot.evaluations[&Sport::Nba];
        assert_eq!(nba.latest_season, Some(2024));
        assert_eq!(nba.latest.as_ref().unwrap().system_records, Some(50));
        assert_eq!(nba.all_time.as_ref().unwrap().system_records, Some(500));
    }

    #[tokio::test]
    async fn test_failure_keeps_other_sports() {
        let now = Utc::now();
        let mut source = two_sport_source(now);
        source.failing.insert(Sport::Nhl);

        let snapshot = sweep(&source, &[Sport::Nba, Sport::Nhl], now)
            .await
            .into_snapshot();

        assert_eq!(snapshot.upcoming_events.len(), 2);
        assert!(snapshot.upcoming_events.iter().all(|e| e.sport == Sport::Nba));
        assert!(snapshot.evaluations.contains_key(&Sport::Nba));
        assert!(!snapshot.evaluations.contains_key(&Sport::Nhl));
        let msg = &snapshot.errors[&Sport::Nhl];
        assert!(msg.contains("upcoming events") && msg.contains("evaluation"));
        assert!(snapshot.error.as_deref().unwrap().contains("NHL"));
    }

    #[tokio::test]
    async fn test_all_or_nothing_publishes_nothing_on_failure() {
        let now = Utc::now();
        let mut source = two_sport_source(now);
        source.failing.insert(Sport::Nhl);

        let result = sweep(&source, &[Sport::Nba, Sport::Nhl], now)
            .await
            .into_all_or_nothing();
        match result {
            Err((sport, ReportError::RequestFailed { .. })) => assert_eq!(sport, Sport::Nhl),
            other => panic!("expected NHL failure, got {:?}", other.map(|s| s.upcoming_events.len())),
        }

        let source = two_sport_source(now);
        let snapshot = sweep(&source, &[Sport::Nba, Sport::Nhl], now)
            .await
            .into_all_or_nothing()
            .unwrap();
        assert_eq!(snapshot.upcoming_events.len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweep_runs_sports_concurrently() {
        let now = Utc::now();
        let mut source = two_sport_source(now);
        source.delays.insert(Sport::Nba, Duration::from_millis(60));
        source.delays.insert(Sport::Nhl, Duration::from_millis(60));

        let started = tokio::time::Instant::now();
        sweep(&source, &[Sport::Nba, Sport::Nhl], now).await;
        // Four requests at 60ms each would take 240ms back to back.
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(60));
        assert!(elapsed < Duration::from_millis(120));
        assert_eq!(source.calls(), 4);
    }

    #[tokio::test]
    async fn test_session_publishes_after_refresh() {
        let now = Utc::now();
        let source = two_sport_source(now);
        let session = SessionData::new(vec![Sport::Nba, Sport::Nhl]);

        assert!(matches!(session.state().await, SessionState::Loading));
        assert!(session.snapshot().await.is_none());

        session.refresh(&source).await;
        let snapshot = session.snapshot().await.unwrap();
        assert_eq!(snapshot.upcoming_events.len(), 3);
    }

    #[tokio::test]
    async fn test_one_shot_refresh_loop() {
        let now = Utc::now();
        let source: Arc<dyn ReportSource> = Arc::new(two_sport_source(now));
        let session = Arc::new(SessionData::new(vec![Sport::Nba, Sport::Nhl]));

        spawn_refresh_loop(session.clone(), source, None).await.unwrap();
        assert!(session.snapshot().await.is_some());
    }

    #[test]
    fn test_snapshot_serializes_sport_keys() {
        let snapshot = SweepOutcome {
            started_at: Utc::now(),
            sports: vec![SportSweep {
                sport: Sport::Mlb,
                upcoming: Ok(vec![]),
                evaluation: Ok(evaluation(5)),
            }],
        }
        .into_snapshot();
        let json = serde_json::to_value(SessionState::Ready(snapshot)).unwrap();
        assert_eq!(json["status"], "ready");
        assert!(json["data"]["evaluations"]["MLB"].is_object());
    }
}
