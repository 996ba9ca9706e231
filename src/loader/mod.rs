//! Sport-scoped page loaders.
//!
//! Each page keeps one slot holding the data for the sport it last loaded.
//! Selecting the same sport again is served from the slot, or joins the
//! fetch already in flight for it; selecting a different sport (or letting
//! the slot age out) triggers a fetch.
//!
//! Every fetch takes a ticket carrying a monotonically increasing
//! generation, issued under the slot lock. Only the completion holding the
//! latest ticket may publish into the slot, so a slow response for a sport
//! the user has already moved away from can never overwrite the newer
//! selection.

pub mod events;
pub mod pages;

pub use events::EventWindow;
pub use pages::Pages;

use serde::Serialize;
use std::future::Future;
use std::time::{Duration, Instant};
use tokio::sync::{watch, RwLock};
use tracing::{debug, warn};

use crate::error::Result;
use crate::sports::Sport;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum LoadState<T> {
    Idle,
    Loading,
    Loaded(T),
    LoadedEmpty,
}

impl<T> LoadState<T> {
    pub fn is_settled(&self) -> bool {
        matches!(self, LoadState::Loaded(_) | LoadState::LoadedEmpty)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            LoadState::Loaded(data) => Some(data),
            _ => None,
        }
    }
}

impl<T> From<Option<T>> for LoadState<T> {
    fn from(data: Option<T>) -> Self {
        match data {
            Some(data) => LoadState::Loaded(data),
            None => LoadState::LoadedEmpty,
        }
    }
}

/// Proof that a fetch was started; hand it back to [`PageLoader::complete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
    sport: Sport,
}

/// Receives the outcome of an in-flight fetch; `None` until it lands.
type InFlight<T> = watch::Receiver<Option<LoadState<T>>>;

struct Slot<T> {
    sport: Option<Sport>,
    state: LoadState<T>,
    loaded_at: Option<Instant>,
    generation: u64,
    in_flight: Option<InFlight<T>>,
}

impl<T> Slot<T> {
    fn start(&mut self, sport: Sport) -> Ticket {
        self.generation += 1;
        self.sport = Some(sport);
        self.state = LoadState::Loading;
        self.loaded_at = None;
        self.in_flight = None;
        Ticket {
            generation: self.generation,
            sport,
        }
    }

    /// The in-flight fetch for `sport`, if its owner is still running it.
    fn joinable(&self, sport: Sport) -> Option<InFlight<T>> {
        if self.sport != Some(sport) || !matches!(self.state, LoadState::Loading) {
            return None;
        }
        self.in_flight
            .as_ref()
            .filter(|rx| rx.has_changed().is_ok())
            .cloned()
    }
}

pub struct PageLoader<T> {
    name: &'static str,
    /// `None` keeps loaded data until the sport changes.
    max_age: Option<Duration>,
    slot: RwLock<Slot<T>>,
}

impl<T: Clone> PageLoader<T> {
    pub fn new(name: &'static str, max_age: Option<Duration>) -> Self {
        PageLoader {
            name,
            max_age,
            slot: RwLock::new(Slot {
                sport: None,
                state: LoadState::Idle,
                loaded_at: None,
                generation: 0,
                in_flight: None,
            }),
        }
    }

    fn is_fresh(&self, slot: &Slot<T>, sport: Sport) -> bool {
        if slot.sport != Some(sport) || !slot.state.is_settled() {
            return false;
        }
        match (self.max_age, slot.loaded_at) {
            (Some(max_age), Some(loaded_at)) => loaded_at.elapsed() < max_age,
            _ => true,
        }
    }

    /// Whether selecting `sport` requires starting a new fetch. A fetch
    /// already running for the same sport is joined instead.
    pub async fn needs_fetch(&self, sport: Sport) -> bool {
        let slot = self.slot.read().await;
        !self.is_fresh(&slot, sport) && slot.joinable(sport).is_none()
    }

    /// Start a fetch for `sport`, superseding any fetch still in flight.
    pub async fn begin(&self, sport: Sport) -> Ticket {
        self.slot.write().await.start(sport)
    }

    /// Publish the outcome of a fetch. Returns `false` (and leaves the slot
    /// untouched) when a newer fetch has started since `ticket` was issued.
    pub async fn complete(&self, ticket: Ticket, data: Option<T>) -> bool {
        let mut slot = self.slot.write().await;
        if slot.generation != ticket.generation || slot.sport != Some(ticket.sport) {
            debug!(
                "{}: discarding stale {} response (generation {})",
                self.name, ticket.sport, ticket.generation
            );
            return false;
        }
        slot.state = data.into();
        slot.loaded_at = Some(Instant::now());
        slot.in_flight = None;
        true
    }

    /// Current sport and state of the slot.
    pub async fn snapshot(&self) -> (Option<Sport>, LoadState<T>) {
        let slot = self.slot.read().await;
        (slot.sport, slot.state.clone())
    }

    /// Select `sport`: serve the slot when it already holds that sport, wait
    /// for the fetch in flight for it, or otherwise run `fetch` and publish
    /// its result.
    ///
    /// Fetch failures are logged and render as [`LoadState::LoadedEmpty`].
    /// The caller always receives the outcome of the fetch it ran or joined,
    /// even when a newer selection prevented it from being published.
    pub async fn load<F, Fut>(&self, sport: Sport, fetch: F) -> LoadState<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Option<T>>>,
    {
        let (ticket, done) = loop {
            let mut slot = self.slot.write().await;
            if self.is_fresh(&slot, sport) {
                return slot.state.clone();
            }
            if let Some(mut rx) = slot.joinable(sport) {
                drop(slot);
                debug!("{}: joining in-flight {} fetch", self.name, sport);
                let landed = rx
                    .wait_for(Option::is_some)
                    .await
                    .ok()
                    .and_then(|v| (*v).clone());
                match landed {
                    Some(state) => return state,
                    // The owning caller went away before finishing.
                    None => continue,
                }
            }
            let ticket = slot.start(sport);
            let (tx, rx) = watch::channel(None);
            slot.in_flight = Some(rx);
            break (ticket, tx);
        };

        let data = match fetch().await {
            Ok(data) => data,
            Err(e) => {
                warn!("{}: failed to load {}: {}", self.name, sport, e);
                None
            }
        };
        self.complete(ticket, data.clone()).await;

        let state = LoadState::from(data);
        done.send_replace(Some(state.clone()));
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReportError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_starts_idle() {
        let loader: PageLoader<u32> = PageLoader::new("test", None);
        assert_eq!(loader.snapshot().await, (None, LoadState::Idle));
        assert!(loader.needs_fetch(Sport::Nba).await);
    }

    #[tokio::test]
    async fn test_same_sport_is_not_refetched() {
        let loader: PageLoader<u32> = PageLoader::new("test", None);
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let state = loader
                .load(Sport::Nba, || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(Some(7))
                })
                .await;
            assert_eq!(state, LoadState::Loaded(7));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_sport_change_refetches() {
        let loader: PageLoader<&'static str> = PageLoader::new("test", None);
        loader.load(Sport::Nba, || async { Ok(Some("nba")) }).await;
        let state = loader.load(Sport::Nhl, || async { Ok(Some("nhl")) }).await;
        assert_eq!(state, LoadState::Loaded("nhl"));
        assert_eq!(
            loader.snapshot().await,
            (Some(Sport::Nhl), LoadState::Loaded("nhl"))
        );
    }

    #[tokio::test]
    async fn test_zero_max_age_always_refetches() {
        let loader: PageLoader<u32> = PageLoader::new("test", Some(Duration::ZERO));
        let calls = AtomicUsize::new(0);
        for _ in 0..2 {
            loader
                .load(Sport::Mlb, || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(Some(1))
                })
                .await;
        }
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_empty_and_error_render_as_loaded_empty() {
        let loader: PageLoader<u32> = PageLoader::new("test", None);
        let state = loader.load(Sport::Nfl, || async { Ok(None) }).await;
        assert_eq!(state, LoadState::LoadedEmpty);

        let state = loader
            .load(Sport::Pll, || async {
                Err(ReportError::UnknownSport("PLL".into()))
            })
            .await;
        assert_eq!(state, LoadState::LoadedEmpty);
        assert_eq!(
            loader.snapshot().await,
            (Some(Sport::Pll), LoadState::LoadedEmpty)
        );
    }

    #[tokio::test]
    async fn test_stale_completion_is_discarded() {
        let loader: PageLoader<&'static str> = PageLoader::new("test", None);

        let first = loader.begin(Sport::Nba).await;
        let second = loader.begin(Sport::Nhl).await;

        // The NHL response lands first, then the slow NBA one.
        assert!(loader.complete(second, Some("nhl")).await);
        assert!(!loader.complete(first, Some("nba")).await);

        assert_eq!(
            loader.snapshot().await,
            (Some(Sport::Nhl), LoadState::Loaded("nhl"))
        );
    }

    #[tokio::test]
    async fn test_racing_loads_keep_latest_selection() {
        let loader: PageLoader<&'static str> = PageLoader::new("test", None);

        let slow = loader.load(Sport::Nba, || async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            Ok(Some("nba"))
        });
        let fast = async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            loader.load(Sport::Nhl, || async { Ok(Some("nhl")) }).await
        };
        let (slow_state, fast_state) = tokio::join!(slow, fast);

        // Each caller still sees its own data...
        assert_eq!(slow_state, LoadState::Loaded("nba"));
        assert_eq!(fast_state, LoadState::Loaded("nhl"));
        // ...but only the latest selection is published.
        assert_eq!(
            loader.snapshot().await,
            (Some(Sport::Nhl), LoadState::Loaded("nhl"))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_same_sport_loads_share_one_fetch() {
        let loader: PageLoader<u32> = PageLoader::new("test", None);
        let calls = AtomicUsize::new(0);
        let fetch = || async {
            let n = calls.fetch_add(1, Ordering::SeqCst) as u32 + 1;
            tokio::time::sleep(Duration::from_millis(50)).await;
            Ok(Some(n))
        };

        let first = loader.load(Sport::Nba, fetch);
        let second = async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            assert!(!loader.needs_fetch(Sport::Nba).await);
            loader.load(Sport::Nba, fetch).await
        };
        let (first, second) = tokio::join!(first, second);

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(first, LoadState::Loaded(1));
        assert_eq!(second, LoadState::Loaded(1));
        assert_eq!(
            loader.snapshot().await,
            (Some(Sport::Nba), LoadState::Loaded(1))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_abandoned_fetch_is_restarted() {
        let loader: PageLoader<u32> = PageLoader::new("test", None);

        let abandoned = tokio::time::timeout(
            Duration::from_millis(10),
            loader.load(Sport::Nfl, || async {
                tokio::time::sleep(Duration::from_millis(50)).await;
                Ok(Some(1))
            }),
        )
        .await;
        assert!(abandoned.is_err());
        assert!(loader.needs_fetch(Sport::Nfl).await);

        let state = loader.load(Sport::Nfl, || async { Ok(Some(2)) }).await;
        assert_eq!(state, LoadState::Loaded(2));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_latest_ticket_matches_slot_sport() {
        let loader = Arc::new(PageLoader::<Sport>::new("test", None));
        let handles: Vec<_> = (0..40)
            .map(|i| {
                let loader = loader.clone();
                tokio::spawn(async move { loader.begin(Sport::ALL[i % Sport::ALL.len()]).await })
            })
            .collect();
        let mut tickets = Vec::new();
        for handle in handles {
            tickets.push(handle.await.unwrap());
        }
        tickets.sort_by_key(|t| t.generation);
        let latest = tickets.pop().unwrap();

        for ticket in &tickets {
            assert!(!loader.complete(*ticket, Some(ticket.sport)).await);
        }
        assert!(loader.complete(latest, Some(latest.sport)).await);
        assert_eq!(
            loader.snapshot().await,
            (Some(latest.sport), LoadState::Loaded(latest.sport))
        );
    }

    #[test]
    fn test_load_state_serializes_tagged() {
        let json = serde_json::to_value(LoadState::Loaded(vec![1, 2])).unwrap();
        assert_eq!(json["status"], "loaded");
        assert_eq!(json["data"], serde_json::json!([1, 2]));
        let json = serde_json::to_value(LoadState::<u8>::LoadedEmpty).unwrap();
        assert_eq!(json["status"], "loaded_empty");
    }
}
