use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::ResultCache;

/// How a guarded request was satisfied
#[derive(Debug, Clone, PartialEq)]
pub enum Flight<T> {
    /// The guard already held a result for this key
    Held(T),
    /// Adopted from the session cache without a remote call
    Cached(T),
    /// Fetched remotely by this call
    Fetched(T),
    /// Another fetch is in flight; its result will land in the guard and cache
    Skipped,
}

impl<T> Flight<T> {
    pub fn into_value(self) -> Option<T> {
        match self {
            Flight::Held(v) | Flight::Cached(v) | Flight::Fetched(v) => Some(v),
            Flight::Skipped => None,
        }
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Flight::Held(v) | Flight::Cached(v) | Flight::Fetched(v) => Some(v),
            Flight::Skipped => None,
        }
    }

    pub fn was_fetched(&self) -> bool {
        matches!(self, Flight::Fetched(_))
    }
}

struct GuardState<T> {
    in_flight: Option<String>,
    completed: Option<(String, T)>,
    epoch: u64,
}

/// Per-consumer single-flight guard.
///
/// Each consumer owns its own guard; it is not shared across the app. At most
/// one fetch runs through a guard at a time, and a result already held for an
/// unchanged key is returned without touching the network.
pub struct FlightGuard<T> {
    state: Mutex<GuardState<T>>,
}

impl<T> Default for FlightGuard<T> {
    fn default() -> Self {
        Self {
            state: Mutex::new(GuardState {
                in_flight: None,
                completed: None,
                epoch: 0,
            }),
        }
    }
}

/// Clears the busy flag when the fetch finishes or its future is dropped
struct BusyToken<'a, T> {
    guard: &'a FlightGuard<T>,
    epoch: u64,
}

impl<T> Drop for BusyToken<'_, T> {
    fn drop(&mut self) {
        let mut state = self.guard.lock();
        if state.epoch == self.epoch {
            state.in_flight = None;
        }
    }
}

impl<T> FlightGuard<T> {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, GuardState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_busy(&self) -> bool {
        self.lock().in_flight.is_some()
    }

    pub fn last_completed_key(&self) -> Option<String> {
        self.lock().completed.as_ref().map(|(key, _)| key.clone())
    }

    /// Forget held state, e.g. when the consumer's inputs change or it goes away.
    /// A fetch already running still completes and fills the cache, but its
    /// result is no longer recorded here.
    pub fn reset(&self) {
        let mut state = self.lock();
        state.epoch += 1;
        state.in_flight = None;
        state.completed = None;
    }
}

impl<T> FlightGuard<T>
where
    T: Clone + Serialize + DeserializeOwned,
{
    /// Result currently held by the guard
    pub fn held(&self) -> Option<T> {
        self.lock().completed.as_ref().map(|(_, value)| value.clone())
    }

    /// Resolve `key` from held state, then the cache, then `fetch`
    pub async fn run<F, Fut, E>(&self, key: &str, cache: &ResultCache, fetch: F) -> Result<Flight<T>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let epoch = {
            let mut state = self.lock();

            if let Some((done_key, value)) = &state.completed {
                if done_key == key {
                    return Ok(Flight::Held(value.clone()));
                }
            }

            if let Some(value) = cache.get::<T>(key) {
                state.completed = Some((key.to_string(), value.clone()));
                return Ok(Flight::Cached(value));
            }

            if let Some(running) = &state.in_flight {
                tracing::debug!("Skipping {}: {} is already in flight", key, running);
                return Ok(Flight::Skipped);
            }

            state.in_flight = Some(key.to_string());
            state.epoch
        };

        let _busy = BusyToken { guard: self, epoch };
        let value = fetch().await?;

        cache.set(key, &value);

        let mut state = self.lock();
        if state.epoch == epoch {
            state.completed = Some((key.to_string(), value.clone()));
        } else {
            tracing::debug!("Guard was reset while {} was in flight", key);
        }
        drop(state);

        Ok(Flight::Fetched(value))
    }
}
