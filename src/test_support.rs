// ============================================================================
// Doublures de test
// ============================================================================
// Faux collaborateurs pour tester le CurrencyService sans réseau :
// - FakeGeoLocator / FakeRateProvider : réponses programmées + compteur d'appels
// - ManualClock : horloge qu'on avance à la main
// - SharedStore : MemoryStore partagé, inspectable depuis le test
// ============================================================================

use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::api::{GeoLocator, RateProvider};
use crate::cache::{KeyValueStore, MemoryStore};
use crate::clock::Clock;
use crate::error::{FxError, FxResult};
use crate::models::ExchangeRateTable;

/// Géolocalisation programmable
pub struct FakeGeoLocator {
    outcome: Result<String, fn() -> FxError>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl FakeGeoLocator {
    pub fn country(code: &str) -> Self {
        Self {
            outcome: Ok(code.to_string()),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Répond après `delay` (temps tokio, compatible start_paused)
    pub fn delayed(code: &str, delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::country(code)
        }
    }

    pub fn failing(error: fn() -> FxError) -> Self {
        Self {
            outcome: Err(error),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GeoLocator for FakeGeoLocator {
    async fn country_code(&self) -> FxResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.outcome {
            Ok(code) => Ok(code.clone()),
            Err(make_error) => Err(make_error()),
        }
    }
}

/// Fournisseur de taux programmable
pub struct FakeRateProvider {
    outcome: Mutex<Result<ExchangeRateTable, fn() -> FxError>>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl FakeRateProvider {
    pub fn ok(rates: ExchangeRateTable) -> Self {
        Self {
            outcome: Mutex::new(Ok(rates)),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(error: fn() -> FxError) -> Self {
        Self {
            outcome: Mutex::new(Err(error)),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Le fournisseur répond désormais avec `rates`
    pub fn set_rates(&self, rates: ExchangeRateTable) {
        *self.outcome.lock().unwrap() = Ok(rates);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RateProvider for FakeRateProvider {
    async fn fetch_rates(&self) -> FxResult<ExchangeRateTable> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &*self.outcome.lock().unwrap() {
            Ok(rates) => Ok(rates.clone()),
            Err(make_error) => Err(make_error()),
        }
    }
}

/// Horloge manuelle (epoch millis)
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn new(start_ms: i64) -> Self {
        Self {
            now: AtomicI64::new(start_ms),
        }
    }

    pub fn advance(&self, ms: i64) {
        self.now.fetch_add(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// MemoryStore partagé entre le service et le test
#[derive(Clone, Default)]
pub struct SharedStore {
    inner: Arc<MemoryStore>,
}

impl SharedStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, key: &str, value: &str) {
        self.inner.set(key, value).unwrap();
    }

    pub fn peek(&self, key: &str) -> Option<String> {
        self.inner.get(key).unwrap()
    }
}

impl KeyValueStore for SharedStore {
    fn get(&self, key: &str) -> FxResult<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> FxResult<()> {
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> FxResult<()> {
        self.inner.remove(key)
    }
}
