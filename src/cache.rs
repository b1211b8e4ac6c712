// ============================================================================
// Module : cache
// ============================================================================
// Cache persistant des taux de change
//
// CONCEPTS :
// 1. KeyValueStore : stockage clé/valeur minimal (équivalent localStorage)
// 2. RateCache : la paire (taux, timestamp) lue et écrite comme une unité
// 3. Une moitié manquante ou illisible = cache miss (on refetch)
// ============================================================================

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{FxError, FxResult};
use crate::models::ExchangeRateTable;

/// Clé du snapshot des taux (JSON)
pub const RATES_KEY: &str = "boardfx.rates";

/// Clé du timestamp du snapshot (epoch millis)
pub const RATES_TIMESTAMP_KEY: &str = "boardfx.rates_timestamp";

// ============================================================================
// Trait KeyValueStore
// ============================================================================

/// Stockage clé/valeur de chaînes
///
/// CONCEPT RUST : Send + Sync
/// - Le store est partagé entre le thread UI et le worker
/// - Les implémentations protègent leur état interne elles-mêmes
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> FxResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> FxResult<()>;
    fn remove(&self, key: &str) -> FxResult<()>;
}

/// Store en mémoire (tests, ou quand le disque n'est pas disponible)
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> FxResult<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| FxError::Storage("memory store lock poisoned".to_string()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> FxResult<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> FxResult<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> FxResult<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}

/// Store fichier : un objet JSON {clé: valeur} sur disque
///
/// Chaque écriture relit le fichier, modifie la map et la réécrit.
/// Le mutex ne sérialise que les accès de ce processus.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> FxResult<HashMap<String, String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(HashMap::new()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_all(&self, entries: &HashMap<String, String>) -> FxResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, raw)?;
        Ok(())
    }

    fn update<F>(&self, mutate: F) -> FxResult<()>
    where
        F: FnOnce(&mut HashMap<String, String>),
    {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| FxError::Storage("file store lock poisoned".to_string()))?;

        // Un fichier corrompu est écrasé plutôt que de bloquer toute écriture
        let mut entries = self.read_all().unwrap_or_else(|e| {
            warn!(path = %self.path.display(), error = %e, "Discarding unreadable cache file");
            HashMap::new()
        });
        mutate(&mut entries);
        self.write_all(&entries)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> FxResult<Option<String>> {
        Ok(self.read_all()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> FxResult<()> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> FxResult<()> {
        self.update(|entries| {
            entries.remove(key);
        })
    }
}

// ============================================================================
// RateCache
// ============================================================================

/// Snapshot persisté : taux + date du fetch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedRates {
    pub rates: ExchangeRateTable,
    pub fetched_at_ms: i64,
}

impl CachedRates {
    /// Vrai si le snapshot a moins de `ttl_ms` à l'instant `now_ms`
    pub fn is_fresh(&self, now_ms: i64, ttl_ms: i64) -> bool {
        let age = now_ms - self.fetched_at_ms;
        (0..ttl_ms).contains(&age)
    }
}

/// Accès typé aux deux clés du cache des taux
pub struct RateCache {
    store: Box<dyn KeyValueStore>,
}

impl RateCache {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Lit la paire (taux, timestamp)
    ///
    /// Toute incohérence (clé manquante, JSON invalide, store en erreur)
    /// est loggée et traitée comme un miss.
    pub fn read(&self) -> Option<CachedRates> {
        let rates_raw = self.get_logged(RATES_KEY)?;
        let timestamp_raw = self.get_logged(RATES_TIMESTAMP_KEY)?;

        let rates: ExchangeRateTable = match serde_json::from_str(&rates_raw) {
            Ok(rates) => rates,
            Err(e) => {
                warn!(error = %e, "Cached rates are not valid JSON");
                return None;
            }
        };

        let fetched_at_ms: i64 = match timestamp_raw.trim().parse() {
            Ok(ts) => ts,
            Err(e) => {
                warn!(error = %e, raw = %timestamp_raw, "Cached rates timestamp is invalid");
                return None;
            }
        };

        Some(CachedRates { rates, fetched_at_ms })
    }

    /// Persiste un nouveau snapshot
    pub fn write(&self, rates: &ExchangeRateTable, fetched_at_ms: i64) -> FxResult<()> {
        let raw = serde_json::to_string(rates)?;
        self.store.set(RATES_KEY, &raw)?;
        self.store.set(RATES_TIMESTAMP_KEY, &fetched_at_ms.to_string())?;
        debug!(currencies = rates.len(), fetched_at_ms, "Persisted exchange rates");
        Ok(())
    }

    /// Supprime les deux clés
    pub fn clear(&self) -> FxResult<()> {
        self.store.remove(RATES_KEY)?;
        self.store.remove(RATES_TIMESTAMP_KEY)?;
        debug!("Cleared exchange rate cache");
        Ok(())
    }

    fn get_logged(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "Could not read rate cache");
                None
            }
        }
    }
}
