// ============================================================================
// Module : config
// ============================================================================
// Configuration du service de devises
//
// Ordre de priorité :
// 1. Variables d'environnement BOARDFX_*
// 2. Fichier boardfx.toml dans le répertoire de config de la plateforme
// 3. Valeurs par défaut
// ============================================================================

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{FxError, FxResult};
use crate::models::{is_supported, DEFAULT_CURRENCY};

/// Endpoint de géolocalisation IP par défaut
pub const DEFAULT_GEO_URL: &str = "https://ipapi.co/json/";

/// Endpoint des taux de change (base USD) par défaut
pub const DEFAULT_RATES_URL: &str = "https://api.exchangerate-api.com/v4/latest/USD";

/// Paramètres du service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// URL du service de géolocalisation IP
    pub geolocation_url: String,

    /// URL du fournisseur de taux
    pub rates_url: String,

    /// Timeout client de la géolocalisation
    pub geolocation_timeout_ms: u64,

    /// Durée de fraîcheur du cache des taux
    pub cache_ttl_hours: u64,

    /// Devise de repli quand la détection échoue
    pub default_currency: String,

    /// Fichier de cache (None = répertoire cache de la plateforme)
    pub cache_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            geolocation_url: DEFAULT_GEO_URL.to_string(),
            rates_url: DEFAULT_RATES_URL.to_string(),
            geolocation_timeout_ms: 3_000,
            cache_ttl_hours: 6,
            default_currency: DEFAULT_CURRENCY.to_string(),
            cache_path: None,
        }
    }
}

impl Config {
    pub fn geolocation_timeout(&self) -> Duration {
        Duration::from_millis(self.geolocation_timeout_ms)
    }

    /// Fenêtre de fraîcheur du cache en millisecondes
    pub fn cache_ttl_millis(&self) -> i64 {
        (self.cache_ttl_hours as i64) * 60 * 60 * 1000
    }

    /// Chemin effectif du fichier de cache
    ///
    /// - Linux : ~/.cache/boardfx/rates.json
    /// - macOS : ~/Library/Caches/boardfx/rates.json
    pub fn resolved_cache_path(&self) -> PathBuf {
        if let Some(path) = &self.cache_path {
            return path.clone();
        }
        dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("boardfx")
            .join("rates.json")
    }

    /// Charge la config : fichier de la plateforme puis overrides d'environnement
    pub fn load() -> FxResult<Self> {
        let mut config = match default_config_path() {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => {
                debug!("No config file found, using defaults");
                Self::default()
            }
        };
        config.apply_env(|key| std::env::var(key).ok());
        config.validate();
        Ok(config)
    }

    /// Lit un fichier TOML
    pub fn from_file(path: &Path) -> FxResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&raw)?;
        info!(path = %path.display(), "Loaded configuration file");
        Ok(config)
    }

    pub fn from_toml(raw: &str) -> FxResult<Self> {
        toml::from_str(raw).map_err(|e| FxError::Config(e.to_string()))
    }

    /// Applique les overrides BOARDFX_*
    ///
    /// CONCEPT RUST : closure en paramètre
    /// - `lookup` remplace std::env::var en test
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("BOARDFX_GEO_URL") {
            self.geolocation_url = url;
        }
        if let Some(url) = lookup("BOARDFX_RATES_URL") {
            self.rates_url = url;
        }
        if let Some(code) = lookup("BOARDFX_DEFAULT_CURRENCY") {
            self.default_currency = code.trim().to_ascii_uppercase();
        }
    }

    /// Remplace une devise par défaut inconnue par GBP
    fn validate(&mut self) {
        if !is_supported(&self.default_currency) {
            warn!(
                currency = %self.default_currency,
                fallback = DEFAULT_CURRENCY,
                "Unsupported default currency in config"
            );
            self.default_currency = DEFAULT_CURRENCY.to_string();
        }
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("boardfx").join("boardfx.toml"))
}
