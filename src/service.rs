// ============================================================================
// Structure : CurrencyService
// ============================================================================
// Détermine la devise d'affichage, charge et met en cache les taux,
// convertit et formate les montants pour l'UI.
//
// CONCEPTS RUST :
// 1. Injection de dépendances : collaborateurs passés au constructeur
//    (géolocalisation, taux, cache, horloge) sous forme de trait objets
// 2. Mutabilité intérieure : Mutex<State> pour partager &self entre
//    le thread UI et le worker
// 3. Aucun lock n'est tenu pendant un .await
//
// PATTERN : Degrade-not-fail
// - Échec de géolocalisation : devise par défaut, silencieux (log seulement)
// - Échec des taux : table identité + avertissement passif
// ============================================================================

use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::{Context, Result};
use tracing::{debug, info, instrument, warn};

use crate::api::{with_timeout, ExchangeRateApiProvider, GeoLocator, IpApiLocator, RateProvider};
use crate::cache::{FileStore, KeyValueStore, RateCache};
use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::models::{
    currency_for_country, find_currency, symbol_or_code, CurrencyPreference, ExchangeRateTable,
    ServiceStatus,
};

/// Message affiché quand les taux live ne sont pas disponibles
pub const OFFLINE_RATES_WARNING: &str = "Live exchange rates unavailable, showing original currency";

/// État mutable protégé par le mutex
#[derive(Debug)]
struct State {
    preference: CurrencyPreference,
    rates: ExchangeRateTable,
    rates_fetched_at_ms: Option<i64>,
    /// Nombre de chargements en cours (detect et load peuvent se chevaucher)
    in_flight: usize,
}

/// Service de devises de la session
pub struct CurrencyService {
    geolocator: Arc<dyn GeoLocator>,
    rate_provider: Arc<dyn RateProvider>,
    cache: RateCache,
    clock: Arc<dyn Clock>,
    config: Config,
    state: Mutex<State>,
}

impl CurrencyService {
    /// Crée un service avec des collaborateurs explicites
    pub fn new(
        config: Config,
        geolocator: Arc<dyn GeoLocator>,
        rate_provider: Arc<dyn RateProvider>,
        store: Box<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let preference = CurrencyPreference::new(&config.default_currency);
        Self {
            geolocator,
            rate_provider,
            cache: RateCache::new(store),
            clock,
            config,
            state: Mutex::new(State {
                preference,
                rates: ExchangeRateTable::new(),
                rates_fetched_at_ms: None,
                in_flight: 0,
            }),
        }
    }

    /// Crée le service de production : clients reqwest, cache fichier, horloge système
    pub fn from_config(config: Config) -> Result<Self> {
        let geolocator = IpApiLocator::new(&config.geolocation_url)
            .context("Échec de la création du client de géolocalisation")?;
        let rate_provider = ExchangeRateApiProvider::new(&config.rates_url)
            .context("Échec de la création du client de taux de change")?;
        let store = FileStore::new(config.resolved_cache_path());
        info!(cache = %store.path().display(), "Using file rate cache");

        Ok(Self::new(
            config,
            Arc::new(geolocator),
            Arc::new(rate_provider),
            Box::new(store),
            Arc::new(SystemClock),
        ))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// CONCEPT : Lock poisoning
    /// - Un panic pendant un lock "empoisonne" le mutex
    /// - L'état reste cohérent (mutations atomiques), on récupère la garde
    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn begin_loading(&self) {
        let mut state = self.state();
        state.in_flight += 1;
        state.preference.loading = true;
        if state.preference.status == ServiceStatus::Uninitialized {
            state.preference.status = ServiceStatus::Loading;
        }
    }

    fn end_loading(&self) {
        let mut state = self.state();
        state.in_flight = state.in_flight.saturating_sub(1);
        state.preference.loading = state.in_flight > 0;
        if state.in_flight == 0 && state.preference.status == ServiceStatus::Loading {
            state.preference.status = ServiceStatus::Ready;
        }
    }

    // ========================================================================
    // Détection
    // ========================================================================

    /// Détecte la devise de l'utilisateur via la géolocalisation IP
    ///
    /// Ne renvoie jamais d'erreur : tout échec (timeout, HTTP, JSON, pays
    /// inconnu) donne la devise par défaut.
    #[instrument(skip(self))]
    pub async fn detect_currency(&self) -> String {
        let timeout = self.config.geolocation_timeout();
        let fallback = self.config.default_currency.clone();

        let detected = match with_timeout(timeout, self.geolocator.country_code()).await {
            Ok(country) => match currency_for_country(&country) {
                Some(currency) => {
                    info!(country = %country, currency, "Detected currency from location");
                    Some(currency)
                }
                None => {
                    warn!(country = %country, fallback = %fallback, "No currency mapped for country");
                    None
                }
            },
            Err(e) => {
                warn!(error = %e, fallback = %fallback, "Currency detection failed");
                None
            }
        };

        let mut state = self.state();
        state.preference.apply_detection(detected, &fallback);
        detected.map(str::to_string).unwrap_or(fallback)
    }

    // ========================================================================
    // Taux de change
    // ========================================================================

    /// Charge les taux : cache frais si possible, sinon fetch
    ///
    /// En cas d'échec du fetch, installe et renvoie la table identité.
    #[instrument(skip(self))]
    pub async fn load_rates(&self, force_refresh: bool) -> ExchangeRateTable {
        self.begin_loading();
        let table = self.load_rates_inner(force_refresh).await;
        self.end_loading();
        table
    }

    async fn load_rates_inner(&self, force_refresh: bool) -> ExchangeRateTable {
        let now = self.clock.now_millis();

        if !force_refresh {
            if let Some(cached) = self.cache.read() {
                if cached.is_fresh(now, self.config.cache_ttl_millis()) {
                    debug!(age_ms = now - cached.fetched_at_ms, "Using cached exchange rates");
                    let mut state = self.state();
                    state.rates = cached.rates.clone();
                    state.rates_fetched_at_ms = Some(cached.fetched_at_ms);
                    state.preference.last_error = None;
                    return cached.rates;
                }
                debug!(fetched_at_ms = cached.fetched_at_ms, "Cached exchange rates are stale");
            }
        }

        match self.rate_provider.fetch_rates().await {
            Ok(rates) => {
                let fetched_at = self.clock.now_millis();
                if let Err(e) = self.cache.write(&rates, fetched_at) {
                    warn!(error = %e, "Could not persist exchange rates");
                }

                let mut state = self.state();
                state.rates = rates.clone();
                state.rates_fetched_at_ms = Some(fetched_at);
                state.preference.last_error = None;
                rates
            }
            Err(e) => {
                warn!(error = %e, "Rate fetch failed, falling back to identity rates");
                let fallback = ExchangeRateTable::identity();

                let mut state = self.state();
                state.rates = fallback.clone();
                state.rates_fetched_at_ms = None;
                state.preference.last_error = Some(OFFLINE_RATES_WARNING.to_string());
                fallback
            }
        }
    }

    /// Vide le cache et force un nouveau fetch
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> ExchangeRateTable {
        if let Err(e) = self.cache.clear() {
            warn!(error = %e, "Could not clear rate cache");
        }
        self.load_rates(true).await
    }

    /// Démarrage : détection et chargement en parallèle, puis Ready
    ///
    /// CONCEPT : tokio::join!
    /// - Les deux futures avancent ensemble sur la même tâche
    /// - Aucune ne dépend du résultat de l'autre
    #[instrument(skip(self))]
    pub async fn initialize(&self) -> CurrencyPreference {
        self.begin_loading();
        let (currency, rates) = tokio::join!(self.detect_currency(), self.load_rates(false));
        self.end_loading();

        let mut state = self.state();
        state.preference.status = ServiceStatus::Ready;
        info!(
            currency = %currency,
            selected = %state.preference.selected_currency,
            rates = rates.len(),
            "Currency service ready"
        );
        state.preference.clone()
    }

    // ========================================================================
    // Lecture de l'état
    // ========================================================================

    /// Copie de la préférence courante (pour l'UI)
    pub fn snapshot(&self) -> CurrencyPreference {
        self.state().preference.clone()
    }

    pub fn selected_currency(&self) -> String {
        self.state().preference.selected_currency.clone()
    }

    pub fn detected_currency(&self) -> Option<String> {
        self.state().preference.detected_currency.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state().preference.loading
    }

    pub fn last_error(&self) -> Option<String> {
        self.state().preference.last_error.clone()
    }

    /// Table de taux actuellement installée
    pub fn rates(&self) -> ExchangeRateTable {
        self.state().rates.clone()
    }

    /// Date du snapshot installé (None si repli ou pas encore chargé)
    pub fn rates_fetched_at(&self) -> Option<i64> {
        self.state().rates_fetched_at_ms
    }

    /// Vrai si les conversions passent par la table identité
    pub fn uses_fallback_rates(&self) -> bool {
        self.state().rates.is_identity()
    }

    // ========================================================================
    // Sélection, conversion, formatage
    // ========================================================================

    /// Change la devise d'affichage
    ///
    /// Pas de validation : un code inconnu est accepté, l'affichage
    /// retombe alors sur le code brut.
    pub fn set_selected_currency(&self, code: &str) {
        let mut state = self.state();
        if find_currency(code).is_none() {
            debug!(code, "Selected currency has no display metadata");
        }
        state.preference.select(code);
        info!(code, "User selected currency");
    }

    /// Convertit un montant de `from` vers `to` (ou la devise sélectionnée)
    pub fn convert(&self, amount: f64, from: &str, to: Option<&str>) -> f64 {
        let state = self.state();
        let target = to.unwrap_or(&state.preference.selected_currency);
        state.rates.convert(amount, from, target)
    }

    /// Formate un montant : symbole + milliers groupés, sans décimales
    pub fn format(&self, amount: f64, currency: Option<&str>) -> String {
        match currency {
            Some(code) => format_amount(amount, code),
            None => format_amount(amount, &self.selected_currency()),
        }
    }

    /// Convertit vers la devise sélectionnée puis formate (job card)
    pub fn format_converted(&self, amount: f64, from: &str) -> String {
        let target = self.selected_currency();
        let converted = self.convert(amount, from, Some(&target));
        format_amount(converted, &target)
    }

    /// Fourchette de salaire convertie : "£40,000 - £60,000"
    pub fn format_range(&self, min: f64, max: Option<f64>, from: &str) -> String {
        match max {
            Some(max) if max != min => format!(
                "{} - {}",
                self.format_converted(min, from),
                self.format_converted(max, from)
            ),
            _ => self.format_converted(min, from),
        }
    }
}

/// Label d'une devise pour l'UI : drapeau + code, ou code brut si inconnue
pub fn display_label(code: &str) -> String {
    match find_currency(code) {
        Some(currency) => currency.label(),
        None => code.to_string(),
    }
}

/// Formate un montant entier avec séparateur de milliers
///
/// CONCEPT RUST : manipulation de chaînes
/// - On arrondit, on formate la valeur absolue, puis on insère les virgules
///   de droite à gauche
pub fn format_amount(amount: f64, code: &str) -> String {
    let rounded = amount.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    let digits = format!("{:.0}", rounded.abs());
    format!("{}{}{}", sign, symbol_or_code(code), group_thousands(&digits))
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}
