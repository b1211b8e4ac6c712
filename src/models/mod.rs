// ============================================================================
// Module : models
// ============================================================================
// Ce module contient toutes les structures de données du service de devises
//
// CONCEPT RUST : Modules et visibilité
// - "pub mod" : déclare un sous-module publique (accessible depuis l'extérieur)
// - Sans "pub", le module serait privé au crate
// ============================================================================

pub mod currency;   // Devises supportées + table pays -> devise
pub mod rates;      // Table des taux de change (base USD)
pub mod preference; // État de session (devise choisie, détectée, erreurs)
pub mod job;        // Offres d'emploi affichées par la TUI

// Re-export des structures principales pour simplifier les imports
// Au lieu de : use boardfx::models::rates::ExchangeRateTable;
// On peut faire : use boardfx::models::ExchangeRateTable;
pub use currency::{
    currency_for_country, find_currency, is_supported, symbol_or_code, SupportedCurrency,
    BASE_CURRENCY, DEFAULT_CURRENCY, SUPPORTED_CURRENCIES,
};
pub use job::{sample_jobs, JobListing};
pub use preference::{CurrencyPreference, ServiceStatus};
pub use rates::ExchangeRateTable;
