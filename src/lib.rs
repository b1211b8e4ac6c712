// ============================================================================
// boardfx - Library
// ============================================================================
// Service de devises du job board : détection, taux, conversion, formatage
// Expose les modules publics pour le binaire TUI et les tests
// ============================================================================

pub mod api;     // Géolocalisation IP + fournisseur de taux
pub mod app;     // État de l'application TUI
pub mod cache;   // Cache persistant des taux
pub mod clock;   // Source du temps (injectable)
pub mod config;  // Configuration (toml + env)
pub mod error;   // Erreurs typées
pub mod models;  // Structures de données
pub mod service; // CurrencyService
pub mod ui;      // Interface utilisateur

#[cfg(test)]
mod test_support;

pub use config::Config;
pub use error::{FxError, FxResult};
pub use service::CurrencyService;
