// ============================================================================
// Module : error
// ============================================================================
// Erreurs typées de la librairie
//
// Aucune de ces erreurs n'est fatale : le CurrencyService les absorbe et
// bascule sur une valeur de repli (devise par défaut, taux identité).
// Elles restent typées pour que les logs disent précisément ce qui a échoué.
// ============================================================================

use std::time::Duration;

use thiserror::Error;

/// Erreurs des collaborateurs externes (géolocalisation, taux, cache)
#[derive(Debug, Error)]
pub enum FxError {
    /// Le timer a gagné la course contre la requête
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// Erreur réseau ou de construction du client
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Réponse HTTP hors 2xx
    #[error("unexpected status {status} from {endpoint}")]
    Status { endpoint: String, status: u16 },

    /// JSON mal formé ou champ manquant
    #[error("could not decode response: {0}")]
    Decode(String),

    /// Lecture / écriture du cache persistant
    #[error("storage error: {0}")]
    Storage(String),

    /// Fichier de configuration illisible
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl From<serde_json::Error> for FxError {
    fn from(e: serde_json::Error) -> Self {
        FxError::Decode(e.to_string())
    }
}

impl From<std::io::Error> for FxError {
    fn from(e: std::io::Error) -> Self {
        FxError::Storage(e.to_string())
    }
}

/// Alias pratique pour les résultats de la librairie
pub type FxResult<T> = Result<T, FxError>;
