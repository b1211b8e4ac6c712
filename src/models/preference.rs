// ============================================================================
// Structure : CurrencyPreference
// ============================================================================
// État de session du service de devises
//
// CONCEPTS RUST :
// 1. Enum pour state machine : Uninitialized → Loading → Ready
// 2. Option<T> : devise détectée et erreur sont optionnelles
// 3. Clone : l'UI lit une copie (snapshot), jamais l'état interne
// ============================================================================

use serde::Serialize;

/// Phase du service
///
/// Il n'y a pas d'état d'échec terminal : une erreur de chargement
/// mène quand même à Ready, avec les taux de repli.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ServiceStatus {
    /// Rien n'a encore été lancé
    Uninitialized,
    /// Détection et/ou chargement des taux en cours
    Loading,
    /// Devise et taux résolus (éventuellement via les valeurs de repli)
    Ready,
}

/// Préférence de devise pour la session en cours
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrencyPreference {
    /// Devise d'affichage actuelle
    pub selected_currency: String,

    /// Devise déduite de la géolocalisation IP (None si échec ou pas encore lancée)
    pub detected_currency: Option<String>,

    /// Vrai pendant un chargement de taux
    pub loading: bool,

    /// Avertissement non bloquant affiché à l'utilisateur
    pub last_error: Option<String>,

    /// L'utilisateur a choisi une devise lui-même
    /// La détection ne doit plus écraser ce choix.
    pub has_explicit_choice: bool,

    pub status: ServiceStatus,
}

impl CurrencyPreference {
    /// Préférence initiale : devise par défaut, rien de détecté
    pub fn new(default_currency: &str) -> Self {
        Self {
            selected_currency: default_currency.to_string(),
            detected_currency: None,
            loading: false,
            last_error: None,
            has_explicit_choice: false,
            status: ServiceStatus::Uninitialized,
        }
    }

    /// Applique un résultat de détection
    ///
    /// Ne touche à la sélection que si l'utilisateur n'a rien choisi.
    pub fn apply_detection(&mut self, detected: Option<&str>, fallback: &str) {
        self.detected_currency = detected.map(str::to_string);
        if !self.has_explicit_choice {
            self.selected_currency = detected.unwrap_or(fallback).to_string();
        }
    }

    /// Choix explicite de l'utilisateur
    pub fn select(&mut self, code: &str) {
        self.selected_currency = code.to_string();
        self.has_explicit_choice = true;
    }

    pub fn is_ready(&self) -> bool {
        self.status == ServiceStatus::Ready
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_preference() {
        let pref = CurrencyPreference::new("GBP");
        assert_eq!(pref.selected_currency, "GBP");
        assert!(pref.detected_currency.is_none());
        assert_eq!(pref.status, ServiceStatus::Uninitialized);
    }

    #[test]
    fn test_detection_updates_selection_without_explicit_choice() {
        let mut pref = CurrencyPreference::new("GBP");
        pref.apply_detection(Some("NGN"), "GBP");
        assert_eq!(pref.selected_currency, "NGN");
        assert_eq!(pref.detected_currency.as_deref(), Some("NGN"));
    }

    #[test]
    fn test_detection_keeps_explicit_choice() {
        let mut pref = CurrencyPreference::new("GBP");
        pref.select("EUR");
        pref.apply_detection(Some("NGN"), "GBP");
        assert_eq!(pref.selected_currency, "EUR");
        assert_eq!(pref.detected_currency.as_deref(), Some("NGN"));
    }

    #[test]
    fn test_failed_detection_falls_back() {
        let mut pref = CurrencyPreference::new("USD");
        pref.apply_detection(None, "GBP");
        assert_eq!(pref.selected_currency, "GBP");
        assert!(pref.detected_currency.is_none());
    }
}
