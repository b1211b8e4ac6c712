// ============================================================================
// Structure : ExchangeRateTable
// ============================================================================
// Snapshot des taux de change, tous exprimés par rapport à l'USD
//
// CONCEPT : Snapshot remplaçable
// - La table n'est jamais mise à jour partiellement
// - Un nouveau fetch remplace la table entière
// - Deux refresh concurrents : le dernier qui écrit gagne
// ============================================================================

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::currency::{BASE_CURRENCY, SUPPORTED_CURRENCIES};

/// Taux de change par code devise (1 USD = rate unités de la devise)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExchangeRateTable {
    rates: HashMap<String, f64>,
}

impl ExchangeRateTable {
    /// Table vide (aucun taux chargé)
    pub fn new() -> Self {
        Self::default()
    }

    /// Construit une table depuis une map brute
    pub fn from_rates(rates: HashMap<String, f64>) -> Self {
        Self { rates }
    }

    /// Table de repli : toutes les devises supportées à 1.0
    ///
    /// CONCEPT : Degrade-not-fail
    /// - Avec cette table, convert() devient un no-op
    /// - Les montants sont affichés dans leur devise d'origine
    pub fn identity() -> Self {
        let rates = SUPPORTED_CURRENCIES
            .iter()
            .map(|c| (c.code.to_string(), 1.0))
            .collect();
        Self { rates }
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.rates.contains_key(code)
    }

    /// Taux pour une devise, 1.0 si absent ou inexploitable
    ///
    /// Un taux nul, négatif ou NaN casserait la division dans convert(),
    /// il est traité comme un taux absent.
    pub fn rate(&self, code: &str) -> f64 {
        match self.rates.get(code) {
            Some(&rate) if rate.is_finite() && rate > 0.0 => rate,
            _ => 1.0,
        }
    }

    /// Vrai si chaque taux vaut 1.0 (table identité)
    pub fn is_identity(&self) -> bool {
        !self.rates.is_empty() && self.rates.values().all(|&r| r == 1.0)
    }

    /// Convertit un montant en passant par l'USD, arrondi à l'unité
    ///
    /// - table vide : montant inchangé
    /// - from == to : montant inchangé
    /// - sinon : amount / rate[from] * rate[to]
    pub fn convert(&self, amount: f64, from: &str, to: &str) -> f64 {
        if self.rates.is_empty() || from == to {
            return amount;
        }

        let in_base = if from == BASE_CURRENCY {
            amount
        } else {
            amount / self.rate(from)
        };

        let converted = if to == BASE_CURRENCY {
            in_base
        } else {
            in_base * self.rate(to)
        };

        converted.round()
    }

    /// Accès en lecture à la map brute
    pub fn as_map(&self) -> &HashMap<String, f64> {
        &self.rates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample_table() -> ExchangeRateTable {
        let mut rates = HashMap::new();
        rates.insert("USD".to_string(), 1.0);
        rates.insert("GBP".to_string(), 0.79);
        rates.insert("EUR".to_string(), 0.92);
        rates.insert("NGN".to_string(), 1550.0);
        rates.insert("JPY".to_string(), 150.5);
        ExchangeRateTable::from_rates(rates)
    }

    #[test]
    fn test_identity_conversion() {
        let table = sample_table();
        for currency in SUPPORTED_CURRENCIES {
            assert_eq!(table.convert(1234.0, currency.code, currency.code), 1234.0);
        }
    }

    #[test]
    fn test_convert_through_base() {
        let table = sample_table();
        // 100 USD -> 79 GBP
        assert_relative_eq!(table.convert(100.0, "USD", "GBP"), 79.0);
        // 79 GBP -> 100 USD
        assert_relative_eq!(table.convert(79.0, "GBP", "USD"), 100.0);
        // 1000 GBP -> USD -> NGN : 1000 / 0.79 * 1550 = 1_962_025.3...
        assert_relative_eq!(table.convert(1000.0, "GBP", "NGN"), 1_962_025.0);
    }

    #[test]
    fn test_round_trip_within_one_unit() {
        let table = sample_table();
        let codes = ["USD", "GBP", "EUR", "NGN", "JPY"];
        for amount in [1.0, 45.0, 999.0, 52_000.0, 1_250_000.0] {
            for a in codes {
                for b in codes {
                    let there = table.convert(amount, a, b);
                    let back = table.convert(there, b, a);
                    // ±1 unité quand b a une unité plus petite que a,
                    // sinon l'arrondi intermédiaire est amplifié par le ratio
                    let ratio = table.rate(a) / table.rate(b);
                    let tolerance = (0.5 * ratio + 0.5).max(1.0) + 1e-9;
                    assert!(
                        (back - amount).abs() <= tolerance,
                        "{} {} -> {} -> {} gave {}",
                        amount, a, b, a, back
                    );
                }
            }
        }
    }

    #[test]
    fn test_empty_table_passes_through() {
        let table = ExchangeRateTable::new();
        assert_eq!(table.convert(1234.5, "GBP", "NGN"), 1234.5);
    }

    #[test]
    fn test_identity_table_passes_through() {
        let table = ExchangeRateTable::identity();
        assert!(table.is_identity());
        assert_eq!(table.convert(1234.0, "GBP", "NGN"), 1234.0);
        assert_eq!(table.len(), SUPPORTED_CURRENCIES.len());
    }

    #[test]
    fn test_missing_or_bad_rate_falls_back_to_one() {
        let mut rates = HashMap::new();
        rates.insert("GBP".to_string(), 0.0);
        rates.insert("EUR".to_string(), f64::NAN);
        let table = ExchangeRateTable::from_rates(rates);

        assert_eq!(table.rate("GBP"), 1.0);
        assert_eq!(table.rate("EUR"), 1.0);
        assert_eq!(table.rate("KES"), 1.0);
        assert_eq!(table.convert(500.0, "GBP", "KES"), 500.0);
    }

    #[test]
    fn test_serde_is_a_plain_map() {
        let table = ExchangeRateTable::from_rates(HashMap::from([("GBP".to_string(), 0.5)]));
        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(json, r#"{"GBP":0.5}"#);

        let back: ExchangeRateTable = serde_json::from_str(&json).unwrap();
        assert_eq!(back, table);
    }
}
