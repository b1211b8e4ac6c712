// ============================================================================
// Structure : SupportedCurrency
// ============================================================================
// Liste statique des devises affichables sur le job board
//
// CONCEPTS RUST :
// 1. &'static str : toutes les données vivent dans le binaire, aucune allocation
// 2. const / static : table immuable, connue à la compilation
// 3. Option<&T> : la recherche par code peut ne rien trouver
// ============================================================================

use serde::Serialize;

/// Devise de base dans laquelle les taux sont exprimés
pub const BASE_CURRENCY: &str = "USD";

/// Devise de repli quand la géolocalisation échoue
pub const DEFAULT_CURRENCY: &str = "GBP";

/// Métadonnées d'affichage d'une devise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SupportedCurrency {
    /// Code ISO 4217 (ex: "GBP")
    pub code: &'static str,

    /// Symbole utilisé en préfixe (ex: "£")
    pub symbol: &'static str,

    /// Nom complet (ex: "British Pound")
    pub name: &'static str,

    /// Drapeau emoji du pays principal
    pub flag: &'static str,
}

impl SupportedCurrency {
    /// Label court pour l'affichage (ex: "🇬🇧 GBP")
    pub fn label(&self) -> String {
        format!("{} {}", self.flag, self.code)
    }
}

/// Devises supportées, dans l'ordre d'affichage du sélecteur
pub static SUPPORTED_CURRENCIES: &[SupportedCurrency] = &[
    SupportedCurrency { code: "GBP", symbol: "£", name: "British Pound", flag: "🇬🇧" },
    SupportedCurrency { code: "USD", symbol: "$", name: "US Dollar", flag: "🇺🇸" },
    SupportedCurrency { code: "EUR", symbol: "€", name: "Euro", flag: "🇪🇺" },
    SupportedCurrency { code: "NGN", symbol: "₦", name: "Nigerian Naira", flag: "🇳🇬" },
    SupportedCurrency { code: "GHS", symbol: "₵", name: "Ghanaian Cedi", flag: "🇬🇭" },
    SupportedCurrency { code: "KES", symbol: "KSh", name: "Kenyan Shilling", flag: "🇰🇪" },
    SupportedCurrency { code: "ZAR", symbol: "R", name: "South African Rand", flag: "🇿🇦" },
    SupportedCurrency { code: "CAD", symbol: "C$", name: "Canadian Dollar", flag: "🇨🇦" },
    SupportedCurrency { code: "AUD", symbol: "A$", name: "Australian Dollar", flag: "🇦🇺" },
    SupportedCurrency { code: "INR", symbol: "₹", name: "Indian Rupee", flag: "🇮🇳" },
    SupportedCurrency { code: "AED", symbol: "AED ", name: "UAE Dirham", flag: "🇦🇪" },
    SupportedCurrency { code: "JPY", symbol: "¥", name: "Japanese Yen", flag: "🇯🇵" },
];

/// Table pays (ISO 3166 alpha-2) -> devise
///
/// Les pays de la zone euro pointent tous vers EUR.
static COUNTRY_CURRENCIES: &[(&str, &str)] = &[
    ("GB", "GBP"),
    ("US", "USD"),
    ("NG", "NGN"),
    ("GH", "GHS"),
    ("KE", "KES"),
    ("ZA", "ZAR"),
    ("CA", "CAD"),
    ("AU", "AUD"),
    ("IN", "INR"),
    ("AE", "AED"),
    ("JP", "JPY"),
    // Zone euro
    ("AT", "EUR"),
    ("BE", "EUR"),
    ("CY", "EUR"),
    ("DE", "EUR"),
    ("EE", "EUR"),
    ("ES", "EUR"),
    ("FI", "EUR"),
    ("FR", "EUR"),
    ("GR", "EUR"),
    ("HR", "EUR"),
    ("IE", "EUR"),
    ("IT", "EUR"),
    ("LT", "EUR"),
    ("LU", "EUR"),
    ("LV", "EUR"),
    ("MT", "EUR"),
    ("NL", "EUR"),
    ("PT", "EUR"),
    ("SI", "EUR"),
    ("SK", "EUR"),
];

/// Cherche une devise supportée par son code
///
/// CONCEPT RUST : Iterator::find
/// - Parcourt la slice et s'arrête au premier match
/// - Retourne Option<&SupportedCurrency>
pub fn find_currency(code: &str) -> Option<&'static SupportedCurrency> {
    SUPPORTED_CURRENCIES.iter().find(|c| c.code == code)
}

/// Vérifie qu'un code fait partie de la liste supportée
pub fn is_supported(code: &str) -> bool {
    find_currency(code).is_some()
}

/// Devise associée à un code pays, insensible à la casse
pub fn currency_for_country(country_code: &str) -> Option<&'static str> {
    let country = country_code.trim().to_ascii_uppercase();
    COUNTRY_CURRENCIES
        .iter()
        .find(|(c, _)| *c == country)
        .map(|(_, currency)| *currency)
}

/// Symbole d'une devise, ou le code brut si elle est inconnue
pub fn symbol_or_code(code: &str) -> &str {
    match find_currency(code) {
        Some(currency) => currency.symbol,
        None => code,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_currency() {
        let gbp = find_currency("GBP").unwrap();
        assert_eq!(gbp.symbol, "£");
        assert!(find_currency("XYZ").is_none());
    }

    #[test]
    fn test_country_mapping() {
        assert_eq!(currency_for_country("NG"), Some("NGN"));
        assert_eq!(currency_for_country("de"), Some("EUR"));
        assert_eq!(currency_for_country(" us "), Some("USD"));
        assert_eq!(currency_for_country("BR"), None);
    }

    #[test]
    fn test_every_mapped_currency_is_supported() {
        for (country, currency) in COUNTRY_CURRENCIES {
            assert!(is_supported(currency), "{} maps to unsupported {}", country, currency);
        }
    }

    #[test]
    fn test_defaults_are_supported() {
        assert!(is_supported(BASE_CURRENCY));
        assert!(is_supported(DEFAULT_CURRENCY));
    }

    #[test]
    fn test_symbol_fallback_to_code() {
        assert_eq!(symbol_or_code("EUR"), "€");
        assert_eq!(symbol_or_code("CHF"), "CHF");
    }
}
