// ============================================================================
// Module : api
// ============================================================================
// Ce module contient les clients des services externes :
// - géolocalisation IP (pays -> devise)
// - fournisseur de taux de change (base USD)
//
// Chaque client est derrière un trait pour que le CurrencyService puisse
// recevoir des faux en test.
// ============================================================================

pub mod exchange;     // Client du fournisseur de taux
pub mod geolocation;  // Client de géolocalisation IP

use std::future::Future;
use std::time::Duration;

use crate::error::{FxError, FxResult};

// Re-export des types principaux
pub use exchange::{ExchangeRateApiProvider, RateProvider};
pub use geolocation::{GeoLocator, IpApiLocator};

/// User-Agent envoyé aux services externes
pub(crate) const USER_AGENT: &str = concat!("boardfx/", env!("CARGO_PKG_VERSION"));

/// Fait la course entre une future et un timer
///
/// CONCEPT : Fetch with timeout
/// - tokio::time::timeout lance les deux en parallèle
/// - Si le timer gagne, la future est simplement droppée
/// - Le dépassement devient une erreur récupérable (FxError::Timeout)
pub async fn with_timeout<T, F>(duration: Duration, future: F) -> FxResult<T>
where
    F: Future<Output = FxResult<T>>,
{
    match tokio::time::timeout(duration, future).await {
        Ok(result) => result,
        Err(_) => Err(FxError::Timeout(duration)),
    }
}
