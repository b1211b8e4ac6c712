// ============================================================================
// API Client : Géolocalisation IP
// ============================================================================
// Récupère le pays approximatif de l'utilisateur depuis son adresse IP
//
// Le service attendu renvoie un JSON avec un champ `country_code`
// (ipapi.co) ou `countryCode` (ip-api.com). Tout autre format est un échec.
// ============================================================================

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::api::USER_AGENT;
use crate::error::{FxError, FxResult};

/// Fournit le code pays (ISO 3166 alpha-2) de l'utilisateur
///
/// CONCEPT RUST : #[async_trait]
/// - Les traits ne supportent pas nativement `async fn` + dyn
/// - async_trait transforme la méthode en Pin<Box<dyn Future>>
#[async_trait]
pub trait GeoLocator: Send + Sync {
    async fn country_code(&self) -> FxResult<String>;
}

/// Réponse minimale du service de géolocalisation
#[derive(Debug, Deserialize)]
struct GeoResponse {
    #[serde(alias = "countryCode")]
    country_code: Option<String>,
}

/// Client reqwest pour ipapi.co (ou compatible)
#[derive(Debug, Clone)]
pub struct IpApiLocator {
    client: reqwest::Client,
    url: String,
}

impl IpApiLocator {
    /// Crée le client
    ///
    /// Le timeout n'est pas configuré ici : le service fait la course
    /// avec son propre timer (voir api::with_timeout).
    pub fn new(url: impl Into<String>) -> FxResult<Self> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl GeoLocator for IpApiLocator {
    #[instrument(skip(self), fields(url = %self.url))]
    async fn country_code(&self) -> FxResult<String> {
        debug!("Sending geolocation request");
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, "Geolocation service returned error status");
            return Err(FxError::Status {
                endpoint: self.url.clone(),
                status: status.as_u16(),
            });
        }

        let body: GeoResponse = response
            .json()
            .await
            .map_err(|e| FxError::Decode(e.to_string()))?;

        let country = body
            .country_code
            .map(|c| c.trim().to_ascii_uppercase())
            .filter(|c| c.len() == 2)
            .ok_or_else(|| FxError::Decode("missing country_code".to_string()))?;

        debug!(country = %country, "Geolocation resolved");
        Ok(country)
    }
}
