// ============================================================================
// Structure : JobListing
// ============================================================================
// Une offre d'emploi telle qu'affichée sur une "job card"
//
// Le salaire est stocké dans la devise de l'employeur ; la conversion vers
// la devise d'affichage est faite au rendu par le CurrencyService.
// ============================================================================

use serde::{Deserialize, Serialize};

/// Offre d'emploi avec fourchette de salaire annuel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobListing {
    /// Intitulé du poste (ex: "Backend Engineer")
    pub title: String,

    /// Nom de l'entreprise
    pub company: String,

    /// Ville / remote
    pub location: String,

    /// Bas de la fourchette, en unités entières de `currency`
    pub salary_min: f64,

    /// Haut de la fourchette (None = salaire fixe)
    pub salary_max: Option<f64>,

    /// Devise de publication (code ISO 4217)
    pub currency: String,
}

impl JobListing {
    pub fn new(
        title: impl Into<String>,
        company: impl Into<String>,
        location: impl Into<String>,
        salary_min: f64,
        salary_max: Option<f64>,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            company: company.into(),
            location: location.into(),
            salary_min,
            salary_max,
            currency: currency.into(),
        }
    }

    /// Intitulé tronqué à `width` caractères avec ellipse
    pub fn short_title(&self, width: usize) -> String {
        if self.title.chars().count() <= width {
            self.title.clone()
        } else {
            let truncated: String = self.title.chars().take(width.saturating_sub(1)).collect();
            format!("{}…", truncated)
        }
    }
}

/// Offres de démonstration, publiées dans plusieurs devises
pub fn sample_jobs() -> Vec<JobListing> {
    vec![
        JobListing::new("Senior Backend Engineer", "Paystack", "Lagos", 18_000_000.0, Some(30_000_000.0), "NGN"),
        JobListing::new("Product Designer", "Monzo", "London", 55_000.0, Some(70_000.0), "GBP"),
        JobListing::new("Data Analyst", "Zalando", "Berlin", 52_000.0, Some(64_000.0), "EUR"),
        JobListing::new("Site Reliability Engineer", "Shopify", "Remote", 140_000.0, Some(175_000.0), "USD"),
        JobListing::new("Mobile Developer", "M-KOPA", "Nairobi", 4_800_000.0, None, "KES"),
        JobListing::new("Frontend Engineer", "Takealot", "Cape Town", 720_000.0, Some(900_000.0), "ZAR"),
        JobListing::new("Customer Success Lead", "Hubtel", "Accra", 180_000.0, None, "GHS"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::currency::is_supported;

    #[test]
    fn test_short_title() {
        let job = JobListing::new("Site Reliability Engineer", "Acme", "Remote", 1.0, None, "USD");
        assert_eq!(job.short_title(40), "Site Reliability Engineer");
        assert_eq!(job.short_title(10), "Site Reli…");
    }

    #[test]
    fn test_sample_jobs_use_supported_currencies() {
        let jobs = sample_jobs();
        assert!(!jobs.is_empty());
        for job in &jobs {
            assert!(is_supported(&job.currency), "{}", job.currency);
            if let Some(max) = job.salary_max {
                assert!(max >= job.salary_min);
            }
        }
    }
}
