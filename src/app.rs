// ============================================================================
// Structure : App
// ============================================================================
// Gère l'état global de l'application TUI (job board en devise locale)
//
// CONCEPTS RUST :
// 1. State Management : centraliser l'état dans une seule structure
// 2. Arc<CurrencyService> : le service est partagé avec le worker thread
// 3. Encapsulation : les modifications passent par les méthodes de App
//
// PATTERN : Cette structure suit le pattern "Application State"
// - Tous les composants de l'UI lisent depuis App
// - La devise, les taux et les erreurs vivent dans le CurrencyService
// ============================================================================

use std::sync::Arc;

use crate::models::{JobListing, SupportedCurrency, SUPPORTED_CURRENCIES};
use crate::service::CurrencyService;

// ============================================================================
// Enum : Screen
// ============================================================================

/// Écrans de l'application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// Vue principale : liste des offres avec salaires convertis
    Dashboard,

    /// Sélecteur de devise d'affichage
    CurrencyPicker,
}

/// État principal de l'application
pub struct App {
    /// Indique si l'application doit continuer à tourner
    pub running: bool,

    /// Offres affichées
    pub jobs: Vec<JobListing>,

    /// Index de l'offre sélectionnée
    pub selected_index: usize,

    /// Index surligné dans le sélecteur de devise
    pub picker_index: usize,

    /// Écran actuellement affiché
    pub current_screen: Screen,

    /// Two-step quit : première pression de 'q' arme, la seconde quitte
    pub confirm_quit: bool,

    /// Message d'information ponctuel (résultat d'un refresh, etc.)
    pub status_message: Option<String>,

    /// Service de devises partagé avec le worker
    pub currency: Arc<CurrencyService>,
}

impl App {
    /// Crée une App sans offres
    pub fn new(currency: Arc<CurrencyService>) -> Self {
        Self::with_jobs(currency, Vec::new())
    }

    /// Crée une App avec une liste d'offres préchargée
    pub fn with_jobs(currency: Arc<CurrencyService>, jobs: Vec<JobListing>) -> Self {
        Self {
            running: true,
            jobs,
            selected_index: 0,
            picker_index: 0,
            current_screen: Screen::Dashboard,
            confirm_quit: false,
            status_message: None,
            currency,
        }
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Navigue vers le haut dans la liste active
    ///
    /// CONCEPT RUST : Saturating arithmetic
    /// - saturating_sub() ne descend pas en dessous de 0
    pub fn navigate_up(&mut self) {
        match self.current_screen {
            Screen::Dashboard => self.selected_index = self.selected_index.saturating_sub(1),
            Screen::CurrencyPicker => self.picker_index = self.picker_index.saturating_sub(1),
        }
    }

    /// Navigue vers le bas dans la liste active
    pub fn navigate_down(&mut self) {
        match self.current_screen {
            Screen::Dashboard => {
                let max_index = self.jobs.len().saturating_sub(1);
                self.selected_index = (self.selected_index + 1).min(max_index);
            }
            Screen::CurrencyPicker => {
                let max_index = SUPPORTED_CURRENCIES.len().saturating_sub(1);
                self.picker_index = (self.picker_index + 1).min(max_index);
            }
        }
    }

    /// Offre sélectionnée (None si la liste est vide)
    pub fn selected_job(&self) -> Option<&JobListing> {
        self.jobs.get(self.selected_index)
    }

    /// Salaire d'une offre converti et formaté dans la devise d'affichage
    pub fn salary_label(&self, job: &JobListing) -> String {
        self.currency
            .format_range(job.salary_min, job.salary_max, &job.currency)
    }

    // ========================================================================
    // Sélecteur de devise
    // ========================================================================

    /// Ouvre le sélecteur, curseur sur la devise actuelle
    pub fn open_picker(&mut self) {
        let selected = self.currency.selected_currency();
        self.picker_index = SUPPORTED_CURRENCIES
            .iter()
            .position(|c| c.code == selected)
            .unwrap_or(0);
        self.current_screen = Screen::CurrencyPicker;
    }

    /// Ferme le sélecteur sans rien changer
    pub fn close_picker(&mut self) {
        self.current_screen = Screen::Dashboard;
    }

    /// Devise surlignée dans le sélecteur
    pub fn highlighted_currency(&self) -> Option<&'static SupportedCurrency> {
        SUPPORTED_CURRENCIES.get(self.picker_index)
    }

    /// Valide la devise surlignée (choix explicite) et revient au dashboard
    pub fn confirm_picker(&mut self) -> Option<&'static str> {
        let chosen = self.highlighted_currency().map(|c| c.code);
        if let Some(code) = chosen {
            self.currency.set_selected_currency(code);
            self.status_message = Some(format!("Salaries now shown in {}", code));
        }
        self.current_screen = Screen::Dashboard;
        chosen
    }

    pub fn is_on_dashboard(&self) -> bool {
        self.current_screen == Screen::Dashboard
    }

    pub fn is_in_picker(&self) -> bool {
        self.current_screen == Screen::CurrencyPicker
    }

    // ========================================================================
    // Quit / statut
    // ========================================================================

    pub fn request_quit(&mut self) {
        self.confirm_quit = true;
    }

    pub fn cancel_quit(&mut self) {
        self.confirm_quit = false;
    }

    pub fn is_awaiting_quit_confirmation(&self) -> bool {
        self.confirm_quit
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    /// Tick : appelé à chaque itération de la boucle
    pub fn tick(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::models::{sample_jobs, ExchangeRateTable};
    use crate::test_support::{FakeGeoLocator, FakeRateProvider, ManualClock, SharedStore};
    use std::collections::HashMap;

    fn service() -> Arc<CurrencyService> {
        let rates = ExchangeRateTable::from_rates(HashMap::from([
            ("GBP".to_string(), 0.8),
            ("NGN".to_string(), 1500.0),
        ]));
        Arc::new(CurrencyService::new(
            Config::default(),
            Arc::new(FakeGeoLocator::country("GB")),
            Arc::new(FakeRateProvider::ok(rates)),
            Box::new(SharedStore::new()),
            Arc::new(ManualClock::new(0)),
        ))
    }

    #[test]
    fn test_app_creation() {
        let app = App::new(service());
        assert!(app.is_running());
        assert!(app.jobs.is_empty());
        assert!(app.is_on_dashboard());
        assert!(app.selected_job().is_none());
    }

    #[test]
    fn test_app_quit() {
        let mut app = App::new(service());
        app.request_quit();
        assert!(app.is_awaiting_quit_confirmation());
        app.cancel_quit();
        assert!(!app.is_awaiting_quit_confirmation());
        app.quit();
        assert!(!app.is_running());
    }

    #[test]
    fn test_dashboard_navigation() {
        let mut app = App::with_jobs(service(), sample_jobs());
        let last = app.jobs.len() - 1;

        app.navigate_up();
        assert_eq!(app.selected_index, 0);

        for _ in 0..20 {
            app.navigate_down();
        }
        assert_eq!(app.selected_index, last);
        assert_eq!(app.selected_job(), app.jobs.last());
    }

    #[test]
    fn test_picker_starts_on_selected_currency() {
        let svc = service();
        svc.set_selected_currency("NGN");
        let mut app = App::new(svc);

        app.open_picker();
        assert!(app.is_in_picker());
        assert_eq!(app.highlighted_currency().unwrap().code, "NGN");
    }

    #[test]
    fn test_picker_confirm_sets_explicit_choice() {
        let svc = service();
        let mut app = App::new(svc.clone());

        app.open_picker();
        // GBP est en tête de liste, USD juste après
        app.navigate_down();
        assert_eq!(app.confirm_picker(), Some("USD"));

        assert!(app.is_on_dashboard());
        assert_eq!(svc.selected_currency(), "USD");
        assert!(svc.snapshot().has_explicit_choice);
        assert!(app.status_message.is_some());
    }

    #[test]
    fn test_picker_close_keeps_selection() {
        let svc = service();
        let mut app = App::new(svc.clone());
        app.open_picker();
        app.navigate_down();
        app.close_picker();
        assert_eq!(svc.selected_currency(), "GBP");
    }

    #[tokio::test]
    async fn test_salary_label_follows_selected_currency() {
        let svc = service();
        svc.load_rates(false).await;
        let app = App::new(svc.clone());
        let job = JobListing::new("Engineer", "Acme", "Remote", 100_000.0, Some(120_000.0), "USD");

        assert_eq!(app.salary_label(&job), "£80,000 - £96,000");

        svc.set_selected_currency("USD");
        assert_eq!(app.salary_label(&job), "$100,000 - $120,000");
    }
}
