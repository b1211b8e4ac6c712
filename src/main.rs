// ============================================================================
// boardfx - Job board en devise locale
// ============================================================================
// Programme TUI qui affiche des offres d'emploi avec les salaires convertis
// dans la devise de l'utilisateur (détectée par IP ou choisie à la main)
//
// CONCEPTS RUST CLÉS :
// 1. Terminal raw mode : contrôle total du terminal
// 2. Event loop : boucle infinie qui gère événements et rendering
// 3. Async dans sync : runtime tokio dans un worker thread
// 4. Arc<CurrencyService> : un seul service partagé par l'UI et le worker
// ============================================================================

use std::io;
use std::sync::{mpsc, Arc, Mutex, MutexGuard};

use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{debug, error, info};

use boardfx::app::App;
use boardfx::models::sample_jobs;
use boardfx::service::display_label;
use boardfx::ui::{events::EventHandler, render};
use boardfx::{Config, CurrencyService};

// ============================================================================
// AppCommand / AppResult : communication avec le worker thread
// ============================================================================

/// Commandes envoyées au worker thread pour exécuter des tâches async
#[derive(Debug, Clone)]
enum AppCommand {
    /// Vider le cache et recharger les taux
    RefreshRates,

    /// Relancer la géolocalisation IP
    DetectCurrency,
}

/// Résultats renvoyés par le worker thread
#[derive(Debug)]
enum AppResult {
    RatesRefreshed { currencies: usize, fallback: bool },
    CurrencyDetected { currency: String },
}

// ============================================================================
// Initialisation du logging
// ============================================================================
// Les println! ne fonctionnent pas une fois le TUI lancé : on log vers un
// fichier avec rotation quotidienne.
// ============================================================================

/// Initialise le système de logging vers ./logs/boardfx.log
///
/// # Utilisation
/// ```bash
/// tail -f logs/boardfx.log
/// RUST_LOG=boardfx=trace cargo run
/// ```
fn init_logging() -> Result<()> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let log_dir = std::path::PathBuf::from("./logs");
    std::fs::create_dir_all(&log_dir).context("Échec de la création du répertoire de logs")?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir.clone(), "boardfx.log");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true)
                .with_line_number(true),
        )
        .with(
            // RUST_LOG=debug, RUST_LOG=boardfx=trace, etc.
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "boardfx=debug,info".into()),
        )
        .init();

    info!(?log_dir, "Logging initialisé");
    Ok(())
}

// ============================================================================
// Point d'entrée du programme
// ============================================================================

fn main() -> Result<()> {
    init_logging().unwrap_or_else(|e| {
        eprintln!("⚠️  Warning: Failed to initialize logging: {}", e);
        eprintln!("   Continuing without logging...");
    });

    info!("boardfx starting up");

    let config = Config::load().context("Échec du chargement de la configuration")?;
    debug!(?config, "Configuration loaded");

    let currency = Arc::new(CurrencyService::from_config(config)?);

    // Détection de la devise et chargement des taux, en parallèle
    println!("💱 Détection de la devise et chargement des taux...\n");
    let runtime = tokio::runtime::Runtime::new().context("Échec de la création du runtime tokio")?;
    let preference = runtime.block_on(currency.initialize());

    println!("✅ Devise d'affichage : {}", display_label(&preference.selected_currency));
    if let Some(warning) = &preference.last_error {
        println!("⚠️  {}", warning);
    }

    debug!("Setting up terminal");
    let mut terminal = setup_terminal()?;

    let app = Arc::new(Mutex::new(App::with_jobs(currency.clone(), sample_jobs())));

    let (command_tx, command_rx) = mpsc::channel::<AppCommand>();
    let (result_tx, result_rx) = mpsc::channel::<AppResult>();

    info!("Spawning background worker thread");
    spawn_background_worker(runtime, currency, command_rx, result_tx);

    let events = EventHandler::new();

    info!("Starting event loop");
    let result = run(&mut terminal, app, &events, command_tx, result_rx);

    debug!("Restoring terminal");
    restore_terminal(&mut terminal)?;

    match &result {
        Ok(_) => info!("Application exited normally"),
        Err(e) => error!(error = ?e, "Application exited with error"),
    }

    result
}

/// Verrouille l'état de l'app, même si un thread a paniqué avec le lock
fn lock_app(app: &Mutex<App>) -> MutexGuard<'_, App> {
    app.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

// ============================================================================
// Background Worker Thread
// ============================================================================

/// Worker thread qui exécute les appels réseau sans bloquer l'UI
///
/// Le CurrencyService gère lui-même son indicateur `loading` : l'UI le lit
/// à chaque frame via snapshot().
fn spawn_background_worker(
    runtime: tokio::runtime::Runtime,
    currency: Arc<CurrencyService>,
    command_rx: mpsc::Receiver<AppCommand>,
    result_tx: mpsc::Sender<AppResult>,
) {
    std::thread::spawn(move || {
        while let Ok(command) = command_rx.recv() {
            info!(?command, "Worker received command");

            let result = match command {
                AppCommand::RefreshRates => {
                    let rates = runtime.block_on(currency.refresh());
                    AppResult::RatesRefreshed {
                        currencies: rates.len(),
                        fallback: rates.is_identity(),
                    }
                }
                AppCommand::DetectCurrency => {
                    let detected = runtime.block_on(currency.detect_currency());
                    AppResult::CurrencyDetected { currency: detected }
                }
            };

            if result_tx.send(result).is_err() {
                break;
            }
        }
        info!("Worker thread exiting (channel closed)");
    });
}

// ============================================================================
// Event Loop Principal
// ============================================================================

/// Exécute la boucle principale : résultats worker → render → input → update
fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: Arc<Mutex<App>>,
    events: &EventHandler,
    command_tx: mpsc::Sender<AppCommand>,
    result_rx: mpsc::Receiver<AppResult>,
) -> Result<()> {
    loop {
        if !lock_app(&app).is_running() {
            break;
        }

        // 0. Résultats du worker (non bloquant)
        match result_rx.try_recv() {
            Ok(AppResult::RatesRefreshed { currencies, fallback }) => {
                let mut app_lock = lock_app(&app);
                if fallback {
                    app_lock.set_status("Rates unavailable, showing original currency");
                } else {
                    info!(currencies, "Rates refreshed");
                    app_lock.set_status(format!("Rates refreshed ({} currencies)", currencies));
                }
            }
            Ok(AppResult::CurrencyDetected { currency }) => {
                lock_app(&app).set_status(format!("Location suggests {}", display_label(&currency)));
            }
            Err(mpsc::TryRecvError::Empty) => {}
            Err(mpsc::TryRecvError::Disconnected) => {
                error!("Worker thread disconnected!");
            }
        }

        // 1. Render
        terminal.draw(|frame| {
            let app_lock = lock_app(&app);
            render(frame, &app_lock);
        })?;

        // 2. Input
        if let Ok(event) = events.next() {
            let mut app_lock = lock_app(&app);
            handle_event(&mut app_lock, event, &command_tx);
        }

        // 3. Update
        lock_app(&app).tick();
    }

    Ok(())
}

/// Traite un événement et met à jour l'état de l'application
fn handle_event(app: &mut App, event: boardfx::ui::events::Event, command_tx: &mpsc::Sender<AppCommand>) {
    use boardfx::ui::events::{
        is_currency_event, is_detect_event, is_down_event, is_enter_event, is_escape_event,
        is_quit_event, is_refresh_event, is_up_event, Event,
    };

    match event {
        Event::Key(_) if is_quit_event(&event) => {
            if app.is_awaiting_quit_confirmation() {
                info!("User confirmed quit");
                app.quit();
            } else {
                info!("User requested quit (awaiting confirmation)");
                app.request_quit();
            }
        }

        Event::Key(_) if is_up_event(&event) => {
            app.cancel_quit();
            app.navigate_up();
        }
        Event::Key(_) if is_down_event(&event) => {
            app.cancel_quit();
            app.navigate_down();
        }

        // 'c' : Dashboard → CurrencyPicker
        Event::Key(_) if is_currency_event(&event) && app.is_on_dashboard() => {
            app.cancel_quit();
            app.clear_status();
            debug!("User opened currency picker");
            app.open_picker();
        }

        Event::Key(_) if is_enter_event(&event) && app.is_in_picker() => {
            if let Some(code) = app.confirm_picker() {
                info!(code, "User picked display currency");
            }
        }

        Event::Key(_) if is_escape_event(&event) && app.is_in_picker() => {
            debug!("User closed currency picker");
            app.close_picker();
        }

        Event::Key(_) if is_refresh_event(&event) && app.is_on_dashboard() => {
            app.cancel_quit();
            app.set_status("Refreshing rates...");
            info!("User requested rate refresh");
            let _ = command_tx.send(AppCommand::RefreshRates);
        }

        Event::Key(_) if is_detect_event(&event) && app.is_on_dashboard() => {
            app.cancel_quit();
            app.set_status("Detecting location...");
            info!("User requested currency detection");
            let _ = command_tx.send(AppCommand::DetectCurrency);
        }

        Event::Key(_) => {
            // Toute autre touche : annule la confirmation de quit
            app.cancel_quit();
        }

        Event::Tick => {}
    }
}

// ============================================================================
// Setup et restauration du terminal
// ============================================================================

/// Configure le terminal en mode TUI (raw mode + alternate screen)
fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(|e| e.into())
}

/// Restaure le terminal à son état normal (appelé même en cas d'erreur)
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;

    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;

    terminal.show_cursor()?;

    Ok(())
}
