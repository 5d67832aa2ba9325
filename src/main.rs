// ============================================================================
// LazyForex - Convertisseur de devises (taux Banque de Corée)
// ============================================================================
// Programme TUI : conversion de devises via les taux quotidiens ECOS,
// taux croisés par le won et graphique de tendance
//
// CONCEPTS RUST CLÉS :
// 1. Terminal raw mode : contrôle total du terminal
// 2. Event loop : boucle infinie qui gère événements et rendering
// 3. Async dans sync : tokio::runtime::Runtime pour appels API
// 4. RAII : restauration automatique du terminal
// ============================================================================

use std::io;
use std::sync::{mpsc, Arc, Mutex};

use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{debug, error, info};

use lazyforex::api::{fetch_historical_rates, fetch_latest_rates};
use lazyforex::app::App;
use lazyforex::models::{RatePoint, RateTable};
use lazyforex::rates::reorient_series;
use lazyforex::ui::{events::EventHandler, render};

// ============================================================================
// AppCommand : Commandes pour le worker thread
// ============================================================================
// CONCEPT RUST : Command pattern avec channels
// - L'event loop envoie des commandes au worker thread
// - Le worker thread exécute les tâches async (fetch API)
// - Communication via mpsc channels (multi-producer, single-consumer)
// ============================================================================

/// Commandes envoyées au worker thread pour exécuter des tâches async
#[derive(Debug, Clone)]
enum AppCommand {
    /// Recharger tous les taux depuis ECOS
    ///
    /// C'est la seule forme de retry du système : déclenchée par
    /// l'utilisateur, jamais par la couche de fetch elle-même
    RefreshRates,

    /// Charger la série historique d'une devise
    /// - code : devise non-KRW de la paire affichée
    /// - days : fenêtre demandée (7 ou 30)
    LoadChart { code: String, days: u32 },
}

/// Résultats renvoyés par le worker thread
#[derive(Debug)]
enum AppResult {
    /// Table des taux rechargée (possiblement partielle, voire vide)
    RatesLoaded(RateTable),

    /// Série historique brute (KRW par unité, avant réorientation)
    ChartLoaded(Vec<RatePoint>),

    /// Erreur lors du refresh des taux
    RefreshError(String),
}

// ============================================================================
// Initialisation du logging
// ============================================================================
// CONCEPT : Logging dans une app TUI
// - Les println! ne fonctionnent pas une fois le TUI lancé
// - On log vers un fichier à la place
// - Tracing : framework moderne de logging structuré
// - Rotation quotidienne automatique des logs
// ============================================================================

/// Initialise le système de logging vers fichier
///
/// Les logs sont écrits dans le répertoire data de la plateforme :
/// - Linux/WSL : ~/.local/share/lazyforex/logs/lazyforex.log
/// - macOS : ~/Library/Application Support/lazyforex/logs/lazyforex.log
///
/// # Utilisation
/// ```bash
/// # Voir les logs en temps réel
/// tail -f ~/.local/share/lazyforex/logs/lazyforex.log
///
/// # Contrôler le niveau de log
/// RUST_LOG=debug cargo run
/// RUST_LOG=lazyforex=trace cargo run
/// ```
fn init_logging() -> Result<()> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    // Répertoire data de la plateforme, ./logs en dernier recours
    let log_dir = dirs::data_local_dir()
        .map(|d| d.join("lazyforex").join("logs"))
        .unwrap_or_else(|| std::path::PathBuf::from("./logs"));

    std::fs::create_dir_all(&log_dir).context("Échec de la création du répertoire de logs")?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir.clone(), "lazyforex.log");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender) // Écrit dans le fichier
                .with_ansi(false) // Pas de codes couleur dans le fichier
                .with_target(true) // Inclut le module (ex: lazyforex::api::ecos)
                .with_thread_ids(true) // Inclut l'ID du thread (utile pour async)
                .with_line_number(true), // Inclut le numéro de ligne
        )
        .with(
            // Filtre les logs par niveau
            // - RUST_LOG=debug : tous les logs debug+
            // - Par défaut : debug pour lazyforex, info pour les dépendances
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lazyforex=debug,info".into()),
        )
        .init();

    info!(?log_dir, "Logging initialisé");
    Ok(())
}

// ============================================================================
// Point d'entrée du programme
// ============================================================================

fn main() -> Result<()> {
    // Logging d'abord : si init échoue, on continue quand même
    init_logging().unwrap_or_else(|e| {
        eprintln!("⚠️  Warning: Failed to initialize logging: {}", e);
        eprintln!("   Continuing without logging...");
    });

    info!("LazyForex starting up");
    println!("💱 Chargement des taux Banque de Corée...\n");

    // CONCEPT RUST : Exécuter du code async dans du code sync
    // - tokio::runtime::Runtime : crée un runtime tokio
    // - .block_on() : exécute une future de manière bloquante
    let runtime = tokio::runtime::Runtime::new()?;
    let initial_table = runtime.block_on(fetch_latest_rates()).unwrap_or_else(|e| {
        error!(error = ?e, "Initial rate fetch failed");
        RateTable::new()
    });

    if initial_table.is_empty() {
        println!("⚠ Aucun taux récupéré — [r] pour réessayer une fois lancé\n");
    } else {
        println!("✅ {} taux chargés !\n", initial_table.len());
    }

    // Setup du terminal en mode TUI
    debug!("Setting up terminal");
    let mut terminal = setup_terminal()?;

    // Crée l'état de l'application avec la table initiale
    // CONCEPT RUST : Arc<Mutex<>> pour partage entre threads
    // - Permet au worker thread et à l'UI d'accéder à App
    let app = Arc::new(Mutex::new(App::new()));
    {
        let mut app_lock = app.lock().unwrap();
        app_lock.set_table(initial_table);
    }

    // Channels pour communication avec le worker
    let (command_tx, command_rx) = mpsc::channel::<AppCommand>();
    let (result_tx, result_rx) = mpsc::channel::<AppResult>();

    // Lance le worker thread en arrière-plan
    info!("Spawning background worker thread");
    spawn_background_worker(command_rx, result_tx, app.clone());

    // Précharge la série de la paire par défaut (USD → KRW, 7 jours)
    {
        let app_lock = app.lock().unwrap();
        if let Some(currency) = app_lock.chart_currency() {
            let _ = command_tx.send(AppCommand::LoadChart {
                code: currency.code.to_string(),
                days: app_lock.chart_period,
            });
        }
    }

    // Exécute l'event loop
    let events = EventHandler::new();
    info!("Starting event loop");
    let result = run(&mut terminal, app.clone(), &events, command_tx, result_rx);

    // Restaure le terminal (même en cas d'erreur)
    debug!("Restoring terminal");
    restore_terminal(&mut terminal)?;

    match &result {
        Ok(_) => info!("Application exited normally"),
        Err(e) => error!(error = ?e, "Application exited with error"),
    }

    result
}

// ============================================================================
// Background Worker Thread
// ============================================================================
// CONCEPT RUST : Background async worker avec channels
// - Thread séparé qui traite les commandes async
// - Reçoit des AppCommand via un channel (command_rx)
// - Envoie des AppResult via un autre channel (result_tx)
// - Permet de faire des appels API sans bloquer l'UI
// ============================================================================

/// Worker thread qui exécute les tâches async en arrière-plan
///
/// CONCEPT RUST : Thread + async runtime
/// - std::thread::spawn() : crée un thread OS
/// - tokio::runtime::Runtime : runtime async dans ce thread
/// - mpsc channels : communication inter-thread
fn spawn_background_worker(
    command_rx: mpsc::Receiver<AppCommand>,
    result_tx: mpsc::Sender<AppResult>,
    app: Arc<Mutex<App>>,
) {
    std::thread::spawn(move || {
        // CONCEPT : Runtime per-thread
        // - block_on() bloque le thread worker (pas l'UI)
        let runtime = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");

        loop {
            match command_rx.recv() {
                Ok(command) => {
                    info!(?command, "Worker received command");

                    match command {
                        AppCommand::RefreshRates => {
                            {
                                let mut app_lock = app.lock().unwrap();
                                app_lock.start_loading(Some(
                                    "Mise à jour des taux...".to_string(),
                                ));
                            }

                            let result = runtime.block_on(fetch_latest_rates());

                            match result {
                                Ok(table) => {
                                    info!(loaded = table.len(), "Rates refreshed");
                                    let _ = result_tx.send(AppResult::RatesLoaded(table));
                                }
                                Err(e) => {
                                    error!(error = ?e, "Failed to refresh rates");
                                    let _ =
                                        result_tx.send(AppResult::RefreshError(e.to_string()));
                                }
                            }

                            {
                                let mut app_lock = app.lock().unwrap();
                                app_lock.stop_loading();
                            }
                        }

                        AppCommand::LoadChart { code, days } => {
                            {
                                let mut app_lock = app.lock().unwrap();
                                app_lock.start_loading(Some(format!(
                                    "Chargement de la tendance {} ({} jours)...",
                                    code, days
                                )));
                            }

                            // fetch_historical_rates dégrade déjà en série
                            // vide : pas de variante d'erreur à propager
                            let points =
                                runtime.block_on(fetch_historical_rates(&code, days));

                            info!(currency = %code, points = points.len(), "Chart data loaded");
                            let _ = result_tx.send(AppResult::ChartLoaded(points));

                            {
                                let mut app_lock = app.lock().unwrap();
                                app_lock.stop_loading();
                            }
                        }
                    }
                }
                Err(_) => {
                    // Channel fermé, on quitte
                    info!("Worker thread exiting (channel closed)");
                    break;
                }
            }
        }
    });
}

// ============================================================================
// Event Loop Principal
// ============================================================================
// CONCEPT : Event Loop Pattern
// - Loop infinie : while app.is_running()
// - À chaque itération :
//   1. Traiter les résultats du worker
//   2. Dessiner l'interface (render)
//   3. Traiter les événements (input)
//   4. Mettre à jour l'état (update)
// ============================================================================

/// Exécute la boucle principale de l'application
fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: Arc<Mutex<App>>,
    events: &EventHandler,
    command_tx: mpsc::Sender<AppCommand>,
    result_rx: mpsc::Receiver<AppResult>,
) -> Result<()> {
    loop {
        // CONCEPT : Lock scope minimisé
        {
            let app_lock = app.lock().unwrap();
            if !app_lock.is_running() {
                break;
            }
        }

        // ========================================
        // 0. RÉSULTATS : Traite les résultats du worker
        // ========================================
        // CONCEPT : Non-blocking receive avec try_recv
        // - Dernier résolu gagne : un résultat obsolète écrase l'état
        //   quand il arrive, il n'y a pas d'annulation des fetchs
        match result_rx.try_recv() {
            Ok(result) => match result {
                AppResult::RatesLoaded(table) => {
                    let mut app_lock = app.lock().unwrap();
                    info!(
                        loaded = table.len(),
                        failed = table.failed.len(),
                        "Applying refreshed rate table"
                    );
                    app_lock.set_table(table);
                }
                AppResult::ChartLoaded(points) => {
                    let mut app_lock = app.lock().unwrap();
                    // Réoriente la série brute (KRW par unité) dans le
                    // sens de la paire actuellement affichée
                    let oriented = reorient_series(
                        &points,
                        app_lock.from_currency().code,
                        app_lock.to_currency().code,
                        &app_lock.table,
                    );
                    debug!(points = oriented.len(), "Applying reoriented chart series");
                    app_lock.set_chart_data(oriented);
                }
                AppResult::RefreshError(message) => {
                    error!(error = %message, "Rate refresh failed");
                    let mut app_lock = app.lock().unwrap();
                    app_lock.error_message =
                        Some("Impossible de récupérer les taux. Réessayez avec [r].".to_string());
                }
            },
            Err(mpsc::TryRecvError::Empty) => {
                // Pas de résultat, c'est normal
            }
            Err(mpsc::TryRecvError::Disconnected) => {
                error!("Worker thread disconnected!");
            }
        }

        // ========================================
        // 1. RENDER : Dessine l'interface
        // ========================================
        {
            let app_clone = app.clone();
            terminal.draw(|frame| {
                let app_lock = app_clone.lock().unwrap();
                render(frame, &app_lock);
            })?;
        }

        // ========================================
        // 2. INPUT : Traite les événements
        // ========================================
        match events.next() {
            Ok(event) => {
                let mut app_lock = app.lock().unwrap();
                handle_event(&mut app_lock, event, &command_tx);
            }
            Err(_) => {
                // Erreur lors de la lecture d'événement
            }
        }

        // ========================================
        // 3. UPDATE : Met à jour l'état
        // ========================================
        {
            let mut app_lock = app.lock().unwrap();
            app_lock.tick();
        }
    }

    Ok(())
}

// ============================================================================
// Gestion des événements
// ============================================================================

/// Envoie la commande de chargement du graphique pour la paire courante
fn request_chart(app: &App, command_tx: &mpsc::Sender<AppCommand>) {
    if let Some(currency) = app.chart_currency() {
        let _ = command_tx.send(AppCommand::LoadChart {
            code: currency.code.to_string(),
            days: app.chart_period,
        });
    }
}

/// Traite un événement et met à jour l'état de l'application
///
/// CONCEPT RUST : Pattern matching complexe avec guards
/// - Guard clauses (if) pour filtrer les événements
/// - Navigation contextuelle selon l'écran actuel
fn handle_event(app: &mut App, event: lazyforex::ui::events::Event, command_tx: &mpsc::Sender<AppCommand>) {
    use lazyforex::ui::events::{
        get_char_from_event, is_amount_char_event, is_amount_event, is_backspace_event,
        is_down_event, is_enter_event, is_escape_event, is_period_event, is_quit_event,
        is_refresh_event, is_swap_event, is_tab_event, is_up_event, Event,
    };

    match event {
        Event::Key(_) if is_quit_event(&event) && !app.is_in_input_mode() => {
            // CONCEPT : Two-step confirmation pour éviter les quits accidentels
            if app.is_awaiting_quit_confirmation() {
                info!("User confirmed quit");
                app.quit();
            } else {
                info!("User requested quit (awaiting confirmation)");
                app.request_quit();
            }
        }

        // Tab : bascule le côté de la paire ciblé (convertisseur)
        Event::Key(_) if is_tab_event(&event) && app.is_on_converter() => {
            app.cancel_quit();
            app.toggle_focus();
        }

        // ↑↓ : fait défiler la devise du côté focalisé (convertisseur)
        Event::Key(_) if is_up_event(&event) && app.is_on_converter() => {
            app.cancel_quit();
            debug!("User cycled currency backward");
            app.cycle_currency(false);
        }
        Event::Key(_) if is_down_event(&event) && app.is_on_converter() => {
            app.cancel_quit();
            debug!("User cycled currency forward");
            app.cycle_currency(true);
        }

        // 's' : échange from et to
        Event::Key(_) if is_swap_event(&event) && app.is_on_converter() => {
            app.cancel_quit();
            info!("User swapped currency pair");
            app.swap_currencies();
        }

        // 'r' : rafraîchit les taux (retry déclenché par l'utilisateur)
        Event::Key(_) if is_refresh_event(&event) && app.is_on_converter() => {
            app.cancel_quit();
            info!("User requested rate refresh");
            let _ = command_tx.send(AppCommand::RefreshRates);
        }

        // 'a' : édite le montant
        Event::Key(_) if is_amount_event(&event) && app.is_on_converter() => {
            app.cancel_quit();
            info!("User editing amount");
            app.start_input("Montant : ".to_string());
        }

        // Enter : ouvre le graphique de la paire
        Event::Key(_) if is_enter_event(&event) && app.is_on_converter() => {
            app.cancel_quit();
            info!(
                from = %app.from_currency().code,
                to = %app.to_currency().code,
                "User opened chart view"
            );
            app.show_chart();
            request_chart(app, command_tx);
        }

        // 'p' : bascule la période 7/30 jours (vue graphique)
        Event::Key(_) if is_period_event(&event) && app.is_on_chart() => {
            app.cancel_quit();
            app.toggle_chart_period();
            info!(period = app.chart_period, "User changed chart period");
            request_chart(app, command_tx);
        }

        // ESC : retour au convertisseur depuis la vue graphique
        Event::Key(_) if is_escape_event(&event) && app.is_on_chart() => {
            app.cancel_quit();
            debug!("User returned to converter");
            app.show_converter();
        }

        // ========================================
        // Input Mode : saisie du montant
        // ========================================
        Event::Key(_) if is_escape_event(&event) && app.is_in_input_mode() => {
            info!("User cancelled amount input");
            app.cancel_input();
        }

        Event::Key(_) if is_enter_event(&event) && app.is_in_input_mode() => {
            app.submit_input();
            info!(amount = app.amount, "User submitted amount");
        }

        Event::Key(_) if is_backspace_event(&event) && app.is_in_input_mode() => {
            app.backspace();
        }

        Event::Key(_) if is_amount_char_event(&event) && app.is_in_input_mode() => {
            if let Some(c) = get_char_from_event(&event) {
                app.append_char(c);
            }
        }

        Event::Tick => {
            // Tick régulier : rien à faire pour l'instant
        }

        Event::Key(_) => {
            // Toute autre touche : annule la confirmation si active
            app.cancel_quit();
        }

        _ => {
            // Autres événements : ignorés
        }
    }
}

// ============================================================================
// Setup et restauration du terminal
// ============================================================================
// CONCEPT RUST : Terminal raw mode
// - Raw mode : on reçoit tous les caractères directement
// - Alternate screen : écran secondaire (ne pollue pas l'historique)
//
// IMPORTANT : Toujours restaurer le terminal avant de quitter !
// ============================================================================

/// Configure le terminal en mode TUI
fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(|e| e.into())
}

/// Restaure le terminal à son état normal
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;

    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;

    terminal.show_cursor()?;

    Ok(())
}
