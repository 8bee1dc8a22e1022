// ============================================================================
// CryptoHouse - Dashboard TUI
// ============================================================================
// Binaire dashboard : affiche les prix, la citation du moment et le
// portefeuille, avec un champ de particules décoratif. Les données viennent
// du backend CryptoHouse (variable CRYPTOHOUSE_API_URL, défaut localhost).
//
// ARCHITECTURE :
// 1. Event loop synchrone (TUI) + worker thread avec runtime tokio
// 2. Communication par channels mpsc (commandes / résultats)
// 3. Polls "fire-and-forget" : chaque commande part dans sa propre tâche,
//    deux polls peuvent se chevaucher, la dernière réponse arrivée gagne
// ============================================================================

use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{debug, error, info};

use cryptohouse::api::BackendClient;
use cryptohouse::app::App;
use cryptohouse::models::{Portfolio, PriceSnapshot};
use cryptohouse::ui::{events::EventHandler, render};

/// Intervalle du poll de prix
const PRICE_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Intervalle du poll de citation (15 s)
const QUOTE_POLL_INTERVAL: Duration = Duration::from_secs(15);

/// Cadence de tick de l'UI (animation des particules)
const TICK_RATE: Duration = Duration::from_millis(100);

// ============================================================================
// Commandes et résultats du worker
// ============================================================================

/// Commandes envoyées au worker thread
#[derive(Debug, Clone)]
enum AppCommand {
    /// Poll des prix (périodique ou manuel)
    FetchPrices,

    /// Poll d'une nouvelle citation
    FetchQuote,

    /// Chargement du portefeuille persisté
    LoadPortfolio,

    /// Sauvegarde du document entier
    SavePortfolio(Portfolio),

    /// Remise à zéro du document persisté
    ResetPortfolio,
}

/// Résultats renvoyés par le worker thread
#[derive(Debug)]
enum AppResult {
    PricesLoaded(PriceSnapshot),
    QuoteLoaded(String),
    PortfolioLoaded(Portfolio),
    PortfolioSaved,
    PortfolioReset,

    /// Échec d'un poll : loggé, l'affichage précédent reste en place
    PollFailed { what: &'static str, error: String },

    /// Échec d'une sauvegarde ou d'un reset : réactive la touche save
    SaveFailed { error: String },
}

// ============================================================================
// Initialisation du logging
// ============================================================================
// Les println! ne fonctionnent pas une fois le TUI lancé : on log vers un
// fichier avec rotation quotidienne, sous le répertoire de données de la
// plateforme (~/.local/share/cryptohouse/logs sur Linux).
// ============================================================================

fn init_logging() -> Result<()> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let log_dir = dirs::data_local_dir()
        .map(|d| d.join("cryptohouse").join("logs"))
        .unwrap_or_else(|| std::path::PathBuf::from("./logs"));

    std::fs::create_dir_all(&log_dir).context("Échec de la création du répertoire de logs")?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir.clone(), "cryptohouse.log");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cryptohouse=debug,info".into()),
        )
        .init();

    info!(?log_dir, "Logging initialisé");
    Ok(())
}

// ============================================================================
// Point d'entrée
// ============================================================================

fn main() -> Result<()> {
    init_logging().unwrap_or_else(|e| {
        eprintln!("⚠️  Warning: Failed to initialize logging: {}", e);
    });

    info!("CryptoHouse dashboard starting up");

    let api_url = std::env::var("CRYPTOHOUSE_API_URL")
        .unwrap_or_else(|_| "http://127.0.0.1:3000".to_string());
    let client = BackendClient::new(api_url)?;

    let mut terminal = setup_terminal()?;

    let mut app = App::new();

    // Channels de communication avec le worker
    let (command_tx, command_rx) = mpsc::channel::<AppCommand>();
    let (result_tx, result_rx) = mpsc::channel::<AppResult>();

    info!("Spawning background worker thread");
    spawn_background_worker(command_rx, result_tx, client);

    let events = EventHandler::new(TICK_RATE);

    info!("Starting event loop");
    let result = run(&mut terminal, &mut app, &events, command_tx, result_rx);

    restore_terminal(&mut terminal)?;

    match &result {
        Ok(_) => info!("Dashboard exited normally"),
        Err(e) => error!(error = ?e, "Dashboard exited with error"),
    }

    result
}

// ============================================================================
// Background Worker Thread
// ============================================================================
// Thread séparé avec son propre runtime tokio. Chaque commande part dans
// une tâche spawnée : un poll lent ne bloque pas le suivant, et l'ordre
// d'arrivée des résultats n'est pas garanti (la dernière réponse gagne).
// ============================================================================

fn spawn_background_worker(
    command_rx: mpsc::Receiver<AppCommand>,
    result_tx: mpsc::Sender<AppResult>,
    client: BackendClient,
) {
    std::thread::spawn(move || {
        let runtime = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");

        loop {
            match command_rx.recv() {
                Ok(command) => {
                    debug!(?command, "Worker received command");
                    let client = client.clone();
                    let result_tx = result_tx.clone();

                    // Fire-and-forget : pas d'attente, pas d'annulation
                    runtime.spawn(async move {
                        let result = execute_command(&client, command).await;
                        let _ = result_tx.send(result);
                    });
                }
                Err(_) => {
                    info!("Worker thread exiting (channel closed)");
                    break;
                }
            }
        }
    });
}

/// Exécute une commande contre le backend et produit le résultat
async fn execute_command(client: &BackendClient, command: AppCommand) -> AppResult {
    match command {
        AppCommand::FetchPrices => match client.fetch_prices().await {
            Ok(snapshot) => AppResult::PricesLoaded(snapshot),
            Err(e) => AppResult::PollFailed {
                what: "prices",
                error: e.to_string(),
            },
        },
        AppCommand::FetchQuote => match client.fetch_quote().await {
            Ok(quote) => AppResult::QuoteLoaded(quote),
            Err(e) => AppResult::PollFailed {
                what: "quote",
                error: e.to_string(),
            },
        },
        AppCommand::LoadPortfolio => match client.fetch_portfolio().await {
            Ok(portfolio) => AppResult::PortfolioLoaded(portfolio),
            Err(e) => AppResult::PollFailed {
                what: "portfolio",
                error: e.to_string(),
            },
        },
        AppCommand::SavePortfolio(portfolio) => match client.save_portfolio(&portfolio).await {
            Ok(()) => AppResult::PortfolioSaved,
            Err(e) => AppResult::SaveFailed {
                error: e.to_string(),
            },
        },
        AppCommand::ResetPortfolio => match client.reset_portfolio().await {
            Ok(()) => AppResult::PortfolioReset,
            Err(e) => AppResult::SaveFailed {
                error: e.to_string(),
            },
        },
    }
}

// ============================================================================
// Event Loop Principal
// ============================================================================
// À chaque itération : résultats du worker, échéances de poll, rendu,
// input, tick (animation).
// ============================================================================

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
    command_tx: mpsc::Sender<AppCommand>,
    result_rx: mpsc::Receiver<AppResult>,
) -> Result<()> {
    // Premier chargement : portefeuille persisté, puis les échéances
    // déclenchent immédiatement prix et citation
    let _ = command_tx.send(AppCommand::LoadPortfolio);
    let mut next_price_poll = Instant::now();
    let mut next_quote_poll = Instant::now();

    loop {
        if !app.is_running() {
            break;
        }

        // ========================================
        // 0. RÉSULTATS : draine tout ce que le worker a produit
        // ========================================
        while let Ok(result) = result_rx.try_recv() {
            apply_result(app, result);
        }

        // ========================================
        // 1. POLLS : échéances indépendantes, fire-and-forget
        // ========================================
        // Si un poll est encore en vol quand l'échéance tombe, le suivant
        // part quand même : pas de file, pas d'annulation.
        let now = Instant::now();
        if now >= next_price_poll {
            let _ = command_tx.send(AppCommand::FetchPrices);
            next_price_poll = now + PRICE_POLL_INTERVAL;
        }
        if now >= next_quote_poll {
            let _ = command_tx.send(AppCommand::FetchQuote);
            next_quote_poll = now + QUOTE_POLL_INTERVAL;
        }

        // ========================================
        // 2. RENDER
        // ========================================
        terminal.draw(|frame| render(frame, app))?;

        // ========================================
        // 3. INPUT
        // ========================================
        if let Ok(event) = events.next() {
            handle_event(app, event, &command_tx, &mut next_price_poll, &mut next_quote_poll);
        }

        // ========================================
        // 4. UPDATE : animation des particules
        // ========================================
        app.tick();
    }

    Ok(())
}

/// Applique un résultat du worker à l'état de l'application
fn apply_result(app: &mut App, result: AppResult) {
    match result {
        AppResult::PricesLoaded(snapshot) => {
            debug!(coins = snapshot.len(), "Prices updated");
            app.apply_prices(snapshot);
            app.clear_status();
        }
        AppResult::QuoteLoaded(quote) => {
            app.apply_quote(quote);
        }
        AppResult::PortfolioLoaded(portfolio) => {
            info!("Portfolio loaded from backend");
            app.apply_portfolio(portfolio);
        }
        AppResult::PortfolioSaved => {
            info!("Portfolio saved");
            app.finish_save();
            app.set_status("Portfolio saved ✓");
        }
        AppResult::PortfolioReset => {
            info!("Portfolio reset");
            app.apply_portfolio(Portfolio::new());
            app.set_status("Portfolio reset");
        }
        AppResult::PollFailed { what, error } => {
            // Échec de poll : on log, l'affichage précédent reste en place
            // et le timer continue
            error!(what, error = %error, "Poll failed");
        }
        AppResult::SaveFailed { error } => {
            error!(error = %error, "Portfolio save failed");
            app.finish_save();
            app.set_status("Save failed, see logs");
        }
    }
}

// ============================================================================
// Gestion des événements clavier
// ============================================================================

fn handle_event(
    app: &mut App,
    event: cryptohouse::ui::events::Event,
    command_tx: &mpsc::Sender<AppCommand>,
    next_price_poll: &mut Instant,
    next_quote_poll: &mut Instant,
) {
    use cryptohouse::ui::events::{
        get_char_from_event, is_backspace_event, is_down_event, is_enter_event, is_escape_event,
        is_portfolio_event, is_quantity_char_event, is_quit_event, is_refresh_event,
        is_reset_event, is_save_event, is_up_event, Event,
    };

    match event {
        // 'q' : quit en deux temps (pas en mode saisie)
        Event::Key(_) if is_quit_event(&event) && !app.is_in_input_mode() => {
            if app.is_awaiting_quit_confirmation() {
                info!("User confirmed quit");
                app.quit();
            } else {
                app.request_quit();
            }
        }

        // 'p' : ouvre/ferme l'overlay portefeuille
        Event::Key(_) if is_portfolio_event(&event) && !app.is_in_input_mode() => {
            app.cancel_quit();
            if app.is_on_portfolio() {
                app.show_dashboard();
            } else {
                info!("User opened portfolio overlay");
                app.show_portfolio();
                let _ = command_tx.send(AppCommand::LoadPortfolio);
            }
        }

        // 'r' : rafraîchissement manuel, prix + citation tout de suite
        Event::Key(_) if is_refresh_event(&event) && !app.is_in_input_mode() => {
            app.cancel_quit();
            info!("Manual refresh requested");
            let _ = command_tx.send(AppCommand::FetchPrices);
            let _ = command_tx.send(AppCommand::FetchQuote);
            *next_price_poll = Instant::now() + PRICE_POLL_INTERVAL;
            *next_quote_poll = Instant::now() + QUOTE_POLL_INTERVAL;
        }

        // Navigation dans l'overlay portefeuille
        Event::Key(_) if is_up_event(&event) && app.is_on_portfolio() => {
            app.cancel_quit();
            app.navigate_up();
        }
        Event::Key(_) if is_down_event(&event) && app.is_on_portfolio() => {
            app.cancel_quit();
            app.navigate_down();
        }

        // Enter sur l'overlay : édite la quantité du coin sélectionné
        Event::Key(_) if is_enter_event(&event) && app.is_on_portfolio() => {
            app.cancel_quit();
            app.start_quantity_input();
        }

        // 's' : sauvegarde (désactivée tant que la précédente est en vol)
        Event::Key(_) if is_save_event(&event) && app.is_on_portfolio() => {
            app.cancel_quit();
            if app.can_save() {
                info!("User requested portfolio save");
                app.begin_save();
                let _ = command_tx.send(AppCommand::SavePortfolio(app.portfolio.clone()));
            } else {
                debug!("Save already in flight, ignoring");
            }
        }

        // 'x' : reset du portefeuille (document vide)
        Event::Key(_) if is_reset_event(&event) && app.is_on_portfolio() => {
            app.cancel_quit();
            info!("User requested portfolio reset");
            app.apply_portfolio(Portfolio::new());
            let _ = command_tx.send(AppCommand::ResetPortfolio);
        }

        // ESC : ferme l'overlay ou annule la saisie
        Event::Key(_) if is_escape_event(&event) && app.is_on_portfolio() => {
            app.cancel_quit();
            app.show_dashboard();
        }
        Event::Key(_) if is_escape_event(&event) && app.is_in_input_mode() => {
            app.cancel_input();
        }

        // Mode saisie : validation, effacement, caractères
        Event::Key(_) if is_enter_event(&event) && app.is_in_input_mode() => {
            app.submit_quantity_input();
        }
        Event::Key(_) if is_backspace_event(&event) && app.is_in_input_mode() => {
            app.backspace();
        }
        Event::Key(_) if is_quantity_char_event(&event) && app.is_in_input_mode() => {
            if let Some(c) = get_char_from_event(&event) {
                app.append_char(c);
            }
        }

        Event::Tick => {}

        // Toute autre touche annule la confirmation de quit
        Event::Key(_) => {
            app.cancel_quit();
        }
    }
}

// ============================================================================
// Setup et restauration du terminal
// ============================================================================

fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(|e| e.into())
}

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
