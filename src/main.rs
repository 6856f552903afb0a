// ============================================================================
// CryptoTracker - Dashboard des cryptomonnaies dans le terminal
// ============================================================================
// Liste des principales cryptos (rafraîchie toutes les 60s), filtre par
// nom / symbole, graphique de l'historique du coin sélectionné
//
// CONCEPTS RUST CLÉS :
// 1. Terminal raw mode : contrôle total du terminal
// 2. Event loop async : tokio::select! sur le clavier et les fetchs
// 3. Un seul propriétaire de l'état : les tâches renvoient des messages
// 4. RAII : le timer s'arrête quand il est droppé
// ============================================================================

use std::io;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::{debug, error, info};

use cryptotracker::api::CoinGeckoClient;
use cryptotracker::app::App;
use cryptotracker::config::AppConfig;
use cryptotracker::refresh::RefreshTimer;
use cryptotracker::store::ThemeStore;
use cryptotracker::ui::events::{
    get_char_from_event, is_backspace_event, is_down_event, is_enter_event, is_escape_event,
    is_interrupt_event, is_next_lookback_event, is_previous_lookback_event, is_quit_event,
    is_refresh_event, is_search_event, is_theme_event, is_up_event, lookback_shortcut, Event,
};
use cryptotracker::ui::{render, EventHandler};
use cryptotracker::worker::{AppMessage, Dispatcher};

type Tui = Terminal<CrosstermBackend<io::Stdout>>;

// ============================================================================
// Initialisation du logging
// ============================================================================
// CONCEPT : Logging dans une app TUI
// - Les println! ne fonctionnent pas une fois le TUI lancé
// - On log vers un fichier à la place, avec rotation quotidienne
// ============================================================================

/// Initialise le système de logging vers fichier
///
/// # Utilisation
/// ```bash
/// tail -f logs/cryptotracker.log.*
/// RUST_LOG=cryptotracker=trace cargo run
/// ```
fn init_logging(log_dir: &Path) -> Result<()> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    std::fs::create_dir_all(log_dir).context("Échec de la création du répertoire de logs")?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, "cryptotracker.log");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true) // utile : tâches tokio + thread clavier
                .with_line_number(true),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cryptotracker=debug,info".into()),
        )
        .init();

    info!(?log_dir, "Logging initialisé");
    Ok(())
}

// ============================================================================
// Point d'entrée du programme
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    // .env optionnel : absent en production, pratique en dev
    dotenv::dotenv().ok();

    let config = AppConfig::from_env();

    init_logging(&config.log_dir).unwrap_or_else(|e| {
        eprintln!("⚠️  Warning: Failed to initialize logging: {}", e);
        eprintln!("   Continuing without logging...");
    });

    info!(?config, "CryptoTracker starting up");

    let client = CoinGeckoClient::new(&config.api_base_url).context("Échec de la création du client HTTP")?;
    let (dispatcher, message_rx) = Dispatcher::channel(Arc::new(client));

    let theme_store = ThemeStore::default_location();
    if theme_store.is_none() {
        info!("No config directory on this platform, theme preference will not persist");
    }

    let mut app = App::new(&config, dispatcher, theme_store);

    debug!("Setting up terminal");
    let mut terminal = setup_terminal()?;

    info!("Starting event loop");
    let result = run(&mut terminal, &mut app, &config, message_rx).await;

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
// Event Loop Principal
// ============================================================================
// À chaque itération :
//   1. Dessiner l'interface (render)
//   2. Attendre un événement clavier OU un message (timer, fetch terminé)
//   3. Mettre à jour l'état (update)
//
// Le thread clavier envoie un Event::Tick toutes les 250ms : l'écran est
// redessiné même sans activité.
// ============================================================================

async fn run(
    terminal: &mut Tui,
    app: &mut App,
    config: &AppConfig,
    mut message_rx: UnboundedReceiver<AppMessage>,
) -> Result<()> {
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    EventHandler::new().spawn_forwarder(event_tx);

    // CONCEPT RUST : RAII
    // - Le timer vit jusqu'à la fin de run()
    // - Drop arrête la tâche sur tous les chemins de sortie (y compris `?`)
    let _timer = RefreshTimer::start(config.refresh_interval, app.message_sender());

    while app.is_running() {
        terminal.draw(|frame| render(frame, app))?;

        tokio::select! {
            maybe_event = event_rx.recv() => match maybe_event {
                Some(event) => handle_event(app, event),
                None => anyhow::bail!("Le thread de lecture clavier s'est arrêté"),
            },
            Some(message) = message_rx.recv() => app.handle_message(message),
        }
    }

    Ok(())
}

// ============================================================================
// Gestion des événements
// ============================================================================

/// Traite un événement et met à jour l'état de l'application
///
/// CONCEPT RUST : Pattern matching avec guards
/// - En mode recherche, toutes les touches éditent la requête
/// - Sinon, chaque touche est une commande
fn handle_event(app: &mut App, event: Event) {
    if matches!(event, Event::Tick) {
        return;
    }

    if is_interrupt_event(&event) {
        info!("User interrupted with Ctrl+C");
        app.quit();
        return;
    }

    if app.is_in_search_mode() {
        handle_search_event(app, &event);
        return;
    }

    match event {
        Event::Key(_) if is_quit_event(&event) => {
            // Two-step : première pression demande confirmation
            if app.is_awaiting_quit_confirmation() {
                info!("User confirmed quit");
                app.quit();
            } else {
                info!("User requested quit (awaiting confirmation)");
                app.request_quit();
            }
            return;
        }
        _ => app.cancel_quit(),
    }

    if is_search_event(&event) {
        debug!("User opened search");
        app.start_search();
    } else if is_up_event(&event) {
        app.navigate_up();
    } else if is_down_event(&event) {
        app.navigate_down();
    } else if is_enter_event(&event) {
        app.select_under_cursor();
    } else if let Some(lookback) = lookback_shortcut(&event) {
        info!(days = lookback.days(), "User changed lookback");
        app.set_lookback(lookback.days());
    } else if is_next_lookback_event(&event) {
        app.next_lookback();
    } else if is_previous_lookback_event(&event) {
        app.previous_lookback();
    } else if is_theme_event(&event) {
        app.toggle_theme();
    } else if is_refresh_event(&event) {
        info!("User requested manual refresh");
        app.request_refresh();
    }
}

/// Mode recherche : Enter garde le filtre, Esc l'efface
fn handle_search_event(app: &mut App, event: &Event) {
    if is_escape_event(event) {
        debug!("User cleared search");
        app.cancel_search();
    } else if is_enter_event(event) {
        info!(query = %app.search_query, "User applied search filter");
        app.submit_search();
    } else if is_backspace_event(event) {
        app.backspace();
    } else if let Some(c) = get_char_from_event(event) {
        app.append_char(c);
    }
}

// ============================================================================
// Setup et restauration du terminal
// ============================================================================
// IMPORTANT : Toujours restaurer le terminal avant de quitter !
// ============================================================================

/// Configure le terminal en mode TUI
fn setup_terminal() -> Result<Tui> {
    enable_raw_mode().context("Échec de l'activation du raw mode")?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).context("Échec de la création du terminal")
}

/// Restaure le terminal à son état normal
fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;
    Ok(())
}
