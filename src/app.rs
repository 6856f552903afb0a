// ============================================================================
// Structure : App
// ============================================================================
// Gère l'état global de l'application TUI
//
// PATTERN : "Application State"
// - Tous les composants de l'UI lisent depuis App (&App)
// - Toutes les modifications passent par les méthodes de App
// - Un seul propriétaire (la boucle principale) : pas de Mutex, pas de global
//
// Flux de données :
//   RefreshController → filter_coins → liste affichée
//   sélection → ChartLoader → graphique
// ============================================================================

use std::borrow::Cow;

use tracing::{debug, info, warn};

use crate::chart_loader::ChartLoader;
use crate::config::AppConfig;
use crate::filter::filter_coins;
use crate::models::{Coin, Lookback, ThemePreference};
use crate::refresh::RefreshController;
use crate::store::ThemeStore;
use crate::worker::{AppMessage, Dispatcher};

// ============================================================================
// Enum : Screen
// ============================================================================

/// Mode d'interaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// Navigation dans la liste
    Dashboard,

    /// Saisie de la recherche : les touches modifient la requête en direct
    Search,
}

/// État principal de l'application
pub struct App {
    /// Indique si l'application doit continuer à tourner
    pub running: bool,

    /// Écran actuellement actif
    pub current_screen: Screen,

    /// Liste de référence (rafraîchie toutes les 60s)
    pub refresh: RefreshController,

    /// Coin sélectionné et son graphique
    pub chart: ChartLoader,

    /// Requête de filtre (sous-chaîne, insensible à la casse)
    pub search_query: String,

    /// Position du curseur dans la liste filtrée
    pub cursor: usize,

    /// Thème actif
    pub theme: ThemePreference,

    /// Two-step quit : première pression de 'q' → confirm_quit = true
    pub confirm_quit: bool,

    coin_limit: u32,
    dispatcher: Dispatcher,
    theme_store: Option<ThemeStore>,
}

impl App {
    /// Crée l'application ; le thème est lu depuis le store s'il existe
    pub fn new(config: &AppConfig, dispatcher: Dispatcher, theme_store: Option<ThemeStore>) -> Self {
        let theme = theme_store
            .as_ref()
            .map(ThemeStore::load)
            .unwrap_or_default();
        info!(%theme, "Theme preference applied");

        Self {
            running: true,
            current_screen: Screen::Dashboard,
            refresh: RefreshController::new(),
            chart: ChartLoader::new(config.lookback_days),
            search_query: String::new(),
            cursor: 0,
            theme,
            confirm_quit: false,
            coin_limit: config.coin_limit,
            dispatcher,
            theme_store,
        }
    }

    /// Sender pour le RefreshTimer
    pub fn message_sender(&self) -> tokio::sync::mpsc::UnboundedSender<AppMessage> {
        self.dispatcher.sender()
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    // ========================================================================
    // Messages du worker
    // ========================================================================

    /// Traite un message venant du timer ou d'un fetch terminé
    pub fn handle_message(&mut self, message: AppMessage) {
        match message {
            AppMessage::RefreshTick => self.request_refresh(),
            AppMessage::CoinsLoaded { token, result } => {
                if self.refresh.apply(token, result) {
                    self.clamp_cursor();
                }
            }
            AppMessage::HistoryLoaded { token, result } => {
                self.chart.apply(token, result);
            }
        }
    }

    /// Lance un fetch de la liste (timer ou touche 'r')
    pub fn request_refresh(&mut self) {
        let token = self.refresh.begin_fetch();
        self.dispatcher.fetch_coins(token, self.coin_limit);
    }

    // ========================================================================
    // Liste filtrée et navigation
    // ========================================================================

    /// Sous-ensemble affiché : fonction pure de la liste et de la requête
    pub fn filtered_coins(&self) -> Cow<'_, [Coin]> {
        filter_coins(self.refresh.coins(), &self.search_query)
    }

    /// Coin sous le curseur
    pub fn coin_under_cursor(&self) -> Option<Coin> {
        self.filtered_coins().get(self.cursor).cloned()
    }

    pub fn navigate_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn navigate_down(&mut self) {
        let max_index = self.filtered_coins().len().saturating_sub(1);
        self.cursor = (self.cursor + 1).min(max_index);
    }

    /// Garde le curseur dans les bornes après un changement de liste
    fn clamp_cursor(&mut self) {
        let max_index = self.filtered_coins().len().saturating_sub(1);
        self.cursor = self.cursor.min(max_index);
    }

    // ========================================================================
    // Sélection et graphique
    // ========================================================================

    /// Sélectionne un coin et lance le fetch de son historique
    pub fn select_coin(&mut self, coin: Coin) {
        let request = self.chart.select(coin);
        self.dispatcher.fetch_history(request);
    }

    /// Sélectionne le coin sous le curseur
    pub fn select_under_cursor(&mut self) {
        match self.coin_under_cursor() {
            Some(coin) => self.select_coin(coin),
            None => debug!("Nothing under cursor to select"),
        }
    }

    /// Change la fenêtre d'historique (refetch si un coin est sélectionné)
    pub fn set_lookback(&mut self, days: u32) {
        if let Some(request) = self.chart.set_lookback(days) {
            self.dispatcher.fetch_history(request);
        }
    }

    /// Fenêtre courante sous forme d'enum (OneWeek si valeur hors liste)
    pub fn current_lookback(&self) -> Lookback {
        Lookback::from_days(self.chart.lookback_days()).unwrap_or_default()
    }

    pub fn next_lookback(&mut self) {
        self.set_lookback(self.current_lookback().next().days());
    }

    pub fn previous_lookback(&mut self) {
        self.set_lookback(self.current_lookback().previous().days());
    }

    // ========================================================================
    // Thème
    // ========================================================================

    /// Bascule clair / sombre et persiste immédiatement
    ///
    /// Un échec d'écriture est loggé mais ne bloque pas le changement.
    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
        info!(theme = %self.theme, "Theme toggled");

        if let Some(store) = &self.theme_store {
            if let Err(e) = store.save(self.theme) {
                warn!(error = ?e, "Failed to persist theme preference");
            }
        }
    }

    // ========================================================================
    // Recherche
    // ========================================================================

    /// Entre en mode recherche (la requête actuelle est conservée)
    pub fn start_search(&mut self) {
        self.current_screen = Screen::Search;
    }

    /// Valide la recherche : la requête reste appliquée
    pub fn submit_search(&mut self) {
        self.current_screen = Screen::Dashboard;
    }

    /// Annule la recherche : la requête est effacée
    pub fn cancel_search(&mut self) {
        self.current_screen = Screen::Dashboard;
        self.set_search_query(String::new());
    }

    pub fn append_char(&mut self, c: char) {
        let mut query = std::mem::take(&mut self.search_query);
        query.push(c);
        self.set_search_query(query);
    }

    pub fn backspace(&mut self) {
        let mut query = std::mem::take(&mut self.search_query);
        query.pop();
        self.set_search_query(query);
    }

    /// Remplace la requête ; le curseur revient en haut de la liste
    pub fn set_search_query(&mut self, query: String) {
        self.search_query = query;
        self.cursor = 0;
    }

    pub fn is_in_search_mode(&self) -> bool {
        self.current_screen == Screen::Search
    }

    // ========================================================================
    // Quit Confirmation Management
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
}

// ============================================================================
// Tests unitaires
// ============================================================================
// La logique asynchrone (fetchs réels via le Dispatcher) est testée dans
// tests/pipeline.rs ; ici on teste l'état seul.
// ============================================================================
