// ============================================================================
// Contrôleur de rafraîchissement
// ============================================================================
// Possède la liste de coins de référence et les indicateurs de chargement
//
// Cycle d'un fetch :
// 1. begin_fetch() : is_loading = true, erreur effacée, nouveau jeton
// 2. la réponse revient (tâche tokio) avec son jeton
// 3. apply() : succès → la liste est remplacée entièrement
//              échec → message fixe, l'ancienne liste reste affichée
//              plus ancienne que la dernière appliquée → ignorée
//
// RefreshTimer : tâche tokio qui déclenche un fetch toutes les 60 secondes.
// Elle est arrêtée explicitement (stop) ou quand le timer est droppé.
// ============================================================================

use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

use crate::api::FetchResult;
use crate::models::Coin;
use crate::request::{RequestSequence, RequestToken};
use crate::worker::AppMessage;

/// Message affiché quand le chargement de la liste échoue
pub const FETCH_ERROR_MESSAGE: &str =
    "Failed to fetch cryptocurrency data. Please try again later.";

/// Intervalle de rafraîchissement par défaut
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

/// État de la liste de coins
#[derive(Debug)]
pub struct RefreshController {
    coins: Vec<Coin>,
    is_loading: bool,
    last_error: Option<String>,
    sequence: RequestSequence,
}

impl RefreshController {
    /// État initial : liste vide, chargement en cours, pas d'erreur
    pub fn new() -> Self {
        Self {
            coins: Vec::new(),
            is_loading: true,
            last_error: None,
            sequence: RequestSequence::new(),
        }
    }

    /// Prépare un nouveau fetch et retourne son jeton
    ///
    /// Un fetch déjà en vol n'est pas annulé : sa réponse sera simplement
    /// ignorée à l'arrivée.
    pub fn begin_fetch(&mut self) -> RequestToken {
        self.is_loading = true;
        self.last_error = None;
        let token = self.sequence.issue();
        debug!(token = token.value(), "Coin list fetch started");
        token
    }

    /// Applique la réponse d'un fetch
    ///
    /// Une réponse plus ancienne que la dernière appliquée est ignorée
    /// (retourne false). Une réponse plus récente est appliquée même si un
    /// fetch encore plus récent est en vol : is_loading reste alors vrai.
    pub fn apply(&mut self, token: RequestToken, result: FetchResult<Vec<Coin>>) -> bool {
        if !self.sequence.try_apply(token) {
            debug!(token = token.value(), "Discarding stale coin list response");
            return false;
        }

        match result {
            Ok(coins) => {
                info!(coins = coins.len(), "Coin list replaced");
                self.coins = coins;
            }
            Err(e) => {
                // La liste précédente reste disponible
                error!(error = %e, upstream = e.is_upstream(), "Error fetching coins");
                self.last_error = Some(FETCH_ERROR_MESSAGE.to_string());
            }
        }

        self.is_loading = !self.sequence.is_latest(token);
        true
    }

    pub fn coins(&self) -> &[Coin] {
        &self.coins
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

impl Default for RefreshController {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// RefreshTimer : tâche planifiée annulable
// ============================================================================
// CONCEPT RUST : RAII
// - Le JoinHandle de la tâche est gardé dans la structure
// - Drop appelle stop() : la tâche ne peut pas survivre à son propriétaire,
//   même si la boucle principale sort par une erreur
// ============================================================================

/// Déclenche `AppMessage::RefreshTick` à intervalle régulier
#[derive(Debug)]
pub struct RefreshTimer {
    handle: Option<JoinHandle<()>>,
}

impl RefreshTimer {
    /// Démarre le timer : un premier tick immédiat, puis un tick par période
    ///
    /// Doit être appelé depuis un runtime tokio.
    pub fn start(period: Duration, tx: UnboundedSender<AppMessage>) -> Self {
        info!(period_secs = period.as_secs(), "Starting refresh timer");

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                // Le premier tick d'un interval tokio se termine immédiatement
                ticker.tick().await;
                if tx.send(AppMessage::RefreshTick).is_err() {
                    debug!("Refresh timer receiver dropped, exiting");
                    break;
                }
            }
        });

        Self {
            handle: Some(handle),
        }
    }

    /// Arrête le timer (idempotent)
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            info!("Refresh timer stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for RefreshTimer {
    fn drop(&mut self) {
        self.stop();
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
