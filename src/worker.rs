// ============================================================================
// Worker : exécution des fetchs en arrière-plan
// ============================================================================
// CONCEPT RUST : Command pattern avec channels
// - La boucle principale demande un fetch au Dispatcher
// - Chaque fetch est une tâche tokio indépendante (jamais bloquante pour l'UI)
// - Le résultat revient sous forme d'AppMessage, avec le jeton de la requête
//
// Les fetchs ne sont pas dédupliqués ni annulés : deux fetchs peuvent être en
// vol en même temps, le jeton décide lequel est appliqué.
// ============================================================================

use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};

use crate::api::{FetchResult, MarketDataSource};
use crate::chart_loader::HistoryRequest;
use crate::models::{Coin, PriceHistory};
use crate::request::RequestToken;

/// Messages reçus par la boucle principale
#[derive(Debug)]
pub enum AppMessage {
    /// Le timer demande un rafraîchissement de la liste
    RefreshTick,

    /// Réponse d'un fetch de la liste
    CoinsLoaded {
        token: RequestToken,
        result: FetchResult<Vec<Coin>>,
    },

    /// Réponse d'un fetch d'historique
    HistoryLoaded {
        token: RequestToken,
        result: FetchResult<PriceHistory>,
    },
}

/// Lance les fetchs et renvoie leurs résultats sur le canal de messages
#[derive(Clone)]
pub struct Dispatcher {
    source: Arc<dyn MarketDataSource>,
    tx: UnboundedSender<AppMessage>,
}

impl Dispatcher {
    /// Crée un dispatcher et le receiver associé
    pub fn channel(source: Arc<dyn MarketDataSource>) -> (Self, UnboundedReceiver<AppMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { source, tx }, rx)
    }

    /// Sender à donner au RefreshTimer
    pub fn sender(&self) -> UnboundedSender<AppMessage> {
        self.tx.clone()
    }

    /// Fetch du top `limit` en tâche de fond
    ///
    /// Doit être appelé depuis un runtime tokio.
    pub fn fetch_coins(&self, token: RequestToken, limit: u32) {
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();

        debug!(token = token.value(), limit, "Spawning coin list fetch");
        tokio::spawn(async move {
            let result = source.fetch_top_coins(limit).await;
            if tx.send(AppMessage::CoinsLoaded { token, result }).is_err() {
                warn!("Coin list result dropped: receiver closed");
            }
        });
    }

    /// Fetch d'historique en tâche de fond
    pub fn fetch_history(&self, request: HistoryRequest) {
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();

        debug!(token = request.token.value(), coin = %request.coin_id, days = request.days, "Spawning history fetch");
        tokio::spawn(async move {
            let HistoryRequest { token, coin_id, days } = request;
            let result = source.fetch_price_history(&coin_id, days).await;
            if tx.send(AppMessage::HistoryLoaded { token, result }).is_err() {
                warn!("History result dropped: receiver closed");
            }
        });
    }
}
