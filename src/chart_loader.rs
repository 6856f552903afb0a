// ============================================================================
// Sélection et chargement du graphique
// ============================================================================
// Suit le coin sélectionné et la fenêtre d'historique. Chaque changement
// (sélection ou fenêtre) produit une HistoryRequest que l'appelant envoie au
// worker ; la réponse revient dans apply().
//
// Différences avec le contrôleur de liste :
// - en cas d'échec, la série est effacée (pas de graphique périmé)
// - la couleur de la série est fixée par la variation 24h du coin sélectionné
//
// La sélection n'est jamais effacée : seule une nouvelle sélection la remplace.
// ============================================================================

use tracing::{debug, error, info};

use crate::api::FetchResult;
use crate::models::{ChartSeries, Coin, PriceHistory};
use crate::request::{RequestSequence, RequestToken};

/// Message affiché quand l'historique ne peut pas être chargé
pub const CHART_ERROR_MESSAGE: &str = "Failed to load chart data";

/// Requête d'historique à exécuter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRequest {
    pub token: RequestToken,
    pub coin_id: String,
    pub days: u32,
}

/// État du graphique
#[derive(Debug)]
pub struct ChartLoader {
    selected: Option<Coin>,
    lookback_days: u32,
    series: Option<ChartSeries>,
    is_loading: bool,
    error: Option<String>,
    sequence: RequestSequence,
}

impl ChartLoader {
    pub fn new(lookback_days: u32) -> Self {
        Self {
            selected: None,
            lookback_days,
            series: None,
            is_loading: false,
            error: None,
            sequence: RequestSequence::new(),
        }
    }

    /// Sélectionne un coin et prépare le fetch de son historique
    pub fn select(&mut self, coin: Coin) -> HistoryRequest {
        info!(coin = %coin.id, days = self.lookback_days, "Coin selected");
        let coin_id = coin.id.clone();
        self.selected = Some(coin);
        self.request_for(coin_id)
    }

    /// Change la fenêtre ; refetch uniquement si un coin est sélectionné
    pub fn set_lookback(&mut self, days: u32) -> Option<HistoryRequest> {
        info!(days, "Lookback window changed");
        self.lookback_days = days;
        self.begin()
    }

    fn begin(&mut self) -> Option<HistoryRequest> {
        let coin_id = self.selected.as_ref()?.id.clone();
        Some(self.request_for(coin_id))
    }

    fn request_for(&mut self, coin_id: String) -> HistoryRequest {
        self.is_loading = true;
        self.error = None;
        let token = self.sequence.issue();
        debug!(token = token.value(), coin = %coin_id, days = self.lookback_days, "History fetch started");

        HistoryRequest {
            token,
            coin_id,
            days: self.lookback_days,
        }
    }

    /// Applique la réponse d'un fetch d'historique
    ///
    /// Retourne false si la réponse est périmée (requête remplacée depuis).
    pub fn apply(&mut self, token: RequestToken, result: FetchResult<PriceHistory>) -> bool {
        if !self.sequence.is_latest(token) {
            debug!(token = token.value(), "Discarding stale history response");
            return false;
        }

        let Some(coin) = self.selected.as_ref() else {
            return false;
        };

        match result {
            Ok(history) => {
                let series = ChartSeries::from_history(coin, self.lookback_days, &history);
                info!(coin = %coin.id, points = series.values.len(), "Chart series ready");
                self.series = Some(series);
            }
            Err(e) => {
                error!(coin = %coin.id, error = %e, "Chart data error");
                self.series = None;
                self.error = Some(CHART_ERROR_MESSAGE.to_string());
            }
        }

        self.is_loading = false;
        true
    }

    pub fn selected(&self) -> Option<&Coin> {
        self.selected.as_ref()
    }

    pub fn lookback_days(&self) -> u32 {
        self.lookback_days
    }

    pub fn series(&self) -> Option<&ChartSeries> {
        self.series.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Série affichable : ni chargement ni erreur en cours
    pub fn visible_series(&self) -> Option<&ChartSeries> {
        if self.is_loading || self.error.is_some() {
            None
        } else {
            self.series.as_ref()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::FetchError;
    use crate::models::{PricePoint, Trend};

    fn history(prices: &[f64]) -> PriceHistory {
        PriceHistory {
            prices: prices
                .iter()
                .enumerate()
                .map(|(i, &p)| PricePoint(1_704_110_400_000.0 + i as f64 * 86_400_000.0, p))
                .collect(),
        }
    }

    fn bitcoin() -> Coin {
        Coin::new("bitcoin", "Bitcoin", "btc", 43000.0, 5.0, 8.4e11)
    }

    #[test]
    fn test_no_fetch_without_selection() {
        let mut loader = ChartLoader::new(7);
        assert!(loader.set_lookback(30).is_none());
        assert_eq!(loader.lookback_days(), 30);
        assert!(!loader.is_loading());
    }

    #[test]
    fn test_select_then_change_lookback() {
        let mut loader = ChartLoader::new(7);

        let req = loader.select(bitcoin());
        assert_eq!((req.coin_id.as_str(), req.days), ("bitcoin", 7));
        assert!(loader.is_loading());

        assert!(loader.apply(req.token, Ok(history(&[1.0, 2.0]))));
        assert_eq!(loader.visible_series().unwrap().values, vec![1.0, 2.0]);

        let req = loader.set_lookback(30).unwrap();
        assert_eq!((req.coin_id.as_str(), req.days), ("bitcoin", 30));
        assert!(loader.visible_series().is_none()); // masqué pendant le chargement

        loader.apply(req.token, Ok(history(&[3.0])));
        let series = loader.visible_series().unwrap();
        assert_eq!(series.lookback_days, 30);
        assert!(series.title.contains("30"));
        assert_eq!(series.trend, Trend::Positive);
    }

    #[test]
    fn test_error_clears_series() {
        let mut loader = ChartLoader::new(7);

        let req = loader.select(bitcoin());
        loader.apply(req.token, Ok(history(&[1.0])));

        let req = loader.set_lookback(90).unwrap();
        loader.apply(req.token, Err(FetchError::Upstream { status: 404 }));

        assert!(loader.series().is_none());
        assert_eq!(loader.error(), Some(CHART_ERROR_MESSAGE));
        assert!(!loader.is_loading());
        // La sélection reste
        assert_eq!(loader.selected().unwrap().id, "bitcoin");
    }

    #[test]
    fn test_superseded_response_is_ignored() {
        let mut loader = ChartLoader::new(7);

        let first = loader.select(bitcoin());
        let second = loader.set_lookback(30).unwrap();

        // La seconde requête répond d'abord, la première arrive ensuite
        assert!(loader.apply(second.token, Ok(history(&[30.0]))));
        assert!(!loader.apply(first.token, Ok(history(&[7.0]))));

        let series = loader.visible_series().unwrap();
        assert_eq!(series.lookback_days, 30);
        assert_eq!(series.values, vec![30.0]);
    }

    #[test]
    fn test_trend_fixed_by_selected_coin() {
        let mut loader = ChartLoader::new(7);
        let falling = Coin::new("eth", "Ethereum", "eth", 2300.0, -3.0, 2.8e11);

        let req = loader.select(falling);
        // Série montante, mais la couleur suit la variation 24h du coin
        loader.apply(req.token, Ok(history(&[1.0, 2.0, 3.0])));
        assert_eq!(loader.series().unwrap().trend, Trend::Negative);
    }
}
