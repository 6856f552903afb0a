// ============================================================================
// Historique de prix et série du graphique
// ============================================================================
// PriceHistory : la réponse brute de /coins/{id}/market_chart
// ChartSeries : la même donnée transformée pour le widget Chart
//
// CONCEPTS RUST :
// 1. Tuple struct + Deserialize : [timestamp_ms, price] → PricePoint
// 2. Generic sur TimeZone : la conversion timestamp → date dépend du fuseau
//    local en production, de Utc dans les tests
// 3. Iterator chaining : une seule passe pour labels + valeurs
// ============================================================================

use chrono::{DateTime, Local, TimeZone, Utc};
use serde::Deserialize;

use crate::models::Coin;

/// Un point de l'historique : (timestamp en millisecondes, prix)
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PricePoint(pub f64, pub f64);

impl PricePoint {
    /// Timestamp en millisecondes depuis l'epoch
    pub fn timestamp_ms(&self) -> i64 {
        self.0 as i64
    }

    pub fn price(&self) -> f64 {
        self.1
    }

    /// Date UTC du point (None si le timestamp est hors limites)
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp_ms())
    }
}

/// Réponse de l'endpoint market_chart
///
/// Les points arrivent triés par date croissante ; on ne les retrie pas.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PriceHistory {
    #[serde(default)]
    pub prices: Vec<PricePoint>,
}

impl PriceHistory {
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

/// Style de la série, fixé par le signe de la variation 24h du coin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Positive,
    Negative,
}

impl Trend {
    /// Trend d'un coin au moment de la sélection
    pub fn of(coin: &Coin) -> Self {
        if coin.is_positive() {
            Trend::Positive
        } else {
            Trend::Negative
        }
    }
}

/// Série prête à être affichée
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    /// Titre du graphique ("Bitcoin Price Chart (7 days)")
    pub title: String,

    /// Nom de la série ("Bitcoin Price (USD)")
    pub label: String,

    /// Labels de l'axe X : une date par point
    pub labels: Vec<String>,

    /// Valeurs de l'axe Y : prix bruts
    pub values: Vec<f64>,

    /// Couleur de la série
    pub trend: Trend,

    /// Fenêtre demandée
    pub lookback_days: u32,
}

impl ChartSeries {
    /// Construit la série en datant les points dans le fuseau local
    pub fn from_history(coin: &Coin, lookback_days: u32, history: &PriceHistory) -> Self {
        Self::from_history_in(coin, lookback_days, history, &Local)
    }

    /// Même chose avec un fuseau explicite
    pub fn from_history_in<Tz: TimeZone>(
        coin: &Coin,
        lookback_days: u32,
        history: &PriceHistory,
        tz: &Tz,
    ) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        let (labels, values) = history
            .prices
            .iter()
            .map(|point| (date_label(point, tz), point.price()))
            .unzip();

        Self {
            title: format!("{} Price Chart ({} days)", coin.name, lookback_days),
            label: format!("{} Price (USD)", coin.name),
            labels,
            values,
            trend: Trend::of(coin),
            lookback_days,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Points (index, prix) pour le widget Chart de ratatui
    pub fn points(&self) -> Vec<(f64, f64)> {
        self.values
            .iter()
            .enumerate()
            .map(|(i, &v)| (i as f64, v))
            .collect()
    }

    /// Bornes de l'axe Y avec une marge de 5% (jamais sous 0)
    pub fn bounds(&self) -> Option<(f64, f64)> {
        if self.values.is_empty() {
            return None;
        }

        let (min, max) = self
            .values
            .iter()
            .fold((f64::MAX, f64::MIN), |(min, max), &v| (min.min(v), max.max(v)));

        let margin = (max - min) * 0.05;
        Some(((min - margin).max(0.0), max + margin))
    }
}

/// Date calendaire d'un point au format US (M/D/YYYY)
fn date_label<Tz: TimeZone>(point: &PricePoint, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    match point.datetime() {
        Some(dt) => dt.with_timezone(tz).format("%-m/%-d/%Y").to_string(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_history() -> PriceHistory {
        serde_json::from_str(
            r#"{"prices": [[1704110400000, 42000.5], [1704196800000, 43100.25], [1704283200000, 41950.0]]}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_parse_history() {
        let history = sample_history();
        assert_eq!(history.len(), 3);
        assert_eq!(history.prices[0].timestamp_ms(), 1_704_110_400_000);
        assert_eq!(history.prices[1].price(), 43100.25);
    }

    #[test]
    fn test_series_from_history() {
        let coin = Coin::new("bitcoin", "Bitcoin", "btc", 42000.0, -1.5, 8.0e11);
        let series = ChartSeries::from_history_in(&coin, 7, &sample_history(), &Utc);

        assert_eq!(series.label, "Bitcoin Price (USD)");
        assert_eq!(series.title, "Bitcoin Price Chart (7 days)");
        // 2024-01-01 12:00 UTC, 2024-01-02, 2024-01-03
        assert_eq!(series.labels, vec!["1/1/2024", "1/2/2024", "1/3/2024"]);
        assert_eq!(series.values, vec![42000.5, 43100.25, 41950.0]);
        assert_eq!(series.trend, Trend::Negative);
    }

    #[test]
    fn test_trend_zero_is_positive() {
        let coin = Coin::new("tether", "Tether", "usdt", 1.0, 0.0, 1.0e11);
        assert_eq!(Trend::of(&coin), Trend::Positive);
    }

    #[test]
    fn test_bounds() {
        let coin = Coin::new("bitcoin", "Bitcoin", "btc", 0.0, 1.0, 0.0);
        let series = ChartSeries::from_history_in(&coin, 1, &sample_history(), &Utc);
        let (lo, hi) = series.bounds().unwrap();
        assert!(lo < 41950.0);
        assert!(hi > 43100.25);

        let empty = ChartSeries::from_history_in(&coin, 1, &PriceHistory::default(), &Utc);
        assert!(empty.bounds().is_none());
        assert!(empty.is_empty());
    }

    #[test]
    fn test_labels_follow_time_zone() {
        let coin = Coin::new("bitcoin", "Bitcoin", "btc", 42000.0, 1.0, 8.0e11);

        // UTC-13 : 2024-01-01 12:00 UTC tombe encore le 31 décembre
        let tz = chrono::FixedOffset::west_opt(13 * 3600).unwrap();
        let series = ChartSeries::from_history_in(&coin, 7, &sample_history(), &tz);
        assert_eq!(series.labels, vec!["12/31/2023", "1/1/2024", "1/2/2024"]);

        let local = ChartSeries::from_history(&coin, 7, &sample_history());
        assert_eq!(local.labels.len(), 3);
    }
}
