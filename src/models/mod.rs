// ============================================================================
// Module : models
// ============================================================================
// Ce module contient toutes les structures de données de l'application
// ============================================================================

pub mod coin;          // Coin et formatage des nombres
pub mod lookback;      // Fenêtre d'historique (1/7/30/90 jours)
pub mod price_history; // Historique brut et série du graphique
pub mod theme;         // Préférence clair / sombre

// Re-export des structures principales pour simplifier les imports
// On peut faire : use cryptotracker::models::Coin;
pub use coin::{format_market_cap, format_percentage, format_price, Coin, CoinSummary};
pub use lookback::Lookback;
pub use price_history::{ChartSeries, PriceHistory, PricePoint, Trend};
pub use theme::ThemePreference;
