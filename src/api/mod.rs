// ============================================================================
// Module : api
// ============================================================================
// Adaptateur vers l'API de marché CoinGecko
// ============================================================================

pub mod coingecko; // Client CoinGecko + trait MarketDataSource
pub mod error;     // FetchError

// Re-export des éléments principaux
pub use coingecko::{CoinGeckoClient, MarketDataSource, DEFAULT_BASE_URL, DEFAULT_COIN_LIMIT};
pub use error::{FetchError, FetchResult};
