// ============================================================================
// Configuration
// ============================================================================
// Lue depuis les variables d'environnement (un fichier .env est chargé au
// démarrage s'il existe). Chaque valeur absente ou invalide retombe sur sa
// valeur par défaut avec un warning dans les logs.
// ============================================================================

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use crate::api::{DEFAULT_BASE_URL, DEFAULT_COIN_LIMIT};
use crate::models::Lookback;
use crate::refresh::DEFAULT_REFRESH_INTERVAL;

pub const ENV_API_URL: &str = "CRYPTOTRACKER_API_URL";
pub const ENV_COIN_LIMIT: &str = "CRYPTOTRACKER_COIN_LIMIT";
pub const ENV_REFRESH_SECS: &str = "CRYPTOTRACKER_REFRESH_SECS";
pub const ENV_LOOKBACK_DAYS: &str = "CRYPTOTRACKER_LOOKBACK_DAYS";
pub const ENV_LOG_DIR: &str = "CRYPTOTRACKER_LOG_DIR";

/// Configuration de l'application
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// URL de base de l'API (sans slash final)
    pub api_base_url: String,

    /// Nombre de coins affichés
    pub coin_limit: u32,

    /// Période du rafraîchissement automatique
    pub refresh_interval: Duration,

    /// Fenêtre d'historique initiale
    pub lookback_days: u32,

    /// Répertoire des fichiers de log
    pub log_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_BASE_URL.to_string(),
            coin_limit: DEFAULT_COIN_LIMIT,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            lookback_days: Lookback::default().days(),
            log_dir: PathBuf::from("./logs"),
        }
    }
}

impl AppConfig {
    /// Charge la configuration depuis l'environnement du process
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Charge la configuration depuis une fonction de lookup
    ///
    /// CONCEPT RUST : Closure générique (impl Fn)
    /// - Production : std::env::var
    /// - Tests : une HashMap, sans toucher à l'environnement global
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let api_base_url = lookup(ENV_API_URL)
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or(defaults.api_base_url);

        let coin_limit = parse_positive(&lookup, ENV_COIN_LIMIT).unwrap_or(defaults.coin_limit);

        let refresh_interval = parse_positive::<u64>(&lookup, ENV_REFRESH_SECS)
            .map(Duration::from_secs)
            .unwrap_or(defaults.refresh_interval);

        let lookback_days = parse_positive(&lookup, ENV_LOOKBACK_DAYS).unwrap_or(defaults.lookback_days);

        let log_dir = lookup(ENV_LOG_DIR)
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.log_dir);

        Self {
            api_base_url,
            coin_limit,
            refresh_interval,
            lookback_days,
            log_dir,
        }
    }
}

/// Parse un entier strictement positif ; None (avec warning) si invalide
fn parse_positive<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: FromStr + PartialOrd + Default,
{
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(value) if value > T::default() => Some(value),
        _ => {
            warn!(key, value = %raw, "Invalid configuration value, using default");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup(&[]));
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.coin_limit, 20);
        assert_eq!(config.refresh_interval, Duration::from_secs(60));
        assert_eq!(config.lookback_days, 7);
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            (ENV_API_URL, "http://localhost:8080/api/v3/"),
            (ENV_COIN_LIMIT, "50"),
            (ENV_REFRESH_SECS, "30"),
            (ENV_LOOKBACK_DAYS, "90"),
            (ENV_LOG_DIR, "/tmp/ct-logs"),
        ]));

        assert_eq!(config.api_base_url, "http://localhost:8080/api/v3");
        assert_eq!(config.coin_limit, 50);
        assert_eq!(config.refresh_interval, Duration::from_secs(30));
        assert_eq!(config.lookback_days, 90);
        assert_eq!(config.log_dir, PathBuf::from("/tmp/ct-logs"));
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = AppConfig::from_lookup(lookup(&[
            (ENV_COIN_LIMIT, "zero"),
            (ENV_REFRESH_SECS, "0"),
            (ENV_LOOKBACK_DAYS, "-7"),
        ]));

        assert_eq!(config.coin_limit, 20);
        assert_eq!(config.refresh_interval, Duration::from_secs(60));
        assert_eq!(config.lookback_days, 7);
    }
}
