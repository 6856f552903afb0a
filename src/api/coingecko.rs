// ============================================================================
// API Client : CoinGecko
// ============================================================================
// Les trois requêtes en lecture seule vers l'API publique :
// - /coins/markets : top N des coins par capitalisation
// - /coins/{id}/market_chart : historique de prix
// - /search : recherche de coins
//
// CONCEPTS RUST AVANCÉS :
// 1. async_trait : méthodes async dans un trait (source de données mockable)
// 2. thiserror : FetchError typée, propagée telle quelle à l'appelant
// 3. Séparation transport / parsing : les parse_* sont testables sans réseau
// ============================================================================

use async_trait::async_trait;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, error, info, instrument};

use crate::api::error::{FetchError, FetchResult};
use crate::models::{Coin, CoinSummary, PriceHistory};

/// URL de base de l'API publique
pub const DEFAULT_BASE_URL: &str = "https://api.coingecko.com/api/v3";

/// Nombre de coins demandés par défaut
pub const DEFAULT_COIN_LIMIT: u32 = 20;

// ============================================================================
// Trait MarketDataSource
// ============================================================================
// CONCEPT RUST : Trait comme point d'injection
// - Le client HTTP réel implémente ce trait
// - Les tests fournissent une source factice (réponses contrôlées, délais)
// - Send + Sync : la source est partagée entre tâches tokio via Arc
// ============================================================================

/// Source de données de marché
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Top `limit` coins triés par capitalisation décroissante
    async fn fetch_top_coins(&self, limit: u32) -> FetchResult<Vec<Coin>>;

    /// Historique de prix de `coin_id` sur `days` jours
    ///
    /// `days` est transmis tel quel : l'API définit le comportement pour les
    /// valeurs hors 1/7/30/90.
    async fn fetch_price_history(&self, coin_id: &str, days: u32) -> FetchResult<PriceHistory>;

    /// Recherche libre de coins
    async fn search_coins(&self, query: &str) -> FetchResult<Vec<CoinSummary>>;
}

/// Réponse de /search (on ne garde que le champ coins)
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    coins: Vec<CoinSummary>,
}

/// Client HTTP pour CoinGecko
///
/// Le reqwest::Client est créé une seule fois et réutilisé : il garde un pool
/// de connexions.
#[derive(Debug, Clone)]
pub struct CoinGeckoClient {
    http: reqwest::Client,
    base_url: String,
}

impl CoinGeckoClient {
    /// Crée un client pointant vers `base_url` (sans slash final)
    pub fn new(base_url: impl Into<String>) -> FetchResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("cryptotracker/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Requête du top des coins par capitalisation
    fn markets_request(&self, limit: u32) -> RequestBuilder {
        let per_page = limit.to_string();
        self.http
            .get(format!("{}/coins/markets", self.base_url))
            .query(&[
                ("vs_currency", "usd"),
                ("order", "market_cap_desc"),
                ("per_page", per_page.as_str()),
                ("page", "1"),
                ("sparkline", "false"),
            ])
    }

    /// Requête de l'historique d'un coin (l'id est un segment de chemin)
    fn market_chart_request(&self, coin_id: &str, days: u32) -> RequestBuilder {
        let days = days.to_string();
        self.http
            .get(format!(
                "{}/coins/{}/market_chart",
                self.base_url,
                urlencoding::encode(coin_id)
            ))
            .query(&[("vs_currency", "usd"), ("days", days.as_str())])
    }

    /// Requête de recherche
    fn search_request(&self, query: &str) -> RequestBuilder {
        self.http
            .get(format!("{}/search", self.base_url))
            .query(&[("query", query)])
    }

    /// Exécute un GET et retourne le corps brut si le statut est 2xx
    ///
    /// Aucun retry, aucun timeout spécifique : un seul aller-retour.
    async fn get_body(&self, request: RequestBuilder) -> FetchResult<String> {
        let request = request.build()?;
        debug!(url = %request.url(), "Sending HTTP request to CoinGecko");
        let response = self.http.execute(request).await?;

        let status = response.status();
        debug!(status = %status, "Received HTTP response");

        if !status.is_success() {
            error!(status = %status, "CoinGecko returned error status");
            return Err(FetchError::Upstream {
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl MarketDataSource for CoinGeckoClient {
    #[instrument(skip(self))]
    async fn fetch_top_coins(&self, limit: u32) -> FetchResult<Vec<Coin>> {
        let body = self.get_body(self.markets_request(limit)).await?;
        let coins = parse_markets(&body)?;

        info!(coins = coins.len(), "Successfully fetched top coins");
        Ok(coins)
    }

    #[instrument(skip(self))]
    async fn fetch_price_history(&self, coin_id: &str, days: u32) -> FetchResult<PriceHistory> {
        let body = self.get_body(self.market_chart_request(coin_id, days)).await?;
        let history = parse_market_chart(&body)?;

        info!(points = history.len(), "Successfully fetched price history");
        Ok(history)
    }

    #[instrument(skip(self))]
    async fn search_coins(&self, query: &str) -> FetchResult<Vec<CoinSummary>> {
        let body = self.get_body(self.search_request(query)).await?;
        let coins = parse_search(&body)?;

        info!(results = coins.len(), "Search completed");
        Ok(coins)
    }
}

// ============================================================================
// Parsing des réponses
// ============================================================================

fn parse_json<T: DeserializeOwned>(body: &str) -> FetchResult<T> {
    Ok(serde_json::from_str(body)?)
}

/// Parse la réponse de /coins/markets
pub fn parse_markets(body: &str) -> FetchResult<Vec<Coin>> {
    parse_json(body)
}

/// Parse la réponse de /coins/{id}/market_chart
pub fn parse_market_chart(body: &str) -> FetchResult<PriceHistory> {
    parse_json(body)
}

/// Parse la réponse de /search
pub fn parse_search(body: &str) -> FetchResult<Vec<CoinSummary>> {
    let response: SearchResponse = parse_json(body)?;
    Ok(response.coins)
}

// ============================================================================
// Tests unitaires
// ============================================================================
