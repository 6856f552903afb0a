// ============================================================================
// CryptoTracker - Library
// ============================================================================
// Expose les modules publics pour le binaire et les tests d'intégration
// ============================================================================

pub mod api;          // Client CoinGecko et trait MarketDataSource
pub mod app;          // État de l'application
pub mod chart_loader; // Sélection et chargement de l'historique
pub mod config;       // Configuration (variables d'environnement)
pub mod filter;       // Filtre de la liste par nom / symbole
pub mod models;       // Structures de données
pub mod refresh;      // Rafraîchissement périodique de la liste
pub mod request;      // Jetons de requête (la dernière gagne)
pub mod store;        // Persistance du thème
pub mod ui;           // Interface utilisateur
pub mod worker;       // Tâches de fetch et messages vers la boucle
