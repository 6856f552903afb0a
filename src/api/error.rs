// ============================================================================
// Erreurs de l'adaptateur de données
// ============================================================================
// Deux familles d'échec seulement :
// - Network : la requête n'a pas pu être envoyée ou terminée
// - Upstream : une réponse est arrivée mais signale un échec (non-2xx)
//   ou n'est pas décodable
//
// Les contrôleurs ne distinguent pas ces cas à l'écran : ils les réduisent
// à un message fixe et loggent la cause.
// ============================================================================

use thiserror::Error;

/// Erreur retournée par une requête vers l'API de marché
#[derive(Debug, Error)]
pub enum FetchError {
    /// La requête n'a pas abouti (DNS, connexion, timeout...)
    #[error("échec réseau : {0}")]
    Network(#[from] reqwest::Error),

    /// L'API a répondu avec un statut d'erreur
    #[error("l'API a retourné une erreur : HTTP {status}")]
    Upstream { status: u16 },

    /// Le corps de la réponse ne correspond pas au format attendu
    #[error("réponse JSON invalide : {0}")]
    Decode(#[from] serde_json::Error),
}

impl FetchError {
    /// Vrai si l'erreur vient de la réponse (et non du transport)
    ///
    /// Utile uniquement pour les logs : l'utilisateur voit le même message.
    pub fn is_upstream(&self) -> bool {
        matches!(self, FetchError::Upstream { .. } | FetchError::Decode(_))
    }
}

/// Alias pratique pour les résultats de l'adaptateur
pub type FetchResult<T> = std::result::Result<T, FetchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_classification() {
        let err = FetchError::Upstream { status: 429 };
        assert!(err.is_upstream());
        assert!(err.to_string().contains("429"));

        let decode = serde_json::from_str::<Vec<u8>>("{").unwrap_err();
        assert!(FetchError::from(decode).is_upstream());
    }
}
