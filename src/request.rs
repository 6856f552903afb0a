// ============================================================================
// Jetons de requête
// ============================================================================
// Chaque flux de requêtes (rafraîchissement de la liste, historique du
// graphique) numérote ses requêtes. Deux politiques :
// - is_latest : seule la dernière requête émise compte (graphique : une
//   réponse pour un autre coin ou une autre fenêtre ne doit jamais s'afficher)
// - try_apply : toute réponse plus récente que la dernière appliquée passe
//   (liste : une source plus lente que le timer finit quand même par charger)
// ============================================================================

/// Numéro d'une requête dans son flux
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Compteur monotone de jetons pour un flux
#[derive(Debug, Default)]
pub struct RequestSequence {
    latest: u64,
    applied: u64,
}

impl RequestSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Émet un nouveau jeton, qui devient le seul valide
    pub fn issue(&mut self) -> RequestToken {
        self.latest += 1;
        RequestToken(self.latest)
    }

    /// Vrai si `token` est le dernier émis
    pub fn is_latest(&self, token: RequestToken) -> bool {
        self.latest != 0 && token.0 == self.latest
    }

    /// Accepte `token` s'il est plus récent que le dernier jeton appliqué
    ///
    /// Le jeton accepté devient la nouvelle borne : une réponse plus ancienne
    /// arrivée ensuite est refusée.
    pub fn try_apply(&mut self, token: RequestToken) -> bool {
        if token.0 == 0 || token.0 > self.latest || token.0 <= self.applied {
            return false;
        }
        self.applied = token.0;
        true
    }
}
