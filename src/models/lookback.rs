// ============================================================================
// Enum : Lookback
// ============================================================================
// Fenêtre d'historique affichée sur le graphique (1, 7, 30 ou 90 jours)
//
// CONCEPT : Cycle d'états (comme les intervalles d'un graphique boursier)
// - 1D → 7D → 30D → 90D → 1D avec la touche 'l'
// - sens inverse avec 'h'
//
// L'API accepte n'importe quel nombre de jours : le ChartLoader stocke un
// simple u32, cet enum ne sert qu'à proposer les choix à l'utilisateur.
// ============================================================================

/// Fenêtres d'historique proposées
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lookback {
    /// 1 jour
    OneDay,
    /// 7 jours (par défaut)
    #[default]
    OneWeek,
    /// 30 jours
    OneMonth,
    /// 90 jours
    ThreeMonths,
}

impl Lookback {
    /// Toutes les fenêtres, dans l'ordre d'affichage
    pub const ALL: [Lookback; 4] = [
        Lookback::OneDay,
        Lookback::OneWeek,
        Lookback::OneMonth,
        Lookback::ThreeMonths,
    ];

    /// Nombre de jours demandés à l'API
    pub fn days(&self) -> u32 {
        match self {
            Lookback::OneDay => 1,
            Lookback::OneWeek => 7,
            Lookback::OneMonth => 30,
            Lookback::ThreeMonths => 90,
        }
    }

    /// Label court pour l'affichage ("7 Days")
    pub fn label(&self) -> &'static str {
        match self {
            Lookback::OneDay => "1 Day",
            Lookback::OneWeek => "7 Days",
            Lookback::OneMonth => "30 Days",
            Lookback::ThreeMonths => "90 Days",
        }
    }

    /// Retrouve la fenêtre correspondant à un nombre de jours
    pub fn from_days(days: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.days() == days)
    }

    /// Fenêtre suivante (boucle)
    pub fn next(&self) -> Self {
        match self {
            Lookback::OneDay => Lookback::OneWeek,
            Lookback::OneWeek => Lookback::OneMonth,
            Lookback::OneMonth => Lookback::ThreeMonths,
            Lookback::ThreeMonths => Lookback::OneDay,
        }
    }

    /// Fenêtre précédente (boucle)
    pub fn previous(&self) -> Self {
        match self {
            Lookback::OneDay => Lookback::ThreeMonths,
            Lookback::OneWeek => Lookback::OneDay,
            Lookback::OneMonth => Lookback::OneWeek,
            Lookback::ThreeMonths => Lookback::OneMonth,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookback_days() {
        assert_eq!(Lookback::default().days(), 7);
        assert_eq!(Lookback::ThreeMonths.days(), 90);
        assert_eq!(Lookback::from_days(30), Some(Lookback::OneMonth));
        assert_eq!(Lookback::from_days(14), None);
    }

    #[test]
    fn test_lookback_cycle() {
        assert_eq!(Lookback::OneDay.next(), Lookback::OneWeek);
        assert_eq!(Lookback::ThreeMonths.next(), Lookback::OneDay); // Boucle
        assert_eq!(Lookback::OneDay.previous(), Lookback::ThreeMonths);
    }
}
