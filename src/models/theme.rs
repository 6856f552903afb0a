// ============================================================================
// Enum : ThemePreference
// ============================================================================
// Préférence clair / sombre, persistée sous forme de chaîne "light" / "dark"
// ============================================================================

use std::fmt;

/// Thème de l'interface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemePreference {
    /// Thème clair (par défaut si rien n'est persisté)
    #[default]
    Light,
    /// Thème sombre
    Dark,
}

impl ThemePreference {
    /// Valeur stockée sur disque
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemePreference::Light => "light",
            ThemePreference::Dark => "dark",
        }
    }

    /// Lit une valeur persistée
    ///
    /// Seul "dark" active le thème sombre : toute autre valeur (ou l'absence
    /// de valeur) retombe sur le thème clair.
    pub fn from_stored(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("dark") => ThemePreference::Dark,
            _ => ThemePreference::Light,
        }
    }

    /// Retourne le thème opposé
    pub fn toggled(&self) -> Self {
        match self {
            ThemePreference::Light => ThemePreference::Dark,
            ThemePreference::Dark => ThemePreference::Light,
        }
    }

    pub fn is_dark(&self) -> bool {
        *self == ThemePreference::Dark
    }
}

impl fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_stored() {
        assert_eq!(ThemePreference::from_stored(None), ThemePreference::Light);
        assert_eq!(ThemePreference::from_stored(Some("dark")), ThemePreference::Dark);
        assert_eq!(ThemePreference::from_stored(Some("dark\n")), ThemePreference::Dark);
        assert_eq!(ThemePreference::from_stored(Some("light")), ThemePreference::Light);
        assert_eq!(ThemePreference::from_stored(Some("purple")), ThemePreference::Light);
    }

    #[test]
    fn test_toggle() {
        let theme = ThemePreference::default();
        assert_eq!(theme.toggled(), ThemePreference::Dark);
        assert_eq!(theme.toggled().toggled(), ThemePreference::Light);
    }
}
