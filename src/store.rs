// ============================================================================
// Stockage persistant de la préférence de thème
// ============================================================================
// Une seule clé, stockée dans un fichier du même nom :
//   ~/.config/cryptotracker/crypto-tracker-theme  →  "dark" ou "light"
//
// Lecture et écriture sont des opérations atomiques sur une seule clé :
// pas de verrou, pas de transaction.
// ============================================================================

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::models::ThemePreference;

/// Nom de la clé (et du fichier)
pub const THEME_KEY: &str = "crypto-tracker-theme";

/// Accès au fichier de préférence
#[derive(Debug, Clone)]
pub struct ThemeStore {
    path: PathBuf,
}

impl ThemeStore {
    /// Store situé dans `dir`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(THEME_KEY),
        }
    }

    /// Store dans le répertoire de configuration de l'utilisateur
    ///
    /// None si la plateforme n'en expose pas.
    pub fn default_location() -> Option<Self> {
        dirs::config_dir().map(|dir| Self::in_dir(dir.join("cryptotracker")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Lit la préférence ; thème clair si absente ou illisible
    pub fn load(&self) -> ThemePreference {
        match fs::read_to_string(&self.path) {
            Ok(value) => {
                let theme = ThemePreference::from_stored(Some(&value));
                debug!(path = ?self.path, %theme, "Theme preference loaded");
                theme
            }
            Err(e) if e.kind() == ErrorKind::NotFound => ThemePreference::default(),
            Err(e) => {
                warn!(path = ?self.path, error = %e, "Failed to read theme preference");
                ThemePreference::default()
            }
        }
    }

    /// Écrit la préférence immédiatement
    pub fn save(&self, theme: ThemePreference) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).context("Échec de la création du répertoire de configuration")?;
        }
        fs::write(&self.path, theme.as_str()).context("Échec de l'écriture de la préférence de thème")?;
        debug!(path = ?self.path, %theme, "Theme preference saved");
        Ok(())
    }
}
