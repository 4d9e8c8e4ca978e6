use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::color::Rgb;

/// Configuration d'affichage d'une image.
///
/// Sérialisable en TOML. Chaque champ a une valeur par défaut saine.
///
/// # Example
/// ```
/// use pt_core::config::ViewConfig;
/// let config = ViewConfig::default();
/// assert_eq!(config.max_width, None);
/// assert_eq!(config.fallback_columns, 80);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ViewConfig {
    /// Largeur maximale en colonnes. `None` = largeur du terminal − 1.
    pub max_width: Option<u16>,
    /// Fond utilisé pour composer les pixels transparents.
    pub background: Rgb,
    /// Lower bound applied to the detected terminal width.
    pub min_width: u16,
    /// Column count assumed when the terminal size cannot be queried.
    pub fallback_columns: u16,
    /// Vérifier le CRC-32 de chaque chunk (désactivé par défaut).
    pub verify_checksums: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            max_width: None,
            background: Rgb::BLACK,
            min_width: 10,
            fallback_columns: 80,
            verify_checksums: false,
        }
    }
}

impl ViewConfig {
    /// Clamp all numeric fields to their valid ranges.
    /// Called after TOML deserialization to prevent out-of-range values.
    pub fn clamp_all(&mut self) {
        self.min_width = self.min_width.max(1);
        self.fallback_columns = self.fallback_columns.max(1);
        if let Some(w) = self.max_width {
            self.max_width = Some(w.max(1));
        }
    }

    /// Column budget for a given terminal width (`None` when undetectable).
    ///
    /// An explicit `max_width` wins; otherwise the terminal width minus one,
    /// never below `min_width`.
    ///
    /// # Example
    /// ```
    /// use pt_core::config::ViewConfig;
    /// let config = ViewConfig::default();
    /// assert_eq!(config.columns(Some(120)), 119);
    /// assert_eq!(config.columns(Some(4)), 10);
    /// assert_eq!(config.columns(None), 79);
    /// ```
    #[must_use]
    pub fn columns(&self, terminal_columns: Option<u16>) -> u32 {
        if let Some(w) = self.max_width {
            return u32::from(w.max(1));
        }
        let cols = terminal_columns.unwrap_or(self.fallback_columns);
        u32::from(cols.saturating_sub(1).max(self.min_width))
    }
}

/// Structure TOML intermédiaire pour désérialisation avec valeurs optionnelles.
#[derive(Deserialize)]
struct ConfigFile {
    view: Option<ViewSection>,
}

/// View section of the TOML config, all fields optional for partial override.
#[derive(Deserialize)]
struct ViewSection {
    max_width: Option<u16>,
    background: Option<Rgb>,
    min_width: Option<u16>,
    fallback_columns: Option<u16>,
    verify_checksums: Option<bool>,
}

/// Charge un fichier TOML et fusionne avec les valeurs par défaut.
///
/// ```toml
/// [view]
/// max_width = 60
/// background = [255, 255, 255]
/// ```
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
///
/// # Example
/// ```no_run
/// use pt_core::config::load_config;
/// use std::path::Path;
/// let config = load_config(Path::new("pixterm.toml")).unwrap();
/// ```
pub fn load_config(path: &Path) -> Result<ViewConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read config {}", path.display()))?;
    parse_config(&content)
        .with_context(|| format!("invalid TOML in {}", path.display()))
}

/// Parse TOML text and merge it over [`ViewConfig::default`].
///
/// # Errors
/// Returns an error if the text is not valid TOML for this schema.
pub fn parse_config(content: &str) -> Result<ViewConfig> {
    let file: ConfigFile = toml::from_str(content)?;
    let mut config = ViewConfig::default();

    if let Some(v) = file.view {
        if v.max_width.is_some() {
            config.max_width = v.max_width;
        }
        if let Some(bg) = v.background {
            config.background = bg;
        }
        if let Some(w) = v.min_width {
            config.min_width = w;
        }
        if let Some(c) = v.fallback_columns {
            config.fallback_columns = c;
        }
        if let Some(b) = v.verify_checksums {
            config.verify_checksums = b;
        }
    } else {
        log::debug!("no [view] section, using defaults");
    }

    config.clamp_all();
    Ok(config)
}
