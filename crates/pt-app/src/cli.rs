use std::path::PathBuf;

use clap::Parser;
use pt_core::color::Rgb;
use pt_core::config::ViewConfig;

/// pixterm — affiche une image PNG dans le terminal en niveaux de gris.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Chemin vers l'image PNG (8 bits, non entrelacée, gris/RGB ± alpha).
    pub path: PathBuf,

    /// Largeur maximale en colonnes. Défaut : largeur du terminal − 1.
    #[arg(short, long)]
    pub width: Option<u16>,

    /// Fond pour la transparence : "R,G,B" ou "#rrggbb". Défaut : noir.
    #[arg(short, long)]
    pub background: Option<Rgb>,

    /// Fichier de configuration TOML. Défaut : pixterm.toml s'il existe.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Rejeter les chunks dont le CRC-32 est faux.
    #[arg(long, default_value_t = false)]
    pub verify_checksums: bool,

    /// Afficher l'en-tête de l'image au lieu de la rendre.
    #[arg(long, default_value_t = false)]
    pub info: bool,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

impl Cli {
    /// Apply CLI flags over a loaded configuration.
    pub fn apply_overrides(&self, config: &mut ViewConfig) {
        if let Some(w) = self.width {
            config.max_width = Some(w);
        }
        if let Some(bg) = self.background {
            config.background = bg;
        }
        if self.verify_checksums {
            config.verify_checksums = true;
        }
        config.clamp_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_background_forms() {
        let cli = Cli::try_parse_from(["pixterm", "a.png", "-b", "#ffffff"]).unwrap();
        assert_eq!(cli.background, Some(Rgb(255, 255, 255)));
        let cli = Cli::try_parse_from(["pixterm", "a.png", "--background", "1,2,3"]).unwrap();
        assert_eq!(cli.background, Some(Rgb(1, 2, 3)));
        assert!(Cli::try_parse_from(["pixterm", "a.png", "-b", "blue"]).is_err());
    }

    #[test]
    fn path_is_required() {
        assert!(Cli::try_parse_from(["pixterm"]).is_err());
    }

    #[test]
    fn overrides_win_over_file_values() {
        let cli = Cli::try_parse_from(["pixterm", "a.png", "-w", "0", "--verify-checksums"]).unwrap();
        let mut config = ViewConfig {
            max_width: Some(40),
            ..ViewConfig::default()
        };
        cli.apply_overrides(&mut config);
        assert_eq!(config.max_width, Some(1));
        assert!(config.verify_checksums);
        assert_eq!(config.background, Rgb::BLACK);
    }
}
