use std::io;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use pt_app::cli::Cli;
use pt_app::render::{describe_file, header_summary, render_file, terminal_columns};
use pt_core::config::{ViewConfig, load_config};

/// Loaded from the working directory when `--config` is not given.
const DEFAULT_CONFIG: &str = "pixterm.toml";

fn main() -> ExitCode {
    // 1. Parser CLI
    let cli = Cli::parse();

    // 2. Initialiser le logging
    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    // 3. Charger la config, puis appliquer les overrides CLI
    let mut config = resolve_config(cli)?;
    cli.apply_overrides(&mut config);

    if cli.info {
        let header = describe_file(&cli.path, &config)
            .with_context(|| format!("could not read {}", cli.path.display()))?;
        println!("{}", header_summary(&cli.path, &header));
        return Ok(());
    }

    // Windows consoles need VT processing switched on for SGR escapes.
    #[cfg(windows)]
    {
        if !crossterm::ansi_support::supports_ansi() {
            log::warn!("terminal does not appear to support ANSI escape sequences");
        }
    }

    // 4. Décoder, redimensionner, rendre
    let mut stdout = io::stdout().lock();
    render_file(&cli.path, &config, terminal_columns(), &mut stdout)
        .with_context(|| format!("could not display {}", cli.path.display()))
}

/// Resolve config: explicit --config must load, the default file is optional.
fn resolve_config(cli: &Cli) -> Result<ViewConfig> {
    if let Some(ref path) = cli.config {
        return load_config(path);
    }
    let default = Path::new(DEFAULT_CONFIG);
    if default.exists() {
        load_config(default)
    } else {
        log::debug!("{DEFAULT_CONFIG} not found, using defaults");
        Ok(ViewConfig::default())
    }
}
