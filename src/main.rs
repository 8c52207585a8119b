use std::path::PathBuf;

use anyhow::{
    Context,
    Result,
};
use clap::Parser;
use site_i18n::config::{
    self,
    I18nSettings,
};
use site_i18n::fork::LocaleForker;
use site_i18n::pipeline::Pipeline;
use tracing_subscriber::EnvFilter;

/// Command line arguments.
#[derive(Parser, Debug)]
#[command(name = "site-i18n", version, about = "Build one localized copy of a site per locale")]
struct Cli {
    /// Directory containing the source files
    source: PathBuf,
    /// Directory the localized files are written to
    destination: PathBuf,
    /// Path to the settings file (defaults to `<source>/.site-i18n.json`)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Directory resource paths (`nsPath`) are resolved against
    #[arg(short, long, default_value = ".")]
    resources: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = load_settings(&cli)?;

    let forker = LocaleForker::with_resources(settings, &cli.resources)
        .context("failed to set up localization")?;

    Pipeline::new(&cli.source)
        .destination(&cli.destination)
        .use_plugin(forker)
        .build()
        .context("build failed")?;

    Ok(())
}

/// Reads settings from `--config` or from the source directory.
fn load_settings(cli: &Cli) -> Result<I18nSettings> {
    if let Some(path) = &cli.config {
        return config::load_from_file(path)
            .with_context(|| format!("failed to read {}", path.display()));
    }

    config::load_from_dir(&cli.source)?.with_context(|| {
        format!("no {} found in {}", config::CONFIG_FILE_NAME, cli.source.display())
    })
}
