//! solar-quote entry point: CLI wiring, config loading and output.

mod cli;

use std::process;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use solar_quote::config::QuoteConfig;
use solar_quote::io::export::export_csv;
use solar_quote::projection::Projector;

use cli::Cli;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("solar_quote=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // --scenario and --preset are exclusive; neither means the baseline preset
    let config = if let Some(ref path) = cli.scenario {
        QuoteConfig::from_toml_file(path)?
    } else if let Some(ref name) = cli.preset {
        QuoteConfig::from_preset(name)?
    } else {
        QuoteConfig::baseline()
    };

    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    let catalog = config.catalog()?;
    let request = config.to_request(&catalog)?;
    let projection = Projector::new(&catalog)
        .project(&request)
        .context("failed to price the quote")?;

    if !cli.summary_only {
        for year in &projection.yearly {
            println!("{year}");
        }
        println!();
    }
    println!("{projection}");

    if let Some(ref path) = cli.export {
        export_csv(&projection, path)
            .with_context(|| format!("failed to write CSV to {}", path.display()))?;
        tracing::info!(path = %path.display(), "projection exported");
    }

    #[cfg(feature = "api")]
    if cli.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        let state = Arc::new(solar_quote::api::AppState { catalog });
        let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
        let rt = tokio::runtime::Runtime::new().context("failed to create tokio runtime")?;
        rt.block_on(solar_quote::api::serve(state, addr))?;
    }

    Ok(())
}
