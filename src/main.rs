//! ngine-assets - Asset resolution command line
//!
//! Composition root: loads configuration, sets up logging, selects a
//! backend through the registry and prints the resolution as JSON.

use clap::{Parser, Subcommand};
use ngine_assets::adapters::outbound::probe_catalogue;
use ngine_assets::{
    get_backend, load_config, AssetBackend, AssetError, Config, PrivilegedAssetBackend,
    RegistryQuery, SceneRequest,
};
use std::sync::Arc;
use tracing_subscriber::fmt::format::FmtSpan;

/// Resolve logical asset requests to concrete locations
#[derive(Parser)]
#[command(name = "ngine-assets")]
#[command(about = "Resolve scenes and catalogue assets through a pluggable backend", long_about = None)]
struct Cli {
    /// Backend to use: local, cloud or privileged (defaults to NGINE_ASSET_BACKEND, then local)
    #[arg(long, global = true)]
    backend: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve a scene inside a namespace
    Scene {
        namespace: String,
        layout_id: Option<u32>,
        style_id: Option<u32>,
        version: Option<String>,
    },
    /// Resolve an asset by type and source
    Registry { asset_type: String, source: String },
    /// Resolve an asset by published file version
    Version { file_version: String },
    /// List catalogue entries
    List,
    /// Print the endpoint of the selected backend
    Host,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration from environment
    let cfg = load_config()?;

    // Setup logging
    let log_level = if cfg.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr)
        .init();

    let backend = select_backend(&cli, &cfg)?;
    tracing::info!("using {} asset backend", backend.name());

    let output = run(backend, cli.command).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}

/// Select the requested backend.
///
/// `list` is advisory, so a privileged backend whose catalogue cannot be
/// bound is replaced by a detached instance that lists nothing.
fn select_backend(cli: &Cli, cfg: &Config) -> anyhow::Result<Arc<dyn AssetBackend>> {
    match get_backend(cli.backend.as_deref()) {
        Ok(backend) => Ok(backend),
        Err(AssetError::DependencyMissing(reason)) if matches!(cli.command, Command::List) => {
            tracing::warn!("listing without catalogue: {}", reason);
            Ok(Arc::new(PrivilegedAssetBackend::from_binding(
                probe_catalogue(cfg),
            )))
        }
        Err(e) => Err(e.into()),
    }
}

async fn run(backend: Arc<dyn AssetBackend>, command: Command) -> anyhow::Result<serde_json::Value> {
    let value = match command {
        Command::Scene {
            namespace,
            layout_id,
            style_id,
            version,
        } => {
            let request = SceneRequest {
                backend_namespace: namespace.clone(),
                scene_id: namespace,
                layout_id,
                style_id,
                version,
            };
            serde_json::to_value(backend.acquire_scene(&request).await?.result())?
        }
        Command::Registry { asset_type, source } => {
            let query = RegistryQuery::new(asset_type, source);
            serde_json::to_value(backend.acquire_by_registry(&query).await?)?
        }
        Command::Version { file_version } => {
            serde_json::to_value(backend.acquire_by_file_version(&file_version).await?)?
        }
        Command::List => serde_json::to_value(backend.list_registry_entries().await)?,
        Command::Host => serde_json::Value::String(backend.host()?),
    };

    Ok(value)
}
