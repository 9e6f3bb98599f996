use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::bail;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use catalog::config::ServerConfig;
use catalog::server::{AppState, create_router};
use catalog::store::{SqliteStore, Store};
use catalog::topology::{HttpTopology, TopologySource, UnconfiguredTopology};

#[derive(Parser)]
#[command(name = "catalog")]
#[command(about = "A multi-tenant service catalog server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Administrative commands
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },

    /// Start the server
    Serve {
        /// TOML config file; flags given on the command line take precedence
        #[arg(long, short)]
        config: Option<PathBuf>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(long, short)]
        port: Option<u16>,

        /// Data directory for the database
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Base URL of the topological inventory API
        #[arg(long)]
        topology_url: Option<String>,
    },
}

#[derive(Subcommand)]
enum AdminCommands {
    /// Initialize the server (create the database and its schema)
    Init {
        /// Data directory for the database
        #[arg(long, default_value = "./data")]
        data_dir: PathBuf,
    },
}

fn run_init(data_dir: PathBuf) -> anyhow::Result<()> {
    fs::create_dir_all(&data_dir)?;

    let config = ServerConfig {
        data_dir,
        ..ServerConfig::default()
    };
    let store = SqliteStore::new(config.db_path())?;
    store.initialize()?;

    println!("Initialized catalog database at {}", config.db_path().display());

    Ok(())
}

async fn run_serve(config: ServerConfig) -> anyhow::Result<()> {
    let db_path = config.db_path();
    if !db_path.exists() {
        bail!(
            "Database not found at {}. Run 'catalog admin init' first.",
            db_path.display()
        );
    }

    let store = SqliteStore::new(&db_path)?;
    store.initialize()?;

    let topology: Arc<dyn TopologySource> = match &config.topology_url {
        Some(url) => {
            info!("Using topology source at {}", url);
            Arc::new(HttpTopology::new(url))
        }
        None => {
            tracing::warn!("No topology_url configured; topology lookups will fail");
            Arc::new(UnconfiguredTopology)
        }
    };

    let state = Arc::new(AppState::new(Arc::new(store), topology));
    let app = create_router(state);
    let addr = config.socket_addr()?;

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("catalog=info".parse()?))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Admin { command } => match command {
            AdminCommands::Init { data_dir } => run_init(data_dir)?,
        },
        Commands::Serve {
            config,
            host,
            port,
            data_dir,
            topology_url,
        } => {
            let mut config = match config {
                Some(path) => ServerConfig::load(path)?,
                None => ServerConfig::default(),
            };
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(data_dir) = data_dir {
                config.data_dir = data_dir;
            }
            if topology_url.is_some() {
                config.topology_url = topology_url;
            }

            run_serve(config).await?;
        }
    }

    Ok(())
}
