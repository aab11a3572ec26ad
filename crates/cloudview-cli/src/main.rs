//! cloudview - command-line dashboard for cloud resources

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cloudview_client::{DomainRequest, DropletRequest};
use cloudview_core::{Category, CloudviewConfig};
use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::App;

/// Command-line dashboard for droplets, domains and databases
#[derive(Debug, Parser)]
#[command(name = "cloudview")]
#[command(about = "Command-line dashboard for droplets, domains and databases")]
#[command(version)]
struct Cli {
    /// Configuration file path (TOML)
    #[arg(short, long, value_name = "FILE", env = "CLOUDVIEW_CONFIG")]
    config: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch one category once and print it
    List {
        /// compute, domain or database
        category: Category,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Poll a category until interrupted
    Watch {
        /// compute, domain or database
        category: Category,

        /// Poll interval in seconds (overrides config)
        #[arg(short, long)]
        interval: Option<u64>,

        /// Print JSON snapshots instead of tables
        #[arg(long)]
        json: bool,
    },

    /// Show details of one resource
    Show {
        /// Resource identifier
        id: String,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Aggregate figures across all categories
    Overview {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Create a droplet
    #[command(name = "create-droplet")]
    CreateDroplet {
        /// Droplet name
        #[arg(long)]
        name: Option<String>,

        /// Region slug
        #[arg(long)]
        region: Option<String>,

        /// Size slug
        #[arg(long)]
        size: Option<String>,

        /// Image slug
        #[arg(long)]
        image: Option<String>,

        /// Tags (comma-separated)
        #[arg(long)]
        tags: Option<String>,
    },

    /// Create a domain
    #[command(name = "create-domain")]
    CreateDomain {
        /// Domain name
        name: String,

        /// IPv4 address for the apex record
        ip_address: Ipv4Addr,
    },

    /// Delete a resource
    Delete {
        /// compute, domain or database
        category: Category,

        /// Resource identifier
        id: String,
    },
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_config(path: Option<&Path>) -> Result<CloudviewConfig> {
    let config = match path {
        Some(path) => CloudviewConfig::load(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => CloudviewConfig::new(),
    };
    Ok(config.merge_env())
}

fn droplet_request(
    name: Option<String>,
    region: Option<String>,
    size: Option<String>,
    image: Option<String>,
    tags: Option<&str>,
) -> DropletRequest {
    let mut request = DropletRequest::new();
    if let Some(name) = name {
        request = request.with_name(name);
    }
    if let Some(region) = region {
        request = request.with_region(region);
    }
    if let Some(size) = size {
        request = request.with_size(size);
    }
    if let Some(image) = image {
        request = request.with_image(image);
    }
    if let Some(tags) = tags {
        request = request.with_tag_list(tags);
    }
    request
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json_logs);
    debug!("Starting cloudview with {:?}", cli);

    let mut config = load_config(cli.config.as_deref())?;
    config
        .api
        .credentials()
        .context("set CLOUDVIEW_API_URL and CLOUDVIEW_API_KEY or provide them in --config")?;
    if let Commands::Watch {
        interval: Some(secs),
        ..
    } = &cli.command
    {
        config.sync = config.sync.with_poll_interval_secs(*secs);
    }

    let app = App::new(&config);
    let result = match cli.command {
        Commands::List { category, json } => app.list(category, json).await,
        Commands::Watch { category, json, .. } => app.watch(category, json).await,
        Commands::Show { id, json } => app.show(&id, json).await,
        Commands::Overview { json } => app.overview(json).await,
        Commands::CreateDroplet {
            name,
            region,
            size,
            image,
            tags,
        } => {
            app.create_droplet(droplet_request(name, region, size, image, tags.as_deref()))
                .await
        }
        Commands::CreateDomain { name, ip_address } => {
            app.create_domain(DomainRequest::new(name, ip_address)).await
        }
        Commands::Delete { category, id } => app.delete(category, &id).await,
    };
    app.shutdown().await;
    result
}
