//! nginx-plus-ctl
//!
//! Command line front end for the NGINX Plus API client.
//!
//! ```text
//! flags / config file → ClientConfig → NginxClient → command → JSON on stdout
//! ```
//!
//! Logs go to stderr; `RUST_LOG` overrides the configured level.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use nginx_plus_client::config::{load_config, ClientConfig};
use nginx_plus_client::observability::logging::init_logging;
use nginx_plus_client::{NginxClient, StreamUpstreamServer, UpstreamServer};

#[derive(Parser)]
#[command(name = "nginx-plus-ctl")]
#[command(about = "Manage NGINX Plus upstreams, key-value zones and stats", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// API endpoint, e.g. http://127.0.0.1:8080/api
    #[arg(short, long)]
    endpoint: Option<String>,

    #[arg(long)]
    api_version: Option<u32>,

    /// Verify the API version against the endpoint before running the command
    #[arg(long)]
    check_api: bool,

    #[arg(long)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List API versions advertised by NGINX Plus
    Versions,
    /// Manage upstream servers
    Servers {
        #[command(subcommand)]
        action: ServersCommand,
    },
    /// Manage key-value zones
    Keyvals {
        #[command(subcommand)]
        action: KeyvalsCommand,
    },
    /// Print the full stats document
    Stats,
}

#[derive(Subcommand)]
enum ServersCommand {
    /// List the servers of an upstream
    List {
        upstream: String,
        #[arg(long)]
        stream: bool,
    },
    /// Add one server
    Add {
        upstream: String,
        server: String,
        #[command(flatten)]
        params: ServerArgs,
        #[arg(long)]
        stream: bool,
    },
    /// Remove one server by address
    Remove {
        upstream: String,
        server: String,
        #[arg(long)]
        stream: bool,
    },
    /// Make the upstream match a JSON array of servers
    Sync {
        upstream: String,
        /// File holding the desired servers
        #[arg(short, long)]
        file: PathBuf,
        #[arg(long)]
        stream: bool,
    },
}

#[derive(Args)]
struct ServerArgs {
    #[arg(long)]
    weight: Option<u32>,
    #[arg(long)]
    max_conns: Option<u32>,
    #[arg(long)]
    max_fails: Option<u32>,
    #[arg(long)]
    fail_timeout: Option<String>,
    #[arg(long)]
    backup: bool,
    #[arg(long)]
    down: bool,
}

impl ServerArgs {
    fn flag(value: bool) -> Option<bool> {
        value.then_some(true)
    }

    fn http(&self, server: String) -> UpstreamServer {
        UpstreamServer {
            weight: self.weight,
            max_conns: self.max_conns,
            max_fails: self.max_fails,
            fail_timeout: self.fail_timeout.clone(),
            backup: Self::flag(self.backup),
            down: Self::flag(self.down),
            ..UpstreamServer::new(server)
        }
    }

    fn stream(&self, server: String) -> StreamUpstreamServer {
        StreamUpstreamServer {
            weight: self.weight,
            max_conns: self.max_conns,
            max_fails: self.max_fails,
            fail_timeout: self.fail_timeout.clone(),
            backup: Self::flag(self.backup),
            down: Self::flag(self.down),
            ..StreamUpstreamServer::new(server)
        }
    }
}

#[derive(Subcommand)]
enum KeyvalsCommand {
    /// Show one zone, or every zone when none is given
    List {
        zone: Option<String>,
        #[arg(long)]
        stream: bool,
    },
    Add {
        zone: String,
        key: String,
        value: String,
        #[arg(long)]
        stream: bool,
    },
    Modify {
        zone: String,
        key: String,
        value: String,
        #[arg(long)]
        stream: bool,
    },
    Delete {
        zone: String,
        key: String,
        #[arg(long)]
        stream: bool,
    },
    /// Remove every pair of a zone
    Clear {
        zone: String,
        #[arg(long)]
        stream: bool,
    },
}

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

fn print_json<T: Serialize>(value: &T) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn read_desired<T: serde::de::DeserializeOwned>(path: &Path) -> CliResult<Vec<T>> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

impl Cli {
    /// Configuration file (or defaults) with command line overrides applied.
    fn client_config(&self) -> CliResult<ClientConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => ClientConfig::default(),
        };

        if let Some(endpoint) = &self.endpoint {
            config.endpoint = endpoint.clone();
        }
        if self.api_version.is_some() {
            config.api_version = self.api_version;
        }
        if self.check_api {
            config.check_api = true;
        }
        if let Some(timeout) = self.timeout_secs {
            config.timeout_secs = timeout;
        }
        Ok(config)
    }
}

async fn run_servers(client: &NginxClient, action: ServersCommand) -> CliResult<()> {
    match action {
        ServersCommand::List { upstream, stream: false } => {
            print_json(&client.get_http_servers(&upstream).await?)
        }
        ServersCommand::List { upstream, stream: true } => {
            print_json(&client.get_stream_servers(&upstream).await?)
        }
        ServersCommand::Add { upstream, server, params, stream: false } => {
            client.add_http_server(&upstream, &params.http(server)).await?;
            Ok(())
        }
        ServersCommand::Add { upstream, server, params, stream: true } => {
            client.add_stream_server(&upstream, &params.stream(server)).await?;
            Ok(())
        }
        ServersCommand::Remove { upstream, server, stream: false } => {
            client.delete_http_server(&upstream, &server).await?;
            Ok(())
        }
        ServersCommand::Remove { upstream, server, stream: true } => {
            client.delete_stream_server(&upstream, &server).await?;
            Ok(())
        }
        ServersCommand::Sync { upstream, file, stream: false } => {
            let desired: Vec<UpstreamServer> = read_desired(&file)?;
            print_json(&client.update_http_servers(&upstream, &desired).await?)
        }
        ServersCommand::Sync { upstream, file, stream: true } => {
            let desired: Vec<StreamUpstreamServer> = read_desired(&file)?;
            print_json(&client.update_stream_servers(&upstream, &desired).await?)
        }
    }
}

async fn run_keyvals(client: &NginxClient, action: KeyvalsCommand) -> CliResult<()> {
    match action {
        KeyvalsCommand::List { zone: Some(zone), stream: false } => {
            print_json(&client.get_key_val_pairs(&zone).await?)
        }
        KeyvalsCommand::List { zone: Some(zone), stream: true } => {
            print_json(&client.get_stream_key_val_pairs(&zone).await?)
        }
        KeyvalsCommand::List { zone: None, stream: false } => {
            print_json(&client.get_all_key_val_pairs().await?)
        }
        KeyvalsCommand::List { zone: None, stream: true } => {
            print_json(&client.get_all_stream_key_val_pairs().await?)
        }
        KeyvalsCommand::Add { zone, key, value, stream } => {
            if stream {
                client.add_stream_key_val_pair(&zone, &key, &value).await?;
            } else {
                client.add_key_val_pair(&zone, &key, &value).await?;
            }
            Ok(())
        }
        KeyvalsCommand::Modify { zone, key, value, stream } => {
            if stream {
                client.modify_stream_key_val_pair(&zone, &key, &value).await?;
            } else {
                client.modify_key_val_pair(&zone, &key, &value).await?;
            }
            Ok(())
        }
        KeyvalsCommand::Delete { zone, key, stream } => {
            if stream {
                client.delete_stream_key_val_pair(&zone, &key).await?;
            } else {
                client.delete_key_val_pair(&zone, &key).await?;
            }
            Ok(())
        }
        KeyvalsCommand::Clear { zone, stream } => {
            if stream {
                client.delete_stream_key_val_pairs(&zone).await?;
            } else {
                client.delete_key_val_pairs(&zone).await?;
            }
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> CliResult<()> {
    let cli = Cli::parse();
    let config = cli.client_config()?;

    init_logging(&config.observability);

    let client = NginxClient::from_config(&config).await?;
    tracing::debug!(
        endpoint = %client.endpoint(),
        api_version = client.api_version(),
        "Running command"
    );

    match cli.command {
        Commands::Versions => print_json(&client.get_api_versions().await?),
        Commands::Servers { action } => run_servers(&client, action).await,
        Commands::Keyvals { action } => run_keyvals(&client, action).await,
        Commands::Stats => print_json(&client.get_stats().await?),
    }
}
