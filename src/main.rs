use clap::Parser;
use dotenvy::dotenv;
use edgepath::{config, graph_catalog::Schema, server};

/// edgepath - relationship paths compiled to batched SQL
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// HTTP server host address [env: EDGEPATH_HOST, default: 0.0.0.0]
    #[arg(long)]
    http_host: Option<String>,

    /// HTTP server port [env: EDGEPATH_PORT, default: 8080]
    #[arg(long)]
    http_port: Option<u16>,

    /// YAML schema declaring types and relationship paths [env: EDGEPATH_SCHEMA, default: schema.yaml]
    #[arg(long = "schema")]
    schema_path: Option<String>,

    /// YAML server configuration read instead of the environment
    #[arg(long = "config")]
    config_file: Option<String>,

    /// Print the storage layout the schema needs as JSON and exit
    #[arg(long)]
    print_storage_plan: bool,
}

impl From<Cli> for config::CliConfig {
    fn from(cli: Cli) -> Self {
        config::CliConfig {
            http_host: cli.http_host,
            http_port: cli.http_port,
            schema_path: cli.schema_path,
            config_file: cli.config_file,
        }
    }
}

#[tokio::main]
async fn main() {
    // Defaults to INFO, override with RUST_LOG
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // .env entries become EDGEPATH_* variables unless already set
    dotenv().ok();

    let cli = Cli::parse();
    let print_storage_plan = cli.print_storage_plan;

    let config = match config::ServerConfig::from_cli(cli.into()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    if print_storage_plan {
        if let Err(e) = print_layout(&config.schema_path) {
            eprintln!("{}", e);
            std::process::exit(1);
        }
        return;
    }

    println!("\nedgepath v{}\n", env!("CARGO_PKG_VERSION"));
    server::run_with_config(config).await;
}

fn print_layout(schema_path: &str) -> anyhow::Result<()> {
    let schema = Schema::from_yaml_file(schema_path)?;
    println!("{}", serde_json::to_string_pretty(&schema.layout())?);
    Ok(())
}
