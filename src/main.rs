use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use flightgraph::{
    config::{DocumentStoreConfig, GraphStoreConfig, ServerConfig},
    generator,
    graph_catalog::LoadSchema,
    graph_store::{InMemoryGraphStore, Neo4jGraphStore},
    loader::{self, GraphLoader, LoadReport},
    server::{self, DocumentStore, InMemoryDocumentStore, MongoDocumentStore},
};

/// flightgraph - synthetic flight passengers, graph loading and flight statistics
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write a random flight-passenger CSV
    Generate {
        /// Output CSV file
        #[arg(short, long, default_value = "flight_passengers.csv")]
        output: PathBuf,

        /// Number of data rows
        #[arg(short, long, default_value_t = 100)]
        rows: usize,
    },

    /// Load a flight-passenger CSV into the graph
    Load {
        /// CSV file to load
        csv: PathBuf,

        /// Built-in schema name or path to a schema YAML file
        #[arg(long, default_value = "flight_passengers")]
        schema: String,

        /// Load into an in-memory graph and print the resulting counts
        #[arg(long)]
        dry_run: bool,
    },

    /// Print node and relationship counts from the graph
    Stats {
        /// Built-in schema name or path to a schema YAML file
        #[arg(long, default_value = "flight_passengers")]
        schema: String,
    },

    /// Run the flight document service
    Serve {
        /// HTTP server host address (overrides FLIGHTGRAPH_HOST)
        #[arg(long)]
        http_host: Option<String>,

        /// HTTP server port (overrides FLIGHTGRAPH_PORT)
        #[arg(long)]
        http_port: Option<u16>,

        /// Keep documents in memory instead of MongoDB
        #[arg(long)]
        memory: bool,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Initialize logger - defaults to INFO level, can be overridden with RUST_LOG env var
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if let Err(e) = run(cli.command).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Generate { output, rows } => {
            println!("Generating {} rows into {}", rows, output.display());
            generator::generate(&output, rows)?;
            println!("Dataset written to {}", output.display());
        }
        Command::Load {
            csv,
            schema,
            dry_run,
        } => {
            let schema = LoadSchema::resolve(&schema)?;
            if dry_run {
                let loader = GraphLoader::new(InMemoryGraphStore::new(), schema);
                let report = loader.load(&csv).await?;
                print_report(&report);
                let summary = loader::summarize(loader.store(), loader.schema()).await?;
                print!("{}", summary);
            } else {
                let store = connect_graph_store().await?;
                let loader = GraphLoader::new(store, schema);
                let report = loader.load(&csv).await?;
                print_report(&report);
            }
        }
        Command::Stats { schema } => {
            let schema = LoadSchema::resolve(&schema)?;
            let store = connect_graph_store().await?;
            let summary = loader::summarize(&store, &schema).await?;
            print!("{}", summary);
        }
        Command::Serve {
            http_host,
            http_port,
            memory,
        } => {
            let config = ServerConfig::from_env()?.with_overrides(http_host, http_port)?;
            let documents: Arc<dyn DocumentStore> = if memory {
                log::warn!("Using the in-memory document store; documents are lost on exit");
                Arc::new(InMemoryDocumentStore::new())
            } else {
                let mongo_config = DocumentStoreConfig::from_env()?;
                Arc::new(
                    MongoDocumentStore::connect(&mongo_config)
                        .await
                        .with_context(|| format!("connecting to {}", mongo_config.uri))?,
                )
            };
            server::run_with_config(config, documents).await?;
        }
    }
    Ok(())
}

async fn connect_graph_store() -> anyhow::Result<Neo4jGraphStore> {
    let config = GraphStoreConfig::from_env()?;
    log::info!("Connecting to Neo4j at {}", config.uri);
    let store = Neo4jGraphStore::connect(&config)
        .await
        .with_context(|| format!("connecting to {}", config.uri))?;
    Ok(store)
}

fn print_report(report: &LoadReport) {
    println!(
        "Loaded {} rows with schema `{}`: {} node upserts, {} relationship upserts, {} already present",
        report.rows,
        report.schema,
        report.node_upserts,
        report.relationship_upserts,
        report.constraint_conflicts
    );
    for (airport, count) in &report.connections_by_airport {
        println!("  {} connecting passengers from {}", count, airport);
    }
}
