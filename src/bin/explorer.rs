//! Schema Explorer CLI
//!
//! Builds the schema model from the configured export and answers one query
//! per invocation. Query results are printed as pretty JSON.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use schema_explorer::{loader, EntityType, ExplorerConfig, SchemaModel};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "schema-explorer")]
#[command(about = "Query a LinkML schema export: details, relationships, used-by")]
struct Cli {
    /// Config file layered over the default locations
    #[arg(short, long)]
    config: Option<String>,

    /// Processed schema JSON (overrides data.schema_path)
    #[arg(short, long)]
    schema: Option<PathBuf>,

    /// Variable spec TSV (overrides data.variables_path)
    #[arg(long)]
    variables: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detail view of one entity
    Show {
        id: String,
    },

    /// Outgoing and incoming relationships of one entity
    Relationships {
        id: String,
    },

    /// Classes using an enum, class, or shared slot as a range
    UsedBy {
        id: String,
    },

    /// All names of one entity type (class, enum, slot, type, variable)
    List {
        entity_type: String,
    },

    /// Class hierarchy, depth-first
    Tree,

    /// Fuzzy search over every entity name
    Search {
        query: String,
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Print data-integrity diagnostics
    Check {
        /// Exit non-zero when any warning was recorded
        #[arg(long)]
        strict: bool,
    },

    /// Export the relationship graph as GraphViz DOT
    Dot {
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    let config = match ExplorerConfig::load_from(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli, config) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli, mut config: ExplorerConfig) -> anyhow::Result<()> {
    if let Some(schema) = cli.schema {
        config.data.schema_path = schema;
    }
    if let Some(variables) = cli.variables {
        config.data.variables_path = Some(variables);
    }

    let bundle = loader::load_bundle(&config)?;
    let model = SchemaModel::build_with(&bundle.schema, &bundle.variables, &config)
        .context("Failed to build schema model")?;

    match cli.command {
        Commands::Show { id } => {
            let detail = model
                .detail_data(&id)
                .with_context(|| format!("No entity named '{}'", id))?;
            print_json(&detail)
        }

        Commands::Relationships { id } => {
            if !model.item_exists(&id) {
                anyhow::bail!("No entity named '{}'", id);
            }
            print_json(&model.relationships(&id))
        }

        Commands::UsedBy { id } => print_json(&model.used_by(&id)),

        Commands::List { entity_type } => {
            let kind: EntityType = entity_type.parse()?;
            print_json(&model.all_of_type(kind))
        }

        Commands::Tree => print_json(&model.class_tree()),

        Commands::Search { query, limit } => print_json(&model.search(&query, limit)),

        Commands::Check { strict } => {
            let diagnostics = model.diagnostics();
            for item in diagnostics.items() {
                println!("{}", item);
            }
            println!();
            println!(
                "{} classes, {} enums, {} slots, {} types, {} variables",
                model.all_of_type(EntityType::Class).len(),
                model.all_of_type(EntityType::Enum).len(),
                model.all_of_type(EntityType::Slot).len(),
                model.all_of_type(EntityType::Type).len(),
                model.all_of_type(EntityType::Variable).len(),
            );
            println!("bundle hash: {}", bundle.bundle_hash);

            if diagnostics.is_empty() {
                println!("✅ No issues found");
                return Ok(());
            }
            for (code, count) in diagnostics.summary() {
                println!("  {} {:?}: {}", code, code, count);
            }
            if strict {
                std::process::exit(1);
            }
            Ok(())
        }

        Commands::Dot { output } => {
            let dot = model.graph().to_dot();
            match output {
                Some(path) => {
                    std::fs::write(&path, dot)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    eprintln!("✅ Exported DOT to: {}", path.display());
                }
                None => print!("{}", dot),
            }
            Ok(())
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
