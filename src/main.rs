use anyhow::Context;
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use pgraph_rs::dfp::Factory;
use pgraph_rs::pgrapher::{nodes, GraphConfig, GraphLoader, NodeRegistry, Pgrapher};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build a graph from a file and run it until it is quiescent
    Run {
        /// Path to the graph description (YAML, or JSON with a .json extension)
        #[arg(short, long)]
        file: String,
    },
    /// Build a graph from a file and check it without running
    Validate {
        /// Path to the graph description
        #[arg(short, long)]
        file: String,
    },
    /// List the node categories the factory can wrap
    Categories,
}

fn build(file: &str) -> anyhow::Result<(GraphConfig, Pgrapher)> {
    let config = GraphLoader::new()
        .load(file)
        .with_context(|| format!("Failed to load graph description {}", file))?;

    let mut registry = NodeRegistry::new();
    nodes::register_builtins(&mut registry, &config.nodes)?;
    log::info!("Registered nodes: {:?}", registry.names());

    let mut pgrapher = Pgrapher::new();
    pgrapher
        .configure(&config, &registry)
        .with_context(|| format!("Failed to configure graph '{}'", config.name))?;
    Ok((config, pgrapher))
}

fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    let args = Args::parse();

    match args.command {
        Commands::Run { file } => {
            let (config, mut pgrapher) = build(&file)?;
            println!("Running graph: {}", config.name);
            let report = pgrapher.execute()?;
            println!(
                "Quiescent after {} steps ({} invocations, {} sweeps), {} item(s) left queued",
                report.steps,
                report.invocations,
                report.sweeps,
                pgrapher.graph().queued()
            );
        }
        Commands::Validate { file } => {
            let (config, pgrapher) = build(&file)?;
            println!(
                "Graph '{}' is valid: {} nodes, {} edges",
                config.name,
                pgrapher.graph().len(),
                pgrapher.graph().connections().len()
            );
        }
        Commands::Categories => {
            for category in Factory::new().categories() {
                println!("{}", category);
            }
        }
    }

    Ok(())
}
