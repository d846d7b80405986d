//! CauseMap CLI
//!
//! Generate or load an event graph and run queries against it. Every command
//! prints JSON to stdout.

use std::path::Path;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use causemap::config::{GenerationConfig, DEFAULT_EVENT_COUNT};
use causemap::error::{CauseMapError, Result};
use causemap::graph::{geo_events, timeline, CategorySelection, GraphFilter, Period, ALL_CATEGORIES};
use causemap::loader::load_events;
use causemap::tags::{TagAggregator, TagConfig};
use causemap::tree::TreeBuilder;
use causemap::{CategoryRegistry, EventId, GraphData};

#[derive(Parser)]
#[command(name = "causemap")]
#[command(about = "Historical event graph CLI")]
#[command(version)]
struct Cli {
    /// Event file to load instead of generating a dataset
    #[arg(long, env = "CAUSEMAP_INPUT")]
    input: Option<String>,

    /// Number of events to generate
    #[arg(short = 'n', long, env = "CAUSEMAP_EVENT_COUNT", default_value_t = DEFAULT_EVENT_COUNT)]
    count: usize,

    /// Seed for a reproducible dataset
    #[arg(long, env = "CAUSEMAP_SEED")]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the whole dataset as {nodes, links}
    Generate,
    /// Show graph statistics
    Stats,
    /// Filter the graph
    Filter {
        /// Categories (comma-separated, or ALL)
        #[arg(short, long, default_value = ALL_CATEGORIES)]
        categories: String,
        /// Name substring (case-insensitive)
        #[arg(short, long)]
        search: Option<String>,
        /// Period preset (WWI, WWII, "Cold War", Modern, All)
        #[arg(short, long)]
        period: Option<Period>,
        /// First year (inclusive)
        #[arg(long)]
        start_year: Option<i32>,
        /// Last year (inclusive)
        #[arg(long)]
        end_year: Option<i32>,
        /// Only events with importance above 80
        #[arg(long)]
        important: bool,
        /// Only events from the last ten years
        #[arg(long)]
        recent: bool,
    },
    /// Show an event with its direct neighbors
    Neighbors {
        /// Event ID
        id: EventId,
    },
    /// List events ordered by year
    Timeline,
    /// Place events on the world map
    Geo,
    /// Build the tag cloud
    Tags {
        /// Maximum number of tags
        #[arg(short, long, default_value = "100")]
        limit: usize,
        /// Categories to draw terms from (comma-separated, or ALL)
        #[arg(short, long, default_value = ALL_CATEGORIES)]
        categories: String,
    },
    /// Build the event tree
    Tree {
        /// Restrict to one category (or ALL)
        #[arg(short, long, default_value = ALL_CATEGORIES)]
        category: String,
    },
    /// List the category registry
    Categories,
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false),
        )
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let registry = CategoryRegistry::default();

    if let Commands::Categories = cli.command {
        return print_json(&registry);
    }

    let graph = match &cli.input {
        Some(path) => {
            // Expand ~ in path
            let path = shellexpand::tilde(path).to_string();
            load_events(Path::new(&path), &registry)?
        }
        None => {
            let config = GenerationConfig::default()
                .with_count(cli.count)
                .with_seed(cli.seed);
            let mut rng = config.rng();
            GraphData::generate(&registry, &config, &mut rng)?
        }
    };

    match cli.command {
        Commands::Generate => print_json(&graph)?,
        Commands::Stats => print_json(&graph.stats(&registry))?,
        Commands::Filter {
            categories,
            search,
            period,
            start_year,
            end_year,
            important,
            recent,
        } => {
            let mut filter =
                GraphFilter::new().with_categories(CategorySelection::parse(&categories));
            if let Some(search) = search {
                filter = filter.with_search(search);
            }
            if let Some(period) = period {
                filter = filter.with_period(period);
            }
            if let Some(start) = start_year {
                filter = filter.with_start_year(start);
            }
            if let Some(end) = end_year {
                filter = filter.with_end_year(end);
            }
            if important {
                filter = filter.important();
            }
            if recent {
                filter = filter.recent_from_now();
            }
            print_json(&graph.filter(&filter))?;
        }
        Commands::Neighbors { id } => {
            if graph.event(id).is_none() {
                return Err(CauseMapError::NotFound(id));
            }
            print_json(&graph.neighborhood(id))?;
        }
        Commands::Timeline => print_json(&timeline(&graph.nodes))?,
        Commands::Geo => print_json(&geo_events(&graph.nodes))?,
        Commands::Tags { limit, categories } => {
            let aggregator = TagAggregator::new(TagConfig {
                limit,
                ..Default::default()
            });
            let filter =
                GraphFilter::new().with_categories(CategorySelection::parse(&categories));
            print_json(&aggregator.aggregate(filter.apply(&graph.nodes)))?;
        }
        Commands::Tree { category } => {
            let category = (category != ALL_CATEGORIES).then_some(category.as_str());
            let tree = TreeBuilder::default().build(&graph.nodes, &graph.links, category);
            print_json(&tree)?;
        }
        Commands::Categories => print_json(&registry)?,
    }

    Ok(())
}
