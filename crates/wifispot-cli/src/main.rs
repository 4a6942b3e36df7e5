use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use wifispot_cli::output::OutputFormat;

mod commands;

use commands::{AppContext, FilterArgs, PageArgs};

#[derive(Parser, Debug)]
#[command(author, version, about = "Find NYC public WiFi spots and plan walking routes")]
struct Cli {
    /// Override the dataset directory or file path.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    /// Skip the external geocoder; only ZIP codes present in the dataset resolve to a location.
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Ensure the dataset is downloaded and report its location.
    Download,
    /// Search by place, address, ZIP code, or free text.
    Search {
        /// Place name, address, ZIP code, or text to match.
        query: String,
        /// Proximity radius in miles (default 2).
        #[arg(long)]
        radius: Option<f64>,
        #[command(flatten)]
        page: PageArgs,
    },
    /// List spots near a position, nearest first.
    Near {
        /// Latitude of the current position.
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        /// Longitude of the current position.
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
        /// Proximity radius in miles (default 2).
        #[arg(long)]
        radius: Option<f64>,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Filter spots by borough, type, and text.
    Filter {
        #[command(flatten)]
        filters: FilterArgs,
        #[command(flatten)]
        page: PageArgs,
    },
    /// List the borough and type values available for filtering.
    Vocab,
    /// Plan a walking route through 2 to 5 spots, in the order given.
    Route {
        /// Spot identifiers as shown in search results.
        #[arg(long = "spot", required = true, num_args = 1..)]
        spots: Vec<usize>,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let context = AppContext::new(cli.data_dir, cli.format, cli.offline);

    match cli.command {
        Command::Download => commands::download::handle_download(&context),
        Command::Search {
            query,
            radius,
            page,
        } => commands::search::handle_search(&context, &query, radius, page),
        Command::Near {
            lat,
            lng,
            radius,
            page,
        } => commands::search::handle_near(&context, lat, lng, radius, page),
        Command::Filter { filters, page } => {
            commands::search::handle_filter(&context, filters, page)
        }
        Command::Vocab => commands::vocab::handle_vocab(&context),
        Command::Route { spots } => commands::route::handle_route(&context, &spots),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
