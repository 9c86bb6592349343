use anyhow::Result;
use clap::{Parser, Subcommand};

use wave::cli;

#[derive(Debug, Parser)]
#[command(name = "wave")]
#[command(about = "Wave Pagamentos dashboard backend with a simulated sales feed")]
struct App {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Serve the dashboard and JSON API with the live ticker running
    Serve {
        /// Listen address, overrides server.addr
        #[arg(long)]
        addr: Option<String>,
        /// Do not open a browser tab on startup
        #[arg(long)]
        no_browser: bool,
    },
    /// Run the metrics feed for N ticks and print every update
    Simulate {
        /// Number of ticks to run
        #[arg(long, default_value = "10")]
        ticks: u64,
        /// RNG seed for a reproducible run
        #[arg(long)]
        seed: Option<u64>,
        /// Output format: table (default), json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Ask Wave IA for copy or a strategy suggestion
    Ai {
        /// copy or strategy
        #[arg(default_value = "copy")]
        category: String,
        /// headline, email, vsl, landing, ads or checkout
        #[arg(long)]
        copy_type: Option<String>,
        /// Free-form question
        #[arg(long, default_value = "")]
        prompt: String,
        /// Product name
        #[arg(long)]
        name: Option<String>,
        /// Product description
        #[arg(long)]
        description: Option<String>,
        /// Product price, e.g. "R$ 497"
        #[arg(long)]
        price: Option<String>,
        /// Target audience
        #[arg(long)]
        target: Option<String>,
        /// Call the configured edge endpoint instead of answering locally
        #[arg(long)]
        remote: bool,
    },
    /// Show /wave-ai request statistics
    Stats {
        /// Output format: table (default), json, csv
        #[arg(long, default_value = "table")]
        format: String,
        /// Only include the last N days of data
        #[arg(long)]
        days: Option<u32>,
    },
    /// Inspect or edit configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Print the effective configuration and its sources
    Show,
    /// Write a default ~/.wave/config.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Set a dotted key, e.g. `simulator.tick_ms 2000`
    Set { key: String, value: String },
    /// Restore the default configuration file
    Reset,
}

fn main() -> Result<()> {
    let app = App::parse();

    match app.command {
        Commands::Serve { addr, no_browser } => cli::run_serve(addr, no_browser),
        Commands::Simulate {
            ticks,
            seed,
            format,
        } => {
            let fmt = cli::OutputFormat::from_str_opt(Some(&format));
            cli::run_simulate(ticks, seed, fmt)
        }
        Commands::Ai {
            category,
            copy_type,
            prompt,
            name,
            description,
            price,
            target,
            remote,
        } => cli::run_ai(&cli::AiArgs {
            category,
            copy_type,
            prompt,
            name,
            description,
            price,
            target,
            remote,
        }),
        Commands::Stats { format, days } => {
            let fmt = cli::OutputFormat::from_str_opt(Some(&format));
            cli::run_stats(fmt, days)
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => cli::run_config_show(),
            ConfigAction::Init { force } => cli::run_config_init(force),
            ConfigAction::Set { key, value } => cli::run_config_set(&key, &value),
            ConfigAction::Reset => cli::run_config_reset(),
        },
    }
}
