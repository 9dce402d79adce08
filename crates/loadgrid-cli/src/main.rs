use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "loadgrid",
    about = "loadgrid: clocked load-balancer farm simulator",
    version,
    propagate_version = true,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a simulation and print its summary.
    ///
    /// The config is a flat key=value file, or TOML when the path ends
    /// in `.toml`.
    Run {
        /// Path to the simulation config
        #[arg(short, long)]
        config: String,
        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
        /// Override the configured seed
        #[arg(long)]
        seed: Option<u64>,
        /// Override the configured simulation length
        #[arg(long)]
        cycles: Option<u64>,
        /// Also write the summary to this file
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Load and validate a config, then print it as TOML
    Check {
        #[arg(short, long)]
        config: String,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,loadgrid=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            format,
            seed,
            cycles,
            output,
        } => commands::run::run(&config, &format, seed, cycles, output.as_deref()),
        Commands::Check { config } => commands::check::check(&config),
    }
}
