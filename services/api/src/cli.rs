use clap::{Args, Parser, Subcommand};
use tariff_ai::config::AppConfig;
use tariff_ai::error::AppError;
use tariff_ai::workflows::billing::{compute_total, compute_water, ConsumerCategory, SewagePercent};

use crate::infra::{parse_category, parse_percent};
use crate::server;

#[derive(Parser, Debug)]
#[command(
    name = "Water Tariff Assistant",
    about = "Run the water utility billing assistant or compute tariffs from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Compute a progressive water charge without starting the service
    Tariff {
        #[command(subcommand)]
        command: TariffCommand,
    },
}

#[derive(Subcommand, Debug)]
enum TariffCommand {
    /// Compute the water charge for a consumption volume
    Compute(ComputeArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

#[derive(Args, Debug)]
struct ComputeArgs {
    /// Consumption volume in cubic meters
    #[arg(long)]
    volume: u32,
    /// Consumer category (residential, commercial, public, industrial, social, vulnerable)
    #[arg(long, value_parser = parse_category)]
    category: ConsumerCategory,
    /// Tariff year (defaults to the configured default year)
    #[arg(long)]
    year: Option<u16>,
    /// Include the sewage surcharge at this percentage (80, 90 or 100)
    #[arg(long, value_parser = parse_percent)]
    sewage: Option<SewagePercent>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Tariff {
            command: TariffCommand::Compute(args),
        } => run_tariff_compute(args),
    }
}

fn run_tariff_compute(args: ComputeArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let year = args.year.unwrap_or(config.tariff.default_year);

    let water = compute_water(args.volume, args.category, year)?;
    println!(
        "Water charge for {} m³ ({}, {}): R$ {}",
        args.volume, args.category, year, water
    );

    if let Some(percent) = args.sewage {
        let breakdown = compute_total(water, percent);
        println!(
            "Sewage at {}: R$ {}",
            breakdown.percent.label(),
            breakdown.sewage
        );
        println!("Total: R$ {}", breakdown.total);
    }

    Ok(())
}
