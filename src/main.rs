use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::info;

use weatherwise::client::{FormInput, GEOLOCATION_TIMEOUT, TipsClient, TipsSession, acquire_coordinates};
use weatherwise::config::LoggingConfig;
use weatherwise::models::{Focus, TipsResponse, UnitGroup};
use weatherwise::{TipsService, WeatherWiseConfig, logging, web};

#[derive(Parser)]
#[command(name = "weatherwise")]
#[command(about = "Energy saving tips from the weather forecast", version)]
struct CommandLine {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP service (default)
    Serve {
        /// Configuration file (defaults to ./weatherwise.toml)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Request tips from a running service
    Tips(TipsArgs),
}

#[derive(Args)]
struct TipsArgs {
    /// Place name, postal code, ...
    #[arg(long, default_value = "")]
    location: String,
    /// Device latitude, used when no location is given
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    lat: Option<f64>,
    /// Device longitude
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    lon: Option<f64>,
    /// us, metric or uk
    #[arg(long, default_value = "us")]
    unit: UnitGroup,
    /// thermostat, sprinklers or solar; repeatable
    #[arg(long)]
    focus: Vec<Focus>,
    #[arg(long, default_value = "http://127.0.0.1:5000")]
    server: String,
    /// Direct hosts tried when the server is behind a proxy that refuses us
    #[arg(long = "fallback-host")]
    fallback_hosts: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CommandLine::parse();

    match cli.command.unwrap_or(Commands::Serve { config: None }) {
        Commands::Serve { config } => serve(config).await,
        Commands::Tips(args) => tips(args).await,
    }
}

async fn serve(config_path: Option<PathBuf>) -> anyhow::Result<()> {
    let config = WeatherWiseConfig::load_from_path(config_path)?;
    logging::init(&config.logging);
    info!("Starting WeatherWise {} ({:?})", weatherwise::VERSION, config.environment);

    let service = TipsService::from_config(&config)?;
    web::run(&config.server, service).await
}

async fn tips(args: TipsArgs) -> anyhow::Result<()> {
    logging::init(&LoggingConfig {
        level: "warn".to_string(),
        ..LoggingConfig::default()
    });

    let client = TipsClient::new(&args.server, args.fallback_hosts)?;
    let mut session = TipsSession::new(client);

    if let (Some(lat), Some(lon)) = (args.lat, args.lon) {
        if let Some(coordinates) = acquire_coordinates(async move { Ok((lat, lon)) }, GEOLOCATION_TIMEOUT).await {
            session.set_coordinates(coordinates);
        }
    }

    let form = FormInput {
        location: args.location,
        unit_group: args.unit,
        focuses: args.focus,
    };

    let response = session
        .submit(&form)
        .await
        .with_context(|| "Could not get tips")?;
    print_cards(response);
    Ok(())
}

fn print_cards(response: &TipsResponse) {
    println!("Tips for {} ({})", response.location, response.unit_group);
    for day in &response.days {
        println!();
        println!(
            "{}  {}  {}",
            day.date.format("%a %b %-d"),
            day.weather.description,
            day.weather.format_temperature(response.unit_group)
        );
        println!(
            "  humidity {:.0}%  wind {:.0} mph  precip {:.2} in",
            day.weather.humidity, day.weather.windspeed, day.weather.precip
        );
        for (i, suggestion) in day.suggestions.iter().enumerate() {
            println!("  {}. {}", i + 1, suggestion);
        }
    }
}
