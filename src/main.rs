use clap::Parser;
use cquote::cli::{Cli, Commands};
use cquote::config::Config;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(&cli.config).unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config from {}: {}", cli.config, e);
        eprintln!("Using default configuration");
        Config::default()
    });

    // Initialize telemetry
    cquote::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Quote(args) => args.execute(&config)?,
        Commands::Price(args) => args.execute()?,
        Commands::Clevel(args) => args.execute(&config)?,
        Commands::Roll(args) => args.execute(&config)?,
        Commands::Cdf { x } => {
            let x = cquote::cli::to_fixed(x, "x")?;
            println!("{}", cquote::model::normal_cdf(x)?);
        }
        Commands::Config => {
            println!("Current configuration:");
            print!("{}", toml::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
