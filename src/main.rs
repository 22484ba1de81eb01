//! Slugging prediction CLI
//!
//! Harvest a season of play-by-play data, export the feature table, and
//! train the slugging regression model.

use clap::{Parser, Subcommand};
use slugger::{Config, Result};

#[derive(Parser)]
#[command(name = "slugger")]
#[command(about = "Predict slugging outcomes from pitch and hit physics", long_about = None)]
struct Cli {
    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a default config file
    Init,
    /// Fetch a season's play-by-play and export the feature dataset
    Build {
        /// Season year, e.g. 2023
        #[arg(long)]
        season: String,
        /// Output CSV path (defaults to the configured template)
        #[arg(long)]
        output: Option<String>,
        /// Abort on the first failed game fetch instead of skipping
        #[arg(long)]
        fail_fast: bool,
    },
    /// Train and evaluate the model on an exported dataset
    Train {
        /// Dataset CSV path
        #[arg(long)]
        input: String,
    },
    /// Build the dataset and train in one run
    Run {
        /// Season year, e.g. 2023
        #[arg(long)]
        season: String,
        /// Output CSV path (defaults to the configured template)
        #[arg(long)]
        output: Option<String>,
        /// Abort on the first failed game fetch instead of skipping
        #[arg(long)]
        fail_fast: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    let config = if std::path::Path::new(&cli.config).exists() {
        match Config::load(&cli.config) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        Config::default()
    };

    let result = match cli.command {
        Commands::Init => commands::init(&cli.config),
        Commands::Build {
            season,
            output,
            fail_fast,
        } => commands::build(&config, &season, output.as_deref(), fail_fast).map(|_| ()),
        Commands::Train { input } => commands::train(&config, &input),
        Commands::Run {
            season,
            output,
            fail_fast,
        } => commands::run(&config, &season, output.as_deref(), fail_fast),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

mod commands {
    use super::*;
    use slugger::data::{Dataset, DatasetBuilder, StatsApi};
    use slugger::training::train_and_evaluate;
    use slugger::GamePk;

    pub fn init(config_path: &str) -> Result<()> {
        let config = Config::default();
        config.save(config_path)?;
        println!("Created default config at {}", config_path);
        println!("\nNext steps:");
        println!("  1. Edit {} to customize settings", config_path);
        println!("  2. Run 'slugger build --season 2023' to fetch a season");
        println!("  3. Run 'slugger train --input data/slg_2023.csv'");
        Ok(())
    }

    pub fn build(
        config: &Config,
        season: &str,
        output: Option<&str>,
        fail_fast: bool,
    ) -> Result<Dataset> {
        let api = StatsApi::new(&config.api)?;

        let games = api.season_games(season)?;
        log::info!("Season {}: {} scheduled games", season, games.len());
        let game_pks: Vec<GamePk> = games.iter().map(|g| g.game_pk).collect();

        let mut builder = DatasetBuilder::new(&api);
        if fail_fast || !config.api.skip_failed_games {
            builder = builder.fail_fast();
        }
        let dataset = builder.build(&game_pks)?;

        let path = output
            .map(String::from)
            .unwrap_or_else(|| config.data.dataset_path(season));
        dataset.write_csv(&path)?;
        println!(
            "Exported {} rows to {} ({} plays dropped)",
            dataset.len(),
            path,
            dataset.dropped()
        );

        Ok(dataset)
    }

    pub fn train(config: &Config, input: &str) -> Result<()> {
        let dataset = Dataset::read_csv(input)?;
        log::info!("Loaded {} rows from {}", dataset.len(), input);

        let report = train_and_evaluate(&dataset, &config.training, &config.model)?;
        print!("{}", report);
        Ok(())
    }

    pub fn run(
        config: &Config,
        season: &str,
        output: Option<&str>,
        fail_fast: bool,
    ) -> Result<()> {
        let dataset = build(config, season, output, fail_fast)?;
        let report = train_and_evaluate(&dataset, &config.training, &config.model)?;
        print!("{}", report);
        Ok(())
    }
}
