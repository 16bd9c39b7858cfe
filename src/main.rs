use clap::Parser;
use sentiflow::cli::*;
use sentiflow::config::AppConfig;
use sentiflow::Result;
use tracing::info;

fn main() {
    let cli = Cli::parse();

    // Load configuration
    let config = match &cli.config {
        Some(path) => AppConfig::from_file(path),
        None => AppConfig::load(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            print_error(&e.to_string());
            std::process::exit(1);
        }
    };

    // Still single-threaded: safe to touch the environment
    if config.logging.backtrace {
        std::env::set_var("RUST_BACKTRACE", "1");
    }

    let outcome = tokio::runtime::Runtime::new()
        .map_err(sentiflow::SentimentError::from)
        .and_then(|runtime| runtime.block_on(run(cli, config)));

    if let Err(e) = outcome {
        print_error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: AppConfig) -> Result<()> {
    // Initialize logging
    if cli.verbose {
        sentiflow::logging::init_logging_with_level("debug")?;
    } else {
        sentiflow::logging::init_logging_with_config(&config)?;
    }
    info!("Configuration loaded successfully");

    match cli.command {
        Commands::Clean { text, explain } => handle_clean_command(&config, &text, explain),
        Commands::Run {
            goal,
            source,
            append,
        } => handle_run_command(&config, goal, source, append).await,
        Commands::Tables => handle_tables_command(&config),
        Commands::Config => handle_config_command(&config),
    }
}
