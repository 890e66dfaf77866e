use brewenv::cli::Args;
use brewenv::config::{load_settings_from, settings_schema};
use brewenv::startup;
use brewenv::utils::logger::init_logging;
use clap::Parser;
use tracing::error;

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if args.schema {
        match settings_schema() {
            Ok(schema) => println!("{}", schema),
            Err(e) => {
                eprintln!("Error rendering schema: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    let settings = match load_settings_from(args.config) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = init_logging(&settings.logging) {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    if args.check {
        match serde_json::to_string_pretty(&settings.environment) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error printing configuration: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    if let Err(e) = startup::run(settings).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}
