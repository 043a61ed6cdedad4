mod contact;
mod feed;
mod geo;
mod session;
mod view;
mod web;

use clap::{Parser, Subcommand};
use std::process::ExitCode;
use std::time::Duration;

use crate::contact::ContactStore;
use crate::feed::{ConnectionState, FeedConnector};
use crate::view::table;
use crate::web::Config;

#[derive(Parser)]
#[command(name = "adsb-monitor")]
#[command(about = "Live ADS-B contact table and map")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect to the feed and serve the dashboard
    Serve { config: String },
    /// Validate a configuration file
    Validate { config: String },
    /// Print the contact table once the first snapshot arrives
    Snapshot {
        config: String,
        /// How long to wait for the first snapshot
        #[arg(long, default_value = "30s", value_parser = humantime::parse_duration)]
        wait: Duration,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { config } => validate(&config),
        Commands::Serve { config } => with_runtime(serve(&config)),
        Commands::Snapshot { config, wait } => with_runtime(snapshot(&config, wait)),
    }
}

fn with_runtime(task: impl std::future::Future<Output = ExitCode>) -> ExitCode {
    match tokio::runtime::Runtime::new() {
        Ok(rt) => rt.block_on(task),
        Err(e) => {
            eprintln!("Cannot start runtime: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_config(path: &str) -> Option<Config> {
    let config = match Config::from_file(path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            return None;
        }
    };
    if let Err(e) = config.validate() {
        eprintln!("Invalid config: {}", e);
        return None;
    }
    Some(config)
}

fn validate(path: &str) -> ExitCode {
    let Some(config) = load_config(path) else {
        return ExitCode::FAILURE;
    };
    println!("Config is valid");
    println!("  feed: {}", config.feed.url());
    println!("  bind: {}", config.web.bind);
    println!(
        "  staleness threshold: {}s",
        config.session.staleness_threshold_s
    );
    match (&config.location.coordinates, &config.location.geolocation_url) {
        (Some(c), _) => println!("  map center: {}", c),
        (None, Some(url)) => println!("  map center: lookup via {}", url),
        (None, None) => println!("  map center: default"),
    }
    ExitCode::SUCCESS
}

async fn serve(path: &str) -> ExitCode {
    let Some(config) = load_config(path) else {
        return ExitCode::FAILURE;
    };
    match web::run_server(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn snapshot(path: &str, wait: Duration) -> ExitCode {
    let Some(config) = load_config(path) else {
        return ExitCode::FAILURE;
    };

    let store = ContactStore::new();
    let mut updates = store.subscribe();
    let mut feed = FeedConnector::new(config.feed.clone(), store.clone());
    let mut status = feed.status();
    if let Err(e) = feed.activate() {
        eprintln!("Cannot connect: {}", e);
        return ExitCode::FAILURE;
    }

    let received = tokio::select! {
        changed = tokio::time::timeout(wait, updates.changed()) => matches!(changed, Ok(Ok(()))),
        _ = status.wait_for(|s| s.state == ConnectionState::Closed) => store.current().is_some(),
    };
    feed.deactivate().await;

    if !received {
        let status = feed.status().borrow().clone();
        match status.last_error {
            Some(e) => eprintln!("No snapshot received: {}", e),
            None => eprintln!("No snapshot received within {}", humantime::format_duration(wait)),
        }
        return ExitCode::FAILURE;
    }

    let current = store.current();
    print!(
        "{}",
        table::derive(current.as_deref(), config.session.staleness_threshold_s).to_text()
    );
    ExitCode::SUCCESS
}
