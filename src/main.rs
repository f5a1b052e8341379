mod cli;
mod config;
mod core;
mod error;
mod graphql;
mod output;
mod pipeline;
mod store;
mod utils;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use config::Config;
use error::AppError;
use graphql::GraphClient;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let config = Config::load();

    // Input validation fails the whole invocation before any pipeline runs.
    let options = match cli.run_options() {
        Ok(options) => options,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    let client = match build_client(&config) {
        Ok(client) => client,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    let summaries = pipeline::run(&options, &config, &client);
    if summaries.len() < options.stores.len() {
        // Some store pipelines failed; their errors are already logged.
        std::process::exit(1);
    }
}

fn build_client(config: &Config) -> Result<GraphClient, AppError> {
    let endpoint = config.endpoint()?;
    Ok(GraphClient::new(endpoint, config.max_inflight)?)
}
