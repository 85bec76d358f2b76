//! # Gradeline Main Entry Point
//!
//! Loads the profile, connects the controller to the grade-book API and
//! runs the command loop on stdin/stdout.

use anyhow::Result;
use gradeline::cmd_args::CommandLineArgs;
use gradeline::config::{get_profile_path, ClientProfile, LOG_LEVEL_ENV_VAR};
use gradeline::{
    AppController, DefaultGradesRepository, GradesController, GradesRepository, HttpRemoteClient,
};
use std::sync::Arc;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let args = CommandLineArgs::parse();
    init_tracing(args.verbose());

    let profile = ClientProfile::load(args.profile(), &get_profile_path())?
        .with_base_url_override(args.base_url());
    tracing::info!("Using grade-book API at {}", profile.base_url);

    let client = HttpRemoteClient::new(&profile.base_url, profile.timeout)?;
    let repository: Arc<dyn GradesRepository> = Arc::new(DefaultGradesRepository::new(client));
    let controller = GradesController::start_with_options(repository, profile.controller_options());

    println!("Gradeline - connected to {}", profile.base_url);
    println!("Type 'help' for a list of commands\n");

    let input = tokio::io::BufReader::new(tokio::io::stdin());
    let mut app = AppController::new(controller, input, std::io::stdout());
    app.run().await?;

    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_LEVEL_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(ChronoLocal::rfc_3339())
        .with_writer(std::io::stderr)
        .init();
}
