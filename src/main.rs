use clap::Parser;
use console::style;
use tracing_subscriber::EnvFilter;

use mcpchat::app::Application;
use mcpchat::cli::Args;
use mcpchat::commands::create_command_registry;
use mcpchat::config::Config;
use mcpchat::core::error::ChatError;

fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "mcpchat=debug" } else { "mcpchat=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(args: Args) -> Result<(), ChatError> {
    let config = Config::load(args.config.as_deref())?;
    let app = Application::new(args, config, create_command_registry())?;
    app.run().await
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Err(e) = run(args).await {
        eprintln!("{} {}", style("Error:").bold().red(), e);
        std::process::exit(1);
    }
}
