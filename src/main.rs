use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use vastsilicon_site::config::{AppState, Config};
use vastsilicon_site::content::CheckOutcome;
use vastsilicon_site::{logger, server};

#[derive(Parser)]
#[command(name = "vastsilicon-site", version, about = "Site server for vastsilicon.com")]
struct Cli {
    /// Configuration file path, without extension
    #[arg(long, default_value = "config")]
    config: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Clone, Copy)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Load every content record and report what would be served
    Check,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let cfg = Config::load_from(&cli.config)?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            // Size the runtime from the workers setting
            let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
            runtime_builder.enable_all();
            if let Some(workers) = cfg.server.workers {
                runtime_builder.worker_threads(workers);
            }
            let runtime = runtime_builder.build()?;
            runtime.block_on(serve(cfg))?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Check => check(&cfg),
    }
}

async fn serve(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    logger::init(&cfg)?;

    let addr = cfg.socket_addr()?;
    let state = Arc::new(AppState::new(&cfg)?);
    let listener = server::create_reusable_listener(addr)?;
    logger::log_server_start(&addr, &cfg);

    let shutdown = server::Shutdown::new();
    server::start_signal_handler(shutdown.clone());
    server::start_server_loop(listener, state, shutdown).await?;

    tracing::info!("Server stopped");
    Ok(())
}

fn check(cfg: &Config) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let state = AppState::new(cfg)?;
    let report = state.resolver.check();

    for entry in &report.entries {
        match &entry.outcome {
            CheckOutcome::Current => println!("ok        {} {}", entry.kind, entry.slug),
            CheckOutcome::Migrated => println!("migrated  {} {}", entry.kind, entry.slug),
            CheckOutcome::Skipped(reason) => {
                println!("skipped   {} {}: {reason}", entry.kind, entry.slug);
            }
        }
    }
    println!(
        "\n{} current, {} migrated, {} skipped",
        report.current(),
        report.migrated(),
        report.skipped()
    );

    if report.skipped() > 0 {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
