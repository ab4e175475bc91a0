use clap::Parser;
use httpscout::cli::{Cli, Commands};
use httpscout::output;
use httpscout::scanner::CancellationFlag;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "HTTPSCOUT_LOGLEVEL";

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let cancel = CancellationFlag::new();
    tokio::spawn(watch_interrupts(cancel.clone()));

    let result = match &cli.command {
        Commands::Scan(cmd) => {
            cmd.execute(cli.verbose, cli.quiet, cli.config.as_deref(), cancel)
                .await
        }
        Commands::Catalog(cmd) => {
            cmd.execute();
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::print_error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

/// Diagnostics go to stderr so they never mix with report output.
fn init_logging(verbose: bool) {
    let default_level = if verbose {
        "httpscout=debug"
    } else {
        "httpscout=warn"
    };
    let filter = std::env::var("RUST_LOG")
        .or_else(|_| std::env::var(LOG_ENV))
        .unwrap_or_else(|_| default_level.to_string());

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(EnvFilter::new(filter))
        .init();
}

/// Turn Ctrl+C (and SIGTERM on unix) into a cancellation request.
async fn watch_interrupts(cancel: CancellationFlag) {
    loop {
        if wait_for_signal().await.is_err() {
            return;
        }
        if cancel.cancel() {
            output::print_warning("Interrupted, finishing in-flight hosts...");
        }
    }
}

#[cfg(unix)]
async fn wait_for_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut term = signal(SignalKind::terminate())?;
    tokio::select! {
        res = tokio::signal::ctrl_c() => res,
        _ = term.recv() => Ok(()),
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}
