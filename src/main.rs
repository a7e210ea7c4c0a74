use clap::Parser;
use exn::ResultExt;
use magview::cli::{Cli, Command};
use magview::commands;
use magview::error::{ErrorKind, Result};
use magview::logging;
use magview_config::Config;
use magview_search::BackendHandle;
use magview_search::backend::HttpBackend;
use std::process::ExitCode;
use std::sync::Arc;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::FAILURE
        },
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref()).or_raise(|| ErrorKind::Config)?;
    logging::init(&config.log.level, cli.verbose);
    tracing::debug!(base_url = %config.api.base_url, "Configuration loaded");

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .or_raise(|| ErrorKind::Runtime)?;
    runtime.block_on(dispatch(cli.command, &config))
}

async fn dispatch(command: Command, config: &Config) -> Result<()> {
    let http = Arc::new(HttpBackend::new(&config.api.base_url, config.timeout()).or_raise(|| ErrorKind::Search)?);
    let handle: BackendHandle = http.clone();
    let backend = handle.as_ref();
    let mut stdout = std::io::stdout().lock();
    match command {
        Command::Search(args) => {
            let summary = commands::search(backend, &args, config.api.page_size, None, &mut stdout).await?;
            tracing::info!(pages = summary.pages, records = summary.records, exhausted = summary.exhausted, "Search finished");
        },
        Command::Torrent { info_hash, widget } => {
            commands::torrent(backend, &info_hash, widget, &mut stdout).await?;
        },
        Command::Stats { n, unit } => {
            commands::stats(backend, n, &unit, &mut stdout).await?;
        },
        Command::Feed { query } => {
            commands::feed(&http, query.as_deref(), &mut stdout)?;
        },
    }
    Ok(())
}
