mod app;
mod cli;
mod config;
mod effects;
mod ui;

use std::io::{self, BufRead};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::mpsc;
use std::thread;

use anyhow::Context;
use log::LevelFilter;
use torahdl_engine::EngineHandle;
use torahdl_logging::{torahdl_info, LogDestination, DEFAULT_LOG_FILE};

pub use cli::Cli;

use app::Session;
use cli::LogTarget;
use config::{config_path, AppConfig};
use effects::EffectRunner;

pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    initialize_logging(&cli);

    let config = AppConfig::load(&config_path(&cli)).with_overrides(&cli);
    torahdl_info!("Using extraction API at {}", config.api_base_url);

    let engine =
        EngineHandle::new(config.engine_settings()).context("Failed to start the engine")?;
    let mut session = Session::new(EffectRunner::new(engine), io::stdout());

    if cli.sites {
        session.list_sites_once()?;
        return Ok(ExitCode::SUCCESS);
    }

    if let Some(url) = cli.url.as_deref() {
        let ok = session.run_once(url, &cli.one_shot())?;
        return Ok(if ok {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        });
    }

    session.run_interactive(spawn_stdin_reader())?;
    Ok(ExitCode::SUCCESS)
}

fn initialize_logging(cli: &Cli) {
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let log_file = PathBuf::from(DEFAULT_LOG_FILE);
    let destination = match cli.log {
        LogTarget::File => LogDestination::File(log_file),
        LogTarget::Terminal => LogDestination::Terminal,
        LogTarget::Both => LogDestination::Both(log_file),
    };
    torahdl_logging::initialize(destination, level);
}

fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}
