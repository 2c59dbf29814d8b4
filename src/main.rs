use std::{process, rc::Rc};

use clap::Parser;
use keepsake::{App, Cli, Config, FileStore, Journal, Result};
use log::{error, info};

pub fn initialize_logger(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_secs()
        .format_module_path(true)
        .init();

    info!("Logger initialized");
}

fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.unwrap_or_else(Config::default_path);
    let mut config = Config::load(&config_path)?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }

    let store = FileStore::open(&config.data_dir)?;
    let journal = Journal::open(Rc::new(store));

    let mut app = App::new(journal, config, config_path, cli.verbose);
    app.run(cli.command)
}

fn main() {
    let cli = Cli::parse();
    initialize_logger(cli.verbose);

    info!("Application starting up");

    if let Err(e) = run(cli) {
        error!("{}", e);
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    info!("Application shutting down");
}
