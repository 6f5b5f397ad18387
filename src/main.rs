mod admin;
mod appointment;
mod config;
mod database;
mod error;
mod models;
mod patient;
mod protocol;
mod schedule;
mod utils;

use anyhow::Context;
use chrono::Local;
use log::info;
use std::io;

use crate::{
    config::Config,
    database::{seed::seed_defaults, Store},
    protocol::{Console, Session},
};

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = Config::from_env().context("invalid configuration")?;
    let store = Store::open(&config.data_dir)?;
    if config.seed_defaults {
        seed_defaults(&store).context("seed default roster")?;
    }
    info!(
        "data directory {}, {} minute slots",
        store.dir().display(),
        config.slot_minutes
    );

    let stdin = io::stdin();
    let stdout = io::stdout();
    let console = Console::new(stdin.lock(), stdout.lock());
    let today = Local::now().date_naive();
    Session::new(&store, &config, console, today).run()
}
