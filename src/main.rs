//! Binary entry point: parse flags, start file logging, open and migrate the
//! database, optionally seed it, then hand the terminal to the menu.
use anyhow::Context;
use clap::Parser;
use log::info;

use playlist_manager::config::Config;
use playlist_manager::db::schema;
use playlist_manager::logging::init_logging;
use playlist_manager::seed::seed_if_empty;
use playlist_manager::{run_app, Database};

fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    let _logger = init_logging(&config.log_level, &config.log_dir)?;
    info!("starting with {config:?}");

    let mut db = Database::open(&config.db)
        .with_context(|| format!("failed to open database {}", config.db.display()))?;
    schema::initialize(&db).context("failed to initialize schema")?;
    info!("tables: {}", schema::table_names(&db)?.join(", "));

    if config.seed && seed_if_empty(&db)? {
        println!("Sample library added.");
    }

    let result = run_app(&db);
    db.disconnect().context("failed to close database")?;
    info!("shutdown complete");
    result
}
