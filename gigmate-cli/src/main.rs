mod commands;
mod config;
mod logging;

use clap::Parser;
use gigmate_chat::{MessageStore, SessionStore, SqliteKv};
use std::sync::Arc;
use tracing::{debug, error};

use crate::commands::{App, Cli};
use crate::config::Config;

fn main() {
    // Missing .env is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let mut config = Config::from_env();
    if let Some(db) = cli.db.clone() {
        config.db_path = db;
    }

    let _log_guard = logging::init(&config);
    debug!("Using database {}", config.db_path.display());

    let kv = match SqliteKv::open(&config.db_path) {
        Ok(kv) => Arc::new(kv),
        Err(e) => {
            error!("Failed to open {}: {}", config.db_path.display(), e);
            std::process::exit(1);
        }
    };

    let app = App {
        messages: MessageStore::new(kv.clone()),
        sessions: SessionStore::new(kv),
    };

    match app.run(cli.command) {
        Ok(output) => match serde_json::to_string_pretty(&output) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                error!("Failed to render output: {}", e);
                std::process::exit(1);
            }
        },
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
