//! Terminal entry point for Taskbox.

mod config;
mod platform;
mod shell;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::io;
use std::path::PathBuf;
use taskbox_core::{
    core_version, default_log_level, init_logging, KvTaskRepository, SqliteKvStore, TaskApp,
};

use crate::platform::{CommandBrowser, CommandClipboard};

#[derive(Parser)]
#[command(name = "taskbox", about = "Keep a small task list in your terminal", version)]
struct Cli {
    /// Config file (defaults to the platform config dir, or TASKBOX_CONFIG_PATH)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Database file holding the task list
    #[arg(long)]
    db: Option<PathBuf>,

    /// trace | debug | info | warn | error
    #[arg(long)]
    log_level: Option<String>,

    #[arg(long)]
    log_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = config::load_config(cli.config.as_deref())?;

    if let Some(db) = cli.db {
        config.storage.path = Some(db);
    }
    if let Some(dir) = cli.log_dir {
        config.logging.dir = Some(dir);
    }
    let level = cli
        .log_level
        .or_else(|| config.logging.level.clone())
        .unwrap_or_else(|| default_log_level().to_string());

    let log_dir = config::get_log_dir(&config)?;
    init_logging(&level, &log_dir).context("Failed to start logging")?;
    info!(
        "event=app_start module=cli status=ok version={}",
        core_version()
    );

    let db_path = config::get_db_path(&config)?;
    let store = SqliteKvStore::open(&db_path)
        .with_context(|| format!("Failed to open task database: {}", db_path.display()))?;

    let mut app = TaskApp::open(
        KvTaskRepository::new(store),
        config.session_settings(),
        Box::new(CommandClipboard::new(config.platform.clipboard_command.clone())),
        Box::new(CommandBrowser::new(config.platform.browser_command.clone())),
    )
    .context("Failed to load tasks")?;

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    shell::run(&mut app, stdin.lock(), &mut stdout)?;

    info!("event=app_exit module=cli status=ok");
    Ok(())
}
