//! Pantry reminder daemon and minimal CLI.
//!
//! With no arguments (or a config path), runs the periodic dispatch loop
//! and prints due reminders to the log. `add` and `list` subcommands give
//! the store a mutation path without a front end:
//!
//! ```text
//! pantryd [CONFIG_PATH]                    run the reminder loop
//! pantryd add NAME EXPIRES [NOTIFY]        add an item (dates as YYYY-MM-DD)
//! pantryd list                             print all items
//! ```

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use chrono::NaiveDate;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use pantryd::{
    ChannelNotifier, CycleTrigger, KeywordClassifier, NotificationDispatcher, Pantry,
    PantryConfig, PantryItem, SqliteItemStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("add") => add(&load_config(None)?, &args[1..]).await,
        Some("list") => list(&load_config(None)?),
        Some("--help" | "-h") => {
            eprintln!("usage: pantryd [CONFIG_PATH] | add NAME EXPIRES [NOTIFY] | list");
            Ok(())
        }
        other => run(&load_config(other)?).await,
    }
}

fn load_config(path_arg: Option<&str>) -> anyhow::Result<PantryConfig> {
    let path = path_arg
        .map(std::path::PathBuf::from)
        .unwrap_or_else(PantryConfig::default_config_path);
    if path.exists() {
        Ok(PantryConfig::from_file(&path)?)
    } else {
        tracing::info!("no config at {}, using defaults", path.display());
        Ok(PantryConfig::default())
    }
}

fn open_pantry(config: &PantryConfig) -> anyhow::Result<Pantry> {
    let store = Arc::new(SqliteItemStore::new(&config.database_dir())?);
    let mut pantry = Pantry::new(store);
    if config.icons.auto_suggest {
        pantry = pantry.with_classifier(Arc::new(KeywordClassifier));
    }
    Ok(pantry)
}

async fn add(config: &PantryConfig, args: &[String]) -> anyhow::Result<()> {
    let (name, expires) = match args {
        [name, expires, ..] => (name, expires),
        _ => anyhow::bail!("usage: pantryd add NAME EXPIRES [NOTIFY]"),
    };
    let expiration: NaiveDate = expires
        .parse()
        .with_context(|| format!("invalid expiration date '{expires}'"))?;

    let mut item = PantryItem::new(name.clone(), expiration);
    if let Some(notify) = args.get(2) {
        let date: NaiveDate = notify
            .parse()
            .with_context(|| format!("invalid notification date '{notify}'"))?;
        item.notification_date = Some(date);
    }

    let pantry = open_pantry(config)?;
    let saved = pantry.add_item(item).await?;
    println!(
        "added #{} {} (expires {}, icon {})",
        saved.id.unwrap_or_default(),
        saved.name,
        saved.expiration_date,
        saved.icon_name
    );
    Ok(())
}

fn list(config: &PantryConfig) -> anyhow::Result<()> {
    let pantry = open_pantry(config)?;
    for item in pantry.items()? {
        let reminder = match item.notification_date {
            Some(date) if item.notification_sent => format!(", reminded {date}"),
            Some(date) => format!(", remind {date}"),
            None => String::new(),
        };
        println!(
            "#{} {} (expires {}{reminder})",
            item.id.unwrap_or_default(),
            item.name,
            item.expiration_date
        );
    }
    Ok(())
}

async fn run(config: &PantryConfig) -> anyhow::Result<()> {
    let store = Arc::new(SqliteItemStore::new(&config.database_dir())?);
    tracing::info!("item store open at {}", store.root().display());

    let (reminder_tx, mut reminder_rx) = mpsc::unbounded_channel();
    let (report_tx, mut report_rx) = mpsc::unbounded_channel();
    let dispatcher = Arc::new(NotificationDispatcher::new(
        store,
        Arc::new(ChannelNotifier::new(reminder_tx)),
    ));

    let cancel = CancellationToken::new();
    let trigger = CycleTrigger::new(dispatcher, cancel.clone(), report_tx)
        .with_tick_interval(Duration::from_secs(config.notifications.tick_interval_secs))
        .with_cycle_budget(Duration::from_secs(config.notifications.cycle_budget_secs));
    let trigger_handle = trigger.run();

    tokio::spawn(async move {
        while let Some(reminder) = reminder_rx.recv().await {
            tracing::info!(
                "[{}] {}: {}",
                reminder.dedupe_key,
                reminder.title,
                reminder.body
            );
        }
    });
    tokio::spawn(async move {
        while let Some(report) = report_rx.recv().await {
            tracing::debug!(
                "cycle report: {} attempted, {} succeeded, {} failed",
                report.attempted,
                report.succeeded,
                report.failed
            );
        }
    });

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutting down");
    cancel.cancel();
    trigger_handle.await?;

    Ok(())
}
