//! Console output for the combat log and exported events.
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

use combat_core::{LogEntry, LogKind};
use runtime::{Event, RuntimeHandle, Topic};

/// Render one combat log line.
pub fn format_entry(entry: &LogEntry) -> String {
    let tag = match entry.kind {
        LogKind::Damage | LogKind::MobAttack => "  ",
        LogKind::Kill | LogKind::Loot | LogKind::Xp => "* ",
        LogKind::LevelUp => "**",
        LogKind::Error => "!!",
        _ => "--",
    };
    format!("{tag} [{}] {}", entry.kind, entry.message)
}

/// Print every combat log line until the runtime shuts down.
pub fn spawn_log_printer(handle: &RuntimeHandle) -> JoinHandle<()> {
    let mut log = handle.subscribe(Topic::Log);
    tokio::spawn(async move {
        loop {
            match log.recv().await {
                Ok(Event::Log(entry)) => println!("{}", format_entry(&entry)),
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "log printer fell behind");
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}

/// Print encounter and progression events as JSON lines.
pub fn spawn_event_exporter(handle: &RuntimeHandle) -> JoinHandle<()> {
    let mut encounter = handle.subscribe(Topic::Encounter);
    let mut progression = handle.subscribe(Topic::Progression);
    tokio::spawn(async move {
        loop {
            let received = tokio::select! {
                event = encounter.recv() => event,
                event = progression.recv() => event,
            };
            match received {
                Ok(event) => match event.to_json() {
                    Ok(line) => println!("{line}"),
                    Err(err) => tracing::warn!(error = %err, "failed to encode event"),
                },
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "event exporter fell behind");
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}
