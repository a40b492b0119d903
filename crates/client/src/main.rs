//! `camp` binary: run an automatic camp fight and print a summary.
//!
//! ```bash
//! CHARACTER_NAME=Tess SIM_DURATION_SECS=60 cargo run -p camp-client
//! ```
use anyhow::Result;
use camp_client::{AutoBattle, BattleSettings, ClientConfig, display, logging, start_session};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let config = ClientConfig::from_env();

    let session_id = config
        .session_id
        .clone()
        .unwrap_or_else(default_session_id);
    let _log_guard = logging::setup_logging(&session_id)?;
    tracing::info!(%session_id, ?config, "starting camp client");

    let runtime = start_session(&config).await?;
    let handle = runtime.handle();

    let printer = display::spawn_log_printer(&handle);
    let exporter = config
        .export_events
        .then(|| display::spawn_event_exporter(&handle));

    let settings = BattleSettings {
        duration: config.duration,
        ..BattleSettings::default()
    };
    let summary = AutoBattle::new(handle.clone(), settings).run().await?;

    handle.flush_saves().await?;
    drop(handle);
    runtime.shutdown().await?;
    printer.await?;
    if let Some(exporter) = exporter {
        exporter.await?;
    }

    println!(
        "{}",
        serde_json::json!({
            "character": config.character_name,
            "summary": summary,
        })
    );
    Ok(())
}

fn default_session_id() -> String {
    chrono::Utc::now().format("%Y%m%d-%H%M%S").to_string()
}
