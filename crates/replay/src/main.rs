//! Headless session driver.
//!
//! Seats the players of an intent script, submits every scripted intent in
//! order, and logs each broadcast as JSON. Used to reproduce sessions and to
//! capture regression snapshots.
mod config;
mod logging;
mod script;

use anyhow::{Context, Result, bail};
use game_content::{Content, ContentFactory};
use runtime::{Runtime, RuntimeConfig, RuntimeError, Topic};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use config::ReplayConfig;
use script::Script;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = ReplayConfig::from_env()?;
    let _guard = logging::setup_logging(config.session_id.as_deref())?;

    let content = match &config.data_dir {
        Some(dir) => ContentFactory::new(dir).load_content()?,
        None => Content::builtin(),
    };
    let script = Script::load(&config.script)?;
    info!(
        target: "replay",
        script = %config.script.display(),
        seats = script.seats.len(),
        steps = script.steps.len(),
        "Replaying"
    );

    let runtime_config = RuntimeConfig {
        game_config: content.config.clone(),
        ..RuntimeConfig::default()
    }
    .with_env_overrides()?;

    let runtime = Runtime::builder()
        .config(runtime_config)
        .content(content)
        .players(script.seats())
        .build()
        .await?;

    let loggers = spawn_loggers(&runtime);
    let outcome = replay(&runtime, &script).await;

    let handle = runtime.handle();
    let state = handle.query_state().await?;
    drop(handle);
    runtime.shutdown().await?;
    for logger in loggers {
        logger.await.context("broadcast logger panicked")?;
    }

    info!(
        target: "replay",
        nonce = state.nonce,
        state_root = %hex::encode(state.state_root()),
        awaiting = ?state.awaited_player(),
        "Replay finished"
    );
    if let Some(path) = &config.snapshot_out {
        let json = serde_json::to_string_pretty(&state)?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write snapshot {}", path.display()))?;
        info!(target: "replay", path = %path.display(), "Snapshot written");
    }
    outcome
}

async fn replay(runtime: &Runtime, script: &Script) -> Result<()> {
    let handle = runtime.handle();
    for (index, step) in script.steps.iter().enumerate() {
        match handle.submit_intent(step.player, step.intent.clone()).await {
            Ok(events) => {
                info!(target: "replay", index, player = %step.player, events = events.len(), "Applied");
            }
            Err(RuntimeError::Rejected { code, error }) => {
                warn!(target: "replay", index, player = %step.player, code, %error, "Rejected");
                if script.stop_on_rejection {
                    bail!("step {index} rejected: {error}");
                }
            }
            Err(other) => return Err(other.into()),
        }
    }
    Ok(())
}

/// One task per topic that logs every broadcast until the session closes.
fn spawn_loggers(runtime: &Runtime) -> Vec<JoinHandle<()>> {
    runtime
        .handle()
        .subscribe_multiple(&Topic::ALL)
        .into_iter()
        .map(|(topic, mut rx)| {
            tokio::spawn(async move {
                loop {
                    match rx.recv().await {
                        Ok(event) => match event.to_json() {
                            Ok(json) => info!(target: "replay::broadcast", ?topic, "{json}"),
                            Err(error) => warn!(target: "replay::broadcast", ?topic, %error, "unserializable event"),
                        },
                        Err(RecvError::Lagged(skipped)) => {
                            warn!(target: "replay::broadcast", ?topic, skipped, "subscriber lagged");
                        }
                        Err(RecvError::Closed) => break,
                    }
                }
            })
        })
        .collect()
}

