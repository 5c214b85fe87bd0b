use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use nyx_journal::capture::{AudioInputConfig, ToneInput, VoiceRecorder};
use nyx_journal::interpret::{ChatCompletionsClient, InterpretationSession};
use nyx_journal::journal::{DreamEntryCoordinator, MemoryStore, SleepLog, StaticIdentity};
use nyx_journal::transport::HttpUploadGateway;
use nyx_journal::{create_router, AppState, Config};

#[derive(Parser, Debug)]
#[command(name = "nyx-journal")]
#[command(about = "Dream journal capture and interpretation service")]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config/nyx-journal")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let cfg = Config::load(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config))?;

    info!("{} v0.1.0", cfg.service.name);

    let identity = Arc::new(StaticIdentity::new(cfg.service.owner.clone()));
    let store = Arc::new(MemoryStore::new());

    let input_config = AudioInputConfig {
        sample_rate: cfg.capture.sample_rate,
        channels: cfg.capture.channels,
        ..AudioInputConfig::default()
    };
    let recorder = Arc::new(VoiceRecorder::new(
        Box::new(ToneInput::new(input_config.clone())),
        input_config,
    ));

    let gateway = Arc::new(HttpUploadGateway::new(cfg.upload.endpoint.clone())?);
    let coordinator = Arc::new(DreamEntryCoordinator::new(
        store.clone(),
        gateway,
        identity.clone(),
        cfg.upload.destination.clone(),
    ));

    let sleep = Arc::new(SleepLog::new(store, identity));

    let client = Arc::new(ChatCompletionsClient::new(
        cfg.interpreter_config(),
        cfg.interpreter.endpoint.clone(),
    )?);
    let interpreter = Arc::new(InterpretationSession::new(client));

    let state = AppState::new(recorder, coordinator, sleep, interpreter);
    let router = create_router(state);

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Listening on {}", addr);

    axum::serve(listener, router)
        .await
        .context("HTTP server exited")?;

    Ok(())
}
