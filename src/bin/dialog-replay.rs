//! Replay a recorded dialog trace and print what the session did
//!
//! Usage: `dialog-replay <trace.jsonl>`. Logs go to stderr, the JSON
//! summary to stdout.

use dialog_pilot::replay::{load_trace, replay};
use dialog_pilot::DialogConfig;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dialog_pilot=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let Some(path) = std::env::args_os().nth(1).map(PathBuf::from) else {
        eprintln!("usage: dialog-replay <trace.jsonl>");
        std::process::exit(2);
    };

    let config = DialogConfig::from_env();
    let steps = load_trace(&path)?;
    tracing::info!(path = %path.display(), steps = steps.len(), "Replaying trace");

    let summary = replay(&steps, config).await?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
