//! Offline replay of recorded host traffic
//!
//! A trace is a JSON-lines file, one `TraceStep` per line. Steps either
//! shape the scripted world (entities, the player, active effects) or drive
//! the runtime exactly as the host and callers would. Blank lines and lines
//! starting with `#` are skipped.

mod scripted;

pub use scripted::{ScriptedHost, ScriptedWorld};

use crate::config::DialogConfig;
use crate::error::{RuntimeError, TraceError};
use crate::host::{DialogBodyInfo, DialogButtonInfo, HostMessage, Position};
use crate::runtime::{self, DialogRuntime, RuntimeHandle};
use crate::session::{DialogSession, SessionView};
use crate::text::EncodedText;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

const EVENT_CAPACITY: usize = 256;

fn default_active() -> bool {
    true
}

/// One line of a trace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum TraceStep {
    /// Place an entity in the world
    Entity {
        id: u32,
        x: f32,
        y: f32,
        #[serde(default)]
        name: EncodedText,
    },
    /// Place the locally controlled entity
    Player { id: u32, x: f32, y: f32 },
    Effect {
        skill_id: u32,
        #[serde(default = "default_active")]
        active: bool,
    },
    DialogBody(DialogBodyInfo),
    Button(DialogButtonInfo),
    /// The player clicked a response
    SendResponse { dialog_id: u32 },
    FrameDestroyed,
    /// A caller queued responses
    Request { dialog_ids: Vec<u32> },
    Reload,
    Wait { ms: u64 },
}

impl TraceStep {
    pub fn name(&self) -> &'static str {
        match self {
            TraceStep::Entity { .. } => "entity",
            TraceStep::Player { .. } => "player",
            TraceStep::Effect { .. } => "effect",
            TraceStep::DialogBody(_) => "dialog_body",
            TraceStep::Button(_) => "button",
            TraceStep::SendResponse { .. } => "send_response",
            TraceStep::FrameDestroyed => "frame_destroyed",
            TraceStep::Request { .. } => "request",
            TraceStep::Reload => "reload",
            TraceStep::Wait { .. } => "wait",
        }
    }
}

/// What a replay did
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplaySummary {
    pub steps: usize,
    /// Every response that reached the host, user clicks included
    pub sent: Vec<u32>,
    /// Entities the session walked back to
    pub interactions: Vec<u32>,
    pub generation: u64,
    pub last_entity: u32,
    /// Session state after the last step
    pub dialog: SessionView,
}

pub fn parse_trace(input: &str) -> Result<Vec<TraceStep>, TraceError> {
    input
        .lines()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#')
        })
        .map(|(index, line)| {
            serde_json::from_str(line).map_err(|source| TraceError::Parse {
                line: index + 1,
                source,
            })
        })
        .collect()
}

pub fn load_trace(path: &Path) -> Result<Vec<TraceStep>, TraceError> {
    let input = std::fs::read_to_string(path).map_err(|source| TraceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_trace(&input)
}

/// Replay a trace against a fresh session and scripted host
pub async fn replay(
    steps: &[TraceStep],
    config: DialogConfig,
) -> Result<ReplaySummary, RuntimeError> {
    let world = Arc::new(Mutex::new(ScriptedWorld::default()));
    let (handle, events) = runtime::channel(EVENT_CAPACITY);
    let host = ScriptedHost::new(Arc::clone(&world), handle.decoder());
    let runtime = DialogRuntime::new(DialogSession::with_config(config), host, events);
    let task = tokio::spawn(runtime.run());

    for (index, step) in steps.iter().enumerate() {
        tracing::debug!(index, step = step.name(), "Replaying step");
        if let Err(e) = apply_step(step, &world, &handle).await {
            handle.shutdown();
            return Err(e);
        }
    }

    let dialog = handle.snapshot().await?;
    handle.shutdown();
    let session = task.await?;

    let world = scripted::lock(&world);
    let summary = ReplaySummary {
        steps: steps.len(),
        sent: world.sent.clone(),
        interactions: world.interactions.clone(),
        generation: session.generation(),
        last_entity: session.last_entity(),
        dialog,
    };
    tracing::info!(
        steps = summary.steps,
        sent = summary.sent.len(),
        pending = summary.dialog.pending.len(),
        "Replay finished"
    );
    Ok(summary)
}

async fn apply_step(
    step: &TraceStep,
    world: &Mutex<ScriptedWorld>,
    handle: &RuntimeHandle,
) -> Result<(), RuntimeError> {
    match step {
        TraceStep::Entity { id, x, y, name } => {
            scripted::lock(world).place(*id, Position::new(*x, *y), name.clone());
            return Ok(());
        }
        TraceStep::Player { id, x, y } => {
            let mut world = scripted::lock(world);
            world.positions.insert(*id, Position::new(*x, *y));
            world.player = Some(*id);
            return Ok(());
        }
        TraceStep::Effect { skill_id, active } => {
            scripted::lock(world).set_effect(*skill_id, *active);
            return Ok(());
        }
        TraceStep::DialogBody(info) => {
            handle.dispatch(HostMessage::DialogBody(info.clone())).await?;
        }
        TraceStep::Button(info) => {
            handle.dispatch(HostMessage::DialogButton(info.clone())).await?;
        }
        TraceStep::SendResponse { dialog_id } => {
            handle
                .dispatch(HostMessage::SendResponse {
                    dialog_id: *dialog_id,
                })
                .await?;
        }
        TraceStep::FrameDestroyed => handle.dispatch(HostMessage::FrameDestroyed).await?,
        TraceStep::Request { dialog_ids } => handle.request(dialog_ids).await?,
        TraceStep::Reload => handle.reload().await?,
        TraceStep::Wait { ms } => {
            tokio::time::sleep(Duration::from_millis(*ms)).await;
            return Ok(());
        }
    }
    settle(handle).await
}

/// Wait until the runtime has handled everything sent so far
///
/// Decodes requested while a step is handled are queued behind it, so a
/// second round trip is needed to land after them.
async fn settle(handle: &RuntimeHandle) -> Result<(), RuntimeError> {
    handle.snapshot().await?;
    handle.snapshot().await?;
    Ok(())
}
