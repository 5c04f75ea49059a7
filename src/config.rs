//! Session configuration

use std::str::FromStr;
use std::time::Duration;

/// Quest "Restoring Grenth's Monuments", taken first when offered
pub const QUEST_UW_RESTORE: u32 = 0x0165;
/// Quest "Escort of Souls", taken second when offered
pub const QUEST_UW_ESCORT: u32 = 0x0166;

const DEFAULT_QUEUE_TIMEOUT: Duration = Duration::from_millis(3000);
const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(50);
/// The host's "area" range, in game units
const DEFAULT_INTERACTION_RANGE: f32 = 322.0;

/// Configuration for a dialog session and its runtime
#[derive(Debug, Clone, PartialEq)]
pub struct DialogConfig {
    /// Queued responses older than this are dropped
    pub queue_timeout: Duration,
    /// Interval between scheduler ticks in the runtime
    pub tick_interval: Duration,
    /// Maximum distance for re-engaging an entity whose dialog closed
    pub interaction_range: f32,
    /// Quests preferred by quest auto-accept, in order
    pub priority_quests: Vec<u32>,
}

impl Default for DialogConfig {
    fn default() -> Self {
        Self {
            queue_timeout: DEFAULT_QUEUE_TIMEOUT,
            tick_interval: DEFAULT_TICK_INTERVAL,
            interaction_range: DEFAULT_INTERACTION_RANGE,
            priority_quests: vec![QUEST_UW_RESTORE, QUEST_UW_ESCORT],
        }
    }
}

impl DialogConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; malformed values keep the default
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            queue_timeout: parse_setting::<u64>(&lookup, "DIALOG_QUEUE_TIMEOUT_MS")
                .map_or(defaults.queue_timeout, Duration::from_millis),
            tick_interval: parse_setting::<u64>(&lookup, "DIALOG_TICK_INTERVAL_MS")
                .filter(|ms| *ms > 0)
                .map_or(defaults.tick_interval, Duration::from_millis),
            interaction_range: parse_setting::<f32>(&lookup, "DIALOG_INTERACT_RANGE")
                .filter(|range| range.is_finite() && *range >= 0.0)
                .unwrap_or(defaults.interaction_range),
            priority_quests: parse_quest_list(&lookup, "DIALOG_PRIORITY_QUESTS")
                .unwrap_or(defaults.priority_quests),
        }
    }
}

fn parse_setting<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, value = %raw, "Ignoring malformed setting");
            None
        }
    }
}

fn parse_quest_list(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<Vec<u32>> {
    let raw = lookup(key)?;
    let parsed: Result<Vec<u32>, _> = raw
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(parse_quest_id)
        .collect();
    match parsed {
        Ok(quests) => Some(quests),
        Err(_) => {
            tracing::warn!(key, value = %raw, "Ignoring malformed quest list");
            None
        }
    }
}

/// Quest ids are written either in decimal or as `0x`-prefixed hex
fn parse_quest_id(part: &str) -> Result<u32, std::num::ParseIntError> {
    match part.strip_prefix("0x").or_else(|| part.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => part.parse(),
    }
}
