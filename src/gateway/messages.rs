//! Wire types for the realtime gateway.
//!
//! All payloads are JSON. Field names follow what browser clients of the
//! bridge already read (`maxRange`, `minDist`, ...).
//!
//! | Direction | Route | Payload |
//! |-----------|-------|---------|
//! | client → server | `POST /action` | `{v?, w?}` |
//! | server → client | `POST /action` | [`ActionResponse`] |
//! | server → client | `POST /reset` | [`ResetResponse`] |
//! | server → client | `GET /ws` | [`StreamMessage`] (hello, then state every tick) |

use crate::config::CommandConfig;
use crate::sim::{Observation, Pose, SensorReading, StepInfo, Transition};
use serde::Serialize;
use serde_json::Value;

/// A velocity command after permissive parsing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActionCommand {
    pub linear: f64,
    pub angular: f64,
}

impl ActionCommand {
    /// Parse a request body, substituting defaults instead of rejecting.
    ///
    /// A field falls back to its default only when it is missing or not a
    /// number; any numeric value is applied as sent. An empty or non-JSON
    /// body yields both defaults.
    pub fn from_body(body: &[u8], defaults: &CommandConfig) -> Self {
        let value: Value = serde_json::from_slice(body).unwrap_or(Value::Null);
        Self {
            linear: numeric_field(&value, "v").unwrap_or(defaults.default_linear),
            angular: numeric_field(&value, "w").unwrap_or(defaults.default_angular),
        }
    }
}

fn numeric_field(value: &Value, key: &str) -> Option<f64> {
    value.get(key).and_then(Value::as_f64)
}

/// Response to `POST /action`
#[derive(Debug, Clone, Serialize)]
pub struct ActionResponse {
    pub ok: bool,
    pub sensors: SensorReading,
    pub reward: f64,
    pub done: bool,
    pub info: StepInfo,
}

impl From<Transition> for ActionResponse {
    fn from(t: Transition) -> Self {
        Self {
            ok: true,
            sensors: t.sensors,
            reward: t.reward,
            done: t.done,
            info: t.info,
        }
    }
}

/// Response to `POST /reset`
#[derive(Debug, Clone, Serialize)]
pub struct ResetResponse {
    pub ok: bool,
}

/// Messages pushed on the state stream
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StreamMessage {
    /// Sent once right after the WebSocket opens
    Hello,
    /// Sent every tick
    State {
        pose: Pose,
        sensors: SensorReading,
        reward: f64,
        done: bool,
    },
}

impl From<Observation> for StreamMessage {
    fn from(obs: Observation) -> Self {
        StreamMessage::State {
            pose: obs.pose,
            sensors: obs.sensors,
            reward: obs.reward,
            done: obs.done,
        }
    }
}
