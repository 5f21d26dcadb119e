// ── Entity base ──
//
// Every remote-controlled object (device or automation) is an Entity: one
// snapshot plus a shared handle to the API client. Identity is pinned at
// construction — a response echoing a different id is a protocol violation,
// never a legitimate update.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use haven_api::{ApiClient, ApiResponse};

use crate::error::CoreError;
use crate::state::State;

/// Base for any remote-controlled object.
///
/// Owns exactly one [`State`] snapshot. The client is shared and never
/// exclusively locked; the snapshot itself is not internally synchronized —
/// mutating operations take `&mut self`, so callers serialize access to a
/// given entity.
pub struct Entity {
    id: String,
    state: State,
    client: Arc<ApiClient>,
}

impl Entity {
    /// Build an entity from an initial server payload.
    ///
    /// The payload must be a JSON object carrying an `id`.
    pub fn new(client: Arc<ApiClient>, initial: Value) -> Result<Self, CoreError> {
        let map = initial
            .as_object()
            .cloned()
            .ok_or_else(|| CoreError::malformed("entity state is not an object"))?;
        let id = id_string(map.get("id"))
            .ok_or_else(|| CoreError::malformed("entity state has no id"))?;
        Ok(Self {
            id,
            state: State::new(map),
            client,
        })
    }

    /// The entity's identifier. Never changes across updates.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.state.get("name").and_then(Value::as_str)
    }

    /// Dotted-path lookup into the snapshot; `None` if absent.
    pub fn get_value(&self, path: &str) -> Option<&Value> {
        self.state.get(path)
    }

    /// Local-only deep merge into the snapshot. No network call.
    pub fn update(&mut self, partial: &Value) {
        self.state.update(partial);
    }

    pub(crate) fn replace_state(&mut self, full: Value) {
        self.state.replace(full);
    }

    pub(crate) fn client(&self) -> &ApiClient {
        &self.client
    }
}

/// Shared read/update surface for every entity variant.
pub trait Stateful {
    fn entity(&self) -> &Entity;
    fn entity_mut(&mut self) -> &mut Entity;

    fn id(&self) -> &str {
        self.entity().id()
    }

    fn name(&self) -> Option<&str> {
        self.entity().name()
    }

    fn get_value(&self, path: &str) -> Option<&Value> {
        self.entity().get_value(path)
    }

    /// Local-only deep merge into the snapshot. No network call.
    fn update(&mut self, partial: &Value) {
        self.entity_mut().update(partial);
    }
}

// ── Response helpers ─────────────────────────────────────────────────

/// Parse a response body, surfacing failures as `MalformedResponse`.
pub(crate) fn parse<T: DeserializeOwned>(resp: &ApiResponse) -> Result<T, CoreError> {
    resp.json()
        .map_err(|e| CoreError::malformed(e.to_string()))
}

/// Extract the sole element of a one-element response array.
pub(crate) fn single(mut values: Vec<Value>) -> Result<Value, CoreError> {
    if values.len() != 1 {
        return Err(CoreError::malformed(format!(
            "expected exactly one element, got {}",
            values.len()
        )));
    }
    Ok(values.remove(0))
}

/// Normalize an echoed identifier — the API returns ids as strings on some
/// endpoints and numbers on others.
pub(crate) fn id_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
