// ── Automations ──
//
// Automation endpoints answer with a one-element JSON array wrapping the
// full automation state. Edits validate both the echoed id and the echoed
// flag with no tolerance; refresh validates the id and then replaces the
// snapshot wholesale.

use std::sync::Arc;

use serde_json::{Value, json};
use tracing::{debug, info};

use haven_api::{ApiClient, urls};

use crate::entity::{Entity, Stateful, id_string, parse, single};
use crate::error::CoreError;
use crate::validate::{self, Verdict};

/// An automation configured in the cloud service.
pub struct Automation {
    entity: Entity,
}

impl Stateful for Automation {
    fn entity(&self) -> &Entity {
        &self.entity
    }

    fn entity_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }
}

impl Automation {
    /// Build an automation from an initial server payload.
    pub fn new(client: Arc<ApiClient>, initial: Value) -> Result<Self, CoreError> {
        Ok(Self {
            entity: Entity::new(client, initial)?,
        })
    }

    /// Whether the automation is enabled.
    pub fn enabled(&self) -> bool {
        self.get_value("enabled")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Enable or disable the automation.
    ///
    /// The response must echo this automation's id and the requested flag
    /// exactly; any mismatch is [`CoreError::InvalidEditResponse`]. On
    /// success the full returned state is merged into the snapshot.
    pub async fn enable(&mut self, enable: bool) -> Result<(), CoreError> {
        let path = urls::automation(self.id());

        let resp = self
            .entity
            .client()
            .patch(&path, &json!({"enabled": enable}))
            .await?;

        let state = single(parse(&resp)?)?;

        let echoed_id = id_string(state.get("id"));
        let flag_verdict = state
            .get("enabled")
            .and_then(Value::as_bool)
            .map_or(Verdict::Reject, |echoed| validate::enabled(enable, echoed));
        if echoed_id.as_deref() != Some(self.id()) || flag_verdict == Verdict::Reject {
            return Err(CoreError::InvalidEditResponse);
        }

        self.update(&state);

        info!(
            "set automation {} enable to: {}",
            self.name().unwrap_or_else(|| self.id()),
            self.enabled()
        );
        debug!("automation response: {}", resp.text());
        Ok(())
    }

    /// Trigger the automation. Fire-and-forget: transport success is the
    /// only validation.
    pub async fn trigger(&self) -> Result<(), CoreError> {
        let path = urls::automation_apply(self.id());

        self.entity.client().post_empty(&path).await?;

        info!(
            "automation triggered: {}",
            self.name().unwrap_or_else(|| self.id())
        );
        Ok(())
    }

    /// Re-fetch the automation's state.
    ///
    /// The echoed id must match; the returned state then replaces the
    /// snapshot wholesale (a refresh is a new baseline, not a partial).
    pub async fn refresh(&mut self) -> Result<(), CoreError> {
        let path = urls::automation(self.id());

        let resp = self.entity.client().get(&path).await?;
        let state = single(parse(&resp)?)?;

        let echoed = id_string(state.get("id"));
        if echoed.as_deref() != Some(self.id()) {
            return Err(CoreError::IdentityMismatch {
                expected: self.id().to_owned(),
                got: echoed.unwrap_or_else(|| "<missing>".to_owned()),
            });
        }

        self.entity.replace_state(state);
        Ok(())
    }

    /// A short description of the automation.
    pub fn desc(&self) -> String {
        format!(
            "{} (ID: {}, Enabled: {})",
            self.name().unwrap_or("<unnamed>"),
            self.id(),
            self.enabled()
        )
    }

    // ── Deprecated aliases ───────────────────────────────────────────

    /// The id of the automation.
    #[deprecated(since = "0.1.0", note = "use `id()`")]
    pub fn automation_id(&self) -> &str {
        self.id()
    }

    /// Whether the automation is enabled.
    #[deprecated(since = "0.1.0", note = "use `enabled()`")]
    pub fn is_enabled(&self) -> bool {
        self.enabled()
    }
}
