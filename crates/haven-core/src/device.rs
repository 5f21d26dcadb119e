// ── Devices (switches, dimmers, bulbs) ──
//
// Every mutating op follows the same shape: coerce the value to wire form,
// POST to the integrations endpoint, check the echoed panel id, run the
// op's comparator, then commit (or adopt, or fail). Fatal paths return
// before any snapshot mutation.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use haven_api::{ApiClient, urls};

use crate::entity::{Entity, Stateful, parse};
use crate::error::CoreError;
use crate::validate::{self, Verdict};

// ── Device kinds ─────────────────────────────────────────────────────

/// Capability tag parsed from the snapshot's `type` field.
///
/// Replaces a Switch → Dimmer → Bulb type chain: one `Device` struct,
/// dispatch on the tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
#[non_exhaustive]
pub enum DeviceKind {
    Switch,
    Dimmer,
    Hue,
    #[strum(serialize = "RGB")]
    Rgb,
    #[strum(serialize = "Light Bulb")]
    LightBulb,
    Unknown,
}

impl DeviceKind {
    fn from_type(device_type: Option<&str>) -> Self {
        device_type
            .and_then(|t| t.parse().ok())
            .unwrap_or(Self::Unknown)
    }

    pub fn is_dimmable(self) -> bool {
        matches!(self, Self::Dimmer | Self::LightBulb)
    }

    pub fn is_color_capable(self) -> bool {
        matches!(self, Self::Rgb | Self::LightBulb)
    }
}

/// Values of the snapshot's `statuses.color_mode` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    On = 0,
    Off = 2,
}

// ── Wire payloads ────────────────────────────────────────────────────

#[derive(Serialize)]
struct ActionRequest<'a> {
    action: &'a str,
}

#[derive(Serialize)]
struct LevelRequest<'a> {
    action: &'a str,
    percentage: i64,
}

#[derive(Serialize)]
struct ColorTempRequest<'a> {
    action: &'a str,
    #[serde(rename = "colorTemperature")]
    color_temperature: i64,
}

#[derive(Serialize)]
struct ColorRequest<'a> {
    action: &'a str,
    hue: i64,
    saturation: i64,
}

// ── Wire echoes ──────────────────────────────────────────────────────

#[derive(Deserialize)]
struct StatusEcho {
    #[serde(rename = "idForPanel")]
    id_for_panel: String,
    state: PowerEcho,
}

#[derive(Deserialize)]
struct PowerEcho {
    #[serde(rename = "powerState")]
    power_state: String,
}

#[derive(Deserialize)]
struct LevelEcho {
    #[serde(rename = "idForPanel")]
    id_for_panel: String,
    #[serde(rename = "dimLevel")]
    dim_level: i64,
}

#[derive(Deserialize)]
struct ColorTempEcho {
    #[serde(rename = "idForPanel")]
    id_for_panel: String,
    #[serde(rename = "colorTemperature")]
    color_temperature: i64,
}

#[derive(Deserialize)]
struct ColorEcho {
    #[serde(rename = "idForPanel")]
    id_for_panel: String,
    hue: f64,
    saturation: i64,
}

// ── Device ───────────────────────────────────────────────────────────

/// A remote-controlled device (switch, dimmer, or bulb).
pub struct Device {
    entity: Entity,
    kind: DeviceKind,
    uuid: String,
}

impl Stateful for Device {
    fn entity(&self) -> &Entity {
        &self.entity
    }

    fn entity_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }
}

impl Device {
    /// Build a device from an initial server payload.
    ///
    /// Requires `id` (panel id, used for identity checks) and `uuid`
    /// (used in integrations endpoint paths).
    pub fn new(client: Arc<ApiClient>, initial: Value) -> Result<Self, CoreError> {
        let entity = Entity::new(client, initial)?;
        let uuid = entity
            .get_value("uuid")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .ok_or_else(|| CoreError::malformed("device state has no uuid"))?;
        let kind =
            DeviceKind::from_type(entity.get_value("type").and_then(Value::as_str));
        Ok(Self { entity, kind, uuid })
    }

    pub fn kind(&self) -> DeviceKind {
        self.kind
    }

    pub fn uuid(&self) -> &str {
        &self.uuid
    }

    /// Echoed panel id must match this device, else the request mutated
    /// something else entirely.
    fn check_identity(&self, echoed: &str) -> Result<(), CoreError> {
        if echoed == self.id() {
            Ok(())
        } else {
            Err(CoreError::IdentityMismatch {
                expected: self.id().to_owned(),
                got: echoed.to_owned(),
            })
        }
    }

    // ── Mutating operations ──────────────────────────────────────────

    /// Turn the device on or off.
    ///
    /// The echoed `state.powerState` must match exactly (case-normalized).
    /// The echo is NOT merged into the snapshot: its encoding differs from
    /// the snapshot's status encoding, so the cached status stays stale
    /// until the next refresh.
    pub async fn set_status(&mut self, on: bool) -> Result<(), CoreError> {
        let action = if on { "on" } else { "off" };
        let path = urls::integration_device(&self.uuid);

        let resp = self
            .entity
            .client()
            .post(&path, &ActionRequest { action })
            .await?;
        debug!("set status response: {}", resp.text());

        let echo: StatusEcho = parse(&resp)?;
        self.check_identity(&echo.id_for_panel)?;

        if validate::power_state(action, &echo.state.power_state) == Verdict::Reject {
            return Err(CoreError::StateMismatch {
                field: "powerState",
                requested: action.to_owned(),
                echoed: echo.state.power_state,
            });
        }

        info!("set device {} status to: {action}", self.id());
        Ok(())
    }

    /// Turn the device on.
    pub async fn switch_on(&mut self) -> Result<(), CoreError> {
        self.set_status(true).await
    }

    /// Turn the device off.
    pub async fn switch_off(&mut self) -> Result<(), CoreError> {
        self.set_status(false).await
    }

    /// Set the dim level (0–100). The echoed `dimLevel` must match exactly;
    /// on success the level is committed to the snapshot.
    pub async fn set_level(&mut self, level: u8) -> Result<(), CoreError> {
        let requested = i64::from(level);
        let path = urls::integration_device(&self.uuid);

        let resp = self
            .entity
            .client()
            .post(
                &path,
                &LevelRequest {
                    action: "setpercent",
                    percentage: requested,
                },
            )
            .await?;
        debug!("set level response: {}", resp.text());

        let echo: LevelEcho = parse(&resp)?;
        self.check_identity(&echo.id_for_panel)?;

        if validate::dim_level(requested, echo.dim_level) == Verdict::Reject {
            return Err(CoreError::StateMismatch {
                field: "dimLevel",
                requested: requested.to_string(),
                echoed: echo.dim_level.to_string(),
            });
        }

        self.update(&json!({"statuses": {"level": level}}));
        info!("set device {} level to: {level}", self.id());
        Ok(())
    }

    /// Set the color temperature in Kelvin.
    ///
    /// The server clamps to the bulb's supported range; a mismatched echo is
    /// tolerated — the server value is adopted and committed with a warning.
    pub async fn set_color_temp(&mut self, color_temp: u32) -> Result<(), CoreError> {
        let requested = i64::from(color_temp);
        let path = urls::integration_device(&self.uuid);

        let resp = self
            .entity
            .client()
            .post(
                &path,
                &ColorTempRequest {
                    action: "setcolortemperature",
                    color_temperature: requested,
                },
            )
            .await?;
        debug!("set color temp response: {}", resp.text());

        let echo: ColorTempEcho = parse(&resp)?;
        self.check_identity(&echo.id_for_panel)?;

        let committed = if validate::color_temp(requested, echo.color_temperature)
            == Verdict::Match
        {
            requested
        } else {
            warn!(
                "set color temp mismatch for device {}: requested {requested}, server returned {}",
                self.id(),
                echo.color_temperature
            );
            echo.color_temperature
        };

        self.update(&json!({"statuses": {"color_temp": committed}}));
        info!("set device {} color_temp to: {committed}", self.id());
        Ok(())
    }

    /// Set the color as a `(hue, saturation)` pair.
    ///
    /// The server rounds hue by up to ±1; within that (with exact saturation)
    /// the requested pair is committed. Any larger drift adopts the server's
    /// pair with a warning.
    pub async fn set_color(&mut self, color: (f64, i64)) -> Result<(), CoreError> {
        let (hue, saturation) = color;
        #[allow(clippy::cast_possible_truncation)]
        let wire_hue = hue as i64;
        let path = urls::integration_device(&self.uuid);

        let resp = self
            .entity
            .client()
            .post(
                &path,
                &ColorRequest {
                    action: "setcolor",
                    hue: wire_hue,
                    saturation,
                },
            )
            .await?;
        debug!("set color response: {}", resp.text());

        let echo: ColorEcho = parse(&resp)?;
        self.check_identity(&echo.id_for_panel)?;

        let (committed_hue, committed_saturation) =
            if validate::color((wire_hue, saturation), (echo.hue, echo.saturation))
                == Verdict::Match
            {
                (hue, saturation)
            } else {
                warn!(
                    "set color mismatch for device {}: requested {:?}, server returned {:?}",
                    self.id(),
                    (hue, saturation),
                    (echo.hue, echo.saturation)
                );
                (echo.hue, echo.saturation)
            };

        self.update(&json!({
            "statuses": {"hue": committed_hue, "saturation": committed_saturation}
        }));
        info!(
            "set device {} color to: {:?}",
            self.id(),
            (committed_hue, committed_saturation)
        );
        Ok(())
    }

    // ── Derived read-only properties ─────────────────────────────────

    /// Current brightness, if the device reports one.
    pub fn brightness(&self) -> Option<u64> {
        self.get_value("statuses.level").and_then(Value::as_u64)
    }

    /// Current color temperature in Kelvin.
    pub fn color_temp(&self) -> Option<u64> {
        self.get_value("statuses.color_temp").and_then(Value::as_u64)
    }

    /// Current `(hue, saturation)`; either side may be unreported.
    pub fn color(&self) -> (Option<f64>, Option<u64>) {
        (
            self.get_value("statuses.hue").and_then(Value::as_f64),
            self.get_value("statuses.saturation").and_then(Value::as_u64),
        )
    }

    /// Whether the device reports a non-zero brightness.
    pub fn has_brightness(&self) -> bool {
        self.brightness().is_some_and(|level| level != 0)
    }

    /// Whether the device is currently in color mode.
    /// The snapshot stores the mode as a stringified integer.
    pub fn has_color(&self) -> bool {
        match self.get_value("statuses.color_mode") {
            Some(Value::String(s)) => s == "0",
            Some(Value::Number(n)) => n.as_i64() == Some(ColorMode::On as i64),
            _ => false,
        }
    }

    pub fn is_dimmable(&self) -> bool {
        self.kind.is_dimmable()
    }

    pub fn is_color_capable(&self) -> bool {
        self.kind.is_color_capable()
    }
}
