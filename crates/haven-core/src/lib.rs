//! Device and automation model for the haven cloud API.
//!
//! Remote objects are mirrored as local entities backed by cached state
//! snapshots. Every mutating operation issues one HTTP request through the
//! shared [`haven_api::ApiClient`], validates the echoed response, and then
//! reconciles the snapshot:
//!
//! - **[`State`]** — opaque snapshot with dotted-path lookup and deep-merge
//!   updates. A failed operation never leaves a half-merged snapshot.
//!
//! - **[`Entity`]** / **[`Stateful`]** — base capability contract: one
//!   snapshot, a pinned identity, and a shared client handle. Snapshots are
//!   not internally synchronized; mutating ops take `&mut self`, so access
//!   to a given entity is serialized by ownership.
//!
//! - **[`Device`]** — switches, dimmers, and bulbs, dispatched by the
//!   [`DeviceKind`] capability tag instead of a type hierarchy.
//!
//! - **[`Automation`]** — enable / trigger / refresh.
//!
//! - **[`validate`]** — the pure per-operation comparator policy. The cloud
//!   API may silently round or clamp values but is authoritative, so color
//!   temperature and hue drift are tolerated (warn + adopt the server value)
//!   while identity, power-state, and level mismatches are fatal.

pub mod automation;
pub mod device;
pub mod entity;
pub mod error;
pub mod state;
pub mod validate;

// ── Primary re-exports ──────────────────────────────────────────────
pub use automation::Automation;
pub use device::{ColorMode, Device, DeviceKind};
pub use entity::{Entity, Stateful};
pub use error::CoreError;
pub use state::State;
pub use validate::Verdict;
