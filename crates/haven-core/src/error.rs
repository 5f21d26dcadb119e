// ── Core error types ──
//
// User-facing errors from haven-core. Transport and HTTP failures pass
// through as `Api`; everything else describes a reconciliation failure.
// Ops return before any snapshot mutation on every fatal variant here,
// so a failed command never leaves a half-updated snapshot.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Transport / HTTP (propagated unmodified) ─────────────────────
    #[error(transparent)]
    Api(#[from] haven_api::Error),

    // ── Response shape ───────────────────────────────────────────────
    /// Body parsed, but an expected field or shape is missing.
    #[error("Malformed response: {message}")]
    MalformedResponse { message: String },

    // ── Reconciliation ───────────────────────────────────────────────
    /// The response echoed an identifier for a different entity.
    /// Always fatal: the request reached the wrong target.
    #[error("Device id mismatch: expected {expected}, got {got}")]
    IdentityMismatch { expected: String, got: String },

    /// The echoed value fails an exact-match comparator (power state,
    /// dim level). The server did not apply what was requested.
    #[error("State mismatch for {field}: requested {requested}, server returned {echoed}")]
    StateMismatch {
        field: &'static str,
        requested: String,
        echoed: String,
    },

    /// An automation edit response does not echo the requested change.
    #[error("Automation edit response does not match the requested change")]
    InvalidEditResponse,
}

impl CoreError {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }
}
