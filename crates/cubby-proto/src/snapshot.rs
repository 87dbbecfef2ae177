//! Backend locker snapshot DTO.

use serde::{Deserialize, Serialize};

/// Current locker record as reported by the backend.
///
/// Returned by `POST /use`, `POST /unlock`, and `GET /locker/{id}`. The
/// `status` string is owned by the backend and treated as opaque here; the
/// kiosk state machine derives its own phase from events, not from this
/// field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockerSnapshot {
    /// Backend-assigned status label (e.g. "disponible", "ocupado").
    pub status: String,

    /// Locker identifier.
    pub id: u64,

    /// Last-modified timestamp, RFC 3339 as sent by the backend.
    pub updated_at: String,

    /// User currently assigned to the locker, if any.
    #[serde(default)]
    pub assigned_user_id: Option<u64>,

    /// Retrieval PIN issued on deposit. Delivered to the user out of band;
    /// the kiosk must not display or retain it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pin: Option<String>,
}
