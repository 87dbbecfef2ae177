//! Subscriber-facing notifications.

use cubby_proto::LockerEvent;

/// What a stream subscriber receives.
///
/// Connectivity notifications are deliberately separate from event delivery:
/// the session must know the stream is up before the first event arrives, and
/// must know when to fall back to local timing.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamUpdate {
    /// The connection is established. Sent on every (re)connect, before any
    /// event from that connection.
    Opened,

    /// A hardware event, in arrival order.
    Event(LockerEvent),

    /// The connection dropped unexpectedly. A reconnect attempt may follow.
    Lost,

    /// Reconnection attempts are exhausted; no further delivery until a
    /// manual reconnect (kiosk restart).
    Stopped,
}
