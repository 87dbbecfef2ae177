//! Event Stream Client.
//!
//! Owns the persistent WebSocket connection to the locker controller and
//! delivers parsed [`cubby_proto::LockerEvent`]s to subscribers in arrival
//! order. Connection lifecycle is explicit: [`StreamClient::connect`] spawns
//! the connection task, [`StreamClient::disconnect`] tears it down and stops
//! delivery.
//!
//! On unexpected loss the client retries with exponential backoff up to a
//! bounded attempt count, then stops retrying — the session degrades to
//! fallback timing until the kiosk restarts. Subscribers learn about
//! connectivity through [`StreamUpdate::Opened`] / [`StreamUpdate::Lost`] /
//! [`StreamUpdate::Stopped`] notifications, distinct from event delivery:
//! "connected" must be knowable before any event has arrived.
//!
//! Malformed frames are dropped and logged; they never reach subscribers.

pub mod client;
pub mod update;

pub use client::{StreamClient, StreamConfig, StreamError};
pub use update::StreamUpdate;
