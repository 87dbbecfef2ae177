//! Backend trait seam.

use async_trait::async_trait;
use cubby_proto::LockerSnapshot;

use crate::error::GatewayError;

/// The backend operations the session runtime depends on.
///
/// Production uses [`GatewayClient`](crate::GatewayClient); tests substitute
/// a scripted implementation so flows can be exercised without a server.
#[async_trait]
pub trait LockerBackend: Send + Sync {
    /// Assign the locker to `email` and begin a deposit cycle.
    async fn begin_deposit(&self, email: &str) -> Result<LockerSnapshot, GatewayError>;

    /// Submit a retrieval PIN; on success the backend authorizes the unlock.
    async fn submit_unlock(&self, pin: &str) -> Result<LockerSnapshot, GatewayError>;

    /// Fetch the current snapshot for `locker_id`. Out-of-band polling only,
    /// never on the session hot path.
    async fn locker_status(&self, locker_id: &str) -> Result<LockerSnapshot, GatewayError>;
}
