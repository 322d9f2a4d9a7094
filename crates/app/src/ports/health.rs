//! Health port — a dependency the daemon can probe.

use std::future::Future;

use inventory_domain::error::InventoryError;

/// Something whose reachability belongs in the health report.
pub trait HealthProbe {
    /// Short name shown in the report, e.g. `"database"`.
    fn name(&self) -> &'static str;

    /// What the check verifies, shown next to its result.
    fn description(&self) -> &'static str;

    /// Succeeds when the dependency answered.
    fn check(&self) -> impl Future<Output = Result<(), InventoryError>> + Send;
}
