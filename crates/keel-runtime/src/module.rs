//! The feature-module contract.

/// A priority-ordered unit of application functionality (UI, audio,
/// networking, ...) managed by the [`crate::Framework`].
///
/// Modules with a lower priority initialize earlier and shut down later.
/// The module's name is its registry key and must be unique. All hooks
/// default to no-ops; implementations use interior mutability for their
/// own state.
pub trait Module: Send + Sync {
    /// Unique name; the orchestrator's registry key for this module.
    fn name(&self) -> &str;

    /// Ordering key: lower values initialize first.
    fn priority(&self) -> i32;

    /// Called once during framework initialization, in priority order.
    fn initialize(&self) {}

    /// Called once during framework shutdown, in reverse of the realized
    /// initialization order.
    fn shutdown(&self) {}

    /// Called every external tick while the framework is running. Keep
    /// this lightweight; it runs at frame rate.
    fn on_update(&self) {}
}
