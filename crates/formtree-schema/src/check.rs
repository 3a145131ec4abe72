//! # Asynchronous Checks
//!
//! Extension point for checks that need deferred work, such as a lookup
//! against external data. A node runs its async checks only from
//! [`Node::validate_async`](crate::Node::validate_async), after its
//! synchronous own-level checks and before any child is validated. The
//! synchronous [`Node::validate`](crate::Node::validate) never runs them.

use std::future::Future;

use futures::future::{BoxFuture, FutureExt};
use serde_json::Value;

/// A validation check that may suspend.
pub trait AsyncCheck: Send + Sync {
    /// Findings for `value`. An empty list means the value passes.
    fn check<'a>(&'a self, value: &'a Value) -> BoxFuture<'a, Vec<String>>;
}

/// Adapts a closure returning a future into an [`AsyncCheck`].
///
/// The closure receives an owned copy of the value so the future does not
/// borrow from the node.
pub struct FnCheck<F>(pub F);

impl<F, Fut> AsyncCheck for FnCheck<F>
where
    F: Fn(Value) -> Fut + Send + Sync,
    Fut: Future<Output = Vec<String>> + Send + 'static,
{
    fn check<'a>(&'a self, value: &'a Value) -> BoxFuture<'a, Vec<String>> {
        (self.0)(value.clone()).boxed()
    }
}

impl<F> std::fmt::Debug for FnCheck<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FnCheck")
    }
}
