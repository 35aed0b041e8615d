//! Reporting of the acting user to the tracing collector.
//!
//! [`with_actor`](crate::with_actor) calls the context's reporter whenever an
//! authenticated actor is attached. Reporting is telemetry only: reporters
//! return nothing, and nothing in request processing depends on them.

use crate::context::RequestContext;

/// Target used for acting-user events emitted by [`TracingReporter`].
pub const TRACE_TARGET: &str = "actor_context::trace";

/// Receives the acting user whenever an authenticated actor is attached.
///
/// Implementations must not block. Failures are swallowed by the
/// implementation; there is no error channel back to the caller.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use actor_context::{with_actor, Actor, ActingUserReporter, RequestContext};
///
/// #[derive(Default)]
/// struct Counter(AtomicUsize);
///
/// impl ActingUserReporter for Counter {
///     fn report_acting_user(&self, _ctx: &RequestContext, _uid: i32) {
///         self.0.fetch_add(1, Ordering::Relaxed);
///     }
/// }
///
/// let counter = Arc::new(Counter::default());
/// let ctx = RequestContext::with_reporter("req-1", counter.clone());
///
/// let _ = with_actor(&ctx, Some(Actor::from_user(7)));
/// assert_eq!(counter.0.load(Ordering::Relaxed), 1);
/// ```
pub trait ActingUserReporter: Send + Sync {
    /// Reports that `uid` is acting within the request carried by `ctx`.
    fn report_acting_user(&self, ctx: &RequestContext, uid: i32);
}

/// Default reporter backed by `tracing`.
///
/// Records `user_id` on the current span (a no-op when the span does not
/// declare that field) and emits a debug event under [`TRACE_TARGET`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl ActingUserReporter for TracingReporter {
    fn report_acting_user(&self, ctx: &RequestContext, uid: i32) {
        tracing::Span::current().record("user_id", uid);
        tracing::debug!(
            target: TRACE_TARGET,
            request_id = %ctx.request_id(),
            user_id = uid,
            "acting user"
        );
    }
}

/// Reporter that discards every report.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopReporter;

impl ActingUserReporter for NoopReporter {
    fn report_acting_user(&self, _ctx: &RequestContext, _uid: i32) {}
}
