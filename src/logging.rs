use std::fmt;

use crate::actor::Actor;

/// A request-scoped logging interface.
///
/// `ContextLog` is obtained from `RequestContext::log()` and is
/// lifetime-bound to the context it came from.
///
/// Every event carries the request ID and the acting user's id
/// (`user_id = 0` for anonymous requests).
#[derive(Debug)]
pub struct ContextLog<'a> {
    request_id: &'a str,
    actor: Actor,
}

impl<'a> ContextLog<'a> {
    /// Creates a new ContextLog.
    ///
    /// This is `pub(crate)` - only `RequestContext` can create it.
    pub(crate) fn new(request_id: &'a str, actor: Actor) -> Self {
        Self { request_id, actor }
    }

    /// Returns the request ID associated with this logger.
    pub fn request_id(&self) -> &str {
        self.request_id
    }

    /// Returns the actor stamped on every event.
    pub fn actor(&self) -> Actor {
        self.actor
    }

    /// Logs an info-level message with request ID and user ID.
    ///
    /// Use with `format_args!` for efficient formatting:
    /// ```no_run
    /// # use actor_context::RequestContext;
    /// let ctx = RequestContext::new("req-1");
    /// ctx.log().info(format_args!("listing users, page {}", 2));
    /// ```
    pub fn info(&self, args: fmt::Arguments<'_>) {
        tracing::info!(request_id = %self.request_id, user_id = self.actor.uid(), "{}", args);
    }

    /// Logs a warning-level message with request ID and user ID.
    pub fn warn(&self, args: fmt::Arguments<'_>) {
        tracing::warn!(request_id = %self.request_id, user_id = self.actor.uid(), "{}", args);
    }

    /// Logs an error-level message with request ID and user ID.
    pub fn error(&self, args: fmt::Arguments<'_>) {
        tracing::error!(request_id = %self.request_id, user_id = self.actor.uid(), "{}", args);
    }

    /// Logs a debug-level message with request ID and user ID.
    pub fn debug(&self, args: fmt::Arguments<'_>) {
        tracing::debug!(request_id = %self.request_id, user_id = self.actor.uid(), "{}", args);
    }
}
