//! Authentication boundary.
//!
//! Authentication itself happens elsewhere (sessions, tokens, headers). The
//! boundary hands this crate a [`RequestMeta`] naming the authenticated user,
//! if any, and gets back the [`RequestContext`] to thread through the rest of
//! the request.

use std::sync::Arc;

use crate::actor::Actor;
use crate::context::{with_actor, RequestContext};
use crate::trace::ActingUserReporter;

/// Metadata about an incoming request, as produced by authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestMeta {
    /// Unique identifier for this request
    pub request_id: String,
    /// Authenticated user id, if any
    pub user_id: Option<i32>,
}

impl RequestMeta {
    /// Builds the request context and attaches the request's actor.
    ///
    /// The actor slot is always written, so the resulting context reports
    /// [`ActorPresence::Anonymous`](crate::ActorPresence::Anonymous) rather
    /// than `Unset` when no user was authenticated.
    ///
    /// # Examples
    ///
    /// ```
    /// use actor_context::{actor_from, RequestMeta};
    ///
    /// let ctx = RequestMeta {
    ///     request_id: "req-9".to_string(),
    ///     user_id: Some(9),
    /// }
    /// .into_context();
    ///
    /// assert_eq!(actor_from(&ctx).uid(), 9);
    /// ```
    pub fn into_context(self) -> RequestContext {
        let ctx = RequestContext::new(self.request_id);
        with_actor(&ctx, self.user_id.map(Actor::from_user))
    }

    /// Like [`into_context`](Self::into_context), with a custom reporter.
    pub fn into_context_with(self, reporter: Arc<dyn ActingUserReporter>) -> RequestContext {
        let ctx = RequestContext::with_reporter(self.request_id, reporter);
        with_actor(&ctx, self.user_id.map(Actor::from_user))
    }
}

/// Extracts request metadata from a framework-specific request.
///
/// Framework integrations implement this to map their request and session
/// types onto [`RequestMeta`]. The trait only maps types; it does not
/// authenticate.
///
/// # Examples
///
/// ```
/// use actor_context::{enter, ExtractMetadata, RequestMeta};
///
/// struct MyFrameworkRequest {
///     id: String,
///     session_user: Option<i32>,
/// }
///
/// impl ExtractMetadata for MyFrameworkRequest {
///     fn extract_metadata(&self) -> RequestMeta {
///         RequestMeta {
///             request_id: self.id.clone(),
///             user_id: self.session_user,
///         }
///     }
/// }
///
/// let req = MyFrameworkRequest { id: "req-1".into(), session_user: Some(3) };
/// let ctx = enter(&req);
/// assert!(ctx.actor().is_authenticated());
/// ```
pub trait ExtractMetadata {
    /// Extracts request metadata for this request.
    fn extract_metadata(&self) -> RequestMeta;
}

/// Builds the request context for `request` at the authentication boundary.
pub fn enter<R: ExtractMetadata + ?Sized>(request: &R) -> RequestContext {
    let meta = request.extract_metadata();
    tracing::trace!(request_id = %meta.request_id, authenticated = meta.user_id.is_some(), "entering request");
    meta.into_context()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{presence, ActorPresence};
    use crate::trace::NoopReporter;

    struct TestRequest {
        id: String,
        user: Option<i32>,
    }

    impl ExtractMetadata for TestRequest {
        fn extract_metadata(&self) -> RequestMeta {
            RequestMeta {
                request_id: self.id.clone(),
                user_id: self.user,
            }
        }
    }

    #[test]
    fn enter_with_user_attaches_actor() {
        let req = TestRequest {
            id: "test-1".to_string(),
            user: Some(12),
        };

        let ctx = enter(&req);
        assert_eq!(ctx.request_id(), "test-1");
        assert_eq!(ctx.actor().uid(), 12);
        assert_eq!(presence(&ctx), ActorPresence::Authenticated(Actor::from_user(12)));
    }

    #[test]
    fn enter_without_user_is_anonymous_not_unset() {
        let req = TestRequest {
            id: "test-2".to_string(),
            user: None,
        };

        let ctx = enter(&req);
        assert!(!ctx.actor().is_authenticated());
        assert_eq!(presence(&ctx), ActorPresence::Anonymous);
    }

    #[test]
    fn into_context_with_custom_reporter() {
        let meta = RequestMeta {
            request_id: "test-3".to_string(),
            user_id: Some(0),
        };

        let ctx = meta.into_context_with(Arc::new(NoopReporter));
        assert_eq!(presence(&ctx), ActorPresence::Anonymous);
    }
}
