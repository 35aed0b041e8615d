//! Request-scoped actor identity and a substitutable user directory.
//!
//! This crate provides:
//! - **Identity**: an immutable [`Actor`], anonymous or an authenticated user id
//! - **Propagation**: a [`RequestContext`] that carries the actor down the call
//!   chain through a private slot, reporting the acting user to tracing
//! - **Directory contract**: the [`Users`](users::Users) operations, with a
//!   per-operation test double and an in-memory implementation
//!
//! # Core Types
//!
//! - [`Actor`]: Who is making the request
//! - [`RequestContext`]: Immutable per-request carrier
//! - [`ActingUserReporter`]: Receives the acting user on attach
//! - [`RequestMeta`]: What the authentication boundary hands over
//! - [`DirectoryError`]: Failure of a directory operation
//!
//! # Examples
//!
//! ```
//! use actor_context::{actor_from, with_actor, Actor, RequestContext};
//! use actor_context::users::{MockUsers, User, Users};
//!
//! // Fresh contexts carry the anonymous actor
//! let ctx = RequestContext::new("req-123");
//! assert!(!actor_from(&ctx).is_authenticated());
//!
//! // The authentication boundary attaches the actor
//! let ctx = with_actor(&ctx, Some(Actor::from_user(42)));
//! assert_eq!(actor_from(&ctx).uid_string(), "42");
//!
//! // Directory calls receive the context
//! let mut users = MockUsers::new();
//! users.on_get_by_current_auth_user(|ctx| {
//!     Ok(User {
//!         id: ctx.actor().uid(),
//!         username: "alice".to_string(),
//!         display_name: None,
//!         external: None,
//!         site_admin: false,
//!     })
//! });
//! assert_eq!(users.get_by_current_auth_user(&ctx).unwrap().id, 42);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod actor;
mod context;
mod error;
mod logging;
mod request;
pub mod trace;
pub mod users;

pub use actor::Actor;
pub use context::{actor_from, presence, with_actor, ActorPresence, RequestContext};
pub use error::{DirectoryError, ErrorKind};
pub use logging::ContextLog;
pub use request::{enter, ExtractMetadata, RequestMeta};
pub use trace::{ActingUserReporter, NoopReporter, TracingReporter};
