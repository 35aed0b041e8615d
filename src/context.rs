use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crate::actor::Actor;
use crate::logging::ContextLog;
use crate::trace::{ActingUserReporter, TracingReporter};

type Slot = Arc<dyn Any + Send + Sync>;

/// Request-scoped carrier threaded through a call chain.
///
/// A `RequestContext` holds the request id, a set of typed slots, and the
/// reporter used when an actor is attached. It is immutable: every `with_*`
/// method returns a new context and leaves the receiver untouched, so a
/// context can be shared freely between the threads serving one request.
/// Cloning is cheap; the slot table and reporter are reference counted.
///
/// Slots are keyed by a crate-internal key *type*. A module that keeps its
/// key type private owns its slot: no other code can name the key, so no
/// other code can read or overwrite the value.
///
/// Each request builds its own context. There is no process-wide default.
///
/// # Examples
///
/// ```
/// use actor_context::{actor_from, with_actor, Actor, RequestContext};
///
/// let ctx = RequestContext::new("req-123");
/// assert!(!actor_from(&ctx).is_authenticated());
///
/// let ctx = with_actor(&ctx, Some(Actor::from_user(42)));
/// assert_eq!(actor_from(&ctx).uid(), 42);
/// assert_eq!(ctx.request_id(), "req-123");
/// ```
#[derive(Clone)]
pub struct RequestContext {
    request_id: Arc<str>,
    slots: Arc<HashMap<TypeId, Slot>>,
    reporter: Arc<dyn ActingUserReporter>,
}

// ============================================================================
// Construction and slot access
// ============================================================================

impl RequestContext {
    /// Creates an empty context that reports acting users through `tracing`.
    pub fn new(request_id: impl Into<String>) -> Self {
        Self::with_reporter(request_id, Arc::new(TracingReporter))
    }

    /// Creates an empty context with a caller-supplied acting-user reporter.
    pub fn with_reporter(
        request_id: impl Into<String>,
        reporter: Arc<dyn ActingUserReporter>,
    ) -> Self {
        Self {
            request_id: Arc::from(request_id.into()),
            slots: Arc::new(HashMap::new()),
            reporter,
        }
    }

    /// Returns the request id for this context.
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Returns a new context with `value` stored in the slot keyed by `K`.
    ///
    /// Any previous value under `K` is replaced in the returned context only.
    pub(crate) fn with_value<K: 'static, V: Any + Send + Sync>(&self, value: V) -> Self {
        let mut slots: HashMap<TypeId, Slot> = (*self.slots).clone();
        slots.insert(TypeId::of::<K>(), Arc::new(value));
        Self {
            request_id: Arc::clone(&self.request_id),
            slots: Arc::new(slots),
            reporter: Arc::clone(&self.reporter),
        }
    }

    /// Returns the value in the slot keyed by `K` if it has type `V`.
    ///
    /// An empty slot and a slot holding some other type both yield `None`.
    pub(crate) fn value<K: 'static, V: 'static>(&self) -> Option<&V> {
        self.slots
            .get(&TypeId::of::<K>())
            .and_then(|slot| slot.downcast_ref::<V>())
    }

    /// Returns true if the slot keyed by `K` holds a value of any type.
    pub(crate) fn contains<K: 'static>(&self) -> bool {
        self.slots.contains_key(&TypeId::of::<K>())
    }

    /// Returns the actor carried by this context; see [`actor_from`].
    pub fn actor(&self) -> Actor {
        actor_from(self)
    }

    /// Returns a logger that stamps this request's id and acting user.
    pub fn log(&self) -> ContextLog<'_> {
        ContextLog::new(&self.request_id, self.actor())
    }

    pub(crate) fn reporter(&self) -> &dyn ActingUserReporter {
        self.reporter.as_ref()
    }
}

impl fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestContext")
            .field("request_id", &self.request_id())
            .field("actor", &presence(self))
            .field("slots", &self.slots.len())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Actor slot
// ============================================================================

// Key for the actor slot. Private to this module.
struct ActorKey;

// What `with_actor` stores. `None` records that the boundary attached no
// actor, which is observable through `presence`.
#[derive(Debug, Clone, Copy)]
struct ActorSlot(Option<Actor>);

/// Whether and how an actor was attached to a context.
///
/// [`actor_from`] folds `Unset` and `Anonymous` into the same
/// anonymous actor. Code that must tell "the authentication boundary never
/// ran" apart from "it ran and the caller is anonymous" uses [`presence`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorPresence {
    /// No actor was ever attached to this context.
    Unset,
    /// An actor slot exists but identifies no authenticated user.
    Anonymous,
    /// An authenticated actor is attached.
    Authenticated(Actor),
}

/// Returns a new context carrying `actor`.
///
/// If `actor` is an authenticated actor, the acting user is reported to the
/// context's [`ActingUserReporter`] exactly once. Anonymous actors and `None`
/// are never reported. Attaching `None` records that no actor is present, and
/// a later [`actor_from`] yields the anonymous actor.
///
/// This function cannot fail. A reporter that panics is logged at `warn`
/// and otherwise ignored.
pub fn with_actor(ctx: &RequestContext, actor: Option<Actor>) -> RequestContext {
    if let Some(a) = actor.filter(Actor::is_authenticated) {
        let reported = panic::catch_unwind(AssertUnwindSafe(|| {
            ctx.reporter().report_acting_user(ctx, a.uid());
        }));
        if reported.is_err() {
            tracing::warn!(
                request_id = %ctx.request_id(),
                user_id = a.uid(),
                "acting user reporter panicked; continuing without report"
            );
        }
    }
    ctx.with_value::<ActorKey, _>(ActorSlot(actor))
}

/// Returns the actor carried by `ctx`, or the anonymous actor.
///
/// The anonymous actor is returned when nothing was attached, when `None`
/// was attached, and when the slot holds a value of an unexpected shape.
/// The result is always safe to inspect without a presence check.
pub fn actor_from(ctx: &RequestContext) -> Actor {
    ctx.value::<ActorKey, ActorSlot>()
        .and_then(|slot| slot.0)
        .unwrap_or_default()
}

/// Reports whether an actor was attached to `ctx`, and which.
pub fn presence(ctx: &RequestContext) -> ActorPresence {
    if !ctx.contains::<ActorKey>() {
        return ActorPresence::Unset;
    }
    match ctx.value::<ActorKey, ActorSlot>().and_then(|slot| slot.0) {
        Some(actor) if actor.is_authenticated() => ActorPresence::Authenticated(actor),
        _ => ActorPresence::Anonymous,
    }
}
