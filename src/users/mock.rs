//! Test double for the user directory.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::context::RequestContext;
use crate::error::DirectoryError;

use super::{NewUser, User, Users, UsersListOptions};

type CreateFn = dyn Fn(&RequestContext, NewUser) -> Result<User, DirectoryError> + Send + Sync;
type GetByIdFn = dyn Fn(&RequestContext, i32) -> Result<User, DirectoryError> + Send + Sync;
type GetByUsernameFn = dyn Fn(&RequestContext, &str) -> Result<User, DirectoryError> + Send + Sync;
type GetByExternalIdFn =
    dyn Fn(&RequestContext, &str, &str) -> Result<User, DirectoryError> + Send + Sync;
type GetByCurrentAuthUserFn = dyn Fn(&RequestContext) -> Result<User, DirectoryError> + Send + Sync;
type CountFn =
    dyn Fn(&RequestContext, &UsersListOptions) -> Result<usize, DirectoryError> + Send + Sync;
type ListFn = dyn Fn(&RequestContext, Option<&UsersListOptions>) -> Result<Vec<User>, DirectoryError>
    + Send
    + Sync;
type ListByOrgFn = dyn Fn(&RequestContext, i32, &[i32], &[String]) -> Result<Vec<User>, DirectoryError>
    + Send
    + Sync;

/// Observes whether a mocked operation was invoked.
///
/// Returned by the `mock_*_return` helpers on [`MockUsers`]. The flag flips
/// to true on the first invocation and stays true. It has no effect on the
/// operation's behavior. Updates are atomic, so invocations from several
/// threads are never lost.
#[derive(Debug, Clone, Default)]
pub struct Called(Arc<AtomicBool>);

impl Called {
    /// Returns true once the operation has run at least once.
    pub fn was_called(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn mark(&self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

/// A [`Users`] implementation whose operations are overridden one at a time.
///
/// Each operation starts unset. An unset operation delegates to the
/// fall-through directory given to [`MockUsers::with_fallback`]; with no
/// fall-through it panics, naming the operation. That panic is a test harness
/// misconfiguration and is never reported as a directory error.
///
/// Overrides are installed during test setup through `&mut self`. Once
/// installed they are invoked through `&self` and may be called from several
/// threads.
///
/// # Examples
///
/// ```
/// use actor_context::users::{MockUsers, User, Users};
/// use actor_context::RequestContext;
///
/// let user = User {
///     id: 1,
///     username: "alice".to_string(),
///     display_name: None,
///     external: None,
///     site_admin: false,
/// };
///
/// let mut users = MockUsers::new();
/// let called = users.mock_get_by_id_return(Ok(user.clone()));
/// assert!(!called.was_called());
///
/// let ctx = RequestContext::new("req-1");
/// assert_eq!(users.get_by_id(&ctx, 77), Ok(user));
/// assert!(called.was_called());
/// ```
#[derive(Default)]
pub struct MockUsers {
    create: Option<Box<CreateFn>>,
    get_by_id: Option<Box<GetByIdFn>>,
    get_by_username: Option<Box<GetByUsernameFn>>,
    get_by_external_id: Option<Box<GetByExternalIdFn>>,
    get_by_current_auth_user: Option<Box<GetByCurrentAuthUserFn>>,
    count: Option<Box<CountFn>>,
    list: Option<Box<ListFn>>,
    list_by_org: Option<Box<ListByOrgFn>>,
    fallback: Option<Box<dyn Users>>,
}

impl MockUsers {
    /// Creates a mock with every operation unset and no fall-through.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock whose unset operations delegate to `fallback`.
    pub fn with_fallback(fallback: impl Users + 'static) -> Self {
        Self {
            fallback: Some(Box::new(fallback)),
            ..Self::default()
        }
    }

    // ========================================================================
    // Per-operation overrides
    // ========================================================================

    /// Overrides `create`.
    pub fn on_create(
        &mut self,
        f: impl Fn(&RequestContext, NewUser) -> Result<User, DirectoryError> + Send + Sync + 'static,
    ) -> &mut Self {
        self.create = Some(Box::new(f));
        self
    }

    /// Overrides `get_by_id`.
    pub fn on_get_by_id(
        &mut self,
        f: impl Fn(&RequestContext, i32) -> Result<User, DirectoryError> + Send + Sync + 'static,
    ) -> &mut Self {
        self.get_by_id = Some(Box::new(f));
        self
    }

    /// Overrides `get_by_username`.
    pub fn on_get_by_username(
        &mut self,
        f: impl Fn(&RequestContext, &str) -> Result<User, DirectoryError> + Send + Sync + 'static,
    ) -> &mut Self {
        self.get_by_username = Some(Box::new(f));
        self
    }

    /// Overrides `get_by_external_id`.
    pub fn on_get_by_external_id(
        &mut self,
        f: impl Fn(&RequestContext, &str, &str) -> Result<User, DirectoryError> + Send + Sync + 'static,
    ) -> &mut Self {
        self.get_by_external_id = Some(Box::new(f));
        self
    }

    /// Overrides `get_by_current_auth_user`.
    pub fn on_get_by_current_auth_user(
        &mut self,
        f: impl Fn(&RequestContext) -> Result<User, DirectoryError> + Send + Sync + 'static,
    ) -> &mut Self {
        self.get_by_current_auth_user = Some(Box::new(f));
        self
    }

    /// Overrides `count`.
    pub fn on_count(
        &mut self,
        f: impl Fn(&RequestContext, &UsersListOptions) -> Result<usize, DirectoryError>
            + Send
            + Sync
            + 'static,
    ) -> &mut Self {
        self.count = Some(Box::new(f));
        self
    }

    /// Overrides `list`.
    pub fn on_list(
        &mut self,
        f: impl Fn(&RequestContext, Option<&UsersListOptions>) -> Result<Vec<User>, DirectoryError>
            + Send
            + Sync
            + 'static,
    ) -> &mut Self {
        self.list = Some(Box::new(f));
        self
    }

    /// Overrides `list_by_org`.
    pub fn on_list_by_org(
        &mut self,
        f: impl Fn(&RequestContext, i32, &[i32], &[String]) -> Result<Vec<User>, DirectoryError>
            + Send
            + Sync
            + 'static,
    ) -> &mut Self {
        self.list_by_org = Some(Box::new(f));
        self
    }

    // ========================================================================
    // Fixed-return helpers
    // ========================================================================

    /// Makes every `get_by_id` call return `returns`, whatever the id.
    ///
    /// The returned [`Called`] turns true on the first call.
    pub fn mock_get_by_id_return(&mut self, returns: Result<User, DirectoryError>) -> Called {
        let called = Called::default();
        let observed = called.clone();
        self.on_get_by_id(move |_ctx, _id| {
            observed.mark();
            returns.clone()
        });
        called
    }

    /// Makes every `get_by_external_id` call return `returns`, whatever the
    /// provider and id.
    ///
    /// The returned [`Called`] turns true on the first call.
    pub fn mock_get_by_external_id_return(
        &mut self,
        returns: Result<User, DirectoryError>,
    ) -> Called {
        let called = Called::default();
        let observed = called.clone();
        self.on_get_by_external_id(move |_ctx, _provider, _id| {
            observed.mark();
            returns.clone()
        });
        called
    }

    fn fallback(&self, operation: &str) -> &dyn Users {
        match self.fallback.as_deref() {
            Some(users) => users,
            None => panic!(
                "MockUsers::{operation} called with no override and no fallback configured"
            ),
        }
    }
}

impl fmt::Debug for MockUsers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockUsers")
            .field("create", &self.create.is_some())
            .field("get_by_id", &self.get_by_id.is_some())
            .field("get_by_username", &self.get_by_username.is_some())
            .field("get_by_external_id", &self.get_by_external_id.is_some())
            .field("get_by_current_auth_user", &self.get_by_current_auth_user.is_some())
            .field("count", &self.count.is_some())
            .field("list", &self.list.is_some())
            .field("list_by_org", &self.list_by_org.is_some())
            .field("fallback", &self.fallback.is_some())
            .finish()
    }
}

impl Users for MockUsers {
    fn create(&self, ctx: &RequestContext, info: NewUser) -> Result<User, DirectoryError> {
        match &self.create {
            Some(f) => f(ctx, info),
            None => self.fallback("create").create(ctx, info),
        }
    }

    fn get_by_id(&self, ctx: &RequestContext, id: i32) -> Result<User, DirectoryError> {
        match &self.get_by_id {
            Some(f) => f(ctx, id),
            None => self.fallback("get_by_id").get_by_id(ctx, id),
        }
    }

    fn get_by_username(
        &self,
        ctx: &RequestContext,
        username: &str,
    ) -> Result<User, DirectoryError> {
        match &self.get_by_username {
            Some(f) => f(ctx, username),
            None => self.fallback("get_by_username").get_by_username(ctx, username),
        }
    }

    fn get_by_external_id(
        &self,
        ctx: &RequestContext,
        provider: &str,
        id: &str,
    ) -> Result<User, DirectoryError> {
        match &self.get_by_external_id {
            Some(f) => f(ctx, provider, id),
            None => self
                .fallback("get_by_external_id")
                .get_by_external_id(ctx, provider, id),
        }
    }

    fn get_by_current_auth_user(&self, ctx: &RequestContext) -> Result<User, DirectoryError> {
        match &self.get_by_current_auth_user {
            Some(f) => f(ctx),
            None => self
                .fallback("get_by_current_auth_user")
                .get_by_current_auth_user(ctx),
        }
    }

    fn count(&self, ctx: &RequestContext, opt: &UsersListOptions) -> Result<usize, DirectoryError> {
        match &self.count {
            Some(f) => f(ctx, opt),
            None => self.fallback("count").count(ctx, opt),
        }
    }

    fn list(
        &self,
        ctx: &RequestContext,
        opt: Option<&UsersListOptions>,
    ) -> Result<Vec<User>, DirectoryError> {
        match &self.list {
            Some(f) => f(ctx, opt),
            None => self.fallback("list").list(ctx, opt),
        }
    }

    fn list_by_org(
        &self,
        ctx: &RequestContext,
        org_id: i32,
        user_ids: &[i32],
        usernames: &[String],
    ) -> Result<Vec<User>, DirectoryError> {
        match &self.list_by_org {
            Some(f) => f(ctx, org_id, user_ids, usernames),
            None => self
                .fallback("list_by_org")
                .list_by_org(ctx, org_id, user_ids, usernames),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::MemoryUsers;
    use crate::{with_actor, Actor};

    fn alice() -> User {
        User {
            id: 1,
            username: "alice".to_string(),
            display_name: Some("Alice".to_string()),
            external: None,
            site_admin: false,
        }
    }

    #[test]
    fn get_by_id_return_ignores_id_and_sets_flag() {
        let mut users = MockUsers::new();
        let called = users.mock_get_by_id_return(Ok(alice()));
        let ctx = RequestContext::new("req-mock-1");

        assert!(!called.was_called());
        assert_eq!(users.get_by_id(&ctx, 1), Ok(alice()));
        assert_eq!(users.get_by_id(&ctx, 500), Ok(alice()));
        assert!(called.was_called());
    }

    #[test]
    fn get_by_external_id_return_leaves_other_flags_alone() {
        let mut users = MockUsers::new();
        let by_id = users.mock_get_by_id_return(Ok(alice()));
        let by_external =
            users.mock_get_by_external_id_return(Err(DirectoryError::not_found("no such account")));
        let ctx = RequestContext::new("req-mock-2");

        let result = users.get_by_external_id(&ctx, "github", "abc");

        assert_eq!(result, Err(DirectoryError::not_found("no such account")));
        assert!(by_external.was_called());
        assert!(!by_id.was_called());
    }

    #[test]
    fn reconfiguring_replaces_only_that_slot() {
        let mut users = MockUsers::new();
        let first = users.mock_get_by_id_return(Ok(alice()));
        let second = users.mock_get_by_id_return(Err(DirectoryError::not_found("gone")));
        users.on_count(|_, _| Ok(3));
        let ctx = RequestContext::new("req-mock-3");

        assert!(users.get_by_id(&ctx, 1).unwrap_err().is_not_found());
        assert!(!first.was_called());
        assert!(second.was_called());
        assert_eq!(users.count(&ctx, &UsersListOptions::new()), Ok(3));
    }

    #[test]
    fn override_sees_request_context() {
        let mut users = MockUsers::new();
        users.on_get_by_current_auth_user(|ctx| {
            let actor = ctx.actor();
            if actor.is_authenticated() {
                Ok(User {
                    id: actor.uid(),
                    ..alice()
                })
            } else {
                Err(DirectoryError::unauthenticated("anonymous"))
            }
        });

        let anon = RequestContext::new("req-mock-4");
        let authed = with_actor(&anon, Some(Actor::from_user(9)));

        assert_eq!(users.get_by_current_auth_user(&authed).unwrap().id, 9);
        assert_eq!(
            users.get_by_current_auth_user(&anon).unwrap_err().kind(),
            crate::ErrorKind::Unauthenticated
        );
    }

    #[test]
    #[should_panic(expected = "MockUsers::get_by_username called with no override")]
    fn unset_operation_without_fallback_panics() {
        let users = MockUsers::new();
        let ctx = RequestContext::new("req-mock-5");
        let _ = users.get_by_username(&ctx, "alice");
    }

    #[test]
    fn unset_operation_delegates_to_fallback() {
        let ctx = RequestContext::new("req-mock-6");
        let backing = MemoryUsers::new();
        let created = backing.create(&ctx, NewUser::new("bob")).unwrap();

        let mut users = MockUsers::with_fallback(backing);
        let by_id = users.mock_get_by_id_return(Err(DirectoryError::unavailable("down")));

        assert_eq!(users.get_by_username(&ctx, "bob"), Ok(created));
        assert_eq!(
            users.get_by_id(&ctx, 1).unwrap_err().kind(),
            crate::ErrorKind::Unavailable
        );
        assert!(by_id.was_called());
    }

    #[test]
    fn flag_survives_concurrent_calls() {
        let mut users = MockUsers::new();
        let called = users.mock_get_by_id_return(Ok(alice()));
        let users = Arc::new(users);
        let ctx = RequestContext::new("req-mock-7");

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let users = Arc::clone(&users);
                let ctx = ctx.clone();
                std::thread::spawn(move || users.get_by_id(&ctx, i).is_ok())
            })
            .collect();

        for handle in handles {
            assert!(handle.join().unwrap());
        }
        assert!(called.was_called());
    }

    #[test]
    fn debug_lists_configured_slots() {
        let mut users = MockUsers::new();
        users.on_list(|_, _| Ok(Vec::new()));

        let out = format!("{:?}", users);
        assert!(out.contains("list: true"));
        assert!(out.contains("create: false"));
    }
}
