//! In-process user directory.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::context::RequestContext;
use crate::error::DirectoryError;

use super::{NewUser, User, Users, UsersListOptions};

/// A [`Users`] directory held in memory.
///
/// Ids are assigned from 1 upward in creation order. Usernames are unique
/// ignoring ASCII case, and each external account links to at most one user.
/// Organizations come into existence when their first member is added.
///
/// `set_unavailable(true)` makes `count` and `list` fail with
/// [`ErrorKind::Unavailable`](crate::ErrorKind::Unavailable), standing in for
/// a storage outage.
///
/// # Examples
///
/// ```
/// use actor_context::users::{MemoryUsers, NewUser, Users, UsersListOptions};
/// use actor_context::RequestContext;
///
/// let ctx = RequestContext::new("req-1");
/// let users = MemoryUsers::new();
/// users.create(&ctx, NewUser::new("alice")).unwrap();
/// users.create(&ctx, NewUser::new("bob")).unwrap();
///
/// let names: Vec<_> = users
///     .list(&ctx, None)
///     .unwrap()
///     .into_iter()
///     .map(|u| u.username)
///     .collect();
/// assert_eq!(names, ["alice", "bob"]);
/// assert_eq!(users.count(&ctx, &UsersListOptions::new().query("ali")).unwrap(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MemoryUsers {
    state: RwLock<State>,
    unavailable: AtomicBool,
}

#[derive(Debug, Default)]
struct State {
    users: BTreeMap<i32, User>,
    last_id: i32,
    orgs: HashMap<i32, BTreeSet<i32>>,
}

impl MemoryUsers {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `user_id` to organization `org_id`, creating the organization if needed.
    ///
    /// # Errors
    ///
    /// `NotFound` if the user does not exist.
    pub fn add_org_member(&self, org_id: i32, user_id: i32) -> Result<(), DirectoryError> {
        let mut state = self.write()?;
        if !state.users.contains_key(&user_id) {
            return Err(DirectoryError::not_found(format!("user {user_id} not found")));
        }
        state.orgs.entry(org_id).or_default().insert(user_id);
        Ok(())
    }

    /// Simulates a storage outage for `count` and `list`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, State>, DirectoryError> {
        self.state
            .read()
            .map_err(|_| DirectoryError::unavailable("user table lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, State>, DirectoryError> {
        self.state
            .write()
            .map_err(|_| DirectoryError::unavailable("user table lock poisoned"))
    }

    fn check_available(&self, ctx: &RequestContext) -> Result<(), DirectoryError> {
        if self.unavailable.load(Ordering::SeqCst) {
            ctx.log().warn(format_args!("user store unavailable"));
            Err(DirectoryError::unavailable("user store unavailable"))
        } else {
            Ok(())
        }
    }
}

impl State {
    fn find<'a>(&'a self, mut pred: impl FnMut(&User) -> bool) -> Option<&'a User> {
        self.users.values().find(|user| pred(user))
    }
}

impl Users for MemoryUsers {
    fn create(&self, ctx: &RequestContext, info: NewUser) -> Result<User, DirectoryError> {
        if info.username.is_empty() {
            return Err(DirectoryError::invalid("username must not be empty"));
        }

        let mut state = self.write()?;
        if state
            .find(|u| u.username.eq_ignore_ascii_case(&info.username))
            .is_some()
        {
            return Err(DirectoryError::conflict(format!(
                "username {:?} is already taken",
                info.username
            )));
        }
        if let Some(acct) = &info.external {
            let linked = state.find(|u| {
                u.external
                    .as_ref()
                    .is_some_and(|e| e.matches(&acct.provider, &acct.id))
            });
            if linked.is_some() {
                return Err(DirectoryError::conflict(format!(
                    "external account {}:{} is already linked",
                    acct.provider, acct.id
                )));
            }
        }

        state.last_id += 1;
        let user = User {
            id: state.last_id,
            username: info.username,
            display_name: info.display_name,
            external: info.external,
            site_admin: info.site_admin,
        };
        state.users.insert(user.id, user.clone());

        ctx.log()
            .info(format_args!("created user {} ({})", user.id, user.username));
        Ok(user)
    }

    fn get_by_id(&self, _ctx: &RequestContext, id: i32) -> Result<User, DirectoryError> {
        self.read()?
            .users
            .get(&id)
            .cloned()
            .ok_or_else(|| DirectoryError::not_found(format!("user {id} not found")))
    }

    fn get_by_username(
        &self,
        _ctx: &RequestContext,
        username: &str,
    ) -> Result<User, DirectoryError> {
        let not_found = || DirectoryError::not_found(format!("user {username:?} not found"));
        if username.is_empty() {
            return Err(not_found());
        }
        self.read()?
            .find(|u| u.username.eq_ignore_ascii_case(username))
            .cloned()
            .ok_or_else(not_found)
    }

    fn get_by_external_id(
        &self,
        _ctx: &RequestContext,
        provider: &str,
        id: &str,
    ) -> Result<User, DirectoryError> {
        self.read()?
            .find(|u| u.external.as_ref().is_some_and(|e| e.matches(provider, id)))
            .cloned()
            .ok_or_else(|| {
                DirectoryError::not_found(format!("no user for external account {provider}:{id}"))
            })
    }

    fn get_by_current_auth_user(&self, ctx: &RequestContext) -> Result<User, DirectoryError> {
        let actor = ctx.actor();
        if !actor.is_authenticated() {
            return Err(DirectoryError::unauthenticated(
                "no current user: request is anonymous",
            ));
        }
        self.get_by_id(ctx, actor.uid())
    }

    fn count(&self, ctx: &RequestContext, opt: &UsersListOptions) -> Result<usize, DirectoryError> {
        self.check_available(ctx)?;
        Ok(self.read()?.users.values().filter(|u| opt.matches(u)).count())
    }

    fn list(
        &self,
        ctx: &RequestContext,
        opt: Option<&UsersListOptions>,
    ) -> Result<Vec<User>, DirectoryError> {
        self.check_available(ctx)?;
        let all = UsersListOptions::default();
        let opt = opt.unwrap_or(&all);

        let users: Vec<User> = self
            .read()?
            .users
            .values()
            .filter(|u| opt.matches(u))
            .take(opt.limit.unwrap_or(usize::MAX))
            .cloned()
            .collect();

        ctx.log().debug(format_args!("listed {} users", users.len()));
        Ok(users)
    }

    fn list_by_org(
        &self,
        _ctx: &RequestContext,
        org_id: i32,
        user_ids: &[i32],
        usernames: &[String],
    ) -> Result<Vec<User>, DirectoryError> {
        let state = self.read()?;
        let members = state
            .orgs
            .get(&org_id)
            .ok_or_else(|| DirectoryError::not_found(format!("organization {org_id} not found")))?;

        let unfiltered = user_ids.is_empty() && usernames.is_empty();
        let users = members
            .iter()
            .filter_map(|id| state.users.get(id))
            .filter(|u| {
                unfiltered
                    || user_ids.contains(&u.id)
                    || usernames
                        .iter()
                        .any(|name| name.eq_ignore_ascii_case(&u.username))
            })
            .cloned()
            .collect();
        Ok(users)
    }
}
