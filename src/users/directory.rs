use crate::context::RequestContext;
use crate::error::DirectoryError;

use super::{NewUser, User, UsersListOptions};

/// Operations a user directory exposes.
///
/// Each method takes the calling request's context. Lookups fail with
/// [`ErrorKind::NotFound`](crate::ErrorKind::NotFound) when nothing matches;
/// `count`, `list` and `list_by_org` return empty values for zero results and
/// fail only when the store itself fails.
///
/// Results of `list` and `list_by_org` are ordered by ascending user id.
///
/// # Examples
///
/// ```
/// use actor_context::users::{MemoryUsers, NewUser, Users};
/// use actor_context::RequestContext;
///
/// let ctx = RequestContext::new("req-1");
/// let users = MemoryUsers::new();
///
/// let alice = users.create(&ctx, NewUser::new("alice")).unwrap();
/// assert_eq!(users.get_by_username(&ctx, "alice").unwrap().id, alice.id);
/// assert!(users.get_by_id(&ctx, 999).unwrap_err().is_not_found());
/// ```
pub trait Users: Send + Sync {
    /// Creates a user.
    ///
    /// # Errors
    ///
    /// `Conflict` if the username or external account is already taken.
    fn create(&self, ctx: &RequestContext, info: NewUser) -> Result<User, DirectoryError>;

    /// Looks up a user by id.
    fn get_by_id(&self, ctx: &RequestContext, id: i32) -> Result<User, DirectoryError>;

    /// Looks up a user by username. An empty username never matches.
    fn get_by_username(&self, ctx: &RequestContext, username: &str)
        -> Result<User, DirectoryError>;

    /// Looks up the user linked to an external provider account.
    fn get_by_external_id(
        &self,
        ctx: &RequestContext,
        provider: &str,
        id: &str,
    ) -> Result<User, DirectoryError>;

    /// Looks up the user acting in `ctx`.
    ///
    /// # Errors
    ///
    /// `Unauthenticated` if the context's actor is anonymous, `NotFound` if
    /// the actor's uid has no record.
    fn get_by_current_auth_user(&self, ctx: &RequestContext) -> Result<User, DirectoryError>;

    /// Counts users matching `opt`. The limit is ignored.
    fn count(&self, ctx: &RequestContext, opt: &UsersListOptions) -> Result<usize, DirectoryError>;

    /// Lists users matching `opt`, or all users when `opt` is `None`.
    fn list(
        &self,
        ctx: &RequestContext,
        opt: Option<&UsersListOptions>,
    ) -> Result<Vec<User>, DirectoryError>;

    /// Lists members of an organization.
    ///
    /// With both filters empty, every member is returned. Otherwise a member
    /// is returned if its id is in `user_ids` or its username is in
    /// `usernames`.
    ///
    /// # Errors
    ///
    /// `NotFound` if the organization is unknown.
    fn list_by_org(
        &self,
        ctx: &RequestContext,
        org_id: i32,
        user_ids: &[i32],
        usernames: &[String],
    ) -> Result<Vec<User>, DirectoryError>;
}
