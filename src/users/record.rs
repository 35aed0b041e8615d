//! Records and filters exchanged with a user directory.

/// An account at an external identity provider linked to a user.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExternalAccount {
    /// Provider name, e.g. `"github"`
    pub provider: String,
    /// The user's id at that provider
    pub id: String,
}

impl ExternalAccount {
    /// Creates an external account reference.
    pub fn new(provider: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            id: id.into(),
        }
    }

    pub(crate) fn matches(&self, provider: &str, id: &str) -> bool {
        self.provider == provider && self.id == id
    }
}

/// A user record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Directory-assigned id; never zero
    pub id: i32,
    /// Unique username
    pub username: String,
    /// Optional display name
    pub display_name: Option<String>,
    /// Linked external account, if the user signed up through one
    pub external: Option<ExternalAccount>,
    /// Whether the user administers the site
    pub site_admin: bool,
}

/// Descriptor for a user to be created.
///
/// # Examples
///
/// ```
/// use actor_context::users::{ExternalAccount, NewUser};
///
/// let new_user = NewUser::new("alice")
///     .display_name("Alice")
///     .external(ExternalAccount::new("github", "1234"));
///
/// assert_eq!(new_user.username, "alice");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Requested username
    pub username: String,
    /// Optional display name
    pub display_name: Option<String>,
    /// External account to link
    pub external: Option<ExternalAccount>,
    /// Whether the new user administers the site
    pub site_admin: bool,
}

impl NewUser {
    /// Creates a descriptor with only a username.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            display_name: None,
            external: None,
            site_admin: false,
        }
    }

    /// Sets the display name.
    pub fn display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Links an external account.
    pub fn external(mut self, account: ExternalAccount) -> Self {
        self.external = Some(account);
        self
    }

    /// Marks the user as a site admin.
    pub fn site_admin(mut self, site_admin: bool) -> Self {
        self.site_admin = site_admin;
        self
    }
}

/// Filter options for `count` and `list`.
///
/// The default value matches every user with no limit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsersListOptions {
    /// Case-insensitive substring matched against username and display name
    pub query: Option<String>,
    /// Maximum number of users returned by `list`; ignored by `count`
    pub limit: Option<usize>,
}

impl UsersListOptions {
    /// Options that match every user.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts results to users whose username or display name contains `query`.
    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Caps the number of users returned by `list`.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Returns true if `user` passes the query filter.
    pub fn matches(&self, user: &User) -> bool {
        let Some(query) = self.query.as_deref() else {
            return true;
        };
        let query = query.to_lowercase();
        user.username.to_lowercase().contains(&query)
            || user
                .display_name
                .as_deref()
                .is_some_and(|name| name.to_lowercase().contains(&query))
    }
}
