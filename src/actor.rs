use std::fmt;

/// The identity on whose behalf a request is processed.
///
/// An `Actor` is either anonymous or an authenticated user identified by a
/// numeric user id. There is no separate flag: an actor is anonymous exactly
/// when its uid is zero.
///
/// Actors are plain values. They are built fresh for each request, never
/// mutated, and dropped with the request context that carries them.
///
/// # Examples
///
/// ```
/// use actor_context::Actor;
///
/// let actor = Actor::from_user(42);
/// assert!(actor.is_authenticated());
/// assert_eq!(actor.uid_string(), "42");
/// assert_eq!(actor.to_string(), "Actor UID 42");
///
/// assert!(!Actor::anonymous().is_authenticated());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Actor {
    uid: i32,
}

impl Actor {
    /// Returns the actor for an authenticated user.
    ///
    /// This is pure value construction. The uid is not checked against any
    /// user directory, and a uid of zero yields the anonymous actor.
    pub const fn from_user(uid: i32) -> Self {
        Self { uid }
    }

    /// Returns the anonymous actor.
    pub const fn anonymous() -> Self {
        Self { uid: 0 }
    }

    /// Returns the user id, or zero for the anonymous actor.
    pub const fn uid(&self) -> i32 {
        self.uid
    }

    /// Returns true if the actor is derived from an authenticated user.
    pub const fn is_authenticated(&self) -> bool {
        self.uid != 0
    }

    /// Returns the uid in canonical decimal form, for log fields and keys.
    pub fn uid_string(&self) -> String {
        self.uid.to_string()
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Actor UID {}", self.uid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_user_is_authenticated() {
        let actor = Actor::from_user(42);

        assert_eq!(actor.uid(), 42);
        assert!(actor.is_authenticated());
        assert_eq!(actor.uid_string(), "42");
        assert!(actor.to_string().contains("42"));
    }

    #[test]
    fn zero_uid_is_anonymous() {
        assert!(!Actor::from_user(0).is_authenticated());
        assert_eq!(Actor::from_user(0), Actor::anonymous());
        assert_eq!(Actor::default(), Actor::anonymous());
    }

    #[test]
    fn negative_uid_counts_as_authenticated() {
        // Only zero is reserved; the uid is never validated.
        let actor = Actor::from_user(-7);
        assert!(actor.is_authenticated());
        assert_eq!(actor.uid_string(), "-7");
    }

    #[test]
    fn display_embeds_uid() {
        assert_eq!(Actor::anonymous().to_string(), "Actor UID 0");
        assert_eq!(Actor::from_user(1001).to_string(), "Actor UID 1001");
    }
}
