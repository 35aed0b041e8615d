//! User directory contract and its implementations.
//!
//! This module provides:
//! - `Users`: the operations a user directory exposes
//! - `User`, `NewUser`, `ExternalAccount`, `UsersListOptions`: the records
//!   and filters those operations exchange
//! - `MockUsers`: a test double with per-operation overrides
//! - `MemoryUsers`: an in-process directory
//!
//! Every operation takes the `RequestContext` of the calling request, so
//! implementations can read the acting user and log against the request.

mod directory;
mod memory;
mod mock;
mod record;

pub use directory::Users;
pub use memory::MemoryUsers;
pub use mock::{Called, MockUsers};
pub use record::{ExternalAccount, NewUser, User, UsersListOptions};
