//! Engine module - regole di dominio su amicizie, gruppi e notifiche
//!
//! Le funzioni sono generiche sui trait dei repository: gli handler passano i repository
//! MySQL, i test passano uno store in memoria.

pub mod error;
pub mod group;
pub mod notification;
pub mod relationship;

#[cfg(test)]
pub(crate) mod memory;

pub use error::EngineError;
pub use group::GroupWithMembers;

use crate::entities::UserProfile;

/// Username ascending, case-insensitive first so the order matches the database collation.
pub(crate) fn sort_by_username(users: &mut [UserProfile]) {
    users.sort_by(|a, b| {
        a.username
            .to_lowercase()
            .cmp(&b.username.to_lowercase())
            .then_with(|| a.username.cmp(&b.username))
    });
}
