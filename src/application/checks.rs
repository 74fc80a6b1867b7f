//! Permission checks for commands
//!
//! Each constructor returns a boxed predicate over the triggering message,
//! suitable for `Command::with_check`. Role lists are captured explicitly by
//! the closure; there is no process-wide role state. A message without a
//! sender fails every check.

use crate::domain::entities::command::CommandCheck;
use crate::domain::entities::{Message, User};

fn sender_check<F>(predicate: F) -> CommandCheck
where
    F: Fn(&User) -> bool + Send + Sync + 'static,
{
    Box::new(move |msg: &Message| msg.sender.as_ref().map_or(false, |user| predicate(user)))
}

/// Sender holds at least one of the given roles.
pub fn has_any_role(roles: Vec<String>) -> CommandCheck {
    sender_check(move |user| roles.iter().any(|r| user.has_role(r)))
}

/// Sender holds every one of the given roles.
pub fn has_all_roles(roles: Vec<String>) -> CommandCheck {
    sender_check(move |user| roles.iter().all(|r| user.has_role(r)))
}

/// Sender holds a staff role. An empty staff list denies everyone.
pub fn is_staff(staff_roles: Vec<String>) -> CommandCheck {
    has_any_role(staff_roles)
}

/// Sender has admin rights on the platform.
pub fn is_admin() -> CommandCheck {
    sender_check(|user| user.is_admin)
}

/// Sender owns the chat the bot runs in.
pub fn is_server_owner() -> CommandCheck {
    sender_check(|user| user.is_owner)
}
