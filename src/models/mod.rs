pub mod list;
pub mod session;
pub mod task;
pub mod user;

pub use list::{List, ListUpdate, NewList};
pub use session::Session;
pub use task::{NewTask, Task, TaskUpdate};
pub use user::{normalize_email, User};

use validator::ValidationError;

/// Rejects titles that are empty once surrounding whitespace is trimmed.
pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some("must not be blank".into());
        return Err(error);
    }
    Ok(())
}
