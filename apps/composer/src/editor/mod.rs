// Editing engine: section order, custom section manager, content edits, and the session
// that owns the one live document. All edits are synchronous pure transitions.

pub mod content;
pub mod custom;
pub mod error;
pub mod handlers;
pub mod order;
pub mod session;
pub mod transitions;

pub use error::EditError;
pub use session::{EditorSession, InFlight, Operation, SessionStatus};

/// Fresh id for sections, entries, and list items.
pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
